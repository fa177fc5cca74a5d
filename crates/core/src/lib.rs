pub mod config;
pub mod error;
pub mod inventory;
pub mod period;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
