pub mod cycle;
pub mod engine;

pub use cycle::CycleIndex;
pub use engine::{ExposureEngine, MediaExposureReport, SECONDS_PER_HOUR};
