#![warn(clippy::unwrap_used)]

pub mod fingerprint;
pub mod report;

pub use fingerprint::report_cache_key;
pub use report::ReportCache;
