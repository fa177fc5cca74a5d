//! Exposure reporting: per-media projections rolled up by advertiser,
//! location and campaign playlist, with optional CPM valuation.

pub mod advertiser;
pub mod engine;
pub mod financial;
pub mod location;
pub mod playlist;

pub use advertiser::AdvertiserReport;
pub use engine::{ExposureReportSet, ReportEngine};
pub use financial::{FinancialEstimator, FinancialReport};
pub use location::LocationReport;
pub use playlist::{PlaylistReport, INTERNAL_ADVERTISER_LABEL};
