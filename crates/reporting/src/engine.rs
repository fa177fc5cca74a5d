//! Report computation facade. One call per snapshot produces every
//! roll-up from a single set of per-media rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use screenreach_core::config::EngineConfig;
use screenreach_core::inventory::{InventorySnapshot, SnapshotIndex};
use screenreach_core::period::ReportPeriod;
use screenreach_exposure::{CycleIndex, ExposureEngine, MediaExposureReport};

use crate::advertiser::{aggregate_by_advertiser, AdvertiserReport};
use crate::financial::{FinancialEstimator, FinancialReport};
use crate::location::{aggregate_by_location, LocationReport};
use crate::playlist::{aggregate_by_playlist, PlaylistReport};

/// Everything one report request returns. Aggregates are derived from the
/// `media` rows, never recomputed from the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureReportSet {
    pub period: ReportPeriod,
    pub generated_at: DateTime<Utc>,
    pub media: Vec<MediaExposureReport>,
    pub advertisers: Vec<AdvertiserReport>,
    pub locations: Vec<LocationReport>,
    pub playlists: Vec<PlaylistReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial: Option<Vec<FinancialReport>>,
}

pub struct ReportEngine {
    exposure: ExposureEngine,
    estimator: FinancialEstimator,
}

impl ReportEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            exposure: ExposureEngine::new(&config.exposure),
            estimator: FinancialEstimator::new(&config.financial),
        }
    }

    /// Run the full pipeline for one snapshot: per-media exposure rows,
    /// the three roll-ups, and optionally the CPM valuation.
    pub fn compute_reports(
        &self,
        snapshot: &InventorySnapshot,
        period: &ReportPeriod,
        include_financial: bool,
    ) -> ExposureReportSet {
        let index = SnapshotIndex::build(snapshot);
        let cycles = CycleIndex::build(snapshot, self.exposure.default_media_duration_secs());

        let media = self
            .exposure
            .compute_media_reports(snapshot, &index, &cycles, period);
        let advertisers = aggregate_by_advertiser(&media, &index);
        let locations = aggregate_by_location(&media, &index);
        let playlists = aggregate_by_playlist(&media, &index);
        let financial =
            include_financial.then(|| self.estimator.compute_financial_reports(&advertisers));

        metrics::counter!("reports.computed").increment(1);
        info!(
            period = period.label(),
            media_rows = media.len(),
            advertisers = advertisers.len(),
            locations = locations.len(),
            playlists = playlists.len(),
            "exposure reports computed"
        );

        ExposureReportSet {
            period: *period,
            generated_at: Utc::now(),
            media,
            advertisers,
            locations,
            playlists,
            financial,
        }
    }

    /// Standalone CPM valuation for already-computed advertiser rows.
    pub fn compute_financial_reports(
        &self,
        advertisers: &[AdvertiserReport],
    ) -> Vec<FinancialReport> {
        self.estimator.compute_financial_reports(advertisers)
    }
}
