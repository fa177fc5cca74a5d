//! Per-media exposure math.
//!
//! An exposure is one complete on-screen play of a media item. Frequency
//! follows from the playlist loop: a loop of `cycle` seconds repeats
//! `floor(3600 / cycle)` times per hour, and each member of the loop is
//! shown exactly once per repetition. Daily figures then scale by venue
//! operating hours and by how many active screens run the playlist.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use screenreach_core::config::ExposureConfig;
use screenreach_core::inventory::{InventorySnapshot, PlaybackScope, SnapshotIndex};
use screenreach_core::period::{ExposureProjection, ReportPeriod, ScreenTimeProjection};

use crate::cycle::CycleIndex;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Exposure estimate for one media item, with ownership names denormalized
/// so downstream consumers never need the snapshot again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaExposureReport {
    pub media_id: Uuid,
    pub media_name: String,
    pub file_name: Option<String>,
    pub duration_secs: f64,
    pub scope: PlaybackScope,
    pub campaign_id: Option<Uuid>,
    pub campaign_name: Option<String>,
    pub advertiser_id: Option<Uuid>,
    pub advertiser_name: Option<String>,
    pub location_id: Option<Uuid>,
    pub location_name: Option<String>,
    /// Active screens the daily figure was multiplied by, never zero.
    pub monitors_count: u64,
    pub cycle_duration_secs: f64,
    pub exposures_per_hour: u64,
    pub exposures: ExposureProjection,
    pub screen_time: ScreenTimeProjection,
}

pub struct ExposureEngine {
    hours_per_day: u32,
    default_media_duration_secs: f64,
}

impl ExposureEngine {
    pub fn new(config: &ExposureConfig) -> Self {
        Self {
            hours_per_day: config.hours_per_day,
            default_media_duration_secs: config.default_media_duration_secs,
        }
    }

    pub fn default_media_duration_secs(&self) -> f64 {
        self.default_media_duration_secs
    }

    /// Compute one report row per active media item. Media without a
    /// campaign or location assignment is not in any playlist and is
    /// skipped with a warning rather than reported as zero.
    pub fn compute_media_reports(
        &self,
        snapshot: &InventorySnapshot,
        index: &SnapshotIndex<'_>,
        cycles: &CycleIndex,
        period: &ReportPeriod,
    ) -> Vec<MediaExposureReport> {
        let mut reports = Vec::with_capacity(snapshot.media.len());

        for item in snapshot.active_media() {
            let Some(scope) = item.playback_scope() else {
                warn!(media_id = %item.id, media_name = %item.name, "media has no campaign or location, excluded from report");
                continue;
            };

            let duration = item.effective_duration(self.default_media_duration_secs);
            let cycle = cycles.cycle_duration(scope);
            let exposures_per_hour = if cycle > 0.0 {
                (SECONDS_PER_HOUR / cycle).floor() as u64
            } else {
                0
            };

            let monitors_count = index.monitors_for_projection(item.location_id);
            let per_day = exposures_per_hour
                .saturating_mul(self.hours_per_day as u64)
                .saturating_mul(monitors_count);

            let campaign = item.campaign_id.and_then(|id| index.campaign(id));
            let advertiser = index.advertiser_for_media(item);
            let location = item.location_id.and_then(|id| index.location(id));

            reports.push(MediaExposureReport {
                media_id: item.id,
                media_name: item.name.clone(),
                file_name: item.file_name.clone(),
                duration_secs: duration,
                scope,
                campaign_id: item.campaign_id,
                campaign_name: campaign.map(|c| c.name.clone()),
                advertiser_id: item.advertiser_id,
                advertiser_name: advertiser.map(|a| a.name.clone()),
                location_id: item.location_id,
                location_name: location.map(|l| l.name.clone()),
                monitors_count,
                cycle_duration_secs: cycle,
                exposures_per_hour,
                exposures: ExposureProjection::from_daily(per_day, period),
                screen_time: ScreenTimeProjection::from_daily(per_day as f64 * duration, period),
            });
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenreach_core::inventory::{Location, MediaItem, Monitor};

    fn media(
        name: &str,
        duration: Option<f64>,
        campaign: Option<Uuid>,
        location: Option<Uuid>,
    ) -> MediaItem {
        MediaItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            file_name: None,
            duration,
            active: true,
            campaign_id: campaign,
            location_id: location,
            advertiser_id: None,
        }
    }

    fn monitor(location: Uuid, active: bool) -> Monitor {
        Monitor {
            id: Uuid::new_v4(),
            name: "screen".to_string(),
            location_id: Some(location),
            active,
        }
    }

    fn engine() -> ExposureEngine {
        ExposureEngine::new(&ExposureConfig::default())
    }

    #[test]
    fn hourly_rate_is_floor_of_cycle_fits() {
        let campaign = Uuid::new_v4();
        let snapshot = InventorySnapshot {
            media: vec![
                media("a", Some(10.0), Some(campaign), None),
                media("b", Some(15.0), Some(campaign), None),
                media("c", Some(30.0), Some(campaign), None),
            ],
            ..Default::default()
        };
        let index = SnapshotIndex::build(&snapshot);
        let cycles = CycleIndex::build(&snapshot, 10.0);

        let reports =
            engine().compute_media_reports(&snapshot, &index, &cycles, &ReportPeriod::Day);
        assert_eq!(reports.len(), 3);

        // 3600 / 55 = 65.45 loop plays per hour, floored to 65 and shared
        // by every item in the loop.
        for report in &reports {
            assert!((report.cycle_duration_secs - 55.0).abs() < f64::EPSILON);
            assert_eq!(report.exposures_per_hour, 65);
            assert_eq!(report.monitors_count, 1);
            assert_eq!(report.exposures.per_day, 65 * 12);
        }
    }

    #[test]
    fn daily_exposures_scale_with_active_monitors() {
        let location = Uuid::new_v4();
        let snapshot = InventorySnapshot {
            media: vec![media("a", Some(30.0), None, Some(location))],
            monitors: vec![
                monitor(location, true),
                monitor(location, true),
                monitor(location, false),
            ],
            locations: vec![Location {
                id: location,
                name: "Mall".to_string(),
                city: None,
                state: None,
                commission_percentage: Some(20.0),
            }],
            ..Default::default()
        };
        let index = SnapshotIndex::build(&snapshot);
        let cycles = CycleIndex::build(&snapshot, 10.0);

        let reports =
            engine().compute_media_reports(&snapshot, &index, &cycles, &ReportPeriod::Day);
        let report = &reports[0];

        assert_eq!(report.exposures_per_hour, 120);
        assert_eq!(report.monitors_count, 2);
        assert_eq!(report.exposures.per_day, 120 * 12 * 2);
        assert_eq!(report.location_name.as_deref(), Some("Mall"));
        assert!((report.screen_time.per_day - (120.0 * 12.0 * 2.0 * 30.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_cycle_produces_zero_exposures_without_panicking() {
        let campaign = Uuid::new_v4();
        let snapshot = InventorySnapshot {
            media: vec![media("a", None, Some(campaign), None)],
            ..Default::default()
        };
        let index = SnapshotIndex::build(&snapshot);
        // A default duration of zero collapses the whole cycle to zero.
        let cycles = CycleIndex::build(&snapshot, 0.0);

        let config = ExposureConfig {
            default_media_duration_secs: 0.0,
            ..ExposureConfig::default()
        };
        let reports = ExposureEngine::new(&config).compute_media_reports(
            &snapshot,
            &index,
            &cycles,
            &ReportPeriod::Day,
        );
        assert_eq!(reports[0].exposures_per_hour, 0);
        assert_eq!(reports[0].exposures.per_day, 0);
    }

    #[test]
    fn orphaned_and_inactive_media_are_excluded() {
        let campaign = Uuid::new_v4();
        let mut snapshot = InventorySnapshot {
            media: vec![
                media("orphan", Some(10.0), None, None),
                media("paused", Some(10.0), Some(campaign), None),
            ],
            ..Default::default()
        };
        snapshot.media[1].active = false;

        let index = SnapshotIndex::build(&snapshot);
        let cycles = CycleIndex::build(&snapshot, 10.0);
        let reports =
            engine().compute_media_reports(&snapshot, &index, &cycles, &ReportPeriod::Day);
        assert!(reports.is_empty());
    }

    #[test]
    fn projection_follows_requested_period() {
        let campaign = Uuid::new_v4();
        let snapshot = InventorySnapshot {
            media: vec![media("a", Some(60.0), Some(campaign), None)],
            ..Default::default()
        };
        let index = SnapshotIndex::build(&snapshot);
        let cycles = CycleIndex::build(&snapshot, 10.0);

        let reports =
            engine().compute_media_reports(&snapshot, &index, &cycles, &ReportPeriod::Week);
        let report = &reports[0];

        assert_eq!(report.exposures.per_day, 60 * 12);
        assert_eq!(report.exposures.in_period, 60 * 12 * 7);
        assert_eq!(report.exposures.per_year, 60 * 12 * 365);
    }
}
