//! Location roll-up: what each venue's screens are showing and for whom.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use screenreach_core::inventory::SnapshotIndex;
use screenreach_core::period::{ExposureProjection, ScreenTimeProjection};
use screenreach_exposure::MediaExposureReport;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationReport {
    pub location_id: Uuid,
    pub location_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Venue revenue share, clamped to 0..=100.
    pub commission_percentage: f64,
    /// Active screens registered at the venue. Zero is possible here even
    /// though projections floor the multiplier at one.
    pub monitors_count: u64,
    pub media_count: u64,
    /// Distinct advertisers with media at this venue.
    pub total_advertisers: u64,
    pub exposures: ExposureProjection,
    pub screen_time: ScreenTimeProjection,
}

struct Bucket<'a> {
    name: &'a str,
    city: Option<&'a str>,
    state: Option<&'a str>,
    commission_percentage: f64,
    media_count: u64,
    advertisers: HashSet<Uuid>,
    exposures: ExposureProjection,
    screen_time: ScreenTimeProjection,
}

/// Group media rows by the location they play at. Only venues with at
/// least one active media item appear.
pub fn aggregate_by_location(
    rows: &[MediaExposureReport],
    index: &SnapshotIndex<'_>,
) -> Vec<LocationReport> {
    let mut buckets: BTreeMap<Uuid, Bucket<'_>> = BTreeMap::new();

    for row in rows {
        let Some(location_id) = row.location_id else {
            continue;
        };
        let Some(location) = index.location(location_id) else {
            debug!(media_id = %row.media_id, location_id = %location_id, "location reference does not resolve, row left out of location report");
            continue;
        };

        let bucket = buckets.entry(location_id).or_insert_with(|| Bucket {
            name: &location.name,
            city: location.city.as_deref(),
            state: location.state.as_deref(),
            commission_percentage: location.effective_commission_percentage(),
            media_count: 0,
            advertisers: HashSet::new(),
            exposures: ExposureProjection::default(),
            screen_time: ScreenTimeProjection::default(),
        });

        bucket.media_count += 1;
        if let Some(advertiser_id) = row.advertiser_id {
            bucket.advertisers.insert(advertiser_id);
        }
        bucket.exposures.accumulate(&row.exposures);
        bucket.screen_time.accumulate(&row.screen_time);
    }

    buckets
        .into_iter()
        .map(|(location_id, bucket)| LocationReport {
            location_id,
            location_name: bucket.name.to_string(),
            city: bucket.city.map(str::to_string),
            state: bucket.state.map(str::to_string),
            commission_percentage: bucket.commission_percentage,
            monitors_count: index.active_monitor_count(location_id),
            media_count: bucket.media_count,
            total_advertisers: bucket.advertisers.len() as u64,
            exposures: bucket.exposures,
            screen_time: bucket.screen_time,
        })
        .collect()
}
