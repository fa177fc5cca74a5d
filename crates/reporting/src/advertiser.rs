//! Advertiser roll-up. Sums per-media exposure rows by the advertiser
//! that owns them.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use screenreach_core::inventory::SnapshotIndex;
use screenreach_core::period::{ExposureProjection, ScreenTimeProjection};
use screenreach_exposure::MediaExposureReport;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertiserReport {
    pub advertiser_id: Uuid,
    pub advertiser_name: String,
    pub segment: Option<String>,
    pub media_count: u64,
    /// Distinct locations this advertiser's media plays at.
    pub locations_count: u64,
    /// Summed across media rows, so a location shared by several rows
    /// contributes its screens once per row. Historical report behavior,
    /// kept as is.
    pub monitors_count: u64,
    pub exposures: ExposureProjection,
    pub screen_time: ScreenTimeProjection,
}

struct Bucket<'a> {
    name: &'a str,
    segment: Option<&'a str>,
    media_count: u64,
    monitors_count: u64,
    locations: HashSet<Uuid>,
    exposures: ExposureProjection,
    screen_time: ScreenTimeProjection,
}

/// Group media rows by advertiser. Rows without a resolvable advertiser
/// reference have no bucket to land in and are left out.
pub fn aggregate_by_advertiser(
    rows: &[MediaExposureReport],
    index: &SnapshotIndex<'_>,
) -> Vec<AdvertiserReport> {
    let mut buckets: BTreeMap<Uuid, Bucket<'_>> = BTreeMap::new();

    for row in rows {
        let Some(advertiser_id) = row.advertiser_id else {
            continue;
        };
        let Some(advertiser) = index.advertiser(advertiser_id) else {
            debug!(media_id = %row.media_id, advertiser_id = %advertiser_id, "advertiser reference does not resolve, row left out of advertiser report");
            continue;
        };

        let bucket = buckets.entry(advertiser_id).or_insert_with(|| Bucket {
            name: &advertiser.name,
            segment: advertiser.segment.as_deref(),
            media_count: 0,
            monitors_count: 0,
            locations: HashSet::new(),
            exposures: ExposureProjection::default(),
            screen_time: ScreenTimeProjection::default(),
        });

        bucket.media_count += 1;
        bucket.monitors_count = bucket.monitors_count.saturating_add(row.monitors_count);
        if let Some(location_id) = row.location_id {
            bucket.locations.insert(location_id);
        }
        bucket.exposures.accumulate(&row.exposures);
        bucket.screen_time.accumulate(&row.screen_time);
    }

    buckets
        .into_iter()
        .map(|(advertiser_id, bucket)| AdvertiserReport {
            advertiser_id,
            advertiser_name: bucket.name.to_string(),
            segment: bucket.segment.map(str::to_string),
            media_count: bucket.media_count,
            locations_count: bucket.locations.len() as u64,
            monitors_count: bucket.monitors_count,
            exposures: bucket.exposures,
            screen_time: bucket.screen_time,
        })
        .collect()
}
