//! Campaign playlist roll-up: exposure totals per active campaign.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use screenreach_core::inventory::SnapshotIndex;
use screenreach_core::period::{ExposureProjection, ScreenTimeProjection};
use screenreach_exposure::MediaExposureReport;

/// Shown when a campaign has no billable advertiser, e.g. house content.
pub const INTERNAL_ADVERTISER_LABEL: &str = "Internal";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistReport {
    pub campaign_id: Uuid,
    pub campaign_name: String,
    pub advertiser_id: Option<Uuid>,
    pub advertiser_name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub media_count: u64,
    /// Distinct locations the campaign's media plays at.
    pub locations_count: u64,
    pub exposures: ExposureProjection,
    pub screen_time: ScreenTimeProjection,
}

struct Bucket<'a> {
    name: &'a str,
    advertiser_id: Option<Uuid>,
    advertiser_name: String,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    media_count: u64,
    locations: HashSet<Uuid>,
    exposures: ExposureProjection,
    screen_time: ScreenTimeProjection,
}

/// Group media rows by campaign, active campaigns only.
pub fn aggregate_by_playlist(
    rows: &[MediaExposureReport],
    index: &SnapshotIndex<'_>,
) -> Vec<PlaylistReport> {
    let mut buckets: BTreeMap<Uuid, Bucket<'_>> = BTreeMap::new();

    for row in rows {
        let Some(campaign_id) = row.campaign_id else {
            continue;
        };
        let Some(campaign) = index.campaign(campaign_id) else {
            continue;
        };
        if !campaign.active {
            continue;
        }

        let bucket = buckets.entry(campaign_id).or_insert_with(|| {
            let advertiser_name = campaign
                .advertiser_id
                .and_then(|id| index.advertiser(id))
                .map(|a| a.name.clone())
                .unwrap_or_else(|| INTERNAL_ADVERTISER_LABEL.to_string());
            Bucket {
                name: &campaign.name,
                advertiser_id: campaign.advertiser_id,
                advertiser_name,
                start_date: campaign.start_date,
                end_date: campaign.end_date,
                media_count: 0,
                locations: HashSet::new(),
                exposures: ExposureProjection::default(),
                screen_time: ScreenTimeProjection::default(),
            }
        });

        bucket.media_count += 1;
        if let Some(location_id) = row.location_id {
            bucket.locations.insert(location_id);
        }
        bucket.exposures.accumulate(&row.exposures);
        bucket.screen_time.accumulate(&row.screen_time);
    }

    buckets
        .into_iter()
        .map(|(campaign_id, bucket)| PlaylistReport {
            campaign_id,
            campaign_name: bucket.name.to_string(),
            advertiser_id: bucket.advertiser_id,
            advertiser_name: bucket.advertiser_name,
            start_date: bucket.start_date,
            end_date: bucket.end_date,
            media_count: bucket.media_count,
            locations_count: bucket.locations.len() as u64,
            exposures: bucket.exposures,
            screen_time: bucket.screen_time,
        })
        .collect()
}
