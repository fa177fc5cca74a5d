//! Content fingerprints for report cache keys.
//!
//! Two snapshots with the same content must map to the same key, so the
//! hash walks every field that can change report output instead of relying
//! on serialized bytes. Floats are fed as raw bits, which keeps NaN and
//! negative zero stable across runs. Strings are length-prefixed and
//! optional fields carry a presence tag so adjacent values cannot blur
//! into each other.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use screenreach_core::inventory::InventorySnapshot;
use screenreach_core::period::ReportPeriod;

/// Cache key for one report request: snapshot content, requested period
/// and whether financial rows were asked for.
pub fn report_cache_key(
    snapshot: &InventorySnapshot,
    period: &ReportPeriod,
    include_financial: bool,
) -> String {
    let mut hasher = Sha256::new();

    feed_section(&mut hasher, "media", snapshot.media.len());
    for media in &snapshot.media {
        feed_uuid(&mut hasher, media.id);
        feed_str(&mut hasher, &media.name);
        feed_opt_str(&mut hasher, media.file_name.as_deref());
        feed_opt_f64(&mut hasher, media.duration);
        feed_bool(&mut hasher, media.active);
        feed_opt_uuid(&mut hasher, media.campaign_id);
        feed_opt_uuid(&mut hasher, media.location_id);
        feed_opt_uuid(&mut hasher, media.advertiser_id);
    }

    feed_section(&mut hasher, "monitors", snapshot.monitors.len());
    for monitor in &snapshot.monitors {
        feed_uuid(&mut hasher, monitor.id);
        feed_opt_uuid(&mut hasher, monitor.location_id);
        feed_bool(&mut hasher, monitor.active);
    }

    feed_section(&mut hasher, "locations", snapshot.locations.len());
    for location in &snapshot.locations {
        feed_uuid(&mut hasher, location.id);
        feed_str(&mut hasher, &location.name);
        feed_opt_str(&mut hasher, location.city.as_deref());
        feed_opt_str(&mut hasher, location.state.as_deref());
        feed_opt_f64(&mut hasher, location.commission_percentage);
    }

    feed_section(&mut hasher, "campaigns", snapshot.campaigns.len());
    for campaign in &snapshot.campaigns {
        feed_uuid(&mut hasher, campaign.id);
        feed_str(&mut hasher, &campaign.name);
        feed_opt_uuid(&mut hasher, campaign.advertiser_id);
        feed_opt_i64(
            &mut hasher,
            campaign.start_date.map(|d| d.timestamp_millis()),
        );
        feed_opt_i64(&mut hasher, campaign.end_date.map(|d| d.timestamp_millis()));
        feed_bool(&mut hasher, campaign.active);
    }

    feed_section(&mut hasher, "advertisers", snapshot.advertisers.len());
    for advertiser in &snapshot.advertisers {
        feed_uuid(&mut hasher, advertiser.id);
        feed_str(&mut hasher, &advertiser.name);
        feed_opt_str(&mut hasher, advertiser.segment.as_deref());
        feed_bool(&mut hasher, advertiser.active);
    }

    feed_str(&mut hasher, period.label());
    if let ReportPeriod::Custom { start, end } = period {
        hasher.update(start.timestamp_millis().to_le_bytes());
        hasher.update(end.timestamp_millis().to_le_bytes());
    }
    feed_bool(&mut hasher, include_financial);

    hex::encode(hasher.finalize())
}

fn feed_section(hasher: &mut Sha256, tag: &str, len: usize) {
    hasher.update(tag.as_bytes());
    hasher.update((len as u64).to_le_bytes());
}

fn feed_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn feed_opt_str(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update([1]);
            feed_str(hasher, v);
        }
        None => hasher.update([0]),
    }
}

fn feed_uuid(hasher: &mut Sha256, id: Uuid) {
    hasher.update(id.as_bytes());
}

fn feed_opt_uuid(hasher: &mut Sha256, id: Option<Uuid>) {
    match id {
        Some(v) => {
            hasher.update([1]);
            feed_uuid(hasher, v);
        }
        None => hasher.update([0]),
    }
}

fn feed_opt_f64(hasher: &mut Sha256, value: Option<f64>) {
    match value {
        Some(v) => {
            hasher.update([1]);
            hasher.update(v.to_bits().to_le_bytes());
        }
        None => hasher.update([0]),
    }
}

fn feed_opt_i64(hasher: &mut Sha256, value: Option<i64>) {
    match value {
        Some(v) => {
            hasher.update([1]);
            hasher.update(v.to_le_bytes());
        }
        None => hasher.update([0]),
    }
}

fn feed_bool(hasher: &mut Sha256, value: bool) {
    hasher.update([u8::from(value)]);
}
