//! Inventory snapshot types: the point-in-time export of media, screens,
//! locations, campaigns and advertisers that every report is computed from.
//!
//! Snapshots arrive as JSON produced by the CMS, so field names follow its
//! camelCase convention and parsing is deliberately forgiving: missing
//! arrays become empty, missing flags take safe defaults, and non-numeric
//! values are treated as absent rather than failing the whole snapshot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Scope a media item plays under. Campaign assignment wins over a plain
/// location assignment when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PlaybackScope {
    Campaign(Uuid),
    Location(Uuid),
}

/// A single piece of creative content in a playlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Playback length in seconds. May be absent or junk in real exports.
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub campaign_id: Option<Uuid>,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default)]
    pub advertiser_id: Option<Uuid>,
}

impl MediaItem {
    /// The playlist this item belongs to, campaign scope taking precedence.
    /// Returns `None` for orphaned media that is in no playlist at all.
    pub fn playback_scope(&self) -> Option<PlaybackScope> {
        self.campaign_id
            .map(PlaybackScope::Campaign)
            .or(self.location_id.map(PlaybackScope::Location))
    }

    /// Duration usable in arithmetic: missing, zero, negative or NaN
    /// durations fall back to the configured default.
    pub fn effective_duration(&self, default_secs: f64) -> f64 {
        match self.duration {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => default_secs,
        }
    }
}

/// A physical screen at a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Revenue share owed to the venue owner, as a percentage.
    #[serde(default, deserialize_with = "lenient_number")]
    pub commission_percentage: Option<f64>,
}

impl Location {
    /// Commission clamped to a sane percentage range.
    pub fn effective_commission_percentage(&self) -> f64 {
        match self.commission_percentage {
            Some(c) if c.is_finite() => c.clamp(0.0, 100.0),
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub advertiser_id: Option<Uuid>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertiser {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A player device eligible for budget simulations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terminal {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Average people passing the screen per day, per the venue's own count.
    #[serde(default, deserialize_with = "lenient_number")]
    pub daily_audience: Option<f64>,
}

impl Terminal {
    /// Audience usable in arithmetic: negative or NaN counts become zero.
    pub fn effective_daily_audience(&self) -> f64 {
        match self.daily_audience {
            Some(a) if a.is_finite() && a > 0.0 => a,
            _ => 0.0,
        }
    }
}

/// Point-in-time inventory export. All collections are optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default)]
    pub monitors: Vec<Monitor>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub advertisers: Vec<Advertiser>,
}

impl InventorySnapshot {
    pub fn is_empty(&self) -> bool {
        self.media.is_empty() && self.monitors.is_empty() && self.locations.is_empty()
    }

    /// Media that is eligible for playback and therefore for reporting.
    pub fn active_media(&self) -> impl Iterator<Item = &MediaItem> {
        self.media.iter().filter(|m| m.active)
    }
}

/// Lookup tables over a borrowed snapshot. Built once per report run so the
/// per-media hot path never scans the raw vectors. Duplicate ids keep the
/// last occurrence, matching how the CMS resolves re-exports.
pub struct SnapshotIndex<'a> {
    locations: HashMap<Uuid, &'a Location>,
    campaigns: HashMap<Uuid, &'a Campaign>,
    advertisers: HashMap<Uuid, &'a Advertiser>,
    active_monitors: HashMap<Uuid, u64>,
}

impl<'a> SnapshotIndex<'a> {
    pub fn build(snapshot: &'a InventorySnapshot) -> Self {
        let locations = snapshot.locations.iter().map(|l| (l.id, l)).collect();
        let campaigns = snapshot.campaigns.iter().map(|c| (c.id, c)).collect();
        let advertisers = snapshot.advertisers.iter().map(|a| (a.id, a)).collect();

        let mut active_monitors: HashMap<Uuid, u64> = HashMap::new();
        for monitor in &snapshot.monitors {
            if let (true, Some(location_id)) = (monitor.active, monitor.location_id) {
                *active_monitors.entry(location_id).or_insert(0) += 1;
            }
        }

        Self {
            locations,
            campaigns,
            advertisers,
            active_monitors,
        }
    }

    pub fn location(&self, id: Uuid) -> Option<&'a Location> {
        self.locations.get(&id).copied()
    }

    pub fn campaign(&self, id: Uuid) -> Option<&'a Campaign> {
        self.campaigns.get(&id).copied()
    }

    pub fn advertiser(&self, id: Uuid) -> Option<&'a Advertiser> {
        self.advertisers.get(&id).copied()
    }

    /// Active screens registered at a location.
    pub fn active_monitor_count(&self, location_id: Uuid) -> u64 {
        self.active_monitors.get(&location_id).copied().unwrap_or(0)
    }

    /// Screen count used when multiplying daily exposures. A location with
    /// no registered screens still plays on at least one device.
    pub fn monitors_for_projection(&self, location_id: Option<Uuid>) -> u64 {
        location_id
            .map(|id| self.active_monitor_count(id))
            .unwrap_or(0)
            .max(1)
    }

    /// Advertiser a media item bills to, if the reference resolves.
    pub fn advertiser_for_media(&self, media: &MediaItem) -> Option<&'a Advertiser> {
        self.advertiser(media.advertiser_id?)
    }
}

fn default_active() -> bool {
    true
}

/// Accepts numbers, numeric strings, null, or garbage. Anything that is not
/// a usable number deserializes to `None` instead of rejecting the snapshot.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}
