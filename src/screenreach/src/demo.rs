//! Demo fixtures: a seeded inventory snapshot, a terminal fleet and a
//! sample commission ledger so the CLI can be tried without a CMS export.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use screenreach_commission::{
    CommissionEngine, CommissionEntry, CommissionStatus, ReferralChain, SettlementEvent,
};
use screenreach_core::config::EngineConfig;
use screenreach_core::inventory::{
    Advertiser, Campaign, InventorySnapshot, Location, MediaItem, Monitor, Terminal,
};

const ADVERTISERS: [(&str, &str); 4] = [
    ("Acme Retail", "retail"),
    ("Bolt Mobility", "services"),
    ("Cafe Central", "food"),
    ("Metro Cinema", "entertainment"),
];

const CAMPAIGN_THEMES: [&str; 4] = ["spring push", "always on", "grand opening", "weekend promo"];

const LOCATIONS: [(&str, &str, &str); 5] = [
    ("Arrabida Mall", "Porto", "Norte"),
    ("Colombo Center", "Lisbon", "Lisboa"),
    ("Braga Parque", "Braga", "Norte"),
    ("Forum Algarve", "Faro", "Algarve"),
    ("Alma Shopping", "Coimbra", "Centro"),
];

const SPOT_DURATIONS: [f64; 5] = [10.0, 15.0, 20.0, 30.0, 45.0];

pub fn cmd_demo(config: &EngineConfig, dir: &str, seed: u64) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    std::fs::create_dir_all(dir).map_err(|e| anyhow::anyhow!("Failed to create {dir}: {e}"))?;

    let snapshot = demo_snapshot(&mut rng);
    let terminals = demo_terminals(&mut rng);
    let ledger = demo_ledger(config, &mut rng)?;

    println!("Demo fixtures written to {dir}/");
    write_file(dir, "snapshot.json", &snapshot)?;
    write_file(dir, "terminals.json", &terminals)?;
    write_file(dir, "ledger.json", &ledger)?;

    println!();
    println!("Try:");
    println!("  screenreach report --snapshot {dir}/snapshot.json --financial");
    println!("  screenreach simulate --terminals {dir}/terminals.json --city Lisbon");
    println!("  screenreach commissions --ledger {dir}/ledger.json --release-matured");
    Ok(())
}

fn demo_snapshot(rng: &mut StdRng) -> InventorySnapshot {
    let advertisers: Vec<Advertiser> = ADVERTISERS
        .iter()
        .map(|(name, segment)| Advertiser {
            id: demo_id(rng),
            name: (*name).to_string(),
            segment: Some((*segment).to_string()),
            active: true,
        })
        .collect();

    let locations: Vec<Location> = LOCATIONS
        .iter()
        .map(|(name, city, region)| Location {
            id: demo_id(rng),
            name: (*name).to_string(),
            city: Some((*city).to_string()),
            state: Some((*region).to_string()),
            commission_percentage: Some((rng.gen_range(10.0..30.0f64) * 10.0).round() / 10.0),
        })
        .collect();

    let mut monitors = Vec::new();
    for location in &locations {
        let screens = rng.gen_range(1..=3);
        for n in 0..screens {
            monitors.push(Monitor {
                id: demo_id(rng),
                name: format!("{} screen {}", location.name, n + 1),
                location_id: Some(location.id),
                active: true,
            });
        }
        if rng.gen_bool(0.2) {
            monitors.push(Monitor {
                id: demo_id(rng),
                name: format!("{} spare", location.name),
                location_id: Some(location.id),
                active: false,
            });
        }
    }

    let now = Utc::now();
    let mut campaigns: Vec<Campaign> = advertisers
        .iter()
        .zip(CAMPAIGN_THEMES.iter())
        .map(|(advertiser, theme)| Campaign {
            id: demo_id(rng),
            name: format!("{} {theme}", advertiser.name),
            advertiser_id: Some(advertiser.id),
            start_date: Some(now - Duration::days(rng.gen_range(10..40))),
            end_date: Some(now + Duration::days(rng.gen_range(20..90))),
            active: true,
        })
        .collect();
    campaigns.push(Campaign {
        id: demo_id(rng),
        name: "House announcements".to_string(),
        advertiser_id: None,
        start_date: None,
        end_date: None,
        active: true,
    });

    let mut media = Vec::new();
    for campaign in &campaigns {
        let spots = rng.gen_range(2..=3);
        for n in 0..spots {
            let location = &locations[rng.gen_range(0..locations.len())];
            media.push(MediaItem {
                id: demo_id(rng),
                name: format!("{} spot {}", campaign.name, n + 1),
                file_name: Some(format!("{}-{}.mp4", slug(&campaign.name), n + 1)),
                duration: Some(SPOT_DURATIONS[rng.gen_range(0..SPOT_DURATIONS.len())]),
                active: true,
                campaign_id: Some(campaign.id),
                location_id: Some(location.id),
                advertiser_id: campaign.advertiser_id,
            });
        }
    }

    // One location-scoped piece and one retired piece, so those report
    // paths have data too.
    media.push(MediaItem {
        id: demo_id(rng),
        name: "Lobby welcome loop".to_string(),
        file_name: Some("lobby-welcome.mp4".to_string()),
        duration: Some(20.0),
        active: true,
        campaign_id: None,
        location_id: Some(locations[0].id),
        advertiser_id: None,
    });
    media.push(MediaItem {
        id: demo_id(rng),
        name: "Retired teaser".to_string(),
        file_name: None,
        duration: Some(30.0),
        active: false,
        campaign_id: Some(campaigns[0].id),
        location_id: None,
        advertiser_id: campaigns[0].advertiser_id,
    });

    InventorySnapshot {
        media,
        monitors,
        locations,
        campaigns,
        advertisers,
    }
}

fn demo_terminals(rng: &mut StdRng) -> Vec<Terminal> {
    let mut terminals = Vec::new();
    for (n, (name, city, _)) in LOCATIONS.iter().copied().cycle().take(12).enumerate() {
        terminals.push(Terminal {
            id: demo_id(rng),
            name: format!("{name} kiosk {}", n + 1),
            city: Some(city.to_string()),
            location_id: None,
            active: rng.gen_bool(0.9),
            daily_audience: Some(rng.gen_range(500.0..5000.0f64).round()),
        });
    }
    terminals
}

fn demo_ledger(config: &EngineConfig, rng: &mut StdRng) -> anyhow::Result<Vec<CommissionEntry>> {
    let engine = CommissionEngine::new(&config.commission);

    let agency = demo_id(rng);
    let master_agency = demo_id(rng);
    let tenants = [demo_id(rng), demo_id(rng), demo_id(rng)];

    let full_chain = ReferralChain {
        direct_referrer: Some(agency),
        indirect_referrer: Some(master_agency),
    };
    let direct_only = ReferralChain {
        direct_referrer: Some(agency),
        indirect_referrer: None,
    };

    let now = Utc::now();
    let mut entries = Vec::new();
    for n in 0..6 {
        let settled_at = now - Duration::days(rng.gen_range(0..90));
        let event = SettlementEvent {
            settlement_id: demo_id(rng),
            tenant_id: tenants[n % tenants.len()],
            base_amount: (rng.gen_range(100.0..800.0f64) * 100.0).round() / 100.0,
            reference_month: settled_at.format("%Y-%m").to_string(),
            settled_at,
        };
        let chain = if n % 3 == 2 { &direct_only } else { &full_chain };
        entries.extend(engine.record_settlement(&event, chain));
    }

    // Move a couple of entries along so the summary shows every bucket.
    engine.release_matured(&mut entries, now);
    if let Some(entry) = entries
        .iter_mut()
        .find(|e| e.status == CommissionStatus::Available)
    {
        entry.mark_processing(now)?;
    }
    if let Some(entry) = entries.last_mut() {
        if entry.status == CommissionStatus::Pending {
            entry.cancel(now)?;
        }
    }

    Ok(entries)
}

fn demo_id(rng: &mut StdRng) -> Uuid {
    Uuid::from_u128(rng.gen())
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn write_file<T: serde::Serialize>(dir: &str, name: &str, value: &T) -> anyhow::Result<()> {
    let path = std::path::Path::new(dir).join(name);
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, json)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
    println!("  {}", path.display());
    Ok(())
}
