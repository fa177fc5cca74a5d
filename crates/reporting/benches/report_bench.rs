//! Benchmarks for the report pipeline over a large synthetic snapshot.
//! Run with: cargo bench

#![allow(unused)]

use screenreach_core::config::EngineConfig;
use screenreach_core::inventory::*;
use screenreach_core::period::ReportPeriod;
use screenreach_reporting::ReportEngine;
use uuid::Uuid;

fn synthetic_snapshot(media_count: usize) -> InventorySnapshot {
    let advertisers: Vec<Advertiser> = (0..50)
        .map(|i| Advertiser {
            id: Uuid::new_v4(),
            name: format!("advertiser-{:02}", i),
            segment: Some("retail".to_string()),
            active: true,
        })
        .collect();

    let locations: Vec<Location> = (0..100)
        .map(|i| Location {
            id: Uuid::new_v4(),
            name: format!("location-{:03}", i),
            city: Some("Porto".to_string()),
            state: None,
            commission_percentage: Some(20.0),
        })
        .collect();

    let campaigns: Vec<Campaign> = (0..200)
        .map(|i| Campaign {
            id: Uuid::new_v4(),
            name: format!("campaign-{:03}", i),
            advertiser_id: Some(advertisers[i % advertisers.len()].id),
            start_date: None,
            end_date: None,
            active: true,
        })
        .collect();

    let monitors: Vec<Monitor> = locations
        .iter()
        .flat_map(|location| {
            (0..3).map(|j| Monitor {
                id: Uuid::new_v4(),
                name: format!("screen-{}", j),
                location_id: Some(location.id),
                active: true,
            })
        })
        .collect();

    let media: Vec<MediaItem> = (0..media_count)
        .map(|i| MediaItem {
            id: Uuid::new_v4(),
            name: format!("media-{:05}", i),
            file_name: Some(format!("media-{:05}.mp4", i)),
            duration: Some(5.0 + (i % 55) as f64),
            active: true,
            campaign_id: Some(campaigns[i % campaigns.len()].id),
            location_id: Some(locations[i % locations.len()].id),
            advertiser_id: Some(advertisers[i % advertisers.len()].id),
        })
        .collect();

    InventorySnapshot {
        media,
        monitors,
        locations,
        campaigns,
        advertisers,
    }
}

fn main() {
    let snapshot = synthetic_snapshot(10_000);
    let engine = ReportEngine::new(&EngineConfig::default());

    // Warmup
    for _ in 0..5 {
        let _ = engine.compute_reports(&snapshot, &ReportPeriod::Month, true);
    }

    // Benchmark
    let iterations = 100u32;
    let start = std::time::Instant::now();

    for _ in 0..iterations {
        let _ = engine.compute_reports(&snapshot, &ReportPeriod::Month, true);
    }

    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations;

    println!("=== Report Pipeline Benchmark ===");
    println!("Media items: {}", snapshot.media.len());
    println!("Iterations:  {}", iterations);
    println!("Total time:  {:?}", elapsed);
    println!("Per run:     {:?}", per_iter);
    println!(
        "Throughput:  {:.0} runs/sec",
        iterations as f64 / elapsed.as_secs_f64()
    );
}
