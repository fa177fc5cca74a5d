//! Integration test for the full snapshot-to-reports flow.
//! Everything runs in memory; no services required.

#[cfg(test)]
mod tests {
    use screenreach_core::config::EngineConfig;
    use screenreach_core::inventory::*;
    use screenreach_core::period::ReportPeriod;
    use screenreach_reporting::{ReportEngine, INTERNAL_ADVERTISER_LABEL};
    use uuid::Uuid;

    struct Fixture {
        snapshot: InventorySnapshot,
        acme: Uuid,
        bolt: Uuid,
        campaign_a: Uuid,
        campaign_c: Uuid,
        mall: Uuid,
    }

    /// Two advertisers, one venue with screens, one active campaign with a
    /// two-item loop, one inactive campaign, one house campaign, plus an
    /// orphan item and a dangling advertiser reference.
    fn sample_snapshot() -> Fixture {
        let acme = Uuid::new_v4();
        let bolt = Uuid::new_v4();
        let campaign_a = Uuid::new_v4();
        let campaign_b = Uuid::new_v4();
        let campaign_c = Uuid::new_v4();
        let mall = Uuid::new_v4();

        let media = |name: &str,
                     duration: f64,
                     campaign: Option<Uuid>,
                     location: Option<Uuid>,
                     advertiser: Option<Uuid>| MediaItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            file_name: None,
            duration: Some(duration),
            active: true,
            campaign_id: campaign,
            location_id: location,
            advertiser_id: advertiser,
        };

        let snapshot = InventorySnapshot {
            media: vec![
                // Campaign A loop: 15 + 45 = 60s cycle.
                media("acme-spring", 15.0, Some(campaign_a), Some(mall), Some(acme)),
                media("acme-promo", 45.0, Some(campaign_a), None, Some(acme)),
                // Location playlist at the mall: 30s loop of one item.
                media("bolt-teaser", 30.0, None, Some(mall), Some(bolt)),
                // Campaign B is inactive, row still reports.
                media("bolt-retired", 60.0, Some(campaign_b), None, Some(bolt)),
                // House campaign without an advertiser.
                media("lobby-notice", 20.0, Some(campaign_c), None, None),
                // Advertiser reference that resolves to nothing.
                media("ghost", 10.0, None, Some(mall), Some(Uuid::new_v4())),
                // No campaign, no location: not playable.
                media("orphan", 10.0, None, None, Some(acme)),
            ],
            monitors: vec![
                Monitor {
                    id: Uuid::new_v4(),
                    name: "mall-east".to_string(),
                    location_id: Some(mall),
                    active: true,
                },
                Monitor {
                    id: Uuid::new_v4(),
                    name: "mall-west".to_string(),
                    location_id: Some(mall),
                    active: true,
                },
                Monitor {
                    id: Uuid::new_v4(),
                    name: "mall-storage".to_string(),
                    location_id: Some(mall),
                    active: false,
                },
            ],
            locations: vec![Location {
                id: mall,
                name: "Harbor Mall".to_string(),
                city: Some("Porto".to_string()),
                state: None,
                commission_percentage: Some(150.0),
            }],
            campaigns: vec![
                Campaign {
                    id: campaign_a,
                    name: "Spring Push".to_string(),
                    advertiser_id: Some(acme),
                    start_date: None,
                    end_date: None,
                    active: true,
                },
                Campaign {
                    id: campaign_b,
                    name: "Retired".to_string(),
                    advertiser_id: Some(bolt),
                    start_date: None,
                    end_date: None,
                    active: false,
                },
                Campaign {
                    id: campaign_c,
                    name: "House Notices".to_string(),
                    advertiser_id: None,
                    start_date: None,
                    end_date: None,
                    active: true,
                },
            ],
            advertisers: vec![
                Advertiser {
                    id: acme,
                    name: "Acme".to_string(),
                    segment: Some("retail".to_string()),
                    active: true,
                },
                Advertiser {
                    id: bolt,
                    name: "Bolt".to_string(),
                    segment: None,
                    active: true,
                },
            ],
        };

        Fixture {
            snapshot,
            acme,
            bolt,
            campaign_a,
            campaign_c,
            mall,
        }
    }

    fn engine() -> ReportEngine {
        ReportEngine::new(&EngineConfig::default())
    }

    #[test]
    fn advertiser_totals_equal_sum_of_media_rows() {
        let fixture = sample_snapshot();
        let set = engine().compute_reports(&fixture.snapshot, &ReportPeriod::Month, false);

        for advertiser in &set.advertisers {
            let from_rows: u64 = set
                .media
                .iter()
                .filter(|row| row.advertiser_id == Some(advertiser.advertiser_id))
                .map(|row| row.exposures.per_day)
                .sum();
            assert_eq!(
                advertiser.exposures.per_day, from_rows,
                "advertiser {} totals drifted from its media rows",
                advertiser.advertiser_name
            );
        }
    }

    #[test]
    fn known_snapshot_produces_known_numbers() {
        let fixture = sample_snapshot();
        let set = engine().compute_reports(&fixture.snapshot, &ReportPeriod::Day, false);

        // Orphan item dropped, everything else reported.
        assert_eq!(set.media.len(), 6);

        let acme = set
            .advertisers
            .iter()
            .find(|a| a.advertiser_id == fixture.acme)
            .expect("acme report");
        // Campaign A cycle is 60s: 60/hr. Mall has 2 active screens, so the
        // located item projects 60*12*2 and the unlocated one 60*12*1.
        assert_eq!(acme.media_count, 2);
        assert_eq!(acme.exposures.per_day, 60 * 12 * 2 + 60 * 12);
        assert_eq!(acme.locations_count, 1);
        assert_eq!(acme.monitors_count, 3);
        assert_eq!(acme.segment.as_deref(), Some("retail"));

        let bolt = set
            .advertisers
            .iter()
            .find(|a| a.advertiser_id == fixture.bolt)
            .expect("bolt report");
        // The mall's location loop is teaser + ghost = 40s, so 90/hr on 2
        // screens, plus the retired campaign's 60/hr item on one screen.
        assert_eq!(bolt.exposures.per_day, 90 * 12 * 2 + 60 * 12);

        // The ghost advertiser reference never becomes a report row.
        assert_eq!(set.advertisers.len(), 2);
    }

    #[test]
    fn location_report_counts_distinct_advertisers_and_clamps_commission() {
        let fixture = sample_snapshot();
        let set = engine().compute_reports(&fixture.snapshot, &ReportPeriod::Day, false);

        assert_eq!(set.locations.len(), 1);
        let mall = &set.locations[0];
        assert_eq!(mall.location_id, fixture.mall);
        // acme-spring, bolt-teaser and ghost all play at the mall.
        assert_eq!(mall.media_count, 3);
        // Distinct advertiser ids present on those rows, resolvable or not.
        assert_eq!(mall.total_advertisers, 3);
        assert_eq!(mall.monitors_count, 2);
        assert!((mall.commission_percentage - 100.0).abs() < f64::EPSILON);
        assert_eq!(mall.city.as_deref(), Some("Porto"));
    }

    #[test]
    fn playlist_report_keeps_active_campaigns_and_labels_house_content() {
        let fixture = sample_snapshot();
        let set = engine().compute_reports(&fixture.snapshot, &ReportPeriod::Day, false);

        assert_eq!(set.playlists.len(), 2);

        let spring = set
            .playlists
            .iter()
            .find(|p| p.campaign_id == fixture.campaign_a)
            .expect("active campaign report");
        assert_eq!(spring.advertiser_name, "Acme");
        assert_eq!(spring.media_count, 2);
        assert_eq!(spring.locations_count, 1);

        let house = set
            .playlists
            .iter()
            .find(|p| p.campaign_id == fixture.campaign_c)
            .expect("house campaign report");
        assert_eq!(house.advertiser_name, INTERNAL_ADVERTISER_LABEL);
        assert!(house.advertiser_id.is_none());
    }

    #[test]
    fn weekly_period_scales_daily_totals_sevenfold() {
        let fixture = sample_snapshot();
        let set = engine().compute_reports(&fixture.snapshot, &ReportPeriod::Week, false);

        for advertiser in &set.advertisers {
            assert_eq!(
                advertiser.exposures.in_period,
                advertiser.exposures.per_day * 7
            );
            assert_eq!(
                advertiser.exposures.per_year,
                advertiser.exposures.per_day * 365
            );
        }
    }

    #[test]
    fn financial_reports_value_monthly_exposures_at_reference_cpm() {
        let fixture = sample_snapshot();
        let set = engine().compute_reports(&fixture.snapshot, &ReportPeriod::Month, true);
        let financial = set.financial.expect("financial requested");

        assert_eq!(financial.len(), set.advertisers.len());
        for row in &financial {
            let advertiser = set
                .advertisers
                .iter()
                .find(|a| a.advertiser_id == row.advertiser_id)
                .expect("matching advertiser");
            let expected = advertiser.exposures.per_month as f64 / 1000.0 * 5.0;
            assert!((row.estimated_monthly_value - expected).abs() < 1e-9);
            assert!((row.estimated_yearly_value - expected * 12.0).abs() < 1e-9);
            assert_eq!(row.basis, "estimate");
        }
    }

    #[test]
    fn recomputation_is_deterministic() {
        let fixture = sample_snapshot();
        let engine = engine();

        let first = engine.compute_reports(&fixture.snapshot, &ReportPeriod::Month, true);
        let second = engine.compute_reports(&fixture.snapshot, &ReportPeriod::Month, true);

        let rows = |set: &screenreach_reporting::ExposureReportSet| {
            serde_json::json!({
                "media": set.media,
                "advertisers": set.advertisers,
                "locations": set.locations,
                "playlists": set.playlists,
                "financial": set.financial,
            })
        };
        assert_eq!(rows(&first), rows(&second));
    }
}
