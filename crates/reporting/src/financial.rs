//! CPM valuation of aggregated exposure.
//!
//! These figures are advisory. The reference CPM is a configured constant,
//! not a market rate, and every report row is labeled accordingly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use screenreach_core::config::FinancialConfig;

use crate::advertiser::AdvertiserReport;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Marker carried on every financial row so exports cannot present the
/// number as billed revenue.
pub const ESTIMATE_BASIS: &str = "estimate";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialReport {
    pub advertiser_id: Uuid,
    pub advertiser_name: String,
    pub monthly_exposures: u64,
    pub estimated_monthly_value: f64,
    pub estimated_yearly_value: f64,
    pub cpm_reference: f64,
    pub basis: String,
}

pub struct FinancialEstimator {
    cpm_reference: f64,
}

impl FinancialEstimator {
    pub fn new(config: &FinancialConfig) -> Self {
        Self {
            cpm_reference: config.cpm_reference,
        }
    }

    /// Value of `monthly_exposures` at the reference CPM.
    pub fn monthly_value(&self, monthly_exposures: u64) -> f64 {
        monthly_exposures as f64 / 1000.0 * self.cpm_reference
    }

    /// One financial row per advertiser report, valued at the reference CPM.
    pub fn compute_financial_reports(
        &self,
        advertisers: &[AdvertiserReport],
    ) -> Vec<FinancialReport> {
        advertisers
            .iter()
            .map(|report| {
                let monthly = self.monthly_value(report.exposures.per_month);
                FinancialReport {
                    advertiser_id: report.advertiser_id,
                    advertiser_name: report.advertiser_name.clone(),
                    monthly_exposures: report.exposures.per_month,
                    estimated_monthly_value: monthly,
                    estimated_yearly_value: monthly * MONTHS_PER_YEAR,
                    cpm_reference: self.cpm_reference,
                    basis: ESTIMATE_BASIS.to_string(),
                }
            })
            .collect()
    }
}
