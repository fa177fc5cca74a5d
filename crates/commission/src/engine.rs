//! Two-level referral commissions over a ledger of settlement events.
//!
//! The engine never resolves who referred whom; the referral chain comes
//! from the tenant directory alongside each settlement. It only prices
//! the levels, enforces the lock period, and sums the ledger.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use screenreach_core::config::CommissionConfig;

use crate::ledger::{CommissionEntry, CommissionLevel, CommissionStatus};

/// A referred tenant's invoice that has settled. The billing collaborator
/// emits one of these per invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementEvent {
    pub settlement_id: Uuid,
    pub tenant_id: Uuid,
    pub base_amount: f64,
    /// Billing month of the invoice, `YYYY-MM`.
    pub reference_month: String,
    pub settled_at: DateTime<Utc>,
}

impl SettlementEvent {
    /// Invoice amount usable in arithmetic: negative or NaN becomes zero.
    pub fn sanitized_base_amount(&self) -> f64 {
        if self.base_amount.is_finite() && self.base_amount > 0.0 {
            self.base_amount
        } else {
            0.0
        }
    }
}

/// Who gets paid for this tenant, as resolved by the tenant directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferralChain {
    pub direct_referrer: Option<Uuid>,
    pub indirect_referrer: Option<Uuid>,
}

/// The aggregate view of a ledger. Always recomputed from the entries,
/// never carried forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionSummary {
    /// Everything earned and not cancelled, regardless of payout state.
    pub total_earnings: f64,
    pub pending_balance: f64,
    pub available_for_withdraw: f64,
    pub paid_total: f64,
    pub entries: Vec<CommissionBreakdownRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionBreakdownRow {
    pub entry_id: Uuid,
    pub beneficiary_id: Uuid,
    pub level: CommissionLevel,
    pub rate_percent: f64,
    pub base_amount: f64,
    pub amount: f64,
    pub status: CommissionStatus,
    pub reference_month: String,
    pub matures_at: DateTime<Utc>,
}

pub struct CommissionEngine {
    level1_rate: f64,
    level2_rate: f64,
    lock_period_days: i64,
}

impl CommissionEngine {
    pub fn new(config: &CommissionConfig) -> Self {
        Self {
            level1_rate: sanitize_rate(config.level1_rate),
            level2_rate: sanitize_rate(config.level2_rate),
            lock_period_days: config.lock_period_days.max(0),
        }
    }

    /// Write the ledger entries one settlement earns: a direct-level entry
    /// when the tenant has a referrer, an indirect-level entry when that
    /// referrer has one too. Entries start pending and mature after the
    /// lock period, both measured from the settlement time.
    pub fn record_settlement(
        &self,
        event: &SettlementEvent,
        chain: &ReferralChain,
    ) -> Vec<CommissionEntry> {
        let base = event.sanitized_base_amount();
        let mut entries = Vec::with_capacity(2);

        if let Some(beneficiary) = chain.direct_referrer {
            entries.push(self.build_entry(
                event,
                beneficiary,
                CommissionLevel::Direct,
                self.level1_rate,
                base,
            ));
        }
        if let Some(beneficiary) = chain.indirect_referrer {
            entries.push(self.build_entry(
                event,
                beneficiary,
                CommissionLevel::Indirect,
                self.level2_rate,
                base,
            ));
        }

        if entries.is_empty() {
            debug!(settlement_id = %event.settlement_id, "settlement has no referral chain, no commission earned");
        } else {
            metrics::counter!("commission.entries_created").increment(entries.len() as u64);
            info!(
                settlement_id = %event.settlement_id,
                levels = entries.len(),
                base_amount = base,
                "commission entries created"
            );
        }

        entries
    }

    /// Flip every pending entry whose lock period has elapsed to
    /// available. Returns how many entries moved.
    pub fn release_matured(&self, ledger: &mut [CommissionEntry], now: DateTime<Utc>) -> usize {
        let mut released = 0;
        for entry in ledger.iter_mut() {
            if entry.status == CommissionStatus::Pending && entry.is_mature(now) {
                // Pending -> Available is always legal.
                let _ = entry.transition(CommissionStatus::Available, now);
                released += 1;
            }
        }

        if released > 0 {
            metrics::counter!("commission.entries_released").increment(released as u64);
            info!(released, "matured commissions released");
        }
        released
    }

    /// Sum the ledger by status. Cancelled entries contribute nothing to
    /// any total; they only appear in the per-entry breakdown.
    pub fn summarize(&self, ledger: &[CommissionEntry]) -> CommissionSummary {
        let mut total_earnings = 0.0;
        let mut pending_balance = 0.0;
        let mut available_for_withdraw = 0.0;
        let mut paid_total = 0.0;

        for entry in ledger {
            match entry.status {
                CommissionStatus::Pending => {
                    total_earnings += entry.amount;
                    pending_balance += entry.amount;
                }
                CommissionStatus::Available => {
                    total_earnings += entry.amount;
                    available_for_withdraw += entry.amount;
                }
                CommissionStatus::Processing => {
                    total_earnings += entry.amount;
                }
                CommissionStatus::Paid => {
                    total_earnings += entry.amount;
                    paid_total += entry.amount;
                }
                CommissionStatus::Cancelled => {}
            }
        }

        CommissionSummary {
            total_earnings,
            pending_balance,
            available_for_withdraw,
            paid_total,
            entries: ledger
                .iter()
                .map(|entry| CommissionBreakdownRow {
                    entry_id: entry.id,
                    beneficiary_id: entry.beneficiary_id,
                    level: entry.level,
                    rate_percent: entry.rate_percent,
                    base_amount: entry.base_amount,
                    amount: entry.amount,
                    status: entry.status,
                    reference_month: entry.reference_month.clone(),
                    matures_at: entry.matures_at,
                })
                .collect(),
        }
    }

    fn build_entry(
        &self,
        event: &SettlementEvent,
        beneficiary: Uuid,
        level: CommissionLevel,
        rate_percent: f64,
        base_amount: f64,
    ) -> CommissionEntry {
        CommissionEntry {
            id: Uuid::new_v4(),
            beneficiary_id: beneficiary,
            referred_tenant_id: event.tenant_id,
            settlement_id: event.settlement_id,
            level,
            rate_percent,
            base_amount,
            amount: base_amount * rate_percent / 100.0,
            status: CommissionStatus::Pending,
            reference_month: event.reference_month.clone(),
            created_at: event.settled_at,
            matures_at: event.settled_at + Duration::days(self.lock_period_days),
            updated_at: event.settled_at,
        }
    }
}

fn sanitize_rate(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
