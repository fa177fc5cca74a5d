//! Commission ledger entries and their lifecycle.
//!
//! An entry is written once per referral level per settled invoice and
//! never deleted. Money moves only through status transitions, so the
//! allowed transitions are the whole contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use screenreach_core::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    /// Earned but inside the lock period.
    Pending,
    /// Lock period over, withdrawable.
    Available,
    /// Claimed by a payout batch that has not settled yet.
    Processing,
    Paid,
    /// Chargeback or manual reversal. Terminal.
    Cancelled,
}

impl CommissionStatus {
    pub fn can_transition_to(self, next: CommissionStatus) -> bool {
        use CommissionStatus::*;
        matches!(
            (self, next),
            (Pending, Available)
                | (Available, Processing)
                | (Available, Paid)
                | (Processing, Paid)
                | (Pending, Cancelled)
                | (Available, Cancelled)
                | (Processing, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CommissionStatus::Paid | CommissionStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionLevel {
    /// The beneficiary referred the paying tenant directly.
    Direct,
    /// The beneficiary referred the direct referrer.
    Indirect,
}

impl CommissionLevel {
    pub fn depth(self) -> u8 {
        match self {
            CommissionLevel::Direct => 1,
            CommissionLevel::Indirect => 2,
        }
    }
}

/// One earned commission. `amount` is fixed at creation time; later rate
/// changes never touch written entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionEntry {
    pub id: Uuid,
    /// Who earns the commission.
    pub beneficiary_id: Uuid,
    /// The tenant whose invoice generated it.
    pub referred_tenant_id: Uuid,
    pub settlement_id: Uuid,
    pub level: CommissionLevel,
    pub rate_percent: f64,
    pub base_amount: f64,
    /// `base_amount * rate_percent / 100`.
    pub amount: f64,
    pub status: CommissionStatus,
    /// Billing month of the underlying invoice, `YYYY-MM`.
    pub reference_month: String,
    pub created_at: DateTime<Utc>,
    /// When the lock period ends and the entry may become available.
    pub matures_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommissionEntry {
    pub fn is_mature(&self, now: DateTime<Utc>) -> bool {
        now >= self.matures_at
    }

    /// Move the entry along the state machine, rejecting anything the
    /// machine does not allow.
    pub fn transition(&mut self, next: CommissionStatus, at: DateTime<Utc>) -> EngineResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(EngineError::Commission(format!(
                "entry {} cannot move from {:?} to {:?}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        self.updated_at = at;
        Ok(())
    }

    /// Claim the entry for a payout batch.
    pub fn mark_processing(&mut self, at: DateTime<Utc>) -> EngineResult<()> {
        self.transition(CommissionStatus::Processing, at)
    }

    /// Settle the entry as paid out.
    pub fn mark_paid(&mut self, at: DateTime<Utc>) -> EngineResult<()> {
        self.transition(CommissionStatus::Paid, at)
    }

    /// Reverse the entry, from any non-terminal state.
    pub fn cancel(&mut self, at: DateTime<Utc>) -> EngineResult<()> {
        self.transition(CommissionStatus::Cancelled, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: CommissionStatus) -> CommissionEntry {
        let now = Utc::now();
        CommissionEntry {
            id: Uuid::new_v4(),
            beneficiary_id: Uuid::new_v4(),
            referred_tenant_id: Uuid::new_v4(),
            settlement_id: Uuid::new_v4(),
            level: CommissionLevel::Direct,
            rate_percent: 10.0,
            base_amount: 100.0,
            amount: 10.0,
            status,
            reference_month: "2026-08".to_string(),
            created_at: now,
            matures_at: now + chrono::Duration::days(30),
            updated_at: now,
        }
    }

    #[test]
    fn lifecycle_follows_the_state_machine() {
        let mut e = entry(CommissionStatus::Pending);
        let now = Utc::now();

        e.transition(CommissionStatus::Available, now).unwrap();
        e.mark_processing(now).unwrap();
        e.mark_paid(now).unwrap();
        assert!(e.status.is_terminal());
    }

    #[test]
    fn pending_cannot_jump_straight_to_paid() {
        let mut e = entry(CommissionStatus::Pending);
        let err = e.transition(CommissionStatus::Paid, Utc::now());
        assert!(err.is_err());
        assert_eq!(e.status, CommissionStatus::Pending);
    }

    #[test]
    fn terminal_states_accept_nothing() {
        let mut paid = entry(CommissionStatus::Paid);
        assert!(paid.transition(CommissionStatus::Available, Utc::now()).is_err());

        let mut cancelled = entry(CommissionStatus::Cancelled);
        assert!(cancelled.transition(CommissionStatus::Pending, Utc::now()).is_err());
    }

    #[test]
    fn cancellation_is_allowed_from_any_live_state() {
        for status in [
            CommissionStatus::Pending,
            CommissionStatus::Available,
            CommissionStatus::Processing,
        ] {
            let mut e = entry(status);
            e.cancel(Utc::now()).unwrap();
            assert_eq!(e.status, CommissionStatus::Cancelled);
        }
    }

    #[test]
    fn maturity_is_reached_at_the_boundary() {
        let e = entry(CommissionStatus::Pending);
        assert!(!e.is_mature(e.created_at));
        assert!(e.is_mature(e.matures_at));
        assert!(e.is_mature(e.matures_at + chrono::Duration::days(1)));
    }
}
