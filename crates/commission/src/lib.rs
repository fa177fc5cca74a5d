//! Referral commission ledger: two-level percentage commissions with a
//! lock period and an explicit status state machine.

pub mod engine;
pub mod ledger;

pub use engine::{
    CommissionBreakdownRow, CommissionEngine, CommissionSummary, ReferralChain, SettlementEvent,
};
pub use ledger::{CommissionEntry, CommissionLevel, CommissionStatus};
