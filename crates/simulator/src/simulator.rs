//! Campaign budget simulator: what a proposed buy would cost and deliver
//! across a chosen set of screens.
//!
//! The whole computation is pure: terminals in, numbers out. Callers rerun
//! it on every parameter change, there is nothing to invalidate.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use screenreach_core::inventory::Terminal;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What the prospective campaign looks like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignParams {
    pub duration_days: u32,
    pub slot_seconds: f64,
    pub plays_per_day: u32,
}

impl Default for CampaignParams {
    fn default() -> Self {
        Self {
            duration_days: 30,
            slot_seconds: 15.0,
            plays_per_day: 48,
        }
    }
}

/// Rate card the simulation prices against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub price_per_play: f64,
    /// Slot length the price-per-play is quoted for.
    pub reference_slot_seconds: f64,
    pub commission_rate_percent: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_per_play: 0.10,
            reference_slot_seconds: 15.0,
            commission_rate_percent: 15.0,
        }
    }
}

impl PricingConfig {
    /// Price usable in arithmetic: negative or NaN prices become zero.
    pub fn effective_price_per_play(&self) -> f64 {
        if self.price_per_play.is_finite() && self.price_per_play > 0.0 {
            self.price_per_play
        } else {
            0.0
        }
    }

    /// Commission rate clamped to 0..=100.
    pub fn effective_commission_rate(&self) -> f64 {
        if self.commission_rate_percent.is_finite() {
            self.commission_rate_percent.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    /// How much a slot of `slot_seconds` scales the quoted price. An
    /// unusable reference or slot length leaves the price unscaled.
    pub fn slot_multiplier(&self, slot_seconds: f64) -> f64 {
        if !self.reference_slot_seconds.is_finite() || self.reference_slot_seconds <= 0.0 {
            return 1.0;
        }
        if !slot_seconds.is_finite() || slot_seconds <= 0.0 {
            return 1.0;
        }
        slot_seconds / self.reference_slot_seconds
    }
}

/// Narrows the terminal pool before selection. Every field is optional; an
/// empty filter keeps all active terminals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminalFilter {
    pub city: Option<String>,
    pub location_id: Option<Uuid>,
    pub min_daily_audience: Option<f64>,
}

impl TerminalFilter {
    pub fn matches(&self, terminal: &Terminal) -> bool {
        if !terminal.active {
            return false;
        }
        if let Some(city) = self.city.as_deref() {
            let same_city = terminal
                .city
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(city));
            if !same_city {
                return false;
            }
        }
        if let Some(location_id) = self.location_id {
            if terminal.location_id != Some(location_id) {
                return false;
            }
        }
        if let Some(min) = self.min_daily_audience {
            if terminal.effective_daily_audience() < min {
                return false;
            }
        }
        true
    }
}

/// Everything the simulator derives from one parameter set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub num_terminals: u64,
    pub total_daily_audience: f64,
    pub duration_days: u32,
    pub plays_per_day: u32,
    pub slot_seconds: f64,
    pub slot_multiplier: f64,
    pub total_plays: u64,
    pub price_per_play: f64,
    pub total_value: f64,
    pub commission_rate_percent: f64,
    pub commission: f64,
    /// `total_value - commission`.
    pub net_value: f64,
    /// `total_daily_audience / num_terminals` (0.0 when no terminals).
    pub avg_audience_per_terminal: f64,
    pub estimated_impressions: f64,
    /// `total_value / estimated_impressions * 1000` (0.0 when no impressions).
    pub cpm: f64,
    /// `total_value / duration_days` (0.0 when the duration is zero).
    pub daily_value: f64,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Active terminals passing the filter, in input order.
pub fn filter_terminals<'a>(terminals: &'a [Terminal], filter: &TerminalFilter) -> Vec<&'a Terminal> {
    terminals.iter().filter(|t| filter.matches(t)).collect()
}

/// Narrow a filtered pool to an explicit selection. An empty selection
/// means "everything that passed the filter".
pub fn select_terminals<'a>(
    filtered: Vec<&'a Terminal>,
    selected_ids: &[Uuid],
) -> Vec<&'a Terminal> {
    if selected_ids.is_empty() {
        return filtered;
    }
    filtered
        .into_iter()
        .filter(|t| selected_ids.contains(&t.id))
        .collect()
}

/// Price a campaign over the selected terminals. Pure arithmetic with the
/// division guards spelled out; degenerate inputs produce zeroed fields,
/// never an error.
pub fn simulate_budget(
    selected: &[&Terminal],
    params: &CampaignParams,
    pricing: &PricingConfig,
) -> SimulationResult {
    let num_terminals = selected.len() as u64;
    let total_daily_audience: f64 = selected.iter().map(|t| t.effective_daily_audience()).sum();

    let slot_multiplier = pricing.slot_multiplier(params.slot_seconds);
    let price_per_play = pricing.effective_price_per_play();
    let commission_rate_percent = pricing.effective_commission_rate();

    let total_plays = num_terminals
        .saturating_mul(params.plays_per_day as u64)
        .saturating_mul(params.duration_days as u64);
    let total_value = total_plays as f64 * price_per_play * slot_multiplier;
    let commission = total_value * commission_rate_percent / 100.0;

    let avg_audience_per_terminal = if num_terminals > 0 {
        total_daily_audience / num_terminals as f64
    } else {
        0.0
    };
    let estimated_impressions = total_plays as f64 * avg_audience_per_terminal;
    let cpm = if estimated_impressions > 0.0 {
        total_value / estimated_impressions * 1000.0
    } else {
        0.0
    };
    let daily_value = if params.duration_days > 0 {
        total_value / params.duration_days as f64
    } else {
        0.0
    };

    SimulationResult {
        num_terminals,
        total_daily_audience,
        duration_days: params.duration_days,
        plays_per_day: params.plays_per_day,
        slot_seconds: params.slot_seconds,
        slot_multiplier,
        total_plays,
        price_per_play,
        total_value,
        commission_rate_percent,
        commission,
        net_value: total_value - commission,
        avg_audience_per_terminal,
        estimated_impressions,
        cpm,
        daily_value,
    }
}

/// The full path a simulator request takes, from filtering to pricing.
pub fn run_simulation(
    terminals: &[Terminal],
    filter: &TerminalFilter,
    selected_ids: &[Uuid],
    params: &CampaignParams,
    pricing: &PricingConfig,
) -> SimulationResult {
    let filtered = filter_terminals(terminals, filter);
    let selected = select_terminals(filtered, selected_ids);
    let result = simulate_budget(&selected, params, pricing);

    metrics::counter!("simulator.runs").increment(1);
    info!(
        terminals = result.num_terminals,
        total_plays = result.total_plays,
        total_value = result.total_value,
        "budget simulation computed"
    );

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
