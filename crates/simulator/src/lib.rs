pub mod simulator;

pub use simulator::{
    filter_terminals, run_simulation, select_terminals, simulate_budget, CampaignParams,
    PricingConfig, SimulationResult, TerminalFilter,
};
