//! ScreenReach CLI: exposure reports, budget simulations and commission
//! ledger maintenance over snapshot files exported from the CMS.

mod demo;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::warn;
use uuid::Uuid;

use screenreach_cache::{report_cache_key, ReportCache};
use screenreach_commission::{CommissionEngine, CommissionEntry};
use screenreach_core::config::EngineConfig;
use screenreach_core::inventory::{InventorySnapshot, Terminal};
use screenreach_core::period::ReportPeriod;
use screenreach_reporting::ReportEngine;
use screenreach_simulator::{run_simulation, CampaignParams, PricingConfig, TerminalFilter};

#[derive(Parser)]
#[command(name = "screenreach")]
#[command(about = "Exposure and revenue estimation for digital signage networks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute exposure reports from an inventory snapshot
    Report {
        /// Path to the inventory snapshot JSON file
        #[arg(short, long, env = "SCREENREACH_SNAPSHOT")]
        snapshot: String,

        /// Reporting period: day, week, month, year
        #[arg(short, long, default_value = "month")]
        period: String,

        /// Custom period start (RFC 3339), used together with --to
        #[arg(long)]
        from: Option<String>,

        /// Custom period end (RFC 3339), used together with --from
        #[arg(long)]
        to: Option<String>,

        /// Include CPM-based financial estimates
        #[arg(long, default_value_t = false)]
        financial: bool,

        /// Output file path for the report (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Simulate what a campaign buy would cost and deliver
    Simulate {
        /// Path to the terminals JSON file
        #[arg(short, long)]
        terminals: String,

        /// Comma-separated terminal UUIDs to buy (default: all that match)
        #[arg(long)]
        select: Option<String>,

        /// Keep only terminals in this city
        #[arg(long)]
        city: Option<String>,

        /// Keep only terminals with at least this daily audience
        #[arg(long)]
        min_audience: Option<f64>,

        /// Campaign length in days
        #[arg(long, default_value_t = 30)]
        days: u32,

        /// Creative slot length in seconds
        #[arg(long, default_value_t = 15.0)]
        slot_seconds: f64,

        /// Plays per terminal per day
        #[arg(long, default_value_t = 48)]
        plays_per_day: u32,

        /// Price per play at the reference slot length
        #[arg(long, default_value_t = 0.10)]
        price_per_play: f64,

        /// Slot length the price is quoted for
        #[arg(long, default_value_t = 15.0)]
        reference_slot_seconds: f64,

        /// Platform commission percentage
        #[arg(long, default_value_t = 15.0)]
        commission_rate: f64,

        /// Output file path for the result (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Summarize a referral commission ledger
    Commissions {
        /// Path to the commission ledger JSON file
        #[arg(short, long)]
        ledger: String,

        /// Release matured pending entries before summarizing
        #[arg(long, default_value_t = false)]
        release_matured: bool,

        /// Write released statuses back to the ledger file
        #[arg(long, default_value_t = false)]
        write_back: bool,

        /// Evaluation time (RFC 3339), defaults to now
        #[arg(long)]
        as_of: Option<String>,

        /// Output file path for the summary (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate demo fixtures to try the other commands on
    Demo {
        /// Directory to write the fixture files into
        #[arg(short, long, default_value = "demo")]
        dir: String,

        /// RNG seed for the generated inventory
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays parseable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screenreach=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = EngineConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        EngineConfig::default()
    });

    match cli.command {
        Commands::Report {
            snapshot,
            period,
            from,
            to,
            financial,
            output,
        } => cmd_report(&config, &snapshot, &period, from, to, financial, output),
        Commands::Simulate {
            terminals,
            select,
            city,
            min_audience,
            days,
            slot_seconds,
            plays_per_day,
            price_per_play,
            reference_slot_seconds,
            commission_rate,
            output,
        } => cmd_simulate(
            &terminals,
            select,
            city,
            min_audience,
            days,
            slot_seconds,
            plays_per_day,
            price_per_play,
            reference_slot_seconds,
            commission_rate,
            output,
        ),
        Commands::Commissions {
            ledger,
            release_matured,
            write_back,
            as_of,
            output,
        } => cmd_commissions(&config, &ledger, release_matured, write_back, as_of, output),
        Commands::Demo { dir, seed } => demo::cmd_demo(&config, &dir, seed),
    }
}

// ---------------------------------------------------------------------------
// Report command
// ---------------------------------------------------------------------------

fn cmd_report(
    config: &EngineConfig,
    snapshot_path: &str,
    period_name: &str,
    from: Option<String>,
    to: Option<String>,
    include_financial: bool,
    output: Option<String>,
) -> anyhow::Result<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let period = parse_period(period_name, from, to)?;

    let engine = ReportEngine::new(config);
    let cache = ReportCache::new(&config.cache);

    let key = report_cache_key(&snapshot, &period, include_financial);
    let report = cache.get_or_compute(key, || {
        engine.compute_reports(&snapshot, &period, include_financial)
    });

    write_json(report.as_ref(), output.as_deref())
}

fn load_snapshot(path: &str) -> anyhow::Result<InventorySnapshot> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read snapshot {path}: {e}"))?;
    let snapshot: InventorySnapshot = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse snapshot {path}: {e}"))?;

    if snapshot.is_empty() {
        warn!(path, "snapshot has no media, monitors or locations");
    }
    Ok(snapshot)
}

fn parse_period(
    name: &str,
    from: Option<String>,
    to: Option<String>,
) -> anyhow::Result<ReportPeriod> {
    if let (Some(from), Some(to)) = (&from, &to) {
        return Ok(ReportPeriod::Custom {
            start: parse_timestamp(from)?,
            end: parse_timestamp(to)?,
        });
    }

    Ok(match name.to_lowercase().as_str() {
        "day" => ReportPeriod::Day,
        "week" => ReportPeriod::Week,
        "month" => ReportPeriod::Month,
        "year" => ReportPeriod::Year,
        other => {
            eprintln!("Warning: unknown period '{other}', defaulting to month");
            ReportPeriod::Month
        }
    })
}

// ---------------------------------------------------------------------------
// Simulate command
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn cmd_simulate(
    terminals_path: &str,
    select: Option<String>,
    city: Option<String>,
    min_audience: Option<f64>,
    days: u32,
    slot_seconds: f64,
    plays_per_day: u32,
    price_per_play: f64,
    reference_slot_seconds: f64,
    commission_rate: f64,
    output: Option<String>,
) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(terminals_path)
        .map_err(|e| anyhow::anyhow!("Failed to read terminals {terminals_path}: {e}"))?;
    let terminals: Vec<Terminal> = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse terminals {terminals_path}: {e}"))?;

    let selected_ids = parse_uuid_list(select.as_deref())?;
    let filter = TerminalFilter {
        city,
        location_id: None,
        min_daily_audience: min_audience,
    };
    let params = CampaignParams {
        duration_days: days,
        slot_seconds,
        plays_per_day,
    };
    let pricing = PricingConfig {
        price_per_play,
        reference_slot_seconds,
        commission_rate_percent: commission_rate,
    };

    let result = run_simulation(&terminals, &filter, &selected_ids, &params, &pricing);
    write_json(&result, output.as_deref())
}

fn parse_uuid_list(raw: Option<&str>) -> anyhow::Result<Vec<Uuid>> {
    let raw = match raw {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };

    let mut ids = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = Uuid::parse_str(part)
            .map_err(|e| anyhow::anyhow!("Invalid terminal id '{part}': {e}"))?;
        ids.push(id);
    }
    Ok(ids)
}

// ---------------------------------------------------------------------------
// Commissions command
// ---------------------------------------------------------------------------

fn cmd_commissions(
    config: &EngineConfig,
    ledger_path: &str,
    release_matured: bool,
    write_back: bool,
    as_of: Option<String>,
    output: Option<String>,
) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(ledger_path)
        .map_err(|e| anyhow::anyhow!("Failed to read ledger {ledger_path}: {e}"))?;
    let mut entries: Vec<CommissionEntry> = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse ledger {ledger_path}: {e}"))?;

    let as_of = match as_of {
        Some(raw) => parse_timestamp(&raw)?,
        None => Utc::now(),
    };

    let engine = CommissionEngine::new(&config.commission);

    if release_matured {
        engine.release_matured(&mut entries, as_of);
        if write_back {
            let json = serde_json::to_string_pretty(&entries)?;
            std::fs::write(ledger_path, json)
                .map_err(|e| anyhow::anyhow!("Failed to write ledger {ledger_path}: {e}"))?;
            eprintln!("Ledger updated: {ledger_path}");
        }
    }

    let summary = engine.summarize(&entries);
    write_json(&summary, output.as_deref())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn parse_timestamp(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| anyhow::anyhow!("Invalid timestamp '{raw}': {e}"))?;
    Ok(parsed.with_timezone(&Utc))
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&str>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .map_err(|e| anyhow::anyhow!("Failed to write {path}: {e}"))?;
            println!("Written to: {path}");
        }
        None => println!("{json}"),
    }
    Ok(())
}
