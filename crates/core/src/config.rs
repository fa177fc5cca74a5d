use serde::Deserialize;

/// Root engine configuration. Loaded from environment variables
/// with the prefix `SCREENREACH__` and double-underscore separators.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub exposure: ExposureConfig,
    #[serde(default)]
    pub financial: FinancialConfig,
    #[serde(default)]
    pub commission: CommissionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Knobs for the exposure math. `hours_per_day` reflects typical venue
/// operating hours, not wall-clock hours.
#[derive(Debug, Clone, Deserialize)]
pub struct ExposureConfig {
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: u32,
    #[serde(default = "default_media_duration_secs")]
    pub default_media_duration_secs: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinancialConfig {
    /// Reference CPM in account currency per 1000 exposures.
    #[serde(default = "default_cpm_reference")]
    pub cpm_reference: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommissionConfig {
    /// Percentage paid to the direct referrer.
    #[serde(default = "default_level1_rate")]
    pub level1_rate: f64,
    /// Percentage paid to the referrer's referrer.
    #[serde(default = "default_level2_rate")]
    pub level2_rate: f64,
    /// Days a commission stays pending before it can be released.
    #[serde(default = "default_lock_period_days")]
    pub lock_period_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

// Default functions
fn default_hours_per_day() -> u32 {
    12
}
fn default_media_duration_secs() -> f64 {
    10.0
}
fn default_cpm_reference() -> f64 {
    5.0
}
fn default_level1_rate() -> f64 {
    10.0
}
fn default_level2_rate() -> f64 {
    5.0
}
fn default_lock_period_days() -> i64 {
    30
}
fn default_cache_ttl_secs() -> u64 {
    300
}
fn default_cache_max_entries() -> usize {
    1024
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            hours_per_day: default_hours_per_day(),
            default_media_duration_secs: default_media_duration_secs(),
        }
    }
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            cpm_reference: default_cpm_reference(),
        }
    }
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            level1_rate: default_level1_rate(),
            level2_rate: default_level2_rate(),
            lock_period_days: default_lock_period_days(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            max_entries: default_cache_max_entries(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exposure: ExposureConfig::default(),
            financial: FinancialConfig::default(),
            commission: CommissionConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("SCREENREACH")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
