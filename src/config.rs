use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Sampling interval in milliseconds.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    /// How often to log app stats (tracked devices, current scale) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// History capacity in samples (one per display pixel column).
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    /// Minimum display scale in bytes per interval.
    #[serde(default = "default_min_scale")]
    pub min_scale: u64,
    /// Interfaces to monitor, separated by commas or whitespace. Empty
    /// means monitor all up interfaces (auto-discovery).
    #[serde(default)]
    pub dev_names: String,
}

fn default_update_interval_ms() -> u64 {
    1000
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

fn default_history_len() -> usize {
    32
}

fn default_min_scale() -> u64 {
    4096
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            history_len: default_history_len(),
            min_scale: default_min_scale(),
            dev_names: String::new(),
        }
    }
}

impl AppConfig {
    /// Loads from the file named by `CONFIG_FILE` (default `config.toml`),
    /// falling back to built-in defaults when no config file exists.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.monitoring.update_interval_ms > 0,
            "monitoring.update_interval_ms must be > 0, got {}",
            self.monitoring.update_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.graph.history_len > 0,
            "graph.history_len must be > 0, got {}",
            self.graph.history_len
        );
        Ok(())
    }
}
