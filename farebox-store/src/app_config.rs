use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub booking: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    /// Time-to-live of a pending booking before the sweep releases its
    /// seats.
    #[serde(default = "default_pending_expiry")]
    pub pending_expiry_seconds: u64,
    /// Interval of the background expiry sweep.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Prefix of human-facing booking references.
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
}

fn default_pending_expiry() -> u64 {
    900
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_reference_prefix() -> String {
    "BT".to_string()
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of FAREBOX)
            // E.g. `FAREBOX__SERVER__PORT=9090` would set `server.port`
            .add_source(config::Environment::with_prefix("FAREBOX").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
