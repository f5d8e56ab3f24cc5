//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Money display configuration.
    #[serde(default)]
    pub finance: FinanceConfig,
    /// Stock ledger configuration.
    #[serde(default)]
    pub stock: StockConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Display configuration for money.
#[derive(Debug, Clone, Deserialize)]
pub struct FinanceConfig {
    /// Symbol prefixed to formatted amounts.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Stock ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StockConfig {
    /// Minimum adjustment reason length in characters, after trimming.
    #[serde(default = "default_reason_min_chars")]
    pub reason_min_chars: usize,
    /// Maximum adjustment reason length in characters, after trimming.
    #[serde(default = "default_reason_max_chars")]
    pub reason_max_chars: usize,
}

fn default_reason_min_chars() -> usize {
    3
}

fn default_reason_max_chars() -> usize {
    500
}

impl StockConfig {
    /// Rejects bounds no reason could satisfy.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.reason_min_chars > self.reason_max_chars {
            return Err(config::ConfigError::Message(format!(
                "stock.reason_min_chars ({}) exceeds stock.reason_max_chars ({})",
                self.reason_min_chars, self.reason_max_chars
            )));
        }
        Ok(())
    }
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            reason_min_chars: default_reason_min_chars(),
            reason_max_chars: default_reason_max_chars(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "weft=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `WEFT__SECTION__KEY` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or a section is
    /// inconsistent.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("WEFT").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.stock.validate()?;
        Ok(config)
    }
}
