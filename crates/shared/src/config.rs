//! Application configuration management.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::types::TOLERANCE;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Audit configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Command line harness configuration.
    #[serde(default)]
    pub cli: CliConfig,
}

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// IANA timezone used to decide what "today" is.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Fixed date used instead of the clock (reproducible runs).
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            today: None,
        }
    }
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

/// Audit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Largest difference still reported as a match.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
        }
    }
}

fn default_tolerance() -> Decimal {
    TOLERANCE
}

/// Command line harness configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Snapshot file used when none is given on the command line.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FLUXO").separator("__"))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks values that deserialize fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for an unknown timezone or a non-positive tolerance.
    pub fn validate(&self) -> AppResult<()> {
        self.timezone()?;
        if self.audit.tolerance <= Decimal::ZERO {
            return Err(AppError::Config(format!(
                "audit.tolerance must be positive, got {}",
                self.audit.tolerance
            )));
        }
        Ok(())
    }

    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the name is not a known IANA zone.
    pub fn timezone(&self) -> AppResult<Tz> {
        self.engine
            .timezone
            .parse::<Tz>()
            .map_err(|e| AppError::Config(format!("invalid engine.timezone: {e}")))
    }

    /// Returns "today" as the engine should see it.
    ///
    /// The fixed override wins; otherwise the current date in the configured zone.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the timezone is invalid.
    pub fn today(&self) -> AppResult<NaiveDate> {
        if let Some(today) = self.engine.today {
            return Ok(today);
        }
        let tz = self.timezone()?;
        Ok(Utc::now().with_timezone(&tz).date_naive())
    }
}
