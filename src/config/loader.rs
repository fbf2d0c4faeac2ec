//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::IngestConfig;
use super::secret::secret_string;
use crate::domain::errors::IngestError;
use crate::domain::result::Result;
use crate::domain::SeriesId;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix of environment variables that override config values
pub const ENV_PREFIX: &str = "FX_INGEST";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into IngestConfig
/// 4. Applies environment variable overrides (FX_INGEST_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`IngestError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails, or the
/// result does not validate.
///
/// # Examples
///
/// ```no_run
/// use fx_ingest::config::loader::load_config;
///
/// let config = load_config("fx-ingest.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<IngestConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(IngestError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        IngestError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_config(&contents)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");

    Ok(config)
}

/// Parses and validates configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn parse_config(contents: &str) -> Result<IngestConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: IngestConfig = toml::from_str(&contents)
        .map_err(|e| IngestError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        IngestError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| IngestError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(IngestError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        IngestError::Configuration(format!(
            "Invalid value '{value}' for environment override {ENV_PREFIX}_{key}"
        ))
    })
}

/// Applies environment variable overrides using the FX_INGEST_* prefix
///
/// Variables follow the pattern FX_INGEST_<SECTION>_<KEY>, for example
/// FX_INGEST_WAREHOUSE_CONNECTION_STRING or FX_INGEST_INGESTION_SERIES
/// (comma-separated).
fn apply_env_overrides(config: &mut IngestConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_override("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_override("APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_override("APPLICATION_DRY_RUN", &val)?;
    }

    // Provider overrides
    if let Some(val) = env_override("PROVIDER_BASE_URL") {
        config.provider.base_url = val;
    }
    if let Some(val) = env_override("PROVIDER_TIMEOUT_SECONDS") {
        config.provider.timeout_seconds = parse_override("PROVIDER_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = env_override("PROVIDER_SOURCE_LABEL") {
        config.provider.source_label = val;
    }

    // Ingestion overrides
    if let Some(val) = env_override("INGESTION_SERIES") {
        config.ingestion.series = val
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| SeriesId::new(s).map_err(IngestError::Configuration))
            .collect::<Result<Vec<_>>>()?;
    }
    if let Some(val) = env_override("INGESTION_MODE") {
        config.ingestion.mode = parse_override("INGESTION_MODE", &val)?;
    }
    if let Some(val) = env_override("INGESTION_BACKFILL_START") {
        config.ingestion.backfill_start = parse_override("INGESTION_BACKFILL_START", &val)?;
    }
    if let Some(val) = env_override("INGESTION_HALT_ON_ERROR") {
        config.ingestion.halt_on_error = parse_override("INGESTION_HALT_ON_ERROR", &val)?;
    }

    // Warehouse overrides
    if let Some(val) = env_override("WAREHOUSE_CONNECTION_STRING") {
        config.warehouse.connection_string = secret_string(val);
    }
    if let Some(val) = env_override("WAREHOUSE_SCHEMA") {
        config.warehouse.schema = val;
    }
    if let Some(val) = env_override("WAREHOUSE_MAX_CONNECTIONS") {
        config.warehouse.max_connections = parse_override("WAREHOUSE_MAX_CONNECTIONS", &val)?;
    }
    if let Some(val) = env_override("WAREHOUSE_SSL_MODE") {
        config.warehouse.ssl_mode = val;
    }

    // Logging overrides
    if let Some(val) = env_override("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_override("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
