use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};

use super::runtime::ForecasterConfig;

/// Environment variables override the file, e.g. `FX_FORECAST__HORIZON_CAP_MONTHS=6`
pub const ENV_PREFIX: &str = "FX";

/// Loads `path` (optional) layered under `FX_*` environment variables, then validates
pub fn load_config(path: &str) -> Result<ForecasterConfig> {
    let settings = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path))?;

    let config: ForecasterConfig = settings
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    config
        .validate()
        .map_err(|errors| anyhow!("Invalid configuration: {}", errors.join(", ")))?;

    Ok(config)
}

/// Effective configuration rendered as TOML
pub fn render_config(config: &ForecasterConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
