//! Configuration loading
//!
//! Layers, lowest precedence first: built-in defaults, an optional
//! `location.toml` (or the file given with `--config`), then `LOCATION_*`
//! environment variables such as `LOCATION_TIMEOUT_SECS`.

use std::path::Path;

use location_services::LocationServicesConfig;

/// Prefix for environment overrides
const ENV_PREFIX: &str = "LOCATION";

/// Load the service configuration
///
/// # Errors
///
/// Returns an error if an explicitly given file is missing, a source cannot
/// be parsed, or the result fails validation.
pub fn load(path: Option<&Path>) -> Result<LocationServicesConfig, config::ConfigError> {
    let file = path.map_or_else(
        || config::File::with_name("location").required(false),
        |p| config::File::from(p).required(true),
    );

    let config: LocationServicesConfig = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?
        .try_deserialize()?;

    config.validate().map_err(config::ConfigError::Message)?;
    Ok(config)
}
