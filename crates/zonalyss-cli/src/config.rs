use std::path::Path;

use zonalyss_core::VerifyConfig;

use crate::CliError;

/// Load a TOML verification config, falling back to built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<VerifyConfig, CliError> {
    let config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<VerifyConfig>(&content).map_err(|err| {
                CliError::InvalidConfig(format!("{}: {err}", path.display()))
            })?
        }
        None => VerifyConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
