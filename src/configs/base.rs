use serde::{Deserialize, Serialize};

use crate::configs::*;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
  #[serde(default)]
  pub sources: SourcesConfig,
  pub logging: Option<LoggingConfig>,
  #[serde(default)]
  pub niconico: Option<NiconicoConfig>,
}

use crate::common::types::AnyResult;

impl Config {
  pub fn load() -> AnyResult<Self> {
    let config_path = if std::path::Path::new("config.toml").exists() {
      "config.toml"
    } else if std::path::Path::new("config.default.toml").exists() {
      "config.default.toml"
    } else {
      crate::log_println!("No config.toml or config.default.toml found, using defaults");
      return Ok(Self::default());
    };

    crate::log_println!("Loading configuration from: {}", config_path);

    let config_str = std::fs::read_to_string(config_path)?;
    Self::from_toml(&config_str).map_err(|e| format!("{}: {}", config_path, e).into())
  }

  pub fn from_toml(config_str: &str) -> AnyResult<Self> {
    let config: Config = toml::from_str(config_str)?;
    Ok(config)
  }
}
