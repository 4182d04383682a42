use config::{Config, Environment, File};
use serde::Deserialize;

/// Runtime knobs shared by the CLI commands and the embedded API server.
/// Read from an optional `chainsight.toml` next to the binary, overridden by
/// `CHAINSIGHT_*` environment variables (e.g. `CHAINSIGHT_CORTEX__API_URL`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: Option<String>,

    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    #[serde(default)]
    pub cortex: CortexSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CortexSettings {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub model: Option<String>,
}

fn default_cache_ttl_seconds() -> u64 {
    300
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("chainsight").required(false))
            .add_source(Environment::with_prefix("CHAINSIGHT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_config_file() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings.cache_ttl_seconds, 300);
        assert!(settings.cortex.model.is_none());
    }
}
