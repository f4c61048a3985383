use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What the builder does with an initial marking that holds more than one token somewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyPolicy {
    /// Log a warning and build anyway.
    #[default]
    Warn,
    /// Fail construction with `PnmlError::NotOneSafe`.
    Reject,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SimConfig {
    pub safety: SafetyPolicy,
    /// Log a connectivity report once the net is built.
    pub diagnostics: bool,
}

impl SimConfig {
    pub fn strict() -> Self {
        Self {
            safety: SafetyPolicy::Reject,
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse simulator config")
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: SimConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimConfig::load_from_file(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.safety, SafetyPolicy::Warn);
        assert!(!config.diagnostics);
    }

    #[test]
    fn reads_policy_and_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pnsim.toml");
        fs::write(&path, "safety = \"reject\"\ndiagnostics = true\n").unwrap();
        let config = SimConfig::load_from_file(&path).unwrap();
        assert_eq!(config.safety, SafetyPolicy::Reject);
        assert!(config.diagnostics);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = SimConfig::from_toml_str("diagnostics = true").unwrap();
        assert_eq!(config.safety, SafetyPolicy::Warn);
        assert!(config.diagnostics);
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let err = SimConfig::from_toml_str("safety = \"maybe\"").unwrap_err();
        assert!(err.to_string().contains("simulator config"));
    }
}
