//! Configuration for the reproducibility pipeline.
//!
//! Uses `figment` for layered configuration: defaults -> `repro.toml`
//! in the working directory -> `REPRO_`-prefixed environment variables
//! (double underscore separates nesting, e.g. `REPRO_ORACLE__MODEL`).

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration for one evaluator instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReproConfig {
    pub oracle: OracleConfig,
    pub sandbox: SandboxConfig,
    pub analyzer: AnalyzerConfig,
}

/// Text-completion oracle endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Base URL of an OpenAI-compatible chat completions endpoint.
    pub base_url: String,
    /// Name of the environment variable holding the API key. The key
    /// itself is never stored in configuration.
    pub api_key_env: String,
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Sampling temperature for repair requests.
    pub temperature: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
            temperature: 0.2,
        }
    }
}

/// Container sandbox settings.
///
/// The resource numbers are the security contract for untrusted demo
/// code; overriding them loosens the sandbox and should only happen in
/// controlled environments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Container runtime binary (docker-compatible CLI).
    pub runtime: String,
    /// Minimal language-runtime image used to execute candidates.
    pub image: String,
    /// Memory ceiling, also applied as the swap ceiling.
    pub memory_limit: String,
    /// CPU quota as a fraction of one core.
    pub cpus: String,
    /// Size cap for the in-memory scratch filesystem at /tmp.
    pub tmpfs_size: String,
    /// Process-count ceiling inside the container.
    pub pids_limit: u32,
    /// Open-file-descriptor ceiling inside the container.
    pub nofile_limit: u32,
    /// Outer wall-clock timeout in seconds, enforced by the caller
    /// independent of any in-container limit.
    pub timeout_secs: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            runtime: "docker".to_string(),
            image: "python:3.11-slim".to_string(),
            memory_limit: "256m".to_string(),
            cpus: "0.5".to_string(),
            tmpfs_size: "50m".to_string(),
            pids_limit: 32,
            nofile_limit: 64,
            timeout_secs: 30,
        }
    }
}

/// Static-analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// External lint binary. Findings are restricted to error/warning
    /// severities; a missing binary degrades to zero findings.
    pub lint_binary: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            lint_binary: "pylint".to_string(),
        }
    }
}

/// Load configuration with figment layering.
///
/// Precedence (highest wins):
/// 1. `REPRO_`-prefixed environment variables
/// 2. `repro.toml` in `dir` (when present)
/// 3. Built-in defaults
pub fn load_config(dir: Option<&Path>) -> Result<ReproConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ReproConfig::default()));

    if let Some(dir) = dir {
        let file = dir.join("repro.toml");
        if file.exists() {
            figment = figment.merge(Toml::file(&file));
        }
    }

    figment = figment.merge(Env::prefixed("REPRO_").split("__"));

    figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ReproConfig::default();
        assert_eq!(config.sandbox.runtime, "docker");
        assert_eq!(config.sandbox.image, "python:3.11-slim");
        assert_eq!(config.sandbox.memory_limit, "256m");
        assert_eq!(config.sandbox.cpus, "0.5");
        assert_eq!(config.sandbox.tmpfs_size, "50m");
        assert_eq!(config.sandbox.pids_limit, 32);
        assert_eq!(config.sandbox.nofile_limit, 64);
        assert_eq!(config.sandbox.timeout_secs, 30);
        assert_eq!(config.analyzer.lint_binary, "pylint");
        assert_eq!(config.oracle.timeout_secs, 60);
    }

    #[test]
    fn test_load_config_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("repro.toml"),
            "[sandbox]\nimage = \"python:3.12-slim\"\ntimeout_secs = 10\n",
        )
        .unwrap();

        let config = load_config(Some(dir.path())).unwrap();
        assert_eq!(config.sandbox.image, "python:3.12-slim");
        assert_eq!(config.sandbox.timeout_secs, 10);
        // Untouched fields keep their defaults.
        assert_eq!(config.sandbox.memory_limit, "256m");
    }

    #[test]
    fn test_load_config_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(dir.path())).unwrap();
        assert_eq!(config.oracle.model, "gpt-4o-mini");
    }
}
