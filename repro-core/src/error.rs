//! Error types for the reproducibility core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering the oracle, sandbox, analyzer, and configuration domains.
//!
//! Errors here never cross the orchestrator's public boundary: the
//! orchestrator absorbs them and emits a `ReproducibilityResult` instead.

use std::path::PathBuf;

/// Top-level error type for the reproducibility pipeline internals.
#[derive(Debug, thiserror::Error)]
pub enum ReproError {
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Sandbox error: {0}")]
    Sandbox(#[from] SandboxError),

    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Workspace setup failed: {0}")]
    WorkspaceSetup(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from text-completion oracle interactions.
///
/// Callers treat all of these as "empty completion" rather than aborting
/// the evaluation.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("API key environment variable not set: {var}")]
    MissingApiKey { var: String },
}

/// Errors from the container sandbox.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("Failed to write code to workspace file {path}: {source}")]
    WriteCode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn container runtime '{runtime}': {source}")]
    Spawn {
        runtime: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Container runtime produced no exit status")]
    MissingStatus,
}

/// Errors from static analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Parser initialization failed for the candidate dialect")]
    ParserInit,

    #[error("Lint scratch file error: {0}")]
    LintScratch(#[source] std::io::Error),
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// Convenience alias used throughout the crate internals.
pub type Result<T> = std::result::Result<T, ReproError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReproError::Oracle(OracleError::ApiRequest {
            message: "connection refused".into(),
        });
        assert_eq!(
            err.to_string(),
            "Oracle error: API request failed: connection refused"
        );
    }

    #[test]
    fn test_sandbox_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ReproError = SandboxError::Spawn {
            runtime: "docker".into(),
            source: io,
        }
        .into();
        assert!(matches!(err, ReproError::Sandbox(_)));
    }
}
