//! # repro-core
//!
//! Core library for scoring the reproducibility of documentation-embedded
//! demonstration code. Given an artifact's documentation text, the
//! pipeline extracts the best candidate demo snippet, statically analyzes
//! it (with oracle-backed repair), executes it inside a locked-down
//! container sandbox, and emits a calibrated score: 1.0 when the original
//! code runs, 0.5 when it runs only after a repair, 0.0 otherwise.
//!
//! The surrounding scoring system supplies documentation text and
//! consumes the single [`ReproducibilityResult`]; everything else
//! (metric weighting, persistence, CLI) lives outside this crate.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod oracle;
pub mod orchestrator;
pub mod sandbox;
pub mod selector;
pub mod types;

// Re-export commonly used types at the crate root.
pub use analyzer::StaticAnalyzer;
pub use config::{AnalyzerConfig, OracleConfig, ReproConfig, SandboxConfig, load_config};
pub use error::{ReproError, Result};
pub use oracle::{CompletionOracle, HttpOracle, MockOracle};
pub use orchestrator::ReproducibilityOrchestrator;
pub use sandbox::{ContainerSandbox, MockSandbox, SandboxRunner};
pub use selector::CandidateSelector;
pub use types::{
    CandidateBlock, DebugResult, ExecutionOutcome, ExecutionStatus, ReproducibilityResult,
    StaticAnalysisResult,
};
