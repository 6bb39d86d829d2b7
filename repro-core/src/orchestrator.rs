//! The reproducibility state machine.
//!
//! Sequences selection, static analysis, sandboxed execution, and the
//! single debug/re-execute cycle, applying the capped-score policy:
//!
//! ```text
//! SELECTING -> ANALYZING -> EXECUTING -> success -> DONE
//!                                     -> failure -> DEBUGGING -> RE-EXECUTING -> DONE
//! ```
//!
//! `evaluate` is total: every failure anywhere in the pipeline is
//! converted into a `ReproducibilityResult`, never an error or panic.
//! The score is always exactly 1.0, 0.5, or 0.0, and at most two
//! sandbox invocations occur per evaluation.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analyzer::{ERROR_EXCERPT_CHARS, StaticAnalyzer};
use crate::config::ReproConfig;
use crate::error::Result;
use crate::oracle::{CompletionOracle, HttpOracle};
use crate::sandbox::{ContainerSandbox, SandboxRunner};
use crate::selector::CandidateSelector;
use crate::types::{ExecutionStatus, ReproducibilityResult};

/// Truncation for each half of a combined original-plus-retry error.
const RETRY_ERROR_CHARS: usize = 200;

pub struct ReproducibilityOrchestrator {
    selector: CandidateSelector,
    analyzer: StaticAnalyzer,
    sandbox: Arc<dyn SandboxRunner>,
}

impl ReproducibilityOrchestrator {
    /// Build an orchestrator with injected oracle and sandbox seams.
    pub fn new(
        oracle: Arc<dyn CompletionOracle>,
        sandbox: Arc<dyn SandboxRunner>,
        config: &ReproConfig,
    ) -> Result<Self> {
        Ok(Self {
            selector: CandidateSelector::new(),
            analyzer: StaticAnalyzer::new(oracle, &config.analyzer)?,
            sandbox,
        })
    }

    /// Build an orchestrator wired to the real HTTP oracle and the
    /// container sandbox.
    pub fn from_config(config: &ReproConfig) -> Result<Self> {
        let oracle: Arc<dyn CompletionOracle> = Arc::new(HttpOracle::new(&config.oracle)?);
        let sandbox: Arc<dyn SandboxRunner> =
            Arc::new(ContainerSandbox::new(config.sandbox.clone()));
        Self::new(oracle, sandbox, config)
    }

    /// Evaluate one artifact's documentation. Always returns a result;
    /// no exception crosses this boundary.
    pub async fn evaluate(&self, doc_text: &str, artifact_url: &str) -> ReproducibilityResult {
        let workspace = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!(error = %e, "workspace creation failed");
                return ReproducibilityResult::new(0.0, ExecutionStatus::SetupError)
                    .with_error(format!("Failed to create workspace: {e}"));
            }
        };

        let result = match self.run(doc_text, artifact_url, workspace.path()).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "pipeline failure absorbed at orchestrator boundary");
                ReproducibilityResult::new(0.0, ExecutionStatus::Exception)
                    .with_error(e.to_string())
            }
        };

        info!(
            score = result.score,
            status = %result.execution_status,
            "reproducibility evaluation finished"
        );
        // `workspace` drops here, removing the directory on every path.
        result
    }

    async fn run(
        &self,
        doc_text: &str,
        artifact_url: &str,
        workspace: &std::path::Path,
    ) -> Result<ReproducibilityResult> {
        // SELECTING
        let Some(block) = self.selector.select(doc_text, artifact_url) else {
            return Ok(ReproducibilityResult::new(0.0, ExecutionStatus::NoDemoCode));
        };
        debug!(score = block.score, section = ?block.section, "candidate selected");

        // ANALYZING: a pre-execution repair caps the score at 0.5.
        let analysis = self.analyzer.analyze(&block.text).await;
        let (code, mut cap) = if analysis.has_fixable_issues {
            let fixed = analysis
                .fixed_code
                .clone()
                .unwrap_or_else(|| block.text.clone());
            (fixed, 0.5)
        } else {
            (block.text.clone(), 1.0)
        };
        let assessment = if analysis.issues_found.is_empty() {
            None
        } else {
            Some(analysis.issues_found.join("; "))
        };

        // EXECUTING
        let outcome = self.sandbox.execute(&code, workspace).await?;
        if outcome.succeeded() {
            let status = if cap >= 1.0 {
                ExecutionStatus::Success
            } else {
                ExecutionStatus::FixedAndWorking
            };
            let mut result = ReproducibilityResult::new(cap, status);
            result.fixability_assessment = assessment;
            return Ok(result);
        }

        // Any execution failure caps the remaining attainable score.
        cap = cap.min(0.5);
        let original_error = outcome.error_text().to_string();
        debug!(exit_code = outcome.exit_code, timed_out = outcome.timed_out, "execution failed");

        // DEBUGGING
        let debug_result = self.analyzer.debug(&code, &original_error).await;
        let Some(fixed) = debug_result
            .has_potential_fix
            .then_some(debug_result.fixed_code)
            .flatten()
        else {
            let mut result = ReproducibilityResult::new(0.0, ExecutionStatus::UnfixableError)
                .with_error(truncate_chars(&original_error, ERROR_EXCERPT_CHARS));
            result.fixability_assessment = assessment;
            return Ok(result);
        };

        // RE-EXECUTING: same workspace, second and final invocation.
        let retry = self.sandbox.execute(&fixed, workspace).await?;
        if retry.succeeded() {
            let result = ReproducibilityResult::new(cap, ExecutionStatus::DebuggedAndWorking)
                .with_assessment(join_assessment(assessment, &debug_result.fix_description));
            return Ok(result);
        }

        let mut result = ReproducibilityResult::new(0.0, ExecutionStatus::DebugFailed).with_error(
            format!(
                "Original error: {} | Debug attempt error: {}",
                truncate_chars(&original_error, RETRY_ERROR_CHARS),
                truncate_chars(retry.error_text(), RETRY_ERROR_CHARS),
            ),
        );
        result.fixability_assessment = assessment;
        Ok(result)
    }
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

fn join_assessment(existing: Option<String>, fix_description: &str) -> String {
    match existing {
        Some(prior) => format!("{prior}; {fix_description}"),
        None => fix_description.to_string(),
    }
}
