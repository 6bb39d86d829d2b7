//! Fundamental types for the reproducibility pipeline.
//!
//! Every value here is produced once and never mutated afterwards; the
//! pipeline passes results forward instead of stashing them in shared
//! fields.

use serde::{Deserialize, Serialize};

/// A contiguous documentation fragment believed to be executable
/// demonstration code, prior to any verification.
///
/// Created transiently during selection and discarded once the best
/// block has been chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBlock {
    /// The raw block text (post-cleanup for the winning block).
    pub text: String,
    /// Completeness score assigned by the selection heuristics.
    pub score: i32,
    /// Heading of the section the block was found under, if any
    /// matched a demo-related keyword.
    pub section: Option<String>,
}

/// Outcome of one static-analysis pass over a candidate block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticAnalysisResult {
    /// Whether issues were found that a repaired variant addresses.
    pub has_fixable_issues: bool,
    /// Human-readable issue strings, in detection order.
    pub issues_found: Vec<String>,
    /// The repaired code, when a repair was produced.
    pub fixed_code: Option<String>,
    /// Analyzer confidence in its verdict, in [0, 1].
    pub confidence: f64,
}

impl StaticAnalysisResult {
    /// A clean verdict: nothing to fix.
    pub fn clean(confidence: f64) -> Self {
        Self {
            has_fixable_issues: false,
            issues_found: Vec::new(),
            fixed_code: None,
            confidence,
        }
    }
}

/// Outcome of one post-failure debug attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugResult {
    /// Whether a plausible fix was produced and validated.
    pub has_potential_fix: bool,
    /// The suggested replacement code, when accepted.
    pub fixed_code: Option<String>,
    /// Short description of the diagnosed cause and applied fix.
    pub fix_description: String,
}

impl DebugResult {
    /// A verdict of "no usable fix".
    pub fn no_fix(description: impl Into<String>) -> Self {
        Self {
            has_potential_fix: false,
            fixed_code: None,
            fix_description: description.into(),
        }
    }
}

/// Raw result of one sandbox invocation. One instance per invocation,
/// never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Process exit code; -1 when synthesized for a timeout.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// True when the outer wall-clock timeout fired.
    pub timed_out: bool,
}

impl ExecutionOutcome {
    /// Whether the execution completed successfully.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

    /// The synthesized outcome for an expired wall-clock timeout.
    pub fn timeout() -> Self {
        Self {
            exit_code: -1,
            stdout: String::new(),
            stderr: "Execution timed out".to_string(),
            timed_out: true,
        }
    }

    /// The error text preferred for debugging: stderr, falling back to
    /// stdout, falling back to a placeholder.
    pub fn error_text(&self) -> &str {
        if !self.stderr.trim().is_empty() {
            &self.stderr
        } else if !self.stdout.trim().is_empty() {
            &self.stdout
        } else {
            "No error output captured"
        }
    }
}

/// Terminal status of one reproducibility evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Nothing extractable from the documentation.
    NoDemoCode,
    /// Original code ran cleanly with no repair of any kind.
    Success,
    /// A pre-execution repair was applied and the fixed code ran.
    FixedAndWorking,
    /// First execution failed; the debug-suggested fix ran.
    DebuggedAndWorking,
    /// Execution failed and the debug oracle produced no valid fix.
    UnfixableError,
    /// Execution failed and the debug-suggested fix also failed.
    DebugFailed,
    /// An unanticipated failure inside the pipeline itself.
    Exception,
    /// The per-evaluation workspace could not be created.
    SetupError,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExecutionStatus::NoDemoCode => "no_demo_code",
            ExecutionStatus::Success => "success",
            ExecutionStatus::FixedAndWorking => "fixed_and_working",
            ExecutionStatus::DebuggedAndWorking => "debugged_and_working",
            ExecutionStatus::UnfixableError => "unfixable_error",
            ExecutionStatus::DebugFailed => "debug_failed",
            ExecutionStatus::Exception => "exception",
            ExecutionStatus::SetupError => "setup_error",
        };
        write!(f, "{s}")
    }
}

/// The sole externally visible artifact of one evaluation.
///
/// `score` is always exactly 1.0, 0.5, or 0.0 — the three calibrated
/// values. No interpolation occurs anywhere in the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproducibilityResult {
    pub score: f64,
    pub execution_status: ExecutionStatus,
    /// Short diagnostic for failed evaluations.
    pub error_message: Option<String>,
    /// Summary of static issues found pre-execution, if any.
    pub fixability_assessment: Option<String>,
}

impl ReproducibilityResult {
    pub fn new(score: f64, execution_status: ExecutionStatus) -> Self {
        Self {
            score,
            execution_status,
            error_message: None,
            fixability_assessment: None,
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_assessment(mut self, assessment: impl Into<String>) -> Self {
        self.fixability_assessment = Some(assessment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_execution_outcome_timeout() {
        let outcome = ExecutionOutcome::timeout();
        assert_eq!(outcome.exit_code, -1);
        assert!(outcome.timed_out);
        assert!(!outcome.succeeded());
        assert_eq!(outcome.stderr, "Execution timed out");
        assert!(outcome.stdout.is_empty());
    }

    #[test]
    fn test_error_text_preference() {
        let outcome = ExecutionOutcome {
            exit_code: 1,
            stdout: "partial output".into(),
            stderr: "Traceback".into(),
            timed_out: false,
        };
        assert_eq!(outcome.error_text(), "Traceback");

        let outcome = ExecutionOutcome {
            exit_code: 1,
            stdout: "partial output".into(),
            stderr: "   ".into(),
            timed_out: false,
        };
        assert_eq!(outcome.error_text(), "partial output");

        let outcome = ExecutionOutcome {
            exit_code: 1,
            stdout: String::new(),
            stderr: String::new(),
            timed_out: false,
        };
        assert_eq!(outcome.error_text(), "No error output captured");
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&ExecutionStatus::FixedAndWorking).unwrap();
        assert_eq!(json, "\"fixed_and_working\"");
        let back: ExecutionStatus = serde_json::from_str("\"no_demo_code\"").unwrap();
        assert_eq!(back, ExecutionStatus::NoDemoCode);
    }

    #[test]
    fn test_result_builders() {
        let result = ReproducibilityResult::new(0.0, ExecutionStatus::UnfixableError)
            .with_error("boom")
            .with_assessment("missing import");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.error_message.as_deref(), Some("boom"));
        assert_eq!(result.fixability_assessment.as_deref(), Some("missing import"));
    }
}
