//! Static analysis and oracle-backed repair for candidate demo code.
//!
//! Three detection layers run before any execution: a tree-sitter
//! syntax check, missing-import heuristics, and an external lint tool
//! restricted to error/warning severities. Anything found is handed to
//! the completion oracle for a single repair attempt. Clean code gets
//! one further oracle review for subtler runtime/deprecation/logic
//! problems.
//!
//! After a failed execution, `debug` asks the oracle for a
//! cause/fix/corrected-code triple and validates the suggestion before
//! accepting it.
//!
//! Every oracle interaction is fallible by design: transport errors,
//! malformed replies, and missing fields all degrade to an empty
//! completion instead of propagating.

use regex::Regex;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::oracle::CompletionOracle;
use crate::types::{DebugResult, StaticAnalysisResult};

/// Truncation applied to error output embedded in debug prompts and
/// carried into result records.
pub const ERROR_EXCERPT_CHARS: usize = 500;

pub struct StaticAnalyzer {
    oracle: Arc<dyn CompletionOracle>,
    lint_binary: String,
    parser: Mutex<tree_sitter::Parser>,
    import_line: Regex,
    assignment_line: Regex,
    call_expr: Regex,
    lint_finding: Regex,
}

impl StaticAnalyzer {
    pub fn new(
        oracle: Arc<dyn CompletionOracle>,
        config: &AnalyzerConfig,
    ) -> Result<Self, AnalyzerError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|_| AnalyzerError::ParserInit)?;

        Ok(Self {
            oracle,
            lint_binary: config.lint_binary.clone(),
            parser: Mutex::new(parser),
            import_line: Regex::new(r"(?m)^\s*(import\s+\w|from\s+[\w.]+\s+import\s)").unwrap(),
            assignment_line: Regex::new(r"(?m)^\s*[\w.\[\]]+\s*=[^=]").unwrap(),
            call_expr: Regex::new(r"[A-Za-z_][\w.]*\(").unwrap(),
            lint_finding: Regex::new(r"(?m)^[^:\n]+:(\d+):\d+:\s*([EW]\d+.*)$").unwrap(),
        })
    }

    /// Run the full pre-execution analysis over a candidate block.
    pub async fn analyze(&self, code: &str) -> StaticAnalysisResult {
        let mut issues: Vec<String> = Vec::new();

        if let Some(issue) = self.syntax_issue(code) {
            issues.push(issue);
        }
        issues.extend(missing_import_issues(code));
        issues.extend(self.lint_issues(code).await);

        if !issues.is_empty() {
            debug!(count = issues.len(), "static issues found, requesting repair");
            let reply = self.complete_or_empty(&repair_prompt(code, &issues)).await;
            let fixed = extract_code_from_reply(&reply).unwrap_or_else(|| code.to_string());
            return StaticAnalysisResult {
                has_fixable_issues: true,
                issues_found: issues,
                fixed_code: Some(fixed),
                confidence: 0.9,
            };
        }

        // Nothing mechanical to complain about; ask for subtler problems.
        let reply = self.complete_or_empty(&review_prompt(code)).await;
        if is_clean_review(&reply) {
            return StaticAnalysisResult::clean(0.95);
        }

        let issues = review_issues(&reply);
        let fixed = extract_code_from_reply(&reply).unwrap_or_else(|| code.to_string());
        StaticAnalysisResult {
            has_fixable_issues: true,
            issues_found: issues,
            fixed_code: Some(fixed),
            confidence: 0.6,
        }
    }

    /// Ask the oracle to diagnose a failed execution and propose a fix.
    pub async fn debug(&self, failed_code: &str, error_text: &str) -> DebugResult {
        let excerpt: String = error_text.chars().take(ERROR_EXCERPT_CHARS).collect();
        let reply = self
            .complete_or_empty(&debug_prompt(failed_code, &excerpt))
            .await;
        if reply.trim().is_empty() {
            return DebugResult::no_fix("Oracle produced no debugging suggestion");
        }

        let description = debug_description(&reply);
        let Some(candidate) = extract_code_from_reply(&reply) else {
            return DebugResult::no_fix(description);
        };

        // A fix only counts if it actually changes something, still
        // parses, and contains real code structure.
        if candidate.trim() == failed_code.trim() {
            return DebugResult::no_fix("Oracle returned the original code unchanged");
        }
        if self.syntax_issue(&candidate).is_some() {
            return DebugResult::no_fix("Oracle-suggested fix does not parse");
        }
        if !self.has_code_structure(&candidate) {
            return DebugResult::no_fix("Oracle-suggested fix contains no executable code");
        }

        DebugResult {
            has_potential_fix: true,
            fixed_code: Some(candidate),
            fix_description: description,
        }
    }

    /// Syntax-check the code, distinguishing indentation errors from
    /// generic syntax errors. Code that parses cleanly is never
    /// flagged; the indentation heuristic only classifies a failure
    /// the parser already reported.
    fn syntax_issue(&self, code: &str) -> Option<String> {
        let mut parser = self.parser.lock().ok()?;
        let tree = parser.parse(code, None)?;
        let root = tree.root_node();
        if !root.has_error() {
            return None;
        }
        if let Some(line) = unexpected_indent_line(code) {
            return Some(format!("Indentation error at line {line}: unexpected indent"));
        }
        let line = first_error_line(root).unwrap_or(1);
        Some(format!("Syntax error at line {line}"))
    }

    /// Run the external lint tool; every failure mode degrades to zero
    /// findings.
    async fn lint_issues(&self, code: &str) -> Vec<String> {
        let scratch = match tempfile::Builder::new().suffix(".py").tempfile() {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, "lint scratch file creation failed; skipping lint");
                return Vec::new();
            }
        };
        if let Err(e) = std::fs::write(scratch.path(), code) {
            warn!(error = %e, "lint scratch file write failed; skipping lint");
            return Vec::new();
        }

        let output = tokio::process::Command::new(&self.lint_binary)
            .arg("--disable=all")
            .arg("--enable=E,W")
            .arg("--score=n")
            .arg("--output-format=text")
            .arg(scratch.path())
            .output()
            .await;

        let output = match output {
            Ok(o) => o,
            Err(e) => {
                warn!(binary = %self.lint_binary, error = %e, "lint tool unavailable; skipping lint");
                return Vec::new();
            }
        };

        let text = String::from_utf8_lossy(&output.stdout);
        self.lint_finding
            .captures_iter(&text)
            .map(|cap| format!("line {}: {}", &cap[1], cap[2].trim()))
            .collect()
    }

    async fn complete_or_empty(&self, prompt: &str) -> String {
        match self.oracle.complete(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "oracle call failed; treating as empty completion");
                String::new()
            }
        }
    }

    fn has_code_structure(&self, code: &str) -> bool {
        self.import_line.is_match(code)
            || self.assignment_line.is_match(code)
            || self.call_expr.is_match(code)
    }
}

/// Locate an unexpected indent outside brackets: a line more indented
/// than the previous logical line when that line did not open a block
/// or continue explicitly. Only called on code the parser already
/// rejected, so it classifies failures rather than detecting them.
/// Blank lines, comment-only lines, trailing comments, and the inside
/// of triple-quoted strings are ignored, as the language tokenizer
/// ignores them for indentation.
fn unexpected_indent_line(code: &str) -> Option<usize> {
    let mut depth: i32 = 0;
    let mut prev_indent: usize = 0;
    let mut prev_allows_indent = true; // start of file allows any indent level 0
    let mut in_triple: Option<&str> = None;

    for (idx, line) in code.lines().enumerate() {
        if let Some(delim) = in_triple {
            if line.contains(delim) {
                in_triple = None;
            }
            continue;
        }

        let without_comment = strip_trailing_comment(line);
        let stripped = without_comment.trim();
        if stripped.is_empty() {
            continue;
        }

        let indent = line.len() - line.trim_start().len();
        if depth == 0 && indent > prev_indent && !prev_allows_indent {
            return Some(idx + 1);
        }

        for ch in stripped.chars() {
            match ch {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                _ => {}
            }
        }

        if depth == 0 {
            prev_indent = indent;
            prev_allows_indent = stripped.ends_with(':') || stripped.ends_with('\\');
        }

        for delim in ["\"\"\"", "'''"] {
            if without_comment.matches(delim).count() % 2 == 1 {
                in_triple = Some(delim);
                break;
            }
        }
    }
    None
}

/// Drop a trailing `#` comment, respecting single- and double-quoted
/// strings on the same line.
fn strip_trailing_comment(line: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '#' if !in_single && !in_double => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Line (1-based) of the first error or missing node in the tree.
fn first_error_line(root: tree_sitter::Node<'_>) -> Option<usize> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        if !node.has_error() {
            continue;
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    Some(root.start_position().row + 1)
}

/// Heuristic missing-import detection for the frameworks demo code
/// leans on most.
fn missing_import_issues(code: &str) -> Vec<String> {
    let mut issues = Vec::new();

    let imports_torch = code.contains("import torch");
    if code.contains("torch.") && !imports_torch {
        issues.push("References torch without importing it".to_string());
    }

    let imports_numpy = code.contains("import numpy");
    if (code.contains("np.") || code.contains("numpy.")) && !imports_numpy {
        issues.push("References numpy without importing it".to_string());
    }

    let transformers_idioms = code.contains("from_pretrained(")
        || code.contains("pipeline(")
        || code.contains("AutoModel")
        || code.contains("AutoTokenizer");
    let imports_transformers =
        code.contains("import transformers") || code.contains("from transformers");
    if transformers_idioms && !imports_transformers {
        issues.push("Uses transformers APIs without importing transformers".to_string());
    }

    issues
}

fn repair_prompt(code: &str, issues: &[String]) -> String {
    let mut listed = String::new();
    for (i, issue) in issues.iter().enumerate() {
        listed.push_str(&format!("{}. {}\n", i + 1, issue));
    }
    format!(
        "The following Python demonstration code has static issues:\n\n{listed}\n\
         Original code:\n```python\n{code}\n```\n\n\
         Fix the listed issues with minimal changes and return the complete \
         corrected code in a single ```python code block."
    )
}

fn review_prompt(code: &str) -> String {
    format!(
        "Review the following Python demonstration code for subtle problems: \
         runtime errors, deprecated APIs, or logic mistakes that static checks miss.\n\n\
         ```python\n{code}\n```\n\n\
         If the code looks correct, reply with exactly NO_ISSUES. Otherwise reply with:\n\
         ISSUES:\n- one issue per line\n\
         followed by the corrected code in a single ```python code block."
    )
}

fn debug_prompt(code: &str, error_excerpt: &str) -> String {
    format!(
        "This Python code failed when executed in a sandbox.\n\n\
         Code:\n```python\n{code}\n```\n\n\
         Error output (truncated):\n{error_excerpt}\n\n\
         Respond with:\n\
         CAUSE: one-line diagnosis\n\
         FIX: one-line description of the change\n\
         CODE:\nthe complete corrected code in a single ```python code block"
    )
}

/// Whether a review reply reports no issues.
fn is_clean_review(reply: &str) -> bool {
    let trimmed = reply.trim();
    trimmed.is_empty()
        || trimmed.contains("NO_ISSUES")
        || trimmed.to_lowercase().contains("no issues")
}

/// Issue strings from a review reply: `- ` bullets under an ISSUES:
/// label, or a generic fallback when the reply has no recognizable list.
fn review_issues(reply: &str) -> Vec<String> {
    let issues: Vec<String> = reply
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            line.strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .map(|s| s.trim().to_string())
        })
        .filter(|s| !s.is_empty())
        .collect();
    if issues.is_empty() {
        vec!["Oracle flagged potential runtime issues".to_string()]
    } else {
        issues
    }
}

/// CAUSE/FIX lines from a debug reply, or the first non-empty line.
fn debug_description(reply: &str) -> String {
    let mut parts = Vec::new();
    for line in reply.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("CAUSE:") {
            parts.push(rest.trim().to_string());
        } else if let Some(rest) = trimmed.strip_prefix("FIX:") {
            parts.push(rest.trim().to_string());
        }
    }
    if !parts.is_empty() {
        return parts.join("; ");
    }
    reply
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("```"))
        .unwrap_or("Oracle-suggested fix")
        .to_string()
}

/// Extract a code block from oracle free text.
///
/// Priority: language-tagged fence, generic fence, `CODE:` label up to
/// the next blank line or end, then trigger phrases.
fn extract_code_from_reply(reply: &str) -> Option<String> {
    if let Some(block) = fenced_region(reply, true) {
        return Some(block);
    }
    if let Some(block) = fenced_region(reply, false) {
        return Some(block);
    }
    if let Some(pos) = reply.find("CODE:") {
        let after = &reply[pos + "CODE:".len()..];
        let text: Vec<&str> = after
            .lines()
            .skip_while(|l| l.trim().is_empty())
            .take_while(|l| !l.trim().is_empty())
            .collect();
        if !text.is_empty() {
            return Some(text.join("\n"));
        }
    }
    let lower = reply.to_lowercase();
    for phrase in ["fixed code:", "corrected code:", "here is", "here's"] {
        if let Some(pos) = lower.find(phrase) {
            let after = reply[pos + phrase.len()..].trim();
            if !after.is_empty() {
                return Some(after.to_string());
            }
        }
    }
    None
}

/// First fenced region; `tagged` restricts to python-tagged fences.
fn fenced_region(reply: &str, tagged: bool) -> Option<String> {
    let mut collecting: Option<Vec<&str>> = None;
    for line in reply.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            match collecting.take() {
                Some(lines) => return Some(lines.join("\n")),
                None => {
                    let info = trimmed.trim_start_matches('`').trim().to_lowercase();
                    let wanted = if tagged {
                        info == "py" || info.starts_with("python")
                    } else {
                        true
                    };
                    if wanted {
                        collecting = Some(Vec::new());
                    }
                    // An unwanted opening fence: fall through; the matching
                    // close fence will be treated as an opener, which is
                    // harmless because the region in between is skipped.
                }
            }
        } else if let Some(lines) = collecting.as_mut() {
            lines.push(line);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{FailingOracle, MockOracle};
    use pretty_assertions::assert_eq;

    fn analyzer_with(oracle: Arc<dyn CompletionOracle>) -> StaticAnalyzer {
        // Nonexistent lint binary: lint degrades to zero findings, which
        // keeps these tests independent of installed tooling.
        let config = AnalyzerConfig {
            lint_binary: "definitely-not-a-linter".into(),
        };
        StaticAnalyzer::new(oracle, &config).unwrap()
    }

    #[test]
    fn test_syntax_error_detected() {
        let analyzer = analyzer_with(Arc::new(MockOracle::new()));
        let issue = analyzer.syntax_issue("def f(:\n    pass").unwrap();
        assert!(issue.starts_with("Syntax error"), "{issue}");
    }

    #[test]
    fn test_indentation_error_distinguished() {
        let analyzer = analyzer_with(Arc::new(MockOracle::new()));
        let issue = analyzer.syntax_issue("x = 1\n    y = 2").unwrap();
        assert!(issue.starts_with("Indentation error at line 2"), "{issue}");
    }

    #[test]
    fn test_valid_code_has_no_syntax_issue() {
        let analyzer = analyzer_with(Arc::new(MockOracle::new()));
        let code = "import torch\n\nif True:\n    x = torch.zeros(\n        3,\n    )\n    # indented comment\nprint(x)";
        assert_eq!(analyzer.syntax_issue(code), None);
    }

    #[test]
    fn test_colon_line_with_trailing_comment_is_valid() {
        let analyzer = analyzer_with(Arc::new(MockOracle::new()));
        let code = "if True:  # check\n    x = 1\nprint(x)";
        assert_eq!(analyzer.syntax_issue(code), None);
    }

    #[test]
    fn test_indented_triple_quoted_string_is_valid() {
        let analyzer = analyzer_with(Arc::new(MockOracle::new()));
        let code = "s = \"\"\"\n    hello\n\"\"\"\nprint(s)";
        assert_eq!(analyzer.syntax_issue(code), None);
    }

    #[test]
    fn test_hash_inside_string_is_not_a_comment() {
        let analyzer = analyzer_with(Arc::new(MockOracle::new()));
        let code = "color = '#ff0000'\nif True:\n    print(color)";
        assert_eq!(analyzer.syntax_issue(code), None);
    }

    #[tokio::test]
    async fn test_analyze_keeps_full_score_for_comment_after_colon() {
        let oracle = Arc::new(MockOracle::with_responses(["NO_ISSUES"]));
        let analyzer = analyzer_with(oracle);
        let result = analyzer.analyze("if True:  # check\n    x = 1\nprint(x)").await;
        assert!(!result.has_fixable_issues);
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_missing_import_heuristics() {
        let issues = missing_import_issues("x = torch.zeros(10)");
        assert_eq!(issues, vec!["References torch without importing it"]);

        let issues = missing_import_issues("import torch\nx = torch.zeros(10)");
        assert!(issues.is_empty());

        let issues = missing_import_issues("a = np.array([1])");
        assert_eq!(issues, vec!["References numpy without importing it"]);

        let issues = missing_import_issues("model = AutoModel.from_pretrained(\"m\")");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("transformers"));
    }

    #[tokio::test]
    async fn test_analyze_with_issues_requests_repair() {
        let oracle = Arc::new(MockOracle::with_responses([
            "Here is the corrected version:\n```python\nimport torch\nx = torch.zeros(10)\n```",
        ]));
        let analyzer = analyzer_with(oracle.clone());

        let result = analyzer.analyze("x = torch.zeros(10)").await;
        assert!(result.has_fixable_issues);
        assert_eq!(result.confidence, 0.9);
        assert!(!result.issues_found.is_empty());
        assert_eq!(
            result.fixed_code.as_deref(),
            Some("import torch\nx = torch.zeros(10)")
        );
        // The repair prompt enumerates the issues and embeds the code.
        let prompts = oracle.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("torch without importing"));
        assert!(prompts[0].contains("x = torch.zeros(10)"));
    }

    #[tokio::test]
    async fn test_analyze_repair_falls_back_to_original_code() {
        let oracle = Arc::new(MockOracle::with_responses(["I cannot help with that."]));
        let analyzer = analyzer_with(oracle);
        let result = analyzer.analyze("x = torch.zeros(10)").await;
        assert!(result.has_fixable_issues);
        assert_eq!(result.fixed_code.as_deref(), Some("x = torch.zeros(10)"));
    }

    #[tokio::test]
    async fn test_analyze_clean_code_clean_review() {
        let oracle = Arc::new(MockOracle::with_responses(["NO_ISSUES"]));
        let analyzer = analyzer_with(oracle);
        let result = analyzer.analyze("import os\nprint(os.getcwd())").await;
        assert!(!result.has_fixable_issues);
        assert_eq!(result.confidence, 0.95);
        assert!(result.issues_found.is_empty());
        assert_eq!(result.fixed_code, None);
    }

    #[tokio::test]
    async fn test_analyze_clean_code_review_finds_subtle_issue() {
        let oracle = Arc::new(MockOracle::with_responses([
            "ISSUES:\n- model.eval() is never called\n```python\nimport os\nprint(os.getcwd())\nextra = 1\n```",
        ]));
        let analyzer = analyzer_with(oracle);
        let result = analyzer.analyze("import os\nprint(os.getcwd())").await;
        assert!(result.has_fixable_issues);
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.issues_found, vec!["model.eval() is never called"]);
        assert!(result.fixed_code.unwrap().contains("extra = 1"));
    }

    #[tokio::test]
    async fn test_oracle_failure_degrades_to_clean() {
        let analyzer = analyzer_with(Arc::new(FailingOracle));
        // No static issues + failed review call = empty completion = clean.
        let result = analyzer.analyze("import os\nprint(os.getcwd())").await;
        assert!(!result.has_fixable_issues);
        assert_eq!(result.confidence, 0.95);
    }

    #[tokio::test]
    async fn test_debug_accepts_valid_differing_fix() {
        let oracle = Arc::new(MockOracle::with_responses([
            "CAUSE: missing import\nFIX: add import torch\nCODE:\n```python\nimport torch\nx = torch.zeros(10)\n```",
        ]));
        let analyzer = analyzer_with(oracle);
        let result = analyzer.debug("x = torch.zeros(10)", "NameError: name 'torch'").await;
        assert!(result.has_potential_fix);
        assert_eq!(result.fix_description, "missing import; add import torch");
        assert!(result.fixed_code.unwrap().starts_with("import torch"));
    }

    #[tokio::test]
    async fn test_debug_rejects_unchanged_code() {
        let oracle = Arc::new(MockOracle::with_responses([
            "```python\nx = torch.zeros(10)\n```",
        ]));
        let analyzer = analyzer_with(oracle);
        let result = analyzer.debug("x = torch.zeros(10)", "err").await;
        assert!(!result.has_potential_fix);
        assert_eq!(result.fixed_code, None);
    }

    #[tokio::test]
    async fn test_debug_rejects_unparsable_fix() {
        let oracle = Arc::new(MockOracle::with_responses([
            "```python\ndef broken(:\n    pass\n```",
        ]));
        let analyzer = analyzer_with(oracle);
        let result = analyzer.debug("x = 1", "err").await;
        assert!(!result.has_potential_fix);
    }

    #[tokio::test]
    async fn test_debug_rejects_prose_only_fix() {
        let oracle = Arc::new(MockOracle::with_responses([
            "```python\n# just a comment\n```",
        ]));
        let analyzer = analyzer_with(oracle);
        let result = analyzer.debug("x = 1", "err").await;
        assert!(!result.has_potential_fix);
    }

    #[tokio::test]
    async fn test_debug_truncates_error_to_500_chars() {
        let oracle = Arc::new(MockOracle::new());
        let analyzer = analyzer_with(oracle.clone());
        let long_error = "E".repeat(2000);
        let _ = analyzer.debug("x = 1", &long_error).await;
        let prompts = oracle.prompts();
        assert!(prompts[0].contains(&"E".repeat(500)));
        assert!(!prompts[0].contains(&"E".repeat(501)));
    }

    #[tokio::test]
    async fn test_debug_oracle_failure_means_no_fix() {
        let analyzer = analyzer_with(Arc::new(FailingOracle));
        let result = analyzer.debug("x = 1", "err").await;
        assert!(!result.has_potential_fix);
    }

    #[test]
    fn test_extract_code_priority_order() {
        // Tagged fence beats generic fence.
        let reply = "```\ngeneric\n```\n```python\ntagged = 1\n```";
        assert_eq!(extract_code_from_reply(reply).unwrap(), "tagged = 1");

        // Generic fence when no tagged fence exists.
        let reply = "```\nx = 1\n```";
        assert_eq!(extract_code_from_reply(reply).unwrap(), "x = 1");

        // CODE: label runs to the next blank line.
        let reply = "CODE:\nx = 1\ny = 2\n\ntrailing prose";
        assert_eq!(extract_code_from_reply(reply).unwrap(), "x = 1\ny = 2");

        // Trigger phrase as a last resort.
        let reply = "Sure! Here is x = 42";
        assert_eq!(extract_code_from_reply(reply).unwrap(), "x = 42");

        assert_eq!(extract_code_from_reply("no code anywhere"), None);
    }
}
