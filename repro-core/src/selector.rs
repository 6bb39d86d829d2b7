//! Candidate demo-code selection from free-form documentation.
//!
//! Extracts fenced (or, failing that, indentation-delimited) code
//! blocks from README-style text, scores them for "looks like a
//! runnable model demo", and returns the single best block. Selection
//! is a pure function of its inputs: identical documentation always
//! yields the identical candidate.

use regex::Regex;
use tracing::debug;

use crate::types::CandidateBlock;

/// Heading keywords that mark a section as demo-related.
const SECTION_KEYWORDS: &[&str] = &[
    "usage",
    "how to use",
    "quick start",
    "example",
    "inference",
    "getting started",
];

/// Import names counted as recognized ML frameworks.
const ML_FRAMEWORKS: &[&str] = &["torch", "tensorflow", "transformers", "keras", "sklearn", "jax"];

/// One heading-delimited slice of the documentation.
struct Section {
    heading: Option<String>,
    body: String,
}

/// Selects the best executable-looking block from documentation text.
pub struct CandidateSelector {
    import_line: Regex,
    binding_line: Regex,
    opener_line: Regex,
    inference_call: Regex,
}

impl CandidateSelector {
    pub fn new() -> Self {
        Self {
            import_line: Regex::new(r"(?m)^\s*(import\s+\w|from\s+[\w.]+\s+import\s)").unwrap(),
            binding_line: Regex::new(r"(?m)^\s*(tokenizer|model)\s*=").unwrap(),
            opener_line: Regex::new(
                r"^(import\s|from\s+[\w.]+|def\s+\w|class\s+\w|@\w|[A-Za-z_][\w.\[\]]*\s*=|[A-Za-z_][\w.]*\()",
            )
            .unwrap(),
            inference_call: Regex::new(r"\.(generate|predict|encode|decode)\(").unwrap(),
        }
    }

    /// Pick the single best candidate block, or `None` when nothing in
    /// the documentation survives every stage. A `None` here is a
    /// terminal outcome for the whole evaluation.
    ///
    /// `artifact_url` is used only to discard blocks that merely repeat
    /// clone/download instructions for the artifact itself; it is never
    /// forwarded anywhere.
    pub fn select(&self, doc_text: &str, artifact_url: &str) -> Option<CandidateBlock> {
        if doc_text.trim().is_empty() {
            return None;
        }

        let sections = relevant_sections(doc_text);

        // Stage 1: python-tagged fences from demo-related sections.
        let mut candidates: Vec<(String, Option<String>)> = Vec::new();
        for section in &sections {
            for block in fenced_blocks(&section.body, FenceFilter::PythonTagged) {
                candidates.push((block, section.heading.clone()));
            }
        }

        // Stage 2: untagged fences that still look like demo code.
        if candidates.is_empty() {
            for section in &sections {
                for block in fenced_blocks(&section.body, FenceFilter::Untagged) {
                    if self.indicator_points(&block) >= 2 {
                        candidates.push((block, section.heading.clone()));
                    }
                }
            }
        }

        // Stage 3: heuristic indentation scan of the prose text. Fenced
        // regions were already judged by stages 1-2 and stay out of it.
        if candidates.is_empty() {
            for section in &sections {
                for block in self.scan_indented_blocks(&strip_fences(&section.body)) {
                    candidates.push((block, section.heading.clone()));
                }
            }
        }

        candidates.retain(|(block, _)| !is_url_only_block(block, artifact_url));
        if candidates.is_empty() {
            debug!("no candidate blocks survived selection");
            return None;
        }

        // Maximum score wins; ties resolve to the earliest occurrence.
        let mut best_idx = 0;
        let mut best_score = self.score_block(&candidates[0].0);
        for (idx, (block, _)) in candidates.iter().enumerate().skip(1) {
            let score = self.score_block(block);
            if score > best_score {
                best_score = score;
                best_idx = idx;
            }
        }

        let (raw, section) = candidates.swap_remove(best_idx);
        let cleaned = clean_block(&raw);
        if cleaned.trim().is_empty() {
            return None;
        }

        debug!(score = best_score, section = ?section, "selected candidate block");
        Some(CandidateBlock {
            text: cleaned,
            score: best_score,
            section,
        })
    }

    /// Weighted demo-code indicators for untagged fenced blocks.
    ///
    /// Two points are required to accept a block; the multi-call
    /// pattern alone is worth two.
    fn indicator_points(&self, block: &str) -> u32 {
        let mut points = 0;
        if self.import_line.is_match(block) {
            points += 1;
        }
        if block.contains("from_pretrained(") {
            points += 1;
        }
        if self.binding_line.is_match(block) {
            points += 1;
        }
        if self.inference_call.find_iter(block).count() >= 2 {
            points += 2;
        }
        if block.contains("pipeline(") {
            points += 1;
        }
        points
    }

    /// Score a block for completeness as a runnable demo.
    pub fn score_block(&self, block: &str) -> i32 {
        let mut score = 0;

        if block.contains("from_pretrained(") {
            score += 3;
        }
        if block.contains(".generate(")
            || block.contains(".predict(")
            || block.contains(".forward(")
            || block.contains("**")
        {
            score += 2;
        }
        if self.imports_ml_framework(block) {
            score += 1;
        }

        let non_blank = block.lines().filter(|l| !l.trim().is_empty()).count();
        if non_blank < 3 {
            score -= 2;
        }

        let line_count = block.lines().count() as i32;
        score += (line_count / 3).min(3);

        score
    }

    fn imports_ml_framework(&self, block: &str) -> bool {
        for line in block.lines() {
            let trimmed = line.trim();
            for fw in ML_FRAMEWORKS {
                if trimmed.starts_with(&format!("import {fw}"))
                    || trimmed.starts_with(&format!("from {fw}"))
                {
                    return true;
                }
            }
        }
        false
    }

    /// Last-resort scan for code-shaped runs of lines outside fences.
    ///
    /// A line matching an import/def/class/decorator/assignment/call
    /// pattern opens a block; the block continues over blank or
    /// indented lines and closes on the first unindented, non-blank,
    /// non-matching line.
    fn scan_indented_blocks(&self, text: &str) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            let is_blank = line.trim().is_empty();
            let is_indented = line.starts_with(' ') || line.starts_with('\t');
            let opens = !is_blank && !is_indented && self.opener_line.is_match(line);

            if current.is_empty() {
                if opens {
                    current.push(line);
                }
            } else if is_blank || is_indented || opens {
                current.push(line);
            } else {
                blocks.push(current.join("\n"));
                current.clear();
            }
        }
        if !current.is_empty() {
            blocks.push(current.join("\n"));
        }

        blocks
    }
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Split on heading markers (outside fences) and keep demo-related
/// sections; the whole document becomes one section when none match.
fn relevant_sections(text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut heading: Option<String> = None;
    let mut body: Vec<&str> = Vec::new();
    let mut in_fence = false;

    let mut flush = |heading: &Option<String>, body: &mut Vec<&str>, out: &mut Vec<Section>| {
        if !body.is_empty() {
            out.push(Section {
                heading: heading.clone(),
                body: body.join("\n"),
            });
            body.clear();
        }
    };

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            body.push(line);
            continue;
        }
        if !in_fence && line.starts_with('#') {
            flush(&heading, &mut body, &mut sections);
            heading = Some(line.trim_start_matches('#').trim().to_string());
            continue;
        }
        body.push(line);
    }
    flush(&heading, &mut body, &mut sections);

    let matched: Vec<Section> = sections
        .into_iter()
        .filter(|s| {
            s.heading.as_ref().is_some_and(|h| {
                let lower = h.to_lowercase();
                SECTION_KEYWORDS.iter().any(|kw| lower.contains(kw))
            })
        })
        .collect();

    if matched.is_empty() {
        vec![Section {
            heading: None,
            body: text.to_string(),
        }]
    } else {
        matched
    }
}

enum FenceFilter {
    PythonTagged,
    Untagged,
}

/// Collect fenced code blocks from a section body.
fn fenced_blocks(body: &str, filter: FenceFilter) -> Vec<String> {
    enum State<'a> {
        Outside,
        Collecting(Vec<&'a str>),
        Skipping,
    }

    let mut blocks = Vec::new();
    let mut state = State::Outside;

    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            state = match state {
                State::Outside => {
                    let info = trimmed.trim_start_matches('`').trim().to_lowercase();
                    let wanted = match filter {
                        FenceFilter::PythonTagged => info == "py" || info.starts_with("python"),
                        FenceFilter::Untagged => info.is_empty(),
                    };
                    if wanted {
                        State::Collecting(Vec::new())
                    } else {
                        State::Skipping
                    }
                }
                State::Collecting(lines) => {
                    blocks.push(lines.join("\n"));
                    State::Outside
                }
                State::Skipping => State::Outside,
            };
        } else if let State::Collecting(lines) = &mut state {
            lines.push(line);
        }
    }

    blocks
}

/// Drop fenced regions, fence markers included.
fn strip_fences(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_fence = false;
    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence {
            out.push(line);
        }
    }
    out.join("\n")
}

/// True when every non-blank line of the block mentions the artifact
/// URL, i.e. the block is a clone/download instruction, not demo code.
fn is_url_only_block(block: &str, artifact_url: &str) -> bool {
    if artifact_url.trim().is_empty() {
        return false;
    }
    let mut saw_line = false;
    for line in block.lines().filter(|l| !l.trim().is_empty()) {
        saw_line = true;
        if !line.contains(artifact_url) {
            return false;
        }
    }
    saw_line
}

/// Strip interactive-session artifacts from the winning block.
fn clean_block(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in raw.lines() {
        if line.trim() == "..." {
            continue;
        }
        let stripped = if let Some(rest) = line.strip_prefix(">>> ") {
            rest
        } else if line.trim() == ">>>" {
            ""
        } else if let Some(rest) = line.strip_prefix("... ") {
            rest
        } else {
            line
        };
        lines.push(stripped.to_string());
    }

    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}
