use regex::RegexBuilder;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{fingerprint, PatternType, Rule, RulePattern, Vulnerability, VulnerabilityStatus};
use crate::selector::normalize;

const SNIPPET_CONTEXT_LINES: usize = 2;

/// A raw pattern hit in one file, before it becomes a tracked finding.
#[derive(Debug, Clone)]
pub struct Match<'r> {
    pub rule: &'r Rule,
    pub file: PathBuf,
    pub line_number: usize,
    pub column_number: usize,
    pub matched_text: String,
    pub code_snippet: String,
    pub message: String,
}

impl Match<'_> {
    /// Converts the match into a vulnerability whose fingerprint is computed
    /// from the rule id, the root-relative path and the matched text —
    /// deliberately not from line/column, so positional drift keeps the
    /// finding's identity.
    pub fn into_vulnerability(self, root: &Path, now: i64) -> Vulnerability {
        let relative = self
            .file
            .strip_prefix(root)
            .map(normalize)
            .unwrap_or_else(|_| self.file.to_string_lossy().replace('\\', "/"));
        let fingerprint = fingerprint(&self.rule.id, &relative, &self.matched_text);
        Vulnerability {
            rule_id: self.rule.id.clone(),
            rule_name: self.rule.name.clone(),
            severity: self.rule.severity,
            category: self.rule.category,
            description: self.message,
            file_path: relative,
            line_number: self.line_number,
            column_number: self.column_number,
            code_snippet: self.code_snippet,
            compliance: self.rule.compliance.clone(),
            quick_fix: self.rule.quick_fix.clone(),
            status: VulnerabilityStatus::New,
            first_detected: now,
            last_detected: now,
            fingerprint,
        }
    }
}

/// Applies one rule's patterns to one file.
///
/// Never raises: a disabled rule, an unreadable or binary file, or an
/// invalid regex in a single pattern all degrade to zero matches for the
/// affected scope while everything else keeps running.
pub struct PatternMatcher;

impl PatternMatcher {
    pub fn new() -> Self {
        PatternMatcher
    }

    pub fn match_rule<'r>(&self, rule: &'r Rule, file: &Path) -> Vec<Match<'r>> {
        if !rule.enabled {
            return Vec::new();
        }

        // read_to_string rejects non-UTF-8 content, which also filters
        // binaries out of regex matching
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!("cannot read {} for rule {}: {err}", file.display(), rule.id);
                return Vec::new();
            }
        };

        let extension = file
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        let mut matches = Vec::new();
        for pattern in &rule.patterns {
            if !pattern.file_types.is_empty()
                && !pattern.file_types.iter().any(|ft| ft == extension)
            {
                continue;
            }
            match pattern.kind {
                PatternType::Regex => {
                    matches.extend(self.match_regex(rule, pattern, file, &content));
                }
                // reserved pattern kinds: recognized, intentionally zero
                // matches until a real engine backs them
                PatternType::Ast | PatternType::Semantic | PatternType::Taint => {
                    tracing::debug!(
                        "rule {} pattern kind {:?} has no matcher, producing no matches",
                        rule.id,
                        pattern.kind
                    );
                }
            }
        }
        matches
    }

    fn match_regex<'r>(
        &self,
        rule: &'r Rule,
        pattern: &RulePattern,
        file: &Path,
        content: &str,
    ) -> Vec<Match<'r>> {
        let regex = match RegexBuilder::new(&pattern.pattern).multi_line(true).build() {
            Ok(regex) => regex,
            Err(err) => {
                tracing::warn!("invalid regex in rule {}: {err}", rule.id);
                return Vec::new();
            }
        };

        let mut matches = Vec::new();
        for found in regex.find_iter(content) {
            let line_number = line_number_at(content, found.start());
            let column_number = column_number_at(content, found.start());
            matches.push(Match {
                rule,
                file: file.to_path_buf(),
                line_number,
                column_number,
                matched_text: found.as_str().to_string(),
                code_snippet: snippet(content, line_number),
                message: pattern
                    .message
                    .clone()
                    .unwrap_or_else(|| rule.description.clone()),
            });
        }
        matches
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// 1-based line: newlines strictly before the offset, plus one.
fn line_number_at(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}

/// 1-based column: distance from the nearest preceding newline.
fn column_number_at(content: &str, offset: usize) -> usize {
    match content[..offset].rfind('\n') {
        Some(newline) => offset - newline,
        None => offset + 1,
    }
}

/// Up to two lines of context on each side of the match line, clamped at
/// the file boundaries.
fn snippet(content: &str, line_number: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_number.saturating_sub(SNIPPET_CONTEXT_LINES + 1);
    let end = (line_number + SNIPPET_CONTEXT_LINES).min(lines.len());
    lines[start..end].join("\n")
}
