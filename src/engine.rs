use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;

use crate::matcher::PatternMatcher;
use crate::model::{Rule, ScanConfig, ScanResult, Vulnerability};
use crate::rules::RuleRepository;
use crate::selector::FileSelector;

/// Drives one scan pass: loads rules, walks the tree, applies every active
/// rule to every selected file.
pub struct ScanOrchestrator {
    repository: RuleRepository,
    matcher: PatternMatcher,
}

impl ScanOrchestrator {
    pub fn new() -> Self {
        ScanOrchestrator {
            repository: RuleRepository::new(),
            matcher: PatternMatcher::new(),
        }
    }

    pub fn scan(&self, root: &Path, config: &ScanConfig) -> ScanResult {
        let started = Instant::now();
        let now = Utc::now().timestamp_millis();

        let custom_dir = root.join(&config.custom_rules_path);
        let rules = self.repository.load_all(Some(custom_dir.as_path()));
        let rules = apply_rule_filters(rules, config);
        tracing::info!("scanning {} with {} rules", root.display(), rules.len());

        let selector = FileSelector::new(&config.include_patterns, &config.exclude_patterns);
        let files = selector.select(root);

        let mut vulnerabilities: Vec<Vulnerability> = Vec::new();
        let mut lines_scanned: u64 = 0;
        for file in &files {
            // binaries and unreadable files count zero lines and cannot
            // produce regex matches either
            match fs::read_to_string(file) {
                Ok(content) => lines_scanned += content.lines().count() as u64,
                Err(err) => {
                    tracing::warn!("skipping unreadable file {}: {err}", file.display());
                }
            }
            for rule in &rules {
                for hit in self.matcher.match_rule(rule, file) {
                    vulnerabilities.push(hit.into_vulnerability(root, now));
                }
            }
        }

        let scan_duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            "scanned {} files, {} findings in {}ms",
            files.len(),
            vulnerabilities.len(),
            scan_duration_ms
        );

        ScanResult {
            vulnerabilities,
            rules_executed: rules.len(),
            files_scanned: files.len(),
            lines_scanned,
            scan_duration_ms,
        }
    }
}

impl Default for ScanOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Allowlist wins over blocklist; the severity threshold applies after both.
fn apply_rule_filters(rules: Vec<Rule>, config: &ScanConfig) -> Vec<Rule> {
    rules
        .into_iter()
        .filter(|rule| {
            if !config.enabled_rules.is_empty() {
                config.enabled_rules.contains(&rule.id)
            } else {
                !config.disabled_rules.contains(&rule.id)
            }
        })
        .filter(|rule| rule.severity.at_least(config.min_severity))
        .collect()
}
