use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::rule::{ComplianceFramework, RuleCategory, Severity};
use crate::model::vulnerability::{Vulnerability, VulnerabilityStatus};

/// Scan configuration supplied by the caller (CLI flags or the project's
/// `.securecode/config.toml`). A plain value object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// Allowlist: when non-empty, only these rule ids run.
    pub enabled_rules: Vec<String>,
    /// Blocklist: consulted only when `enabled_rules` is empty.
    pub disabled_rules: Vec<String>,
    /// Relative to the scanned project root.
    pub custom_rules_path: String,
    pub min_severity: Severity,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            include_patterns: vec![
                "**/*.java".to_string(),
                "**/*.kt".to_string(),
                "**/*.py".to_string(),
                "**/*.js".to_string(),
                "**/*.ts".to_string(),
                "**/*.go".to_string(),
            ],
            exclude_patterns: vec![
                "**/test/**".to_string(),
                "**/build/**".to_string(),
                "**/target/**".to_string(),
                "**/node_modules/**".to_string(),
                "**/.git/**".to_string(),
            ],
            enabled_rules: Vec::new(),
            disabled_rules: Vec::new(),
            custom_rules_path: ".securecode/rules".to_string(),
            min_severity: Severity::Info,
        }
    }
}

/// Ephemeral output of one scan pass, before tracking and aggregation.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub vulnerabilities: Vec<Vulnerability>,
    pub rules_executed: usize,
    pub files_scanned: usize,
    pub lines_scanned: u64,
    pub scan_duration_ms: u64,
}

/// Persisted aggregate of one scan. Written once, never mutated; superseded
/// by the next report rather than deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub report_id: String,
    pub project_name: String,
    pub project_path: String,
    /// Epoch milliseconds.
    pub scan_start_time: i64,
    pub scan_end_time: i64,
    pub scan_duration: i64,
    pub version: String,
    /// Full history including CLOSED entries from previous scans.
    pub vulnerabilities: Vec<Vulnerability>,
    pub summary: VulnerabilitySummary,
    pub rules_executed: usize,
    pub files_scanned: usize,
    pub lines_scanned: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_report_id: Option<String>,
    #[serde(default)]
    pub compliance_status: BTreeMap<ComplianceFramework, ComplianceStatus>,
}

/// Counts over a report's vulnerability list. `total`, `by_severity` and
/// `by_category` cover active findings only; the status counts cover the
/// full list so closed history stays visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilitySummary {
    pub total: usize,
    pub new: usize,
    pub persistent: usize,
    pub closed: usize,
    #[serde(default)]
    pub by_severity: BTreeMap<Severity, usize>,
    #[serde(default)]
    pub by_category: BTreeMap<RuleCategory, usize>,
    #[serde(default)]
    pub by_status: BTreeMap<VulnerabilityStatus, usize>,
}

impl VulnerabilitySummary {
    pub fn of(vulnerabilities: &[Vulnerability]) -> Self {
        let mut by_severity = BTreeMap::new();
        let mut by_category = BTreeMap::new();
        let mut by_status = BTreeMap::new();
        let mut total = 0;

        for vuln in vulnerabilities {
            *by_status.entry(vuln.status).or_insert(0) += 1;
            if vuln.is_active() {
                total += 1;
                *by_severity.entry(vuln.severity).or_insert(0) += 1;
                *by_category.entry(vuln.category).or_insert(0) += 1;
            }
        }

        let count = |status| {
            vulnerabilities
                .iter()
                .filter(|v| v.status == status)
                .count()
        };

        VulnerabilitySummary {
            total,
            new: count(VulnerabilityStatus::New),
            persistent: count(VulnerabilityStatus::Persistent),
            closed: count(VulnerabilityStatus::Closed),
            by_severity,
            by_category,
            by_status,
        }
    }
}

/// Per-framework compliance roll-up. The rule catalog only encodes negative
/// checks, so passing controls are never positively observed and
/// `passed_controls` stays 0; every touched control counts as failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStatus {
    pub framework: ComplianceFramework,
    pub total_controls: usize,
    pub passed_controls: usize,
    pub failed_controls: usize,
    pub compliance_percentage: f64,
    pub violations: Vec<Vulnerability>,
}

impl ComplianceStatus {
    pub fn failing(
        framework: ComplianceFramework,
        total_controls: usize,
        violations: Vec<Vulnerability>,
    ) -> Self {
        let passed_controls = 0;
        let compliance_percentage = if total_controls > 0 {
            (passed_controls as f64 / total_controls as f64) * 100.0
        } else {
            0.0
        };
        ComplianceStatus {
            framework,
            total_controls,
            passed_controls,
            failed_controls: total_controls,
            compliance_percentage,
            violations,
        }
    }
}
