use serde::{Deserialize, Serialize};

use crate::model::rule::{ComplianceTag, QuickFix, RuleCategory, Severity};

/// A finding produced by one pattern match, tracked across scans.
///
/// Treated as an immutable value: status transitions consume the old value
/// and return an updated copy, they never mutate in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub category: RuleCategory,
    pub description: String,
    /// Path relative to the scanned root, `/`-separated.
    pub file_path: String,
    pub line_number: usize,
    pub column_number: usize,
    pub code_snippet: String,
    #[serde(default)]
    pub compliance: Vec<ComplianceTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_fix: Option<QuickFix>,
    pub status: VulnerabilityStatus,
    /// Epoch milliseconds of the scan that first reported this fingerprint.
    pub first_detected: i64,
    /// Epoch milliseconds of the most recent scan that touched this finding.
    pub last_detected: i64,
    /// Stable identity key correlating this finding across scans.
    /// Independent of line/column so positional drift does not create
    /// spurious NEW/CLOSED pairs.
    pub fingerprint: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum VulnerabilityStatus {
    New,
    Persistent,
    Closed,
    Fixed,
}

impl Vulnerability {
    /// Active findings are the ones still present in the codebase.
    pub fn is_active(&self) -> bool {
        self.status != VulnerabilityStatus::Closed && self.status != VulnerabilityStatus::Fixed
    }

    pub fn mark_new(mut self, now: i64) -> Self {
        self.status = VulnerabilityStatus::New;
        self.first_detected = now;
        self.last_detected = now;
        self
    }

    /// Carries the original detection time forward from the previous scan.
    pub fn mark_persistent(mut self, first_detected: i64, now: i64) -> Self {
        self.status = VulnerabilityStatus::Persistent;
        self.first_detected = first_detected;
        self.last_detected = now;
        self
    }

    pub fn mark_closed(mut self, now: i64) -> Self {
        self.status = VulnerabilityStatus::Closed;
        self.last_detected = now;
        self
    }
}

/// Fingerprint formula: MD5 over rule id, normalized relative path and the
/// matched text, joined with `:`.
pub fn fingerprint(rule_id: &str, relative_path: &str, matched_text: &str) -> String {
    let digest = md5::compute(format!("{rule_id}:{relative_path}:{matched_text}"));
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vulnerability {
        Vulnerability {
            rule_id: "SEC-001".to_string(),
            rule_name: "Hardcoded Secrets".to_string(),
            severity: Severity::Critical,
            category: RuleCategory::Secrets,
            description: "credential in source".to_string(),
            file_path: "src/App.java".to_string(),
            line_number: 3,
            column_number: 9,
            code_snippet: String::new(),
            compliance: vec![],
            quick_fix: None,
            status: VulnerabilityStatus::New,
            first_detected: 1_000,
            last_detected: 1_000,
            fingerprint: fingerprint("SEC-001", "src/App.java", "password = \"x\""),
        }
    }

    #[test]
    fn fingerprint_ignores_position() {
        let a = fingerprint("SEC-001", "src/App.java", "password = \"x\"");
        let b = fingerprint("SEC-001", "src/App.java", "password = \"x\"");
        assert_eq!(a, b);
        assert_ne!(a, fingerprint("SEC-002", "src/App.java", "password = \"x\""));
        assert_ne!(a, fingerprint("SEC-001", "src/Other.java", "password = \"x\""));
    }

    #[test]
    fn status_transitions_are_copies() {
        let v = sample();
        let persistent = v.clone().mark_persistent(500, 2_000);
        assert_eq!(persistent.status, VulnerabilityStatus::Persistent);
        assert_eq!(persistent.first_detected, 500);
        assert_eq!(persistent.last_detected, 2_000);
        // the original value is untouched
        assert_eq!(v.status, VulnerabilityStatus::New);

        let closed = v.clone().mark_closed(3_000);
        assert_eq!(closed.status, VulnerabilityStatus::Closed);
        assert_eq!(closed.first_detected, v.first_detected);
        assert!(!closed.is_active());
        assert!(v.is_active());
    }

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&VulnerabilityStatus::Persistent).unwrap();
        assert_eq!(json, "\"PERSISTENT\"");
    }
}
