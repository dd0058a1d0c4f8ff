use std::collections::{HashMap, HashSet};

use crate::model::{ScanReport, Vulnerability};

/// Diffs the current scan's findings against the previous report by
/// fingerprint and assigns lifecycle statuses.
pub struct VulnerabilityTracker;

impl VulnerabilityTracker {
    pub fn new() -> Self {
        VulnerabilityTracker
    }

    /// Returns the full tracked list: every current finding as NEW or
    /// PERSISTENT, followed by a CLOSED copy of each previous finding
    /// whose fingerprint is absent from the current scan.
    ///
    /// The previous list is indexed without filtering, so closed history
    /// carries forward on every scan (the persisted list never shrinks)
    /// and a fingerprint that resurfaces after being closed resumes as
    /// PERSISTENT with its original first_detected.
    pub fn track(
        &self,
        current: Vec<Vulnerability>,
        previous: Option<&ScanReport>,
        now: i64,
    ) -> Vec<Vulnerability> {
        let previous_vulns: &[Vulnerability] = previous
            .map(|report| report.vulnerabilities.as_slice())
            .unwrap_or(&[]);
        let previous_by_fingerprint: HashMap<&str, &Vulnerability> = previous_vulns
            .iter()
            .map(|v| (v.fingerprint.as_str(), v))
            .collect();
        let current_fingerprints: HashSet<&str> =
            current.iter().map(|v| v.fingerprint.as_str()).collect();

        let mut tracked = Vec::with_capacity(current.len() + previous_vulns.len());
        let mut closed: Vec<Vulnerability> = Vec::new();
        // previous entries are revisited in list order so report content
        // stays stable across runs
        for prior in previous_vulns {
            if !current_fingerprints.contains(prior.fingerprint.as_str()) {
                closed.push(prior.clone().mark_closed(now));
            }
        }
        for vuln in current {
            match previous_by_fingerprint.get(vuln.fingerprint.as_str()) {
                Some(prior) => tracked.push(vuln.mark_persistent(prior.first_detected, now)),
                None => tracked.push(vuln.mark_new(now)),
            }
        }
        tracked.extend(closed);
        tracked
    }
}

impl Default for VulnerabilityTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        fingerprint, RuleCategory, Severity, VulnerabilityStatus, VulnerabilitySummary,
    };
    use std::collections::BTreeMap;

    fn vuln(rule_id: &str, path: &str, text: &str) -> Vulnerability {
        Vulnerability {
            rule_id: rule_id.to_string(),
            rule_name: rule_id.to_string(),
            severity: Severity::High,
            category: RuleCategory::Security,
            description: String::new(),
            file_path: path.to_string(),
            line_number: 1,
            column_number: 1,
            code_snippet: String::new(),
            compliance: vec![],
            quick_fix: None,
            status: VulnerabilityStatus::New,
            first_detected: 0,
            last_detected: 0,
            fingerprint: fingerprint(rule_id, path, text),
        }
    }

    fn report_with(vulnerabilities: Vec<Vulnerability>) -> ScanReport {
        ScanReport {
            report_id: "REPORT-1-1234".to_string(),
            project_name: "demo".to_string(),
            project_path: "/tmp/demo".to_string(),
            scan_start_time: 100,
            scan_end_time: 100,
            scan_duration: 0,
            version: "1.0.0".to_string(),
            summary: VulnerabilitySummary::of(&vulnerabilities),
            vulnerabilities,
            rules_executed: 0,
            files_scanned: 0,
            lines_scanned: 0,
            previous_report_id: None,
            compliance_status: BTreeMap::new(),
        }
    }

    #[test]
    fn everything_is_new_without_a_previous_report() {
        let tracked = VulnerabilityTracker::new().track(
            vec![vuln("SEC-001", "a.java", "x"), vuln("SEC-002", "b.java", "y")],
            None,
            500,
        );
        assert_eq!(tracked.len(), 2);
        assert!(tracked.iter().all(|v| v.status == VulnerabilityStatus::New));
        assert!(tracked.iter().all(|v| v.first_detected == 500));
    }

    #[test]
    fn matching_fingerprint_becomes_persistent_keeping_first_detected() {
        let mut prior = vuln("SEC-001", "a.java", "x");
        prior.first_detected = 100;
        prior.last_detected = 100;
        let previous = report_with(vec![prior]);

        // the same finding moved to another line still has the same identity
        let mut rescan = vuln("SEC-001", "a.java", "x");
        rescan.line_number = 9;
        let tracked = VulnerabilityTracker::new().track(vec![rescan], Some(&previous), 500);

        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].status, VulnerabilityStatus::Persistent);
        assert_eq!(tracked[0].first_detected, 100);
        assert_eq!(tracked[0].last_detected, 500);
        assert_eq!(tracked[0].line_number, 9);
    }

    #[test]
    fn missing_fingerprint_is_closed_with_prior_details() {
        let previous = report_with(vec![vuln("SEC-001", "a.java", "x")]);
        let tracked = VulnerabilityTracker::new().track(Vec::new(), Some(&previous), 500);

        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].status, VulnerabilityStatus::Closed);
        assert_eq!(tracked[0].last_detected, 500);
        assert_eq!(tracked[0].file_path, "a.java");
    }

    #[test]
    fn closed_history_carries_forward_every_scan() {
        let mut closed = vuln("SEC-001", "a.java", "x").mark_closed(200);
        closed.first_detected = 100;
        let previous = report_with(vec![closed]);

        let tracked = VulnerabilityTracker::new().track(Vec::new(), Some(&previous), 500);
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].status, VulnerabilityStatus::Closed);
        assert_eq!(tracked[0].first_detected, 100);
        assert_eq!(tracked[0].last_detected, 500);
    }

    #[test]
    fn reappearing_after_closed_resumes_as_persistent() {
        let mut closed = vuln("SEC-001", "a.java", "x").mark_closed(200);
        closed.first_detected = 100;
        let previous = report_with(vec![closed]);

        let tracked = VulnerabilityTracker::new().track(
            vec![vuln("SEC-001", "a.java", "x")],
            Some(&previous),
            500,
        );
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].status, VulnerabilityStatus::Persistent);
        assert_eq!(tracked[0].first_detected, 100);
        assert_eq!(tracked[0].last_detected, 500);
    }

    #[test]
    fn closed_entries_keep_previous_report_order() {
        let previous = report_with(vec![
            vuln("SEC-001", "a.java", "x"),
            vuln("SEC-002", "b.java", "y"),
            vuln("SEC-003", "c.java", "z"),
        ]);
        let tracked = VulnerabilityTracker::new().track(Vec::new(), Some(&previous), 500);

        let ids: Vec<&str> = tracked.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["SEC-001", "SEC-002", "SEC-003"]);
    }

    #[test]
    fn mixed_lifecycle_in_one_pass() {
        let mut kept = vuln("SEC-001", "a.java", "x");
        kept.first_detected = 100;
        let gone = vuln("SEC-002", "b.java", "y");
        let old_closed = vuln("SEC-004", "d.java", "w").mark_closed(200);
        let previous = report_with(vec![kept, gone, old_closed]);

        let tracked = VulnerabilityTracker::new().track(
            vec![vuln("SEC-001", "a.java", "x"), vuln("SEC-003", "c.java", "z")],
            Some(&previous),
            500,
        );

        let status_of = |rule: &str| {
            tracked
                .iter()
                .find(|v| v.rule_id == rule)
                .map(|v| v.status)
                .unwrap()
        };
        assert_eq!(tracked.len(), 4);
        assert_eq!(status_of("SEC-001"), VulnerabilityStatus::Persistent);
        assert_eq!(status_of("SEC-002"), VulnerabilityStatus::Closed);
        assert_eq!(status_of("SEC-003"), VulnerabilityStatus::New);
        // closed history from earlier scans stays in the list
        assert_eq!(status_of("SEC-004"), VulnerabilityStatus::Closed);
    }
}
