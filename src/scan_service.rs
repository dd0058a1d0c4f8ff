use std::path::Path;

use chrono::Utc;
use rand::Rng;

use crate::compliance::ComplianceAggregator;
use crate::engine::ScanOrchestrator;
use crate::errors::AppError;
use crate::model::{ScanConfig, ScanReport, VulnerabilitySummary};
use crate::report_store::ReportStore;
use crate::tracking::VulnerabilityTracker;

/// Orchestrates the full scan pipeline: scan, diff against the previous
/// report, summarize, aggregate compliance, persist.
pub struct ScanService {
    orchestrator: ScanOrchestrator,
    tracker: VulnerabilityTracker,
    aggregator: ComplianceAggregator,
}

impl ScanService {
    pub fn new() -> Self {
        ScanService {
            orchestrator: ScanOrchestrator::new(),
            tracker: VulnerabilityTracker::new(),
            aggregator: ComplianceAggregator::new(),
        }
    }

    pub fn execute_scan(
        &self,
        root: &Path,
        project_name: &str,
        config: &ScanConfig,
    ) -> Result<ScanReport, AppError> {
        let store = ReportStore::new(root);
        let previous = store.load_latest();
        let scan_start_time = Utc::now().timestamp_millis();

        let result = self.orchestrator.scan(root, config);

        let scan_end_time = Utc::now().timestamp_millis();
        let vulnerabilities =
            self.tracker
                .track(result.vulnerabilities, previous.as_ref(), scan_end_time);
        let summary = VulnerabilitySummary::of(&vulnerabilities);
        let compliance_status = self.aggregator.aggregate(&vulnerabilities);

        let report = ScanReport {
            report_id: new_report_id(scan_end_time),
            project_name: project_name.to_string(),
            project_path: root.display().to_string(),
            scan_start_time,
            scan_end_time,
            scan_duration: scan_end_time - scan_start_time,
            version: env!("CARGO_PKG_VERSION").to_string(),
            vulnerabilities,
            summary,
            rules_executed: result.rules_executed,
            files_scanned: result.files_scanned,
            lines_scanned: result.lines_scanned,
            previous_report_id: previous.map(|r| r.report_id),
            compliance_status,
        };
        store.save(&report)?;
        Ok(report)
    }

    pub fn latest_report(&self, root: &Path) -> Option<ScanReport> {
        ReportStore::new(root).load_latest()
    }

    pub fn report_by_id(&self, root: &Path, report_id: &str) -> Option<ScanReport> {
        ReportStore::new(root).load_by_id(report_id)
    }

    pub fn all_reports(&self, root: &Path) -> Vec<ScanReport> {
        ReportStore::new(root).list_all()
    }
}

impl Default for ScanService {
    fn default() -> Self {
        Self::new()
    }
}

fn new_report_id(end_time_ms: i64) -> String {
    let suffix = rand::thread_rng().gen_range(1000..10000);
    format!("REPORT-{}-{}", end_time_ms / 1000, suffix)
}
