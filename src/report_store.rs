use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ReportError;
use crate::model::ScanReport;

pub const REPORTS_DIR: &str = ".securecode/reports";
pub const LATEST_REPORT: &str = "latest-report.json";

/// Persists scan reports under the project's `.securecode/reports/`.
///
/// Each scan writes a timestamped file plus a `latest-report.json` copy so
/// the most recent report is reachable without listing the directory.
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(project_root: &Path) -> Self {
        ReportStore {
            dir: project_root.join(REPORTS_DIR),
        }
    }

    pub fn save(&self, report: &ScanReport) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| ReportError::DirCreate(self.dir.display().to_string(), e))?;

        let json = serde_json::to_string_pretty(report)?;
        let path = self
            .dir
            .join(format!("report-{}.json", report.scan_end_time / 1000));
        fs::write(&path, &json)
            .map_err(|e| ReportError::FileWrite(path.display().to_string(), e))?;

        let latest = self.dir.join(LATEST_REPORT);
        fs::write(&latest, &json)
            .map_err(|e| ReportError::FileWrite(latest.display().to_string(), e))?;

        tracing::info!("report {} saved to {}", report.report_id, path.display());
        Ok(path)
    }

    /// The most recent report, or `None` when no scan ran yet or the latest
    /// file is unreadable/corrupt.
    pub fn load_latest(&self) -> Option<ScanReport> {
        self.load_file(&self.dir.join(LATEST_REPORT))
    }

    pub fn load_by_id(&self, report_id: &str) -> Option<ScanReport> {
        self.list_all()
            .into_iter()
            .find(|report| report.report_id == report_id)
    }

    /// All readable reports, newest first. Corrupt files are skipped.
    pub fn list_all(&self) -> Vec<ScanReport> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut reports: Vec<ScanReport> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with("report-") && n.ends_with(".json"))
                    .unwrap_or(false)
            })
            .filter_map(|path| self.load_file(&path))
            .collect();
        reports.sort_by(|a, b| b.scan_end_time.cmp(&a.scan_end_time));
        reports
    }

    fn load_file(&self, path: &Path) -> Option<ScanReport> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(report) => Some(report),
            Err(err) => {
                tracing::warn!("skipping unreadable report {}: {err}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VulnerabilitySummary;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn report(id: &str, end_time: i64) -> ScanReport {
        ScanReport {
            report_id: id.to_string(),
            project_name: "demo".to_string(),
            project_path: "/tmp/demo".to_string(),
            scan_start_time: end_time - 10,
            scan_end_time: end_time,
            scan_duration: 10,
            version: "1.0.0".to_string(),
            vulnerabilities: vec![],
            summary: VulnerabilitySummary::of(&[]),
            rules_executed: 0,
            files_scanned: 0,
            lines_scanned: 0,
            previous_report_id: None,
            compliance_status: BTreeMap::new(),
        }
    }

    #[test]
    fn save_writes_timestamped_and_latest_files() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path());
        let path = store.save(&report("REPORT-5-1000", 5_000)).unwrap();

        assert_eq!(path.file_name().unwrap(), "report-5.json");
        assert!(dir.path().join(REPORTS_DIR).join(LATEST_REPORT).exists());
        let latest = store.load_latest().unwrap();
        assert_eq!(latest.report_id, "REPORT-5-1000");
    }

    #[test]
    fn latest_is_none_before_first_scan() {
        let dir = TempDir::new().unwrap();
        assert!(ReportStore::new(dir.path()).load_latest().is_none());
    }

    #[test]
    fn list_all_is_newest_first_and_skips_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path());
        store.save(&report("REPORT-1-1000", 1_000)).unwrap();
        store.save(&report("REPORT-9-1000", 9_000)).unwrap();
        store.save(&report("REPORT-5-1000", 5_000)).unwrap();
        fs::write(dir.path().join(REPORTS_DIR).join("report-7.json"), "{not json").unwrap();

        let reports = store.list_all();
        let ids: Vec<&str> = reports.iter().map(|r| r.report_id.as_str()).collect();
        assert_eq!(ids, vec!["REPORT-9-1000", "REPORT-5-1000", "REPORT-1-1000"]);
    }

    #[test]
    fn load_by_id_finds_older_report() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path());
        store.save(&report("REPORT-1-1000", 1_000)).unwrap();
        store.save(&report("REPORT-9-1000", 9_000)).unwrap();

        assert_eq!(
            store.load_by_id("REPORT-1-1000").unwrap().scan_end_time,
            1_000
        );
        assert!(store.load_by_id("REPORT-0-0000").is_none());
    }
}
