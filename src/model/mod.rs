//! Value types shared across the scan pipeline.

pub mod report;
pub mod rule;
pub mod vulnerability;

pub use report::{ComplianceStatus, ScanConfig, ScanReport, ScanResult, VulnerabilitySummary};
pub use rule::{
    ComplianceFramework, ComplianceTag, PatternType, QuickFix, QuickFixType, Rule, RuleCategory,
    RulePattern, Severity,
};
pub use vulnerability::{fingerprint, Vulnerability, VulnerabilityStatus};
