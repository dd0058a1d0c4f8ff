use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::ConfigError;

/// A security/compliance rule loaded from YAML. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    pub category: RuleCategory,
    #[serde(default)]
    pub compliance: Vec<ComplianceTag>,
    #[serde(default)]
    pub patterns: Vec<RulePattern>,
    #[serde(rename = "quickFix", default, skip_serializing_if = "Option::is_none")]
    pub quick_fix: Option<QuickFix>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub custom: bool,
}

fn default_enabled() -> bool {
    true
}

/// One pattern of a rule. Only `regex` is executed; the other kinds are
/// reserved extension points and produce zero matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulePattern {
    #[serde(rename = "type")]
    pub kind: PatternType,
    pub pattern: String,
    #[serde(rename = "fileTypes", default)]
    pub file_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Regex,
    Ast,
    Semantic,
    Taint,
}

/// Severity in descending order of urgency. Declaration order is the total
/// order used for threshold filtering: `Critical` sorts before `Info`, so
/// "at least as severe as the threshold" is `severity <= threshold`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// True when `self` is at least as severe as `threshold`.
    pub fn at_least(self, threshold: Severity) -> bool {
        self <= threshold
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            "info" => Ok(Severity::Info),
            other => Err(ConfigError::InvalidSeverity(other.to_string())),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Security,
    Compliance,
    Quality,
    Documentation,
    ApiSecurity,
    DataSecurity,
    Cryptography,
    Authentication,
    Authorization,
    Injection,
    Secrets,
}

/// Tags a rule with the compliance control it enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceTag {
    pub framework: ComplianceFramework,
    pub control: String,
    pub requirement: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceFramework {
    PciDss,
    Soc2,
    Hipaa,
    Gdpr,
    Owasp,
    Cwe,
    Nist,
}

/// Suggested remediation carried from the rule into each finding. The core
/// only transports it; applying the replacement is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickFix {
    #[serde(rename = "type")]
    pub kind: QuickFixType,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickFixType {
    Remove,
    Replace,
    Suggest,
    Refactor,
}
