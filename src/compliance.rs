use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ComplianceFramework, ComplianceStatus, Vulnerability};

/// Rolls active findings up into per-framework compliance status. Only
/// frameworks with at least one violation appear; the catalog encodes
/// negative checks only, so there is no evidence of a control passing.
pub struct ComplianceAggregator;

impl ComplianceAggregator {
    pub fn new() -> Self {
        ComplianceAggregator
    }

    pub fn aggregate(
        &self,
        vulnerabilities: &[Vulnerability],
    ) -> BTreeMap<ComplianceFramework, ComplianceStatus> {
        let mut violations: BTreeMap<ComplianceFramework, Vec<Vulnerability>> = BTreeMap::new();
        let mut controls: BTreeMap<ComplianceFramework, BTreeSet<&str>> = BTreeMap::new();

        for vuln in vulnerabilities.iter().filter(|v| v.is_active()) {
            for tag in &vuln.compliance {
                violations
                    .entry(tag.framework)
                    .or_default()
                    .push(vuln.clone());
                controls
                    .entry(tag.framework)
                    .or_default()
                    .insert(tag.control.as_str());
            }
        }

        violations
            .into_iter()
            .map(|(framework, violations)| {
                let total_controls = controls.get(&framework).map_or(0, BTreeSet::len);
                (
                    framework,
                    ComplianceStatus::failing(framework, total_controls, violations),
                )
            })
            .collect()
    }
}

impl Default for ComplianceAggregator {
    fn default() -> Self {
        Self::new()
    }
}
