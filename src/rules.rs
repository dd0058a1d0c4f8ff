use std::fs;
use std::path::Path;

use crate::errors::RuleError;
use crate::model::{Rule, RuleCategory, Severity};

include!(concat!(env!("OUT_DIR"), "/builtin_rules.rs"));

/// Loads rule definitions from the bundled catalog and from a project's
/// custom rules directory.
///
/// Every load is best-effort: a rule file that cannot be read, parsed or
/// validated is logged and skipped, and the remaining rules still load.
/// Duplicate ids are allowed; id lookups resolve to the first match.
pub struct RuleRepository;

impl RuleRepository {
    pub fn new() -> Self {
        RuleRepository
    }

    /// Loads the built-in catalog generated into the binary at build time.
    pub fn load_builtin(&self) -> Vec<Rule> {
        let mut rules = Vec::new();
        for (name, content) in BUILTIN_RULES {
            match Self::parse_rule(name, content) {
                Ok(rule) => rules.push(rule),
                Err(err) => tracing::warn!("skipping built-in rule {name}: {err}"),
            }
        }
        tracing::debug!("loaded {} built-in rules", rules.len());
        rules
    }

    /// Loads `.yaml`/`.yml` rule files directly under `dir` (non-recursive)
    /// and marks them `custom`. A missing directory yields no rules.
    pub fn load_custom(&self, dir: &Path) -> Vec<Rule> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut rules = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_rule_file = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("yaml") | Some("yml")
            );
            if !is_rule_file {
                continue;
            }
            match Self::load_rule_file(&path) {
                Ok(mut rule) => {
                    rule.custom = true;
                    rules.push(rule);
                }
                Err(err) => tracing::warn!("skipping custom rule {}: {err}", path.display()),
            }
        }
        rules
    }

    /// Built-in plus custom rules, filtered to the enabled ones.
    pub fn load_all(&self, custom_dir: Option<&Path>) -> Vec<Rule> {
        let mut rules = self.load_builtin();
        if let Some(dir) = custom_dir {
            rules.extend(self.load_custom(dir));
        }
        rules.retain(|rule| rule.enabled);
        rules
    }

    /// First rule with the given id, if any.
    pub fn rule_by_id<'a>(rules: &'a [Rule], id: &str) -> Option<&'a Rule> {
        rules.iter().find(|rule| rule.id == id)
    }

    pub fn rules_by_category(rules: &[Rule], category: RuleCategory) -> Vec<&Rule> {
        rules.iter().filter(|rule| rule.category == category).collect()
    }

    pub fn rules_by_severity(rules: &[Rule], severity: Severity) -> Vec<&Rule> {
        rules.iter().filter(|rule| rule.severity == severity).collect()
    }

    fn load_rule_file(path: &Path) -> Result<Rule, RuleError> {
        let content = fs::read_to_string(path)
            .map_err(|e| RuleError::FileRead(path.to_string_lossy().to_string(), e))?;
        Self::parse_rule(&path.to_string_lossy(), &content)
    }

    fn parse_rule(source: &str, content: &str) -> Result<Rule, RuleError> {
        let rule: Rule = serde_yaml::from_str(content)
            .map_err(|e| RuleError::YamlParse(source.to_string(), e))?;
        Self::validate(&rule)?;
        Ok(rule)
    }

    /// Structural validation: id, name, description non-empty and at least
    /// one pattern. Failing rules are excluded from every load.
    fn validate(rule: &Rule) -> Result<(), RuleError> {
        let reason = if rule.id.trim().is_empty() {
            Some("empty id")
        } else if rule.name.trim().is_empty() {
            Some("empty name")
        } else if rule.description.trim().is_empty() {
            Some("empty description")
        } else if rule.patterns.is_empty() {
            Some("no patterns")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(RuleError::Malformed {
                id: rule.id.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for RuleRepository {
    fn default() -> Self {
        Self::new()
    }
}
