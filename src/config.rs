use std::fs;
use std::path::Path;

use crate::errors::ConfigError;
use crate::model::ScanConfig;

pub const CONFIG_FILE: &str = ".securecode/config.toml";

/// Loads the per-project scan configuration from `.securecode/config.toml`.
///
/// A missing file is not an error, the defaults apply. A present but
/// malformed file is an error so a typo does not silently scan with the
/// wrong patterns.
pub fn load_project_config(root: &Path) -> Result<ScanConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(ScanConfig::default());
        }
        Err(err) => return Err(ConfigError::FileRead(path.display().to_string(), err)),
    };
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_project_config(dir.path()).unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".securecode")).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "minSeverity = \"high\"\nexcludePatterns = [\"**/vendor/**\"]\n",
        )
        .unwrap();

        let config = load_project_config(dir.path()).unwrap();
        assert_eq!(config.min_severity, Severity::High);
        assert_eq!(config.exclude_patterns, vec!["**/vendor/**".to_string()]);
        // untouched fields come from the defaults
        assert!(config.include_patterns.contains(&"**/*.java".to_string()));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".securecode")).unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "minSeverity = [broken").unwrap();

        assert!(matches!(
            load_project_config(dir.path()),
            Err(ConfigError::TomlParse(_, _))
        ));
    }
}
