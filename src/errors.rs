use thiserror::Error;

/// Top-level application error.
///
/// Per-item failures during a scan (unreadable file, invalid regex in one
/// pattern, malformed rule file, corrupt stored report) are logged and
/// skipped, never propagated. Only failures of the operation the caller
/// explicitly asked for surface as an `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
    #[error("I/O error while {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("Application error: {0}")]
    Generic(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid severity '{0}' (expected critical|high|medium|low|info)")]
    InvalidSeverity(String),
    #[error("Other config error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Failed to read rule file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse YAML rule '{0}': {1}")]
    YamlParse(String, #[source] serde_yaml::Error),
    #[error("Rule '{id}' is malformed: {reason}")]
    Malformed { id: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to create reports directory '{0}': {1}")]
    DirCreate(String, #[source] std::io::Error),
    #[error("Failed to write report '{0}': {1}")]
    FileWrite(String, #[source] std::io::Error),
    #[error("Failed to read report '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io("I/O operation failed".to_string(), err)
    }
}
