use clap::Parser;
use std::path::PathBuf;

/// SecureCode - rule-driven source code security and compliance scanner
#[derive(Parser, Debug)]
#[command(name = "securecode")]
#[command(version)]
#[command(about = "Scan source trees for security and compliance findings")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub enum Command {
    /// Scan a project and persist the report
    Scan {
        /// Project root to scan
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Project name recorded in the report (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
        /// Glob patterns of files to include (overrides config)
        #[arg(long = "include")]
        include_patterns: Vec<String>,
        /// Glob patterns of files to exclude (overrides config)
        #[arg(long = "exclude")]
        exclude_patterns: Vec<String>,
        /// Run only these rule ids
        #[arg(long = "rule")]
        enabled_rules: Vec<String>,
        /// Skip these rule ids
        #[arg(long = "skip-rule")]
        disabled_rules: Vec<String>,
        /// Minimum severity to report (critical|high|medium|low|info)
        #[arg(long)]
        min_severity: Option<String>,
        /// Directory of custom YAML rules, relative to the project root
        #[arg(long)]
        rules_dir: Option<String>,
        /// Print the full report as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// List the loaded rules
    Rules {
        /// Project root (for custom rules)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Directory of custom YAML rules, relative to the project root
        #[arg(long)]
        rules_dir: Option<String>,
    },
    /// List persisted reports, newest first
    Reports {
        /// Project root
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
    /// Show one report
    Report {
        /// Project root
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Report id; omit for the latest report
        #[arg(long)]
        id: Option<String>,
    },
}
