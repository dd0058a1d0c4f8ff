use clap::Parser;
use tracing_subscriber::EnvFilter;

use securecode::args::{Args, Command};
use securecode::config::load_project_config;
use securecode::errors::AppError;
use securecode::model::{ScanReport, Severity};
use securecode::rules::RuleRepository;
use securecode::scan_service::ScanService;

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Scan {
            path,
            name,
            include_patterns,
            exclude_patterns,
            enabled_rules,
            disabled_rules,
            min_severity,
            rules_dir,
            json,
        } => {
            let mut config = load_project_config(&path)?;
            if !include_patterns.is_empty() {
                config.include_patterns = include_patterns;
            }
            if !exclude_patterns.is_empty() {
                config.exclude_patterns = exclude_patterns;
            }
            if !enabled_rules.is_empty() {
                config.enabled_rules = enabled_rules;
            }
            if !disabled_rules.is_empty() {
                config.disabled_rules = disabled_rules;
            }
            if let Some(severity) = min_severity {
                config.min_severity = severity.parse::<Severity>()?;
            }
            if let Some(dir) = rules_dir {
                config.custom_rules_path = dir;
            }

            let project_name = name.unwrap_or_else(|| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "project".to_string())
            });

            let report = ScanService::new().execute_scan(&path, &project_name, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report).map_err(
                    securecode::errors::ReportError::from,
                )?);
            } else {
                print_summary(&report);
            }
        }
        Command::Rules { path, rules_dir } => {
            let config = load_project_config(&path)?;
            let custom_dir = rules_dir.unwrap_or(config.custom_rules_path);
            let rules = RuleRepository::new().load_all(Some(path.join(&custom_dir).as_path()));
            println!("{} rules loaded", rules.len());
            for rule in &rules {
                let origin = if rule.custom { "custom" } else { "builtin" };
                println!(
                    "  {}  [{:?}] [{:?}] {} ({origin})",
                    rule.id, rule.severity, rule.category, rule.name
                );
            }
        }
        Command::Reports { path } => {
            let reports = ScanService::new().all_reports(&path);
            if reports.is_empty() {
                println!("No reports found under {}", path.display());
            }
            for report in &reports {
                println!(
                    "  {}  {}  {} findings",
                    report.report_id, report.project_name, report.summary.total
                );
            }
        }
        Command::Report { path, id } => {
            let service = ScanService::new();
            let report = match id {
                Some(id) => service.report_by_id(&path, &id),
                None => service.latest_report(&path),
            };
            match report {
                Some(report) => println!(
                    "{}",
                    serde_json::to_string_pretty(&report)
                        .map_err(securecode::errors::ReportError::from)?
                ),
                None => println!("No matching report under {}", path.display()),
            }
        }
    }
    Ok(())
}

fn print_summary(report: &ScanReport) {
    println!("Scan report {}", report.report_id);
    println!(
        "  {} files, {} lines, {} rules, {}ms",
        report.files_scanned, report.lines_scanned, report.rules_executed, report.scan_duration
    );
    println!(
        "  findings: {} active ({} new, {} persistent, {} closed)",
        report.summary.total, report.summary.new, report.summary.persistent, report.summary.closed
    );
    for (severity, count) in &report.summary.by_severity {
        println!("    {severity:?}: {count}");
    }
    for vuln in report.vulnerabilities.iter().filter(|v| v.is_active()) {
        println!(
            "  [{:?}] {} {}:{}:{} {}",
            vuln.severity, vuln.rule_id, vuln.file_path, vuln.line_number, vuln.column_number,
            vuln.description
        );
    }
    if !report.compliance_status.is_empty() {
        println!("  compliance:");
        for (framework, status) in &report.compliance_status {
            println!(
                "    {framework:?}: {} of {} controls failing",
                status.failed_controls, status.total_controls
            );
        }
    }
}
