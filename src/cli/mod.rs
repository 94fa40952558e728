//! CLI command implementations for socialflow.
//!
//! Provides subcommand handlers for:
//! - `socialflow ask "question"`: one dashboard cycle in the terminal
//! - `socialflow data`: print the embedded dataset
//! - `socialflow stats`: summarize the analysis log
//! - `socialflow health`: check whether the flow endpoint is configured
//! - `socialflow config show|init|set|reset`: configuration management

use anyhow::Result;
use colored::Colorize;

use crate::analytics::logger::AnalysisLog;
use crate::analytics::reporter::{self, RunReport};
use crate::config;
use crate::dashboard::terminal::TerminalView;
use crate::dashboard::{Dashboard, DashboardError, Pacing, RecordingView, RenderedDashboard};
use crate::dataset::{self, PostRecord};
use crate::flow::ConfiguredClient;

/// Output format for data and analytics commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// socialflow ask
// ---------------------------------------------------------------------------

/// Run one dashboard cycle for `question`.
///
/// Table format draws progressively in the terminal; JSON format runs
/// without pauses and prints the rendered result. A failed cycle is reported
/// and turned into a non-zero exit.
pub fn run_ask(question: &str, format: OutputFormat, instant: bool) -> Result<()> {
    let cfg = config::load();
    let client = ConfiguredClient::from_config(&cfg.flow);

    let pacing = if instant || format == OutputFormat::Json {
        Pacing::instant()
    } else {
        Pacing::from_config(&cfg.pacing)
    };

    let mut dashboard = Dashboard::new(client, pacing);
    if let Some(log) = AnalysisLog::from_config(&cfg.logging) {
        dashboard = dashboard.with_log(log);
    }

    let result = match format {
        OutputFormat::Json => {
            let result = dashboard.submit(question, &mut RecordingView::new());
            if let Ok(rendered) = &result {
                print_rendered_json(rendered)?;
            }
            result
        }
        _ => dashboard.submit(question, &mut TerminalView::new()),
    };

    match result {
        Ok(_) => Ok(()),
        Err(err) => {
            if format == OutputFormat::Json {
                eprintln!("{}", err.user_message().red());
            }
            Err(ask_failure(err))
        }
    }
}

/// The view already showed the message; keep the exit error short.
fn ask_failure(err: DashboardError) -> anyhow::Error {
    match err {
        DashboardError::EmptyQuery => anyhow::anyhow!("no question given"),
        other => anyhow::anyhow!("analysis failed ({})", other.outcome()),
    }
}

fn print_rendered_json(rendered: &RenderedDashboard) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rendered)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// socialflow data
// ---------------------------------------------------------------------------

/// Print the embedded dataset.
pub fn run_data(format: OutputFormat) -> Result<()> {
    let rows = dataset::load_data();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => print_data_csv(&rows),
        OutputFormat::Table => print_data_table(&rows),
    }
    Ok(())
}

fn print_data_csv(rows: &[PostRecord]) {
    println!("{}", dataset::COLUMNS.join(","));
    for row in rows {
        println!("{}", dataset::to_csv_line(row));
    }
}

fn print_data_table(rows: &[PostRecord]) {
    println!("{}", "Social Media Posts".bold().cyan());
    println!(
        "  {:>7} {:<13} {:<11} {:>6} {:>8} {:>6} {:>6} {:>7} {:>8}",
        "post_id", "post_type", "topic", "likes", "comments", "shares", "saves", "reach", "eng_rate"
    );
    println!("  {}", "-".repeat(82));

    for (i, r) in rows.iter().enumerate() {
        let line = format!(
            "  {:>7} {:<13} {:<11} {:>6} {:>8} {:>6} {:>6} {:>7} {:>8.4}",
            r.post_id,
            r.post_type,
            r.topic,
            r.likes,
            r.comments,
            r.shares,
            r.saves,
            r.reach,
            r.engagement_rate,
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// socialflow stats
// ---------------------------------------------------------------------------

/// Summarize the analysis log.
pub fn run_stats(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let cfg = config::load();
    let Some(log) = AnalysisLog::from_config(&cfg.logging) else {
        println!("{}", "Analysis logging is disabled.".yellow());
        return Ok(());
    };

    let report = reporter::build_report(&log.read_entries_since_days(days));

    if report.total_runs == 0 {
        println!(
            "{}",
            "No data yet. Ask a question to start collecting stats.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_report_table(&report),
    }
    Ok(())
}

fn print_report_table(report: &RunReport) {
    println!("{}", "socialflow Analysis Runs".bold().cyan());
    println!("{}", "=".repeat(40));
    println!("  {} {}", "Total runs:   ".bold(), report.total_runs);
    println!(
        "  {} {} ({:.1}%)",
        "Successful:   ".bold(),
        report.successes,
        report.success_pct
    );
    if let Some(ms) = report.avg_latency_ms {
        println!("  {} {ms} ms", "Avg latency:  ".bold());
    }
    println!();
    println!("{}", "By Outcome".bold().cyan());
    for (outcome, count) in &report.outcomes {
        println!("  {outcome:<15} {count:>5}");
    }
    if let Some(err) = &report.last_error {
        println!();
        println!("  {} {}", "Last error:".bold(), err.red());
    }
}

// ---------------------------------------------------------------------------
// socialflow health
// ---------------------------------------------------------------------------

/// Report configuration readiness.
pub fn run_health() -> Result<()> {
    let cfg = config::load();

    println!("{}", "socialflow Health".bold().cyan());
    println!("{}", "=".repeat(40));

    match cfg.flow.missing_value() {
        None => println!("  {} {}", "Flow endpoint:".bold(), "configured".green()),
        Some(key) => println!(
            "  {} {}",
            "Flow endpoint:".bold(),
            format!("missing {key}").red()
        ),
    }
    println!("  {} {}", "Run URL:      ".bold(), cfg.flow.run_url());
    println!("  {} {}", "Token:        ".bold(), cfg.flow.masked_token());
    println!("  {} {} ms", "Timeout:      ".bold(), cfg.flow.timeout_ms);

    for (label, path) in [
        ("Global config:", config::global_config_file()),
        ("Project config:", config::project_config_file()),
    ] {
        let status = match path {
            Some(p) if p.exists() => p.display().to_string().green(),
            Some(p) => format!("{} (not found)", p.display()).dimmed(),
            None => "unavailable".dimmed(),
        };
        println!("  {} {}", label.bold(), status);
    }

    match AnalysisLog::from_config(&cfg.logging) {
        Some(log) => println!("  {} {}", "Analysis log: ".bold(), log.path().display()),
        None => println!("  {} {}", "Analysis log: ".bold(), "disabled".dimmed()),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// socialflow config
// ---------------------------------------------------------------------------

pub fn run_config_show() -> Result<()> {
    print!("{}", config::show_effective_config()?);
    Ok(())
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} {key}", "Updated".green());
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!("{} {}", "Reset".green(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowError;

    #[test]
    fn output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str_opt(Some("table")), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
    }

    #[test]
    fn ask_failure_names_outcome() {
        let err = ask_failure(DashboardError::from(FlowError::Transport("x".into())));
        assert_eq!(err.to_string(), "analysis failed (transport)");
        assert_eq!(ask_failure(DashboardError::EmptyQuery).to_string(), "no question given");
    }
}
