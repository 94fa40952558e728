use anyhow::Result;
use clap::{Parser, Subcommand};

use socialflow::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "socialflow")]
#[command(about = "Social Flow Chat Dashboard: AI analysis of social media performance")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the web dashboard
    Serve {
        /// Listen address (overrides [server] addr)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_browser: bool,
    },
    /// Ask a question and render the dashboard in the terminal
    Ask {
        /// The question to analyze
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
        /// Skip reveal and section pauses
        #[arg(long)]
        instant: bool,
    },
    /// Print the embedded post dataset
    Data {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Summarize logged analysis runs
    Stats {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
    },
    /// Check whether the flow endpoint is configured
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (token masked)
    Show,
    /// Write the default config to ~/.socialflow/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a key, e.g. `flow.app_token`
    Set { key: String, value: String },
    /// Restore the default config file
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { addr, no_browser } => {
            let mut cfg = config::load();
            if let Some(addr) = addr {
                cfg.server.addr = addr;
            }
            if no_browser {
                cfg.server.open_browser = false;
            }
            web::serve(&cfg)
        }
        Commands::Ask {
            question,
            format,
            instant,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_ask(&question.join(" "), fmt, instant)
        }
        Commands::Data { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_data(fmt)
        }
        Commands::Stats { format, days } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt, days)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
