mod report;
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::debug;
use kpi_dashboard_core::{
    parse_week_input, AreaKeyPolicy, DashboardConfig, DashboardUseCase, FileDataSource, SessionStore,
};

#[derive(Parser)]
#[command(name = "kpi")]
#[command(about = "Weekly, monthly and yearly KPI progress against targets", long_about = None)]
struct Cli {
    /// Data file with actuals and targets (overrides the config file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Config file (default: ~/.kpi-dashboard/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Which areas to break down: window-union or first-record
    #[arg(long, global = true)]
    area_keys: Option<AreaKeyPolicy>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the dashboard for one week (usage: report --week last)
    Report {
        /// this, last, next, +Nw, -Nw or a date such as 2024-01-10
        #[arg(short, long, default_value = "this", allow_hyphen_values = true)]
        week: String,
        /// Print the view as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Write a sample data file to get started
    Init {
        /// Overwrite an existing data file
        #[arg(long)]
        force: bool,
    },
    /// Open the Terminal User Interface
    Tui {
        #[arg(short, long, default_value = "this", allow_hyphen_values = true)]
        week: String,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_file = Some(data);
    }
    if let Some(area_keys) = cli.area_keys {
        config.area_keys = area_keys;
    }
    let data_path = config.data_path()?;
    debug!(path = %data_path.display(), area_keys = %config.area_keys, "resolved config");

    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Init { force }) => {
            if data_path.exists() && !force {
                println!("Data file already exists: {} (use --force to overwrite)", data_path.display());
                return Ok(());
            }
            let data = FileDataSource::write_sample(&data_path, today)?;
            println!("Sample data written: {}", data_path.display());
            println!("  Days: {}", data.actuals.len());
            println!("  Monthly targets: {}", data.targets.len());
        },
        Some(Commands::Report { week, json }) => {
            let monday = parse_week_input(&week, today)?;
            let store = SessionStore::new(FileDataSource::new(data_path));
            let view = DashboardUseCase::new(&store, config.area_keys).build(monday)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                report::print_dashboard(&view);
            }
        },
        Some(Commands::Tui { week }) => {
            let monday = parse_week_input(&week, today)?;
            let store = SessionStore::new(FileDataSource::new(data_path));
            tui::run(&store, config.area_keys, monday)?;
        },
        None => {
            let monday = parse_week_input("this", today)?;
            let store = SessionStore::new(FileDataSource::new(data_path));
            tui::run(&store, config.area_keys, monday)?;
        }
    }
    Ok(())
}
