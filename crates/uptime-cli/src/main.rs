mod cmd;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uptime_core::engine::Engine;
use uptime_core::settings::Settings;
use uptime_core::store::ScheduleStore;

/// Settings file consulted when `--config` is not given; missing file means
/// defaults.
const DEFAULT_SETTINGS: &str = "/etc/uptime-manager.yaml";

#[derive(Parser)]
#[command(
    name = "um",
    about = "Manage required uptimes of a computer and compute the next boot/halt time",
    version,
    propagate_version = true
)]
struct Cli {
    /// Database file
    #[arg(short = 'D', long = "db", global = true, env = "UM_DB")]
    db: Option<PathBuf>,

    /// Settings file (YAML)
    #[arg(long, global = true, env = "UM_SETTINGS")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// (Re-)create the database, discarding all entries
    Create,

    /// Add an uptime request: owner label DOW|DOM|DATE value start-end.
    /// A single '-' reads requests from stdin, one per line ('#' comments
    /// and trailing fields are skipped)
    Add {
        #[arg(required = true)]
        args: Vec<String>,
    },

    /// Delete entries: by group id, by owner, or by owner and label
    Del {
        #[arg(allow_hyphen_values = true)]
        selector: String,
        label: Option<String>,
    },

    /// Dump the schedule table
    Raw,

    /// List the boundary records matching a period (default: today)
    List {
        /// today, week, or a date like 24.12.2026
        period: Option<String>,
    },

    /// Compute the next halt/boot time, or show the transition lists
    Get {
        #[arg(value_enum, default_value_t = GetKind::Halt)]
        kind: GetKind,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GetKind {
    /// Next time the machine may halt (plus grace)
    Halt,
    /// Next time the machine must be up (minus grace)
    Boot,
    /// Consolidated transition list
    All,
    /// Unconsolidated transition list
    Raw,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let db = cli
        .db
        .context("no database given: pass --db or set UM_DB")?;
    let settings_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS));
    let settings = Settings::load(&settings_path)?;

    let store = ScheduleStore::open(&db)?;
    let mut engine = Engine::new(store, settings);

    match cli.command {
        Commands::Create => cmd::create::run(&engine),
        Commands::Add { args } => cmd::add::run(&mut engine, &args, cli.json),
        Commands::Del { selector, label } => {
            cmd::del::run(&engine, &selector, label.as_deref(), cli.json)
        }
        Commands::Raw => cmd::raw::run(&engine, cli.json),
        Commands::List { period } => cmd::list::run(&engine, period.as_deref(), cli.json),
        Commands::Get { kind } => cmd::get::run(&engine, kind, cli.json),
    }
}
