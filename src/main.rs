//! clubnotify CLI: compose and print club announcements from calendar exports.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Days, NaiveDate};
use clap::{Args, Parser, Subcommand};

use clubnotify_lib::announcer::Announcer;
use clubnotify_lib::calendar::json_file::JsonCalendarProvider;
use clubnotify_lib::notification::ConsoleSink;
use clubnotify_lib::registration::StaticRegistrations;
use clubnotify_lib::state::{load_config, load_config_from};

#[derive(Debug, Parser)]
#[command(name = "clubnotify")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Compose club announcements from calendar and registration exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Inputs shared by every announcement.
#[derive(Debug, Args)]
struct Common {
    /// Calendar export (JSON, events keyed by calendar id)
    #[arg(short, long)]
    events: PathBuf,

    /// Config file (default ~/.clubnotify/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reference day, YYYY-MM-DD (default: today in the club's zone)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Recipient shown in the output
    #[arg(long = "to", default_value = "group")]
    recipient: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Weekly digest: practices, external practices and upcoming matches
    Weekly {
        #[command(flatten)]
        common: Common,
    },
    /// Registration deadlines falling inside a window
    Deadlines {
        #[command(flatten)]
        common: Common,

        /// Registration export (JSON)
        #[arg(short, long)]
        registrations: Option<PathBuf>,

        /// Window length in days, starting at the reference day
        #[arg(long, default_value_t = 7)]
        days: u64,

        /// Window name used in headers
        #[arg(long, default_value = "今週")]
        label: String,
    },
}

impl Command {
    fn common(&self) -> &Common {
        match self {
            Command::Weekly { common } | Command::Deadlines { common, .. } => common,
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let common = cli.command.common();
    let config = match &common.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load config")?;
    let tz = config.tz()?;

    let calendar = JsonCalendarProvider::load(&common.events, tz)
        .with_context(|| format!("Failed to read {}", common.events.display()))?;

    let registrations = match &cli.command {
        Command::Deadlines {
            registrations: Some(path),
            ..
        } => StaticRegistrations::load(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => StaticRegistrations::default(),
    };

    let today = common
        .today
        .unwrap_or_else(|| chrono::Utc::now().with_timezone(&tz).date_naive());
    let sink = ConsoleSink;
    let announcer = Announcer::new(&config, &calendar, &registrations, &sink, today);

    let sent = match &cli.command {
        Command::Weekly { .. } => announcer
            .announce_weekly(&common.recipient)
            .context("Weekly announcement failed")?,
        Command::Deadlines { days, label, .. } => {
            let until = today
                .checked_add_days(Days::new(days.saturating_sub(1)))
                .unwrap_or(today);
            announcer
                .announce_deadlines(&common.recipient, today, until, label)
                .context("Deadline announcement failed")?
        }
    };

    if !sent {
        log::info!("Nothing to announce for {}", today);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
