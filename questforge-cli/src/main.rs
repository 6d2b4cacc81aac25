mod render;
mod store;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};

use questforge_game::{Clock, IntentOutcome, QuestApp, Slot, SnapshotStore};
use render::Report;
use store::FileStore;

#[derive(Debug, Parser)]
#[command(name = "questforge", version)]
#[command(about = "Daily quest tracker with streaks, XP, loot boxes and a boss to defeat")]
struct Args {
    /// Directory the save slots are written to
    #[arg(long, env = "QUESTFORGE_DATA_DIR", default_value = ".questforge")]
    data_dir: PathBuf,

    /// Seed for loot draws (drawn from OS entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Print the full state and notices as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the player, quests and boss (default)
    Status,
    /// Add a new daily quest
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Mark a quest complete for today
    Done { id: u64 },
    /// Clear today's completion of a quest
    Undo { id: u64 },
    /// Use an inventory item by its instance id
    Use { instance_id: u64 },
    /// Delete every save slot
    Reset,
}

/// System clock whose calendar date can be overridden from the command line.
#[derive(Debug, Clone, Copy)]
struct CliClock {
    today: Option<NaiveDate>,
}

impl Clock for CliClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let store = FileStore::new(args.data_dir.clone());
    debug!("using data dir {}", store.dir().display());

    let command = args.command.unwrap_or(Command::Status);
    if matches!(command, Command::Reset) {
        for slot in Slot::ALL {
            store
                .remove(slot.key())
                .with_context(|| format!("clearing {}", slot.key()))?;
        }
        println!("{}", "🧹 All progress cleared.".yellow());
        return Ok(());
    }

    let clock = CliClock { today: args.today };
    let mut app = match args.seed {
        Some(seed) => QuestApp::with_seed(store, clock, seed),
        None => QuestApp::from_entropy(store, clock),
    };

    let mut outcome = app.open();
    let intent = match command {
        Command::Status | Command::Reset => IntentOutcome::default(),
        Command::Add { title, description } => app.add_quest(&title, &description),
        Command::Done { id } => toggle(&mut app, id, true)?,
        Command::Undo { id } => toggle(&mut app, id, false)?,
        Command::Use { instance_id } => app.use_item(instance_id),
    };
    merge(&mut outcome, intent);
    info!(
        "{} notices, {} slots saved",
        outcome.notices.len(),
        outcome.refreshed.iter().count()
    );

    Report {
        notices: &outcome.notices,
        refreshed: outcome.refreshed,
        stats: app.stats(),
        quests: app.quests(),
        boss: app.boss(),
    }
    .print(args.json)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn toggle<S: SnapshotStore, C: Clock>(
    app: &mut QuestApp<S, C>,
    id: u64,
    checked: bool,
) -> Result<IntentOutcome> {
    if !app.quests().iter().any(|quest| quest.id == id) {
        bail!("no quest with id {id}");
    }
    Ok(app.toggle_quest(id, checked))
}

fn merge(into: &mut IntentOutcome, next: IntentOutcome) {
    into.notices.extend(next.notices);
    for slot in next.refreshed.iter() {
        into.refreshed.insert(slot);
    }
}
