pub mod log;
pub mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{LogCommand, process_log_command};
use report::{SessionsCommand, print_heat_map, print_totals, process_sessions_command};
use tracing::level_filters::LevelFilter;

use crate::{
    storage::snapshot_storage::FileSnapshotStorage,
    tracking::{period::Period, tracker::Tracker},
    utils::{
        clock::DefaultClock,
        dir::{SNAPSHOT_FILE, create_application_default_path, create_application_path},
        logging::enable_logging,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Studytrack", version, long_about = None)]
#[command(about = "Log study sessions and see how much you studied", long_about = None)]
pub(crate) struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Print logs to the console")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default uses $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Log a study session")]
    Log {
        #[command(flatten)]
        command: LogCommand,
    },
    #[command(about = "List sessions logged on a day")]
    Sessions {
        #[command(flatten)]
        command: SessionsCommand,
    },
    #[command(about = "Show total study time for the current day, week, month or year")]
    Total {
        #[arg(
            short,
            long,
            help = "Period to show. Shows every period when omitted"
        )]
        period: Option<Period>,
    },
    #[command(about = "Show a heat map of the last 53 weeks")]
    Heatmap {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = match args.dir {
        Some(dir) => create_application_path(dir)?,
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&app_dir.join("logs"), logging_level, args.log)?;

    let storage = FileSnapshotStorage::new(app_dir.join(SNAPSHOT_FILE))?;
    let mut tracker = Tracker::open(storage, Box::new(DefaultClock)).await?;

    match args.commands {
        Commands::Log { command } => process_log_command(&mut tracker, command).await,
        Commands::Sessions { command } => process_sessions_command(&tracker, command),
        Commands::Total { period } => {
            print_totals(&tracker, period);
            Ok(())
        }
        Commands::Heatmap {} => {
            print_heat_map(&tracker.grid());
            Ok(())
        }
    }
}
