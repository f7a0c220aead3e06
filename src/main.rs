use anyhow::Context;
use clap::{Parser, Subcommand};
use radiko_recorder::commands::record::RecordRequest;
use radiko_recorder::commands::{self, AppState};
use radiko_recorder::config::Config;
use radiko_recorder::utils::AppError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "radiko-recorder", version, about = "Record radiko stations and search the program schedule")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a station for a number of minutes
    Record {
        /// Station id, e.g. TBS
        station: String,
        /// Program name used in the output file name
        program: String,
        /// Recording length in minutes
        minutes: u64,
        /// Mark the recording for upload
        #[arg(short, long)]
        upload: bool,
        /// Post start/done messages to the configured webhook
        #[arg(long)]
        notify: bool,
    },
    /// Today's program schedule
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
}

#[derive(Subcommand)]
enum ScheduleCommand {
    /// Print every program that has a performer
    List,
    /// Print programs whose title, info, performers or description contain a keyword
    Search {
        #[arg(required = true)]
        keywords: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    radiko_recorder::init_logging(&config.logging).context("Failed to set up logging")?;

    let state = AppState::from_config(config)?;

    if let Err(e) = run(&state, cli.command).await {
        match e.downcast_ref::<AppError>() {
            Some(app_error) => tracing::error!("[{}] {:#}", app_error.code(), e),
            None => tracing::error!("{:#}", e),
        }
        return Err(e);
    }
    Ok(())
}

async fn run(state: &AppState, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Record {
            station,
            program,
            minutes,
            upload,
            notify,
        } => {
            let request = RecordRequest {
                station_id: station,
                program,
                minutes,
                upload,
                notify,
            };
            let output = commands::record::record(state, request)
                .await
                .context("Recording failed")?;
            println!("{}", output.display());
        }
        Commands::Schedule { command } => {
            let programs = match command {
                ScheduleCommand::List => commands::schedule::list_programs(state).await?,
                ScheduleCommand::Search { keywords } => {
                    commands::schedule::search_programs(state, &keywords).await?
                }
            };
            let mut stdout = std::io::stdout().lock();
            commands::schedule::write_json_lines(&mut stdout, &programs)?;
        }
    }
    Ok(())
}
