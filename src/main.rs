mod commands;
mod config;

use anyhow::Result;
use campusfeed_core::date_range::DateRange;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "campusfeed")]
#[command(about = "Fetch and normalize CAMPUSonline lecture schedules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List lecture courses of an organization unit
    Courses {
        /// Organization unit id (e.g. 14189 for informatics)
        #[arg(short, long)]
        org: u32,

        /// Window start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Window end (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the lecture schedule of a single room
    Room {
        /// Room id as used by the room-schedule feed
        #[arg(short, long)]
        room: u32,

        /// Semester key for the course search (e.g. "2023W")
        #[arg(short, long)]
        semester: String,

        /// Window start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Window end (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::GlobalConfig::load()?;

    match cli.command {
        Commands::Courses {
            org,
            from,
            until,
            json,
        } => {
            let range = DateRange::from_args(from.as_deref(), until.as_deref())?;
            commands::courses::run(&config, org, range, json).await
        }
        Commands::Room {
            room,
            semester,
            from,
            until,
            json,
        } => {
            let range = DateRange::from_args(from.as_deref(), until.as_deref())?;
            commands::room::run(&config, room, &semester, range, json).await
        }
    }
}
