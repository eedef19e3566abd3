use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use scoreboard_import::config::{ExtractConfig, LoadConfig, StoreConfig, WritePacing};
use scoreboard_import::load::schema::required_schema;
use scoreboard_import::{Result, ToolError, sync};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Extract(args) => {
            let report = sync::excel_to_json(&ExtractConfig {
                input: args.input,
                output: args.output,
            })?;
            for skipped in &report.skipped {
                println!("skipped sheet '{}': {}", skipped.sheet, skipped.reason);
            }
            println!("extracted {} people", report.document.len());
            Ok(())
        }
        Command::Load(args) => {
            let summary = sync::json_to_store(&args.into_config())?;
            println!("{summary}");
            Ok(())
        }
        Command::LoadCommitments(args) => {
            let summary = sync::json_commitments_to_store(&args.into_config())?;
            println!("{summary}");
            Ok(())
        }
        Command::Schema => {
            println!("{}", required_schema());
            Ok(())
        }
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Extract scoreboard workbooks and import them into the datastore."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a scoreboard workbook into the intermediate JSON document.
    Extract(ExtractArgs),
    /// Import users, meetings, commitments and attendance from the document.
    ///
    /// The tables printed by `schema` must exist in the store first.
    Load(LoadArgs),
    /// Import only commitments, for users created by an earlier load.
    LoadCommitments(LoadArgs),
    /// Print the SQL that must be applied to the store before loading.
    Schema,
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Scoreboard workbook (.xlsx).
    #[arg(long)]
    input: PathBuf,

    /// Intermediate JSON document to write.
    #[arg(long)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct LoadArgs {
    /// Intermediate JSON document produced by `extract`.
    #[arg(long)]
    input: PathBuf,

    /// Base URL of the datastore project.
    #[arg(long, env = "SCOREBOARD_STORE_URL")]
    url: String,

    /// Service key used for both the `apikey` header and bearer token.
    #[arg(long, env = "SCOREBOARD_SERVICE_KEY", hide_env_values = true)]
    service_key: String,

    /// Pause after creating a user, the pod or a meeting, in milliseconds.
    #[arg(long, default_value_t = 100)]
    entity_delay_ms: u64,

    /// Pause after creating a commitment or attendance row, in milliseconds.
    #[arg(long, default_value_t = 50)]
    row_delay_ms: u64,
}

impl LoadArgs {
    fn into_config(self) -> LoadConfig {
        LoadConfig {
            input: self.input,
            store: StoreConfig {
                url: self.url,
                service_key: self.service_key,
            },
            pacing: WritePacing {
                entity_delay: Duration::from_millis(self.entity_delay_ms),
                row_delay: Duration::from_millis(self.row_delay_ms),
            },
        }
    }
}
