//! LANTERN CLI
//!
//! Runs the demonstration catalog and prints transcripts and status.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod render;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::Result;
use lantern_core::Topic;
use lantern_runtime::{Runner, RunnerConfig, SnippetFilter, DEFAULT_TIMEOUT_MILLIS};
use lantern_snippets::CatalogOptions;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lantern")]
#[command(about = "LANTERN - runtime concept snippet runner", long_about = None)]
struct Cli {
    /// How long to wait for deferred callbacks per snippet
    #[arg(
        long,
        global = true,
        env = "LANTERN_TIMEOUT_MILLIS",
        default_value_t = DEFAULT_TIMEOUT_MILLIS
    )]
    timeout_millis: u64,

    /// Also register snippets that fail on purpose
    #[arg(long, global = true)]
    include_faulty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the catalog or a subset of it
    Run {
        /// Run only these snippets (repeatable)
        #[arg(long = "only", value_name = "NAME")]
        only: Vec<String>,
        /// Run only snippets of this topic
        #[arg(long)]
        topic: Option<Topic>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List registered snippets
    List {
        /// Only list snippets of this topic
        #[arg(long)]
        topic: Option<Topic>,
    },
    /// Run one snippet and print its transcript
    Show {
        /// Snippet name
        name: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lantern=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_runner(cli: &Cli) -> Result<Runner> {
    let config = RunnerConfig::new().with_timeout_millis(cli.timeout_millis);
    let options = CatalogOptions::default().with_diagnostics(cli.include_faulty);
    tracing::debug!(
        timeout_ms = cli.timeout_millis,
        include_faulty = cli.include_faulty,
        "building catalog runner"
    );
    Ok(lantern_snippets::catalog(config, options)?)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();
    let runner = build_runner(&cli)?;

    match cli.command {
        Commands::Run { only, topic, format } => {
            let mut filter = SnippetFilter::all();
            for name in only {
                filter = filter.with_name(name);
            }
            if let Some(topic) = topic {
                filter = filter.with_topic(topic);
            }

            let report = runner.run_matching(&filter).await?;
            match format {
                Format::Text => print!("{}", render::report(&report)),
                Format::Json => println!("{}", report.to_json()?),
            }
            Ok(ExitCode::from(report.exit_code()))
        }
        Commands::List { topic } => {
            print!("{}", render::listing(&runner, topic));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show { name } => {
            let result = runner.run_one(&name).await?;
            print!("{}", render::result(&result));
            Ok(if result.succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
