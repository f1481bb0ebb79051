use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kira_biodiversity::app::App;
use kira_biodiversity::config::{ConfigLoader, ConfigOverrides, ResolvedConfig};
use kira_biodiversity::error::KiraError;
use kira_biodiversity::http::{self, ServerState};
use kira_biodiversity::output::{JsonOutput, MetadataBody, abundance_body};
use kira_biodiversity::store::Store;

#[derive(Parser)]
#[command(name = "kira-bd")]
#[command(about = "Read-only JSON service over the belly button biodiversity dataset")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Serve the JSON endpoints over HTTP")]
    Serve(ServeArgs),
    #[command(about = "List sample names (BB_<id>)")]
    Names,
    #[command(about = "List OTU descriptions")]
    Otu,
    #[command(about = "Show metadata for a sample")]
    Metadata(SampleArgs),
    #[command(about = "Show weekly wash frequency for a sample")]
    Wfreq(SampleArgs),
    #[command(about = "Show OTU ids and sample values sorted by abundance")]
    Samples(SampleArgs),
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long)]
    bind: Option<String>,
}

#[derive(Args)]
struct SampleArgs {
    sample: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(kira) = report.downcast_ref::<KiraError>() {
            return ExitCode::from(map_exit_code(kira));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &KiraError) -> u8 {
    match error {
        KiraError::NotFound(_) | KiraError::InvalidColumn(_) | KiraError::EmptyResult(_) => 2,
        KiraError::Schema(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let bind = match &cli.command {
        Commands::Serve(args) => args.bind.clone(),
        _ => None,
    };
    let overrides = ConfigOverrides {
        database: cli.db.clone(),
        bind,
    };
    let resolved = ConfigLoader::resolve(cli.config.as_deref(), overrides)?;

    let store = Store::open(&resolved.database, &resolved.tables)?;
    let app = App::new(store);

    match cli.command {
        Commands::Serve(_) => run_serve(app, &resolved),
        Commands::Names => JsonOutput::print(&app.names()?).into_diagnostic(),
        Commands::Otu => JsonOutput::print(&app.otu()?).into_diagnostic(),
        Commands::Metadata(args) => {
            let body = MetadataBody::from(app.metadata(&args.sample)?);
            JsonOutput::print(&body).into_diagnostic()
        }
        Commands::Wfreq(args) => JsonOutput::print(&app.wfreq(&args.sample)?).into_diagnostic(),
        Commands::Samples(args) => {
            let body = abundance_body(app.samples(&args.sample)?);
            JsonOutput::print(&body).into_diagnostic()
        }
    }
}

fn run_serve(app: App, resolved: &ResolvedConfig) -> miette::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| KiraError::Server(err.to_string()))?;

    info!(
        database = %resolved.database,
        timeout_ms = resolved.request_timeout.as_millis() as u64,
        "starting kira-bd"
    );
    let state = ServerState::new(app, resolved.request_timeout);
    runtime.block_on(http::serve(state, resolved.bind))?;
    Ok(())
}
