use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use aroma_web::config::Config;
use aroma_web::logging;
use aroma_web::pipeline::Pipeline;
use aroma_web::server::{self, AppState};
use aroma_web::sheet::{FileSheetSource, GoogleSheetSource, SheetSource};
use aroma_web::types::DisplayMode;

#[derive(Parser)]
#[command(name = "aroma_web")]
#[command(about = "Group-buy decant order sheet rendered from a Google spreadsheet")]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Port to listen on, overrides config and PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch the sheet once and print the selected rows as JSON
    Dump {
        /// Participant name as written in the sheet header
        #[arg(long, default_value = "")]
        user: String,
        /// all, mine, plan or perfume_section
        #[arg(long, default_value = "all")]
        mode: String,
        /// Read a downloaded CSV export instead of the live sheet
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn live_source(config: &Config) -> anyhow::Result<Arc<dyn SheetSource>> {
    let sheet = config.sheet.sheet_ref()?;
    let timeout = Duration::from_secs(config.sheet.timeout_seconds);
    Ok(Arc::new(GoogleSheetSource::new(sheet, timeout)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging("logs");

    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref())?;
    let pipeline = Pipeline::new(&config);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let source = live_source(&config)?;
            let port = port.unwrap_or(config.server.port);
            info!(source = %source.describe(), port, "starting order sheet server");
            server::start_server(AppState::new(pipeline, source), port).await?;
        }
        Commands::Dump { user, mode, csv } => {
            let source: Arc<dyn SheetSource> = match csv {
                Some(path) => Arc::new(FileSheetSource::new(path)),
                None => live_source(&config)?,
            };
            let page = pipeline
                .run(source.as_ref(), &user, DisplayMode::parse(&mode))
                .await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }

    Ok(())
}
