//! mdmint: convert raw text to markdown from the command line.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use mdmint::config::Config;
use mdmint::controller::{
    DRAFT_KEY, DirectoryDownloader, DraftAutosaver, DraftStore, FileDraftStore, Workspace,
};
use mdmint::{ConversionGateway, MdmintError};

/// Text to markdown converter
#[derive(Parser)]
#[command(name = "mdmint")]
#[command(version = mdmint::PKG_VERSION)]
#[command(about = "Convert raw text to a markdown document")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "MDMINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert text to markdown
    Convert {
        /// File to convert (or omit to read from stdin, or the saved draft)
        file: Option<PathBuf>,
        /// Save the result as converted-YYYY-MM-DD.md instead of printing it
        #[arg(short, long)]
        download: bool,
        /// Directory for --download (overrides the config file)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Manage the saved draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Print the saved draft
    Show,
    /// Save text as the draft (file, or stdin when omitted)
    Save { file: Option<PathBuf> },
    /// Delete the saved draft
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    info!(version = mdmint::version_string(), "mdmint starting");

    match args.command {
        Command::Convert {
            file,
            download,
            output_dir,
        } => {
            let dir = output_dir.unwrap_or_else(|| config.download_dir());
            convert(&config, file.as_deref(), download.then_some(dir)).await?;
        }
        Command::Draft { action } => draft(&config, action)?,
    }

    Ok(())
}

async fn convert(
    config: &Config,
    file: Option<&Path>,
    download_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let service: Arc<dyn ConversionGateway> = Arc::new(config.service_builder().build()?);
    let store = Arc::new(FileDraftStore::new(config.drafts_path()));
    let drafts = DraftAutosaver::spawn(store, config.drafts_debounce());

    // Explicit input beats the saved draft and leaves it untouched.
    let mut workspace = Workspace::open(service, read_input(file)?, drafts);
    if workspace.input().trim().is_empty() {
        return Err(MdmintError::InvalidInput("nothing to convert".into()).into());
    }
    if workspace.drafts().is_some() {
        debug!("converting saved draft");
    }

    let Some(response) = workspace.convert().await? else {
        return Err(MdmintError::InvalidInput("nothing to convert".into()).into());
    };
    if let Some(drafts) = workspace.drafts() {
        drafts.flush().await;
    }
    if !response.success {
        let error = response.error.unwrap_or_else(|| "unknown error".into());
        return Err(MdmintError::Conversion(error).into());
    }

    match download_dir {
        Some(dir) => {
            let downloader = DirectoryDownloader::new(dir);
            let today = chrono::Utc::now().date_naive();
            if let Some(options) = workspace.download_options(today) {
                let path = downloader.path_for(&options)?;
                workspace.download(&downloader, today)?;
                println!("{}", path.display());
            }
        }
        None => print!("{}", workspace.converted()),
    }
    Ok(())
}

fn draft(config: &Config, action: DraftAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileDraftStore::new(config.drafts_path());
    match action {
        DraftAction::Show => match store.get(DRAFT_KEY)? {
            Some(text) => print!("{text}"),
            None => eprintln!("no saved draft"),
        },
        DraftAction::Save { file } => {
            let text = read_input(file.as_deref())?
                .ok_or_else(|| MdmintError::InvalidInput("no text provided".into()))?;
            store.set(DRAFT_KEY, &text)?;
            info!(path = %store.path().display(), "draft saved");
        }
        DraftAction::Clear => store.remove(DRAFT_KEY)?,
    }
    Ok(())
}

/// Read text from `file`, or from stdin when it is piped.
///
/// Blank piped input (`< /dev/null`, an idle CI pipe) counts as no input.
fn read_input(file: Option<&Path>) -> io::Result<Option<String>> {
    if let Some(path) = file {
        return std::fs::read_to_string(path).map(Some);
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf)?;
    Ok(Some(buf).filter(|text| !text.trim().is_empty()))
}
