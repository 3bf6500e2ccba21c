use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use blueprint_explainer::app::controller::{ExplanationEvent, SECTION_NOT_FOUND, ViewController};
use blueprint_explainer::app::fetch;
use blueprint_explainer::cache::MemoryCache;
use blueprint_explainer::explain::{ApiKeyManager, ClaudeClient, ClaudeModel};
use blueprint_explainer::{App, Config};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blueprint-explainer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Blueprint file path or http(s) URL
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Model to explain with (haiku, sonnet, opus)
    #[arg(short, long, global = true)]
    model: Option<ClaudeModel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sections of the blueprint
    Sections,
    /// Stream the explanation of one section to stdout
    Explain {
        /// Section index as shown by `sections`
        index: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(source) = cli.source {
        config.document = source;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }

    match cli.command {
        Some(Commands::Sections) => {
            init_logging(false)?;
            list_sections(&config).await
        }
        Some(Commands::Explain { index }) => {
            init_logging(false)?;
            explain_section(&config, index).await
        }
        None => {
            init_logging(true)?;
            let client = build_client(&config)?;
            let source = config.document_source();
            let mut app = App::new(config, source, Arc::new(client))?;
            app.run().await
        }
    }
}

/// Set up tracing; the TUI logs to a file so output never lands on screen
fn init_logging(to_file: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "blueprint_explainer=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        let path = Config::log_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {:?}", parent))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;

        registry
            .with(fmt::layer().with_target(false).with_ansi(false).with_writer(Arc::new(file)))
            .init();
    } else {
        registry.with(fmt::layer().with_target(false).with_writer(io::stderr)).init();
    }

    Ok(())
}

/// Create the Claude client from the configured key variable
fn build_client(config: &Config) -> Result<ClaudeClient> {
    let api_key = ApiKeyManager::from_env(&config.api_key_env)?;
    let client = ClaudeClient::new(api_key, config.model)?.with_api_url(config.api_url.as_str());
    tracing::info!("Explaining with {}", config.model.display_name());
    Ok(client)
}

/// Print `<index>  <title>` for every section
async fn list_sections(config: &Config) -> Result<()> {
    let http = reqwest::Client::new();
    let sections = config.document_source().load_sections(&http).await?;

    let mut stdout = io::stdout().lock();
    for (index, section) in sections.iter().enumerate() {
        writeln!(stdout, "{}  {}", index, section.title)?;
    }
    Ok(())
}

/// Stream one explanation to stdout as it arrives
async fn explain_section(config: &Config, index: usize) -> Result<()> {
    let client = build_client(config)?;
    let http = reqwest::Client::new();
    let sections = config.document_source().load_sections(&http).await?;

    let mut controller = ViewController::new(MemoryCache::new());
    controller.finish_document_load(Ok(sections));

    let (tx, mut rx) = mpsc::channel(64);
    let shutdown = CancellationToken::new();
    let started = fetch::select_and_fetch(&mut controller, &client, index, &tx, &shutdown);
    drop(tx);

    if started.is_none() {
        bail!("{}", controller.explanation_error().unwrap_or(SECTION_NOT_FOUND));
    }
    if let Some(section) = controller.selected_section() {
        eprintln!("Explaining \"{}\"", section.title);
    }

    let mut stdout = io::stdout();
    while let Some(event) = rx.recv().await {
        let chunk = match &event {
            ExplanationEvent::Chunk { text, .. } => Some(text.clone()),
            _ => None,
        };
        if controller.apply(event) {
            if let Some(text) = chunk {
                write!(stdout, "{}", text)?;
                stdout.flush()?;
            }
        }
    }
    writeln!(stdout)?;

    if let Some(error) = controller.explanation_error() {
        bail!("{}", error);
    }
    Ok(())
}
