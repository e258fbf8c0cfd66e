mod render;
mod server;
mod web;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quotes_core::{QuoteView, SubcategoryPolicy};
use quotes_store::{Config, QuoteSource};
use rmcp::{ServiceExt, transport::stdio};

#[derive(Parser)]
#[command(name = "quotes", about = "Browse categorized quotes from a static JSON resource")]
struct Cli {
    /// Config file (defaults to $QUOTES_CONFIG when set)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Quote resource: file path or http(s) URL
    #[arg(long, global = true)]
    source: Option<String>,

    /// Subcategory options while no category is selected: strict or union
    #[arg(long, global = true)]
    policy: Option<SubcategoryPolicy>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every distinct category
    Categories,

    /// List subcategories of quotes in a category
    Subcategories {
        /// Category to restrict to (omit for "All")
        #[arg(long)]
        category: Option<String>,
    },

    /// Show quotes matching the selected category and subcategory
    List {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        subcategory: Option<String>,

        /// Print the full view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the HTML quote browser over HTTP
    Web {
        /// Listen address (overrides config)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Start MCP server on stdio transport
    Serve,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(source) = &cli.source {
        config.source = QuoteSource::parse(source);
    }
    if let Some(policy) = cli.policy {
        config.subcategory_policy = policy;
    }
    Ok(config)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Categories => cmd_categories(&config).await,
        Commands::Subcategories { category } => {
            cmd_subcategories(&config, category.as_deref()).await
        }
        Commands::List {
            category,
            subcategory,
            json,
        } => cmd_list(&config, category.as_deref(), subcategory.as_deref(), *json).await,
        Commands::Web { bind } => web::run(&config, bind.unwrap_or(config.bind)).await,
        Commands::Serve => cmd_serve(&config).await,
    }
}

async fn load_view(config: &Config) -> QuoteView {
    let quotes = config.source.load_or_empty().await;
    QuoteView::new(quotes, config.subcategory_policy)
}

async fn cmd_categories(config: &Config) -> Result<()> {
    let view = load_view(config).await;
    for category in view.categories() {
        println!("{category}");
    }
    Ok(())
}

async fn cmd_subcategories(config: &Config, category: Option<&str>) -> Result<()> {
    let view = load_view(config).await.select_category(category);
    for subcategory in view.subcategories() {
        println!("{subcategory}");
    }
    Ok(())
}

async fn cmd_list(
    config: &Config,
    category: Option<&str>,
    subcategory: Option<&str>,
    json: bool,
) -> Result<()> {
    let view = load_view(config)
        .await
        .select_category(category)
        .select_subcategory(subcategory);

    if json {
        let snapshot = serde_json::to_string_pretty(&view.snapshot())
            .context("failed to serialize view")?;
        println!("{snapshot}");
        return Ok(());
    }

    let cards = view.cards();
    if cards.is_empty() {
        println!("(no quotes)");
    } else {
        print!("{}", render::text_cards(&cards));
    }
    Ok(())
}

async fn cmd_serve(config: &Config) -> Result<()> {
    let view = load_view(config).await;
    tracing::info!(
        "starting MCP server over {} quotes from {}",
        view.quotes().len(),
        config.source
    );

    // stdio is the only transport, so a failed handshake means the client went away.
    let service = match server::QuotesServer::new(view).serve(stdio()).await {
        Ok(service) => service,
        Err(e) => {
            tracing::warn!("MCP client disconnected before initialization: {e}");
            return Ok(());
        }
    };
    service.waiting().await.context("MCP server failed")?;
    Ok(())
}
