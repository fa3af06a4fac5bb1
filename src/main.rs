//! frontrowmd - review-generation workflow CLI for the FrontrowMD backend
//!
//! Submits product URLs for metadata extraction, tracks eventually-consistent
//! processing, and drives review generation.

use anyhow::Result;
use clap::{Parser, Subcommand};
use frontrowmd_cli::backend::models::ReviewStatus;
use frontrowmd_cli::commands::{
    GenerateArgs, GenerateCommand, ProductCommand, ProductsCommand, ReviewCommand, SubmitCommand,
    WatchCommand,
};
use frontrowmd_cli::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "frontrowmd",
    version,
    about = "Review-generation workflow CLI for the FrontrowMD backend",
    long_about = "Submits product URLs for metadata extraction, watches eventually-consistent \
                  processing, and triggers persona-based review generation."
)]
struct Cli {
    /// Backend base URL
    #[arg(short, long, global = true, env = "FRMD_BASE_URL")]
    base_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "FRMD_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path of the pending-product state file
    #[arg(long, global = true, env = "FRMD_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a product URL for metadata extraction
    #[command(alias = "s")]
    Submit {
        /// Product page URL (https:// is assumed when no scheme is given)
        url: String,
    },

    /// List recent products
    Products {
        /// Maximum number of products to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Look up a product by id
    #[command(alias = "p")]
    Product {
        /// Product id
        product_id: String,
    },

    /// Trigger asynchronous review generation for a product
    #[command(alias = "g")]
    Generate {
        /// Product id
        #[arg(long)]
        product_id: String,

        /// Number of reviews to generate (1-20)
        #[arg(long, default_value = "5")]
        count: u32,

        /// Minimum words per review
        #[arg(long, default_value = "80")]
        min_words: u32,

        /// Maximum words per review
        #[arg(long, default_value = "120")]
        max_words: u32,

        /// Review tone keys (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        tones: Vec<String>,

        /// Supporting research link (repeatable)
        #[arg(long = "link")]
        links: Vec<String>,

        /// Watch for completion after triggering
        #[arg(long)]
        watch: bool,
    },

    /// Watch pending products until they appear in the catalog
    #[command(alias = "w")]
    Watch {
        /// Give up after this many seconds (default: poll until resolved)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Review mutations: add, accept, reject, regenerate, save
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Add a human-written review
    Add {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        doctor: Option<String>,
    },

    /// Accept a generated review
    Accept {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        review_id: String,
    },

    /// Reject a generated review
    Reject {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        review_id: String,
    },

    /// Request a rewritten version of a review
    Regenerate {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        review_id: String,
        /// Editing instructions for the rewrite
        #[arg(long)]
        instructions: String,
        /// Target word count
        #[arg(long)]
        words: Option<u32>,
    },

    /// Persist a regenerated review
    Save {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        review_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;

    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(state_file) = cli.state_file {
        config.state_file = Some(state_file);
    }

    match cli.command {
        Commands::Submit { url } => {
            let cmd = SubmitCommand::new(config);
            let output = cmd.execute(&url).await?;
            println!("{}", output);
        }

        Commands::Products { limit } => {
            if let Some(limit) = limit {
                config.max_products = limit;
            }

            let cmd = ProductsCommand::new(config);
            let output = cmd.execute().await?;
            println!("{}", output);
        }

        Commands::Product { product_id } => {
            let cmd = ProductCommand::new(config);
            let output = cmd.execute(&product_id).await?;
            println!("{}", output);
        }

        Commands::Generate { product_id, count, min_words, max_words, tones, links, watch } => {
            let cmd = GenerateCommand::new(config.clone());
            let output = cmd
                .execute(GenerateArgs {
                    product_id,
                    count,
                    min_words,
                    max_words,
                    tones,
                    research_links: links,
                })
                .await?;
            println!("{}", output);

            if watch {
                let cmd = WatchCommand::new(config);
                let output = cmd.execute().await?;
                println!("{}", output);
            }
        }

        Commands::Watch { timeout_secs } => {
            if timeout_secs.is_some() {
                config.poll_timeout_secs = timeout_secs;
            }

            let cmd = WatchCommand::new(config);
            let output = cmd.execute().await?;
            println!("{}", output);
        }

        Commands::Review { action } => {
            let cmd = ReviewCommand::new(config);
            let output = match action {
                ReviewAction::Add { product_id, title, text, doctor } => {
                    cmd.add(&product_id, &title, &text, doctor).await?
                }
                ReviewAction::Accept { product_id, review_id } => {
                    cmd.set_status(&product_id, &review_id, ReviewStatus::Accepted).await?
                }
                ReviewAction::Reject { product_id, review_id } => {
                    cmd.set_status(&product_id, &review_id, ReviewStatus::Rejected).await?
                }
                ReviewAction::Regenerate { product_id, review_id, instructions, words } => {
                    cmd.regenerate(&product_id, &review_id, &instructions, words).await?
                }
                ReviewAction::Save { product_id, review_id, title, text } => {
                    cmd.save(&product_id, &review_id, title, &text).await?
                }
            };
            println!("{}", output);
        }
    }

    Ok(())
}
