use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use threaddrop_collector::batch::BatchWriter;
use threaddrop_collector::pipeline::{FollowerPipeline, ThreadPipeline};
use threaddrop_collector::resolution::Resolution;
use threaddrop_collector::traits::ConversationSource;
use threaddrop_common::config::normalize_handle;
use threaddrop_common::Config;
use x_client::XClient;

#[derive(Parser)]
#[command(name = "threaddrop", about = "Collect airdrop addresses from thread replies")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape replies to a conversation and write address batches
    Thread {
        /// Root post id (overrides CONVERSATION_ID)
        #[arg(long)]
        conversation_id: Option<String>,
        /// Tokens per address (overrides AIRDROP_AMOUNT)
        #[arg(long)]
        amount: Option<u64>,
        /// Output directory (overrides OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Keep only the first occurrence of each address
        #[arg(long)]
        dedup: bool,
        /// In-flight ENS lookups (overrides RESOLVE_CONCURRENCY)
        #[arg(long)]
        resolve_concurrency: Option<usize>,
    },
    /// Collect an account's followers and their profiles
    Followers {
        /// Account handle, with or without @ (overrides TARGET_HANDLE)
        #[arg(long)]
        handle: Option<String>,
        /// Maximum followers to collect (overrides MAX_FOLLOWERS)
        #[arg(long)]
        max: Option<usize>,
        /// Output directory (overrides OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Command::Thread {
            conversation_id,
            amount,
            output_dir,
            dedup,
            resolve_concurrency,
        } => {
            if let Some(id) = conversation_id {
                config.conversation_id = Some(id);
            }
            if let Some(amount) = amount {
                config.airdrop_amount = Some(amount.to_string());
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(n) = resolve_concurrency {
                config.resolve_concurrency = n.max(1);
            }
            if dedup {
                config.dedup_addresses = Some("true".to_string());
            }
            run_thread(&config).await
        }
        Command::Followers {
            handle,
            max,
            output_dir,
        } => {
            if let Some(handle) = handle {
                config.target_handle = Some(normalize_handle(&handle));
            }
            if let Some(max) = max {
                config.max_followers = max;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            run_followers(&config).await
        }
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("threaddrop=info".parse()?)
        .add_directive("threaddrop_collector=info".parse()?)
        .add_directive("threaddrop_common=info".parse()?)
        .add_directive("x_client=info".parse()?)
        .add_directive("ens_client=info".parse()?);

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

async fn run_thread(config: &Config) -> Result<()> {
    let settings = config.require_thread()?;
    config.log_redacted();

    info!(conversation_id = settings.conversation_id.as_str(), "Thread collection starting...");
    if config.eth_rpc_url.is_none() {
        info!("ETH_RPC_URL not set, .eth names will not be resolved");
    }

    let client = Arc::new(XClient::with_base_url(
        &config.x_api_base_url,
        config.x_bearer_token.clone(),
    ));
    let pipeline = ThreadPipeline::builder()
        .source(Arc::new(ConversationSource::new(client, settings.conversation_id)))
        .amount(settings.amount)
        .resolution(Resolution::from_endpoint(config.eth_rpc_url.as_deref()))
        .resolve_concurrency(config.resolve_concurrency)
        .dedup(settings.dedup)
        .build();

    let mut outcome = pipeline.collect().await?;

    let writer = BatchWriter::new(&config.output_dir);
    if let Err(e) = outcome.write(&writer) {
        error!(
            error = %e,
            dir = %writer.dir().display(),
            addresses = outcome.addresses.len(),
            "Could not write batches, dumping collected lines to stdout"
        );
        for line in outcome.lines() {
            println!("{line}");
        }
        return Err(e.into());
    }

    info!("{}", outcome.stats);
    Ok(())
}

async fn run_followers(config: &Config) -> Result<()> {
    let handle = config.require_followers()?;
    config.log_redacted();

    info!(handle = handle.as_str(), "Follower collection starting...");

    let client = Arc::new(XClient::with_base_url(
        &config.x_api_base_url,
        config.x_bearer_token.clone(),
    ));
    let pipeline = FollowerPipeline::builder()
        .source(client)
        .max_followers(config.max_followers)
        .build();

    let outcome = pipeline.collect(&handle).await?;
    let (ids_path, profiles_path) = outcome
        .write(&config.output_dir)
        .context("writing follower documents")?;

    info!(
        followers = %ids_path.display(),
        profiles = %profiles_path.display(),
        "Follower documents written"
    );
    info!("{}", outcome.stats);
    Ok(())
}
