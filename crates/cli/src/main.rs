//! Itiza CLI - Merchant dashboard from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Seed the store from a YAML file
//! itiza seed fixtures/merchants.yaml
//!
//! # Register the wallet as a merchant
//! itiza merchant register -w <WALLET> -n "Bloom & Co" -a "12 Garden Lane" -e hello@bloom.example
//!
//! # Show what the dashboard would show for a wallet
//! itiza merchant show -w <WALLET>
//!
//! # Manage products
//! itiza product add -w <WALLET> --name Candle --description "Lavender" --price 19.99 \
//!     --category home --stock 5 --image-url https://img.example/candle.png --tags "candle, gift"
//! itiza product list -w <WALLET> --filter active
//! itiza product update -w <WALLET> --id <PRODUCT> --price 17.50
//! itiza product deactivate -w <WALLET> --id <PRODUCT> --yes
//! ```
//!
//! # Environment Variables
//!
//! See [`itiza_merchant::config`]. The store lives in the JSON snapshot at
//! `ITIZA_SNAPSHOT_PATH` unless `--store` is given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use itiza_core::ActivityFilter;
use itiza_merchant::{LogFormat, MerchantConfig};

mod commands;

#[derive(Parser)]
#[command(name = "itiza")]
#[command(author, version, about = "Itiza merchant dashboard CLI")]
struct Cli {
    /// Store snapshot file (overrides `ITIZA_SNAPSHOT_PATH`)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load merchants and products from a YAML file
    Seed {
        /// Path to the YAML file
        file: PathBuf,
    },
    /// Merchant accounts
    Merchant {
        #[command(subcommand)]
        action: MerchantAction,
    },
    /// Product catalog
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum MerchantAction {
    /// Register a wallet as a merchant
    Register {
        /// Wallet address (base58)
        #[arg(short, long)]
        wallet: String,

        /// Business name
        #[arg(short, long)]
        name: String,

        /// Business address
        #[arg(short, long)]
        address: String,

        /// Contact email
        #[arg(short, long)]
        email: String,
    },
    /// Show the dashboard state for a wallet
    Show {
        /// Wallet address (base58)
        #[arg(short, long)]
        wallet: String,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add a product
    Add {
        /// Wallet address (base58)
        #[arg(short, long)]
        wallet: String,

        #[command(flatten)]
        fields: commands::product::ProductArgs,
    },
    /// List products
    List {
        /// Wallet address (base58)
        #[arg(short, long)]
        wallet: String,

        /// `all` or `active` (default: `ITIZA_LIST_FILTER`)
        #[arg(short, long)]
        filter: Option<ActivityFilter>,
    },
    /// Change some fields of a product
    Update {
        /// Wallet address (base58)
        #[arg(short, long)]
        wallet: String,

        /// Product ID
        #[arg(long)]
        id: String,

        #[command(flatten)]
        fields: commands::product::ProductPatchArgs,
    },
    /// Delete a product (it stays in the store, marked inactive)
    Deactivate {
        /// Wallet address (base58)
        #[arg(short, long)]
        wallet: String,

        /// Product ID
        #[arg(long)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &MerchantConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "itiza_merchant=info,itiza_cli=info".into());

    let json = format == LogFormat::Json;
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match MerchantConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: MerchantConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = cli.store {
        config.snapshot_path = path;
    }
    let ctx = commands::Context::open(config).await?;

    match cli.command {
        Commands::Seed { file } => {
            commands::seed::from_file(&ctx, &file).await?;
        }
        Commands::Merchant { action } => match action {
            MerchantAction::Register {
                wallet,
                name,
                address,
                email,
            } => {
                commands::merchant::register(&ctx, &wallet, name, address, email).await?;
            }
            MerchantAction::Show { wallet } => commands::merchant::show(&ctx, &wallet).await?,
        },
        Commands::Product { action } => match action {
            ProductAction::Add { wallet, fields } => {
                commands::product::add(&ctx, &wallet, fields).await?;
            }
            ProductAction::List { wallet, filter } => {
                let filter = filter.unwrap_or(ctx.config.list_filter);
                commands::product::list(&ctx, &wallet, filter).await?;
            }
            ProductAction::Update { wallet, id, fields } => {
                commands::product::update(&ctx, &wallet, &id, fields).await?;
            }
            ProductAction::Deactivate { wallet, id, yes } => {
                commands::product::deactivate(&ctx, &wallet, &id, yes).await?;
            }
        },
    }
    Ok(())
}
