//! Bazar CLI - Browse the catalog, fill the cart and send the order over WhatsApp.
//!
//! # Usage
//!
//! ```bash
//! # Browse products
//! bazar products --category Mochilas --query urban
//!
//! # Fill the cart (persisted under BAZAR_CART_DIR)
//! bazar cart add 8
//! bazar cart inc 8
//! bazar cart show
//!
//! # Check out
//! bazar checkout --first-name Ana --last-name Gómez --phone "11 2345 6789" \
//!     --email ana@gmail.com --comments "Retiro por el local"
//! ```
//!
//! # Commands
//!
//! - `products` - List the catalog, optionally filtered
//! - `countries` - List supported phone calling codes
//! - `cart` - Show or change the cart
//! - `validate-email` - Run the email gate on one address
//! - `checkout` - Validate, compose and open the WhatsApp order

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use bazar_core::{CategoryFilter, CountryCode};
use bazar_storefront::config::BazarConfig;
use bazar_storefront::state::AppState;
use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "bazar")]
#[command(author, version, about = "Bazar storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Category label, or "Todos" for every category
        #[arg(short, long, default_value = "Todos")]
        category: CategoryFilter,

        /// Case-insensitive text to match against name or category
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// List supported phone calling codes
    Countries,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Check an email address the way checkout does
    ValidateEmail {
        /// Address to check
        email: String,
    },
    /// Send the current cart as a WhatsApp order
    Checkout(CheckoutArgs),
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: String,
    },
    /// Increase a line's quantity by one
    Inc {
        /// Product id
        id: String,
    },
    /// Decrease a line's quantity by one (never below one)
    Dec {
        /// Product id
        id: String,
    },
    /// Remove a line
    Remove {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    /// Calling code, e.g. +54
    #[arg(long, default_value = "+54")]
    prefix: CountryCode,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    email: String,

    /// Delivery or pickup instructions
    #[arg(long, default_value = "")]
    comments: String,

    /// User agent used to pick the mobile or desktop link
    #[arg(long, default_value = "")]
    user_agent: String,

    /// Print the link instead of opening it
    #[arg(long)]
    no_open: bool,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &BazarConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
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

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match BazarConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(std::io::stderr().lock(), "Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean on stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazar=info,bazar_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = AppState::new(config);
    let mut out = std::io::stdout().lock();

    match run(cli, &state, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            let _ = writeln!(std::io::stderr().lock(), "{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(
    cli: Cli,
    state: &AppState,
    out: &mut impl Write,
) -> bazar_storefront::error::Result<()> {
    match cli.command {
        Commands::Products { category, query } => {
            commands::catalog::products(out, state, category, &query)?;
        }
        Commands::Countries => commands::catalog::countries(out)?,
        Commands::Cart { action } => {
            let mut session = state.cart_session();
            match action {
                CartAction::Show => commands::cart::show(out, state, &session)?,
                CartAction::Add { id } => commands::cart::add(out, state, &mut session, &id)?,
                CartAction::Inc { id } => {
                    commands::cart::shift(out, state, &mut session, &id, 1)?;
                }
                CartAction::Dec { id } => {
                    commands::cart::shift(out, state, &mut session, &id, -1)?;
                }
                CartAction::Remove { id } => {
                    commands::cart::remove(out, state, &mut session, &id)?;
                }
                CartAction::Clear => commands::cart::clear(out, &mut session)?,
            }
        }
        Commands::ValidateEmail { email } => {
            commands::checkout::validate_email(out, state, &email).await?;
        }
        Commands::Checkout(args) => {
            let session = state.cart_session();
            let request = commands::checkout::CheckoutRequest {
                customer: bazar_core::CustomerInfo {
                    first_name: args.first_name,
                    last_name: args.last_name,
                    phone_prefix: args.prefix,
                    phone: args.phone,
                    email: args.email,
                    comments: args.comments,
                },
                user_agent: args.user_agent,
                open: !args.no_open,
            };
            commands::checkout::checkout(out, state, session.cart(), request).await?;
        }
    }
    Ok(())
}
