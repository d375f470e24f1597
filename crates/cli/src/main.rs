//! CustomShop CLI - edit and browse a storefront from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (the configured admin email gets the admin panel)
//! customshop register -e admin@customshop.local -p secret -n Admin
//!
//! # Render the current view
//! customshop view
//!
//! # Add a product; the description is written by the assistant
//! customshop products add "Desk Lamp" 39,90 -c Home
//!
//! # Record a fake sale and show revenue
//! customshop orders simulate
//! customshop orders revenue
//!
//! # Restyle the shop
//! customshop settings set accentColor "#ff6600"
//! customshop settings social instagram https://instagram.com/myshop
//! ```
//!
//! State lives in `CUSTOMSHOP_DATA_DIR` (or `--data-dir`), one JSON file per
//! entity, and is read at start and written back before exiting.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use customshop_storefront::models::{SocialPlatform, ViewMode};
use customshop_storefront::store::{FileStore, Storage};
use customshop_storefront::{AppError, AppState, ShopConfig};

mod commands;
mod render;

use commands::CliError;

#[derive(Parser)]
#[command(name = "customshop")]
#[command(author, version, about = "CustomShop storefront editor")]
struct Cli {
    /// Directory holding the shop data (overrides `CUSTOMSHOP_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 4 characters)
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short = 'n', long, default_value = "")]
        username: String,
    },
    /// Log in to an existing account
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log out
    Logout,
    /// Show who is logged in
    Whoami,
    /// Render the current view
    View {
        /// View to render (`customer` or `admin`)
        #[arg(short, long)]
        mode: Option<ViewMode>,
    },
    /// Switch between the shop and the admin panel, then render it
    Mode {
        /// `customer` or `admin`
        mode: ViewMode,
    },
    /// Manage the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Buy a product
    Checkout {
        /// Product id
        product_id: String,

        /// Full name
        #[arg(short, long)]
        name: String,

        /// Contact email
        #[arg(short, long)]
        email: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,
    },
    /// Edit the shop's look and content
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Ask the shop assistant a question
    Chat {
        /// Your message
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List the catalog
    List,
    /// Add a product
    Add {
        /// Product title
        title: String,

        /// Price; `,` is accepted as the decimal separator
        price: String,

        /// Category (defaults to "General")
        #[arg(short, long, default_value = "")]
        category: String,

        /// Image URL (defaults to a placeholder)
        #[arg(short, long, default_value = "")]
        image_url: String,
    },
    /// Change a product
    Edit {
        /// Product id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        price: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        image_url: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders, newest first
    List,
    /// Delete an order
    Delete {
        /// Order id
        id: String,
    },
    /// Record made-up sales for random products
    Simulate {
        /// Number of sales
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
    /// Show total revenue
    Revenue,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show every setting
    Show,
    /// Change one setting, e.g. `set shopName "My Shop"`
    Set {
        /// Setting name (camelCase)
        key: String,

        /// New value
        value: String,
    },
    /// Set or clear a social link
    Social {
        /// facebook, instagram, twitter, linkedin or tiktok
        platform: SocialPlatform,

        /// Profile URL (empty clears it)
        #[arg(default_value = "")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match ShopConfig::from_env() {
        Ok(config) => config,
        Err(e) => return fail(&CliError::Config(e)),
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }

    init_tracing(config.log_json);
    let _sentry_guard = init_sentry(&config);

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::info!(error = %e, "command failed");
            fail(&e)
        }
    }
}

async fn run(cli: Cli, config: &ShopConfig) -> Result<(), CliError> {
    let store = FileStore::open(config.data_dir.clone()).map_err(AppError::from)?;
    let mut state = AppState::load(Storage::new(store), config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = dispatch(cli.command, &mut state, config, &mut out).await;

    // Persist even when the command failed; earlier mutations already happened.
    let saved = state.shutdown();
    out.flush()?;
    result?;
    saved?;
    Ok(())
}

async fn dispatch(
    command: Commands,
    state: &mut AppState,
    config: &ShopConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Commands::Register {
            email,
            password,
            username,
        } => commands::account::register(state, out, username, email, password),
        Commands::Login { email, password } => {
            commands::account::login(state, out, &email, &password)
        }
        Commands::Logout => commands::account::logout(state, out),
        Commands::Whoami => commands::account::whoami(state, out),
        Commands::View { mode } => commands::account::view(state, out, mode),
        Commands::Mode { mode } => commands::account::view(state, out, Some(mode)),
        Commands::Products { action } => match action {
            ProductAction::List => commands::catalog::list(state, out),
            ProductAction::Add {
                title,
                price,
                category,
                image_url,
            } => {
                let form = commands::catalog::product_form(title, price, category, image_url);
                commands::catalog::add(state, out, &form, config.gemini.as_ref()).await
            }
            ProductAction::Edit {
                id,
                title,
                price,
                category,
                image_url,
                description,
            } => {
                let edit = commands::catalog::ProductEdit {
                    title,
                    price,
                    category,
                    image_url,
                    description,
                };
                commands::catalog::edit(state, out, &id, edit)
            }
            ProductAction::Delete { id } => commands::catalog::delete(state, out, &id),
        },
        Commands::Orders { action } => match action {
            OrderAction::List => commands::orders::list(state, out),
            OrderAction::Delete { id } => commands::orders::delete(state, out, &id),
            OrderAction::Simulate { count } => {
                commands::orders::simulate(state, out, count, &mut rand::rng())
            }
            OrderAction::Revenue => commands::orders::revenue(state, out),
        },
        Commands::Checkout {
            product_id,
            name,
            email,
            address,
        } => commands::orders::checkout(state, out, &product_id, name, email, address),
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(state, out),
            SettingsAction::Set { key, value } => commands::settings::set(state, out, &key, value),
            SettingsAction::Social { platform, url } => {
                commands::settings::social(state, out, platform, url)
            }
        },
        Commands::Chat { message } => {
            commands::chat::ask(state, out, &message.join(" "), config.gemini.as_ref()).await
        }
    }
}

#[allow(clippy::print_stderr)]
fn fail(error: &CliError) -> ExitCode {
    eprintln!("{}", error.user_message());
    ExitCode::FAILURE
}

/// Initialize Sentry error tracking when a DSN is configured.
fn init_sentry(config: &ShopConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.sentry_environment.clone().map(Into::into),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Errors and warnings become Sentry events, info and debug become
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "customshop=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| fmt::layer().json().with_writer(io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(io::stderr)))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}
