//! Petshop CLI - drive the local client state from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and log in
//! petshop register -n "Ana" -e ana@example.com -p secret
//! petshop login -e ana@example.com -p secret
//!
//! # Browse and edit the catalog
//! petshop products list --category dog --search chow
//! petshop products add -n "Cat Tree" -c cat -p 40
//!
//! # Fill the cart and check totals
//! petshop rate set 36.5
//! petshop cart add 1
//! petshop cart show
//! ```
//!
//! # Commands
//!
//! - `register`, `login`, `logout`, `whoami` - Account and session
//! - `products` - List, add, update and delete products
//! - `cart` - Show, add, remove and clear cart lines
//! - `rate` - Show or set the dollar exchange rate
//!
//! Data lives under `PETSHOP_DATA_DIR` (default `./petshop-data`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use petshop_state::config::StateConfig;
use petshop_state::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "petshop")]
#[command(author, version, about = "Petshop client state tools")]
struct Cli {
    /// Data directory (overrides `PETSHOP_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log in with email and password
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show or set the dollar exchange rate
    Rate {
        #[command(subcommand)]
        action: RateAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products, optionally filtered
    List {
        /// `dog`, `cat` or `all`
        #[arg(short, long, default_value = "all")]
        category: String,
        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Add a product
    Add {
        #[arg(short, long)]
        name: String,
        /// `dog` or `cat`
        #[arg(short, long)]
        category: String,
        #[arg(short, long)]
        price: String,
    },
    /// Replace a product's name, category and price
    Update {
        id: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        category: String,
        #[arg(short, long)]
        price: String,
    },
    /// Delete a product
    Delete { id: String },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines and totals
    Show,
    /// Add a product by ID
    Add { id: String },
    /// Remove the line at a position (as shown by `cart show`)
    Remove { index: usize },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum RateAction {
    /// Show the current rate
    Show,
    /// Set a new rate
    Set { rate: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        match e.downcast_ref::<petshop_state::Error>() {
            Some(err) => {
                tracing::debug!(error = %err, kind = ?err.kind(), "Command failed");
                tracing::error!("{}", err.user_message());
            }
            None => tracing::error!("Command failed: {e}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StateConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    let state = AppState::open(config).await?;
    state.initialize_session().await;

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => commands::account::register(&state, &name, &email, &password).await?,
        Commands::Login { email, password } => {
            commands::account::login(&state, &email, &password).await?;
        }
        Commands::Logout => commands::account::logout(&state).await?,
        Commands::Whoami => commands::account::whoami(&state)?,
        Commands::Products { action } => match action {
            ProductAction::List { category, search } => {
                commands::products::list(&state, &category, &search).await?;
            }
            ProductAction::Add {
                name,
                category,
                price,
            } => commands::products::add(&state, &name, &category, &price).await?,
            ProductAction::Update {
                id,
                name,
                category,
                price,
            } => commands::products::update(&state, &id, &name, &category, &price).await?,
            ProductAction::Delete { id } => commands::products::delete(&state, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state).await?,
            CartAction::Add { id } => commands::cart::add(&state, &id).await?,
            CartAction::Remove { index } => commands::cart::remove(&state, index).await?,
            CartAction::Clear => commands::cart::clear(&state).await?,
        },
        Commands::Rate { action } => match action {
            RateAction::Show => commands::rate::show(&state).await?,
            RateAction::Set { rate } => commands::rate::set(&state, &rate).await?,
        },
    }
    Ok(())
}
