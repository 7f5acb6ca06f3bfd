use anyhow::{Context, Result};
use cart::{CartConfig, CartStore};
use clap::{Parser, Subcommand};
use shared_types::{CartItem, NewCartItem};
use std::fmt::Write as _;
use std::path::PathBuf;
use storage_backend::StorageConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Inspect and edit the persisted shopping cart
#[derive(Debug, Parser)]
#[command(name = "cart-cli", version)]
struct Cli {
    /// Storage key namespace (defaults to CART_NAMESPACE or @GoMarketPlace)
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// Directory of the local storage backend (defaults to STORAGE_PATH or ./data)
    #[arg(long, global = true)]
    storage_path: Option<PathBuf>,

    /// Print the cart as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the cart
    List,
    /// Put one unit of a product in the cart
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        image_url: String,
        #[arg(long)]
        price: f64,
    },
    /// Add one unit of a product already in the cart
    Increment { id: String },
    /// Remove one unit of a product, dropping it at zero
    Decrement { id: String },
}

impl Cli {
    fn config(&self) -> Result<CartConfig> {
        let mut config = CartConfig::from_env().context("Invalid cart configuration")?;
        if let Some(namespace) = &self.namespace {
            config.namespace.clone_from(namespace);
        }
        if let Some(path) = &self.storage_path {
            config.storage = StorageConfig::local(path);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    debug!(?config, "Opening cart");

    let store = CartStore::from_config(&config).await?;

    let changed = match cli.command {
        Command::List => true,
        Command::Add {
            id,
            title,
            image_url,
            price,
        } => store.add_to_cart(NewCartItem::new(id, title, image_url, price)),
        Command::Increment { id } => store.increment(&id),
        Command::Decrement { id } => store.decrement(&id),
    };
    if !changed {
        eprintln!("No such item in cart");
    }
    store.flush().await;

    let products = store.products();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&*products)?);
    } else {
        print!("{}", render(&products));
    }

    Ok(())
}

fn render(items: &[CartItem]) -> String {
    if items.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{:>4} x {:<24} {:>10.2} {:>10.2}  [{}]",
            item.quantity,
            item.title,
            item.price,
            item.subtotal(),
            item.id
        );
    }
    let units: u64 = items.iter().map(|item| u64::from(item.quantity)).sum();
    let total: f64 = items.iter().map(CartItem::subtotal).sum();
    let _ = writeln!(out, "{units} item(s), total {total:.2}");
    out
}
