use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use vitrine::{
    config::StorefrontConfig,
    storage::FileBlobStore,
    storefront::Storefront,
};

use crate::cli::logging::LoggingConfig;

mod cart;
mod checkout;
mod logging;
mod products;
mod tables;

#[derive(Debug, Parser)]
#[command(name = "vitrine", about = "Vitrine storefront CLI", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding the cart, wishlist, orders and session
    #[arg(long, env = "VITRINE_DATA_DIR", default_value = ".vitrine", global = true)]
    data_dir: PathBuf,

    /// Storefront configuration file (YAML)
    #[arg(long, env = "VITRINE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    Products(products::ProductsArgs),

    /// Show one product with related products
    Product(products::ProductArgs),

    /// Show or change the cart
    Cart(cart::CartCommand),

    /// Show or change the wishlist
    Wishlist(cart::WishlistCommand),

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),

    /// List placed orders
    Orders,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let mut storefront = self.open()?;

        match self.command {
            Commands::Products(args) => products::list(&storefront, &args),
            Commands::Product(args) => products::show(&storefront, &args),
            Commands::Cart(command) => cart::run_cart(&mut storefront, command),
            Commands::Wishlist(command) => cart::run_wishlist(&mut storefront, command),
            Commands::Checkout(args) => checkout::run(&mut storefront, &args).await,
            Commands::Orders => checkout::orders(&storefront),
        }
    }

    fn open(&self) -> Result<Storefront, String> {
        let config = match &self.config {
            Some(path) => StorefrontConfig::load(path).map_err(|error| error.to_string())?,
            None => StorefrontConfig::default(),
        };

        let store = FileBlobStore::open(&self.data_dir).map_err(|error| {
            format!(
                "failed to open data directory {}: {error}",
                self.data_dir.display()
            )
        })?;

        Storefront::with_bundled_catalog(Arc::new(store), config)
            .map_err(|error| format!("failed to open storefront: {error}"))
    }
}

/// Log any persistence warnings the engines collected.
fn report_warnings(storefront: &mut Storefront) {
    if let Some(error) = storefront.cart.take_warning() {
        tracing::warn!(%error, "cart changes were not saved");
    }

    if let Some(error) = storefront.wishlist.take_warning() {
        tracing::warn!(%error, "wishlist changes were not saved");
    }
}
