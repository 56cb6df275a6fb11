use std::io;

use clap::{Args, Subcommand};
use vitrine::{products::ProductId, storefront::Storefront};

use crate::cli::{report_warnings, tables};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    action: Option<CartAction>,
}

#[derive(Debug, Subcommand)]
enum CartAction {
    /// Show the cart
    Show,

    /// Add one unit of a product
    Add {
        /// Product id
        id: String,
    },

    /// Remove a product
    Remove {
        /// Product id
        id: String,
    },

    /// Set a product's quantity; zero or less removes it
    Set {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
pub(crate) struct WishlistCommand {
    #[command(subcommand)]
    action: Option<WishlistAction>,
}

#[derive(Debug, Subcommand)]
enum WishlistAction {
    /// Show the wishlist
    Show,

    /// Save a product
    Add {
        /// Product id
        id: String,
    },

    /// Remove a saved product
    Remove {
        /// Product id
        id: String,
    },
}

pub(crate) fn run_cart(storefront: &mut Storefront, command: CartCommand) -> Result<(), String> {
    match command.action.unwrap_or(CartAction::Show) {
        CartAction::Show => {}
        CartAction::Add { id } => storefront
            .add_to_cart(&ProductId::new(id))
            .map_err(|error| error.to_string())?,
        CartAction::Remove { id } => storefront.cart.remove(&ProductId::new(id)),
        CartAction::Set { id, quantity } => storefront
            .cart
            .update_quantity(&ProductId::new(id), quantity),
        CartAction::Clear => storefront.cart.clear(),
    }

    report_warnings(storefront);

    tables::write_cart(&mut io::stdout().lock(), &storefront.cart)
        .map_err(|error| format!("failed to write output: {error}"))
}

pub(crate) fn run_wishlist(
    storefront: &mut Storefront,
    command: WishlistCommand,
) -> Result<(), String> {
    match command.action.unwrap_or(WishlistAction::Show) {
        WishlistAction::Show => {}
        WishlistAction::Add { id } => {
            let id = ProductId::new(id);
            let product = storefront
                .catalog
                .find_by_id(&id)
                .map_err(|error| error.to_string())?;

            storefront.wishlist.add(product);
        }
        WishlistAction::Remove { id } => storefront.wishlist.remove(&ProductId::new(id)),
    }

    report_warnings(storefront);

    tables::write_wishlist(&mut io::stdout().lock(), &storefront.wishlist)
        .map_err(|error| format!("failed to write output: {error}"))
}
