use std::io;

use clap::Args;
use vitrine::{
    filters::{PriceRange, SortKey},
    products::{Category, ProductId},
    storefront::Storefront,
};

use crate::cli::tables;

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Only these categories (repeatable)
    #[arg(long = "category", value_parser = parse_category)]
    categories: Vec<Category>,

    /// Only these materials, matched as substrings (repeatable)
    #[arg(long = "material")]
    materials: Vec<String>,

    /// Lowest price
    #[arg(long)]
    min: Option<u64>,

    /// Highest price
    #[arg(long)]
    max: Option<u64>,

    /// Search product names and descriptions
    #[arg(long, default_value = "")]
    search: String,

    /// newest, price-low, price-high or featured
    #[arg(long, default_value = "newest")]
    sort: SortKey,
}

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Product id
    id: String,
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse(raw).ok_or_else(|| format!("unknown category: {raw}"))
}

pub(crate) fn list(storefront: &Storefront, args: &ProductsArgs) -> Result<(), String> {
    let mut query = storefront.shop_query();
    let defaults = query.criteria.price_range;

    for category in &args.categories {
        query.criteria.toggle_category(category.clone());
    }

    for material in &args.materials {
        query.criteria.toggle_material(material);
    }

    query.criteria.price_range = PriceRange::new(
        args.min.unwrap_or(defaults.min),
        args.max.unwrap_or(defaults.max),
    );
    query.criteria.search.clone_from(&args.search);
    query.sort = args.sort;

    let products = storefront.browse(&query);

    tables::write_products(&mut io::stdout().lock(), &products, &storefront.wishlist)
        .map_err(|error| format!("failed to write output: {error}"))
}

pub(crate) fn show(storefront: &Storefront, args: &ProductArgs) -> Result<(), String> {
    let page = storefront
        .product_page(&ProductId::new(args.id.as_str()))
        .map_err(|error| error.to_string())?;

    tables::write_product(
        &mut io::stdout().lock(),
        page.product,
        &page.related,
        &storefront.wishlist,
    )
    .map_err(|error| format!("failed to write output: {error}"))
}
