//! Table rendering for command output.

use std::io;

use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use vitrine::{
    cart::Cart,
    orders::{Order, OrderSummary},
    pricing::format_price,
    products::Product,
    wishlist::Wishlist,
};

fn finish(builder: Builder, money_columns: &[usize]) -> Table {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    for &column in money_columns {
        table.modify(Columns::one(column), Alignment::right());
    }

    table
}

pub(crate) fn write_products(
    out: &mut impl io::Write,
    products: &[&Product],
    wishlist: &Wishlist,
) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products match these filters.");
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Category", "Material", "Price", ""]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.to_string(),
            product.material.clone().unwrap_or_default(),
            format_price(product.price),
            badges(product, wishlist),
        ]);
    }

    writeln!(out, "{}", finish(builder, &[4]))
}

fn badges(product: &Product, wishlist: &Wishlist) -> String {
    let mut badges = Vec::new();

    if product.is_featured() {
        badges.push("featured");
    }

    if wishlist.contains(&product.id) {
        badges.push("♥");
    }

    badges.join(" ")
}

pub(crate) fn write_product(
    out: &mut impl io::Write,
    product: &Product,
    related: &[&Product],
    wishlist: &Wishlist,
) -> io::Result<()> {
    writeln!(out, "{} ({})", product.name, product.id)?;
    writeln!(out, "{}", format_price(product.price))?;

    if let Some(material) = &product.material {
        writeln!(out, "Material: {material}")?;
    }

    writeln!(out, "Category: {}", product.category)?;

    if !product.description.is_empty() {
        writeln!(out, "\n{}", product.description)?;
    }

    if !related.is_empty() {
        writeln!(out, "\nYou may also like:")?;
        write_products(out, related, wishlist)?;
    }

    Ok(())
}

pub(crate) fn write_cart(out: &mut impl io::Write, cart: &Cart) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Price", "Qty", "Line total"]);

    for item in cart.items() {
        builder.push_record([
            item.id().to_string(),
            item.product().name.clone(),
            format_price(item.product().price),
            item.quantity().to_string(),
            format_price(item.line_total()),
        ]);
    }

    builder.push_record([
        String::new(),
        "Total".to_string(),
        String::new(),
        cart.count().to_string(),
        format_price(cart.total()),
    ]);

    writeln!(out, "{}", finish(builder, &[2, 3, 4]))
}

pub(crate) fn write_wishlist(out: &mut impl io::Write, wishlist: &Wishlist) -> io::Result<()> {
    if wishlist.is_empty() {
        return writeln!(out, "Your wishlist is empty.");
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Price"]);

    for product in wishlist.entries() {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            format_price(product.price),
        ]);
    }

    writeln!(out, "{}", finish(builder, &[2]))
}

pub(crate) fn write_order(out: &mut impl io::Write, order: &Order) -> io::Result<()> {
    writeln!(out, "Order {} placed", order.order_number)?;
    writeln!(out, "Payment: {} ({})", order.payment.method(), order.payment_status)?;
    writeln!(
        out,
        "Ship to: {}, {}, {} {}",
        order.customer.name, order.shipping.address, order.shipping.city, order.shipping.postal_code
    )?;
    writeln!(
        out,
        "Items: {}  Total: {}",
        order.item_count(),
        format_price(order.total)
    )
}

pub(crate) fn write_orders(
    out: &mut impl io::Write,
    orders: &[Order],
    summary: Option<&OrderSummary>,
) -> io::Result<()> {
    if orders.is_empty() {
        writeln!(out, "No orders yet.")?;
    } else {
        let mut builder = Builder::default();
        builder.push_record(["Order", "Placed", "Items", "Total", "Payment", "Status"]);

        for order in orders {
            builder.push_record([
                order.order_number.clone(),
                order.created_at.strftime("%Y-%m-%d %H:%M").to_string(),
                order.item_count().to_string(),
                format_price(order.total),
                order.payment.method().to_string(),
                order.payment_status.to_string(),
            ]);
        }

        writeln!(out, "{}", finish(builder, &[2, 3]))?;
    }

    if let Some(summary) = summary {
        writeln!(
            out,
            "{} orders, revenue {}, {} awaiting payment",
            summary.order_count,
            format_price(summary.revenue),
            summary.pending_payments
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;
    use vitrine::{
        catalog::{Catalog, StaticCatalog},
        storage::MemoryBlobStore,
    };

    use super::*;

    #[test]
    fn cart_table_shows_lines_and_total() -> TestResult {
        let catalog = StaticCatalog::bundled()?;
        let mut cart = Cart::load(Arc::new(MemoryBlobStore::new()));
        let necklace = catalog.list_all().first().ok_or("empty catalog")?;
        cart.add(necklace);
        cart.add(necklace);

        let mut out = Vec::new();
        write_cart(&mut out, &cart)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Diamond Teardrop Necklace"));
        assert!(rendered.contains("₹91,998"));

        Ok(())
    }

    #[test]
    fn empty_product_list_has_message() -> TestResult {
        let wishlist = Wishlist::load(Arc::new(MemoryBlobStore::new()));

        let mut out = Vec::new();
        write_products(&mut out, &[], &wishlist)?;

        assert_eq!(String::from_utf8(out)?, "No products match these filters.\n");

        Ok(())
    }
}
