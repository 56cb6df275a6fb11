use std::{
    fs, io,
    path::{Path, PathBuf},
};

use clap::Args;
use vitrine::{
    checkout::{CheckoutError, CheckoutForm},
    storefront::Storefront,
};

use crate::cli::{report_warnings, tables};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Checkout form as YAML, using the form's field names
    #[arg(long)]
    form: PathBuf,
}

fn read_form(path: &Path) -> Result<CheckoutForm, String> {
    let yaml = fs::read_to_string(path)
        .map_err(|error| format!("failed to read {}: {error}", path.display()))?;

    serde_norway::from_str(&yaml).map_err(|error| format!("invalid checkout form: {error}"))
}

pub(crate) async fn run(storefront: &mut Storefront, args: &CheckoutArgs) -> Result<(), String> {
    let form = read_form(&args.form)?;

    let order = match storefront.place_order(&form).await {
        Ok(order) => order,
        Err(CheckoutError::Invalid(errors)) => {
            let mut message = String::from("please correct the following fields:");

            for (field, text) in errors.iter() {
                message.push_str(&format!("\n  {field}: {text}"));
            }

            return Err(message);
        }
        Err(error) => return Err(error.to_string()),
    };

    report_warnings(storefront);

    tables::write_order(&mut io::stdout().lock(), &order)
        .map_err(|error| format!("failed to write output: {error}"))
}

pub(crate) fn orders(storefront: &Storefront) -> Result<(), String> {
    let summary = storefront.order_summary().ok();

    tables::write_orders(
        &mut io::stdout().lock(),
        storefront.orders.orders(),
        summary.as_ref(),
    )
    .map_err(|error| format!("failed to write output: {error}"))
}
