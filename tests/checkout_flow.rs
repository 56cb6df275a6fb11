//! End-to-end checkout through the storefront facade.

use std::sync::Arc;

use testresult::TestResult;

use vitrine::{checkout::ContactDetails, prelude::*};

const COD_FORM_YAML: &str = include_str!("../fixtures/checkout/cash_on_delivery.yml");
const CARD_FORM_YAML: &str = include_str!("../fixtures/checkout/card.yml");

fn storefront() -> Result<Storefront, StorefrontInitError> {
    let mut config = StorefrontConfig::default();
    config.checkout.processing_delay_ms = 0;

    Storefront::with_bundled_catalog(Arc::new(MemoryBlobStore::new()), config)
}

fn cod_form() -> Result<CheckoutForm, serde_norway::Error> {
    serde_norway::from_str(COD_FORM_YAML)
}

#[tokio::test]
async fn cash_on_delivery_order_is_pending_and_clears_cart() -> TestResult {
    let mut storefront = storefront()?;
    storefront.add_to_cart(&ProductId::new("1"))?;
    storefront.add_to_cart(&ProductId::new("4"))?;

    let order = storefront.place_order(&cod_form()?).await?;

    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.total, 45999 + 67999);
    assert_eq!(order.customer.email, "asha.rao@example.com");
    assert_eq!(order.customer.phone, "+919876543210");
    assert_eq!(storefront.cart.count(), 0);
    assert_eq!(storefront.orders.orders(), &[order]);

    Ok(())
}

#[tokio::test]
async fn card_order_is_paid_and_keeps_only_last_four() -> TestResult {
    let mut storefront = storefront()?;
    storefront.add_to_cart(&ProductId::new("7"))?;

    let form: CheckoutForm = serde_norway::from_str(CARD_FORM_YAML)?;
    let order = storefront.place_order(&form).await?;

    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(
        order.payment,
        Payment::Card {
            holder: "Asha Rao".to_string(),
            last_four: "4242".to_string(),
            expiry: "08/29".to_string(),
        }
    );

    let stored = serde_json::to_string(&order.payment)?;
    assert!(!stored.contains("4111"));
    assert!(!stored.contains("321"));

    Ok(())
}

#[tokio::test]
async fn invalid_upi_id_leaves_cart_and_history_alone() -> TestResult {
    let mut storefront = storefront()?;
    storefront.add_to_cart(&ProductId::new("2"))?;

    let mut form = cod_form()?;
    form.payment = PaymentDetails::Upi {
        upi_id: "not-an-email-shape".to_string(),
    };

    let result = storefront.place_order(&form).await;

    let Err(CheckoutError::Invalid(errors)) = result else {
        return Err("expected validation failure".into());
    };

    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::UpiId]);
    assert!(storefront.orders.is_empty());
    assert_eq!(storefront.cart.count(), 1);
    assert_eq!(storefront.cart.total(), 89999);

    Ok(())
}

#[tokio::test]
async fn card_without_details_reports_all_card_fields() -> TestResult {
    let mut storefront = storefront()?;
    storefront.add_to_cart(&ProductId::new("3"))?;

    let mut form = cod_form()?;
    form.select_payment_method(PaymentMethod::Card);

    let Err(CheckoutError::Invalid(errors)) = storefront.place_order(&form).await else {
        return Err("expected validation failure".into());
    };

    for field in [
        Field::CardNumber,
        Field::CardName,
        Field::CardExpiry,
        Field::CardCvv,
    ] {
        assert!(errors.contains(field), "missing {field}");
    }

    Ok(())
}

#[tokio::test]
async fn every_invalid_contact_field_is_reported_together() -> TestResult {
    let mut storefront = storefront()?;
    storefront.add_to_cart(&ProductId::new("3"))?;

    let mut form = cod_form()?;
    form.contact = ContactDetails {
        name: "J0hn".to_string(),
        email: "john@".to_string(),
        phone: "12345".to_string(),
    };
    form.address.postal_code = "5600".to_string();

    let Err(CheckoutError::Invalid(errors)) = storefront.place_order(&form).await else {
        return Err("expected validation failure".into());
    };

    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        vec![Field::Name, Field::Email, Field::Phone, Field::PostalCode]
    );

    Ok(())
}

#[test]
fn checkout_is_refused_for_empty_cart() -> TestResult {
    let storefront = storefront()?;

    assert!(matches!(storefront.checkout(), Err(CheckoutError::EmptyCart)));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn processing_delay_elapses_before_order_is_placed() -> TestResult {
    let mut config = StorefrontConfig::default();
    config.checkout.processing_delay_ms = 2000;

    let mut storefront =
        Storefront::with_bundled_catalog(Arc::new(MemoryBlobStore::new()), config)?;
    storefront.add_to_cart(&ProductId::new("1"))?;

    let started = tokio::time::Instant::now();
    let order = storefront.place_order(&cod_form()?).await?;

    assert!(started.elapsed() >= std::time::Duration::from_secs(2));
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    Ok(())
}
