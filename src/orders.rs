//! Orders
//!
//! Placed orders and the append-only history they are recorded in.

use std::sync::Arc;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cart::CartLineItem,
    checkout::{Customer, OrderDraft, Payment, PaymentMethod, ShippingAddress},
    session::Session,
    storage::{BlobStore, PersistedCollection, StorageError, StoreKey},
};

/// Settlement state of an order's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Collected on delivery
    Pending,

    /// Settled at checkout
    Paid,
}

impl PaymentStatus {
    /// Status an order starts with for `method`.
    pub fn for_method(method: PaymentMethod) -> Self {
        if method.settles_on_delivery() {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Paid
        }
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed order. Never changed once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique id
    pub id: Uuid,

    /// Shopper-facing number, `ORD-<unix millis>-<last 8 hex digits of id>`
    pub order_number: String,

    /// Contact details
    pub customer: Customer,

    /// Shipping address
    pub shipping: ShippingAddress,

    /// Payment details
    pub payment: Payment,

    /// Cart lines at submission time
    pub items: Vec<CartLineItem>,

    /// Cart total at submission time
    pub total: u64,

    /// Payment settlement state
    pub payment_status: PaymentStatus,

    /// Creation time
    pub created_at: Timestamp,
}

impl Order {
    /// Build an order from a validated draft and a cart snapshot.
    pub fn place(draft: OrderDraft, items: Vec<CartLineItem>, total: u64, now: Timestamp) -> Self {
        let payment_status = PaymentStatus::for_method(draft.payment.method());

        let id = Uuid::now_v7();
        let &[.., a, b, c, d] = id.as_bytes();

        Self {
            id,
            order_number: format!("ORD-{}-{a:02X}{b:02X}{c:02X}{d:02X}", now.as_millisecond()),
            customer: draft.customer,
            shipping: draft.shipping,
            payment: draft.payment,
            items,
            total,
            payment_status,
            created_at: now,
        }
    }

    /// Number of units ordered.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }
}

/// Reading the order summary was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// Nobody is signed in.
    #[error("sign in to continue")]
    NotSignedIn,

    /// The signed-in user is not an administrator.
    #[error("administrator access required")]
    NotAdmin,
}

/// Totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Number of orders
    pub order_count: usize,

    /// Sum of order totals
    pub revenue: u64,

    /// Orders awaiting payment on delivery
    pub pending_payments: usize,
}

/// Append-only order history under the `order-history` key.
#[derive(Debug)]
pub struct OrderHistory {
    orders: Vec<Order>,
    collection: PersistedCollection<Order>,
}

impl OrderHistory {
    /// Hydrate the history from the store, or start empty.
    pub fn load(store: Arc<dyn BlobStore>) -> Self {
        let collection = PersistedCollection::new(store, StoreKey::OrderHistory);

        Self {
            orders: collection.load(),
            collection,
        }
    }

    /// Record `order`.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the history could not be written. The
    /// order is not kept in that case.
    pub fn append(&mut self, order: Order) -> Result<(), StorageError> {
        let number = order.order_number.clone();

        self.orders.push(order);

        if let Err(error) = self.collection.save(&self.orders) {
            self.orders.pop();

            warn!(order = %number, %error, "failed to record order");

            return Err(error);
        }

        info!(order = %number, "order recorded");

        Ok(())
    }

    /// Orders, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Look up an order by its shopper-facing number.
    pub fn find(&self, order_number: &str) -> Option<&Order> {
        self.orders
            .iter()
            .find(|order| order.order_number == order_number)
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if no orders were placed.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Dashboard totals.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError`] unless `session` belongs to an administrator.
    pub fn summary(&self, session: &Session) -> Result<OrderSummary, AccessError> {
        if !session.is_authenticated() {
            return Err(AccessError::NotSignedIn);
        }

        if !session.is_admin() {
            return Err(AccessError::NotAdmin);
        }

        Ok(self
            .orders
            .iter()
            .fold(OrderSummary::default(), |mut summary, order| {
                summary.order_count += 1;
                summary.revenue = summary.revenue.saturating_add(order.total);

                if order.payment_status == PaymentStatus::Pending {
                    summary.pending_payments += 1;
                }

                summary
            }))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        products::{Category, Product, ProductId, Sourcing},
        session::{Role, SessionUser},
        storage::MemoryBlobStore,
    };

    use super::*;

    fn draft(payment: Payment) -> OrderDraft {
        OrderDraft {
            customer: Customer {
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                phone: "+919876543210".to_string(),
            },
            shipping: ShippingAddress {
                address: "12 MG Road, Indiranagar".to_string(),
                city: "Bengaluru".to_string(),
                postal_code: "560038".to_string(),
            },
            payment,
        }
    }

    fn line(price: u64, quantity: u32) -> CartLineItem {
        CartLineItem::new(
            Product {
                id: ProductId::new("1"),
                name: "Ring".to_string(),
                price,
                category: Category::Rings,
                image: String::new(),
                description: String::new(),
                featured: None,
                material: None,
                sourcing: Sourcing::default(),
            },
            quantity,
        )
    }

    fn session(store: Arc<dyn BlobStore>, roles: &[Role]) -> Result<Session, StorageError> {
        let mut session = Session::anonymous(store);

        session.establish(SessionUser {
            id: "u".to_string(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            phone: None,
            roles: roles.iter().copied().collect(),
            signed_in_at: Timestamp::UNIX_EPOCH,
        })?;

        Ok(session)
    }

    #[test]
    fn place_derives_number_and_status() -> TestResult {
        let now = Timestamp::from_millisecond(1_767_225_600_000)?;

        let cod = Order::place(draft(Payment::CashOnDelivery), vec![line(100, 2)], 200, now);
        let upi = Order::place(
            draft(Payment::Upi {
                upi_id: "asha@okbank".to_string(),
            }),
            vec![],
            0,
            now,
        );

        assert!(cod.order_number.starts_with("ORD-1767225600000-"));
        assert_eq!(cod.order_number.len(), "ORD-1767225600000-".len() + 8);
        assert_ne!(cod.order_number, upi.order_number);
        assert_eq!(cod.payment_status, PaymentStatus::Pending);
        assert_eq!(cod.item_count(), 2);
        assert_eq!(upi.payment_status, PaymentStatus::Paid);
        assert_ne!(cod.id, upi.id);

        Ok(())
    }

    #[test]
    fn orders_in_the_same_millisecond_are_found_separately() -> TestResult {
        let mut history = OrderHistory::load(Arc::new(MemoryBlobStore::new()));

        let first = Order::place(
            draft(Payment::CashOnDelivery),
            vec![line(100, 1)],
            100,
            Timestamp::UNIX_EPOCH,
        );
        let second = Order::place(
            draft(Payment::CashOnDelivery),
            vec![line(200, 1)],
            200,
            Timestamp::UNIX_EPOCH,
        );
        history.append(first.clone())?;
        history.append(second.clone())?;

        assert_ne!(first.order_number, second.order_number);
        assert_eq!(history.find(&first.order_number), Some(&first));
        assert_eq!(history.find(&second.order_number), Some(&second));

        Ok(())
    }

    #[test]
    fn append_persists_and_reloads() -> TestResult {
        let store = Arc::new(MemoryBlobStore::new());
        let mut history = OrderHistory::load(store.clone());

        let order = Order::place(
            draft(Payment::CashOnDelivery),
            vec![line(45999, 1)],
            45999,
            Timestamp::UNIX_EPOCH,
        );
        history.append(order.clone())?;

        let reloaded = OrderHistory::load(store);

        assert_eq!(reloaded.orders(), std::slice::from_ref(&order));
        assert_eq!(reloaded.find(&order.order_number), Some(&order));
        assert!(reloaded.find("ORD-0").is_none());

        Ok(())
    }

    #[test]
    fn failed_append_rolls_back() {
        let store = Arc::new(MemoryBlobStore::with_quota(16));
        let mut history = OrderHistory::load(store);

        let order = Order::place(
            draft(Payment::CashOnDelivery),
            vec![line(45999, 1)],
            45999,
            Timestamp::UNIX_EPOCH,
        );

        assert!(history.append(order).is_err());
        assert!(history.is_empty());
    }

    #[test]
    fn summary_requires_admin() -> TestResult {
        let store: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        let history = OrderHistory::load(store.clone());

        let anonymous = Session::anonymous(store.clone());
        let customer = session(store.clone(), &[Role::Customer])?;

        assert_eq!(history.summary(&anonymous), Err(AccessError::NotSignedIn));
        assert_eq!(history.summary(&customer), Err(AccessError::NotAdmin));

        Ok(())
    }

    #[test]
    fn summary_totals_orders() -> TestResult {
        let store: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        let mut history = OrderHistory::load(store.clone());

        history.append(Order::place(
            draft(Payment::CashOnDelivery),
            vec![line(100, 1)],
            100,
            Timestamp::UNIX_EPOCH,
        ))?;
        history.append(Order::place(
            draft(Payment::NetBanking {
                bank: "SBI".to_string(),
            }),
            vec![line(250, 2)],
            500,
            Timestamp::UNIX_EPOCH,
        ))?;

        let admin = session(store, &[Role::Admin])?;

        assert_eq!(
            history.summary(&admin)?,
            OrderSummary {
                order_count: 2,
                revenue: 600,
                pending_payments: 1,
            }
        );

        Ok(())
    }
}
