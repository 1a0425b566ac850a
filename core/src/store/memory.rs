// einrab_core/src/store/memory.rs

//! Process-local [`OrderRepository`], backing the lifecycle and HTTP tests.

use super::{stock_after_transition, OrderRepository};
use crate::error::{OrderError, OrderResult};
use crate::models::{AdminOrderRow, Contact, NewOrder, Order, Product, StatusTransition};
use crate::status::OrderStatus;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
struct StoredUser {
  contact: Contact,
  is_admin: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
  products: BTreeMap<i64, Product>,
  users: BTreeMap<i64, StoredUser>,
  orders: BTreeMap<i64, Order>,
  next_order_id: i64,
}

/// All state sits behind one mutex, so every trait call, including the
/// check-then-write status transition, is a single critical section.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
  state: Mutex<MemoryState>,
}

impl InMemoryOrderRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts or replaces a product.
  pub fn upsert_product(&self, product: Product) {
    self.state.lock().products.insert(product.id, product);
  }

  /// Inserts or replaces a user.
  pub fn upsert_user(&self, contact: Contact, is_admin: bool) {
    self
      .state
      .lock()
      .users
      .insert(contact.user_id, StoredUser { contact, is_admin });
  }

  pub fn product(&self, product_id: i64) -> Option<Product> {
    self.state.lock().products.get(&product_id).cloned()
  }

  pub fn order(&self, order_id: i64) -> Option<Order> {
    self.state.lock().orders.get(&order_id).cloned()
  }

  pub fn order_count(&self) -> usize {
    self.state.lock().orders.len()
  }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
  async fn find_product(&self, product_id: i64) -> OrderResult<Option<Product>> {
    Ok(self.product(product_id))
  }

  async fn insert_order(&self, new_order: NewOrder) -> OrderResult<Order> {
    let mut state = self.state.lock();
    state.next_order_id += 1;
    let order = Order {
      id: state.next_order_id,
      buyer_id: new_order.buyer_id,
      product_id: new_order.product_id,
      quantity: new_order.quantity,
      unit_price: new_order.unit_price,
      status: new_order.status,
      created_at: new_order.created_at,
    };
    state.orders.insert(order.id, order.clone());
    debug!(order_id = order.id, "Order inserted in memory store.");
    Ok(order)
  }

  async fn find_order_for_buyer(&self, order_id: i64, buyer_id: i64) -> OrderResult<Option<Order>> {
    Ok(
      self
        .state
        .lock()
        .orders
        .get(&order_id)
        .filter(|order| order.buyer_id == buyer_id)
        .cloned(),
    )
  }

  async fn list_orders_for_buyer(&self, buyer_id: i64) -> OrderResult<Vec<Order>> {
    Ok(
      self
        .state
        .lock()
        .orders
        .values()
        .filter(|order| order.buyer_id == buyer_id)
        .cloned()
        .collect(),
    )
  }

  async fn list_all_orders(&self) -> OrderResult<Vec<AdminOrderRow>> {
    let state = self.state.lock();
    let mut rows: Vec<AdminOrderRow> = state
      .orders
      .values()
      .map(|order| AdminOrderRow {
        order: order.clone(),
        buyer_email: state
          .users
          .get(&order.buyer_id)
          .map(|user| user.contact.email.clone())
          .unwrap_or_default(),
        product_name: state
          .products
          .get(&order.product_id)
          .map(|product| product.name.clone())
          .unwrap_or_default(),
      })
      .collect();
    rows.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at).then(b.order.id.cmp(&a.order.id)));
    Ok(rows)
  }

  #[instrument(name = "memory_store::apply_status_transition", skip(self), err(Display))]
  async fn apply_status_transition(&self, order_id: i64, target: OrderStatus) -> OrderResult<StatusTransition> {
    let mut guard = self.state.lock();
    let state = &mut *guard;

    let order = state
      .orders
      .get_mut(&order_id)
      .ok_or_else(|| OrderError::NotFound(format!("Order {} not found.", order_id)))?;
    let buyer = state
      .users
      .get(&order.buyer_id)
      .map(|user| user.contact.clone())
      .ok_or_else(|| OrderError::NotFound(format!("Buyer {} of order {} not found.", order.buyer_id, order_id)))?;
    let product = state
      .products
      .get_mut(&order.product_id)
      .ok_or_else(|| OrderError::NotFound(format!("Product {} of order {} not found.", order.product_id, order_id)))?;

    let remaining_stock = stock_after_transition(product.id, target, product.stock, order.quantity)?;
    if let Some(remaining) = remaining_stock {
      product.stock = remaining;
    }
    let previous_status = order.status;
    order.status = target;

    Ok(StatusTransition {
      order: order.clone(),
      previous_status,
      buyer,
      remaining_stock,
    })
  }

  async fn admin_contacts(&self) -> OrderResult<Vec<Contact>> {
    Ok(
      self
        .state
        .lock()
        .users
        .values()
        .filter(|user| user.is_admin)
        .map(|user| user.contact.clone())
        .collect(),
    )
  }
}
