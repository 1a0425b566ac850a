// einrab_core/src/store/mod.rs

//! Storage seams for the order lifecycle.
//!
//! Confirmed orders, products and users live behind [`OrderRepository`];
//! orders awaiting payment live in the file-backed [`StagingStore`].

pub mod memory;
pub mod staging;

pub use memory::InMemoryOrderRepository;
pub use staging::StagingStore;

use crate::error::{OrderError, OrderResult};
use crate::models::{AdminOrderRow, Contact, NewOrder, Order, Product, StatusTransition};
use crate::status::OrderStatus;
use async_trait::async_trait;

/// Relational store operations needed by the lifecycle manager.
///
/// Implementations must apply [`OrderRepository::apply_status_transition`]
/// atomically: the stock check, the stock write and the status write either
/// all happen or none do, and no concurrent writer may slip between them.
#[async_trait]
pub trait OrderRepository: Send + Sync {
  async fn find_product(&self, product_id: i64) -> OrderResult<Option<Product>>;

  async fn insert_order(&self, order: NewOrder) -> OrderResult<Order>;

  /// An order, only if it belongs to `buyer_id`.
  async fn find_order_for_buyer(&self, order_id: i64, buyer_id: i64) -> OrderResult<Option<Order>>;

  async fn list_orders_for_buyer(&self, buyer_id: i64) -> OrderResult<Vec<Order>>;

  /// Every order, newest first, joined with buyer email and product name.
  async fn list_all_orders(&self) -> OrderResult<Vec<AdminOrderRow>>;

  /// Moves `order_id` to `target`. When `target` is `Shipped` the product
  /// stock is decremented by the order quantity, or the whole transition is
  /// rejected with [`OrderError::InsufficientStock`].
  async fn apply_status_transition(&self, order_id: i64, target: OrderStatus) -> OrderResult<StatusTransition>;

  /// Every user holding the admin role.
  async fn admin_contacts(&self) -> OrderResult<Vec<Contact>>;
}

/// Stock left after moving an order of `quantity` units to `target`.
///
/// `Ok(None)` means the transition does not touch stock. Only entering
/// `Shipped` is gated; every other pair of states is allowed.
pub fn stock_after_transition(
  product_id: i64,
  target: OrderStatus,
  stock: i32,
  quantity: i32,
) -> OrderResult<Option<i32>> {
  if target != OrderStatus::Shipped {
    return Ok(None);
  }
  let remaining = stock - quantity;
  if remaining < 0 {
    return Err(OrderError::InsufficientStock {
      product_id,
      requested: quantity,
      available: stock,
    });
  }
  Ok(Some(remaining))
}
