// einrab_core/src/models.rs

//! Data carried through the order lifecycle.
//!
//! Wire names follow the portal's French JSON vocabulary (`produit_id`,
//! `quantite`, `prix_unitaire`, ...); Rust field names stay in English.

use crate::status::OrderStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Buyer-submitted order fields, as received. Every field is optional here so
/// that a missing one is reported as a validation failure, not a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderDraft {
  #[serde(rename = "produit_id")]
  pub product_id: Option<i64>,
  #[serde(rename = "quantite")]
  pub quantity: Option<i32>,
  #[serde(rename = "prix_unitaire")]
  pub unit_price: Option<Decimal>,
}

/// An order placed at checkout and awaiting payment confirmation. Lives in
/// the staging file, never in the relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedOrder {
  pub id: String,
  #[serde(rename = "utilisateur_id")]
  pub buyer_id: i64,
  #[serde(rename = "produit_id")]
  pub product_id: i64,
  #[serde(rename = "nom_produit")]
  pub product_name: String,
  #[serde(rename = "quantite")]
  pub quantity: i32,
  #[serde(rename = "prix_unitaire")]
  pub unit_price: Decimal,
  #[serde(rename = "date_creation")]
  pub created_at: DateTime<Utc>,
}

/// A confirmed order recorded in the relational store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
  pub id: i64,
  #[serde(rename = "utilisateur_id")]
  pub buyer_id: i64,
  #[serde(rename = "produit_id")]
  pub product_id: i64,
  #[serde(rename = "quantite")]
  pub quantity: i32,
  #[serde(rename = "prix_unitaire")]
  pub unit_price: Decimal,
  #[serde(rename = "statut")]
  pub status: OrderStatus,
  #[serde(rename = "date_creation")]
  pub created_at: DateTime<Utc>,
}

/// Insert payload for a confirmed order; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub buyer_id: i64,
  pub product_id: i64,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}

impl NewOrder {
  /// Promotes a staged order; confirmed orders enter the store as `paid`.
  pub fn confirmed_from(staged: &StagedOrder) -> Self {
    Self {
      buyer_id: staged.buyer_id,
      product_id: staged.product_id,
      quantity: staged.quantity,
      unit_price: staged.unit_price,
      status: OrderStatus::Paid,
      created_at: staged.created_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
  pub id: i64,
  #[serde(rename = "nom")]
  pub name: String,
  pub stock: i32,
  #[serde(rename = "prix_unitaire")]
  pub unit_price: Decimal,
}

/// Where to reach a user by mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
  pub user_id: i64,
  pub email: String,
  #[serde(rename = "telephone")]
  pub phone: Option<String>,
}

/// Identifier of an order as shown to a buyer: staged orders carry an opaque
/// token, persisted ones a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OrderKey {
  Staged(String),
  Persisted(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSource {
  Staged,
  Persisted,
}

/// Buyer-facing projection over staged and persisted orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
  pub id: OrderKey,
  pub source: OrderSource,
  #[serde(rename = "utilisateur_id")]
  pub buyer_id: i64,
  #[serde(rename = "produit_id")]
  pub product_id: i64,
  #[serde(rename = "nom_produit", skip_serializing_if = "Option::is_none")]
  pub product_name: Option<String>,
  #[serde(rename = "quantite")]
  pub quantity: i32,
  #[serde(rename = "prix_unitaire")]
  pub unit_price: Decimal,
  #[serde(rename = "statut")]
  pub status: OrderStatus,
  #[serde(rename = "date_creation")]
  pub created_at: DateTime<Utc>,
}

impl From<StagedOrder> for OrderView {
  fn from(staged: StagedOrder) -> Self {
    Self {
      id: OrderKey::Staged(staged.id),
      source: OrderSource::Staged,
      buyer_id: staged.buyer_id,
      product_id: staged.product_id,
      product_name: Some(staged.product_name),
      quantity: staged.quantity,
      unit_price: staged.unit_price,
      // Staged orders are always reported as pending.
      status: OrderStatus::Pending,
      created_at: staged.created_at,
    }
  }
}

impl From<Order> for OrderView {
  fn from(order: Order) -> Self {
    Self {
      id: OrderKey::Persisted(order.id),
      source: OrderSource::Persisted,
      buyer_id: order.buyer_id,
      product_id: order.product_id,
      product_name: None,
      quantity: order.quantity,
      unit_price: order.unit_price,
      status: order.status,
      created_at: order.created_at,
    }
  }
}

/// Back-office listing row: an order joined with its buyer and product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminOrderRow {
  #[serde(flatten)]
  pub order: Order,
  #[serde(rename = "email_client")]
  pub buyer_email: String,
  #[serde(rename = "nom_produit")]
  pub product_name: String,
}

/// Outcome of an applied status transition.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
  pub order: Order,
  pub previous_status: OrderStatus,
  pub buyer: Contact,
  /// Product stock after the transition; set only when stock was decremented.
  pub remaining_stock: Option<i32>,
}
