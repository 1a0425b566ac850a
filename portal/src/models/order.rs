// einrab_portal/src/models/order.rs

use chrono::{DateTime, Utc};
use einrab_core::{AdminOrderRow, Contact, Order, OrderResult, OrderStatus, StatusVocabulary};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A `commandes` row; `statut` holds the stored vocabulary.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
  pub id: i64,
  pub utilisateur_id: i64,
  pub produit_id: i64,
  pub quantite: i32,
  pub prix_unitaire: Decimal,
  pub statut: String,
  pub date_creation: DateTime<Utc>,
}

impl OrderRow {
  pub fn into_order(self) -> OrderResult<Order> {
    Ok(Order {
      id: self.id,
      buyer_id: self.utilisateur_id,
      product_id: self.produit_id,
      quantity: self.quantite,
      unit_price: self.prix_unitaire,
      status: OrderStatus::from_stored(&self.statut)?,
      created_at: self.date_creation,
    })
  }
}

/// An order locked for a status change, with its buyer contact and the
/// current stock of its product.
#[derive(Debug, Clone, FromRow)]
pub struct TransitionRow {
  #[sqlx(flatten)]
  pub order: OrderRow,
  pub email: String,
  pub telephone: Option<String>,
  pub stock: i32,
}

impl TransitionRow {
  pub fn buyer(&self) -> Contact {
    Contact {
      user_id: self.order.utilisateur_id,
      email: self.email.clone(),
      phone: self.telephone.clone(),
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct AdminOrderRecord {
  #[sqlx(flatten)]
  pub order: OrderRow,
  pub email: String,
  pub nom: String,
}

impl AdminOrderRecord {
  pub fn into_row(self) -> OrderResult<AdminOrderRow> {
    Ok(AdminOrderRow {
      order: self.order.into_order()?,
      buyer_email: self.email,
      product_name: self.nom,
    })
  }
}
