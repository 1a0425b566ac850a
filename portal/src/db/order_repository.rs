// einrab_portal/src/db/order_repository.rs

use super::storage_error;
use crate::models::{AdminOrderRecord, ContactRow, OrderRow, ProductRow, TransitionRow};
use async_trait::async_trait;
use einrab_core::store::stock_after_transition;
use einrab_core::{
  AdminOrderRow, Contact, NewOrder, Order, OrderError, OrderRepository, OrderResult, OrderStatus, Product,
  StatusTransition, StatusVocabulary,
};
use sqlx::PgPool;
use tracing::{debug, instrument};

const ORDER_COLUMNS: &str = "c.id, c.utilisateur_id, c.produit_id, c.quantite, c.prix_unitaire, c.statut, c.date_creation";

#[derive(Debug, Clone)]
pub struct PgOrderRepository {
  pool: PgPool,
}

impl PgOrderRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
  async fn find_product(&self, product_id: i64) -> OrderResult<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as("SELECT id, nom, stock, prix_unitaire FROM produits WHERE id = $1")
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(storage_error)?;
    Ok(row.map(Product::from))
  }

  #[instrument(name = "pg_store::insert_order", skip(self, order), fields(buyer_id = order.buyer_id), err(Display))]
  async fn insert_order(&self, order: NewOrder) -> OrderResult<Order> {
    let row: OrderRow = sqlx::query_as(
      "INSERT INTO commandes AS c (utilisateur_id, produit_id, quantite, prix_unitaire, statut, date_creation) \
       VALUES ($1, $2, $3, $4, $5, $6) \
       RETURNING c.id, c.utilisateur_id, c.produit_id, c.quantite, c.prix_unitaire, c.statut, c.date_creation",
    )
    .bind(order.buyer_id)
    .bind(order.product_id)
    .bind(order.quantity)
    .bind(order.unit_price)
    .bind(order.status.as_stored())
    .bind(order.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(storage_error)?;
    row.into_order()
  }

  async fn find_order_for_buyer(&self, order_id: i64, buyer_id: i64) -> OrderResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
      "SELECT {} FROM commandes c WHERE c.id = $1 AND c.utilisateur_id = $2",
      ORDER_COLUMNS
    ))
    .bind(order_id)
    .bind(buyer_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(storage_error)?;
    row.map(OrderRow::into_order).transpose()
  }

  async fn list_orders_for_buyer(&self, buyer_id: i64) -> OrderResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
      "SELECT {} FROM commandes c WHERE c.utilisateur_id = $1 ORDER BY c.date_creation DESC, c.id DESC",
      ORDER_COLUMNS
    ))
    .bind(buyer_id)
    .fetch_all(&self.pool)
    .await
    .map_err(storage_error)?;
    rows.into_iter().map(OrderRow::into_order).collect()
  }

  async fn list_all_orders(&self) -> OrderResult<Vec<AdminOrderRow>> {
    let rows: Vec<AdminOrderRecord> = sqlx::query_as(&format!(
      "SELECT {}, u.email, p.nom FROM commandes c \
       JOIN utilisateurs u ON u.id = c.utilisateur_id \
       JOIN produits p ON p.id = c.produit_id \
       ORDER BY c.date_creation DESC, c.id DESC",
      ORDER_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await
    .map_err(storage_error)?;
    rows.into_iter().map(AdminOrderRecord::into_row).collect()
  }

  #[instrument(name = "pg_store::apply_status_transition", skip(self), err(Display))]
  async fn apply_status_transition(&self, order_id: i64, target: OrderStatus) -> OrderResult<StatusTransition> {
    let mut tx = self.pool.begin().await.map_err(storage_error)?;

    // Lock the order and its product until commit.
    let row: Option<TransitionRow> = sqlx::query_as(&format!(
      "SELECT {}, u.email, u.telephone, p.stock FROM commandes c \
       JOIN utilisateurs u ON u.id = c.utilisateur_id \
       JOIN produits p ON p.id = c.produit_id \
       WHERE c.id = $1 \
       FOR UPDATE OF c, p",
      ORDER_COLUMNS
    ))
    .bind(order_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(storage_error)?;
    let row = row.ok_or_else(|| OrderError::NotFound(format!("Order {} not found.", order_id)))?;

    let buyer = row.buyer();
    let stock = row.stock;
    let mut order = row.order.into_order()?;
    let previous_status = order.status;

    // Dropping `tx` on an early return rolls everything back.
    let remaining_stock = stock_after_transition(order.product_id, target, stock, order.quantity)?;
    if let Some(remaining) = remaining_stock {
      sqlx::query("UPDATE produits SET stock = $1 WHERE id = $2")
        .bind(remaining)
        .bind(order.product_id)
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;
    }
    sqlx::query("UPDATE commandes SET statut = $1 WHERE id = $2")
      .bind(target.as_stored())
      .bind(order_id)
      .execute(&mut *tx)
      .await
      .map_err(storage_error)?;

    tx.commit().await.map_err(storage_error)?;
    debug!(order_id, ?remaining_stock, "Status transition committed.");

    order.status = target;
    Ok(StatusTransition {
      order,
      previous_status,
      buyer,
      remaining_stock,
    })
  }

  async fn admin_contacts(&self) -> OrderResult<Vec<Contact>> {
    let rows: Vec<ContactRow> = sqlx::query_as("SELECT id, email, telephone FROM utilisateurs WHERE role = 'admin'")
      .fetch_all(&self.pool)
      .await
      .map_err(storage_error)?;
    Ok(rows.into_iter().map(Contact::from).collect())
  }
}
