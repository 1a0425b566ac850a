// einrab_core/src/lifecycle.rs

//! The order lifecycle manager.
//!
//! Buyer operations: create a staged order, list own orders, fetch one,
//! confirm a staged order. Admin operations: list every order, list staged
//! orders, move an order to a new status. This is the only component that
//! changes product stock as a consequence of an order.

use crate::error::{OrderError, OrderResult};
use crate::models::{AdminOrderRow, NewOrder, OrderDraft, OrderView, StagedOrder};
use crate::notify::{Notification, NotificationDispatcher};
use crate::status::{OrderStatus, StatusVocabulary};
use crate::store::{OrderRepository, StagingStore};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct OrderLifecycle {
  repository: Arc<dyn OrderRepository>,
  staging: Arc<StagingStore>,
  notifier: Arc<NotificationDispatcher>,
}

impl std::fmt::Debug for OrderLifecycle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OrderLifecycle")
      .field("staging", &self.staging)
      .field("notifier", &self.notifier)
      .finish_non_exhaustive()
  }
}

impl OrderLifecycle {
  pub fn new(
    repository: Arc<dyn OrderRepository>,
    staging: Arc<StagingStore>,
    notifier: Arc<NotificationDispatcher>,
  ) -> Self {
    Self {
      repository,
      staging,
      notifier,
    }
  }

  pub fn notifier(&self) -> &Arc<NotificationDispatcher> {
    &self.notifier
  }

  /// Stages a new order for `buyer_id` and tells the admins about it.
  ///
  /// The staged order is returned as soon as it is written; admin mail goes
  /// out in the background.
  #[instrument(name = "lifecycle::create_order", skip(self, draft), err(Display))]
  pub async fn create_order(&self, buyer_id: i64, draft: OrderDraft) -> OrderResult<StagedOrder> {
    let (product_id, quantity, unit_price) = validate_draft(&draft)?;

    let product = self
      .repository
      .find_product(product_id)
      .await?
      .ok_or_else(|| OrderError::NotFound(format!("Product {} not found.", product_id)))?;

    let staged = StagedOrder {
      id: Uuid::new_v4().to_string(),
      buyer_id,
      product_id,
      product_name: product.name,
      quantity,
      unit_price,
      created_at: Utc::now(),
    };
    self.staging.save(staged.clone()).await?;
    info!(staged_id = %staged.id, product_id, quantity, "Order staged.");

    match self.repository.admin_contacts().await {
      Ok(admins) if !admins.is_empty() => self.notifier.dispatch(Notification::NewOrder {
        staged: staged.clone(),
        admins,
      }),
      Ok(_) => warn!(staged_id = %staged.id, "No admin to notify about new order."),
      Err(e) => warn!(staged_id = %staged.id, error = %e, "Could not load admin contacts, new order not notified."),
    }

    Ok(staged)
  }

  /// Staged orders (reported as pending) followed by persisted orders.
  /// No chronological interleaving between the two sets.
  #[instrument(name = "lifecycle::list_orders_for_user", skip(self), err(Display))]
  pub async fn list_orders_for_user(&self, buyer_id: i64) -> OrderResult<Vec<OrderView>> {
    let staged = self.staging.list_for_user(buyer_id).await;
    let persisted = self.repository.list_orders_for_buyer(buyer_id).await?;
    Ok(
      staged
        .into_iter()
        .map(OrderView::from)
        .chain(persisted.into_iter().map(OrderView::from))
        .collect(),
    )
  }

  #[instrument(name = "lifecycle::get_order", skip(self), err(Display))]
  pub async fn get_order(&self, order_id: i64, buyer_id: i64) -> OrderResult<OrderView> {
    self
      .repository
      .find_order_for_buyer(order_id, buyer_id)
      .await?
      .map(OrderView::from)
      .ok_or_else(|| OrderError::NotFound(format!("Order {} not found.", order_id)))
  }

  /// Moves a staged order into the persistent store as `paid`.
  ///
  /// At most once per staged order: the staged copy is claimed before the
  /// insert, so a repeated or concurrent confirmation gets `NotFound`. If the
  /// insert fails the staged copy is put back.
  #[instrument(name = "lifecycle::confirm_order", skip(self), err(Display))]
  pub async fn confirm_order(&self, staged_id: &str, buyer_id: i64) -> OrderResult<OrderView> {
    let staged = self
      .staging
      .claim(staged_id, buyer_id)
      .await?
      .ok_or_else(|| OrderError::NotFound(format!("Pending order {} not found.", staged_id)))?;

    match self.repository.insert_order(NewOrder::confirmed_from(&staged)).await {
      Ok(order) => {
        info!(staged_id, order_id = order.id, "Staged order confirmed.");
        Ok(OrderView::from(order))
      }
      Err(e) => {
        warn!(staged_id, error = %e, "Confirmation failed, restoring staged order.");
        if let Err(restore_err) = self.staging.save(staged).await {
          warn!(staged_id, error = %restore_err, "Staged order could not be restored.");
        }
        Err(e)
      }
    }
  }

  /// Admin: moves an order to `status` (external name). Entering `shipped`
  /// decrements product stock or fails with `InsufficientStock`, leaving
  /// both stock and status untouched. The buyer is notified afterwards.
  #[instrument(name = "lifecycle::update_order_status", skip(self), err(Display))]
  pub async fn update_order_status(&self, order_id: i64, status: &str) -> OrderResult<OrderView> {
    let target = OrderStatus::from_external(status)?;
    self.transition(order_id, target).await
  }

  /// Same as [`OrderLifecycle::update_order_status`] with an already parsed status.
  pub async fn transition(&self, order_id: i64, target: OrderStatus) -> OrderResult<OrderView> {
    let applied = self.repository.apply_status_transition(order_id, target).await?;
    info!(
      order_id,
      from = %applied.previous_status,
      to = %applied.order.status,
      remaining_stock = ?applied.remaining_stock,
      "Order status updated."
    );

    self.notifier.dispatch(Notification::StatusChanged {
      order_id,
      status: applied.order.status,
      buyer: applied.buyer,
    });
    Ok(OrderView::from(applied.order))
  }

  /// Admin: every persisted order, newest first.
  pub async fn list_all_orders(&self) -> OrderResult<Vec<AdminOrderRow>> {
    self.repository.list_all_orders().await
  }

  /// Admin: every staged order, including ones never confirmed.
  pub async fn list_staged_orders(&self) -> Vec<StagedOrder> {
    self.staging.list().await
  }
}

fn validate_draft(draft: &OrderDraft) -> OrderResult<(i64, i32, Decimal)> {
  let (Some(product_id), Some(quantity), Some(unit_price)) = (draft.product_id, draft.quantity, draft.unit_price)
  else {
    return Err(OrderError::validation(
      "Champs requis manquants : produit_id, quantite et prix_unitaire.",
    ));
  };
  if quantity < 1 {
    return Err(OrderError::validation("La quantité doit être un entier positif."));
  }
  if unit_price < Decimal::ZERO {
    return Err(OrderError::validation("Le prix unitaire ne peut pas être négatif."));
  }
  // Persisted prices are NUMERIC(14, 2).
  if unit_price.normalize().scale() > PRICE_SCALE {
    return Err(OrderError::validation(
      "Le prix unitaire ne peut pas avoir plus de deux décimales.",
    ));
  }
  if unit_price > max_unit_price() {
    return Err(OrderError::validation("Le prix unitaire dépasse le maximum autorisé."));
  }
  Ok((product_id, quantity, unit_price))
}

const PRICE_SCALE: u32 = 2;

fn max_unit_price() -> Decimal {
  Decimal::new(99_999_999_999_999, PRICE_SCALE)
}
