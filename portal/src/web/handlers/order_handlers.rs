// einrab_portal/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use einrab_core::OrderDraft;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(
  name = "handler::create_order",
  skip(app_state, auth_user, payload),
  fields(user_id = auth_user.user_id)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<OrderDraft>,
) -> Result<HttpResponse, AppError> {
  let staged = app_state
    .lifecycle
    .create_order(auth_user.user_id, payload.into_inner())
    .await?;
  info!(staged_id = %staged.id, "Order created for user {}.", auth_user.user_id);

  Ok(HttpResponse::Created().json(json!({
    "success": true,
    "commande": staged,
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.lifecycle.list_orders_for_user(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "commandes": orders,
  })))
}

#[instrument(name = "handler::get_order", skip(app_state, auth_user, path), fields(user_id = auth_user.user_id))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order = app_state
    .lifecycle
    .get_order(path.into_inner(), auth_user.user_id)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "commande": order,
  })))
}

#[instrument(name = "handler::confirm_order", skip(app_state, auth_user, path), fields(user_id = auth_user.user_id))]
pub async fn confirm_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let staged_id = path.into_inner();
  let order = app_state.lifecycle.confirm_order(&staged_id, auth_user.user_id).await?;
  info!(%staged_id, "Order confirmed by user {}.", auth_user.user_id);
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "commande": order,
  })))
}
