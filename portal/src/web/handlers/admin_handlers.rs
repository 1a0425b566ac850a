// einrab_portal/src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AdminUser;

#[derive(Deserialize, Debug)]
pub struct UpdateStatusPayload {
  pub statut: Option<String>,
}

#[instrument(name = "handler::admin_list_orders", skip(app_state, admin), fields(admin_id = admin.0.user_id))]
pub async fn list_all_orders_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.lifecycle.list_all_orders().await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "commandes": orders,
  })))
}

#[instrument(name = "handler::admin_list_staged", skip(app_state, admin), fields(admin_id = admin.0.user_id))]
pub async fn list_staged_orders_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let staged = app_state.lifecycle.list_staged_orders().await;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "commandes": staged,
  })))
}

#[instrument(
  name = "handler::admin_update_status",
  skip(app_state, admin, path, payload),
  fields(admin_id = admin.0.user_id)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<i64>,
  payload: web::Json<UpdateStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let status = payload
    .into_inner()
    .statut
    .ok_or_else(|| AppError::Validation("Champ requis manquant : statut.".to_string()))?;

  let order = app_state.lifecycle.update_order_status(order_id, &status).await?;
  info!(order_id, %status, "Order status changed by admin {}.", admin.0.user_id);
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "commande": order,
  })))
}
