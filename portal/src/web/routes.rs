// einrab_portal/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::web::handlers::{admin_handlers, auth_handlers, order_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "success": true, "status": "ok" }))
}

/// Malformed bodies and path segments are reported with the same
/// `{ success: false, message }` shape as every other failure.
fn extractor_configs() -> (web::JsonConfig, web::PathConfig) {
  let json = web::JsonConfig::default()
    .error_handler(|err, _req| AppError::Validation(format!("Corps de requête invalide : {}", err)).into());
  let path = web::PathConfig::default()
    .error_handler(|err, _req| AppError::Validation(format!("Identifiant invalide : {}", err)).into());
  (json, path)
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  let (json_config, path_config) = extractor_configs();

  cfg.service(
    web::scope("/api")
      .app_data(json_config)
      .app_data(path_config)
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/connexion", web::post().to(auth_handlers::login_handler))
          .route("/deconnexion", web::post().to(auth_handlers::logout_handler)),
      )
      // Buyer routes
      .service(
        web::scope("/commandes")
          .route("", web::post().to(order_handlers::create_order_handler))
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{id}", web::get().to(order_handlers::get_order_handler))
          .route("/{id}/confirm", web::post().to(order_handlers::confirm_order_handler)),
      )
      // Back-office routes
      .service(
        web::scope("/admin/commandes")
          .route("", web::get().to(admin_handlers::list_all_orders_handler))
          .route("/en-attente", web::get().to(admin_handlers::list_staged_orders_handler))
          .route("/{id}/status", web::put().to(admin_handlers::update_order_status_handler)),
      ),
  );
}
