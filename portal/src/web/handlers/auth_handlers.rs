// einrab_portal/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize)]
pub struct LoginPayload {
  pub email: Option<String>,
  pub mot_de_passe: Option<String>,
}

#[instrument(name = "handler::login", skip(app_state, payload))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  let LoginPayload { email, mot_de_passe } = payload.into_inner();
  let (Some(email), Some(password)) = (email, mot_de_passe) else {
    return Err(AppError::Validation(
      "Champs requis manquants : email et mot_de_passe.".to_string(),
    ));
  };

  let session = auth_service::login(app_state.sessions.as_ref(), &email, &password).await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "token": session.token,
    "role": session.role.as_stored(),
  })))
}

#[instrument(name = "handler::logout", skip(app_state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn logout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.sessions.revoke(&auth_user.token).await?;
  info!("Session closed.");
  Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
