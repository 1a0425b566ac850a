// einrab_portal/src/web/extractors.rs

//! Request guards resolving the bearer session.

use crate::errors::AppError;
use crate::services::auth_service::{Role, Session};
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

/// Any signed-in user. Rejects with 401 when the token is missing or unknown.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: i64,
  pub role: Role,
  pub token: String,
}

impl From<Session> for AuthenticatedUser {
  fn from(session: Session) -> Self {
    Self {
      user_id: session.user_id,
      role: session.role,
      token: session.token,
    }
  }
}

/// A signed-in admin. Rejects with 401 when not signed in, 403 otherwise.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

/// Token of an `Authorization: Bearer <token>` header. The scheme is matched
/// case-insensitively; any other scheme yields no token.
fn bearer_token(req: &HttpRequest) -> Option<String> {
  let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.trim().split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("bearer") {
    return None;
  }
  let token = token.trim();
  (!token.is_empty()).then(|| token.to_string())
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = bearer_token(req);
    let state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("Application state is not registered.".to_string()))?;
      let Some(token) = token else {
        warn!("Request without Authorization header.");
        return Err(AppError::unauthorized("Authentification requise."));
      };
      match state.sessions.resolve(&token).await? {
        Some(session) => Ok(AuthenticatedUser::from(session)),
        None => {
          warn!("Request with unknown or expired session token.");
          Err(AppError::unauthorized("Session invalide ou expirée."))
        }
      }
    })
  }
}

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
    let user = AuthenticatedUser::from_request(req, payload);
    Box::pin(async move {
      let user = user.await?;
      if user.role != Role::Admin {
        warn!(user_id = user.user_id, "Non-admin user attempted an admin operation.");
        return Err(AppError::Forbidden("Accès réservé aux administrateurs.".to_string()));
      }
      Ok(AdminUser(user))
    })
  }
}
