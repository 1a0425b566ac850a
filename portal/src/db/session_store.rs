// einrab_portal/src/db/session_store.rs

use crate::errors::AppError;
use crate::models::{CredentialsRow, SessionRow};
use crate::services::auth_service::{new_session_token, Credentials, Role, Session, SessionStore};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct PgSessionStore {
  pool: PgPool,
}

impl PgSessionStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionStore for PgSessionStore {
  async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, AppError> {
    let row: Option<CredentialsRow> =
      sqlx::query_as("SELECT id, mot_de_passe, role FROM utilisateurs WHERE email = $1")
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
    row.map(Credentials::try_from).transpose()
  }

  async fn create_session(&self, user_id: i64, role: Role) -> Result<Session, AppError> {
    let token = new_session_token();
    sqlx::query("INSERT INTO sessions (token, utilisateur_id) VALUES ($1, $2)")
      .bind(&token)
      .bind(user_id)
      .execute(&self.pool)
      .await?;
    Ok(Session { token, user_id, role })
  }

  async fn resolve(&self, token: &str) -> Result<Option<Session>, AppError> {
    let row: Option<SessionRow> = sqlx::query_as(
      "SELECT s.token, s.utilisateur_id, u.role FROM sessions s \
       JOIN utilisateurs u ON u.id = s.utilisateur_id WHERE s.token = $1",
    )
    .bind(token)
    .fetch_optional(&self.pool)
    .await?;
    row.map(Session::try_from).transpose()
  }

  async fn revoke(&self, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
      .bind(token)
      .execute(&self.pool)
      .await?;
    Ok(())
  }
}
