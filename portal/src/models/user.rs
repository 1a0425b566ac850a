// einrab_portal/src/models/user.rs

use crate::errors::AppError;
use crate::services::auth_service::{Credentials, Role, Session};
use einrab_core::Contact;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ContactRow {
  pub id: i64,
  pub email: String,
  pub telephone: Option<String>,
}

impl From<ContactRow> for Contact {
  fn from(row: ContactRow) -> Self {
    Contact {
      user_id: row.id,
      email: row.email,
      phone: row.telephone,
    }
  }
}

#[derive(FromRow)]
pub struct CredentialsRow {
  pub id: i64,
  pub mot_de_passe: String,
  pub role: String,
}

// Never print the password hash.
impl std::fmt::Debug for CredentialsRow {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CredentialsRow")
      .field("id", &self.id)
      .field("role", &self.role)
      .finish_non_exhaustive()
  }
}

impl TryFrom<CredentialsRow> for Credentials {
  type Error = AppError;

  fn try_from(row: CredentialsRow) -> Result<Self, Self::Error> {
    Ok(Credentials {
      user_id: row.id,
      password_hash: row.mot_de_passe,
      role: Role::from_stored(&row.role)?,
    })
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
  pub token: String,
  pub utilisateur_id: i64,
  pub role: String,
}

impl TryFrom<SessionRow> for Session {
  type Error = AppError;

  fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
    Ok(Session {
      token: row.token,
      user_id: row.utilisateur_id,
      role: Role::from_stored(&row.role)?,
    })
  }
}
