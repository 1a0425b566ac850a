// einrab_portal/src/services/auth_service.rs

//! Password hashing and bearer sessions.

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  Buyer,
  Admin,
}

impl Role {
  pub fn as_stored(self) -> &'static str {
    match self {
      Role::Buyer => "client",
      Role::Admin => "admin",
    }
  }

  pub fn from_stored(value: &str) -> Result<Self, AppError> {
    match value {
      "client" => Ok(Role::Buyer),
      "admin" => Ok(Role::Admin),
      other => Err(AppError::Internal(format!("Unrecognised stored role '{}'", other))),
    }
  }
}

/// Stored login material for one user.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user_id: i64,
  pub password_hash: String,
  pub role: Role,
}

/// A live session, resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub token: String,
  pub user_id: i64,
  pub role: Role,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
  async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, AppError>;

  async fn create_session(&self, user_id: i64, role: Role) -> Result<Session, AppError>;

  async fn resolve(&self, token: &str) -> Result<Option<Session>, AppError>;

  async fn revoke(&self, token: &str) -> Result<(), AppError>;
}

pub fn new_session_token() -> String {
  uuid::Uuid::new_v4().simple().to_string()
}

/// Checks `email`/`password` and opens a session. Unknown email and wrong
/// password are indistinguishable to the caller.
#[instrument(name = "auth_service::login", skip(store, password), err(Display))]
pub async fn login(store: &dyn SessionStore, email: &str, password: &str) -> Result<Session, AppError> {
  let rejected = || AppError::unauthorized("Identifiants invalides.");

  let Some(credentials) = store.find_credentials(email).await? else {
    warn!("Login attempt for unknown email.");
    return Err(rejected());
  };
  if !verify_password(&credentials.password_hash, password)? {
    warn!(user_id = credentials.user_id, "Login attempt with wrong password.");
    return Err(rejected());
  }

  let session = store.create_session(credentials.user_id, credentials.role).await?;
  info!(user_id = session.user_id, role = ?session.role, "Session opened.");
  Ok(session)
}

/// Hashes a plain-text password using Argon2 with a random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Le mot de passe ne peut pas être vide.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| {
      error!(error = %e, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", e))
    })
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// `Ok(false)` means the password does not match; errors mean the stored
/// hash itself is unusable.
#[instrument(name = "auth_service::verify_password", skip(hashed_password_str, provided_password), err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }

  let parsed_hash = PasswordHash::new(hashed_password_str).map_err(|e| {
    error!(error = %e, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", e))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(e) => {
      error!(error = %e, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!("Password verification process failed: {}", e)))
    }
  }
}
