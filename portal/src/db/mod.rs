// einrab_portal/src/db/mod.rs

//! PostgreSQL access: pool setup, migrations, seeding, and the store
//! implementations handed to the lifecycle manager and the auth layer.

mod order_repository;
mod session_store;

pub use order_repository::PgOrderRepository;
pub use session_store::PgSessionStore;

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};
use crate::services::auth_service::{self, Role};
use einrab_core::OrderError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

pub async fn connect(config: &AppConfig) -> AppResult<PgPool> {
  let pool = PgPoolOptions::new()
    .max_connections(config.database_max_connections)
    .connect(&config.database_url)
    .await?;
  info!("Successfully connected to the database.");

  sqlx::migrate!("./migrations").run(&pool).await?;
  info!("Database migrations applied.");
  Ok(pool)
}

/// Creates the configured admin account if no user has that email yet.
pub async fn seed_admin(pool: &PgPool, config: &AppConfig) -> AppResult<()> {
  let (Some(email), Some(password)) = (&config.seed_admin_email, &config.seed_admin_password) else {
    return Err(AppError::Config("Admin seed credentials are not configured".to_string()));
  };
  let password_hash = auth_service::hash_password(password)?;
  let inserted = sqlx::query(
    "INSERT INTO utilisateurs (email, mot_de_passe, role) VALUES ($1, $2, $3) ON CONFLICT (email) DO NOTHING",
  )
  .bind(email)
  .bind(password_hash)
  .bind(Role::Admin.as_stored())
  .execute(pool)
  .await?
  .rows_affected();

  if inserted > 0 {
    info!(%email, "Seeded admin account.");
  } else {
    info!(%email, "Admin account already present, seed skipped.");
  }
  Ok(())
}

pub(crate) fn storage_error(err: sqlx::Error) -> OrderError {
  OrderError::Storage { source: err.into() }
}
