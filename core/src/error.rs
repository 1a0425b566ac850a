// einrab_core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failure taxonomy for every order lifecycle operation.
///
/// The first three variants are business-rule failures detected before any
/// side effect is committed. `Auth` covers missing or rejected credentials.
/// `Storage` and `Internal` are unclassified and surface to clients as a
/// generic failure.
#[derive(Debug, Error)]
pub enum OrderError {
  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
  InsufficientStock {
    product_id: i64,
    requested: i32,
    available: i32,
  },

  #[error("Authentication failed: {0}")]
  Auth(String),

  #[error("Storage error: {source}")]
  Storage {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal error: {0}")]
  Internal(String),
}

impl OrderError {
  pub fn validation(message: impl Into<String>) -> Self {
    OrderError::Validation(message.into())
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    OrderError::NotFound(message.into())
  }
}

impl From<AnyhowError> for OrderError {
  fn from(err: AnyhowError) -> Self {
    OrderError::Storage { source: err }
  }
}

impl From<std::io::Error> for OrderError {
  fn from(err: std::io::Error) -> Self {
    OrderError::Storage { source: err.into() }
  }
}

pub type OrderResult<T, E = OrderError> = std::result::Result<T, E>;
