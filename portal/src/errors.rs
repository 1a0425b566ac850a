// einrab_portal/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use einrab_core::OrderError;
use serde_json::json;
use thiserror::Error;

const GENERIC_FAILURE: &str = "Une erreur interne est survenue.";

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Access Denied: {0}")]
  Forbidden(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error(transparent)]
  Order(#[from] OrderError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Missing, unknown or rejected credentials (401).
  pub fn unauthorized(message: impl Into<String>) -> Self {
    AppError::Order(OrderError::Auth(message.into()))
  }

  /// Message shown to the client. Internal failures stay generic.
  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) | AppError::Forbidden(m) => m.clone(),
      AppError::Order(order_err) => match order_err {
        OrderError::Validation(m) | OrderError::NotFound(m) | OrderError::Auth(m) => m.clone(),
        OrderError::InsufficientStock { requested, available, .. } => format!(
          "Stock insuffisant : {} demandé(s), {} disponible(s).",
          requested, available
        ),
        OrderError::Storage { .. } | OrderError::Internal(_) => GENERIC_FAILURE.to_string(),
      },
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) | AppError::Internal(_) => {
        GENERIC_FAILURE.to_string()
      }
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::Order(order_err) => match order_err {
        OrderError::Validation(_) | OrderError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
        OrderError::NotFound(_) => StatusCode::NOT_FOUND,
        OrderError::Auth(_) => StatusCode::UNAUTHORIZED,
        OrderError::Storage { .. } | OrderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with internal error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with client error");
    }
    HttpResponse::build(status).json(json!({
      "success": false,
      "message": self.public_message(),
    }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn business_failures_map_to_client_statuses() {
    let cases = [
      (AppError::from(OrderError::validation("x")), StatusCode::BAD_REQUEST),
      (AppError::from(OrderError::not_found("x")), StatusCode::NOT_FOUND),
      (
        AppError::from(OrderError::InsufficientStock {
          product_id: 1,
          requested: 3,
          available: 2,
        }),
        StatusCode::BAD_REQUEST,
      ),
      (AppError::unauthorized("x"), StatusCode::UNAUTHORIZED),
      (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
    ];
    for (err, expected) in cases {
      assert_eq!(err.status_code(), expected, "{}", err);
    }
  }

  #[test]
  fn internal_failures_hide_detail() {
    let err = AppError::from(OrderError::Internal("disk on fire at /var/data".into()));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.public_message(), GENERIC_FAILURE);
  }

  #[test]
  fn insufficient_stock_is_reported_distinctly() {
    let err = AppError::from(OrderError::InsufficientStock {
      product_id: 1,
      requested: 3,
      available: 2,
    });
    assert!(err.public_message().contains("Stock insuffisant"));
  }
}
