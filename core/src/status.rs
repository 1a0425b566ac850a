// einrab_core/src/status.rs

//! Status vocabularies.
//!
//! Statuses travel under two names: the stored form written to the database
//! (`en_attente`, `payee`, ...) and the external form exchanged with the
//! front end and the back-office (`pending`, `paid`, ...). Each vocabulary is
//! a fixed table; both directions are derived from the same rows so they can
//! never drift apart.
//!
//! Parsing is strict. The `*_or_pending` helpers keep the historical
//! default-on-miss behaviour for callers that need it.

use crate::error::{OrderError, OrderResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed set of statuses with a stored and an external spelling.
pub trait StatusVocabulary: Copy + Eq + fmt::Debug + Sized + 'static {
  /// Vocabulary name used in error messages.
  const KIND: &'static str;

  /// `(status, stored, external)` rows. The first row is the pending status.
  const TABLE: &'static [(Self, &'static str, &'static str)];

  fn pending() -> Self {
    Self::TABLE[0].0
  }

  fn as_stored(self) -> &'static str {
    Self::TABLE
      .iter()
      .find(|(status, _, _)| *status == self)
      .map(|(_, stored, _)| *stored)
      .unwrap_or(Self::TABLE[0].1)
  }

  fn as_external(self) -> &'static str {
    Self::TABLE
      .iter()
      .find(|(status, _, _)| *status == self)
      .map(|(_, _, external)| *external)
      .unwrap_or(Self::TABLE[0].2)
  }

  /// Parses an API-facing name. Unknown names are a validation failure.
  fn from_external(name: &str) -> OrderResult<Self> {
    Self::TABLE
      .iter()
      .find(|(_, _, external)| *external == name)
      .map(|(status, _, _)| *status)
      .ok_or_else(|| OrderError::Validation(format!("Unknown {} status '{}'", Self::KIND, name)))
  }

  /// Parses a value read back from the database. Unknown values mean the
  /// row was written outside this vocabulary.
  fn from_stored(value: &str) -> OrderResult<Self> {
    Self::TABLE
      .iter()
      .find(|(_, stored, _)| *stored == value)
      .map(|(status, _, _)| *status)
      .ok_or_else(|| OrderError::Internal(format!("Unrecognised stored {} status '{}'", Self::KIND, value)))
  }

  fn from_external_or_pending(name: &str) -> Self {
    Self::from_external(name).unwrap_or_else(|_| Self::pending())
  }

  fn from_stored_or_pending(value: &str) -> Self {
    Self::from_stored(value).unwrap_or_else(|_| Self::pending())
  }
}

/// Status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
  Shipped,
  Cancelled,
}

impl StatusVocabulary for OrderStatus {
  const KIND: &'static str = "order";
  const TABLE: &'static [(Self, &'static str, &'static str)] = &[
    (OrderStatus::Pending, "en_attente", "pending"),
    (OrderStatus::Paid, "payee", "paid"),
    (OrderStatus::Shipped, "expediee", "shipped"),
    (OrderStatus::Cancelled, "annulee", "cancelled"),
  ];
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_external())
  }
}

/// Status of an expertise or consultation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRequestStatus {
  Pending,
  InProgress,
  Completed,
  Rejected,
}

impl StatusVocabulary for ServiceRequestStatus {
  const KIND: &'static str = "service request";
  const TABLE: &'static [(Self, &'static str, &'static str)] = &[
    (ServiceRequestStatus::Pending, "en_attente", "pending"),
    (ServiceRequestStatus::InProgress, "en_cours", "in_progress"),
    (ServiceRequestStatus::Completed, "terminee", "completed"),
    (ServiceRequestStatus::Rejected, "rejetee", "rejected"),
  ];
}

impl fmt::Display for ServiceRequestStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_external())
  }
}
