// tests/status_tests.rs
use einrab_core::{OrderError, OrderStatus, ServiceRequestStatus, StatusVocabulary};

#[test]
fn test_order_status_round_trips_through_stored_form() {
  for name in ["pending", "paid", "shipped", "cancelled"] {
    let status = OrderStatus::from_external(name).unwrap();
    let stored = status.as_stored();
    let back = OrderStatus::from_stored(stored).unwrap();
    assert_eq!(back.as_external(), name);
  }
}

#[test]
fn test_order_status_table() {
  assert_eq!(OrderStatus::Pending.as_stored(), "en_attente");
  assert_eq!(OrderStatus::Paid.as_stored(), "payee");
  assert_eq!(OrderStatus::Shipped.as_stored(), "expediee");
  assert_eq!(OrderStatus::Cancelled.as_stored(), "annulee");
  assert_eq!(OrderStatus::from_stored("expediee").unwrap(), OrderStatus::Shipped);
}

#[test]
fn test_service_request_status_round_trips() {
  for name in ["pending", "in_progress", "completed", "rejected"] {
    let status = ServiceRequestStatus::from_external(name).unwrap();
    assert_eq!(ServiceRequestStatus::from_stored(status.as_stored()).unwrap(), status);
    assert_eq!(status.to_string(), name);
  }
  assert_eq!(ServiceRequestStatus::InProgress.as_stored(), "en_cours");
}

#[test]
fn test_unknown_names_fail_fast() {
  assert!(matches!(OrderStatus::from_external("Shipped"), Err(OrderError::Validation(_))));
  assert!(matches!(OrderStatus::from_external("payee"), Err(OrderError::Validation(_))));
  assert!(matches!(OrderStatus::from_stored("livree"), Err(OrderError::Internal(_))));
}

#[test]
fn test_lenient_helpers_default_to_pending() {
  assert_eq!(OrderStatus::from_external_or_pending("typo"), OrderStatus::Pending);
  assert_eq!(OrderStatus::from_stored_or_pending("typo").as_stored(), "en_attente");
  assert_eq!(ServiceRequestStatus::from_stored_or_pending("???"), ServiceRequestStatus::Pending);
  assert_eq!(OrderStatus::from_external_or_pending("paid"), OrderStatus::Paid);
}

#[test]
fn test_serde_uses_external_names() {
  assert_eq!(serde_json::to_string(&OrderStatus::Cancelled).unwrap(), "\"cancelled\"");
  let parsed: ServiceRequestStatus = serde_json::from_str("\"in_progress\"").unwrap();
  assert_eq!(parsed, ServiceRequestStatus::InProgress);
}
