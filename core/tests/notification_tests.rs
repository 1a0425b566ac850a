// tests/notification_tests.rs
mod common;

use chrono::Utc;
use common::*;
use einrab_core::{Contact, Notification, NotificationDispatcher, OrderStatus, StagedOrder};
use rust_decimal::Decimal;
use serial_test::serial;
use std::sync::Arc;

fn admin(email: &str, user_id: i64) -> Contact {
  Contact {
    user_id,
    email: email.to_string(),
    phone: None,
  }
}

fn new_order_notification(admins: Vec<Contact>) -> Notification {
  Notification::NewOrder {
    staged: StagedOrder {
      id: "stg-1".to_string(),
      buyer_id: BUYER_ID,
      product_id: PRODUCT_ID,
      product_name: "Semences de blé dur".to_string(),
      quantity: 3,
      unit_price: Decimal::from(1000),
      created_at: Utc::now(),
    },
    admins,
  }
}

#[test]
fn test_new_order_renders_one_mail_per_admin() {
  let mails = new_order_notification(vec![admin("a@einrab.local", 1), admin("b@einrab.local", 2)]).render();
  assert_eq!(mails.len(), 2);
  assert_eq!(mails[0].to, "a@einrab.local");
  assert_eq!(mails[1].to, "b@einrab.local");
  assert!(mails[0].subject.contains("stg-1"));
  assert!(mails[0].body.contains("Semences de blé dur"));
}

#[test]
fn test_status_change_renders_buyer_mail() {
  let mails = Notification::StatusChanged {
    order_id: 7,
    status: OrderStatus::Cancelled,
    buyer: admin(BUYER_EMAIL, BUYER_ID),
  }
  .render();
  assert_eq!(mails.len(), 1);
  assert_eq!(mails[0].to, BUYER_EMAIL);
  assert!(mails[0].subject.contains('7'));
  assert!(mails[0].body.contains("annulée"));
}

#[tokio::test]
#[serial]
async fn test_failures_are_counted_and_do_not_stop_the_worker() {
  setup_tracing();
  let mailer = Arc::new(RecordingMailer::failing_for("down@einrab.local"));
  let dispatcher = NotificationDispatcher::spawn(mailer.clone(), 8);

  dispatcher.dispatch(new_order_notification(vec![admin("down@einrab.local", 1), admin("up@einrab.local", 2)]));
  dispatcher.dispatch(Notification::StatusChanged {
    order_id: 1,
    status: OrderStatus::Shipped,
    buyer: admin(BUYER_EMAIL, BUYER_ID),
  });
  dispatcher.shutdown().await;

  assert_eq!(dispatcher.failed_count(), 1);
  assert_eq!(dispatcher.delivered_count(), 2);
  let recipients: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
  assert_eq!(recipients, vec!["up@einrab.local".to_string(), BUYER_EMAIL.to_string()]);
}

#[tokio::test]
#[serial]
async fn test_dispatch_after_shutdown_is_dropped() {
  setup_tracing();
  let mailer = Arc::new(RecordingMailer::default());
  let dispatcher = NotificationDispatcher::spawn(mailer.clone(), 8);
  dispatcher.shutdown().await;

  dispatcher.dispatch(new_order_notification(vec![admin(ADMIN_EMAIL, ADMIN_ID)]));

  assert_eq!(dispatcher.dropped_count(), 1);
  assert!(mailer.sent().is_empty());
}
