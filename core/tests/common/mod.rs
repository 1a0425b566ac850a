// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset

use async_trait::async_trait;
use einrab_core::{
  AdminOrderRow, Contact, InMemoryOrderRepository, Mailer, NewOrder, NotificationDispatcher, Order, OrderError,
  OrderLifecycle, OrderRepository, OrderResult, OrderStatus, OutgoingMail, Product, SentMail, StagingStore,
  StatusTransition,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::Level;

pub const BUYER_ID: i64 = 1;
pub const OTHER_BUYER_ID: i64 = 2;
pub const ADMIN_ID: i64 = 99;
pub const PRODUCT_ID: i64 = 10;
pub const BUYER_EMAIL: &str = "acheteur@example.com";
pub const ADMIN_EMAIL: &str = "admin@einrab.local";

// --- Mailer that keeps every message it is asked to send ---
#[derive(Debug, Default)]
pub struct RecordingMailer {
  sent: Mutex<Vec<OutgoingMail>>,
  fail_for: Option<String>,
}

impl RecordingMailer {
  /// Fails every message addressed to `recipient`.
  pub fn failing_for(recipient: &str) -> Self {
    Self {
      sent: Mutex::new(Vec::new()),
      fail_for: Some(recipient.to_string()),
    }
  }

  pub fn sent(&self) -> Vec<OutgoingMail> {
    self.sent.lock().clone()
  }
}

#[async_trait]
impl Mailer for RecordingMailer {
  async fn send(&self, mail: &OutgoingMail) -> OrderResult<SentMail> {
    if self.fail_for.as_deref() == Some(mail.to.as_str()) {
      return Err(OrderError::Internal(format!("mailbox {} unavailable", mail.to)));
    }
    let mut sent = self.sent.lock();
    sent.push(mail.clone());
    Ok(SentMail {
      message_id: format!("test_{}", sent.len()),
    })
  }
}

// --- Repository whose inserts can be switched off ---
#[derive(Debug)]
pub struct FlakyInsertRepository {
  inner: Arc<InMemoryOrderRepository>,
  inserts_fail: AtomicBool,
}

impl FlakyInsertRepository {
  pub fn failing(inner: Arc<InMemoryOrderRepository>) -> Self {
    Self {
      inner,
      inserts_fail: AtomicBool::new(true),
    }
  }

  pub fn recover(&self) {
    self.inserts_fail.store(false, Ordering::SeqCst);
  }
}

#[async_trait]
impl OrderRepository for FlakyInsertRepository {
  async fn find_product(&self, product_id: i64) -> OrderResult<Option<Product>> {
    self.inner.find_product(product_id).await
  }

  async fn insert_order(&self, order: NewOrder) -> OrderResult<Order> {
    if self.inserts_fail.load(Ordering::SeqCst) {
      return Err(OrderError::Internal("database unavailable".to_string()));
    }
    self.inner.insert_order(order).await
  }

  async fn find_order_for_buyer(&self, order_id: i64, buyer_id: i64) -> OrderResult<Option<Order>> {
    self.inner.find_order_for_buyer(order_id, buyer_id).await
  }

  async fn list_orders_for_buyer(&self, buyer_id: i64) -> OrderResult<Vec<Order>> {
    self.inner.list_orders_for_buyer(buyer_id).await
  }

  async fn list_all_orders(&self) -> OrderResult<Vec<AdminOrderRow>> {
    self.inner.list_all_orders().await
  }

  async fn apply_status_transition(&self, order_id: i64, target: OrderStatus) -> OrderResult<StatusTransition> {
    self.inner.apply_status_transition(order_id, target).await
  }

  async fn admin_contacts(&self) -> OrderResult<Vec<Contact>> {
    self.inner.admin_contacts().await
  }
}

// --- Lifecycle wired over the in-memory store and a temp staging file ---
pub struct Fixture {
  pub lifecycle: OrderLifecycle,
  pub repo: Arc<InMemoryOrderRepository>,
  pub staging: Arc<StagingStore>,
  pub notifier: Arc<NotificationDispatcher>,
  pub mailer: Arc<RecordingMailer>,
  pub dir: TempDir,
}

pub fn seed_product(stock: i32) -> Product {
  Product {
    id: PRODUCT_ID,
    name: "Semences de blé dur".to_string(),
    stock,
    unit_price: Decimal::from(1000),
  }
}

pub fn fixture_with_stock(stock: i32) -> Fixture {
  fixture_with_mailer(stock, RecordingMailer::default())
}

pub fn fixture_with_mailer(stock: i32, mailer: RecordingMailer) -> Fixture {
  let repo = Arc::new(InMemoryOrderRepository::new());
  repo.upsert_product(seed_product(stock));
  repo.upsert_user(
    Contact {
      user_id: BUYER_ID,
      email: BUYER_EMAIL.to_string(),
      phone: Some("+212600000000".to_string()),
    },
    false,
  );
  repo.upsert_user(
    Contact {
      user_id: OTHER_BUYER_ID,
      email: "autre@example.com".to_string(),
      phone: None,
    },
    false,
  );
  repo.upsert_user(
    Contact {
      user_id: ADMIN_ID,
      email: ADMIN_EMAIL.to_string(),
      phone: None,
    },
    true,
  );

  let dir = tempfile::tempdir().unwrap();
  let staging = Arc::new(StagingStore::new(dir.path().join("commandes_en_attente.json")));
  let mailer = Arc::new(mailer);
  let notifier = Arc::new(NotificationDispatcher::spawn(mailer.clone(), 16));
  let lifecycle = OrderLifecycle::new(repo.clone(), staging.clone(), notifier.clone());

  Fixture {
    lifecycle,
    repo,
    staging,
    notifier,
    mailer,
    dir,
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
