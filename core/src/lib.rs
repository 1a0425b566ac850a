// einrab_core/src/lib.rs

//! Order lifecycle for the e-INRAB portal.
//!
//! Buyers stage orders at checkout; staged orders live in a JSON file until
//! payment is confirmed, at which point they move into the relational store
//! as `paid`. Admins then move persisted orders between statuses, with the
//! `shipped` transition gated on product stock. Lifecycle events raise mail
//! notifications that are delivered in the background and never fail the
//! operation that raised them.
//!
//!  - [`store::StagingStore`]: file-backed staging area.
//!  - [`store::OrderRepository`]: relational store seam, with an in-memory
//!    implementation in [`store::InMemoryOrderRepository`].
//!  - [`status`]: stored/external status vocabularies.
//!  - [`notify`]: notification queue and mail transports.
//!  - [`OrderLifecycle`]: the operations themselves.

pub mod error;
pub mod lifecycle;
pub mod models;
pub mod notify;
pub mod status;
pub mod store;

pub use crate::error::{OrderError, OrderResult};
pub use crate::lifecycle::OrderLifecycle;
pub use crate::models::{
  AdminOrderRow, Contact, NewOrder, Order, OrderDraft, OrderKey, OrderSource, OrderView, Product, StagedOrder,
  StatusTransition,
};
pub use crate::notify::{LogMailer, Mailer, Notification, NotificationDispatcher, OutgoingMail, SentMail};
pub use crate::status::{OrderStatus, ServiceRequestStatus, StatusVocabulary};
pub use crate::store::{InMemoryOrderRepository, OrderRepository, StagingStore};
