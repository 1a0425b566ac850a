// einrab_core/src/notify/mod.rs

//! Best-effort mail notifications for lifecycle events.
//!
//! Lifecycle operations hand a [`Notification`] to the
//! [`NotificationDispatcher`] and return immediately. A background worker
//! renders and sends the mail; its failures are logged and counted, never
//! reported back to the operation that raised the event.

mod dispatcher;
mod mailer;

pub use dispatcher::NotificationDispatcher;
pub use mailer::{LogMailer, Mailer, OutgoingMail, SentMail};

use crate::models::{Contact, StagedOrder};
use crate::status::OrderStatus;

/// A lifecycle event that warrants a mail.
#[derive(Debug, Clone)]
pub enum Notification {
  /// A buyer placed a new order; every admin is told.
  NewOrder { staged: StagedOrder, admins: Vec<Contact> },
  /// An admin moved an order to a new status; the buyer is told.
  StatusChanged {
    order_id: i64,
    status: OrderStatus,
    buyer: Contact,
  },
}

impl Notification {
  pub fn kind(&self) -> &'static str {
    match self {
      Notification::NewOrder { .. } => "new_order",
      Notification::StatusChanged { .. } => "status_changed",
    }
  }

  /// One mail per recipient.
  pub fn render(&self) -> Vec<OutgoingMail> {
    match self {
      Notification::NewOrder { staged, admins } => {
        let subject = format!("Nouvelle commande {}", staged.id);
        let body = format!(
          "<p>Une nouvelle commande a été passée.</p>\
           <p>Produit : {} (n° {})<br>Quantité : {}<br>Prix unitaire : {}<br>Client n° {}</p>",
          staged.product_name, staged.product_id, staged.quantity, staged.unit_price, staged.buyer_id
        );
        admins
          .iter()
          .map(|admin| OutgoingMail {
            to: admin.email.clone(),
            subject: subject.clone(),
            body: body.clone(),
          })
          .collect()
      }
      Notification::StatusChanged { order_id, status, buyer } => vec![OutgoingMail {
        to: buyer.email.clone(),
        subject: format!("Votre commande n° {} : {}", order_id, status_label(*status)),
        body: format!(
          "<p>Bonjour,</p><p>Le statut de votre commande n° {} est désormais : {}.</p>",
          order_id,
          status_label(*status)
        ),
      }],
    }
  }
}

fn status_label(status: OrderStatus) -> &'static str {
  match status {
    OrderStatus::Pending => "en attente",
    OrderStatus::Paid => "payée",
    OrderStatus::Shipped => "expédiée",
    OrderStatus::Cancelled => "annulée",
  }
}
