// einrab_core/src/notify/mailer.rs
use crate::error::OrderResult;
use async_trait::async_trait;
use tracing::info;

/// One rendered message, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
  pub to: String,
  pub subject: String,
  pub body: String,
}

/// Delivery receipt returned by a transport.
#[derive(Debug, Clone)]
pub struct SentMail {
  pub message_id: String,
}

/// Mail transport. Implementations are owned by the notification worker and
/// never called from a request path.
#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, mail: &OutgoingMail) -> OrderResult<SentMail>;
}

/// Transport that records each message in the log instead of delivering it.
#[derive(Debug, Clone)]
pub struct LogMailer {
  sender: String,
}

impl LogMailer {
  pub fn new(sender: impl Into<String>) -> Self {
    Self { sender: sender.into() }
  }

  pub fn sender(&self) -> &str {
    &self.sender
  }
}

#[async_trait]
impl Mailer for LogMailer {
  async fn send(&self, mail: &OutgoingMail) -> OrderResult<SentMail> {
    let message_id = format!("log_mail_{}", uuid::Uuid::new_v4());
    let body_preview = mail.body.chars().take(50).collect::<String>();
    info!(
      from = %self.sender,
      to = %mail.to,
      subject = %mail.subject,
      %body_preview,
      %message_id,
      "Mail written to log."
    );
    Ok(SentMail { message_id })
  }
}
