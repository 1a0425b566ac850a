// einrab_core/src/notify/dispatcher.rs
use super::{Mailer, Notification};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct DeliveryStats {
  delivered: AtomicUsize,
  failed: AtomicUsize,
  dropped: AtomicUsize,
}

/// Handle onto the notification queue.
///
/// Must be created inside a tokio runtime: [`NotificationDispatcher::spawn`]
/// starts the worker task that owns the mailer.
pub struct NotificationDispatcher {
  sender: Mutex<Option<mpsc::Sender<Notification>>>,
  worker: Mutex<Option<JoinHandle<()>>>,
  stats: Arc<DeliveryStats>,
}

impl std::fmt::Debug for NotificationDispatcher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NotificationDispatcher")
      .field("open", &self.sender.lock().is_some())
      .field("stats", &self.stats)
      .finish()
  }
}

impl NotificationDispatcher {
  pub fn spawn(mailer: Arc<dyn Mailer>, capacity: usize) -> Self {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let stats = Arc::new(DeliveryStats::default());
    let worker = tokio::spawn(run_worker(receiver, mailer, stats.clone()));
    Self {
      sender: Mutex::new(Some(sender)),
      worker: Mutex::new(Some(worker)),
      stats,
    }
  }

  /// Queues a notification without waiting for delivery. A full or closed
  /// queue drops the notification with a warning.
  pub fn dispatch(&self, notification: Notification) {
    let kind = notification.kind();
    let Some(sender) = self.sender.lock().clone() else {
      self.stats.dropped.fetch_add(1, Ordering::Relaxed);
      warn!(kind, "Notification dropped: dispatcher is shut down.");
      return;
    };
    match sender.try_send(notification) {
      Ok(()) => debug!(kind, "Notification queued."),
      Err(TrySendError::Full(_)) => {
        self.stats.dropped.fetch_add(1, Ordering::Relaxed);
        warn!(kind, "Notification dropped: queue is full.");
      }
      Err(TrySendError::Closed(_)) => {
        self.stats.dropped.fetch_add(1, Ordering::Relaxed);
        warn!(kind, "Notification dropped: worker has stopped.");
      }
    }
  }

  pub fn delivered_count(&self) -> usize {
    self.stats.delivered.load(Ordering::Relaxed)
  }

  pub fn failed_count(&self) -> usize {
    self.stats.failed.load(Ordering::Relaxed)
  }

  pub fn dropped_count(&self) -> usize {
    self.stats.dropped.load(Ordering::Relaxed)
  }

  /// Closes the queue and waits until every queued notification is handled.
  pub async fn shutdown(&self) {
    let sender = self.sender.lock().take();
    drop(sender);
    let worker = self.worker.lock().take();
    if let Some(worker) = worker {
      if let Err(e) = worker.await {
        warn!(error = %e, "Notification worker ended abnormally.");
      }
    }
  }
}

async fn run_worker(mut receiver: mpsc::Receiver<Notification>, mailer: Arc<dyn Mailer>, stats: Arc<DeliveryStats>) {
  info!("Notification worker started.");
  while let Some(notification) = receiver.recv().await {
    let kind = notification.kind();
    for mail in notification.render() {
      match mailer.send(&mail).await {
        Ok(sent) => {
          stats.delivered.fetch_add(1, Ordering::Relaxed);
          debug!(kind, to = %mail.to, message_id = %sent.message_id, "Notification delivered.");
        }
        Err(e) => {
          stats.failed.fetch_add(1, Ordering::Relaxed);
          warn!(kind, to = %mail.to, error = %e, "Notification delivery failed.");
        }
      }
    }
  }
  info!("Notification worker stopped.");
}
