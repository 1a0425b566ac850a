// einrab_core/src/store/staging.rs

//! File-backed holding area for orders awaiting payment confirmation.
//!
//! The whole set is one JSON array on disk. Every mutation is a full
//! read-modify-write, serialised by a single async mutex so concurrent
//! checkouts in this process cannot overwrite each other. Rewrites go to a
//! sibling temp file that is then renamed over the original.

use crate::error::{OrderError, OrderResult};
use crate::models::StagedOrder;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

#[derive(Debug)]
pub struct StagingStore {
  path: PathBuf,
  write_lock: Mutex<()>,
}

impl StagingStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      write_lock: Mutex::new(()),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Every staged order. A missing or unreadable file reads as empty.
  pub async fn list(&self) -> Vec<StagedOrder> {
    let _guard = self.write_lock.lock().await;
    self.read_all().await
  }

  pub async fn list_for_user(&self, buyer_id: i64) -> Vec<StagedOrder> {
    self
      .list()
      .await
      .into_iter()
      .filter(|staged| staged.buyer_id == buyer_id)
      .collect()
  }

  pub async fn get(&self, id: &str) -> Option<StagedOrder> {
    self.list().await.into_iter().find(|staged| staged.id == id)
  }

  #[instrument(name = "staging::save", skip(self, staged), fields(staged_id = %staged.id), err(Display))]
  pub async fn save(&self, staged: StagedOrder) -> OrderResult<()> {
    let _guard = self.write_lock.lock().await;
    let mut all = self.read_all().await;
    all.push(staged);
    self.write_all(&all).await
  }

  /// Removes the staged order with `id`, returning it if it was present.
  #[instrument(name = "staging::remove", skip(self), err(Display))]
  pub async fn remove(&self, id: &str) -> OrderResult<Option<StagedOrder>> {
    self.remove_where(|staged| staged.id == id).await
  }

  /// Removes the staged order with `id` only if it belongs to `buyer_id`.
  /// Only one of several concurrent callers can obtain a given order.
  #[instrument(name = "staging::claim", skip(self), err(Display))]
  pub async fn claim(&self, id: &str, buyer_id: i64) -> OrderResult<Option<StagedOrder>> {
    self
      .remove_where(|staged| staged.id == id && staged.buyer_id == buyer_id)
      .await
  }

  async fn remove_where<F>(&self, matches: F) -> OrderResult<Option<StagedOrder>>
  where
    F: Fn(&StagedOrder) -> bool,
  {
    let _guard = self.write_lock.lock().await;
    let mut all = self.read_all().await;
    let Some(position) = all.iter().position(|staged| matches(staged)) else {
      return Ok(None);
    };
    let removed = all.remove(position);
    self.write_all(&all).await?;
    Ok(Some(removed))
  }

  async fn read_all(&self) -> Vec<StagedOrder> {
    let bytes = match tokio::fs::read(&self.path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "Staging file unreadable, treating as empty.");
        return Vec::new();
      }
    };
    match serde_json::from_slice(&bytes) {
      Ok(all) => all,
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "Staging file is not a valid order list, treating as empty.");
        Vec::new()
      }
    }
  }

  async fn write_all(&self, all: &[StagedOrder]) -> OrderResult<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_vec_pretty(all)
      .map_err(|e| OrderError::Internal(format!("Failed to serialise staged orders: {}", e)))?;

    let mut tmp_name = self.path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    tokio::fs::write(&tmp_path, body).await?;
    tokio::fs::rename(&tmp_path, &self.path).await?;
    debug!(path = %self.path.display(), count = all.len(), "Staging file rewritten.");
    Ok(())
  }
}
