// einrab_portal/src/state.rs
use crate::services::auth_service::SessionStore;
use einrab_core::OrderLifecycle;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub lifecycle: Arc<OrderLifecycle>,
  pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
  pub fn new(lifecycle: Arc<OrderLifecycle>, sessions: Arc<dyn SessionStore>) -> Self {
    Self { lifecycle, sessions }
  }
}
