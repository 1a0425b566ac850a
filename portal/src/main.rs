// einrab_portal/src/main.rs

mod config;
mod db;
mod errors;
mod models;
mod services;
mod state;
mod web;

use crate::config::{AppConfig, LogFormat};
use crate::db::{PgOrderRepository, PgSessionStore};
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use einrab_core::{LogMailer, NotificationDispatcher, OrderLifecycle, StagingStore};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // span durations
  match format {
    LogFormat::Text => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

fn startup_failure(context: &str, err: impl std::fmt::Display) -> std::io::Error {
  tracing::error!(error = %err, "{}", context);
  std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      // Logging is not configured yet; fall back to the default format.
      init_tracing(LogFormat::Text);
      return Err(startup_failure("Failed to load application configuration", e));
    }
  };
  init_tracing(app_config.log_format);
  tracing::info!("Starting order portal server...");

  let db_pool = db::connect(&app_config)
    .await
    .map_err(|e| startup_failure("Failed to prepare the database", e))?;

  if app_config.seed_db {
    db::seed_admin(&db_pool, &app_config)
      .await
      .map_err(|e| startup_failure("Failed to seed the database", e))?;
  }

  let staging = Arc::new(StagingStore::new(app_config.staging_file.clone()));
  let mailer = Arc::new(LogMailer::new(app_config.mail_sender.clone()));
  let notifier = Arc::new(NotificationDispatcher::spawn(
    mailer,
    app_config.notification_queue_capacity,
  ));
  let lifecycle = Arc::new(OrderLifecycle::new(
    Arc::new(PgOrderRepository::new(db_pool.clone())),
    staging,
    notifier.clone(),
  ));
  let app_state = AppState::new(lifecycle, Arc::new(PgSessionStore::new(db_pool.clone())));

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  let result = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await;

  tracing::info!("Server stopped, flushing pending notifications.");
  notifier.shutdown().await;
  db_pool.close().await;
  result
}
