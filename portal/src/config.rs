// einrab_portal/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Text,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,

  /// JSON document holding orders awaiting payment confirmation.
  pub staging_file: PathBuf,

  pub mail_sender: String,
  pub notification_queue_capacity: usize,

  pub seed_db: bool,
  pub seed_admin_email: Option<String>,
  pub seed_admin_password: Option<String>,

  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the
  /// process environment.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = parse_var("SERVER_PORT", &get_or("SERVER_PORT", "8080"))?;
    let database_url =
      lookup("DATABASE_URL").ok_or_else(|| AppError::Config("Missing environment variable 'DATABASE_URL'".to_string()))?;
    let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &get_or("DATABASE_MAX_CONNECTIONS", "5"))?;

    let staging_file = PathBuf::from(get_or("STAGING_FILE", "data/commandes_en_attente.json"));
    let mail_sender = get_or("MAIL_SENDER", "noreply@einrab.local");
    let notification_queue_capacity =
      parse_var("NOTIFICATION_QUEUE_CAPACITY", &get_or("NOTIFICATION_QUEUE_CAPACITY", "256"))?;

    let seed_db = parse_var("SEED_DB", &get_or("SEED_DB", "false"))?;
    let seed_admin_email = lookup("SEED_ADMIN_EMAIL");
    let seed_admin_password = lookup("SEED_ADMIN_PASSWORD");
    if seed_db && (seed_admin_email.is_none() || seed_admin_password.is_none()) {
      return Err(AppError::Config(
        "SEED_DB=true requires SEED_ADMIN_EMAIL and SEED_ADMIN_PASSWORD".to_string(),
      ));
    }

    let log_format = match get_or("LOG_FORMAT", "text").as_str() {
      "text" => LogFormat::Text,
      "json" => LogFormat::Json,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}': expected text or json", other))),
    };

    tracing::debug!("Application configuration loaded.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      staging_file,
      mail_sender,
      notification_queue_capacity,
      seed_db,
      seed_admin_email,
      seed_admin_password,
      log_format,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn defaults_apply_when_only_database_url_is_set() {
    let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/einrab")])).unwrap();
    assert_eq!(config.server_address(), "127.0.0.1:8080");
    assert_eq!(config.staging_file, PathBuf::from("data/commandes_en_attente.json"));
    assert_eq!(config.notification_queue_capacity, 256);
    assert_eq!(config.log_format, LogFormat::Text);
    assert!(!config.seed_db);
  }

  #[test]
  fn missing_database_url_is_a_config_error() {
    let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
  }

  #[test]
  fn invalid_values_are_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "x"), ("SERVER_PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("SERVER_PORT")));

    let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "x"), ("LOG_FORMAT", "xml")])).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
  }

  #[test]
  fn seeding_requires_admin_credentials() {
    let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "x"), ("SEED_DB", "true")])).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));

    let config = AppConfig::from_lookup(lookup_from(&[
      ("DATABASE_URL", "x"),
      ("SEED_DB", "true"),
      ("SEED_ADMIN_EMAIL", "admin@einrab.local"),
      ("SEED_ADMIN_PASSWORD", "secret"),
    ]))
    .unwrap();
    assert!(config.seed_db);
  }
}
