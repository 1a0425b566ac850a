// einrab_portal/src/models/mod.rs

//! Row shapes read from PostgreSQL, converted into `einrab_core` types.

pub mod order;
pub mod product;
pub mod user;

pub use order::{AdminOrderRecord, OrderRow, TransitionRow};
pub use product::ProductRow;
pub use user::{ContactRow, CredentialsRow, SessionRow};
