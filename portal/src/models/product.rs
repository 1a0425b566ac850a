// einrab_portal/src/models/product.rs

use einrab_core::Product;
use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
  pub id: i64,
  pub nom: String,
  pub stock: i32,
  pub prix_unitaire: Decimal,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.nom,
      stock: row.stock,
      unit_price: row.prix_unitaire,
    }
  }
}
