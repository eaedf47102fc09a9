use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// One sale joined with its line item and product name, as shown in the
/// sales listing.
#[derive(Debug, FromRow)]
pub struct SaleLine {
    pub id: i64,
    pub sale_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}
