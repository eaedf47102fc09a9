use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Summed sales for one calendar date. Dates with no sales produce no row;
/// callers needing a dense series must zero-fill themselves.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductQuantity {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, FromRow)]
pub struct SalesSummary {
    pub total_sales: Decimal,
    pub transactions: i64,
}
