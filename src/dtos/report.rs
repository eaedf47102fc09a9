use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::report::{DailyTotal, ProductQuantity};

#[derive(Serialize)]
pub struct SummaryResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_sales: Decimal,
    pub transactions: i64,
}

/// Daily series shaped for chart consumers: parallel label/value arrays.
/// Totals are emitted as JSON numbers here; the CSV/PDF exports keep full
/// decimal precision.
#[derive(Serialize)]
pub struct SeriesResponse {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

#[derive(Serialize)]
pub struct TopProductsResponse {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

#[derive(Serialize)]
pub struct DashboardDataResponse {
    pub sales: SeriesResponse,
    pub top_products: TopProductsResponse,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub product_count: i64,
    pub total_stock: i64,
    pub today_sales: Decimal,
}

impl From<Vec<DailyTotal>> for SeriesResponse {
    fn from(rows: Vec<DailyTotal>) -> Self {
        Self {
            labels: rows.iter().map(|r| r.date.to_string()).collect(),
            data: rows
                .iter()
                .map(|r| r.total.to_f64().unwrap_or(0.0))
                .collect(),
        }
    }
}

impl From<Vec<ProductQuantity>> for TopProductsResponse {
    fn from(rows: Vec<ProductQuantity>) -> Self {
        Self {
            labels: rows.iter().map(|r| r.name.clone()).collect(),
            data: rows.iter().map(|r| r.quantity).collect(),
        }
    }
}
