use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreateSaleRequest {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Serialize)]
pub struct RecordSaleResponse {
    pub sale_id: i64,
    pub total_amount: Decimal,
}

#[derive(Serialize)]
pub struct SaleLineResponse {
    pub id: i64,
    pub sale_date: String,
    pub total_amount: Decimal,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl From<crate::models::sale::SaleLine> for SaleLineResponse {
    fn from(line: crate::models::sale::SaleLine) -> Self {
        Self {
            id: line.id,
            sale_date: line.sale_date.to_rfc3339(),
            total_amount: line.total_amount,
            product_name: line.product_name,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}
