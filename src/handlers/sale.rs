use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::dtos::sale::{CreateSaleRequest, RecordSaleResponse, SaleLineResponse};
use crate::error::AppError;
use crate::models::sale::SaleLine;
use crate::state::AppState;

// POST /sales - Record a sale against the catalog
#[instrument(skip(state, payload))]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<RecordSaleResponse>), AppError> {
    let recorded = record_sale(&state.db_pool, payload.product_id, payload.quantity).await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordSaleResponse {
            sale_id: recorded.sale_id,
            total_amount: recorded.total_amount,
        }),
    ))
}

// GET /sales - List recorded sales, newest first
#[instrument(skip(state))]
pub async fn list_sales(
    State(state): State<AppState>,
) -> Result<Json<Vec<SaleLineResponse>>, AppError> {
    let lines = sqlx::query_as::<_, SaleLine>(
        "SELECT s.id, s.sale_date, s.total_amount,
                p.name AS product_name, si.quantity, si.unit_price
         FROM sales s
         JOIN sale_items si ON s.id = si.sale_id
         JOIN products p ON si.product_id = p.id
         ORDER BY s.sale_date DESC, s.id DESC",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(lines.into_iter().map(SaleLineResponse::from).collect()))
}

#[derive(Debug)]
pub(crate) struct RecordedSale {
    pub sale_id: i64,
    pub total_amount: Decimal,
}

/// Commits one sale as a single database transaction: price lookup, sale
/// insert, line-item insert with the unit price snapshot, stock decrement.
/// Either all four writes land or none do.
pub(crate) async fn record_sale(
    pool: &PgPool,
    product_id: i64,
    quantity: i32,
) -> Result<RecordedSale, AppError> {
    if quantity <= 0 {
        return Err(AppError::validation("Quantity must be a positive integer"));
    }

    let mut tx = pool.begin().await?;

    let product = sqlx::query_as::<_, ProductRow>(
        "SELECT name, price, stock FROM products WHERE id = $1",
    )
    .bind(product_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    if quantity > product.stock {
        return Err(AppError::insufficient_stock(format!(
            "Not enough stock for '{}': requested {}, available {}",
            product.name, quantity, product.stock
        )));
    }

    let unit_price = product.price;
    let total_amount = unit_price * Decimal::from(quantity);

    let sale_id: i64 = sqlx::query_scalar(
        "INSERT INTO sales (sale_date, total_amount) VALUES (now(), $1) RETURNING id",
    )
    .bind(total_amount)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO sale_items (sale_id, product_id, quantity, unit_price)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(sale_id)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .execute(&mut *tx)
    .await?;

    // Conditional decrement: two concurrent sales can both pass the stock
    // check above before either commits; the `stock >= quantity` predicate
    // makes the loser fail here. Returning before commit drops the
    // transaction and rolls back the sale and item inserts.
    let updated = sqlx::query("UPDATE products SET stock = stock - $1 WHERE id = $2 AND stock >= $1")
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::insufficient_stock(format!(
            "Not enough stock for '{}'",
            product.name
        )));
    }

    tx.commit().await?;

    debug!(sale_id, product_id, quantity, %total_amount, "Recorded sale");

    Ok(RecordedSale {
        sale_id,
        total_amount,
    })
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    name: String,
    price: Decimal,
    stock: i32,
}
