// src/handlers/product.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use sqlx::Error as SqlxError;
use tracing::{error, instrument};

use crate::dtos::product::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use crate::error::AppError;
use crate::models::product::Product;
use crate::state::AppState;

fn map_foreign_key_violation(err: SqlxError, message: &str) -> AppError {
    match err {
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
            AppError::conflict(message)
        }
        other => other.into(),
    }
}

// GET /products - List all products
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    match sqlx::query_as::<_, Product>(
        "SELECT id, name, price, stock, created_at FROM products ORDER BY name",
    )
    .fetch_all(&state.db_pool)
    .await
    {
        Ok(products) => {
            let response = products.into_iter().map(ProductResponse::from).collect();
            Ok(Json(response))
        }
        Err(e) => {
            error!(?e, "Failed to fetch products");
            Err(e.into())
        }
    }
}

// GET /products/{id} - Get single product
#[instrument(skip(state), fields(id))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, price, stock, created_at FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// POST /products - Create new product
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Product name required"));
    }
    if payload.price < Decimal::ZERO {
        return Err(AppError::validation("Price cannot be negative"));
    }
    if payload.stock < 0 {
        return Err(AppError::validation("Stock cannot be negative"));
    }

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, price, stock)
         VALUES ($1, $2, $3)
         RETURNING id, name, price, stock, created_at",
    )
    .bind(&payload.name)
    .bind(payload.price)
    .bind(payload.stock)
    .fetch_one(&state.db_pool)
    .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// PUT /products/{id} - Update product
#[instrument(skip(state, payload), fields(id))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Product name required"));
        }
    }
    if payload.price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AppError::validation("Price cannot be negative"));
    }
    if payload.stock.is_some_and(|s| s < 0) {
        return Err(AppError::validation("Stock cannot be negative"));
    }

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET
         name = COALESCE($1, name),
         price = COALESCE($2, price),
         stock = COALESCE($3, stock)
         WHERE id = $4
         RETURNING id, name, price, stock, created_at",
    )
    .bind(payload.name)
    .bind(payload.price)
    .bind(payload.stock)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// DELETE /products/{id} - Delete product, blocked while any sale references it
#[instrument(skip(state), fields(id))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<()>, AppError> {
    let mut tx = state.db_pool.begin().await?;

    // Application-layer referential guard; the FK mapping below is only a
    // backstop against rows inserted between the check and the delete.
    let sale_refs: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sale_items WHERE product_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if sale_refs > 0 {
        return Err(AppError::conflict(
            "Cannot delete product because it has associated sales",
        ));
    }

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, "Cannot delete product because it has associated sales")
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }

    tx.commit().await?;

    Ok(Json(()))
}
