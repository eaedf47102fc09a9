use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::dtos::report::{
    DashboardDataResponse, DashboardResponse, SeriesResponse, TopProductsResponse,
};
use crate::error::AppError;
use crate::export;
use crate::handlers::report::{daily_series, top_products};
use crate::state::AppState;

const TOP_PRODUCT_LIMIT: i64 = 5;

fn last_seven_days() -> (NaiveDate, NaiveDate) {
    let end = Utc::now().date_naive();
    (end - Duration::days(7), end)
}

// GET /dashboard - Headline metrics
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let product_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&state.db_pool)
        .await?;

    let total_stock: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(stock), 0)::BIGINT FROM products")
            .fetch_one(&state.db_pool)
            .await?;

    let today_sales: Decimal = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_amount), 0) FROM sales WHERE sale_date::date = CURRENT_DATE",
    )
    .fetch_one(&state.db_pool)
    .await?;

    Ok(Json(DashboardResponse {
        product_count,
        total_stock,
        today_sales,
    }))
}

// GET /dashboard/data - Chart payload: 7-day trend plus all-time top products
#[instrument(skip(state))]
pub async fn get_dashboard_data(
    State(state): State<AppState>,
) -> Result<Json<DashboardDataResponse>, AppError> {
    let (start, end) = last_seven_days();
    let daily = daily_series(&state.db_pool, start, end).await?;
    let top = top_products(&state.db_pool, None, TOP_PRODUCT_LIMIT).await?;

    Ok(Json(DashboardDataResponse {
        sales: SeriesResponse::from(daily),
        top_products: TopProductsResponse::from(top),
    }))
}

// GET /dashboard/chart - Two-panel PNG: 7-day trend and top products
#[instrument(skip(state))]
pub async fn get_dashboard_chart(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let (start, end) = last_seven_days();
    let daily = daily_series(&state.db_pool, start, end).await?;
    let top = top_products(&state.db_pool, None, TOP_PRODUCT_LIMIT).await?;

    let png = export::chart::render_dashboard_chart(&daily, &top)?;

    Ok(([(header::CONTENT_TYPE, "image/png".to_string())], png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::sale::record_sale;
    use rust_decimal_macros::dec;
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_dashboard_metrics_are_zero_when_empty(pool: PgPool) {
        let state = AppState::new(pool, "test-secret".to_string());
        let Json(dashboard) = get_dashboard(State(state)).await.unwrap();
        assert_eq!(dashboard.product_count, 0);
        assert_eq!(dashboard.total_stock, 0);
        assert_eq!(dashboard.today_sales, Decimal::ZERO);
    }

    #[sqlx::test]
    async fn test_dashboard_reflects_todays_sales(pool: PgPool) {
        let product_id: i64 = sqlx::query_scalar(
            "INSERT INTO products (name, price, stock) VALUES ('Widget', 9.99, 10) RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        record_sale(&pool, product_id, 3).await.unwrap();

        let state = AppState::new(pool, "test-secret".to_string());
        let Json(dashboard) = get_dashboard(State(state.clone())).await.unwrap();
        assert_eq!(dashboard.product_count, 1);
        assert_eq!(dashboard.total_stock, 7);
        assert_eq!(dashboard.today_sales, dec!(29.97));

        let Json(data) = get_dashboard_data(State(state)).await.unwrap();
        assert_eq!(data.top_products.labels, vec!["Widget".to_string()]);
        assert_eq!(data.top_products.data, vec![3]);
    }
}
