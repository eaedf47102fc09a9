use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::instrument;

use crate::dtos::report::{SeriesResponse, SummaryResponse};
use crate::error::AppError;
use crate::export;
use crate::models::report::{DailyTotal, ProductQuantity, SalesSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportRangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ReportRangeQuery {
    /// Missing bounds default to the trailing 7 days.
    fn resolve(&self) -> (NaiveDate, NaiveDate) {
        let end = self.end.unwrap_or_else(|| Utc::now().date_naive());
        let start = self.start.unwrap_or(end - Duration::days(7));
        (start, end)
    }
}

// ==================== Summary ====================

// GET /reports/summary?start&end
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    Query(range): Query<ReportRangeQuery>,
) -> Result<Json<SummaryResponse>, AppError> {
    let (start, end) = range.resolve();
    let summary = summarize(&state.db_pool, start, end).await?;

    Ok(Json(SummaryResponse {
        start,
        end,
        total_sales: summary.total_sales,
        transactions: summary.transactions,
    }))
}

// ==================== Series ====================

// GET /reports/series?start&end
#[instrument(skip(state))]
pub async fn get_series(
    State(state): State<AppState>,
    Query(range): Query<ReportRangeQuery>,
) -> Result<Json<SeriesResponse>, AppError> {
    let (Some(start), Some(end)) = (range.start, range.end) else {
        return Err(AppError::validation("Invalid date range"));
    };

    let rows = daily_series(&state.db_pool, start, end).await?;
    Ok(Json(SeriesResponse::from(rows)))
}

// ==================== Export ====================

// GET /reports/export/{csv|pdf}?start&end
#[instrument(skip(state))]
pub async fn export_report(
    Path(format): Path<String>,
    State(state): State<AppState>,
    Query(range): Query<ReportRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (start, end) = range.resolve();
    let rows = daily_series(&state.db_pool, start, end).await?;

    let (bytes, content_type, extension) = match format.as_str() {
        "csv" => (export::csv::render_daily_csv(&rows)?, "text/csv", "csv"),
        "pdf" => (
            export::pdf::render_daily_pdf(&rows, start, end)?,
            "application/pdf",
            "pdf",
        ),
        _ => return Err(AppError::validation("Unsupported export format")),
    };

    let filename = format!("sales_{start}_to_{end}.{extension}");
    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

// ==================== Chart ====================

// GET /reports/chart?start&end
#[instrument(skip(state))]
pub async fn get_report_chart(
    State(state): State<AppState>,
    Query(range): Query<ReportRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (start, end) = range.resolve();
    let rows = daily_series(&state.db_pool, start, end).await?;
    let png = export::chart::render_trend_chart(&rows)?;

    Ok(([(header::CONTENT_TYPE, "image/png".to_string())], png))
}

// Aggregation helpers, shared with the dashboard handlers. Ranges are
// inclusive on both ends and compare the date portion of the sale
// timestamp.

pub(crate) async fn summarize(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SalesSummary, AppError> {
    let summary = sqlx::query_as::<_, SalesSummary>(
        "SELECT COALESCE(SUM(total_amount), 0) AS total_sales,
                COUNT(*) AS transactions
         FROM sales
         WHERE sale_date::date BETWEEN $1 AND $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(summary)
}

pub(crate) async fn daily_series(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyTotal>, AppError> {
    let rows = sqlx::query_as::<_, DailyTotal>(
        "SELECT sale_date::date AS date, SUM(total_amount) AS total
         FROM sales
         WHERE sale_date::date BETWEEN $1 AND $2
         GROUP BY sale_date::date
         ORDER BY sale_date::date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Top products by units sold. `range` bounds the window; `None` ranks over
/// all recorded sales (the dashboard variant).
pub(crate) async fn top_products(
    pool: &PgPool,
    range: Option<(NaiveDate, NaiveDate)>,
    limit: i64,
) -> Result<Vec<ProductQuantity>, AppError> {
    let rows = match range {
        Some((start, end)) => {
            sqlx::query_as::<_, ProductQuantity>(
                "SELECT p.name AS name, SUM(si.quantity)::BIGINT AS quantity
                 FROM sale_items si
                 JOIN products p ON si.product_id = p.id
                 JOIN sales s ON si.sale_id = s.id
                 WHERE s.sale_date::date BETWEEN $2 AND $3
                 GROUP BY p.name
                 ORDER BY SUM(si.quantity) DESC, p.name
                 LIMIT $1",
            )
            .bind(limit)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ProductQuantity>(
                "SELECT p.name AS name, SUM(si.quantity)::BIGINT AS quantity
                 FROM sale_items si
                 JOIN products p ON si.product_id = p.id
                 GROUP BY p.name
                 ORDER BY SUM(si.quantity) DESC, p.name
                 LIMIT $1",
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}
