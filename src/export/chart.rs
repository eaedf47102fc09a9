use std::io::Cursor;

use plotters::coord::Shift;
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;

use crate::error::AppError;
use crate::models::report::{DailyTotal, ProductQuantity};

const TREND_WIDTH: u32 = 600;
const TREND_HEIGHT: u32 = 400;
const DASHBOARD_WIDTH: u32 = 800;
const DASHBOARD_HEIGHT: u32 = 400;

/// Line plot of a daily sales series as PNG bytes. An empty series renders
/// a "No Sales" placeholder instead of a blank plot area.
pub fn render_trend_chart(rows: &[DailyTotal]) -> Result<Vec<u8>, AppError> {
    let mut rgb = vec![0u8; (TREND_WIDTH * TREND_HEIGHT * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut rgb, (TREND_WIDTH, TREND_HEIGHT)).into_drawing_area();
        draw_trend(&root, rows, "Sales Report").map_err(chart_err)?;
        root.present().map_err(chart_err)?;
    }
    encode_png(rgb, TREND_WIDTH, TREND_HEIGHT)
}

/// Two-panel dashboard chart: daily trend on the left, horizontal bars for
/// the top products on the right.
pub fn render_dashboard_chart(
    daily: &[DailyTotal],
    top: &[ProductQuantity],
) -> Result<Vec<u8>, AppError> {
    let mut rgb = vec![0u8; (DASHBOARD_WIDTH * DASHBOARD_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (DASHBOARD_WIDTH, DASHBOARD_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;
        let (left, right) = root.split_horizontally(DASHBOARD_WIDTH as i32 / 2);
        draw_trend(&left, daily, "Last 7 Days Sales").map_err(chart_err)?;
        draw_top_products(&right, top).map_err(chart_err)?;
        root.present().map_err(chart_err)?;
    }
    encode_png(rgb, DASHBOARD_WIDTH, DASHBOARD_HEIGHT)
}

fn draw_trend(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    rows: &[DailyTotal],
    title: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    area.fill(&WHITE)?;
    if rows.is_empty() {
        return draw_placeholder(area, "No Sales");
    }

    let totals: Vec<f64> = rows
        .iter()
        .map(|r| r.total.to_f64().unwrap_or(0.0))
        .collect();
    let max_total = totals.iter().copied().fold(0.0_f64, f64::max);
    let y_max = if max_total > 0.0 { max_total * 1.1 } else { 1.0 };
    let x_max = rows.len().saturating_sub(1).max(1);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(32)
        .y_label_area_size(56)
        .build_cartesian_2d(0..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_labels(rows.len().min(8))
        .x_label_formatter(&|idx| {
            rows.get(*idx)
                .map(|r| r.date.format("%m-%d").to_string())
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(LineSeries::new(
        totals.iter().enumerate().map(|(i, t)| (i, *t)),
        &BLUE,
    ))?;
    chart.draw_series(
        totals
            .iter()
            .enumerate()
            .map(|(i, t)| Circle::new((i, *t), 3, BLUE.filled())),
    )?;

    Ok(())
}

fn draw_top_products(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    top: &[ProductQuantity],
) -> Result<(), Box<dyn std::error::Error>> {
    area.fill(&WHITE)?;
    if top.is_empty() {
        return draw_placeholder(area, "No Data");
    }

    let n = top.len();
    let max_qty = top.iter().map(|p| p.quantity).max().unwrap_or(0).max(1);

    let mut chart = ChartBuilder::on(area)
        .caption("Top 5 Products", ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(32)
        .y_label_area_size(88)
        .build_cartesian_2d(0..max_qty + max_qty / 10 + 1, 0..n)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|idx| {
            // Bars are drawn top-down; label tick i sits at the lower edge
            // of the bar for rank n - 1 - i.
            if *idx < n {
                top[n - 1 - *idx].name.clone()
            } else {
                String::new()
            }
        })
        .draw()?;

    chart.draw_series(top.iter().enumerate().map(|(i, p)| {
        let y = n - 1 - i;
        Rectangle::new([(0, y), (p.quantity, y + 1)], BLUE.mix(0.6).filled())
    }))?;

    Ok(())
}

fn draw_placeholder(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (w, h) = area.dim_in_pixel();
    area.draw(&Text::new(
        label.to_string(),
        (w as i32 / 2 - 36, h as i32 / 2),
        ("sans-serif", 20),
    ))?;
    Ok(())
}

fn encode_png(rgb: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, AppError> {
    let img = image::RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| AppError::internal("Chart buffer size mismatch"))?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| AppError::internal(format!("PNG encode failed: {e}")))?;
    Ok(out.into_inner())
}

fn chart_err(e: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("Chart render failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const PNG_SIGNATURE: [u8; 4] = [0x89, b'P', b'N', b'G'];

    fn series() -> Vec<DailyTotal> {
        (1..=7)
            .map(|d| DailyTotal {
                date: NaiveDate::from_ymd_opt(2026, 8, d).unwrap(),
                total: dec!(10.50) * rust_decimal::Decimal::from(d),
            })
            .collect()
    }

    #[test]
    fn test_trend_chart_is_png() {
        let bytes = render_trend_chart(&series()).unwrap();
        assert!(bytes.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_empty_trend_renders_placeholder_png() {
        let bytes = render_trend_chart(&[]).unwrap();
        assert!(bytes.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_dashboard_chart_is_png() {
        let top = vec![
            ProductQuantity {
                name: "Widget".to_string(),
                quantity: 12,
            },
            ProductQuantity {
                name: "Gadget".to_string(),
                quantity: 7,
            },
        ];
        let bytes = render_dashboard_chart(&series(), &top).unwrap();
        assert!(bytes.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_dashboard_chart_with_no_data_panels() {
        let bytes = render_dashboard_chart(&[], &[]).unwrap();
        assert!(bytes.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_single_day_series_renders() {
        let one = vec![DailyTotal {
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            total: dec!(29.97),
        }];
        let bytes = render_trend_chart(&one).unwrap();
        assert!(bytes.starts_with(&PNG_SIGNATURE));
    }
}
