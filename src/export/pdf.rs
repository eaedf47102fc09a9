use std::io::BufWriter;

use chrono::NaiveDate;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::error::AppError;
use crate::models::report::DailyTotal;

/// Renders the aggregated daily series as a single-page PDF: a title line
/// with the date range, then one line per day with the date on the left and
/// the two-decimal total in a right-hand column, stepping down a fixed
/// increment per row. There is no pagination; rows past the bottom edge run
/// off the page rather than being truncated.
pub fn render_daily_pdf(
    rows: &[DailyTotal],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<u8>, AppError> {
    let title = format!("Sales Report ({start} - {end})");

    // US letter
    let (doc, page, layer) = PdfDocument::new(title.as_str(), Mm(215.9), Mm(279.4), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_err)?;
    let current = doc.get_page(page).get_layer(layer);

    current.use_text(title.as_str(), 14.0, Mm(25.4), Mm(266.7), &font);

    let mut y = 254.0;
    for row in rows {
        current.use_text(row.date.to_string(), 10.0, Mm(25.4), Mm(y), &font);
        current.use_text(format!("{:.2}", row.total), 10.0, Mm(165.1), Mm(y), &font);
        y -= 7.6;
    }

    let mut bytes = Vec::new();
    doc.save(&mut BufWriter::new(&mut bytes)).map_err(pdf_err)?;
    Ok(bytes)
}

fn pdf_err(e: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("PDF render failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let rows = vec![
            DailyTotal {
                date: day(1),
                total: dec!(29.97),
            },
            DailyTotal {
                date: day(2),
                total: dec!(150.00),
            },
        ];
        let bytes = render_daily_pdf(&rows, day(1), day(7)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_range_still_renders_title_page() {
        let bytes = render_daily_pdf(&[], day(1), day(7)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
