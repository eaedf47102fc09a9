use csv::Writer;

use crate::error::AppError;
use crate::models::report::DailyTotal;

/// Renders the aggregated daily series as CSV bytes: a `date,total` header
/// followed by one row per day. Totals keep full decimal precision.
pub fn render_daily_csv(rows: &[DailyTotal]) -> Result<Vec<u8>, AppError> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(["date", "total"]).map_err(csv_err)?;
    for row in rows {
        writer
            .write_record([row.date.to_string(), row.total.to_string()])
            .map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV render failed: {e}")))
}

fn csv_err(e: csv::Error) -> AppError {
    AppError::internal(format!("CSV render failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_header_only_for_empty_input() {
        let bytes = render_daily_csv(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "date,total\n");
    }

    #[test]
    fn test_round_trip_preserves_rows() {
        let rows = vec![
            DailyTotal {
                date: day(2026, 8, 1),
                total: dec!(29.97),
            },
            DailyTotal {
                date: day(2026, 8, 2),
                total: dec!(1049.50),
            },
            DailyTotal {
                date: day(2026, 8, 3),
                total: dec!(0.01),
            },
        ];

        let bytes = render_daily_csv(&rows).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            vec!["date", "total"]
        );

        let parsed: Vec<DailyTotal> = reader
            .records()
            .map(|rec| {
                let rec = rec.unwrap();
                DailyTotal {
                    date: NaiveDate::from_str(&rec[0]).unwrap(),
                    total: Decimal::from_str(&rec[1]).unwrap(),
                }
            })
            .collect();

        assert_eq!(parsed, rows);
    }
}
