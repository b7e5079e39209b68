use chrono::{NaiveDate, NaiveTime};
use csv::StringRecord;
use rusqlite::types::Value;

use crate::error::{Error, Result};
use crate::schema::{Column, ColumnType, TableSchema};

/// Source format for screening dates
const DATE_INPUT_FORMAT: &str = "%d/%m/%Y";
/// Stored (ISO) format for screening dates
const DATE_STORED_FORMAT: &str = "%Y-%m-%d";
/// 24-hour wall-clock format for screening times
const TIME_FORMAT: &str = "%H:%M";

/// Maps a table's columns to field positions in a CSV header row.
#[derive(Debug)]
pub struct HeaderMap {
    indices: Vec<usize>,
}

impl HeaderMap {
    /// Resolve every schema column against the header. The source must
    /// carry all declared columns; extra columns are ignored.
    pub fn from_headers(table: &TableSchema, headers: &StringRecord) -> Result<Self> {
        let mut indices = Vec::with_capacity(table.columns.len());

        for col in table.columns {
            let idx = headers
                .iter()
                .position(|h| h.trim() == col.name)
                .ok_or_else(|| Error::MalformedRow {
                    table: table.name,
                    line: 1,
                    reason: format!("missing column '{}' in header", col.name),
                })?;
            indices.push(idx);
        }

        Ok(Self { indices })
    }
}

/// Convert one CSV record into bind-ready SQL values, in schema column order.
pub fn convert_row(
    table: &TableSchema,
    header: &HeaderMap,
    record: &StringRecord,
    line: u64,
) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(table.columns.len());

    for (col, &idx) in table.columns.iter().zip(&header.indices) {
        let raw = record.get(idx).unwrap_or("").trim();
        values.push(convert_field(table, col, raw, line)?);
    }

    Ok(values)
}

fn convert_field(table: &TableSchema, col: &Column, raw: &str, line: u64) -> Result<Value> {
    if raw.is_empty() {
        if col.nullable {
            return Ok(Value::Null);
        }
        return Err(malformed(
            table,
            line,
            format!("empty value for required column '{}'", col.name),
        ));
    }

    match col.col_type {
        ColumnType::Integer => raw.parse::<i64>().map(Value::Integer).map_err(|_| {
            malformed(
                table,
                line,
                format!("column '{}': '{}' is not an integer", col.name, raw),
            )
        }),
        ColumnType::Real => raw.parse::<f64>().map(Value::Real).map_err(|_| {
            malformed(
                table,
                line,
                format!("column '{}': '{}' is not a number", col.name, raw),
            )
        }),
        ColumnType::Text => Ok(Value::Text(raw.to_string())),
        ColumnType::Date => NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT)
            .map(|date| Value::Text(date.format(DATE_STORED_FORMAT).to_string()))
            .map_err(|_| {
                malformed(
                    table,
                    line,
                    format!("column '{}': '{}' is not a DD/MM/YYYY date", col.name, raw),
                )
            }),
        ColumnType::Time => NaiveTime::parse_from_str(raw, TIME_FORMAT)
            .map(|time| Value::Text(time.format(TIME_FORMAT).to_string()))
            .map_err(|_| {
                malformed(
                    table,
                    line,
                    format!("column '{}': '{}' is not an HH:MM time", col.name, raw),
                )
            }),
    }
}

fn malformed(table: &TableSchema, line: u64, reason: String) -> Error {
    Error::MalformedRow {
        table: table.name,
        line,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::SCREENINGS;

    fn headers() -> StringRecord {
        StringRecord::from(vec![
            "screening_id",
            "movie_id",
            "theater_id",
            "screening_date",
            "screening_time",
            "revenue",
            "tickets_sold",
        ])
    }

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_date_normalized_to_iso() {
        let header = HeaderMap::from_headers(&SCREENINGS, &headers()).unwrap();
        let row = convert_row(
            &SCREENINGS,
            &header,
            &record(&["1", "2", "3", "15/03/2024", "19:30", "250.5", "25"]),
            2,
        )
        .unwrap();

        assert_eq!(row[3], Value::Text("2024-03-15".to_string()));
        assert_eq!(row[4], Value::Text("19:30".to_string()));
        assert_eq!(row[5], Value::Real(250.5));
        assert_eq!(row[6], Value::Integer(25));
    }

    #[test]
    fn test_time_zero_padded() {
        let header = HeaderMap::from_headers(&SCREENINGS, &headers()).unwrap();
        let row = convert_row(
            &SCREENINGS,
            &header,
            &record(&["1", "2", "3", "01/01/2024", "9:05", "10.0", "1"]),
            2,
        )
        .unwrap();

        assert_eq!(row[4], Value::Text("09:05".to_string()));
    }

    #[test]
    fn test_malformed_date_rejected() {
        let header = HeaderMap::from_headers(&SCREENINGS, &headers()).unwrap();
        let err = convert_row(
            &SCREENINGS,
            &header,
            &record(&["1", "2", "3", "2024-03-15", "19:30", "250.5", "25"]),
            7,
        )
        .unwrap_err();

        match err {
            Error::MalformedRow { table, line, .. } => {
                assert_eq!(table, "screenings");
                assert_eq!(line, 7);
            }
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_time_rejected() {
        let header = HeaderMap::from_headers(&SCREENINGS, &headers()).unwrap();
        let err = convert_row(
            &SCREENINGS,
            &header,
            &record(&["1", "2", "3", "01/01/2024", "25:00", "10.0", "1"]),
            3,
        )
        .unwrap_err();

        assert!(matches!(err, Error::MalformedRow { .. }));
    }

    #[test]
    fn test_empty_required_field_rejected() {
        let header = HeaderMap::from_headers(&SCREENINGS, &headers()).unwrap();
        let err = convert_row(
            &SCREENINGS,
            &header,
            &record(&["1", "2", "3", "01/01/2024", "19:30", "", "25"]),
            4,
        )
        .unwrap_err();

        assert!(matches!(err, Error::MalformedRow { .. }));
    }

    #[test]
    fn test_missing_header_column_rejected() {
        let short = StringRecord::from(vec!["screening_id", "movie_id"]);
        let err = HeaderMap::from_headers(&SCREENINGS, &short).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn test_header_order_does_not_matter() {
        let reordered = StringRecord::from(vec![
            "tickets_sold",
            "revenue",
            "screening_time",
            "screening_date",
            "theater_id",
            "movie_id",
            "screening_id",
        ]);
        let header = HeaderMap::from_headers(&SCREENINGS, &reordered).unwrap();
        let row = convert_row(
            &SCREENINGS,
            &header,
            &record(&["25", "250.5", "19:30", "15/03/2024", "3", "2", "1"]),
            2,
        )
        .unwrap();

        // Values come back in schema column order regardless of CSV layout
        assert_eq!(row[0], Value::Integer(1));
        assert_eq!(row[2], Value::Integer(3));
        assert_eq!(row[3], Value::Text("2024-03-15".to_string()));
    }
}
