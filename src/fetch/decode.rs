use crate::error::AppError;
use crate::table::{Cell, Table};

use super::FetchResult;

/// Decode the API's CSV body. Numbers use `,` as the decimal separator.
///
/// Short records are padded with empty cells; a record wider than the header is rejected.
pub fn decode_csv(text: &str) -> FetchResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    let mut table = Table::new(columns);

    let width = table.columns().len();
    for record in reader.records() {
        let record = record?;
        if record.len() > width {
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            return Err(AppError::message(format!(
                "CSV line {line} has {} fields but the header has {width}",
                record.len()
            )));
        }
        table.push_row(record.iter().map(parse_cell).collect());
    }

    Ok(table)
}

pub fn parse_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        if is_plain_number(trimmed, ',') {
            return Cell::Int(value);
        }
    }
    match parse_decimal(trimmed, ',') {
        Some(value) => Cell::Float(value),
        None => Cell::Text(field.to_string()),
    }
}

/// Parse `[+-]digits[<decimal>digits]`; exponents, thousands separators and `inf`/`nan` are rejected.
pub fn parse_decimal(value: &str, decimal: char) -> Option<f64> {
    let trimmed = value.trim();
    if !is_plain_number(trimmed, decimal) {
        return None;
    }
    trimmed.replacen(decimal, ".", 1).parse::<f64>().ok()
}

fn is_plain_number(value: &str, decimal: char) -> bool {
    let body = value.strip_prefix(|c| c == '-' || c == '+').unwrap_or(value);
    let mut digits = 0;
    let mut seen_separator = false;

    for ch in body.chars() {
        if ch.is_ascii_digit() {
            digits += 1;
        } else if ch == decimal && !seen_separator {
            seen_separator = true;
        } else {
            return false;
        }
    }

    digits > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_comma_decimals_inside_quotes() {
        let csv = "impacto_presupuestario_mes,credito_vigente,programa_desc\n\
                   3,\"1234567,89\",Salud\n\
                   4,\"0,5\",\"Salud, Mental\"\n";

        let table = decode_csv(csv).expect("decode");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], Cell::Int(3));
        assert_eq!(table.rows()[0][1], Cell::Float(1234567.89));
        assert_eq!(table.rows()[1][2], Cell::Text("Salud, Mental".into()));
    }

    #[test]
    fn pads_short_records() {
        let table = decode_csv("a,b,c\n1\n").expect("decode");
        assert_eq!(table.rows()[0], vec![Cell::Int(1), Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn rejects_records_wider_than_header() {
        let err = decode_csv("impacto_presupuestario_mes,a\n3,1\n3,1,999\n")
            .expect_err("extra field");
        let message = err.to_string();
        assert!(message.contains("line 3"), "unexpected: {message}");
        assert!(message.contains("3 fields"), "unexpected: {message}");
    }

    #[test]
    fn repeated_headers_keep_every_value() {
        let table = decode_csv("impacto_presupuestario_mes,a,a\n3,1,2\n").expect("decode");
        assert_eq!(table.columns(), ["impacto_presupuestario_mes", "a", "a.1"]);
        assert_eq!(table.rows()[0], vec![Cell::Int(3), Cell::Int(1), Cell::Int(2)]);
    }

    #[test]
    fn header_only_body_is_empty_table() {
        let table = decode_csv("a,b\n").expect("decode");
        assert!(table.is_empty());
        assert_eq!(table.columns(), ["a", "b"]);
    }

    #[test]
    fn classifies_fields() {
        assert_eq!(parse_cell("  "), Cell::Empty);
        assert_eq!(parse_cell("-12"), Cell::Int(-12));
        assert_eq!(parse_cell("-12,25"), Cell::Float(-12.25));
        assert_eq!(parse_cell("1.5"), Cell::Text("1.5".into()));
        assert_eq!(parse_cell("1e5"), Cell::Text("1e5".into()));
        assert_eq!(parse_cell("nan"), Cell::Text("nan".into()));
        assert_eq!(parse_cell(","), Cell::Text(",".into()));
    }

    #[test]
    fn parse_decimal_honours_separator() {
        assert_eq!(parse_decimal("10,5", ','), Some(10.5));
        assert_eq!(parse_decimal("10.5", '.'), Some(10.5));
        assert_eq!(parse_decimal("1.000,5", ','), None);
        assert_eq!(parse_decimal("", ','), None);
    }
}
