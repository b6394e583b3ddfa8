use crate::fetch::decode::parse_decimal;
use crate::table::{Cell, Table};

/// Budget amount columns rendered with local number formatting on screen.
pub const AMOUNT_COLUMNS: &[&str] = &[
    "credito_presupuestado",
    "credito_vigente",
    "credito_devengado",
];

const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Coerce a cell to a number; anything unparseable becomes `None` instead of an error.
pub fn coerce_numeric(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Empty => None,
        Cell::Int(_) | Cell::Float(_) => cell.as_f64(),
        Cell::Text(text) => parse_decimal(text, ',').or_else(|| parse_decimal(text, '.')),
    }?;
    value.is_finite().then_some(value)
}

/// Render `value` with two decimals, `.` grouping thousands and `,` as decimal mark.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if value.is_sign_negative() {
        out.push('-');
    }
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(digit);
    }
    out.push(DECIMAL_SEPARATOR);
    out.push_str(fraction);
    out
}

/// Formatted text for a cell; non-numeric values render as the empty string.
pub fn format_cell(cell: &Cell) -> String {
    coerce_numeric(cell).map(format_amount).unwrap_or_default()
}

/// Derive the on-screen copy: amount columns become formatted text, everything else is untouched.
pub fn display_table(source: &Table) -> Table {
    let mut display = source.clone();
    for column in AMOUNT_COLUMNS {
        display.map_column(column, |cell| Cell::Text(format_cell(cell)));
    }
    display
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_local_separators() {
        assert_eq!(format_amount(1234567.89), "1.234.567,89");
        assert_eq!(format_amount(0.0), "0,00");
        assert_eq!(format_amount(999.999), "1.000,00");
        assert_eq!(format_amount(100.0), "100,00");
        assert_eq!(format_amount(-1234.5), "-1.234,50");
    }

    #[test]
    fn unparseable_cells_render_empty() {
        assert_eq!(format_cell(&Cell::Text("n/d".into())), "");
        assert_eq!(format_cell(&Cell::Empty), "");
        assert_eq!(format_cell(&Cell::Float(f64::NAN)), "");
    }

    #[test]
    fn coerces_text_numbers_with_either_decimal_mark() {
        assert_eq!(coerce_numeric(&Cell::Text("12,5".into())), Some(12.5));
        assert_eq!(coerce_numeric(&Cell::Text("12.5".into())), Some(12.5));
        assert_eq!(coerce_numeric(&Cell::Int(7)), Some(7.0));
    }

    #[test]
    fn display_table_only_touches_amount_columns() {
        let mut source = Table::new(vec![
            "impacto_presupuestario_mes".to_string(),
            "credito_vigente".to_string(),
            "programa_desc".to_string(),
        ]);
        source.push_row(vec![
            Cell::Int(3),
            Cell::Float(1234567.89),
            Cell::Text("Salud".into()),
        ]);
        source.push_row(vec![Cell::Int(4), Cell::Text("x".into()), Cell::Empty]);

        let display = display_table(&source);

        assert_eq!(display.rows()[0][0], Cell::Int(3));
        assert_eq!(display.rows()[0][1], Cell::Text("1.234.567,89".into()));
        assert_eq!(display.rows()[1][1], Cell::Text(String::new()));
        assert_eq!(source.rows()[0][1], Cell::Float(1234567.89));
    }
}
