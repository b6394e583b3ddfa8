use unicode_width::UnicodeWidthStr;

use crate::format::AMOUNT_COLUMNS;
use crate::table::{Cell, Table};

const COLUMN_GAP: &str = "  ";

/// Render a table as aligned plain text. Amount and numeric cells are right-aligned.
///
/// With `limit`, only the first `limit` rows are rendered and a footer notes how many were omitted.
pub fn render_table(table: &Table, limit: Option<usize>) -> String {
    let shown = limit.unwrap_or(usize::MAX).min(table.len());
    let rows: Vec<Vec<String>> = table.rows()[..shown]
        .iter()
        .map(|row| row.iter().map(Cell::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = table
        .columns()
        .iter()
        .map(|name| UnicodeWidthStr::width(name.as_str()))
        .collect();
    for row in &rows {
        for (idx, content) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(content.as_str()));
        }
    }

    let right_aligned: Vec<bool> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            AMOUNT_COLUMNS.contains(&name.as_str())
                || table.rows()[..shown]
                    .iter()
                    .all(|row| matches!(row[idx], Cell::Int(_) | Cell::Float(_) | Cell::Empty))
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, table.columns(), &widths, &right_aligned);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths, &right_aligned);
    for row in &rows {
        push_line(&mut out, row, &widths, &right_aligned);
    }

    if shown < table.len() {
        out.push_str(&format!("... {} more rows\n", table.len() - shown));
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize], right_aligned: &[bool]) {
    let mut line = String::new();
    for (idx, content) in cells.iter().enumerate() {
        if idx > 0 {
            line.push_str(COLUMN_GAP);
        }
        let pad = " ".repeat(widths[idx].saturating_sub(UnicodeWidthStr::width(content.as_str())));
        if right_aligned[idx] {
            line.push_str(&pad);
            line.push_str(content);
        } else {
            line.push_str(content);
            line.push_str(&pad);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
