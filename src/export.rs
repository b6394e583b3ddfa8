use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use log::info;
use rust_xlsxwriter::{Format, Workbook};

use crate::error::{AppError, Context, Result};
use crate::query::QueryParams;
use crate::table::{Cell, Table};
use crate::utils::sanitize_file_stem;

pub const EXPORT_EXTENSION: &str = "xlsx";

/// `<sanitized value>_<year_from>_<year_to>.xlsx`
pub fn export_file_name(params: &QueryParams) -> String {
    format!(
        "{}_{}_{}.{}",
        sanitize_file_stem(&params.value),
        params.year_from,
        params.year_to,
        EXPORT_EXTENSION
    )
}

/// Write the export dataset into `dir`, replacing any earlier export for the same query.
pub fn export_table(table: &Table, dir: &Path, params: &QueryParams) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(params));
    write_xlsx(table, &path)?;
    info!("Exported {} rows to {}", table.len(), path.display());
    Ok(path)
}

/// Single-sheet workbook: header row of column names, then one row per record. No index column.
pub fn write_xlsx(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();

        for (col, name) in table.columns().iter().enumerate() {
            sheet.write_string_with_format(0, column_number(col)?, name, &header_format)?;
        }

        for (idx, row) in table.rows().iter().enumerate() {
            let row_number = u32::try_from(idx + 1)
                .map_err(|_| AppError::message("Too many rows for a single worksheet"))?;
            for (col, cell) in row.iter().enumerate() {
                let col = column_number(col)?;
                match cell {
                    Cell::Empty => {}
                    Cell::Int(value) => {
                        sheet.write_number(row_number, col, *value as f64)?;
                    }
                    Cell::Float(value) => {
                        sheet.write_number(row_number, col, *value)?;
                    }
                    Cell::Text(value) => {
                        sheet.write_string(row_number, col, value)?;
                    }
                }
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook {}", path.display()))?;
    Ok(())
}

/// Read the first sheet of a workbook back into a table, treating the first row as the header.
pub fn read_xlsx(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::message(format!("{} has no worksheets", path.display())))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };

    let columns = header
        .iter()
        .map(|cell| match cell_from_data(cell) {
            Cell::Empty => String::new(),
            other => other.to_string(),
        })
        .collect();
    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(cell_from_data).collect());
    }
    Ok(table)
}

fn column_number(idx: usize) -> Result<u16> {
    u16::try_from(idx).map_err(|_| AppError::message("Too many columns for a single worksheet"))
}

fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::Int(value) => Cell::Int(*value),
        Data::Float(value) => {
            if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                Cell::Int(*value as i64)
            } else {
                Cell::Float(*value)
            }
        }
        Data::String(value) => Cell::Text(value.clone()),
        Data::Bool(value) => Cell::Text(value.to_string()),
        Data::DateTime(value) => Cell::Text(value.to_string()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => Cell::Text(value.clone()),
        Data::Empty | Data::Error(_) => Cell::Empty,
    }
}
