//! Year-by-year fetch, month filtering and formatting of budget credit records.
//!
//! A run issues one request per year in ascending order, pausing for the configured
//! delay after each. A failing year is recorded and the loop moves on; nothing short
//! of a configuration problem aborts the run.

use std::fmt;
use std::ops::RangeInclusive;
use std::thread;

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::fetch::request::prepare_request;
use crate::fetch::{build_payload, decode_csv, prepare_headers, Transport};
use crate::format::display_table;
use crate::query::{QueryParams, MONTH_COLUMN};
use crate::table::Table;

/// Failure scoped to a single year; the run continues past it.
#[derive(Debug, Error)]
pub enum YearError {
    #[error("Año {year}: status code {status}")]
    Status { year: i32, status: u16 },
    #[error("Error al consultar año {year}: {message}")]
    Request { year: i32, message: String },
}

impl YearError {
    fn request(year: i32, err: impl fmt::Display) -> Self {
        YearError::Request {
            year,
            message: err.to_string(),
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            YearError::Status { year, .. } | YearError::Request { year, .. } => *year,
        }
    }
}

/// What one year contributed: rows, nothing, or a failure.
#[derive(Debug)]
pub struct YearOutcome {
    pub year: i32,
    pub result: std::result::Result<Option<Table>, YearError>,
}

impl YearOutcome {
    pub fn rows(&self) -> usize {
        match &self.result {
            Ok(Some(table)) => table.len(),
            _ => 0,
        }
    }
}

/// The two views of the accumulated records.
#[derive(Debug, Clone)]
pub struct Datasets {
    /// Amount columns rendered as `1.234.567,89` text.
    pub display: Table,
    /// Amount columns kept numeric, for the spreadsheet.
    pub export: Table,
}

impl Datasets {
    pub fn row_count(&self) -> usize {
        self.export.len()
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// The filter value was blank; no request was issued.
    MissingInput,
    /// Every year came back empty or failed.
    NoData,
    Data(Datasets),
}

/// User-facing messages produced by a run, in the order they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    MissingInput,
    YearFailed { year: i32, message: String },
    NoData,
    Success { rows: usize },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MissingInput => f.write_str("Por favor ingresá un valor para buscar."),
            Notice::YearFailed { message, .. } => f.write_str(message),
            Notice::NoData => f.write_str("No se obtuvieron datos para los filtros indicados."),
            Notice::Success { rows } => write!(f, "Total filas obtenidas: {rows}"),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub years: Vec<YearOutcome>,
    pub outcome: Outcome,
}

impl RunReport {
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices: Vec<Notice> = self
            .years
            .iter()
            .filter_map(|year| year.result.as_ref().err())
            .map(|err| Notice::YearFailed {
                year: err.year(),
                message: err.to_string(),
            })
            .collect();

        notices.push(match &self.outcome {
            Outcome::MissingInput => Notice::MissingInput,
            Outcome::NoData => Notice::NoData,
            Outcome::Data(datasets) => Notice::Success {
                rows: datasets.row_count(),
            },
        });
        notices
    }

    pub fn datasets(&self) -> Option<&Datasets> {
        match &self.outcome {
            Outcome::Data(datasets) => Some(datasets),
            _ => None,
        }
    }

    pub fn into_datasets(self) -> Option<Datasets> {
        match self.outcome {
            Outcome::Data(datasets) => Some(datasets),
            _ => None,
        }
    }
}

/// Sequential fetch/filter/format over one injected transport.
pub struct Pipeline<'a, T: Transport> {
    config: &'a ApiConfig,
    transport: T,
}

impl<'a, T: Transport> Pipeline<'a, T> {
    pub fn new(config: &'a ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Run the query over every year in range.
    ///
    /// Only configuration problems (e.g. an unset token variable) are returned as `Err`;
    /// they are detected before the first request.
    pub fn run(&self, params: &QueryParams) -> Result<RunReport> {
        if !params.has_filter_value() {
            warn!("Filter value is blank; skipping all requests");
            return Ok(RunReport {
                years: Vec::new(),
                outcome: Outcome::MissingInput,
            });
        }

        let headers = prepare_headers(self.config)?;
        info!(
            "Querying {} like {:?} for years {}..={} months {}..={}",
            params.column,
            params.value,
            params.year_from,
            params.year_to,
            params.month_from,
            params.month_to
        );

        let mut years = Vec::new();
        for year in params.year_range() {
            let result = self.fetch_year(params, &headers, year);
            match &result {
                Ok(Some(table)) => info!("Year {year}: kept {} rows", table.len()),
                Ok(None) => debug!("Year {year}: no rows"),
                Err(err) => warn!("{err}"),
            }
            years.push(YearOutcome { year, result });
            thread::sleep(self.config.request_delay);
        }

        let tables: Vec<&Table> = years
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().and_then(Option::as_ref))
            .collect();

        let outcome = if tables.is_empty() {
            info!("No rows matched the query");
            Outcome::NoData
        } else {
            let export = Table::concat(tables);
            let display = display_table(&export);
            info!("Accumulated {} rows", export.len());
            Outcome::Data(Datasets { display, export })
        };

        Ok(RunReport { years, outcome })
    }

    fn fetch_year(
        &self,
        params: &QueryParams,
        headers: &reqwest::header::HeaderMap,
        year: i32,
    ) -> std::result::Result<Option<Table>, YearError> {
        let payload = build_payload(self.config, params, year);
        let request =
            prepare_request(self.config, headers, &payload).map_err(|e| YearError::request(year, e))?;

        let response = self
            .transport
            .post(&request)
            .map_err(|e| YearError::request(year, e))?;
        if !response.is_ok() {
            return Err(YearError::Status {
                year,
                status: response.status,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(None);
        }

        let table = decode_csv(&response.body).map_err(|e| YearError::request(year, e))?;
        if table.is_empty() {
            return Ok(None);
        }

        let filtered =
            filter_months(table, params.month_range()).map_err(|e| YearError::request(year, e))?;
        Ok((!filtered.is_empty()).then_some(filtered))
    }
}

/// Keep rows whose month lies in `months`, bounds included. Rows without a numeric month are dropped.
pub fn filter_months(mut table: Table, months: RangeInclusive<u32>) -> Result<Table> {
    let idx = table.column_index(MONTH_COLUMN).ok_or_else(|| {
        AppError::message(format!("response has no `{MONTH_COLUMN}` column"))
    })?;

    let lower = f64::from(*months.start());
    let upper = f64::from(*months.end());
    table.retain_rows(|row| {
        row[idx]
            .as_f64()
            .map(|month| (lower..=upper).contains(&month))
            .unwrap_or(false)
    });
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn months_table(months: &[i64]) -> Table {
        let mut table = Table::new(vec![MONTH_COLUMN.to_string()]);
        for month in months {
            table.push_row(vec![Cell::Int(*month)]);
        }
        table
    }

    #[test]
    fn month_filter_includes_both_bounds() {
        let filtered = filter_months(months_table(&[2, 3, 4, 5, 6, 7]), 3..=6).expect("filter");
        let kept: Vec<f64> = filtered
            .column(MONTH_COLUMN)
            .expect("month column")
            .filter_map(Cell::as_f64)
            .collect();
        assert_eq!(kept, vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn month_filter_drops_missing_months() {
        let mut table = months_table(&[1]);
        table.push_row(vec![Cell::Empty]);
        table.push_row(vec![Cell::Text("marzo".into())]);

        assert_eq!(filter_months(table, 1..=12).expect("filter").len(), 1);
    }

    #[test]
    fn month_filter_requires_month_column() {
        let table = Table::new(vec!["credito_vigente".to_string()]);
        let err = filter_months(table, 1..=12).expect_err("missing column");
        assert!(err.to_string().contains(MONTH_COLUMN));
    }

    #[test]
    fn notices_list_year_failures_before_terminal_notice() {
        let report = RunReport {
            years: vec![
                YearOutcome {
                    year: 2020,
                    result: Err(YearError::Status {
                        year: 2020,
                        status: 500,
                    }),
                },
                YearOutcome {
                    year: 2021,
                    result: Ok(None),
                },
            ],
            outcome: Outcome::NoData,
        };

        assert_eq!(
            report.notices(),
            vec![
                Notice::YearFailed {
                    year: 2020,
                    message: "Año 2020: status code 500".to_string(),
                },
                Notice::NoData,
            ]
        );
    }
}
