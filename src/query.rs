use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{AppError, Result};

pub const MIN_YEAR: i32 = 1995;
pub const MAX_YEAR: i32 = 2025;
pub const MIN_MONTH: u32 = 1;
pub const MAX_MONTH: u32 = 12;

/// Month column used by the client-side range filter.
pub const MONTH_COLUMN: &str = "impacto_presupuestario_mes";

/// Numeric and period columns always requested alongside the descriptive ones.
pub const IMPACT_COLUMNS: &[&str] = &[
    "impacto_presupuestario_anio",
    MONTH_COLUMN,
    "credito_presupuestado",
    "credito_vigente",
    "credito_devengado",
];

/// Descriptive columns the API can be filtered on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterColumn {
    #[default]
    Programa,
    Actividad,
    Jurisdiccion,
    Entidad,
    Finalidad,
    Funcion,
    Inciso,
    Principal,
    ClasificadorEconomico,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 9] = [
        FilterColumn::Programa,
        FilterColumn::Actividad,
        FilterColumn::Jurisdiccion,
        FilterColumn::Entidad,
        FilterColumn::Finalidad,
        FilterColumn::Funcion,
        FilterColumn::Inciso,
        FilterColumn::Principal,
        FilterColumn::ClasificadorEconomico,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterColumn::Programa => "programa_desc",
            FilterColumn::Actividad => "actividad_desc",
            FilterColumn::Jurisdiccion => "jurisdiccion_desc",
            FilterColumn::Entidad => "entidad_desc",
            FilterColumn::Finalidad => "finalidad_desc",
            FilterColumn::Funcion => "funcion_desc",
            FilterColumn::Inciso => "inciso_desc",
            FilterColumn::Principal => "principal_desc",
            FilterColumn::ClasificadorEconomico => "clasificador_economico_8_digitos_desc",
        }
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterColumn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        FilterColumn::ALL
            .into_iter()
            .find(|column| column.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                AppError::message(format!(
                    "Unknown filter column `{wanted}`. Expected one of: {}",
                    FilterColumn::ALL.map(FilterColumn::as_str).join(", ")
                ))
            })
    }
}

/// Every column requested from the API: impact columns first, then the descriptive ones.
pub fn requested_columns() -> Vec<&'static str> {
    IMPACT_COLUMNS
        .iter()
        .copied()
        .chain(FilterColumn::ALL.map(FilterColumn::as_str))
        .collect()
}

/// Inputs for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub column: FilterColumn,
    pub value: String,
    pub year_from: i32,
    pub year_to: i32,
    pub month_from: u32,
    pub month_to: u32,
}

impl QueryParams {
    pub fn new(column: FilterColumn, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
            year_from: MAX_YEAR,
            year_to: MAX_YEAR,
            month_from: MIN_MONTH,
            month_to: MAX_MONTH,
        }
    }

    pub fn years(mut self, from: i32, to: i32) -> Self {
        self.year_from = from;
        self.year_to = to;
        self
    }

    pub fn months(mut self, from: u32, to: u32) -> Self {
        self.month_from = from;
        self.month_to = to;
        self
    }

    pub fn year_range(&self) -> RangeInclusive<i32> {
        self.year_from..=self.year_to
    }

    pub fn month_range(&self) -> RangeInclusive<u32> {
        self.month_from..=self.month_to
    }

    pub fn has_filter_value(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Range checks normally guaranteed by the input widgets; the shell runs them before the pipeline.
    pub fn validate_ranges(&self) -> Result<()> {
        let mut issues = Vec::new();

        for (label, year) in [("year_from", self.year_from), ("year_to", self.year_to)] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                issues.push(format!("{label} {year} outside {MIN_YEAR}..={MAX_YEAR}"));
            }
        }
        for (label, month) in [("month_from", self.month_from), ("month_to", self.month_to)] {
            if !(MIN_MONTH..=MAX_MONTH).contains(&month) {
                issues.push(format!(
                    "{label} {month} outside {MIN_MONTH}..={MAX_MONTH}"
                ));
            }
        }
        if self.year_from > self.year_to {
            issues.push(format!(
                "year range is inverted ({} > {})",
                self.year_from, self.year_to
            ));
        }
        if self.month_from > self.month_to {
            issues.push(format!(
                "month range is inverted ({} > {})",
                self.month_from, self.month_to
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(AppError::message(format!(
                "Invalid query: {}",
                issues.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_column_names_case_insensitively() {
        let column: FilterColumn = "Programa_Desc".parse().expect("known column");
        assert_eq!(column, FilterColumn::Programa);

        let column: FilterColumn = "clasificador_economico_8_digitos_desc"
            .parse()
            .expect("known column");
        assert_eq!(column, FilterColumn::ClasificadorEconomico);
    }

    #[test]
    fn rejects_unknown_column() {
        let err = "monto".parse::<FilterColumn>().expect_err("unknown column");
        assert!(err.to_string().contains("programa_desc"));
    }

    #[test]
    fn requested_columns_lists_impact_then_descriptive() {
        let columns = requested_columns();
        assert_eq!(columns.len(), 14);
        assert_eq!(columns[0], "impacto_presupuestario_anio");
        assert_eq!(columns[4], "credito_devengado");
        assert_eq!(columns[5], "programa_desc");
        assert_eq!(columns[13], "clasificador_economico_8_digitos_desc");
    }

    #[test]
    fn whitespace_value_is_not_a_filter() {
        assert!(!QueryParams::new(FilterColumn::Programa, "  \t").has_filter_value());
        assert!(QueryParams::new(FilterColumn::Programa, " Salud ").has_filter_value());
    }

    #[test]
    fn validate_ranges_collects_every_issue() {
        let params = QueryParams::new(FilterColumn::Programa, "Salud")
            .years(2030, 1990)
            .months(0, 13);

        let message = params.validate_ranges().expect_err("invalid").to_string();
        assert!(message.contains("year_from 2030"));
        assert!(message.contains("year_to 1990"));
        assert!(message.contains("month_from 0"));
        assert!(message.contains("month_to 13"));
        assert!(message.contains("year range is inverted"));
    }

    #[test]
    fn default_ranges_are_valid() {
        QueryParams::new(FilterColumn::Inciso, "Gastos")
            .validate_ranges()
            .expect("defaults are valid");
    }
}
