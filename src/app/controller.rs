use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::ApiConfig;
use crate::display::render_table;
use crate::error::Result;
use crate::export::{export_table, read_xlsx};
use crate::fetch::{HttpTransport, Transport};
use crate::format::display_table;
use crate::pipeline::{Notice, Pipeline, RunReport};
use crate::query::{FilterColumn, QueryParams};

/// Everything the shell collects before triggering a run.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub params: QueryParams,
    pub output_dir: PathBuf,
    pub limit: Option<usize>,
}

/// Wires shell input to the pipeline and writes notices, the table and the export path to `out`.
pub struct AppController {
    config: ApiConfig,
}

impl AppController {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn query<W: Write>(&self, request: &QueryRequest, out: &mut W) -> Result<Option<PathBuf>> {
        let transport = HttpTransport::new(&self.config)?;
        self.query_with(transport, request, out)
    }

    /// Same as [`AppController::query`] over a caller-supplied transport.
    pub fn query_with<T: Transport, W: Write>(
        &self,
        transport: T,
        request: &QueryRequest,
        out: &mut W,
    ) -> Result<Option<PathBuf>> {
        if request.params.has_filter_value() {
            request.params.validate_ranges()?;
        }

        let pipeline = Pipeline::new(&self.config, transport);
        let report = pipeline.run(&request.params)?;
        self.present(report, request, out)
    }

    fn present<W: Write>(
        &self,
        report: RunReport,
        request: &QueryRequest,
        out: &mut W,
    ) -> Result<Option<PathBuf>> {
        for notice in report.notices() {
            match notice {
                Notice::Success { .. } => writeln!(out, "{notice}")?,
                _ => writeln!(out, "! {notice}")?,
            }
        }

        let Some(datasets) = report.into_datasets() else {
            return Ok(None);
        };

        writeln!(out)?;
        write!(out, "{}", render_table(&datasets.display, request.limit))?;

        let path = export_table(&datasets.export, &request.output_dir, &request.params)?;
        writeln!(out)?;
        writeln!(out, "Excel (valores numéricos): {}", path.display())?;
        Ok(Some(path))
    }

    pub fn list_columns<W: Write>(&self, out: &mut W) -> Result<()> {
        for column in FilterColumn::ALL {
            writeln!(out, "{column}")?;
        }
        Ok(())
    }

    /// Reopen an exported workbook and print it the way a fresh query is shown.
    pub fn load<W: Write>(&self, path: &Path, limit: Option<usize>, out: &mut W) -> Result<()> {
        let table = read_xlsx(path)?;
        writeln!(out, "Loaded {} rows from {}", table.len(), path.display())?;
        write!(out, "{}", render_table(&display_table(&table), limit))?;
        Ok(())
    }
}
