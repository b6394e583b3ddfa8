use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use credito_cli::query::{FilterColumn, QueryParams, MAX_MONTH, MAX_YEAR, MIN_MONTH};

#[derive(Parser)]
#[command(name = "credito-cli")]
#[command(about = "Query budget credit execution from Presupuesto Abierto and export it to Excel")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON file overriding the builtin API settings
    #[arg(short, long, global = true, env = "CREDITO_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch records for a year/month range and export them
    Query(QueryArgs),

    /// List the columns a query can filter on
    Columns,

    /// Show a previously exported workbook with display formatting
    Load {
        /// Path to the .xlsx file
        file: PathBuf,

        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Args)]
pub struct QueryArgs {
    /// Text matched with `like` against the filter column
    #[arg(short, long, default_value = "")]
    pub value: String,

    /// Descriptive column to filter on
    #[arg(short, long, default_value_t = FilterColumn::default(), value_parser = parse_column)]
    pub column: FilterColumn,

    #[arg(long, default_value_t = MAX_YEAR)]
    pub from_year: i32,

    #[arg(long, default_value_t = MAX_YEAR)]
    pub to_year: i32,

    #[arg(long, default_value_t = MIN_MONTH)]
    pub from_month: u32,

    #[arg(long, default_value_t = MAX_MONTH)]
    pub to_month: u32,

    /// Directory the workbook is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Maximum rows printed to the terminal
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl QueryArgs {
    pub fn params(&self) -> QueryParams {
        QueryParams::new(self.column, self.value.clone())
            .years(self.from_year, self.to_year)
            .months(self.from_month, self.to_month)
    }
}

fn parse_column(value: &str) -> Result<FilterColumn, String> {
    value.parse().map_err(|err: credito_cli::AppError| err.to_string())
}
