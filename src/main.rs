mod cli;

use std::io;

use clap::Parser;

use cli::{Cli, Commands};
use credito_cli::app::{controller_from_config, QueryRequest};
use credito_cli::Result;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let controller = controller_from_config(cli.config.as_deref())?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Query(args) => {
            let request = QueryRequest {
                params: args.params(),
                output_dir: args.output_dir,
                limit: args.limit,
            };
            controller.query(&request, &mut out)?;
        }
        Commands::Columns => controller.list_columns(&mut out)?,
        Commands::Load { file, limit } => controller.load(&file, limit, &mut out)?,
    }

    Ok(())
}
