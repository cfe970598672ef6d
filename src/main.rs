use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod config;
mod error;
mod join;
mod logger;
mod metrics_api;
mod model;
mod normalize;
mod render;
mod report;
mod util;

use crate::cli::Cli;
use crate::error::ReportError;

fn main() -> ExitCode {
  let cli = Cli::parse();

  if cli.gen_man {
    return match util::render_man_page::<Cli>() {
      Ok(page) => {
        print!("{}", page);
        ExitCode::SUCCESS
      }
      Err(e) => {
        println!("{:#}", e);
        ExitCode::FAILURE
      }
    };
  }

  logger::setup(&cli.log_level);

  // Errors go to stdout alongside where the report would have gone.
  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      if let Some(body) = e.downcast_ref::<ReportError>().and_then(ReportError::response_body) {
        tracing::debug!(body, "raw backend response");
      }
      println!("{:#}", e);
      ExitCode::FAILURE
    }
  }
}

fn run(args: Cli) -> Result<()> {
  // Phase 1: normalize CLI
  let cfg = cli::normalize(args)?;

  // Phase 2: query, normalize, join
  let report = report::build_report(&cfg.report)?;

  // Phase 3: render and write
  let rendered = render::render_report(&report, cfg.format)?;
  util::write_output(&cfg.out, &rendered).with_context(|| format!("writing report to {}", cfg.out))
}
