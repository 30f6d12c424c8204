//! # edheader
//!
//! Stamps source files with a per-directory copyright and summary header.

use std::process::ExitCode;

use anyhow::Result;
use edheader::cli::{Cli, run_annotate};

fn main() -> Result<ExitCode> {
  let cli = Cli::parse_args();
  run_annotate(cli.args)
}
