use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::{
    args::PrintCommand, exit_status::ExitStatus, report::print_eval_failures_to,
};
use crate::core::context::ProjectContext;

/// Preprocess one file and write the result to stdout.
pub fn print(cmd: &PrintCommand) -> Result<ExitStatus> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let file_path = cmd
        .file
        .to_str()
        .with_context(|| format!("Invalid path: {:?}", cmd.file))?;

    let processed = match ctx.process_file(file_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{} {:#}", "error:".bold().red(), e);
            return Ok(ExitStatus::Failure);
        }
    };

    if ctx.verbose {
        print_eval_failures_to(&cmd.file, &processed.eval_failures, &mut io::stderr().lock());
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(processed.output.code.as_bytes())?;
    stdout.flush()?;

    Ok(ExitStatus::Success)
}
