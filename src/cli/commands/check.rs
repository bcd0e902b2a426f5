use std::io::{self, Write};

use anyhow::Result;

use super::super::{
    args::CheckCommand,
    exit_status::ExitStatus,
    report::{print_check_summary_to, print_eval_failures_to, print_failures_to, print_ranges_to},
};
use crate::core::context::ProjectContext;

/// Report the exclusion ranges of every source file. Nothing is written.
pub fn check(cmd: &CheckCommand) -> Result<ExitStatus> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let run = ctx.process_all();

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    let mut range_count = 0;
    let mut files_with_ranges = 0;
    for processed in &run.processed {
        let path = ctx.relative_path(&processed.file_path);
        if ctx.verbose {
            print_eval_failures_to(&path, &processed.eval_failures, &mut stderr);
        }
        if !processed.ranges.is_empty() {
            range_count += processed.ranges.len();
            files_with_ranges += 1;
            print_ranges_to(&path, processed, &mut stdout);
        }
    }

    print_failures_to(&run.failures, ctx.verbose, &mut stderr);
    print_check_summary_to(run.file_count(), range_count, files_with_ranges, &mut stdout);
    stdout.flush()?;

    Ok(ExitStatus::from_failures(run.failures.len()))
}
