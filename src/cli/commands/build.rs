use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::super::{
    args::BuildCommand,
    exit_status::ExitStatus,
    report::{print_build_summary_to, print_changes_to, print_eval_failures_to, print_failures_to},
};
use crate::core::{context::ProjectContext, preprocess::Processed};

/// Preprocess every source file into the output directory.
///
/// Dry-run by default: lists what would change. With `--apply` every
/// processed file is written under the output directory at its path relative
/// to the project root, changed or not, so the output tree is complete.
/// Files that failed to parse are reported and not written.
pub fn build(cmd: &BuildCommand) -> Result<ExitStatus> {
    let mut ctx = ProjectContext::new(&cmd.common)?;
    if let Some(out_dir) = &cmd.out_dir {
        ctx.config.out_dir = out_dir.to_string_lossy().to_string();
    }

    let run = ctx.process_all();
    let out_dir = ctx.out_dir();

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    if ctx.verbose {
        for processed in &run.processed {
            let path = ctx.relative_path(&processed.file_path);
            print_eval_failures_to(&path, &processed.eval_failures, &mut stderr);
        }
    }

    let changes: Vec<_> = run
        .processed
        .iter()
        .filter(|p| p.output.changed())
        .map(|p| (ctx.relative_path(&p.file_path), &p.output))
        .collect();

    if cmd.apply {
        write_outputs(&ctx, &run.processed, &out_dir)?;
    } else {
        print_changes_to(&changes, &mut stdout);
    }

    print_failures_to(&run.failures, ctx.verbose, &mut stderr);
    print_build_summary_to(
        run.processed.len(),
        changes.len(),
        &out_dir,
        cmd.apply,
        &mut stdout,
    );
    stdout.flush()?;

    Ok(ExitStatus::from_failures(run.failures.len()))
}

fn write_outputs(ctx: &ProjectContext, processed: &[Processed], out_dir: &Path) -> Result<()> {
    processed.par_iter().try_for_each(|p| {
        let target = out_dir.join(ctx.relative_path(&p.file_path));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&target, &p.output.code)
            .with_context(|| format!("Failed to write file: {}", target.display()))
    })
}
