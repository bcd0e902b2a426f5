//! Report formatting and printing utilities.
//!
//! Everything here writes to a caller-supplied writer so output can be tested.
//! Separate from core logic to allow ifdef to be used as a library.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use colored::Colorize;

use crate::core::{
    context::FileFailure, eliminate::Output, eval::EvalFailure, preprocess::Processed,
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

/// Print the exclusion ranges of one file.
///
/// ```text
/// src/app.js
///    1-3   #if BROWSER
///   10-12  #else
/// ```
pub fn print_ranges_to<W: Write>(path: &Path, processed: &Processed, writer: &mut W) {
    if processed.ranges.is_empty() {
        return;
    }

    let labels: Vec<String> = processed
        .ranges
        .iter()
        .map(|range| format!("{}-{}", range.start, range.end))
        .collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);

    let _ = writeln!(writer, "{}", path.display().to_string().bold());
    for (range, label) in processed.ranges.iter().zip(&labels) {
        let directive = processed
            .directive_at(range.start)
            .map(|d| d.to_string())
            .unwrap_or_default();
        let _ = writeln!(
            writer,
            "  {:>width$}  {}",
            label.blue(),
            directive.dimmed().cyan(),
            width = width
        );
    }
}

/// Print the `check` summary line.
pub fn print_check_summary_to<W: Write>(
    file_count: usize,
    range_count: usize,
    files_with_ranges: usize,
    writer: &mut W,
) {
    let checked = format!(
        "Checked {} {}",
        file_count,
        plural(file_count, "file", "files")
    );
    let msg = if range_count == 0 {
        format!("{} - nothing to exclude", checked)
    } else {
        format!(
            "{} - {} excluded {} in {} {}",
            checked,
            range_count,
            plural(range_count, "range", "ranges"),
            files_with_ranges,
            plural(files_with_ranges, "file", "files")
        )
    };
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
}

fn describe_output(output: &Output) -> String {
    let mut parts = Vec::new();
    if output.removed_nodes > 0 {
        parts.push(format!(
            "{} {} removed",
            output.removed_nodes,
            plural(output.removed_nodes, "node", "nodes")
        ));
    }
    if output.spliced_elements > 0 {
        parts.push(format!(
            "{} {} unwrapped",
            output.spliced_elements,
            plural(output.spliced_elements, "element", "elements")
        ));
    }
    if output.stripped_comments > 0 {
        parts.push(format!(
            "{} {} stripped",
            output.stripped_comments,
            plural(output.stripped_comments, "directive", "directives")
        ));
    }
    parts.join(", ")
}

/// Print one line per file that preprocessing changes.
pub fn print_changes_to<W: Write>(changes: &[(PathBuf, &Output)], writer: &mut W) {
    let width = changes
        .iter()
        .map(|(path, _)| path.display().to_string().len())
        .max()
        .unwrap_or(0);
    for (path, output) in changes {
        let _ = writeln!(
            writer,
            "  {:<width$}  {}",
            path.display().to_string(),
            describe_output(output).dimmed(),
            width = width
        );
    }
}

/// Print the `build` summary line.
pub fn print_build_summary_to<W: Write>(
    file_count: usize,
    changed_count: usize,
    out_dir: &Path,
    applied: bool,
    writer: &mut W,
) {
    if applied {
        let msg = format!(
            "Wrote {} {} to {} ({} transformed)",
            file_count,
            plural(file_count, "file", "files"),
            out_dir.display(),
            changed_count
        );
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
    } else {
        let _ = writeln!(
            writer,
            "{} of {} {} would change. Run with {} to write them to {}",
            changed_count,
            file_count,
            plural(file_count, "file", "files"),
            "--apply".cyan(),
            out_dir.display()
        );
    }
}

/// Report files that could not be read or parsed.
///
/// Verbose mode prints every error; otherwise a single line with the count.
pub fn print_failures_to<W: Write>(failures: &[FileFailure], verbose: bool, writer: &mut W) {
    if failures.is_empty() {
        return;
    }
    if verbose {
        for failure in failures {
            let _ = writeln!(writer, "{} {}", "error:".bold().red(), failure.error);
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} {} could not be processed (use {} for details)",
            "error:".bold().red(),
            failures.len(),
            plural(failures.len(), "file", "files"),
            "-v".cyan()
        );
    }
}

/// Report conditions that failed to evaluate and were treated as false.
pub fn print_eval_failures_to<W: Write>(path: &Path, failures: &[EvalFailure], writer: &mut W) {
    for failure in failures {
        let _ = writeln!(
            writer,
            "{} {}: could not evaluate `{}`, treated as false: {}",
            "warning:".bold().yellow(),
            path.display(),
            failure.expression,
            failure.message
        );
    }
}
