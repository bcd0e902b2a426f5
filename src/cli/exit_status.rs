use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed, every file was processed
/// - `Failure` (1): Command completed but some files could not be parsed or read
/// - `Error` (2): Command failed due to internal error (config error, I/O, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed, every file was processed.
    Success,
    /// Command completed but some files could not be parsed or read.
    Failure,
    /// Command failed due to internal error (config error, I/O, etc.).
    Error,
}

impl ExitStatus {
    /// `Failure` when any file failed, `Success` otherwise.
    pub fn from_failures(failure_count: usize) -> Self {
        if failure_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
