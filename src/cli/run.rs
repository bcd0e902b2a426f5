use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{build::build, check::check, init::init, print::print},
    exit_status::ExitStatus,
};

/// Dispatch to the command handler.
///
/// `serve` is handled by `main` before this is called, since it owns the
/// process until stdin closes.
pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(Arguments { command }) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match command {
        Some(Command::Check(cmd)) => check(&cmd),
        Some(Command::Build(cmd)) => build(&cmd),
        Some(Command::Print(cmd)) => print(&cmd),
        Some(Command::Init) => init(),
        Some(Command::Serve) => bail!("Serve command should be handled before run_cli()"),
        None => Ok(ExitStatus::Success),
    }
}
