//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Show which line ranges each file would lose
//! - `build`: Write the preprocessed tree to the output directory
//! - `print`: Preprocess a single file to stdout
//! - `init`: Initialize the configuration file
//! - `serve`: Start MCP server for AI integration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Build(cmd)) => cmd.common.verbose,
            Some(Command::Print(cmd)) => cmd.common.verbose,
            Some(Command::Init) | Some(Command::Serve) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Define a symbol: NAME=VALUE (VALUE is JSON, else a string) or NAME (true)
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
    pub define: Vec<String>,

    /// Enable a custom directive
    #[arg(long, value_name = "NAME")]
    pub enable: Vec<String>,

    /// Disable a custom directive (removes the line after it)
    #[arg(long, value_name = "NAME")]
    pub disable: Vec<String>,

    /// Project root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually write files (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Output directory (overrides config file)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PrintCommand {
    /// File to preprocess
    pub file: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report the line ranges every file would lose
    Check(CheckCommand),
    /// Preprocess all source files into the output directory
    Build(BuildCommand),
    /// Preprocess one file and print the result
    Print(PrintCommand),
    /// Initialize a new .ifdefrc.json configuration file
    Init,
    /// Start MCP server for AI coding agents
    Serve,
}
