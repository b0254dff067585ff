use clap::{Args, Subcommand};
use std::path::PathBuf;

use eolchan_translate::TranslationMode;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod convert;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite line terminators between conventions.
    Convert(ConvertArgs),
    /// Count line terminators and report the dominant convention.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Convert(args) => convert::run(args),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input file, or "-" for stdin.
    pub input: PathBuf,
    /// Output file. Default: stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Translation applied while reading (binary, lf, cr, crlf, platform,
    /// auto, protocol, environment).
    #[arg(long, value_name = "MODE", default_value = "auto")]
    pub in_mode: TranslationMode,
    /// Translation applied while writing.
    #[arg(long, value_name = "MODE", default_value = "environment")]
    pub out_mode: TranslationMode,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// File to inspect, or "-" for stdin.
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Print extended build information.
    #[arg(long)]
    pub extended: bool,
}
