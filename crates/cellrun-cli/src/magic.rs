//! Cell magic commands: `cpp`, `cpurun`, `cuda` and `gpurun`.
//!
//! The cell text comes from `--input` or stdin; everything else maps onto
//! an [`InvocationRequest`].

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use cellrun_core::{
    BuildOptions, InvocationRequest, Invoker, InvokerConfig, Launch, Mode, WriteMode,
};

use crate::sink::TerminalSink;

/// Options shared by every cell magic.
#[derive(Args, Debug, Clone)]
pub struct CellArgs {
    /// File name that will be produced by the cell
    #[arg(short, long)]
    pub name: Option<String>,

    /// Compiler flags, split like a shell would
    #[arg(short, long, allow_hyphen_values = true)]
    pub flags: Option<String>,

    /// Complete compile command replacing the default one
    #[arg(short = 'c', long, conflicts_with = "flags", allow_hyphen_values = true)]
    pub command: Option<String>,

    /// Append to the file instead of overwriting it
    #[arg(short, long)]
    pub append: bool,

    /// Render the source as highlighted HTML in this style
    #[arg(short, long)]
    pub style: Option<String>,

    /// Compiler program (default: g++ or nvcc from PATH)
    #[arg(long)]
    pub compiler: Option<PathBuf>,

    /// Read the cell from this file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write highlighted HTML here instead of stdout
    #[arg(long)]
    pub html_out: Option<PathBuf>,

    /// Directory for the source, object and executable files
    #[arg(short = 'C', long, default_value = ".")]
    pub workdir: PathBuf,
}

/// Options only meaningful when the binary is run.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Comma-separated list of object files to link
    #[arg(short, long)]
    pub objects: Option<String>,

    /// Flags for the link step (used with --objects)
    #[arg(long, allow_hyphen_values = true)]
    pub link_flags: Option<String>,

    /// How to start the executable (default: direct for cpurun, shell for gpurun)
    #[arg(long, value_enum)]
    pub launch: Option<LaunchArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LaunchArg {
    /// Spawn ./<name> directly
    Direct,
    /// Spawn sh -c ./<name>
    Shell,
}

impl From<LaunchArg> for Launch {
    fn from(arg: LaunchArg) -> Self {
        match arg {
            LaunchArg::Direct => Launch::Direct,
            LaunchArg::Shell => Launch::Shell,
        }
    }
}

/// Run one cell. Returns whether every attempted stage succeeded.
pub fn execute(mode: Mode, cell: &CellArgs, run: Option<&RunArgs>) -> anyhow::Result<bool> {
    let options = BuildOptions::parse(
        cell.flags.as_deref(),
        cell.command.as_deref(),
        run.and_then(|run| run.link_flags.as_deref()),
        run.and_then(|run| run.objects.as_deref()),
    )?;

    let source = read_source(cell.input.as_deref())?;

    let config = InvokerConfig {
        work_dir: cell.workdir.clone(),
        launch: run.and_then(|run| run.launch).map(Launch::from),
        compiler: cell.compiler.clone(),
    };

    let mut request = InvocationRequest::new(mode, source)
        .with_options(options)
        .with_write_mode(if cell.append {
            WriteMode::Append
        } else {
            WriteMode::Overwrite
        });
    if let Some(name) = &cell.name {
        request = request.with_name(name);
    }
    if let Some(style) = &cell.style {
        request = request.with_style(style);
    }

    let mut sink = TerminalSink::new(cell.html_out.clone());
    let report = Invoker::new(config).invoke(&request, &mut sink)?;
    sink.finish()?;

    tracing::debug!(
        "{} finished: build ok={}, ran={}",
        mode,
        report.build.succeeded(),
        report.run.is_some()
    );

    Ok(report.succeeded())
}

fn read_source(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e)),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}
