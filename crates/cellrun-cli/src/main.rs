//! cellrun CLI - compile and run C++/CUDA cells.

mod colors;
mod magic;
mod sink;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cellrun_core::{CompilerKind, Mode, Toolchain};

use magic::{CellArgs, RunArgs};

#[derive(Parser)]
#[command(name = "cellrun")]
#[command(about = "Compile and run C++/CUDA cells")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write C/C++ source or a header; sources are compiled to an object file
    Cpp {
        #[command(flatten)]
        cell: CellArgs,
    },

    /// Compile, link and run C/C++ source
    Cpurun {
        #[command(flatten)]
        cell: CellArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Write CUDA source or a header; sources are compiled to an object file
    Cuda {
        #[command(flatten)]
        cell: CellArgs,
    },

    /// Compile, link and run CUDA source
    Gpurun {
        #[command(flatten)]
        cell: CellArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Show which compilers are available
    Toolchain,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format cellrun-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<cellrun_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    let succeeded = match cli.command {
        Commands::Cpp { cell } => magic::execute(Mode::Cpp, &cell, None).map_err(format_error)?,
        Commands::Cpurun { cell, run } => {
            magic::execute(Mode::CpuRun, &cell, Some(&run)).map_err(format_error)?
        }
        Commands::Cuda { cell } => magic::execute(Mode::Cuda, &cell, None).map_err(format_error)?,
        Commands::Gpurun { cell, run } => {
            magic::execute(Mode::GpuRun, &cell, Some(&run)).map_err(format_error)?
        }
        Commands::Toolchain => show_toolchains(),
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print each compiler's location and version. Succeeds if any was found.
fn show_toolchains() -> bool {
    let color = colors::stdout_is_tty();
    let mut found_any = false;

    for kind in [CompilerKind::Gxx, CompilerKind::Nvcc] {
        let name = colors::paint(&format!("{:<5}", kind.program()), colors::BOLD, color);
        match Toolchain::detect(kind) {
            Ok(toolchain) => {
                found_any = true;
                let version = toolchain
                    .version()
                    .unwrap_or_else(|e| format!("version unknown ({e})"));
                println!(
                    "{name} {} {}",
                    colors::paint(&toolchain.program().display().to_string(), colors::DIM, color),
                    colors::paint(&version, colors::GREEN, color)
                );
            }
            Err(e) => {
                println!("{name} {}", colors::paint(&e.to_string(), colors::YELLOW, color));
            }
        }
    }

    found_any
}
