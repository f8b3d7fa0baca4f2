//! Subprocess execution with combined output capture.
//!
//! Every compiler, linker and program invocation goes through a
//! [`CommandRunner`]. [`SystemRunner`] attaches stdout and stderr to one
//! pipe so the captured text keeps the interleaving the process produced.

use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::compile::Invocation;
use crate::error::{Error, Result};

/// Captured result of one subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutput {
    /// The command that was run
    pub invocation: Invocation,

    /// Exit code (None when terminated by a signal)
    pub exit_code: Option<i32>,

    /// Whether the process exited successfully
    pub success: bool,

    /// Combined stdout/stderr, decoded lossily as UTF-8
    pub text: String,
}

impl StepOutput {
    /// A successful step with the given output.
    pub fn succeeded(invocation: Invocation, text: impl Into<String>) -> Self {
        Self {
            invocation,
            exit_code: Some(0),
            success: true,
            text: text.into(),
        }
    }

    /// A failed step with the given exit code and output.
    pub fn failed(invocation: Invocation, exit_code: i32, text: impl Into<String>) -> Self {
        Self {
            invocation,
            exit_code: Some(exit_code),
            success: false,
            text: text.into(),
        }
    }
}

/// Runs a single command to completion.
///
/// Implementations block until the process exits. There is no timeout:
/// a hung compiler or program blocks the caller.
pub trait CommandRunner {
    /// Run `invocation` with `work_dir` as its current directory.
    ///
    /// A non-zero exit is reported in the returned [`StepOutput`]; only a
    /// failure to start the process or read its output is an error.
    fn run(&self, invocation: &Invocation, work_dir: &Path) -> Result<StepOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, work_dir: &Path) -> Result<StepOutput> {
        let start = Instant::now();
        // The child resolves a relative program path against its new cwd.
        let work_dir = std::path::absolute(work_dir)?;
        let program = resolve_program(&invocation.program, &work_dir);

        let (mut reader, writer) = std::io::pipe()?;

        let mut cmd = Command::new(&program);
        cmd.args(&invocation.args)
            .current_dir(&work_dir)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);

        tracing::debug!("Running {} (in {})", invocation, work_dir.display());

        let mut child = cmd.spawn().map_err(|source| Error::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        // The command still holds write ends of the pipe; EOF only arrives
        // once every writer is closed.
        drop(cmd);

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let status = child.wait()?;

        tracing::debug!(
            "{} exited with {} after {:.2}s",
            invocation.program.display(),
            status,
            start.elapsed().as_secs_f64()
        );

        Ok(StepOutput {
            invocation: invocation.clone(),
            exit_code: status.code(),
            success: status.success(),
            text: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Anchor relative paths like `./vec_add` at the working directory.
///
/// Bare program names (`g++`) are left for the `PATH` lookup.
fn resolve_program(program: &Path, work_dir: &Path) -> PathBuf {
    let has_dir = program.components().count() > 1
        || matches!(program.components().next(), Some(Component::CurDir));

    if program.is_relative() && has_dir {
        work_dir.join(program)
    } else {
        program.to_path_buf()
    }
}
