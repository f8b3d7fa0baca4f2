//! Compiler discovery.
//!
//! Locates `g++` or `nvcc` for a mode, or accepts an explicit program.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::mode::CompilerKind;

/// The compiler program used for build steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Compiler family
    kind: CompilerKind,

    /// Program to execute (bare name or full path)
    program: PathBuf,
}

impl Toolchain {
    /// Toolchain using the bare program name, resolved by the OS at spawn time.
    pub fn new(kind: CompilerKind) -> Self {
        Self {
            kind,
            program: PathBuf::from(kind.program()),
        }
    }

    /// Locate the compiler in `PATH`.
    pub fn detect(kind: CompilerKind) -> Result<Self> {
        let program = which::which(kind.program())
            .map_err(|_| Error::Toolchain(format!("{} not found in PATH", kind.program())))?;

        tracing::debug!("Found {} at {}", kind.program(), program.display());
        Ok(Self { kind, program })
    }

    /// Use an explicit compiler program instead of the default.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn kind(&self) -> CompilerKind {
        self.kind
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// First line of `<compiler> --version`.
    pub fn version(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Toolchain(format!(
                "{} --version exited with {}",
                self.program.display(),
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }
}
