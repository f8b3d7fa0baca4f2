//! Compile-and-run engine for C++ and CUDA cells.
//!
//! This crate provides:
//! - Mode definitions (`cpp`, `cpurun`, `cuda`, `gpurun`)
//! - Artifact path derivation and source writing
//! - Build planning for `g++`/`nvcc` (single-phase, two-phase, override)
//! - Subprocess execution with combined stdout/stderr capture
//! - Line-by-line output relay and syntax-highlighted HTML rendering
//!
//! A cell goes through three stages, each usable on its own:
//!
//! ```text
//! cell text ──► write (src.cu) ──► build (nvcc …) ──► run (./src) ──► OutputSink
//! ```

pub mod compile;
pub mod error;
pub mod execute;
pub mod highlight;
pub mod mode;
pub mod output;
pub mod paths;

pub use compile::{BuildOptions, BuildPlan, CompileArgs, InvokerConfig, Toolchain};
pub use error::{Error, Result};
pub use execute::{
    BuildReport, CommandRunner, InvocationReport, InvocationRequest, Invoker, StepOutput,
    SystemRunner,
};
pub use mode::{CompilerKind, Launch, Mode};
pub use output::{BufferSink, Notice, OutputSink};
pub use paths::{ArtifactPaths, WriteMode};
