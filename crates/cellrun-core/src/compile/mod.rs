//! Build side of the pipeline.
//!
//! This module provides:
//! - Toolchain discovery (`g++`, `nvcc`)
//! - Flag and object-list splitting
//! - Build planning (single-phase, two-phase, build-only, override)
//!
//! # Architecture
//!
//! ```text
//! flag string ──► split_args ──┐
//! object list ──► split_objects┼──► BuildPlan ──► [BuildStep] ──► execute
//! Toolchain ───────────────────┘
//! ```

mod flags;
mod plan;
mod toolchain;
mod types;

pub use flags::{shell_quote, split_args, split_objects};
pub use plan::BuildPlan;
pub use toolchain::Toolchain;
pub use types::{BuildOptions, BuildStep, CompileArgs, Invocation, InvokerConfig, StepKind};
