//! Execution of build steps and the built binary.
//!
//! - [`process`]: subprocess spawning with combined output capture
//! - [`pipeline`]: the write → build → run stages and the [`Invoker`]

mod pipeline;
mod process;

pub use pipeline::{
    BuildReport, InvocationReport, InvocationRequest, Invoker, PreparedInvocation, StepRecord,
};
pub use process::{CommandRunner, StepOutput, SystemRunner};
