//! Build planning.
//!
//! Turns a mode, toolchain, artifact paths and build options into the exact
//! ordered list of compiler/linker command lines. Planning is pure; nothing
//! is executed here.
//!
//! ```text
//! single-phase   g++ <flags> -o src src.cpp
//! two-phase      g++ <flags> -c src.cpp -o src.o
//!                g++ <link-flags> -o src src.o a.o b.o
//! build-only     g++ <flags> -c src.cpp -o src.o     (headers: nothing)
//! ```

use crate::error::{Error, Result};
use crate::mode::Mode;
use crate::paths::ArtifactPaths;

use super::toolchain::Toolchain;
use super::types::{BuildOptions, BuildStep, CompileArgs, Invocation, StepKind};

/// Ordered build steps for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    steps: Vec<BuildStep>,
}

impl BuildPlan {
    /// Plan the build for a validated set of artifact paths.
    pub fn new(
        mode: Mode,
        toolchain: &Toolchain,
        paths: &ArtifactPaths,
        options: &BuildOptions,
    ) -> Result<Self> {
        if !mode.runs_binary() && !options.objects.is_empty() {
            return Err(Error::ConflictingOptions(format!(
                "{mode} only writes and compiles, object files can only be linked by a run mode"
            )));
        }

        let mut steps = Vec::new();

        if !mode.runs_binary() {
            if Mode::is_header(paths.source_rel()) {
                tracing::debug!("{} is a header, nothing to compile", paths.source_rel().display());
            } else {
                steps.push(compile_object_step(toolchain, paths, &options.compile)?);
            }
        } else if options.objects.is_empty() {
            if !options.link_flags.is_empty() {
                tracing::warn!("Link flags ignored: no object files to link");
            }
            let invocation = match &options.compile {
                CompileArgs::Flags(flags) => Invocation::new(toolchain.program())
                    .args(flags.iter().cloned())
                    .arg("-o")
                    .path_arg(paths.executable_rel())
                    .path_arg(paths.source_rel()),
                CompileArgs::Override(tokens) => override_invocation(tokens)?,
            };
            steps.push(BuildStep {
                kind: StepKind::Compile,
                invocation,
            });
        } else {
            steps.push(compile_object_step(toolchain, paths, &options.compile)?);
            steps.push(BuildStep {
                kind: StepKind::Link,
                invocation: Invocation::new(toolchain.program())
                    .args(options.link_flags.iter().cloned())
                    .arg("-o")
                    .path_arg(paths.executable_rel())
                    .path_arg(paths.object_rel())
                    .args(options.objects.iter().cloned()),
            });
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the plan links pre-built objects in a separate step.
    pub fn is_two_phase(&self) -> bool {
        self.steps.iter().any(|step| step.kind == StepKind::Link)
    }
}

fn compile_object_step(
    toolchain: &Toolchain,
    paths: &ArtifactPaths,
    compile: &CompileArgs,
) -> Result<BuildStep> {
    let invocation = match compile {
        CompileArgs::Flags(flags) => Invocation::new(toolchain.program())
            .args(flags.iter().cloned())
            .arg("-c")
            .path_arg(paths.source_rel())
            .arg("-o")
            .path_arg(paths.object_rel()),
        CompileArgs::Override(tokens) => override_invocation(tokens)?,
    };

    Ok(BuildStep {
        kind: StepKind::CompileObject,
        invocation,
    })
}

fn override_invocation(tokens: &[String]) -> Result<Invocation> {
    Invocation::from_tokens(tokens)
        .ok_or_else(|| Error::Tokenize("compile command override is empty".to_string()))
}
