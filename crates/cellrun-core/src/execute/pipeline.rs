//! The write → build → run pipeline.
//!
//! Each stage is callable on its own; [`Invoker::invoke`] chains them and
//! relays captured output. Build and run failures are ordinary outcomes
//! carried in the reports, never `Err`.

use crate::compile::{
    BuildOptions, BuildPlan, Invocation, InvokerConfig, StepKind, Toolchain, shell_quote,
};
use crate::error::Result;
use crate::highlight;
use crate::mode::{Launch, Mode};
use crate::output::{Notice, OutputSink, relay};
use crate::paths::{ArtifactPaths, WriteMode};

use super::process::{CommandRunner, StepOutput, SystemRunner};

/// Everything one cell invocation needs.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub mode: Mode,

    /// Output name (None = the mode's default name)
    pub name: Option<String>,

    /// Cell text written to the source file
    pub source: String,

    pub options: BuildOptions,

    pub write_mode: WriteMode,

    /// Highlighting style; when set the source is rendered as HTML
    pub style: Option<String>,
}

impl InvocationRequest {
    pub fn new(mode: Mode, source: impl Into<String>) -> Self {
        Self {
            mode,
            name: None,
            source: source.into(),
            options: BuildOptions::default(),
            write_mode: WriteMode::Overwrite,
            style: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// The name that will be used, falling back to the mode default.
    pub fn effective_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.mode.default_name())
    }
}

/// A validated request: paths, plan and rendered HTML, no side effects yet.
#[derive(Debug, Clone)]
pub struct PreparedInvocation {
    pub mode: Mode,
    pub paths: ArtifactPaths,
    pub plan: BuildPlan,
    pub launch: Launch,
    pub html: Option<String>,
}

/// Output of one executed build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub kind: StepKind,
    pub output: StepOutput,
}

/// Result of the build stage.
///
/// Steps run in order and stop at the first failure, so a failing step is
/// always the last record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub steps: Vec<StepRecord>,
}

impl BuildReport {
    pub fn succeeded(&self) -> bool {
        self.failed_step().is_none()
    }

    pub fn failed_step(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|record| !record.output.success)
    }
}

/// Result of a whole invocation.
#[derive(Debug, Clone)]
pub struct InvocationReport {
    pub paths: ArtifactPaths,
    pub build: BuildReport,

    /// Run step output (None when the build failed or the mode does not run)
    pub run: Option<StepOutput>,

    pub html: Option<String>,
}

impl InvocationReport {
    /// Whether every attempted stage succeeded.
    pub fn succeeded(&self) -> bool {
        self.build.succeeded() && self.run.as_ref().is_none_or(|run| run.success)
    }
}

/// Runs cell invocations against one working directory.
pub struct Invoker<R = SystemRunner> {
    config: InvokerConfig,
    runner: R,
}

impl Invoker<SystemRunner> {
    /// Invoker spawning real processes.
    pub fn new(config: InvokerConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: CommandRunner> Invoker<R> {
    pub fn with_runner(config: InvokerConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Compiler used for `mode`.
    pub fn toolchain(&self, mode: Mode) -> Toolchain {
        let toolchain = Toolchain::new(mode.compiler());
        match &self.config.compiler {
            Some(program) => toolchain.with_program(program),
            None => toolchain,
        }
    }

    /// Validate a request and plan its build without touching anything.
    pub fn prepare(&self, request: &InvocationRequest) -> Result<PreparedInvocation> {
        let mode = request.mode;
        let paths = mode.validate_name(&self.config.work_dir, request.effective_name())?;
        let plan = BuildPlan::new(mode, &self.toolchain(mode), &paths, &request.options)?;
        let html = request
            .style
            .as_deref()
            .map(|style| highlight::render_html(&request.source, style))
            .transpose()?;

        Ok(PreparedInvocation {
            mode,
            paths,
            plan,
            launch: self.config.launch.unwrap_or(mode.default_launch()),
            html,
        })
    }

    /// Stage 1: persist the cell text.
    pub fn write(&self, paths: &ArtifactPaths, source: &str, write_mode: WriteMode) -> Result<()> {
        paths.write_source(source, write_mode)
    }

    /// Stage 2: run the planned build steps, stopping at the first failure.
    pub fn build(&self, plan: &BuildPlan) -> Result<BuildReport> {
        let mut report = BuildReport::default();

        for step in plan.steps() {
            let output = self.runner.run(&step.invocation, &self.config.work_dir)?;
            let success = output.success;
            report.steps.push(StepRecord {
                kind: step.kind,
                output,
            });

            if !success {
                tracing::warn!("{} step failed: {}", step.kind, step.invocation);
                break;
            }
        }

        Ok(report)
    }

    /// Stage 3: execute the built binary.
    pub fn run(&self, paths: &ArtifactPaths, launch: Launch) -> Result<StepOutput> {
        let run_path = paths.run_path();
        let invocation = match launch {
            Launch::Direct => Invocation::new(&run_path),
            Launch::Shell => Invocation::new("sh")
                .arg("-c")
                .arg(shell_quote(&run_path.to_string_lossy())),
        };

        let output = self.runner.run(&invocation, &self.config.work_dir)?;
        if !output.success {
            tracing::warn!("{} exited with {:?}", run_path.display(), output.exit_code);
        }
        Ok(output)
    }

    /// Write, build, run and relay one cell.
    ///
    /// Returns `Err` only for validation failures (raised before anything is
    /// written) and for I/O or spawn problems.
    pub fn invoke(
        &self,
        request: &InvocationRequest,
        sink: &mut dyn OutputSink,
    ) -> Result<InvocationReport> {
        let prepared = self.prepare(request)?;
        tracing::info!(
            "{}: {} ({} build steps)",
            prepared.mode,
            prepared.paths.source_rel().display(),
            prepared.plan.steps().len()
        );

        self.write(&prepared.paths, &request.source, request.write_mode)?;

        let build = self.build(&prepared.plan)?;
        for record in &build.steps {
            if !record.output.success {
                sink.notice(match record.kind {
                    StepKind::Link => Notice::LinkFailed,
                    StepKind::Compile | StepKind::CompileObject => Notice::CompileFailed,
                });
            }
            relay(&record.output.text, sink);
        }

        let run = if build.succeeded() && prepared.mode.runs_binary() {
            let output = self.run(&prepared.paths, prepared.launch)?;
            if !output.success {
                sink.notice(Notice::RunFailed);
            }
            relay(&output.text, sink);
            Some(output)
        } else {
            None
        };

        if let Some(html) = &prepared.html {
            sink.html(html);
        }

        let report = InvocationReport {
            paths: prepared.paths,
            build,
            run,
            html: prepared.html,
        };
        tracing::info!("{}: finished, success={}", prepared.mode, report.succeeded());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;

    use super::*;
    use crate::error::Error;
    use crate::output::{BufferSink, SinkEvent};
    use tempfile::TempDir;

    /// Replays canned results and records every invocation.
    struct ScriptedRunner {
        results: RefCell<Vec<(bool, &'static str)>>,
        seen: RefCell<Vec<Invocation>>,
    }

    impl ScriptedRunner {
        fn new(results: Vec<(bool, &'static str)>) -> Self {
            Self {
                results: RefCell::new(results),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, invocation: &Invocation, _work_dir: &Path) -> Result<StepOutput> {
            self.seen.borrow_mut().push(invocation.clone());
            let (success, text) = self.results.borrow_mut().remove(0);
            Ok(if success {
                StepOutput::succeeded(invocation.clone(), text)
            } else {
                StepOutput::failed(invocation.clone(), 1, text)
            })
        }
    }

    #[test]
    fn test_link_failure_notice() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let runner = ScriptedRunner::new(vec![(true, ""), (false, "undefined reference\n")]);
        let invoker = Invoker::with_runner(config(&temp), runner);

        let request = InvocationRequest::new(Mode::CpuRun, "int main() {}").with_options(
            BuildOptions {
                objects: vec!["missing.o".into()],
                ..Default::default()
            },
        );
        let mut sink = BufferSink::new();
        let report = invoker.invoke(&request, &mut sink).unwrap();

        assert!(!report.succeeded());
        assert_eq!(report.build.failed_step().unwrap().kind, StepKind::Link);
        assert!(report.run.is_none());
        assert_eq!(
            sink.events(),
            &[
                SinkEvent::Notice(Notice::LinkFailed),
                SinkEvent::Line("undefined reference".into()),
            ]
        );
    }

    #[test]
    fn test_run_failure_is_reported_not_raised() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let runner = ScriptedRunner::new(vec![(true, ""), (false, "Segmentation fault\n")]);
        let invoker = Invoker::with_runner(config(&temp), runner);

        let mut sink = BufferSink::new();
        let report = invoker
            .invoke(&InvocationRequest::new(Mode::GpuRun, "int main() {}"), &mut sink)
            .unwrap();

        assert!(report.build.succeeded());
        assert!(!report.run.as_ref().unwrap().success);
        assert_eq!(sink.notices(), vec![Notice::RunFailed]);
        assert_eq!(sink.text(), "Segmentation fault\n");
    }

    #[test]
    fn test_gpu_run_goes_through_shell() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let runner = ScriptedRunner::new(vec![(true, ""), (true, "ok\n")]);
        let invoker = Invoker::with_runner(config(&temp), runner);

        invoker
            .invoke(&InvocationRequest::new(Mode::GpuRun, "int main() {}"), &mut BufferSink::new())
            .unwrap();

        let seen = invoker.runner().seen.borrow();
        assert_eq!(seen[1].program, Path::new("sh"));
        assert_eq!(seen[1].args, vec!["-c", "./src"]);
    }

    #[test]
    fn test_launch_override() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let runner = ScriptedRunner::new(vec![(true, ""), (true, "")]);
        let config = InvokerConfig {
            launch: Some(Launch::Direct),
            ..config(&temp)
        };
        let invoker = Invoker::with_runner(config, runner);

        invoker
            .invoke(&InvocationRequest::new(Mode::GpuRun, "int main() {}"), &mut BufferSink::new())
            .unwrap();

        let seen = invoker.runner().seen.borrow();
        assert_eq!(seen[1], Invocation::new("./src"));
    }

    #[test]
    fn test_html_emitted_even_when_build_fails() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let runner = ScriptedRunner::new(vec![(false, "error: expected ';'\n")]);
        let invoker = Invoker::with_runner(config(&temp), runner);

        let request = InvocationRequest::new(Mode::CpuRun, "int main() { return 0 }")
            .with_style("monokai");
        let mut sink = BufferSink::new();
        let report = invoker.invoke(&request, &mut sink).unwrap();

        assert!(!report.succeeded());
        assert_eq!(sink.html_documents().len(), 1);
        assert!(matches!(sink.events().last(), Some(SinkEvent::Html(_))));
    }

    #[test]
    fn test_unknown_style_fails_before_write() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let invoker =
            Invoker::with_runner(config(&temp), ScriptedRunner::new(vec![]));

        let request = InvocationRequest::new(Mode::Cpp, "int x;").with_style("neon");
        let result = invoker.invoke(&request, &mut BufferSink::new());

        assert!(matches!(result, Err(Error::UnknownStyle(_))));
        assert!(!temp.path().join("src.cpp").exists());
    }

    #[test]
    fn test_header_is_written_only() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let invoker =
            Invoker::with_runner(config(&temp), ScriptedRunner::new(vec![]));

        let request = InvocationRequest::new(Mode::Cuda, "#pragma once\n").with_name("fuzz_test.h");
        let report = invoker.invoke(&request, &mut BufferSink::new()).unwrap();

        assert!(report.succeeded());
        assert!(report.build.steps.is_empty());
        assert!(report.run.is_none());
        assert!(invoker.runner().seen.borrow().is_empty());
        assert!(temp.path().join("fuzz_test.h").exists());
    }

    fn config(temp: &TempDir) -> InvokerConfig {
        InvokerConfig::in_dir(temp.path())
    }
}
