//! Common types for the build pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::mode::Launch;

use super::flags::{split_args, split_objects};

/// Configuration shared by every invocation of an [`crate::Invoker`].
///
/// Everything that varies per cell lives in
/// [`crate::execute::InvocationRequest`] instead.
#[derive(Debug, Clone)]
pub struct InvokerConfig {
    /// Directory holding the artifacts; every subprocess runs here
    pub work_dir: PathBuf,

    /// Launch style for the executable (None = the mode's default)
    pub launch: Option<Launch>,

    /// Compiler program (None = `g++`/`nvcc` from `PATH`)
    pub compiler: Option<PathBuf>,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            launch: None,
            compiler: None,
        }
    }
}

impl InvokerConfig {
    /// Config rooted at `work_dir`.
    pub fn in_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::default()
        }
    }
}

/// Compiler arguments for the compile step.
///
/// A flag list and a full command override exclude each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileArgs {
    /// Extra flags inserted before the default arguments.
    Flags(Vec<String>),

    /// Complete command replacing the default compile step verbatim.
    Override(Vec<String>),
}

impl Default for CompileArgs {
    fn default() -> Self {
        Self::Flags(Vec::new())
    }
}

/// Per-call build options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Flags or override for the compile step
    pub compile: CompileArgs,

    /// Flags for the link step (two-phase builds only)
    pub link_flags: Vec<String>,

    /// Pre-built object files linked into the executable
    pub objects: Vec<String>,
}

impl BuildOptions {
    /// Build options from the raw strings a front end collects.
    ///
    /// `flags` and `command` exclude each other; `objects` is comma-separated.
    pub fn parse(
        flags: Option<&str>,
        command: Option<&str>,
        link_flags: Option<&str>,
        objects: Option<&str>,
    ) -> Result<Self> {
        let compile = match (flags, command) {
            (Some(_), Some(_)) => {
                return Err(Error::ConflictingOptions(
                    "a compile command override cannot be combined with a flag list".to_string(),
                ));
            }
            (_, Some(command)) => CompileArgs::Override(split_args(command)?),
            (Some(flags), None) => CompileArgs::Flags(split_args(flags)?),
            (None, None) => CompileArgs::default(),
        };

        Ok(Self {
            compile,
            link_flags: link_flags.map(split_args).transpose()?.unwrap_or_default(),
            objects: objects.map(split_objects).unwrap_or_default(),
        })
    }
}

/// A fully assembled subprocess command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from an override token list, the first token being the program.
    ///
    /// Returns `None` for an empty list.
    pub fn from_tokens(tokens: &[String]) -> Option<Self> {
        let (program, args) = tokens.split_first()?;
        Some(Self {
            program: PathBuf::from(program),
            args: args.to_vec(),
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// What a build step produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Source straight to executable.
    Compile,
    /// Source to object file.
    CompileObject,
    /// Object files to executable.
    Link,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compile => "compile",
            Self::CompileObject => "compile-object",
            Self::Link => "link",
        })
    }
}

/// One subprocess of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub kind: StepKind,
    pub invocation: Invocation,
}
