//! Error types for cellrun-core.
//!
//! Only validation, I/O and spawn problems are errors. A compiler or a
//! program exiting non-zero is an ordinary outcome and is reported through
//! [`crate::execute::InvocationReport`] instead.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for cellrun-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellrun-core.
#[derive(Debug, Error)]
pub enum Error {
    /// Output name does not carry an extension allowed for the mode.
    #[error("invalid name {name:?}: name must end with {}", format_extensions(.allowed))]
    InvalidName {
        name: String,
        allowed: &'static [&'static str],
    },

    /// Unknown highlighting style.
    #[error("unknown style {0:?}")]
    UnknownStyle(String),

    /// Flag or command string could not be split into arguments.
    #[error("cannot split arguments: {0}")]
    Tokenize(String),

    /// Options that exclude each other were both supplied.
    #[error("conflicting options: {0}")]
    ConflictingOptions(String),

    /// Compiler could not be located.
    #[error("toolchain error: {0}")]
    Toolchain(String),

    /// A subprocess could not be started.
    #[error("failed to start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Render the error together with a short recovery hint, if one applies.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Self::InvalidName { .. } => Some("pass --name with one of the listed extensions"),
            Self::UnknownStyle(_) => Some("available styles: default, monokai, solarized-dark"),
            Self::Tokenize(_) => Some("check that every quote in the flag string is closed"),
            Self::ConflictingOptions(_) => {
                Some("use either --flags or --command, the override replaces the flag list")
            }
            Self::Toolchain(_) | Self::Spawn { .. } => {
                Some("install the compiler or point --compiler at it")
            }
            Self::Io(_) => None,
        };

        match hint {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}

fn format_extensions(allowed: &[&str]) -> String {
    allowed
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(" or ")
}
