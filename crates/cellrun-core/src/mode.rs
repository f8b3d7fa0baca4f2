//! Cell modes.
//!
//! Each mode fixes the accepted file extensions, the default file name,
//! the compiler family and whether the produced binary is executed.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::paths::ArtifactPaths;

/// Compiler family used by a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerKind {
    /// GNU C++ compiler (`g++`).
    Gxx,
    /// NVIDIA CUDA compiler driver (`nvcc`).
    Nvcc,
}

impl CompilerKind {
    /// Program name looked up in `PATH`.
    pub fn program(self) -> &'static str {
        match self {
            Self::Gxx => "g++",
            Self::Nvcc => "nvcc",
        }
    }
}

/// How the produced executable is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// Spawn `./<exe>` as a direct child process.
    Direct,
    /// Spawn `sh -c ./<exe>`.
    Shell,
}

/// A cell magic variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write (and compile to an object) C/C++ source or headers.
    Cpp,
    /// Compile, link and run C/C++ source.
    CpuRun,
    /// Write (and compile to an object) CUDA source or headers.
    Cuda,
    /// Compile, link and run CUDA source.
    GpuRun,
}

impl Mode {
    /// Extensions accepted for the output name, without the leading dot.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Cpp => &["cpp", "c", "hpp", "h"],
            Self::CpuRun => &["cpp", "c"],
            Self::Cuda | Self::GpuRun => &["cu", "h"],
        }
    }

    /// File name used when the caller does not supply one.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Cpp | Self::CpuRun => "src.cpp",
            Self::Cuda | Self::GpuRun => "src.cu",
        }
    }

    pub fn compiler(self) -> CompilerKind {
        match self {
            Self::Cpp | Self::CpuRun => CompilerKind::Gxx,
            Self::Cuda | Self::GpuRun => CompilerKind::Nvcc,
        }
    }

    /// Whether the mode executes the binary after building it.
    pub fn runs_binary(self) -> bool {
        matches!(self, Self::CpuRun | Self::GpuRun)
    }

    /// Launch style used when the caller does not pick one.
    ///
    /// The GPU runner has always gone through a shell; the CPU runner
    /// spawns the binary directly.
    pub fn default_launch(self) -> Launch {
        match self {
            Self::GpuRun => Launch::Shell,
            _ => Launch::Direct,
        }
    }

    /// Check `name` against the allowed extensions and derive artifact paths.
    ///
    /// Nothing is touched on disk; an invalid name fails before any side effect.
    pub fn validate_name(self, work_dir: &Path, name: &str) -> Result<ArtifactPaths> {
        let ext = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        if !self.extensions().contains(&ext) {
            return Err(Error::InvalidName {
                name: name.to_string(),
                allowed: self.extensions(),
            });
        }

        Ok(ArtifactPaths::new(work_dir, name))
    }

    /// Whether a validated name is a header (written only, never compiled).
    pub fn is_header(name: &Path) -> bool {
        matches!(
            name.extension().and_then(|ext| ext.to_str()),
            Some("h" | "hpp")
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cpp => "cpp",
            Self::CpuRun => "cpurun",
            Self::Cuda => "cuda",
            Self::GpuRun => "gpurun",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_modes_reject_headers_only_for_cpu() {
        let dir = Path::new(".");
        assert!(Mode::CpuRun.validate_name(dir, "kernel.h").is_err());
        assert!(Mode::Cpp.validate_name(dir, "kernel.h").is_ok());
        assert!(Mode::GpuRun.validate_name(dir, "kernel.h").is_ok());
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        let err = Mode::CpuRun.validate_name(Path::new("."), "main.CPP").unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
    }

    #[test]
    fn test_name_without_extension_rejected() {
        assert!(Mode::GpuRun.validate_name(Path::new("."), "cu").is_err());
        assert!(Mode::Cuda.validate_name(Path::new("."), "kernel.cu.bak").is_err());
    }

    #[test]
    fn test_default_names_are_valid() {
        for mode in [Mode::Cpp, Mode::CpuRun, Mode::Cuda, Mode::GpuRun] {
            assert!(mode.validate_name(Path::new("."), mode.default_name()).is_ok());
        }
    }

    #[test]
    fn test_default_launch() {
        assert_eq!(Mode::CpuRun.default_launch(), Launch::Direct);
        assert_eq!(Mode::GpuRun.default_launch(), Launch::Shell);
    }
}
