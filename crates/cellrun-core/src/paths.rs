//! Artifact paths for a cell invocation.
//!
//! Every artifact path is a pure function of the working directory and the
//! user-supplied name:
//!
//! ```text
//! work_dir/
//! ├── vec_add.cu   # source (the cell text)
//! ├── vec_add.o    # object file (two-phase builds only)
//! └── vec_add      # executable, started as ./vec_add
//! ```
//!
//! Nothing guards against reuse: a second invocation with the same name
//! overwrites (or appends to) the same files, and nothing is cleaned up.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// How the cell text is written to the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate the file before writing.
    #[default]
    Overwrite,
    /// Append to the existing file, creating it if needed.
    Append,
}

/// Paths of the files produced by one invocation.
///
/// The `*_rel` forms are what appear on compiler command lines, since every
/// subprocess runs with `work_dir` as its current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    work_dir: PathBuf,
    source_rel: PathBuf,
    object_rel: PathBuf,
    executable_rel: PathBuf,
}

impl ArtifactPaths {
    /// Derive artifact paths for `name` inside `work_dir`.
    ///
    /// Callers normally go through [`crate::Mode::validate_name`], which
    /// checks the extension first.
    pub fn new(work_dir: &Path, name: &str) -> Self {
        let source_rel = PathBuf::from(name);
        let executable_rel = source_rel.with_extension("");

        let mut object = OsString::from(executable_rel.as_os_str());
        object.push(".o");

        Self {
            work_dir: work_dir.to_path_buf(),
            source_rel,
            object_rel: PathBuf::from(object),
            executable_rel,
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Source path as passed to the compiler.
    pub fn source_rel(&self) -> &Path {
        &self.source_rel
    }

    /// Object path as passed to the compiler and linker.
    pub fn object_rel(&self) -> &Path {
        &self.object_rel
    }

    /// Executable path as passed to `-o`.
    pub fn executable_rel(&self) -> &Path {
        &self.executable_rel
    }

    /// Source file location on disk.
    pub fn source(&self) -> PathBuf {
        self.work_dir.join(&self.source_rel)
    }

    /// Object file location on disk.
    pub fn object(&self) -> PathBuf {
        self.work_dir.join(&self.object_rel)
    }

    /// Executable location on disk.
    pub fn executable(&self) -> PathBuf {
        self.work_dir.join(&self.executable_rel)
    }

    /// Path used to start the executable from `work_dir` (`./<exe>`).
    pub fn run_path(&self) -> PathBuf {
        if self.executable_rel.is_absolute() {
            self.executable_rel.clone()
        } else {
            Path::new(".").join(&self.executable_rel)
        }
    }

    /// Persist the cell text to the source file.
    pub fn write_source(&self, text: &str, mode: WriteMode) -> Result<()> {
        let path = self.source();

        match mode {
            WriteMode::Overwrite => fs::write(&path, text)?,
            WriteMode::Append => {
                let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
                file.write_all(text.as_bytes())?;
            }
        }

        tracing::debug!("Wrote {} bytes to {} ({:?})", text.len(), path.display(), mode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_derived_paths() {
        let paths = ArtifactPaths::new(Path::new("/work"), "vec_add.cu");

        assert_eq!(paths.source_rel(), Path::new("vec_add.cu"));
        assert_eq!(paths.object_rel(), Path::new("vec_add.o"));
        assert_eq!(paths.executable_rel(), Path::new("vec_add"));
        assert_eq!(paths.executable(), PathBuf::from("/work/vec_add"));
        assert_eq!(paths.run_path(), PathBuf::from("./vec_add"));
    }

    #[test]
    fn test_only_last_extension_stripped() {
        let paths = ArtifactPaths::new(Path::new("."), "matrix.v2.cpp");
        assert_eq!(paths.executable_rel(), Path::new("matrix.v2"));
        assert_eq!(paths.object_rel(), Path::new("matrix.v2.o"));
    }

    #[test]
    fn test_nested_name() {
        let paths = ArtifactPaths::new(Path::new("."), "lib/matrix.cpp");
        assert_eq!(paths.run_path(), PathBuf::from("./lib/matrix"));
    }

    #[test]
    fn test_overwrite_then_append() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let paths = ArtifactPaths::new(temp.path(), "src.cpp");

        paths.write_source("int a;\n", WriteMode::Overwrite).unwrap();
        paths.write_source("int b;\n", WriteMode::Overwrite).unwrap();
        assert_eq!(fs::read_to_string(paths.source()).unwrap(), "int b;\n");

        paths.write_source("int c;\n", WriteMode::Append).unwrap();
        assert_eq!(
            fs::read_to_string(paths.source()).unwrap(),
            "int b;\nint c;\n"
        );
    }

    #[test]
    fn test_append_creates_file() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let paths = ArtifactPaths::new(temp.path(), "fresh.h");

        paths.write_source("#pragma once\n", WriteMode::Append).unwrap();
        assert_eq!(fs::read_to_string(paths.source()).unwrap(), "#pragma once\n");
    }
}
