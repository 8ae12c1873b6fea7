//! On-disk layout of a virtual environment

use std::path::{Path, PathBuf};

/// Paths inside an environment root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentLayout {
    root: PathBuf,
}

impl EnvironmentLayout {
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Executables directory (`bin/` on Unix, `Scripts\` on Windows)
    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.root.join("Scripts")
        } else {
            self.root.join("bin")
        }
    }

    /// The environment's own interpreter
    pub fn python(&self) -> PathBuf {
        if cfg!(windows) {
            self.bin_dir().join("python.exe")
        } else {
            self.bin_dir().join("python")
        }
    }

    /// Activation script, reported to the operator only
    pub fn activate_script(&self) -> PathBuf {
        if cfg!(windows) {
            self.bin_dir().join("activate.bat")
        } else {
            self.bin_dir().join("activate")
        }
    }

    /// `pyvenv.cfg`, written by `venv` on creation
    pub fn config_file(&self) -> PathBuf {
        self.root.join("pyvenv.cfg")
    }

    /// Whether the interpreter exists where the layout expects it
    pub fn has_interpreter(&self) -> bool {
        self.python().is_file()
    }

    /// Advisory lock file guarding the environment
    ///
    /// Lives next to the root (`<parent>/.<name>.lock`) so it survives the
    /// root being removed and recreated.
    pub fn lock_path(&self) -> PathBuf {
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "env".to_string());
        let parent = self.root.parent().unwrap_or_else(|| Path::new("."));
        parent.join(format!(".{name}.lock"))
    }
}
