//! Project configuration (rnictl.yaml) data structures
//!
//! Every field has a default: a project without `rnictl.yaml` uses `python3`,
//! a `venv` directory and `requirements.txt`, and serves the Streamlit entry
//! on port 8501.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{self, Result};

/// Default TCP port the application binds
pub const DEFAULT_PORT: u16 = 8501;

/// Project configuration from rnictl.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Interpreter used to check and create the environment
    pub runtime: RuntimeSection,

    /// Isolated environment location
    pub environment: EnvironmentSection,

    /// Dependency manifest, relative to the project directory
    pub manifest: PathBuf,

    /// Provisioning behaviour
    pub install: InstallSection,

    /// Application launch parameters
    pub launch: LaunchSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeSection {
    /// Command name or path of the interpreter (e.g. "python3")
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentSection {
    /// Environment root, relative to the project directory
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallSection {
    /// Upgrade pip inside the environment before installing
    pub upgrade_installer: bool,

    /// Upper bound for each installer step; no bound when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchSection {
    /// Application entry file, relative to the project directory
    pub entry: PathBuf,

    /// TCP port the server binds
    pub port: u16,

    /// Bind address passed to the server (framework default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Python module that serves the entry file
    pub framework: String,

    /// Run the server without opening a browser
    pub headless: bool,

    /// Extra arguments appended to the server command line
    pub extra_args: Vec<String>,

    /// Seconds to wait for the server to stop after an interrupt
    pub shutdown_grace_secs: u64,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        let command = if cfg!(windows) { "python" } else { "python3" };
        Self {
            command: command.to_string(),
        }
    }
}

impl Default for EnvironmentSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("venv"),
        }
    }
}

impl Default for InstallSection {
    fn default() -> Self {
        Self {
            upgrade_installer: true,
            timeout_secs: None,
        }
    }
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("rni_app_v3.2.py"),
            port: DEFAULT_PORT,
            address: None,
            framework: "streamlit".to_string(),
            headless: false,
            extra_args: Vec::new(),
            shutdown_grace_secs: 5,
        }
    }
}

impl ProjectConfig {
    /// Parse project configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file deserializes to null rather than an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(yaml)?;
        if config.manifest.as_os_str().is_empty() {
            config.manifest = PathBuf::from("requirements.txt");
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`
    ///
    /// A missing file yields the defaults unless `required` is set, which is
    /// the case when the operator named the file explicitly.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                return Err(error::config::not_found(path.display().to_string()));
            }
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| error::fs::read_failed(path.display().to_string(), e.to_string()))?;

        Self::from_yaml(&content).map_err(|e| match e {
            crate::error::RniError::ConfigParseFailed { reason, .. } => {
                error::config::parse_failed(path.display().to_string(), reason)
            }
            other => other,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.runtime.command.trim().is_empty() {
            return Err(error::config::invalid("runtime.command must not be empty"));
        }
        if self.environment.path.as_os_str().is_empty() {
            return Err(error::config::invalid("environment.path must not be empty"));
        }
        if self.launch.entry.as_os_str().is_empty() {
            return Err(error::config::invalid("launch.entry must not be empty"));
        }
        if self.launch.port == 0 {
            return Err(error::config::invalid("launch.port must not be 0"));
        }
        if self.launch.framework.trim().is_empty() {
            return Err(error::config::invalid("launch.framework must not be empty"));
        }
        if self.install.timeout_secs == Some(0) {
            return Err(error::config::invalid(
                "install.timeout_secs must be positive; remove it to disable the timeout",
            ));
        }
        Ok(())
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeSection::default(),
            environment: EnvironmentSection::default(),
            manifest: PathBuf::from("requirements.txt"),
            install: InstallSection::default(),
            launch: LaunchSection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::default();
        assert_eq!(config.environment.path, PathBuf::from("venv"));
        assert_eq!(config.manifest, PathBuf::from("requirements.txt"));
        assert_eq!(config.launch.port, 8501);
        assert_eq!(config.launch.framework, "streamlit");
        assert!(config.install.upgrade_installer);
        assert!(config.install.timeout_secs.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ProjectConfig::from_yaml("launch:\n  port: 9000\n").unwrap();
        assert_eq!(config.launch.port, 9000);
        assert_eq!(config.launch.framework, "streamlit");
        assert_eq!(config.environment.path, PathBuf::from("venv"));
        assert_eq!(config.manifest, PathBuf::from("requirements.txt"));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = ProjectConfig::from_yaml("").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ProjectConfig::from_yaml("launch:\n  prot: 9000\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let result = ProjectConfig::from_yaml("launch:\n  port: 0\n");
        assert!(matches!(
            result,
            Err(crate::error::RniError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = ProjectConfig::from_yaml("install:\n  timeout_secs: 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_optional_file() {
        let temp = TempDir::new().unwrap();
        let config = ProjectConfig::load(&temp.path().join("rnictl.yaml"), false).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_load_missing_required_file() {
        let temp = TempDir::new().unwrap();
        let result = ProjectConfig::load(&temp.path().join("custom.yaml"), true);
        assert!(matches!(
            result,
            Err(crate::error::RniError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_load_parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rnictl.yaml");
        fs::write(&path, "launch: [unclosed").unwrap();

        let err = ProjectConfig::load(&path, false).unwrap_err();
        assert!(err.to_string().contains("rnictl.yaml"));
    }

    #[test]
    fn test_yaml_roundtrip_preserves_extra_args() {
        let mut config = ProjectConfig::default();
        config.launch.extra_args = vec!["--server.maxUploadSize".into(), "500".into()];
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(ProjectConfig::from_yaml(&yaml).unwrap(), config);
    }
}
