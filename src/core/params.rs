use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Release parameters fixed at start-of-run, suitable for config files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Removed and repopulated by the build step
    pub dist_dir: PathBuf,
    pub package_name: String,
    pub pip_executable: String,
    pub python_executable: String,
    pub twine_executable: String,
    /// twine repository name used for test uploads
    pub test_repository: String,
    /// pip index used for test installs
    pub test_index_url: String,
    /// Directory holding `setup.py`
    pub project_dir: PathBuf,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("dist"),
            package_name: "pyverilator-mm".to_string(),
            pip_executable: "pip3".to_string(),
            python_executable: "python3".to_string(),
            twine_executable: "twine".to_string(),
            test_repository: "testpypi".to_string(),
            test_index_url: "https://test.pypi.org/simple/".to_string(),
            project_dir: PathBuf::from("."),
        }
    }
}

/// Command-line overrides applied on top of a loaded config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub dist_dir: Option<PathBuf>,
    pub package_name: Option<String>,
    pub pip_executable: Option<String>,
}

impl ReleaseConfig {
    /// Load a config from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {:?}: {:?}", path, config);
        Ok(config)
    }

    /// Defaults, then the optional file, then the overrides.
    pub fn resolve(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(overrides))
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(dist_dir) = overrides.dist_dir {
            self.dist_dir = dist_dir;
        }
        if let Some(package_name) = overrides.package_name {
            self.package_name = package_name;
        }
        if let Some(pip) = overrides.pip_executable {
            self.pip_executable = pip;
        }
        self
    }

    /// `dist_dir` as seen from where the build tool runs.
    pub fn dist_path(&self) -> PathBuf {
        if self.dist_dir.is_absolute() {
            self.dist_dir.clone()
        } else {
            self.project_dir.join(&self.dist_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let config = ReleaseConfig::default().with_overrides(ConfigOverrides {
            package_name: Some("mypkg".to_string()),
            ..Default::default()
        });
        assert_eq!(config.package_name, "mypkg");
        assert_eq!(config.dist_dir, PathBuf::from("dist"));
        assert_eq!(config.pip_executable, "pip3");
    }

    #[test]
    fn dist_path_is_relative_to_project_dir() {
        let config = ReleaseConfig {
            project_dir: PathBuf::from("/work/pyverilator"),
            ..Default::default()
        };
        assert_eq!(config.dist_path(), PathBuf::from("/work/pyverilator/dist"));

        let config = ReleaseConfig {
            dist_dir: PathBuf::from("/tmp/out"),
            ..config
        };
        assert_eq!(config.dist_path(), PathBuf::from("/tmp/out"));
    }
}
