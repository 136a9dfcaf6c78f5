//! Real tool implementations that spawn `python3`, `twine` and `pip3`.
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::core::params::ReleaseConfig;
use crate::error::{Error, Result};
use crate::io::tools::{Builder, PackageManager, Toolchain, Uploader};
use crate::types::PackageIndex;

/// Runs a program to completion and maps its status onto `Error`.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    working_dir: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            working_dir: Some(dir.into()),
        }
    }

    pub fn run<S: AsRef<OsStr>>(&self, program: &str, args: &[S]) -> Result<()> {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        info!("Running: {:?}", command);
        let status = command.status().map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;
        debug!("{} exited with {}", program, status);

        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(Error::ToolFailed {
                tool: program.to_string(),
                code,
            }),
            None => Err(Error::ToolKilled {
                tool: program.to_string(),
            }),
        }
    }
}

/// Regular files directly inside `dir`, sorted by name.
pub fn list_artifacts(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::NoArtifacts {
                dir: dir.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(Error::NoArtifacts {
            dir: dir.to_path_buf(),
        });
    }
    files.sort();
    Ok(files)
}

/// `python3 setup.py sdist`
#[derive(Debug, Clone)]
pub struct SetupPyBuilder {
    python: String,
    runner: ProcessRunner,
}

impl SetupPyBuilder {
    pub fn new(python: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            runner: ProcessRunner::in_dir(project_dir),
        }
    }
}

impl Builder for SetupPyBuilder {
    fn clean(&self, dist_dir: &Path) -> Result<()> {
        match fs::remove_dir_all(dist_dir) {
            Ok(()) => {
                info!("Removed {:?}", dist_dir);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Nothing to clean at {:?}", dist_dir);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn build(&self, dist_dir: &Path) -> Result<()> {
        // The runner sits in the project dir, so hand sdist an absolute target.
        let target = std::path::absolute(dist_dir)?;
        let args: [OsString; 4] = [
            "setup.py".into(),
            "sdist".into(),
            "--dist-dir".into(),
            target.into_os_string(),
        ];
        self.runner.run(&self.python, &args)
    }
}

/// `twine upload`
#[derive(Debug, Clone)]
pub struct TwineUploader {
    twine: String,
    test_repository: String,
    runner: ProcessRunner,
}

impl TwineUploader {
    pub fn new(twine: impl Into<String>, test_repository: impl Into<String>) -> Self {
        Self {
            twine: twine.into(),
            test_repository: test_repository.into(),
            runner: ProcessRunner::new(),
        }
    }

    fn upload_args(&self, index: PackageIndex, artifacts: Vec<PathBuf>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["upload".into()];
        if index == PackageIndex::Test {
            args.push("--repository".into());
            args.push(self.test_repository.clone().into());
        }
        args.extend(artifacts.into_iter().map(PathBuf::into_os_string));
        args
    }
}

impl Uploader for TwineUploader {
    fn upload(&self, index: PackageIndex, dist_dir: &Path) -> Result<()> {
        let artifacts = list_artifacts(dist_dir)?;
        info!("Uploading {} artifact(s) to the {}", artifacts.len(), index);
        let args = self.upload_args(index, artifacts);
        self.runner.run(&self.twine, &args)
    }
}

/// `pip3 install` / `pip3 uninstall`
#[derive(Debug, Clone)]
pub struct Pip {
    executable: String,
    test_index_url: String,
    runner: ProcessRunner,
}

impl Pip {
    pub fn new(executable: impl Into<String>, test_index_url: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            test_index_url: test_index_url.into(),
            runner: ProcessRunner::new(),
        }
    }

    fn install_args<'a>(&'a self, package: &'a str, index: PackageIndex) -> Vec<&'a str> {
        match index {
            PackageIndex::Test => vec![
                "install",
                "--index-url",
                self.test_index_url.as_str(),
                package,
            ],
            PackageIndex::Production => vec!["install", package],
        }
    }
}

impl PackageManager for Pip {
    fn uninstall(&self, package: &str) -> Result<()> {
        self.runner.run(&self.executable, &["uninstall", "-y", package])
    }

    fn install(&self, package: &str, index: PackageIndex) -> Result<()> {
        let args = self.install_args(package, index);
        self.runner.run(&self.executable, &args)
    }
}

/// The process-backed tools for one run.
#[derive(Debug, Clone)]
pub struct ProcessToolchain {
    pub builder: SetupPyBuilder,
    pub uploader: TwineUploader,
    pub packages: Pip,
}

impl ProcessToolchain {
    pub fn from_config(config: &ReleaseConfig) -> Self {
        Self {
            builder: SetupPyBuilder::new(&config.python_executable, &config.project_dir),
            uploader: TwineUploader::new(&config.twine_executable, &config.test_repository),
            packages: Pip::new(&config.pip_executable, &config.test_index_url),
        }
    }

    pub fn toolchain(&self) -> Toolchain<'_> {
        Toolchain::new(&self.builder, &self.uploader, &self.packages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_names_the_repository() {
        let twine = TwineUploader::new("twine", "testpypi");
        let args = twine.upload_args(PackageIndex::Test, vec![PathBuf::from("dist/a.tar.gz")]);
        assert_eq!(args, ["upload", "--repository", "testpypi", "dist/a.tar.gz"]);
    }

    #[test]
    fn production_upload_takes_every_artifact() {
        let twine = TwineUploader::new("twine", "testpypi");
        let args = twine.upload_args(
            PackageIndex::Production,
            vec![PathBuf::from("dist/a.tar.gz"), PathBuf::from("dist/b.whl")],
        );
        assert_eq!(args, ["upload", "dist/a.tar.gz", "dist/b.whl"]);
    }

    #[test]
    fn pip_install_args_follow_the_index() {
        let pip = Pip::new("pip3", "https://test.pypi.org/simple/");
        assert_eq!(
            pip.install_args("pyverilator-mm", PackageIndex::Test),
            [
                "install",
                "--index-url",
                "https://test.pypi.org/simple/",
                "pyverilator-mm"
            ]
        );
        assert_eq!(
            pip.install_args("pyverilator-mm", PackageIndex::Production),
            ["install", "pyverilator-mm"]
        );
    }
}
