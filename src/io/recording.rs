//! In-memory toolchain that records every call instead of running anything.
//!
//! Used by the tests to check dispatch order. Individual calls can be told to
//! fail with a given exit code.
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::tools::{Builder, PackageManager, Toolchain, Uploader};
use crate::types::PackageIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Clean(PathBuf),
    Build(PathBuf),
    Upload { index: PackageIndex, dist_dir: PathBuf },
    Uninstall(String),
    Install { package: String, index: PackageIndex },
}

impl Call {
    pub fn kind(&self) -> CallKind {
        match self {
            Call::Clean(_) => CallKind::Clean,
            Call::Build(_) => CallKind::Build,
            Call::Upload { index, .. } => CallKind::Upload(*index),
            Call::Uninstall(_) => CallKind::Uninstall,
            Call::Install { index, .. } => CallKind::Install(*index),
        }
    }

    /// Label used in scripted failures.
    fn tool(&self) -> &'static str {
        match self {
            Call::Clean(_) => "clean",
            Call::Build(_) => "build tool",
            Call::Upload { .. } => "upload tool",
            Call::Uninstall(_) | Call::Install { .. } => "package manager",
        }
    }
}

/// Call identity without arguments, used to script failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Clean,
    Build,
    Upload(PackageIndex),
    Uninstall,
    Install(PackageIndex),
}

#[derive(Debug, Default)]
pub struct RecordingToolchain {
    calls: RefCell<Vec<Call>>,
    failures: HashMap<CallKind, i32>,
}

impl RecordingToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of `kind` exit with `code`. The call is still recorded.
    pub fn failing(mut self, kind: CallKind, code: i32) -> Self {
        self.failures.insert(kind, code);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<CallKind> {
        self.calls.borrow().iter().map(Call::kind).collect()
    }

    pub fn toolchain(&self) -> Toolchain<'_> {
        Toolchain::new(self, self, self)
    }

    fn record(&self, call: Call) -> Result<()> {
        let outcome = match self.failures.get(&call.kind()) {
            Some(&code) => Err(Error::ToolFailed {
                tool: call.tool().to_string(),
                code,
            }),
            None => Ok(()),
        };
        self.calls.borrow_mut().push(call);
        outcome
    }
}

impl Builder for RecordingToolchain {
    fn clean(&self, dist_dir: &Path) -> Result<()> {
        self.record(Call::Clean(dist_dir.to_path_buf()))
    }

    fn build(&self, dist_dir: &Path) -> Result<()> {
        self.record(Call::Build(dist_dir.to_path_buf()))
    }
}

impl Uploader for RecordingToolchain {
    fn upload(&self, index: PackageIndex, dist_dir: &Path) -> Result<()> {
        self.record(Call::Upload {
            index,
            dist_dir: dist_dir.to_path_buf(),
        })
    }
}

impl PackageManager for RecordingToolchain {
    fn uninstall(&self, package: &str) -> Result<()> {
        self.record(Call::Uninstall(package.to_string()))
    }

    fn install(&self, package: &str, index: PackageIndex) -> Result<()> {
        self.record(Call::Install {
            package: package.to_string(),
            index,
        })
    }
}
