//! Capabilities the dispatcher needs from the outside world.
//!
//! Each external tool sits behind a small trait so the dispatch order can be
//! exercised without touching the network or the local Python install.
use std::path::Path;

use crate::error::Result;
use crate::types::PackageIndex;

/// Produces the distribution artifacts.
pub trait Builder {
    /// Remove a previous distribution directory. Absent is not an error.
    fn clean(&self, dist_dir: &Path) -> Result<()>;

    /// Build a source distribution into `dist_dir`.
    fn build(&self, dist_dir: &Path) -> Result<()>;
}

/// Publishes everything in the distribution directory.
pub trait Uploader {
    fn upload(&self, index: PackageIndex, dist_dir: &Path) -> Result<()>;
}

/// Installs and removes the package from the local environment.
pub trait PackageManager {
    fn uninstall(&self, package: &str) -> Result<()>;
    fn install(&self, package: &str, index: PackageIndex) -> Result<()>;
}

/// Borrowed set of capabilities handed to the dispatcher.
#[derive(Clone, Copy)]
pub struct Toolchain<'a> {
    pub builder: &'a dyn Builder,
    pub uploader: &'a dyn Uploader,
    pub packages: &'a dyn PackageManager,
}

impl<'a> Toolchain<'a> {
    pub fn new(
        builder: &'a dyn Builder,
        uploader: &'a dyn Uploader,
        packages: &'a dyn PackageManager,
    ) -> Self {
        Self {
            builder,
            uploader,
            packages,
        }
    }
}
