//! Shared types used across pyrelease.
//! Includes the per-run `Actions` flags, the `PackageIndex` selector and the
//! planned dispatch `Step`.

/// Action flags collected from the command line.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Actions {
    pub help: bool,
    pub create: bool,
    pub upload_test: bool,
    pub upload: bool,
    pub install_test: bool,
    pub install: bool,
    pub uninstall: bool,
}

impl Actions {
    /// True when any flag other than `help` is set.
    pub fn has_work(&self) -> bool {
        self.create
            || self.upload_test
            || self.upload
            || self.install_test
            || self.install
            || self.uninstall
    }

    /// Uninstall runs for `--uninstall` and as preparation for either install.
    pub fn needs_uninstall(&self) -> bool {
        self.uninstall || self.install || self.install_test
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum PackageIndex {
    Test,
    Production,
}

impl std::fmt::Display for PackageIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageIndex::Test => write!(f, "test index"),
            PackageIndex::Production => write!(f, "production index"),
        }
    }
}

/// One unit of work in the dispatch sequence.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Step {
    Clean,
    Build,
    Upload(PackageIndex),
    /// `preparatory` is set when an install follows; its failure is not fatal.
    Uninstall { preparatory: bool },
    Install(PackageIndex),
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Clean => write!(f, "clean"),
            Step::Build => write!(f, "build"),
            Step::Upload(index) => write!(f, "upload to {}", index),
            Step::Uninstall { .. } => write!(f, "uninstall"),
            Step::Install(index) => write!(f, "install from {}", index),
        }
    }
}
