//! I/O layer: the tool capability traits, the process-backed implementations
//! that spawn `python3`, `twine` and `pip3`, and an in-memory recorder.
pub mod tools;
pub use tools::{Builder, PackageManager, Toolchain, Uploader};

pub mod process;
pub use process::{Pip, ProcessRunner, ProcessToolchain, SetupPyBuilder, TwineUploader};

pub mod recording;
pub use recording::{Call, CallKind, RecordingToolchain};
