#![doc = r#"
pyrelease — build, publish and reinstall a Python package from one command.

The `pyrelease` binary turns a handful of flags into a fixed sequence of
external tool invocations:

1. `--create`: remove `dist/`, then `python3 setup.py sdist`
2. `-u` / `--upload`: `twine upload` to the test or production index
3. `-un` / `-i` / `--install`: `pip3 uninstall`, then `pip3 install`

Steps always run in that order, whatever order the flags were given in, and
the sequence stops at the first tool that fails.

Driving the dispatcher from code
--------------------------------
```rust
use pyrelease::{dispatch, Actions, Call, PackageIndex, RecordingToolchain, ReleaseConfig};

let actions = Actions { install_test: true, ..Default::default() };
let tools = RecordingToolchain::new();

dispatch(&actions, &ReleaseConfig::default(), &tools.toolchain()).unwrap();

assert_eq!(
    tools.calls(),
    vec![
        Call::Uninstall("pyverilator-mm".to_string()),
        Call::Install { package: "pyverilator-mm".to_string(), index: PackageIndex::Test },
    ]
);
```

Use [`ProcessToolchain`] to run the real tools.

Useful modules
--------------
- [`core`](crate::core): release parameters and the dispatcher.
- [`io`]: tool capability traits and their implementations.
- [`types`]: `Actions`, `PackageIndex`, `Step`.
- [`error`]: crate-level `Error` and `Result`.
"#]

pub mod core;
pub mod error;
pub mod io;
pub mod types;

pub use crate::core::dispatch::{dispatch, execute, plan};
pub use crate::core::params::{ConfigOverrides, ReleaseConfig};
pub use error::{Error, Result};
pub use types::{Actions, PackageIndex, Step};

pub use io::{
    Builder, Call, CallKind, PackageManager, ProcessToolchain, RecordingToolchain, Toolchain,
    Uploader,
};
