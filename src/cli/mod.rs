//! Command Line Interface (CLI) layer for pyrelease.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that turns flags into a dispatch
//! run and an exit status. Embedders should call `pyrelease::dispatch`
//! directly instead.
pub mod args;
pub mod errors;
pub mod runner;

pub use runner::run;
