//! Core building blocks: release parameters (`params`) and the fixed-order
//! task dispatcher (`dispatch`) consumed by the CLI.
pub mod dispatch;
pub mod params;
