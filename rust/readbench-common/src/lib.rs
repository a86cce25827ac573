//! Error and result definitions shared by all readbench-* crates.

pub mod error;
pub mod result;

pub use result::Result;
