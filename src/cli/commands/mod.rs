//! CLI command implementations
//!
//! Each module returns the sub-tree for one top-level command. Output is
//! built as a `String` by a plain function so it can be tested without
//! capturing stdout; the leaf closure only prints it.

pub mod config;
pub mod get;
pub mod list;
pub mod run;
pub mod validate;
