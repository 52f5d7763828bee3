//! GeoIPS command-line interface
//!
//! A hierarchical command tree (`geoips <command> <sub-command> ...`) built
//! from a static registry, composed into one clap parser per node, and
//! dispatched to leaf functions with fully merged arguments. The deprecated
//! `run_procflow` and `data_fusion_procflow` programs reach the same leaves
//! through the legacy invocation channel.

pub mod cli;
pub mod core;
pub mod plugins;
