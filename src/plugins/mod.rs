//! Plugin packages, interfaces and procflow execution
//!
//! The command tree does not know how plugin packages are discovered or how a
//! procflow does its work. It talks to two collaborators instead: a
//! [`PluginCatalog`] answering the `list` and `get` commands, and a
//! [`ProcflowExecutor`] that `run` hands the resolved arguments to.

pub mod builtin;
pub mod executor;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::core::resolved::ResolvedArgs;

pub use builtin::BuiltinCatalog;
pub use executor::ReportingExecutor;

/// How an interface's plugins are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceType {
    ModuleBased,
    YamlBased,
    ClassBased,
}

impl InterfaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceType::ModuleBased => "module_based",
            InterfaceType::YamlBased => "yaml_based",
            InterfaceType::ClassBased => "class_based",
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An installed plugin package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub docstring: String,
    pub path: PathBuf,
}

/// A plugin interface (readers, algorithms, products, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceInfo {
    /// Package that defines the interface
    pub package: String,
    pub name: String,
    pub interface_type: InterfaceType,
    pub supported_families: Vec<String>,
    pub docstring: String,
    pub absolute_path: PathBuf,
}

/// One plugin implementing an interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    pub package: String,
    pub interface: String,
    pub family: String,
    pub name: String,
    pub source_names: Vec<String>,
    pub relative_path: PathBuf,
}

/// Interface that a package ships at least one plugin for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImplementedInterface {
    pub package: String,
    pub interface_type: InterfaceType,
    pub interface: String,
}

/// Source of package, interface and plugin records
pub trait PluginCatalog: Send + Sync {
    fn packages(&self) -> Vec<PackageInfo>;

    fn interfaces(&self) -> Vec<InterfaceInfo>;

    fn plugins(&self) -> Vec<PluginInfo>;

    fn package(&self, name: &str) -> Option<PackageInfo> {
        self.packages().into_iter().find(|p| p.name == name)
    }

    fn interface(&self, name: &str) -> Option<InterfaceInfo> {
        self.interfaces().into_iter().find(|i| i.name == name)
    }

    /// Interfaces each package implements, in package then interface order
    fn implemented(&self, package: Option<&str>) -> Vec<ImplementedInterface> {
        let interfaces = self.interfaces();
        let mut found: Vec<ImplementedInterface> = Vec::new();

        for plugin in self.plugins() {
            if package.is_some_and(|p| p != plugin.package) {
                continue;
            }
            if found
                .iter()
                .any(|f| f.package == plugin.package && f.interface == plugin.interface)
            {
                continue;
            }
            let Some(interface) = interfaces.iter().find(|i| i.name == plugin.interface) else {
                tracing::warn!(
                    plugin = %plugin.name,
                    interface = %plugin.interface,
                    "plugin for unknown interface"
                );
                continue;
            };
            found.push(ImplementedInterface {
                package: plugin.package,
                interface_type: interface.interface_type,
                interface: plugin.interface,
            });
        }

        found.sort_by(|a, b| {
            a.package
                .cmp(&b.package)
                .then(a.interface_type.cmp(&b.interface_type))
                .then(a.interface.cmp(&b.interface))
        });
        found
    }
}

/// Runs a named procflow with the arguments of a `run` leaf
pub trait ProcflowExecutor: Send + Sync {
    fn execute(&self, procflow: &str, args: &ResolvedArgs) -> miette::Result<i32>;
}
