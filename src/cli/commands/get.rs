//! `geoips get` command - details of a single interface or package

use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::CliContext;
use crate::core::{ArgumentSpec, CommandNode, ResolvedArgs, StructuralError};
use crate::plugins::{InterfaceInfo, PackageInfo, PluginCatalog};

/// Output format for get commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Yaml,
    Json,
}

impl RecordFormat {
    fn from_args(args: &ResolvedArgs) -> Self {
        match args.value("format") {
            Some("json") => RecordFormat::Json,
            _ => RecordFormat::Yaml,
        }
    }
}

#[derive(Debug, Serialize)]
struct InterfaceDetail {
    #[serde(flatten)]
    info: InterfaceInfo,
    plugins: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PackageDetail {
    #[serde(flatten)]
    info: PackageInfo,
    implemented_interfaces: Vec<String>,
    plugin_count: usize,
}

pub fn command(ctx: &CliContext) -> Result<CommandNode, StructuralError> {
    let catalog = ctx.catalog.clone();
    let interface = CommandNode::leaf(
        "interface",
        "Show one interface and the plugins implementing it",
        vec![ArgumentSpec::positional("interface_name")
            .required()
            .help("Name of the interface, e.g. readers")],
        move |args: &ResolvedArgs| {
            let name = args.value("interface_name").unwrap_or_default();
            let format = RecordFormat::from_args(args);
            println!("{}", interface_record(catalog.as_ref(), name, format)?);
            Ok(0)
        },
    )?;

    let catalog = ctx.catalog.clone();
    let package = CommandNode::leaf(
        "package",
        "Show one installed plugin package",
        vec![ArgumentSpec::positional("package_name")
            .required()
            .help("Name of the package, e.g. geoips")],
        move |args: &ResolvedArgs| {
            let name = args.value("package_name").unwrap_or_default();
            let format = RecordFormat::from_args(args);
            println!("{}", package_record(catalog.as_ref(), name, format)?);
            Ok(0)
        },
    )?;

    CommandNode::router(
        "get",
        "Show details of a single interface or package",
        vec![ArgumentSpec::choice("format", ["yaml", "json"])
            .default_value("yaml")
            .help("Output format")],
        vec![interface, package],
    )
}

fn serialize<T: Serialize>(record: &T, format: RecordFormat) -> Result<String> {
    match format {
        RecordFormat::Yaml => serde_yml::to_string(record).into_diagnostic(),
        RecordFormat::Json => serde_json::to_string_pretty(record).into_diagnostic(),
    }
}

/// `get interface <name>`
pub fn interface_record(
    catalog: &dyn PluginCatalog,
    name: &str,
    format: RecordFormat,
) -> Result<String> {
    let info = catalog.interface(name).ok_or_else(|| {
        miette!(
            code = "geoips::get::unknown_interface",
            help = "run `geoips list interfaces` to see the available interfaces",
            "Interface '{}' does not exist",
            name
        )
    })?;
    let plugins = catalog
        .plugins()
        .into_iter()
        .filter(|p| p.interface == name)
        .map(|p| p.name)
        .collect();
    serialize(&InterfaceDetail { info, plugins }, format)
}

/// `get package <name>`
pub fn package_record(
    catalog: &dyn PluginCatalog,
    name: &str,
    format: RecordFormat,
) -> Result<String> {
    let info = catalog.package(name).ok_or_else(|| {
        miette!(
            code = "geoips::get::unknown_package",
            help = "run `geoips list packages` to see the installed packages",
            "Package '{}' is not installed",
            name
        )
    })?;
    let implemented_interfaces = catalog
        .implemented(Some(name))
        .into_iter()
        .map(|i| i.interface)
        .collect();
    let plugin_count = catalog
        .plugins()
        .iter()
        .filter(|p| p.package == name)
        .count();
    serialize(
        &PackageDetail {
            info,
            implemented_interfaces,
            plugin_count,
        },
        format,
    )
}
