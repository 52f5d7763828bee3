//! `geoips list` command - tabular listings of packages, interfaces and plugins

use miette::{miette, Result};

use crate::cli::helpers::{display_path, join_or_dash, truncate_str};
use crate::cli::table::{render, wrap_text, TableStyle, DOCSTRING_WIDTH, TABLE_STYLES};
use crate::cli::CliContext;
use crate::core::{ArgumentSpec, CommandNode, ConstraintRule, ResolvedArgs, StructuralError};
use crate::plugins::PluginCatalog;

pub const INTERFACE_HEADERS: [&str; 6] = [
    "GeoIPS Package",
    "Interface Type",
    "Interface Name",
    "Supported Families",
    "Docstring",
    "Absolute Path",
];

pub const IMPLEMENTED_HEADERS: [&str; 3] = ["GeoIPS Package", "Interface Type", "Interface Name"];

pub const PACKAGE_HEADERS: [&str; 3] = ["GeoIPS Package", "Docstring", "Package Path"];

pub const PLUGIN_HEADERS: [&str; 6] = [
    "GeoIPS Package",
    "Interface",
    "Family",
    "Plugin Name",
    "Source Names",
    "Relative Path",
];

/// Build the `list` router and its leaves
pub fn command(ctx: &CliContext) -> Result<CommandNode, StructuralError> {
    let catalog = ctx.catalog.clone();
    let interfaces = CommandNode::leaf(
        "interfaces",
        "List the available GeoIPS interfaces",
        vec![
            ArgumentSpec::flag("implemented")
                .short('i')
                .help("List the interfaces each package implements plugins for"),
            ArgumentSpec::option("package")
                .short('p')
                .help("Only list implemented interfaces of this package (requires -i)"),
        ],
        move |args: &ResolvedArgs| {
            let style = table_style(args)?;
            let out = interfaces_table(
                catalog.as_ref(),
                args.flag("implemented"),
                args.value("package"),
                style,
            )?;
            println!("{out}");
            Ok(0)
        },
    )?
    .with_instructions("geoips list interfaces [-i] [-p <package_name>]")
    .with_constraint(ConstraintRule::requires("package", "implemented"));

    let catalog = ctx.catalog.clone();
    let packages = CommandNode::leaf(
        "packages",
        "List the installed GeoIPS plugin packages",
        vec![],
        move |args: &ResolvedArgs| {
            println!("{}", packages_table(catalog.as_ref(), table_style(args)?));
            Ok(0)
        },
    )?;

    let catalog = ctx.catalog.clone();
    let plugins = CommandNode::leaf(
        "plugins",
        "List the plugins of every installed package",
        vec![
            ArgumentSpec::option("package")
                .short('p')
                .help("Only list plugins from this package"),
            ArgumentSpec::option("interface").help("Only list plugins of this interface"),
        ],
        move |args: &ResolvedArgs| {
            let out = plugins_table(
                catalog.as_ref(),
                args.value("package"),
                args.value("interface"),
                table_style(args)?,
            )?;
            println!("{out}");
            Ok(0)
        },
    )?
    .with_instructions("geoips list plugins [-p <package_name>] [--interface <interface_name>]");

    CommandNode::router(
        "list",
        "List packages, interfaces and plugins",
        vec![ArgumentSpec::choice("table_style", TABLE_STYLES.iter().copied())
            .long("table-style")
            .default_value(ctx.table_style.as_str())
            .help("Border style of the printed table")],
        vec![interfaces, packages, plugins],
    )
}

fn table_style(args: &ResolvedArgs) -> Result<TableStyle> {
    args.value("table_style")
        .unwrap_or(TableStyle::default().as_str())
        .parse()
        .map_err(|e: String| miette!("{e}"))
}

fn require_package(catalog: &dyn PluginCatalog, package: Option<&str>) -> Result<()> {
    match package {
        Some(name) if catalog.package(name).is_none() => Err(miette!(
            code = "geoips::list::unknown_package",
            help = "run `geoips list packages` to see the installed packages",
            "Package '{}' is not installed",
            name
        )),
        _ => Ok(()),
    }
}

/// `list interfaces`: every interface, or with `implemented` the interfaces
/// each package implements
pub fn interfaces_table(
    catalog: &dyn PluginCatalog,
    implemented: bool,
    package: Option<&str>,
    style: TableStyle,
) -> Result<String> {
    if implemented {
        require_package(catalog, package)?;
        let rows = catalog
            .implemented(package)
            .into_iter()
            .map(|i| vec![i.package, i.interface_type.to_string(), i.interface])
            .collect();
        return Ok(render(&IMPLEMENTED_HEADERS, rows, style));
    }

    let rows = catalog
        .interfaces()
        .into_iter()
        .map(|i| {
            vec![
                i.package,
                i.interface_type.to_string(),
                i.name,
                wrap_text(&i.supported_families.join(", "), DOCSTRING_WIDTH / 2),
                wrap_text(&i.docstring, DOCSTRING_WIDTH),
                display_path(&i.absolute_path),
            ]
        })
        .collect();
    Ok(render(&INTERFACE_HEADERS, rows, style))
}

/// `list packages`
pub fn packages_table(catalog: &dyn PluginCatalog, style: TableStyle) -> String {
    let rows = catalog
        .packages()
        .into_iter()
        .map(|p| {
            let docstring = wrap_text(&p.docstring, DOCSTRING_WIDTH);
            vec![p.name, docstring, display_path(&p.path)]
        })
        .collect();
    render(&PACKAGE_HEADERS, rows, style)
}

/// `list plugins`, optionally filtered by package and interface
pub fn plugins_table(
    catalog: &dyn PluginCatalog,
    package: Option<&str>,
    interface: Option<&str>,
    style: TableStyle,
) -> Result<String> {
    require_package(catalog, package)?;
    if let Some(name) = interface {
        if catalog.interface(name).is_none() {
            return Err(miette!(
                code = "geoips::list::unknown_interface",
                help = "run `geoips list interfaces` to see the available interfaces",
                "Interface '{}' does not exist",
                name
            ));
        }
    }

    let rows = catalog
        .plugins()
        .into_iter()
        .filter(|p| package.map_or(true, |name| p.package == name))
        .filter(|p| interface.map_or(true, |name| p.interface == name))
        .map(|p| {
            vec![
                p.package,
                p.interface,
                p.family,
                p.name,
                truncate_str(&join_or_dash(&p.source_names), 30),
                display_path(&p.relative_path),
            ]
        })
        .collect();
    Ok(render(&PLUGIN_HEADERS, rows, style))
}
