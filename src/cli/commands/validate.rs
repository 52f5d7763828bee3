//! `geoips validate` command - check YAML plugin files against the catalog

use std::fs;
use std::path::Path;

use console::style;
use miette::{miette, Result};
use serde_yml::Value;

use crate::cli::CliContext;
use crate::core::{ArgumentSpec, CommandNode, ResolvedArgs, StructuralError};
use crate::plugins::{InterfaceType, PluginCatalog};

/// Top-level keys every YAML plugin declares
pub const REQUIRED_KEYS: [&str; 4] = ["interface", "family", "name", "docstring"];

/// Validation statistics
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub files_checked: usize,
    pub files_passed: usize,
    pub files_failed: usize,
}

pub fn command(ctx: &CliContext) -> Result<CommandNode, StructuralError> {
    let catalog = ctx.catalog.clone();
    Ok(CommandNode::leaf(
        "validate",
        "Validate YAML plugin files",
        vec![ArgumentSpec::positional("file_paths")
            .multiple()
            .required()
            .help("YAML plugin files to validate")],
        move |args: &ResolvedArgs| {
            let (report, stats) = validate_files(catalog.as_ref(), args.values("file_paths"));
            println!("{report}");
            if stats.files_failed > 0 {
                return Err(miette!(
                    code = "geoips::validate::failed",
                    "{} of {} file(s) failed validation",
                    stats.files_failed,
                    stats.files_checked
                ));
            }
            Ok(0)
        },
    )?
    .with_instructions("geoips validate <file_paths>"))
}

/// Check one plugin file, returning every problem found
pub fn validate_plugin(catalog: &dyn PluginCatalog, path: &Path) -> Vec<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => return vec![err.to_string()],
    };
    let doc: Value = match serde_yml::from_str(&content) {
        Ok(doc) => doc,
        Err(err) => return vec![format!("invalid YAML: {err}")],
    };
    if !doc.is_mapping() {
        return vec!["a plugin must be a YAML mapping".to_string()];
    }

    let mut problems = Vec::new();
    for key in REQUIRED_KEYS {
        match doc.get(key) {
            Some(Value::String(value)) if !value.trim().is_empty() => {}
            Some(_) => problems.push(format!("'{key}' must be a non-empty string")),
            None => problems.push(format!("missing required key '{key}'")),
        }
    }

    let Some(interface_name) = doc.get("interface").and_then(Value::as_str) else {
        return problems;
    };
    let Some(interface) = catalog.interface(interface_name) else {
        problems.push(format!("interface '{interface_name}' does not exist"));
        return problems;
    };
    if interface.interface_type != InterfaceType::YamlBased {
        problems.push(format!(
            "interface '{interface_name}' is {}, not yaml_based",
            interface.interface_type
        ));
    }
    if let Some(family) = doc.get("family").and_then(Value::as_str) {
        if !interface.supported_families.iter().any(|f| f == family) {
            problems.push(format!(
                "family '{family}' is not supported by '{interface_name}' (expected one of: {})",
                interface.supported_families.join(", ")
            ));
        }
    }
    problems
}

/// Validate every file and build the per-file report
pub fn validate_files<P: AsRef<Path>>(
    catalog: &dyn PluginCatalog,
    paths: &[P],
) -> (String, ValidationStats) {
    let mut stats = ValidationStats::default();
    let mut lines = vec![format!(
        "{} Validating {} file(s)...\n",
        style("→").blue(),
        paths.len()
    )];

    for path in paths {
        let path = path.as_ref();
        stats.files_checked += 1;
        let problems = validate_plugin(catalog, path);
        if problems.is_empty() {
            stats.files_passed += 1;
            lines.push(format!("{} {}", style("✓").green(), path.display()));
            continue;
        }

        tracing::debug!(path = %path.display(), count = problems.len(), "invalid plugin");
        stats.files_failed += 1;
        lines.push(format!("{} {}", style("✗").red(), path.display()));
        for problem in problems {
            lines.push(format!("    {}", style(problem).red()));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Checked {} file(s): {} passed, {} failed",
        stats.files_checked, stats.files_passed, stats.files_failed
    ));
    (lines.join("\n"), stats)
}
