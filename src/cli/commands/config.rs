//! `geoips config` command - inspect the CLI configuration
//!
//! Shows the effective values after layering defaults, the global config
//! file, `GEOIPS_CONFIG` and `GEOIPS_*` environment variables.

use std::path::{Path, PathBuf};

use console::style;
use miette::{miette, Result};

use crate::cli::CliContext;
use crate::core::{ArgumentSpec, CommandNode, Config, ResolvedArgs, StructuralError};

/// Configuration keys with their description and environment override
pub const VALID_KEYS: &[(&str, &str, &str)] = &[
    (
        "log_level",
        "Log filter directive (warn, debug, geoips=trace, ...)",
        "GEOIPS_LOG_LEVEL",
    ),
    (
        "table_style",
        "Default table style for `geoips list` (fancy, markdown, plain, ascii)",
        "GEOIPS_TABLE_STYLE",
    ),
    (
        "install_root",
        "Root that package and interface paths are reported under",
        "GEOIPS_INSTALL_ROOT",
    ),
];

pub fn command(ctx: &CliContext) -> Result<CommandNode, StructuralError> {
    let config = ctx.config.clone();
    let show = CommandNode::leaf(
        "show",
        "Show the effective configuration",
        vec![ArgumentSpec::positional("key").help("Only show this key")],
        move |args: &ResolvedArgs| {
            println!("{}", show_config(&config, args.value("key"))?);
            Ok(0)
        },
    )?
    .with_instructions("geoips config show [<key>]");

    let path = CommandNode::leaf(
        "path",
        "Show the configuration files that are read",
        vec![],
        |_: &ResolvedArgs| {
            let global = Config::global_config_path();
            let explicit = std::env::var_os("GEOIPS_CONFIG").map(PathBuf::from);
            println!("{}", config_paths(global.as_deref(), explicit.as_deref()));
            Ok(0)
        },
    )?;

    let keys = CommandNode::leaf(
        "keys",
        "List the available configuration keys",
        vec![],
        |_: &ResolvedArgs| {
            println!("{}", config_keys());
            Ok(0)
        },
    )?;

    CommandNode::router(
        "config",
        "Inspect the GeoIPS CLI configuration",
        vec![],
        vec![show, path, keys],
    )
}

/// Effective value of one key
fn config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "log_level" => Some(config.log_level().to_string()),
        "table_style" => Some(config.table_style().to_string()),
        "install_root" => Some(config.install_root().display().to_string()),
        _ => None,
    }
}

/// `config show [<key>]`
pub fn show_config(config: &Config, key: Option<&str>) -> Result<String> {
    if let Some(key) = key {
        return config_value(config, key).ok_or_else(|| {
            miette!(
                code = "geoips::config::unknown_key",
                help = "run `geoips config keys` to see the available keys",
                "Unknown configuration key '{}'",
                key
            )
        });
    }

    let title = style("Effective Configuration").bold().underlined();
    let mut out = format!("{title}\n\n");
    for (key, _, _) in VALID_KEYS {
        let value = config_value(config, key).unwrap_or_default();
        out.push_str(&format!("  {} = {}\n", style(key).cyan(), value));
    }

    out.push('\n');
    let sources = style("Config Sources (highest priority first):").dim();
    out.push_str(&format!("{sources}\n"));
    out.push_str("  1. Environment variables (GEOIPS_LOG_LEVEL, GEOIPS_TABLE_STYLE, ...)\n");
    out.push_str("  2. File named by GEOIPS_CONFIG\n");
    out.push_str("  3. Global config (~/.config/geoips/config.yaml)");
    Ok(out)
}

fn describe_path(label: &str, path: &Path) -> String {
    let state = if path.exists() {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    format!("{label}: {} {state}", path.display())
}

/// `config path`
pub fn config_paths(global: Option<&Path>, explicit: Option<&Path>) -> String {
    let mut lines = Vec::new();
    match global {
        Some(path) => lines.push(describe_path("Global config", path)),
        None => lines.push(format!("Global config: {}", style("(no home)").dim())),
    }
    match explicit {
        Some(path) => lines.push(describe_path("GEOIPS_CONFIG", path)),
        None => lines.push(format!("GEOIPS_CONFIG: {}", style("(unset)").dim())),
    }
    lines.join("\n")
}

/// `config keys`
pub fn config_keys() -> String {
    let mut out = format!("{}\n\n", style("Available configuration keys").bold());
    for (key, description, env) in VALID_KEYS {
        out.push_str(&format!("  {:<14} {description} [{env}]\n", style(key).cyan()));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config() -> Config {
        Config {
            log_level: None,
            table_style: Some("markdown".to_string()),
            install_root: Some(PathBuf::from("/opt/geoips")),
        }
    }

    #[test]
    fn test_show_single_key() {
        let show = |key: &str| show_config(&config(), Some(key)).unwrap();
        assert_eq!(show("table_style"), "markdown");
        assert_eq!(show("log_level"), "warn");
        assert_eq!(show("install_root"), "/opt/geoips");
    }

    #[test]
    fn test_show_unknown_key() {
        let err = show_config(&config(), Some("editor")).unwrap_err();
        assert_eq!(err.to_string(), "Unknown configuration key 'editor'");
    }

    #[test]
    fn test_show_all_lists_every_key() {
        let out = show_config(&config(), None).unwrap();
        assert!(out.contains("Effective Configuration"));
        for (key, _, _) in VALID_KEYS {
            assert!(out.contains(key), "missing {key}");
        }
        assert!(out.contains("markdown"));
        assert!(out.contains("GEOIPS_CONFIG"));
    }

    #[test]
    fn test_paths_report_existence() {
        let tmp = TempDir::new().unwrap();
        let present = tmp.path().join("geoips.yaml");
        std::fs::write(&present, "table_style: plain\n").unwrap();
        let missing = tmp.path().join("config.yaml");

        let out = config_paths(Some(&missing), Some(&present));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Global config: "));
        assert!(lines[0].contains("(not created)"));
        assert!(lines[1].starts_with("GEOIPS_CONFIG: "));
        assert!(lines[1].contains("(exists)"));

        assert!(config_paths(None, None).contains("(unset)"));
    }

    #[test]
    fn test_keys_name_env_overrides() {
        let out = config_keys();
        assert!(out.contains("[GEOIPS_TABLE_STYLE]"));
        assert!(out.contains("install_root"));
    }
}
