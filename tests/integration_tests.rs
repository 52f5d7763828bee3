//! Integration tests for the GeoIPS CLI
//!
//! These tests exercise the three entry points end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Run one of the binaries with an isolated configuration
fn bin(name: &str) -> Command {
    let mut cmd = Command::cargo_bin(name).unwrap();
    cmd.env("XDG_CONFIG_HOME", "/nonexistent/geoips-test-config")
        .env("GEOIPS_INSTALL_ROOT", "/opt/geoips")
        .env_remove("GEOIPS_CONFIG")
        .env_remove("GEOIPS_TABLE_STYLE")
        .env_remove("GEOIPS_LOG")
        .env_remove("GEOIPS_LOG_LEVEL");
    cmd
}

/// Helper to get a geoips command
fn geoips() -> Command {
    bin("geoips")
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_on_every_command() {
    let paths: &[&[&str]] = &[
        &[],
        &["config"],
        &["config", "show"],
        &["config", "path"],
        &["config", "keys"],
        &["get"],
        &["get", "interface"],
        &["get", "package"],
        &["list"],
        &["list", "interfaces"],
        &["list", "packages"],
        &["list", "plugins"],
        &["run"],
        &["run", "single_source"],
        &["run", "data_fusion"],
        &["run", "config_based"],
        &["validate"],
    ];

    for path in paths {
        let mut expected = vec!["geoips"];
        expected.extend_from_slice(path);
        let preamble = format!("usage: To use, type `{}`", expected.join(" "));

        geoips()
            .args(*path)
            .arg("-h")
            .assert()
            .success()
            .stdout(predicate::str::contains(preamble));
    }
}

#[test]
fn test_help_lists_subcommands() {
    geoips()
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interfaces"))
        .stdout(predicate::str::contains("packages"))
        .stdout(predicate::str::contains("plugins"));
}

#[test]
fn test_help_does_not_run_procflow() {
    geoips()
        .args(["run", "single_source", "a.nc", "-h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"procflow\"").not());
}

#[test]
fn test_version() {
    geoips()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Incomplete and unknown commands
// ============================================================================

#[test]
fn test_router_without_subcommand() {
    geoips()
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: To use, type `geoips list`"));
}

#[test]
fn test_no_arguments() {
    geoips()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: To use, type `geoips`"));
}

#[test]
fn test_unknown_subcommand() {
    geoips()
        .args(["list", "widgets"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: To use, type `geoips list`"));
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_interfaces_headers() {
    let assert = geoips().args(["list", "interfaces"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for header in [
        "GeoIPS Package",
        "Interface Type",
        "Interface Name",
        "Supported Families",
        "Docstring",
        "Absolute Path",
    ] {
        assert!(stdout.contains(header), "missing header {header}");
    }
    assert!(stdout.contains("/opt/geoips/geoips/interfaces"));
}

#[test]
fn test_list_interfaces_implemented() {
    geoips()
        .args(["list", "interfaces", "-i", "-p", "data_fusion"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GeoIPS Package"))
        .stdout(predicate::str::contains("Interface Type"))
        .stdout(predicate::str::contains("Interface Name"))
        .stdout(predicate::str::contains("Docstring").not());
}

#[test]
fn test_list_interfaces_package_without_implemented() {
    geoips()
        .args(["list", "interfaces", "-p", "geoips"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: To use, type `geoips list interfaces`"))
        .stderr(predicate::str::contains("You cannot use the `-p` flag without the `-i` flag."));
}

#[test]
fn test_list_interfaces_flag_order_irrelevant() {
    let first = geoips()
        .args(["list", "interfaces", "-i", "-p", "geoips"])
        .output()
        .unwrap();
    let second = geoips()
        .args(["list", "interfaces", "-p", "geoips", "-i"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_list_packages() {
    geoips()
        .args(["list", "packages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GeoIPS Package"))
        .stdout(predicate::str::contains("Docstring"))
        .stdout(predicate::str::contains("Package Path"))
        .stdout(predicate::str::contains("data_fusion"));
}

#[test]
fn test_list_packages_rejects_package_flag() {
    geoips()
        .args(["list", "packages", "-p", "geoips"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: To use, type `geoips list packages`"));
}

#[test]
fn test_list_plugins_filtered() {
    geoips()
        .args(["list", "plugins", "--interface", "readers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plugin Name"))
        .stdout(predicate::str::contains("abi_netcdf"))
        .stdout(predicate::str::contains("imagery_annotated").not());
}

#[test]
fn test_list_table_style_markdown() {
    geoips()
        .args(["list", "--table-style", "markdown", "packages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| GeoIPS Package"));
}

#[test]
fn test_list_table_style_invalid() {
    geoips()
        .args(["list", "--table-style", "neon", "packages"])
        .assert()
        .code(2);
}

#[test]
fn test_table_style_from_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("geoips.yaml");
    fs::write(&config, "table_style: markdown\n").unwrap();

    geoips()
        .env("GEOIPS_CONFIG", &config)
        .args(["list", "packages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| GeoIPS Package"));
}

#[test]
fn test_list_unknown_package_is_execution_failure() {
    geoips()
        .args(["list", "plugins", "-p", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Package 'nope' is not installed"));
}

#[test]
fn test_repeated_flag_accepted() {
    geoips()
        .args(["list", "interfaces", "-i", "-i"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Interface Name"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_show_effective_values() {
    geoips()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Effective Configuration"))
        .stdout(predicate::str::contains("table_style"))
        .stdout(predicate::str::contains("/opt/geoips"));
}

#[test]
fn test_config_show_key_follows_layers() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("geoips.yaml");
    fs::write(&config, "table_style: markdown\nlog_level: info\n").unwrap();

    geoips()
        .env("GEOIPS_CONFIG", &config)
        .args(["config", "show", "table_style"])
        .assert()
        .success()
        .stdout("markdown\n");

    geoips()
        .env("GEOIPS_CONFIG", &config)
        .env("GEOIPS_TABLE_STYLE", "plain")
        .args(["config", "show", "table_style"])
        .assert()
        .success()
        .stdout("plain\n");
}

#[test]
fn test_config_show_unknown_key() {
    geoips()
        .args(["config", "show", "editor"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown configuration key 'editor'"));
}

#[test]
fn test_config_path_reports_explicit_file() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("geoips.yaml");
    fs::write(&config, "table_style: plain\n").unwrap();

    geoips()
        .env("GEOIPS_CONFIG", &config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Global config:"))
        .stdout(predicate::str::contains(config.display().to_string()));
}

#[test]
fn test_config_without_subcommand() {
    geoips()
        .arg("config")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: To use, type `geoips config`"));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_good_plugin() {
    let tmp = TempDir::new().unwrap();
    let plugin = tmp.path().join("conus.yaml");
    fs::write(
        &plugin,
        "interface: sectors\nfamily: generated\nname: conus\ndocstring: CONUS\n",
    )
    .unwrap();

    geoips()
        .arg("validate")
        .arg(&plugin)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 passed, 0 failed"));
}

#[test]
fn test_validate_bad_plugin_fails() {
    let tmp = TempDir::new().unwrap();
    let plugin = tmp.path().join("bad.yaml");
    fs::write(&plugin, "interface: readers\nname: x\n").unwrap();

    geoips()
        .arg("validate")
        .arg(&plugin)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("missing required key 'family'"))
        .stderr(predicate::str::contains("1 of 1 file(s) failed validation"));
}

#[test]
fn test_validate_requires_paths() {
    geoips()
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: To use, type `geoips validate`"));
}

// ============================================================================
// get
// ============================================================================

#[test]
fn test_get_interface_yaml() {
    geoips()
        .args(["get", "interface", "readers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: readers"))
        .stdout(predicate::str::contains("abi_netcdf"));
}

#[test]
fn test_get_package_json() {
    geoips()
        .args(["get", "--format", "json", "package", "geoips"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"geoips\""));
}

#[test]
fn test_get_requires_name() {
    geoips()
        .args(["get", "interface"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: To use, type `geoips get interface`"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_single_source_defaults_procflow() {
    geoips()
        .args([
            "run",
            "single_source",
            "a.nc",
            "--reader_name",
            "abi_netcdf",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"procflow\": \"single_source\""))
        .stdout(predicate::str::contains("\"reader_name\": \"abi_netcdf\""));
}

#[test]
fn test_run_options_before_and_after_subcommand() {
    let before = geoips()
        .args(["run", "--product_name", "IR", "single_source", "a.nc"])
        .output()
        .unwrap();
    let after = geoips()
        .args(["run", "single_source", "a.nc", "--product_name", "IR"])
        .output()
        .unwrap();
    assert!(before.status.success());
    assert_eq!(before.stdout, after.stdout);
}

#[test]
fn test_run_sector_list_before_subcommand() {
    let output = geoips()
        .args(["run", "--sector_list", "a", "b", "single_source", "x.nc"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let request: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(request["procflow"], "single_source");
    let arguments = &request["arguments"];
    assert_eq!(arguments["sector_list"], serde_json::json!(["a", "b"]));
    assert_eq!(arguments["fnames"], serde_json::json!(["x.nc"]));
}

#[test]
fn test_run_repeated_option_last_wins() {
    geoips()
        .args([
            "run",
            "single_source",
            "a.nc",
            "--reader_name",
            "x",
            "--reader_name",
            "y",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reader_name\": \"y\""));
}

#[test]
fn test_run_constraint_violation() {
    geoips()
        .args([
            "run",
            "single_source",
            "a.nc",
            "--filename_formatter",
            "geoips_fname",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "You cannot use the `--filename_formatter` flag without the `--output_formatter` flag.",
        ));
}

#[test]
fn test_run_unknown_procflow_fails() {
    geoips()
        .args(["run", "--procflow", "warp_drive", "single_source", "a.nc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("warp_drive"));
}

#[test]
fn test_run_config_based_requires_output_config() {
    geoips()
        .args(["run", "config_based", "a.nc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--output_config"));
}

// ============================================================================
// Legacy entry points
// ============================================================================

#[test]
fn test_run_procflow_without_procflow() {
    bin("run_procflow")
        .arg("a.nc")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Legacy 'run_procflow' call"))
        .stderr(predicate::str::contains("geoips run <procflow_name>"));
}

#[test]
fn test_run_procflow_with_procflow() {
    bin("run_procflow")
        .args(["a.nc", "--procflow", "single_source"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"procflow\": \"single_source\""));
}

#[test]
fn test_data_fusion_procflow_without_procflow() {
    bin("data_fusion_procflow")
        .args(["a.nc", "--fuse_reader", "ahi_hsd"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Legacy 'data_fusion_procflow' call"))
        .stderr(predicate::str::contains("geoips run <procflow_name>"));
}

#[test]
fn test_data_fusion_procflow_with_procflow() {
    bin("data_fusion_procflow")
        .args([
            "a.nc",
            "--procflow",
            "data_fusion",
            "--fuse_reader",
            "ahi_hsd",
            "--fuse_files",
            "b.nc",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fuse_files\""));
}
