//! `geoips run` command - launch a process-workflow (procflow)
//!
//! Each leaf names a procflow. The `--procflow` option shared by all of them
//! only matters for the deprecated `run_procflow`/`data_fusion_procflow`
//! entry points, which reach the same leaves and must say which procflow to run.

use std::sync::Arc;

use miette::{miette, Result};

use crate::cli::CliContext;
use crate::core::{
    ArgumentSpec, CommandNode, ConstraintRule, ProcflowPolicy, ResolvedArgs, StructuralError,
};
use crate::plugins::ProcflowExecutor;

/// Suggested replacement for the legacy entry points
pub const MODERN_FORM: &str = "geoips run <procflow_name>";

/// Options understood by every procflow
fn shared_args() -> Vec<ArgumentSpec> {
    vec![
        ArgumentSpec::option("procflow").help("Procflow to execute (legacy entry points only)"),
        ArgumentSpec::option("reader_name").help("Reader plugin used to read the input files"),
        ArgumentSpec::option("product_name").help("Product plugin to produce"),
        ArgumentSpec::option("output_formatter").help("Output formatter plugin"),
        ArgumentSpec::option("filename_formatter")
            .help("Filename formatter plugin (requires --output_formatter)"),
        ArgumentSpec::option("sector_list")
            .multiple()
            .help("Sectors to produce output for"),
        ArgumentSpec::option("compare_path")
            .help("Directory of expected outputs to compare against"),
    ]
}

fn launcher(
    executor: Arc<dyn ProcflowExecutor>,
) -> impl Fn(&ResolvedArgs) -> Result<i32> + Send + Sync {
    move |args: &ResolvedArgs| {
        let procflow = args
            .value("procflow")
            .ok_or_else(|| miette!("no procflow was resolved for this invocation"))?;
        tracing::debug!(%procflow, "launching procflow");
        executor.execute(procflow, args)
    }
}

pub fn command(ctx: &CliContext) -> Result<CommandNode, StructuralError> {
    let single_source = CommandNode::leaf(
        "single_source",
        "Run the single source procflow",
        vec![ArgumentSpec::positional("fnames")
            .multiple()
            .required()
            .help("Input data files")],
        launcher(ctx.executor.clone()),
    )?
    .with_instructions(
        "geoips run single_source <fnames> --reader_name <reader> --product_name <product>",
    )
    .with_constraint(ConstraintRule::requires("filename_formatter", "output_formatter"))
    .with_procflow(ProcflowPolicy::new("procflow", "single_source", "run_procflow", MODERN_FORM))
    .with_legacy_alias("run_procflow");

    let data_fusion = CommandNode::leaf(
        "data_fusion",
        "Run the data fusion procflow",
        vec![
            ArgumentSpec::positional("fnames")
                .multiple()
                .required()
                .help("Input data files"),
            ArgumentSpec::option("fuse_files")
                .multiple()
                .help("Additional files to fuse with the primary input (requires --fuse_reader)"),
            ArgumentSpec::option("fuse_reader").help("Reader for the fused files"),
            ArgumentSpec::option("fuse_product")
                .help("Product produced from the fused files (requires --fuse_reader)"),
        ],
        launcher(ctx.executor.clone()),
    )?
    .with_instructions(
        "geoips run data_fusion <fnames> --fuse_files <files> --fuse_reader <reader>",
    )
    .with_constraint(ConstraintRule::requires("fuse_product", "fuse_reader"))
    .with_constraint(ConstraintRule::requires("fuse_files", "fuse_reader"))
    .with_procflow(ProcflowPolicy::new(
        "procflow",
        "data_fusion",
        "data_fusion_procflow",
        MODERN_FORM,
    ))
    .with_legacy_alias("data_fusion_procflow");

    let config_based = CommandNode::leaf(
        "config_based",
        "Run the config based procflow",
        vec![
            ArgumentSpec::positional("fnames")
                .multiple()
                .help("Input data files"),
            ArgumentSpec::option("output_config")
                .required()
                .help("YAML output config describing the products to produce"),
        ],
        launcher(ctx.executor.clone()),
    )?
    .with_instructions("geoips run config_based <fnames> --output_config <yaml_file>")
    // No alias of its own: legacy callers reach it as
    // `run_procflow ... --procflow config_based` through `single_source`.
    .with_procflow(ProcflowPolicy::new("procflow", "config_based", "run_procflow", MODERN_FORM));

    CommandNode::router(
        "run",
        "Run a process-workflow (procflow)",
        shared_args(),
        vec![single_source, data_fusion, config_based],
    )
}
