//! The `geoips` command tree

use crate::cli::commands::{config, get, list, run, validate};
use crate::cli::CliContext;
use crate::core::{CommandNode, CommandTree, StructuralError};

/// Name of the root command and the modern entry point
pub const ROOT_COMMAND: &str = "geoips";

/// Assemble and check the full command tree
pub fn geoips_tree(ctx: &CliContext) -> Result<CommandTree, StructuralError> {
    let root = CommandNode::router(
        ROOT_COMMAND,
        "Command line interface for the Geolocated Information Processing System",
        vec![],
        vec![
            config::command(ctx)?,
            get::command(ctx)?,
            list::command(ctx)?,
            run::command(ctx)?,
            validate::command(ctx)?,
        ],
    )?
    .with_instructions(
        "geoips <command> [<sub-command>] [options]; add -h to any command for help",
    );

    CommandTree::new(root)
}
