//! Composition of the clap parser hierarchy from a command tree
//!
//! Every node becomes a `clap::Command` carrying its whole argument scope:
//! ancestors' arguments plus its own, deeper declarations shadowing shallower
//! ones. Router levels only carry named arguments so that an inherited option
//! can be written before or after the sub-command name; positionals live on
//! leaves. At router levels a multi-valued option takes one value per
//! occurrence, so it cannot swallow the sub-command name; the resolver
//! splits `--opt a b` into `--opt a --opt b` before parsing. Named arguments
//! are never marked required at any level because a value may arrive at an
//! ancestor level; the resolver checks requiredness once values are merged.

use clap::{ArgMatches, Command};

use crate::core::node::{CommandNode, CommandTree, NodeKind};
use crate::core::scope::ArgScope;

/// Help layout shared by every node; the first line is a compatibility surface
const HELP_TEMPLATE: &str = "usage: {usage}\n\n{about-with-newline}\n{all-args}{after-help}";

/// What the top of a composed parser stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserRoot {
    /// The tree root; sub-commands mirror the tree
    Tree,
    /// A single leaf exposed under a deprecated entry-point name
    Legacy {
        alias: String,
        leaf_path: Vec<String>,
    },
}

/// A clap command hierarchy built from a [`CommandTree`]
#[derive(Debug, Clone)]
pub struct ComposedParser {
    command: Command,
    root: ParserRoot,
}

impl ComposedParser {
    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn root(&self) -> &ParserRoot {
        &self.root
    }

    /// Parse raw tokens (without the program name)
    pub fn parse(&self, tokens: &[String]) -> Result<ArgMatches, clap::Error> {
        self.command.clone().try_get_matches_from(tokens)
    }

    /// Help text of the node at `path` below the parser's top
    ///
    /// Unknown path segments stop the descent, so the deepest known node is
    /// rendered.
    pub fn render_help<S: AsRef<str>>(&self, path: &[S]) -> String {
        fn render_at<S: AsRef<str>>(cmd: &mut Command, path: &[S]) -> String {
            if let Some((head, rest)) = path.split_first() {
                if let Some(sub) = cmd.find_subcommand_mut(head.as_ref()) {
                    return render_at(sub, rest);
                }
            }
            cmd.render_help().to_string()
        }

        let mut command = self.command.clone();
        render_at(&mut command, path)
    }

    /// Help text for `node`, whichever way this parser exposes it
    pub fn help_for(&self, node: &CommandNode) -> String {
        match &self.root {
            ParserRoot::Tree => self.render_help(&node.path()[1..]),
            ParserRoot::Legacy { .. } => self.render_help::<&str>(&[]),
        }
    }
}

/// Builds [`ComposedParser`]s
pub struct ParserTreeBuilder;

impl ParserTreeBuilder {
    /// Parser for the whole tree, rooted at the tree root
    pub fn build(tree: &CommandTree) -> ComposedParser {
        let root = tree.root();
        let command = Self::build_node(root, &ArgScope::default())
            .no_binary_name(true)
            .version(env!("CARGO_PKG_VERSION"));

        tracing::debug!(root = %root.name(), "composed parser hierarchy");
        ComposedParser {
            command,
            root: ParserRoot::Tree,
        }
    }

    /// Standalone parser for the leaf registered under legacy `alias`
    pub fn build_legacy(tree: &CommandTree, alias: &str) -> Option<ComposedParser> {
        let leaf = tree.find_legacy(alias)?;
        let scope = tree.scope_of(leaf);

        let mut command = Self::base_command(alias, leaf, alias);
        for arg in scope.iter() {
            command = command.arg(arg.to_clap_arg(true));
        }

        tracing::debug!(%alias, leaf = %leaf.command_path(), "composed legacy parser");
        Some(ComposedParser {
            command: command.no_binary_name(true),
            root: ParserRoot::Legacy {
                alias: alias.to_string(),
                leaf_path: leaf.path().to_vec(),
            },
        })
    }

    fn build_node<'a>(node: &'a CommandNode, inherited: &ArgScope<'a>) -> Command {
        let scope = inherited.extend(node.own_args());
        let mut command = Self::base_command(node.name(), node, &node.command_path());

        match node.kind() {
            NodeKind::Router(children) => {
                for arg in scope.named() {
                    let mut clap_arg = arg.to_clap_arg(false);
                    if arg.is_multiple() {
                        // one value per occurrence; the resolver splits runs of values
                        clap_arg = clap_arg.num_args(1);
                    }
                    command = command.arg(clap_arg);
                }
                command = command
                    .subcommand_required(false)
                    .disable_help_subcommand(true);
                for child in children {
                    command = command.subcommand(Self::build_node(child, &scope));
                }
            }
            NodeKind::Leaf(_) => {
                for arg in scope.iter() {
                    command = command.arg(arg.to_clap_arg(true));
                }
            }
        }
        command
    }

    fn base_command(name: &str, node: &CommandNode, display_path: &str) -> Command {
        let mut command = Command::new(name.to_string())
            .about(node.about().to_string())
            .override_usage(format!("To use, type `{display_path}`"))
            .help_template(HELP_TEMPLATE)
            .args_override_self(true);
        if let Some(text) = node.instructions() {
            command = command.after_help(text.to_string());
        }
        command
    }
}
