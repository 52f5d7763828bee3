//! Selection of the leaf command and merging of its arguments

use std::collections::{BTreeMap, BTreeSet};

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::ArgMatches;

use crate::core::argument::{ArgKind, ArgumentSpec};
use crate::core::error::CliError;
use crate::core::legacy::InvocationChannel;
use crate::core::node::{CommandNode, CommandTree};
use crate::core::parser::{ComposedParser, ParserRoot};
use crate::core::resolved::{ArgValue, ResolvedArgs};
use crate::core::scope::ArgScope;

/// A leaf selected for execution, before constraint validation
#[derive(Debug)]
pub struct ResolvedInvocation<'t> {
    pub node: &'t CommandNode,
    pub args: ResolvedArgs,
    pub channel: InvocationChannel,
    /// Help text of the leaf, used when reporting violations
    pub usage: String,
}

/// Outcome of a successful resolution
#[derive(Debug)]
pub enum Resolution<'t> {
    /// `-h`/`--help`/`-V` was given; nothing executes
    Help(String),
    Leaf(ResolvedInvocation<'t>),
}

/// One parser level on the way from the top to the selected node
struct Level<'t, 'm> {
    node: &'t CommandNode,
    matches: &'m ArgMatches,
    scope: ArgScope<'t>,
}

impl Level<'_, '_> {
    /// Whether `spec` was attached to this level's clap command
    fn parses(&self, spec: &ArgumentSpec) -> bool {
        self.scope.get(spec.name()).is_some()
            && (self.node.is_leaf() || spec.kind() != ArgKind::Positional)
    }
}

/// Walks a composed parser to exactly one leaf
pub struct InvocationResolver<'t, 'p> {
    tree: &'t CommandTree,
    parser: &'p ComposedParser,
}

impl<'t, 'p> InvocationResolver<'t, 'p> {
    pub fn new(tree: &'t CommandTree, parser: &'p ComposedParser) -> Self {
        Self { tree, parser }
    }

    pub fn resolve<I, T>(
        &self,
        tokens: I,
        channel: &InvocationChannel,
    ) -> Result<Resolution<'t>, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if *self.parser.root() == ParserRoot::Tree {
            tokens = split_router_values(self.tree, tokens);
        }
        tracing::debug!(?tokens, ?channel, "resolving invocation");

        let matches = match self.parser.parse(&tokens) {
            Ok(matches) => matches,
            Err(err) => return self.parse_failure(err, &tokens),
        };

        let levels = self.levels(&matches)?;
        let Some(last) = levels.last() else {
            return Err(self.internal_mismatch(self.tree.root()));
        };
        let node = last.node;

        if !node.is_leaf() {
            return Err(CliError::IncompleteCommand {
                command: node.command_path(),
                usage: self.parser.help_for(node),
            });
        }

        let usage = self.parser.help_for(node);
        let args = merge(&levels);
        check_required(node, &last.scope, &args, &usage)?;

        let args = match node.as_leaf().and_then(|leaf| leaf.procflow()) {
            Some(policy) => policy.resolve(args, channel, &usage)?,
            None => args,
        };

        tracing::debug!(command = %node.command_path(), "resolved leaf");
        Ok(Resolution::Leaf(ResolvedInvocation {
            node,
            args,
            channel: channel.clone(),
            usage,
        }))
    }

    /// Pair each matched parser level with its tree node
    fn levels<'m>(&self, matches: &'m ArgMatches) -> Result<Vec<Level<'t, 'm>>, CliError> {
        match self.parser.root() {
            ParserRoot::Legacy { leaf_path, .. } => {
                let node = self
                    .tree
                    .find(&leaf_path[1..])
                    .ok_or_else(|| self.internal_mismatch(self.tree.root()))?;
                Ok(vec![Level {
                    node,
                    matches,
                    scope: self.tree.scope_of(node),
                }])
            }
            ParserRoot::Tree => {
                let mut node = self.tree.root();
                let mut scope = ArgScope::default().extend(node.own_args());
                let mut current = matches;
                let mut levels = Vec::new();

                loop {
                    levels.push(Level {
                        node,
                        matches: current,
                        scope: scope.clone(),
                    });
                    let Some((name, sub)) = current.subcommand() else {
                        break;
                    };
                    node = node
                        .child(name)
                        .ok_or_else(|| self.internal_mismatch(node))?;
                    scope = scope.extend(node.own_args());
                    current = sub;
                }
                Ok(levels)
            }
        }
    }

    fn parse_failure(
        &self,
        err: clap::Error,
        tokens: &[String],
    ) -> Result<Resolution<'t>, CliError> {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                Ok(Resolution::Help(err.to_string()))
            }
            _ => {
                let node = self.locate(tokens);
                let rendered = err.to_string();
                let message = rendered
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ")
                    .to_string();
                tracing::debug!(command = %node.command_path(), %message, "parse error");
                Err(CliError::Parse {
                    command: node.command_path(),
                    message,
                    usage: self.parser.help_for(node),
                })
            }
        }
    }

    /// Deepest node the tokens name, used to pick the usage text for errors
    fn locate(&self, tokens: &[String]) -> &'t CommandNode {
        if let ParserRoot::Legacy { leaf_path, .. } = self.parser.root() {
            if let Some(node) = self.tree.find(&leaf_path[1..]) {
                return node;
            }
        }

        let mut node = self.tree.root();
        for token in tokens.iter().take_while(|t| t.as_str() != "--") {
            if let Some(child) = node.child(token) {
                node = child;
            }
        }
        node
    }

    fn internal_mismatch(&self, node: &CommandNode) -> CliError {
        CliError::Parse {
            command: node.command_path(),
            message: "parser and command tree disagree".to_string(),
            usage: self.parser.help_for(node),
        }
    }
}

/// Rewrite `--opt a b` into `--opt a --opt b` for multi-valued options typed
/// at a router level
///
/// A run of values ends at the next flag or at a token naming a sub-command
/// of the current router. Tokens at or below the leaf are left to clap.
fn split_router_values(tree: &CommandTree, tokens: Vec<String>) -> Vec<String> {
    let mut node = tree.root();
    let mut scope = ArgScope::default().extend(node.own_args());
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if node.is_leaf() || token == "--" {
            out.push(token);
            out.extend(iter);
            break;
        }
        if let Some(child) = node.child(&token) {
            node = child;
            scope = scope.extend(node.own_args());
            out.push(token);
            continue;
        }

        let multi = scope.named().any(|spec| {
            spec.is_multiple()
                && (spec.long_name().is_some_and(|l| token == format!("--{l}"))
                    || spec.short_name().is_some_and(|s| token == format!("-{s}")))
        });
        out.push(token.clone());
        if !multi {
            continue;
        }

        let mut first = true;
        while let Some(value) =
            iter.next_if(|next| !next.starts_with('-') && node.child(next).is_none())
        {
            if !first {
                out.push(token.clone());
            }
            out.push(value);
            first = false;
        }
    }
    out
}

/// Merge values top-down: the deepest level where the user supplied a value
/// wins, otherwise the leaf's effective default applies.
fn merge(levels: &[Level<'_, '_>]) -> ResolvedArgs {
    let mut values = BTreeMap::new();
    let mut supplied = BTreeSet::new();

    let Some(leaf) = levels.last() else {
        return ResolvedArgs::default();
    };

    for spec in leaf.scope.iter() {
        let typed = levels.iter().rev().find(|level| {
            level.parses(spec)
                && level.matches.value_source(spec.name()) == Some(ValueSource::CommandLine)
        });

        let value = match typed {
            Some(level) => {
                supplied.insert(spec.name().to_string());
                read_value(level.matches, spec)
            }
            None => read_value(leaf.matches, spec),
        };
        values.insert(spec.name().to_string(), value);
    }

    ResolvedArgs::from_parts(values, supplied)
}

fn read_value(matches: &ArgMatches, spec: &ArgumentSpec) -> ArgValue {
    let name = spec.name();
    match spec.kind() {
        ArgKind::Flag => ArgValue::Flag(
            matches
                .try_get_one::<bool>(name)
                .ok()
                .flatten()
                .copied()
                .unwrap_or(false),
        ),
        _ if spec.is_multiple() => match matches.try_get_many::<String>(name).ok().flatten() {
            Some(values) => ArgValue::Many(values.cloned().collect()),
            None => ArgValue::Unset,
        },
        _ => match matches.try_get_one::<String>(name).ok().flatten() {
            Some(value) => ArgValue::Single(value.clone()),
            None => ArgValue::Unset,
        },
    }
}

fn check_required(
    node: &CommandNode,
    scope: &ArgScope<'_>,
    args: &ResolvedArgs,
    usage: &str,
) -> Result<(), CliError> {
    let missing: Vec<String> = scope
        .iter()
        .filter(|spec| spec.is_required() && !args.is_set(spec.name()))
        .map(|spec| match spec.kind() {
            ArgKind::Positional => format!("<{}>", spec.name()),
            _ => format!("--{}", spec.long_name().unwrap_or(spec.name())),
        })
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    Err(CliError::Parse {
        command: node.command_path(),
        message: format!(
            "the following required arguments were not provided: {}",
            missing.join(", ")
        ),
        usage: usage.to_string(),
    })
}
