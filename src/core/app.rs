//! End-to-end invocation: parse, resolve, validate, dispatch

use std::collections::HashMap;

use crate::core::dispatch::Dispatcher;
use crate::core::error::{CliError, EXIT_FAILURE};
use crate::core::legacy::InvocationChannel;
use crate::core::node::CommandTree;
use crate::core::parser::{ComposedParser, ParserTreeBuilder};
use crate::core::resolver::{InvocationResolver, Resolution};

/// Terminal state of an invocation that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Help or version text; no leaf ran
    Help(String),
    /// A leaf ran and returned `exit_code`
    Completed { command: String, exit_code: i32 },
}

/// A frozen command tree plus its composed parsers
pub struct App {
    tree: CommandTree,
    parser: ComposedParser,
    legacy: HashMap<String, ComposedParser>,
}

impl App {
    pub fn new(tree: CommandTree) -> Self {
        let parser = ParserTreeBuilder::build(&tree);
        let legacy = tree
            .walk()
            .into_iter()
            .flat_map(|node| node.legacy_aliases().iter())
            .filter_map(|alias| {
                ParserTreeBuilder::build_legacy(&tree, alias).map(|parser| (alias.clone(), parser))
            })
            .collect();
        Self {
            tree,
            parser,
            legacy,
        }
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn parser(&self) -> &ComposedParser {
        &self.parser
    }

    /// Deprecated entry points this app answers to
    pub fn legacy_entry_points(&self) -> impl Iterator<Item = &str> {
        self.legacy.keys().map(String::as_str)
    }

    /// Select a leaf and merge its arguments without running anything
    pub fn resolve<I, T>(
        &self,
        channel: &InvocationChannel,
        tokens: I,
    ) -> Result<Resolution<'_>, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let parser = match channel {
            InvocationChannel::Modern => &self.parser,
            InvocationChannel::Legacy { entry_point } => {
                tracing::warn!(
                    %entry_point,
                    "'{entry_point}' is deprecated, use 'geoips run <procflow_name>' instead"
                );
                self.legacy
                    .get(entry_point)
                    .ok_or_else(|| CliError::UnknownEntryPoint(entry_point.clone()))?
            }
        };
        InvocationResolver::new(&self.tree, parser).resolve(tokens, channel)
    }

    /// Resolve, validate and dispatch; no output is written
    pub fn invoke<I, T>(
        &self,
        channel: &InvocationChannel,
        tokens: I,
    ) -> Result<Invocation, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        match self.resolve(channel, tokens)? {
            Resolution::Help(text) => Ok(Invocation::Help(text)),
            Resolution::Leaf(resolved) => {
                let validated = resolved.validate(&self.tree)?;
                let command = validated.node().command_path();
                let exit_code = Dispatcher::dispatch(validated)?;
                Ok(Invocation::Completed { command, exit_code })
            }
        }
    }

    /// Process-level entry: prints help to stdout, errors to stderr, returns the exit code
    pub fn run<I, T>(&self, channel: &InvocationChannel, tokens: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        match self.invoke(channel, tokens) {
            Ok(Invocation::Help(text)) => {
                print!("{text}");
                if !text.ends_with('\n') {
                    println!();
                }
                0
            }
            Ok(Invocation::Completed { exit_code, .. }) => exit_code,
            Err(CliError::Execution { report, .. }) => {
                eprintln!("{report}");
                EXIT_FAILURE
            }
            Err(err) => {
                eprintln!("{}", err.render());
                err.exit_code()
            }
        }
    }
}
