//! Validation and dispatch of a resolved leaf

use crate::core::constraints::ConstraintValidator;
use crate::core::error::CliError;
use crate::core::node::{CommandNode, CommandTree};
use crate::core::resolved::ResolvedArgs;
use crate::core::resolver::ResolvedInvocation;

/// A leaf whose arguments passed every constraint; ready to run exactly once
#[derive(Debug)]
pub struct ValidatedInvocation<'t> {
    node: &'t CommandNode,
    args: ResolvedArgs,
}

impl<'t> ValidatedInvocation<'t> {
    pub fn node(&self) -> &'t CommandNode {
        self.node
    }

    pub fn args(&self) -> &ResolvedArgs {
        &self.args
    }
}

impl<'t> ResolvedInvocation<'t> {
    /// Run the leaf's constraint rules
    pub fn validate(self, tree: &'t CommandTree) -> Result<ValidatedInvocation<'t>, CliError> {
        let scope = tree.scope_of(self.node);
        ConstraintValidator::new(self.node, &scope, &self.usage).validate(&self.args)?;
        Ok(ValidatedInvocation {
            node: self.node,
            args: self.args,
        })
    }
}

/// Hands validated arguments to the leaf execution function
pub struct Dispatcher;

impl Dispatcher {
    /// Run the leaf and pass its exit code through unchanged
    pub fn dispatch(invocation: ValidatedInvocation<'_>) -> Result<i32, CliError> {
        let ValidatedInvocation { node, args } = invocation;
        let command = node.command_path();

        let Some(leaf) = node.as_leaf() else {
            return Err(CliError::IncompleteCommand {
                usage: node.usage_preamble(),
                command,
            });
        };

        tracing::info!(%command, "dispatching");
        match leaf.execute(&args) {
            Ok(code) => {
                tracing::debug!(%command, code, "leaf finished");
                Ok(code)
            }
            Err(report) => Err(CliError::Execution {
                command,
                report: format!("{report:?}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::argument::ArgumentSpec;
    use crate::core::constraints::ConstraintRule;
    use crate::core::legacy::InvocationChannel;
    use crate::core::parser::ParserTreeBuilder;
    use crate::core::resolver::{InvocationResolver, Resolution};

    fn tree() -> CommandTree {
        let exit = CommandNode::leaf(
            "exit",
            "",
            vec![
                ArgumentSpec::option("code").default_value("0"),
                ArgumentSpec::flag("fail"),
                ArgumentSpec::flag("force"),
            ],
            |args: &ResolvedArgs| {
                if args.flag("fail") {
                    miette::bail!("leaf failed");
                }
                Ok(args.value("code").and_then(|c| c.parse().ok()).unwrap_or(0))
            },
        )
        .unwrap()
        .with_constraint(ConstraintRule::requires("force", "fail"));
        let root = CommandNode::router("geoips", "", vec![], vec![exit]).unwrap();
        CommandTree::new(root).unwrap()
    }

    fn validated<'t>(
        tree: &'t CommandTree,
        tokens: &[&str],
    ) -> Result<ValidatedInvocation<'t>, CliError> {
        let parser = ParserTreeBuilder::build(tree);
        let resolver = InvocationResolver::new(tree, &parser);
        match resolver.resolve(tokens.iter().copied(), &InvocationChannel::Modern)? {
            Resolution::Leaf(inv) => inv.validate(tree),
            Resolution::Help(_) => panic!("unexpected help"),
        }
    }

    #[test]
    fn test_exit_code_passes_through() {
        let tree = tree();
        let inv = validated(&tree, &["exit", "--code", "7"]).unwrap();
        assert_eq!(Dispatcher::dispatch(inv).unwrap(), 7);
    }

    #[test]
    fn test_leaf_failure_becomes_execution_error() {
        let tree = tree();
        let inv = validated(&tree, &["exit", "--fail"]).unwrap();
        let err = Dispatcher::dispatch(inv).unwrap_err();
        assert!(matches!(err, CliError::Execution { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_violation_stops_before_dispatch() {
        let tree = tree();
        let err = validated(&tree, &["exit", "--force"]).unwrap_err();
        assert!(err
            .to_string()
            .contains("You cannot use the `--force` flag without the `--fail` flag."));
    }
}
