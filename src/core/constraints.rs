//! Flag-combination rules checked after parsing and before dispatch

use crate::core::error::ConstraintViolation;
use crate::core::node::CommandNode;
use crate::core::resolved::{ArgValue, ResolvedArgs};
use crate::core::scope::ArgScope;

/// A rule over two arguments of one leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintRule {
    /// `dependent` is only meaningful when `prerequisite` is also given
    Requires {
        dependent: String,
        prerequisite: String,
    },
    /// `first` and `second` cannot be given together
    Conflicts { first: String, second: String },
}

impl ConstraintRule {
    pub fn requires(dependent: impl Into<String>, prerequisite: impl Into<String>) -> Self {
        ConstraintRule::Requires {
            dependent: dependent.into(),
            prerequisite: prerequisite.into(),
        }
    }

    pub fn conflicts(first: impl Into<String>, second: impl Into<String>) -> Self {
        ConstraintRule::Conflicts {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Argument names the rule refers to
    pub fn arguments(&self) -> [&str; 2] {
        match self {
            ConstraintRule::Requires {
                dependent,
                prerequisite,
            } => [dependent.as_str(), prerequisite.as_str()],
            ConstraintRule::Conflicts { first, second } => [first.as_str(), second.as_str()],
        }
    }

    /// Offending flags, or `None` when `args` satisfy the rule
    fn check(&self, args: &ResolvedArgs) -> Option<[&str; 2]> {
        match self {
            ConstraintRule::Requires {
                dependent,
                prerequisite,
            } => (is_used(args, dependent) && !is_used(args, prerequisite))
                .then_some([dependent.as_str(), prerequisite.as_str()]),
            ConstraintRule::Conflicts { first, second } => (is_used(args, first)
                && is_used(args, second))
            .then_some([first.as_str(), second.as_str()]),
        }
    }

    fn message(&self, flags: &[String; 2]) -> String {
        match self {
            ConstraintRule::Requires { .. } => format!(
                "You cannot use the `{}` flag without the `{}` flag.",
                flags[0], flags[1]
            ),
            ConstraintRule::Conflicts { .. } => format!(
                "You cannot use the `{}` flag together with the `{}` flag.",
                flags[0], flags[1]
            ),
        }
    }
}

/// An argument counts as used when the user typed it; a flag also has to be on
fn is_used(args: &ResolvedArgs, name: &str) -> bool {
    args.is_supplied(name) && args.is_set(name) && args.get(name) != Some(&ArgValue::Flag(false))
}

/// Checks a leaf's rules against its resolved arguments
pub struct ConstraintValidator<'a> {
    node: &'a CommandNode,
    scope: &'a ArgScope<'a>,
    usage: &'a str,
}

impl<'a> ConstraintValidator<'a> {
    pub fn new(node: &'a CommandNode, scope: &'a ArgScope<'a>, usage: &'a str) -> Self {
        Self { node, scope, usage }
    }

    /// First violated rule, in declaration order
    pub fn validate(&self, args: &ResolvedArgs) -> Result<(), ConstraintViolation> {
        let Some(leaf) = self.node.as_leaf() else {
            return Ok(());
        };

        for rule in leaf.constraints() {
            if let Some(names) = rule.check(args) {
                let flags = names.map(|name| self.display(name));
                tracing::debug!(command = %self.node.command_path(), ?flags, "constraint violated");
                return Err(ConstraintViolation {
                    message: rule.message(&flags),
                    flags: flags.to_vec(),
                    command: self.node.command_path(),
                    usage: self.usage.to_string(),
                });
            }
        }
        Ok(())
    }

    fn display(&self, name: &str) -> String {
        self.scope
            .get(name)
            .map(|spec| spec.display_flag())
            .unwrap_or_else(|| format!("--{name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::argument::ArgumentSpec;
    use crate::core::node::CommandTree;
    use std::collections::{BTreeMap, BTreeSet};

    fn interfaces_tree() -> CommandTree {
        let leaf = CommandNode::leaf(
            "interfaces",
            "",
            vec![
                ArgumentSpec::flag("implemented").short('i'),
                ArgumentSpec::option("package").short('p'),
                ArgumentSpec::flag("columns"),
            ],
            |_: &ResolvedArgs| Ok(0),
        )
        .unwrap()
        .with_constraint(ConstraintRule::requires("package", "implemented"))
        .with_constraint(ConstraintRule::conflicts("columns", "implemented"));
        let list = CommandNode::router("list", "", vec![], vec![leaf]).unwrap();
        let root = CommandNode::router("geoips", "", vec![], vec![list]).unwrap();
        CommandTree::new(root).unwrap()
    }

    fn args(values: &[(&str, ArgValue)]) -> ResolvedArgs {
        let map: BTreeMap<_, _> = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let supplied: BTreeSet<_> = values
            .iter()
            .filter(|(_, v)| v.is_set())
            .map(|(k, _)| k.to_string())
            .collect();
        ResolvedArgs::from_parts(map, supplied)
    }

    #[test]
    fn test_dependent_without_prerequisite() {
        let tree = interfaces_tree();
        let node = tree.find(&["list", "interfaces"]).unwrap();
        let scope = tree.scope_of(node);
        let validator = ConstraintValidator::new(
            node,
            &scope,
            "usage: To use, type `geoips list interfaces`",
        );

        let err = validator
            .validate(&args(&[
                ("implemented", ArgValue::Flag(false)),
                ("package", ArgValue::Single("geoips".to_string())),
            ]))
            .unwrap_err();
        assert_eq!(
            err.message,
            "You cannot use the `-p` flag without the `-i` flag."
        );
        assert_eq!(err.flags, ["-p", "-i"]);
        assert_eq!(err.command, "geoips list interfaces");
    }

    #[test]
    fn test_dependent_with_prerequisite_passes() {
        let tree = interfaces_tree();
        let node = tree.find(&["list", "interfaces"]).unwrap();
        let scope = tree.scope_of(node);
        let validator = ConstraintValidator::new(node, &scope, "");

        assert!(validator
            .validate(&args(&[
                ("implemented", ArgValue::Flag(true)),
                ("package", ArgValue::Single("geoips".to_string())),
            ]))
            .is_ok());
        assert!(validator.validate(&args(&[])).is_ok());
    }

    #[test]
    fn test_conflict_message_uses_long_form() {
        let tree = interfaces_tree();
        let node = tree.find(&["list", "interfaces"]).unwrap();
        let scope = tree.scope_of(node);
        let validator = ConstraintValidator::new(node, &scope, "");

        let err = validator
            .validate(&args(&[
                ("implemented", ArgValue::Flag(true)),
                ("columns", ArgValue::Flag(true)),
            ]))
            .unwrap_err();
        assert_eq!(
            err.message,
            "You cannot use the `--columns` flag together with the `-i` flag."
        );
    }

    #[test]
    fn test_defaults_do_not_count_as_used() {
        let tree = interfaces_tree();
        let node = tree.find(&["list", "interfaces"]).unwrap();
        let scope = tree.scope_of(node);
        let validator = ConstraintValidator::new(node, &scope, "");

        let mut values = BTreeMap::new();
        let package = ArgValue::Single("geoips".to_string());
        values.insert("package".to_string(), package);
        let defaulted = ResolvedArgs::from_parts(values, BTreeSet::new());
        assert!(validator.validate(&defaulted).is_ok());
    }
}
