//! Command tree model
//!
//! A tree is assembled bottom-up: leaves first, then the routers that own
//! them, and finally a [`CommandTree`] wrapping the root. Each router checks
//! its own children when it is built; `CommandTree::new` runs the checks that
//! need the whole path (inherited arguments, flag collisions, legacy aliases)
//! and assigns every node its command path. After that the tree is read-only.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::core::argument::{ArgKind, ArgumentSpec};
use crate::core::constraints::ConstraintRule;
use crate::core::error::StructuralError;
use crate::core::legacy::ProcflowPolicy;
use crate::core::resolved::ResolvedArgs;
use crate::core::scope::ArgScope;

/// Execution function of a leaf command; returns the process exit code
pub type LeafFn = Box<dyn Fn(&ResolvedArgs) -> miette::Result<i32> + Send + Sync>;

/// Leaf-only data
pub struct Leaf {
    exec: LeafFn,
    constraints: Vec<ConstraintRule>,
    procflow: Option<ProcflowPolicy>,
}

impl Leaf {
    pub fn execute(&self, args: &ResolvedArgs) -> miette::Result<i32> {
        (self.exec)(args)
    }

    pub fn constraints(&self) -> &[ConstraintRule] {
        &self.constraints
    }

    pub fn procflow(&self) -> Option<&ProcflowPolicy> {
        self.procflow.as_ref()
    }
}

/// Router or leaf
pub enum NodeKind {
    /// Routes to one of its children; never executes
    Router(Vec<CommandNode>),
    /// Executable command; has no children
    Leaf(Leaf),
}

/// One command in the tree
pub struct CommandNode {
    name: String,
    about: String,
    instructions: Option<String>,
    path: Vec<String>,
    own_args: Vec<ArgumentSpec>,
    legacy_aliases: Vec<String>,
    /// Leaf-only settings that were attached to a router
    misplaced: Vec<&'static str>,
    kind: NodeKind,
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("CommandNode");
        s.field("name", &self.name).field("args", &self.own_args);
        match &self.kind {
            NodeKind::Router(children) => s.field("children", children),
            NodeKind::Leaf(leaf) => s.field("constraints", &leaf.constraints),
        };
        s.finish()
    }
}

fn check_name(name: &str) -> Result<(), StructuralError> {
    if name.is_empty() || name.starts_with('-') || name.contains(char::is_whitespace) {
        return Err(StructuralError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn check_own_args(command: &str, args: &[ArgumentSpec]) -> Result<(), StructuralError> {
    let mut seen = HashSet::new();
    for arg in args {
        if !seen.insert(arg.name()) {
            return Err(StructuralError::DuplicateArgument {
                command: command.to_string(),
                argument: arg.name().to_string(),
            });
        }
    }
    Ok(())
}

impl CommandNode {
    /// Build a router from already constructed children
    pub fn router(
        name: impl Into<String>,
        about: impl Into<String>,
        own_args: Vec<ArgumentSpec>,
        children: Vec<CommandNode>,
    ) -> Result<Self, StructuralError> {
        let name = name.into();
        check_name(&name)?;
        check_own_args(&name, &own_args)?;

        if children.is_empty() {
            return Err(StructuralError::EmptyRouter { name });
        }
        if let Some(arg) = own_args.iter().find(|a| a.kind() == ArgKind::Positional) {
            return Err(StructuralError::PositionalOnRouter {
                command: name,
                argument: arg.name().to_string(),
            });
        }

        let mut names = HashSet::new();
        for child in &children {
            if !names.insert(child.name.as_str()) {
                return Err(StructuralError::DuplicateSibling {
                    parent: name,
                    name: child.name.clone(),
                });
            }
        }

        Ok(Self {
            name,
            about: about.into(),
            instructions: None,
            path: Vec::new(),
            own_args,
            legacy_aliases: Vec::new(),
            misplaced: Vec::new(),
            kind: NodeKind::Router(children),
        })
    }

    /// Build an executable leaf
    pub fn leaf<F>(
        name: impl Into<String>,
        about: impl Into<String>,
        own_args: Vec<ArgumentSpec>,
        exec: F,
    ) -> Result<Self, StructuralError>
    where
        F: Fn(&ResolvedArgs) -> miette::Result<i32> + Send + Sync + 'static,
    {
        let name = name.into();
        check_name(&name)?;
        check_own_args(&name, &own_args)?;

        Ok(Self {
            name,
            about: about.into(),
            instructions: None,
            path: Vec::new(),
            own_args,
            legacy_aliases: Vec::new(),
            misplaced: Vec::new(),
            kind: NodeKind::Leaf(Leaf {
                exec: Box::new(exec),
                constraints: Vec::new(),
                procflow: None,
            }),
        })
    }

    /// Extra help text shown below the usage preamble
    pub fn with_instructions(mut self, text: impl Into<String>) -> Self {
        self.instructions = Some(text.into());
        self
    }

    /// Attach a flag-combination rule
    ///
    /// Leaves only; a router carrying one fails `CommandTree::new`.
    pub fn with_constraint(mut self, rule: ConstraintRule) -> Self {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => leaf.constraints.push(rule),
            NodeKind::Router(_) => self.misplaced.push("constraint"),
        }
        self
    }

    /// Make this leaf legacy-capable
    ///
    /// Leaves only; a router carrying one fails `CommandTree::new`.
    pub fn with_procflow(mut self, policy: ProcflowPolicy) -> Self {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => leaf.procflow = Some(policy),
            NodeKind::Router(_) => self.misplaced.push("procflow policy"),
        }
        self
    }

    /// Register a deprecated top-level entry point that maps onto this leaf
    pub fn with_legacy_alias(mut self, alias: impl Into<String>) -> Self {
        self.legacy_aliases.push(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn own_args(&self) -> &[ArgumentSpec] {
        &self.own_args
    }

    pub fn legacy_aliases(&self) -> &[String] {
        &self.legacy_aliases
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Router(_) => None,
        }
    }

    pub fn children(&self) -> &[CommandNode] {
        match &self.kind {
            NodeKind::Router(children) => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children().iter().find(|c| c.name == name)
    }

    /// Names from the root down to this node, e.g. `["geoips", "list", "interfaces"]`
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Space-joined command path, e.g. `geoips list interfaces`
    pub fn command_path(&self) -> String {
        self.path.join(" ")
    }

    /// The stable first line of every help and usage text
    pub fn usage_preamble(&self) -> String {
        format!("usage: To use, type `{}`", self.command_path())
    }

    fn assign_paths(&mut self, parent: &[String]) {
        let mut path = parent.to_vec();
        path.push(self.name.clone());
        if let NodeKind::Router(children) = &mut self.kind {
            for child in children.iter_mut() {
                child.assign_paths(&path);
            }
        }
        self.path = path;
    }
}

/// The validated, frozen command hierarchy
#[derive(Debug)]
pub struct CommandTree {
    root: CommandNode,
}

impl CommandTree {
    /// Freeze `root` into a tree after checking every path through it
    pub fn new(mut root: CommandNode) -> Result<Self, StructuralError> {
        root.assign_paths(&[]);
        let mut aliases = HashMap::new();
        validate_node(&root, &ArgScope::default(), &mut aliases)?;
        tracing::debug!(root = %root.name, legacy_aliases = aliases.len(), "command tree built");
        Ok(Self { root })
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Node at `path` below the root (an empty path is the root itself)
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&CommandNode> {
        path.iter()
            .try_fold(&self.root, |node, name| node.child(name.as_ref()))
    }

    /// Leaf reachable through the deprecated entry point `alias`
    pub fn find_legacy(&self, alias: &str) -> Option<&CommandNode> {
        fn walk<'a>(node: &'a CommandNode, alias: &str) -> Option<&'a CommandNode> {
            if node.legacy_aliases.iter().any(|a| a == alias) {
                return Some(node);
            }
            node.children().iter().find_map(|c| walk(c, alias))
        }
        walk(&self.root, alias)
    }

    /// Arguments visible at the node at `path`, ancestors first
    pub fn scope_of(&self, node: &CommandNode) -> ArgScope<'_> {
        let mut scope = ArgScope::default();
        let mut current = &self.root;
        scope = scope.extend(current.own_args());
        for name in node.path().iter().skip(1) {
            match current.child(name) {
                Some(child) => {
                    current = child;
                    scope = scope.extend(current.own_args());
                }
                None => break,
            }
        }
        scope
    }

    /// Every node in depth-first order
    pub fn walk(&self) -> Vec<&CommandNode> {
        fn collect<'a>(node: &'a CommandNode, out: &mut Vec<&'a CommandNode>) {
            out.push(node);
            for child in node.children() {
                collect(child, out);
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }

    /// Structural summary used to compare two builds of the same registry
    ///
    /// Maps each command path to its depth and the names of its visible arguments.
    pub fn shape(&self) -> BTreeMap<String, (usize, Vec<String>)> {
        self.walk()
            .into_iter()
            .map(|node| {
                let args = self
                    .scope_of(node)
                    .iter()
                    .map(|a| a.name().to_string())
                    .collect();
                (node.command_path(), (node.path().len() - 1, args))
            })
            .collect()
    }
}

fn validate_node<'a>(
    node: &'a CommandNode,
    inherited: &ArgScope<'a>,
    aliases: &mut HashMap<String, String>,
) -> Result<(), StructuralError> {
    let command = node.command_path();

    for arg in node.own_args() {
        if let Some(shallow) = inherited.get(arg.name()) {
            if !shallow.is_compatible_shadow(arg) {
                return Err(StructuralError::ShadowMismatch {
                    command,
                    argument: arg.name().to_string(),
                });
            }
        }
    }
    let scope = inherited.extend(node.own_args());
    check_flags(&command, &scope)?;

    match &node.kind {
        NodeKind::Router(children) => {
            if let Some(setting) = node.misplaced.first() {
                return Err(StructuralError::LeafOnlySetting {
                    command,
                    setting: *setting,
                });
            }
            if let Some(alias) = node.legacy_aliases.first() {
                return Err(StructuralError::MisplacedLegacyAlias {
                    command,
                    alias: alias.clone(),
                });
            }
            for child in children {
                validate_node(child, &scope, aliases)?;
            }
        }
        NodeKind::Leaf(leaf) => {
            check_positionals(&command, &scope)?;
            for rule in &leaf.constraints {
                for name in rule.arguments() {
                    if scope.get(name).is_none() {
                        return Err(StructuralError::UnknownArgument {
                            command,
                            argument: name.to_string(),
                        });
                    }
                }
            }
            match &leaf.procflow {
                Some(policy) => {
                    if scope.get(policy.field()).is_none() {
                        return Err(StructuralError::UnknownArgument {
                            command,
                            argument: policy.field().to_string(),
                        });
                    }
                }
                None => {
                    if let Some(alias) = node.legacy_aliases.first() {
                        return Err(StructuralError::MisplacedLegacyAlias {
                            command,
                            alias: alias.clone(),
                        });
                    }
                }
            }
            for alias in &node.legacy_aliases {
                if let Some(first) = aliases.insert(alias.clone(), command.clone()) {
                    return Err(StructuralError::DuplicateLegacyAlias {
                        alias: alias.clone(),
                        first,
                        second: command,
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_flags(command: &str, scope: &ArgScope<'_>) -> Result<(), StructuralError> {
    let mut shorts: HashMap<char, &str> = HashMap::new();
    let mut longs: HashMap<&str, &str> = HashMap::new();

    for arg in scope.iter() {
        if let Some(short) = arg.short_name() {
            if short == 'h' || short == 'V' {
                return Err(StructuralError::ReservedFlag {
                    command: command.to_string(),
                    flag: format!("-{short}"),
                });
            }
            if let Some(first) = shorts.insert(short, arg.name()) {
                return Err(StructuralError::FlagCollision {
                    command: command.to_string(),
                    flag: format!("-{short}"),
                    first: first.to_string(),
                    second: arg.name().to_string(),
                });
            }
        }
        if let Some(long) = arg.long_name() {
            if long == "help" || long == "version" {
                return Err(StructuralError::ReservedFlag {
                    command: command.to_string(),
                    flag: format!("--{long}"),
                });
            }
            if let Some(first) = longs.insert(long, arg.name()) {
                return Err(StructuralError::FlagCollision {
                    command: command.to_string(),
                    flag: format!("--{long}"),
                    first: first.to_string(),
                    second: arg.name().to_string(),
                });
            }
        }
    }
    Ok(())
}

fn check_positionals(command: &str, scope: &ArgScope<'_>) -> Result<(), StructuralError> {
    let mut closed = false;
    let mut optional_seen = false;
    for arg in scope.iter().filter(|a| a.kind() == ArgKind::Positional) {
        if closed || (optional_seen && arg.is_required()) {
            return Err(StructuralError::PositionalOrder {
                command: command.to_string(),
                argument: arg.name().to_string(),
            });
        }
        closed = arg.is_multiple();
        optional_seen |= !arg.is_required();
    }
    Ok(())
}
