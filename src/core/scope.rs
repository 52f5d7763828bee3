//! Argument visibility along a command path

use crate::core::argument::{ArgKind, ArgumentSpec};

/// Ordered set of arguments visible at one node
///
/// Ancestors come first. A deeper declaration with the same name replaces the
/// shallower one in place, so the argument keeps its position in help output.
#[derive(Debug, Clone, Default)]
pub struct ArgScope<'a> {
    entries: Vec<&'a ArgumentSpec>,
}

impl<'a> ArgScope<'a> {
    /// Scope of a child that declares `own`
    pub fn extend(&self, own: &'a [ArgumentSpec]) -> Self {
        let mut entries = self.entries.clone();
        for arg in own {
            match entries.iter().position(|e| e.name() == arg.name()) {
                Some(index) => entries[index] = arg,
                None => entries.push(arg),
            }
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&'a ArgumentSpec> {
        self.entries.iter().copied().find(|e| e.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ArgumentSpec> + '_ {
        self.entries.iter().copied()
    }

    /// Arguments a router level parses: everything except positionals
    pub fn named(&self) -> impl Iterator<Item = &'a ArgumentSpec> + '_ {
        self.iter().filter(|a| a.kind() != ArgKind::Positional)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
