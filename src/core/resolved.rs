//! The argument set handed to a leaf command

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Value of one resolved argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Flag(bool),
    Single(String),
    Many(Vec<String>),
    /// Declared but neither supplied nor defaulted
    Unset,
}

impl ArgValue {
    pub fn is_set(&self) -> bool {
        !matches!(self, ArgValue::Unset)
    }
}

/// Fully merged arguments for one invocation
///
/// Built once by the resolver. Nothing mutates it afterwards: deriving a
/// value (the procflow default) yields a new `ResolvedArgs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedArgs {
    values: BTreeMap<String, ArgValue>,
    #[serde(skip)]
    supplied: BTreeSet<String>,
}

impl ResolvedArgs {
    pub(crate) fn from_parts(
        values: BTreeMap<String, ArgValue>,
        supplied: BTreeSet<String>,
    ) -> Self {
        Self { values, supplied }
    }

    /// Copy of these arguments with `name` set to a derived value
    ///
    /// Derived values are not recorded as user-supplied.
    pub fn with_derived(&self, name: &str, value: ArgValue) -> Self {
        let mut values = self.values.clone();
        values.insert(name.to_string(), value);
        Self {
            values,
            supplied: self.supplied.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Whether a flag is on; false for unknown names
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Flag(true)))
    }

    /// Single value of an option or positional
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Single(value)) => Some(value),
            Some(ArgValue::Many(values)) => values.first().map(String::as_str),
            _ => None,
        }
    }

    /// All values of a multi-valued argument (empty when unset)
    pub fn values(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(ArgValue::Many(values)) => values,
            Some(ArgValue::Single(value)) => std::slice::from_ref(value),
            _ => &[],
        }
    }

    /// Whether the user typed this argument, as opposed to a default
    pub fn is_supplied(&self, name: &str) -> bool {
        self.supplied.contains(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(ArgValue::is_set)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
