//! Declarative argument descriptions
//!
//! An `ArgumentSpec` describes one flag, option or positional contributed by a
//! command node. Specs are plain data; the parser builder turns them into
//! `clap::Arg`s and the resolver reads values back by `name`.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction};

/// What shape of value an argument takes on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Boolean switch (`-i`, `--implemented`)
    Flag,
    /// Option taking a free-form value (`--reader_name abi_netcdf`)
    Option,
    /// Option restricted to `allowed_values`
    Choice,
    /// Positional value (`fnames...`)
    Positional,
}

impl ArgKind {
    /// Whether the argument is written with a leading dash
    pub fn is_named(&self) -> bool {
        !matches!(self, ArgKind::Positional)
    }
}

/// One argument declared at a command node
///
/// Immutable once constructed: the builder-style methods consume `self` and
/// are only used while the owning node is being assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    name: String,
    short: Option<char>,
    long: Option<String>,
    kind: ArgKind,
    required: bool,
    default: Option<String>,
    allowed_values: Vec<String>,
    multiple: bool,
    help: String,
}

impl ArgumentSpec {
    fn new(name: impl Into<String>, kind: ArgKind) -> Self {
        let name = name.into();
        let long = kind.is_named().then(|| name.clone());
        Self {
            name,
            short: None,
            long,
            kind,
            required: false,
            default: None,
            allowed_values: Vec::new(),
            multiple: false,
            help: String::new(),
        }
    }

    /// Boolean switch, `--<name>` unless renamed with [`ArgumentSpec::long`]
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Flag)
    }

    /// Option taking a single free-form value
    pub fn option(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Option)
    }

    /// Option whose value must be one of `values`
    pub fn choice<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::new(name, ArgKind::Choice);
        spec.allowed_values = values.into_iter().map(Into::into).collect();
        spec
    }

    /// Positional argument, filled in declaration order
    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Positional)
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Override the long name (defaults to the argument name)
    pub fn long(mut self, long: impl Into<String>) -> Self {
        if self.kind.is_named() {
            self.long = Some(long.into());
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restrict a positional to a fixed set of values
    pub fn allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Accept one or more values (`nargs="+"` style)
    pub fn multiple(mut self) -> Self {
        if self.kind != ArgKind::Flag {
            self.multiple = true;
        }
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn values(&self) -> &[String] {
        &self.allowed_values
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn help_text(&self) -> &str {
        &self.help
    }

    /// How the argument is written in messages: `-p`, `--procflow` or `<fnames>`
    pub fn display_flag(&self) -> String {
        match (self.short, self.long.as_deref()) {
            (Some(short), _) => format!("-{short}"),
            (None, Some(long)) => format!("--{long}"),
            (None, None) => format!("<{}>", self.name),
        }
    }

    /// Whether a deeper re-declaration keeps this argument's external shape
    ///
    /// Shadowing may change defaults, help and requiredness, never the kind
    /// or the names a user types.
    pub fn is_compatible_shadow(&self, deeper: &ArgumentSpec) -> bool {
        self.kind == deeper.kind
            && self.short == deeper.short
            && self.long == deeper.long
            && self.multiple == deeper.multiple
    }

    /// Build the clap argument for one parser level
    ///
    /// `enforce_required` is only set for positionals at leaf level; named
    /// arguments are checked after values from every level are merged.
    pub(crate) fn to_clap_arg(&self, enforce_required: bool) -> Arg {
        let mut arg = Arg::new(self.name.clone());
        if !self.help.is_empty() {
            arg = arg.help(self.help.clone());
        }
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        if let Some(long) = &self.long {
            arg = arg.long(long.clone());
        }

        match self.kind {
            ArgKind::Flag => arg.action(ArgAction::SetTrue),
            ArgKind::Option | ArgKind::Choice | ArgKind::Positional => {
                if self.multiple {
                    arg = arg.action(ArgAction::Append).num_args(1..);
                } else {
                    arg = arg.action(ArgAction::Set);
                }
                if !self.allowed_values.is_empty() {
                    arg = arg.value_parser(PossibleValuesParser::new(self.allowed_values.clone()));
                }
                if let Some(default) = &self.default {
                    arg = arg.default_value(default.clone());
                }
                if self.kind == ArgKind::Positional {
                    arg = arg
                        .value_name(self.name.clone())
                        .required(enforce_required && self.required);
                } else {
                    arg = arg.value_name(self.name.to_uppercase());
                }
                arg
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_defaults_to_name() {
        let spec = ArgumentSpec::option("reader_name");
        assert_eq!(spec.long_name(), Some("reader_name"));
        assert_eq!(spec.display_flag(), "--reader_name");
    }

    #[test]
    fn test_short_wins_in_display() {
        let spec = ArgumentSpec::flag("implemented").short('i');
        assert_eq!(spec.display_flag(), "-i");
    }

    #[test]
    fn test_positional_has_no_long() {
        let spec = ArgumentSpec::positional("fnames")
            .long("ignored")
            .multiple();
        assert_eq!(spec.long_name(), None);
        assert!(spec.is_multiple());
        assert_eq!(spec.display_flag(), "<fnames>");
    }

    #[test]
    fn test_flags_cannot_be_multiple() {
        let spec = ArgumentSpec::flag("implemented").multiple();
        assert!(!spec.is_multiple());
    }

    #[test]
    fn test_choice_keeps_values() {
        let spec = ArgumentSpec::choice("format", ["yaml", "json"]).default_value("yaml");
        assert_eq!(spec.kind(), ArgKind::Choice);
        assert_eq!(spec.values(), ["yaml".to_string(), "json".to_string()]);
        assert_eq!(spec.default(), Some("yaml"));
    }

    #[test]
    fn test_shadow_compatibility() {
        let shallow = ArgumentSpec::option("procflow").help("Procflow to run");
        let deeper = ArgumentSpec::option("procflow").default_value("single_source");
        assert!(shallow.is_compatible_shadow(&deeper));

        let renamed = ArgumentSpec::option("procflow").long("flow");
        assert!(!shallow.is_compatible_shadow(&renamed));

        let retyped = ArgumentSpec::flag("procflow");
        assert!(!shallow.is_compatible_shadow(&retyped));
    }
}
