//! Error taxonomy for tree construction and invocation handling

use miette::Diagnostic;
use thiserror::Error;

/// Exit code for usage problems (parse, incomplete, constraint, legacy)
pub const EXIT_USAGE: i32 = 2;

/// Exit code for startup and execution failures
pub const EXIT_FAILURE: i32 = 1;

/// A malformed command tree, detected while it is being built
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum StructuralError {
    #[error("duplicate sub-command `{name}` under `{parent}`")]
    #[diagnostic(code(geoips::structural::duplicate_sibling))]
    DuplicateSibling { parent: String, name: String },

    #[error("invalid command name `{name}`")]
    #[diagnostic(
        code(geoips::structural::invalid_name),
        help("command names must be non-empty and must not start with `-`")
    )]
    InvalidName { name: String },

    #[error("router `{name}` has no sub-commands")]
    #[diagnostic(code(geoips::structural::empty_router))]
    EmptyRouter { name: String },

    #[error("router `{command}` declares positional `{argument}`")]
    #[diagnostic(
        code(geoips::structural::positional_on_router),
        help("positionals belong to leaf commands")
    )]
    PositionalOnRouter { command: String, argument: String },

    #[error("`{command}` declares argument `{argument}` more than once")]
    #[diagnostic(code(geoips::structural::duplicate_argument))]
    DuplicateArgument { command: String, argument: String },

    #[error(
        "`{command}` re-declares inherited argument `{argument}` with a different kind or name"
    )]
    #[diagnostic(
        code(geoips::structural::shadow_mismatch),
        help("shadowing may only change defaults, help and requiredness")
    )]
    ShadowMismatch { command: String, argument: String },

    #[error("`{command}`: `{flag}` is used by both `{first}` and `{second}`")]
    #[diagnostic(code(geoips::structural::flag_collision))]
    FlagCollision {
        command: String,
        flag: String,
        first: String,
        second: String,
    },

    #[error("`{command}`: `{flag}` is reserved for help and version")]
    #[diagnostic(code(geoips::structural::reserved_flag))]
    ReservedFlag { command: String, flag: String },

    #[error(
        "`{command}`: positional `{argument}` cannot follow a multi-valued or optional positional"
    )]
    #[diagnostic(code(geoips::structural::positional_order))]
    PositionalOrder { command: String, argument: String },

    #[error("`{command}` references unknown argument `{argument}`")]
    #[diagnostic(code(geoips::structural::unknown_argument))]
    UnknownArgument { command: String, argument: String },

    #[error("`{command}` has legacy alias `{alias}` but no procflow policy")]
    #[diagnostic(
        code(geoips::structural::misplaced_legacy_alias),
        help("only legacy-capable leaves may carry legacy aliases")
    )]
    MisplacedLegacyAlias { command: String, alias: String },

    #[error("router `{command}` declares a {setting}; only leaves can carry one")]
    #[diagnostic(code(geoips::structural::leaf_only_setting))]
    LeafOnlySetting {
        command: String,
        setting: &'static str,
    },

    #[error("legacy alias `{alias}` is claimed by both `{first}` and `{second}`")]
    #[diagnostic(code(geoips::structural::duplicate_legacy_alias))]
    DuplicateLegacyAlias {
        alias: String,
        first: String,
        second: String,
    },
}

/// A semantically disallowed flag combination
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
#[error("{message}")]
#[diagnostic(code(geoips::cli::constraint_violation))]
pub struct ConstraintViolation {
    /// Offending flags as the user writes them (`-p`, `-i`)
    pub flags: Vec<String>,
    /// Command path, e.g. `geoips list interfaces`
    pub command: String,
    pub message: String,
    /// Usage text of the command the rule belongs to
    pub usage: String,
}

/// Everything that can stop an invocation short of a successful leaf run
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Structural(#[from] StructuralError),

    #[error("{message}")]
    #[diagnostic(code(geoips::cli::parse_error))]
    Parse {
        command: String,
        message: String,
        usage: String,
    },

    #[error("`{command}` needs a sub-command")]
    #[diagnostic(code(geoips::cli::incomplete_command))]
    IncompleteCommand { command: String, usage: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Constraint(#[from] ConstraintViolation),

    #[error(
        "Deprecated, Legacy '{entry_point}' call was used and --{field} flag wasn't specified. \
         Please either specify which procflow is being executed via '--{field} <procflow_name>' \
         or use the supported procflow call '{modern_form}'"
    )]
    #[diagnostic(code(geoips::cli::legacy_ambiguity))]
    LegacyAmbiguity {
        entry_point: String,
        field: String,
        modern_form: String,
        usage: String,
    },

    #[error("no legacy entry point named `{0}`")]
    #[diagnostic(code(geoips::cli::unknown_entry_point))]
    UnknownEntryPoint(String),

    #[error("`{command}` failed:\n{report}")]
    #[diagnostic(code(geoips::cli::execution))]
    Execution { command: String, report: String },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Parse { .. }
            | CliError::IncompleteCommand { .. }
            | CliError::Constraint(_)
            | CliError::LegacyAmbiguity { .. } => EXIT_USAGE,
            CliError::Structural(_)
            | CliError::UnknownEntryPoint(_)
            | CliError::Execution { .. } => EXIT_FAILURE,
        }
    }

    /// Usage text of the command the error is reported against
    pub fn usage(&self) -> Option<&str> {
        match self {
            CliError::Parse { usage, .. }
            | CliError::IncompleteCommand { usage, .. }
            | CliError::LegacyAmbiguity { usage, .. } => Some(usage),
            CliError::Constraint(violation) => Some(&violation.usage),
            _ => None,
        }
    }

    /// Command path the error belongs to, when there is one
    pub fn command(&self) -> Option<&str> {
        match self {
            CliError::Parse { command, .. }
            | CliError::IncompleteCommand { command, .. }
            | CliError::Execution { command, .. } => Some(command),
            CliError::Constraint(violation) => Some(&violation.command),
            _ => None,
        }
    }

    /// Text written to stderr: usage block followed by `<command>: error: <message>`
    pub fn render(&self) -> String {
        match (self.usage(), self.command()) {
            (Some(usage), Some(command)) => {
                format!("{}\n\n{}: error: {}", usage.trim_end(), command, self)
            }
            (Some(usage), None) => format!("{}\n\nerror: {}", usage.trim_end(), self),
            _ => format!("error: {self}"),
        }
    }
}
