//! Core module - command tree, parser composition and dispatch

pub mod app;
pub mod argument;
pub mod config;
pub mod constraints;
pub mod dispatch;
pub mod error;
pub mod legacy;
pub mod logging;
pub mod node;
pub mod parser;
pub mod resolved;
pub mod resolver;
pub mod scope;

pub use app::{App, Invocation};
pub use argument::{ArgKind, ArgumentSpec};
pub use config::Config;
pub use constraints::{ConstraintRule, ConstraintValidator};
pub use dispatch::{Dispatcher, ValidatedInvocation};
pub use error::{CliError, ConstraintViolation, StructuralError};
pub use legacy::{InvocationChannel, ProcflowPolicy};
pub use node::{CommandNode, CommandTree, LeafFn, NodeKind};
pub use parser::{ComposedParser, ParserTreeBuilder};
pub use resolved::{ArgValue, ResolvedArgs};
pub use resolver::{InvocationResolver, Resolution, ResolvedInvocation};
pub use scope::ArgScope;
