//! CLI module - the GeoIPS command tree and process entry points

pub mod commands;
pub mod helpers;
pub mod registry;
pub mod table;

use std::sync::Arc;

use miette::Result;

use crate::core::error::EXIT_FAILURE;
use crate::core::{logging, App, Config, InvocationChannel};
use crate::plugins::{BuiltinCatalog, PluginCatalog, ProcflowExecutor, ReportingExecutor};
use table::TableStyle;

/// Collaborators and settings shared by every command
#[derive(Clone)]
pub struct CliContext {
    pub catalog: Arc<dyn PluginCatalog>,
    pub executor: Arc<dyn ProcflowExecutor>,
    /// Default of `list --table-style`
    pub table_style: TableStyle,
    /// Effective configuration, reported by `config show`
    pub config: Config,
}

impl CliContext {
    /// Built-in catalog and reporting executor, configured from `config`
    pub fn from_config(config: &Config) -> Self {
        let catalog: Arc<dyn PluginCatalog> =
            Arc::new(BuiltinCatalog::new(&config.install_root()));
        Self {
            executor: Arc::new(ReportingExecutor::new(catalog.clone())),
            catalog,
            table_style: TableStyle::from_config(config.table_style()),
            config: config.clone(),
        }
    }
}

/// Process setup shared by all binaries
pub fn install_process_hooks() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;
    Ok(())
}

/// Load config, start logging, build the tree and run one invocation
///
/// `tokens` excludes the program name. Returns the process exit code.
pub fn run<I, T>(channel: InvocationChannel, tokens: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let config = Config::load();
    let _guard = logging::init(config.log_level());
    let ctx = CliContext::from_config(&config);

    let tree = match registry::geoips_tree(&ctx) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return EXIT_FAILURE;
        }
    };

    App::new(tree).run(&channel, tokens)
}
