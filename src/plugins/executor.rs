//! Default procflow executor
//!
//! Checks that the procflow exists in the catalog and prints the run request
//! (procflow plus every resolved argument) as JSON on stdout.

use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use std::sync::Arc;

use super::{PluginCatalog, ProcflowExecutor};
use crate::core::resolved::ResolvedArgs;

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    procflow: &'a str,
    arguments: &'a ResolvedArgs,
}

/// Reports the procflow request instead of running a workflow
pub struct ReportingExecutor {
    catalog: Arc<dyn PluginCatalog>,
}

impl ReportingExecutor {
    pub fn new(catalog: Arc<dyn PluginCatalog>) -> Self {
        Self { catalog }
    }

    /// JSON text of the run request, after checking the procflow is known
    pub fn report(&self, procflow: &str, args: &ResolvedArgs) -> Result<String> {
        let known = self
            .catalog
            .plugins()
            .iter()
            .any(|p| p.interface == "procflows" && p.name == procflow);
        if !known {
            return Err(miette!(
                code = "geoips::run::unknown_procflow",
                help = "run `geoips list plugins --interface procflows` to see the installed procflows",
                "Procflow '{}' is not installed",
                procflow
            ));
        }

        let request = RunRequest {
            procflow,
            arguments: args,
        };
        serde_json::to_string_pretty(&request).into_diagnostic()
    }
}

impl ProcflowExecutor for ReportingExecutor {
    fn execute(&self, procflow: &str, args: &ResolvedArgs) -> Result<i32> {
        let report = self.report(procflow, args)?;
        tracing::info!(%procflow, "procflow request accepted");
        println!("{report}");
        Ok(0)
    }
}
