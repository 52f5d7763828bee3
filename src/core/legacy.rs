//! Legacy vs. modern invocation of procflow leaves
//!
//! Older releases launched workflows through dedicated top-level programs
//! (`run_procflow`, `data_fusion_procflow`) that took the procflow name as
//! `--procflow`. The modern form names the procflow as a sub-command
//! (`geoips run single_source`). Both forms reach the same leaf, so a missing
//! `--procflow` means different things depending on how the leaf was reached.

use crate::core::error::CliError;
use crate::core::resolved::{ArgValue, ResolvedArgs};

/// How the current invocation entered the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationChannel {
    /// `geoips <command> ...`
    Modern,
    /// A deprecated top-level entry point such as `run_procflow`
    Legacy { entry_point: String },
}

impl InvocationChannel {
    pub fn legacy(entry_point: impl Into<String>) -> Self {
        InvocationChannel::Legacy {
            entry_point: entry_point.into(),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, InvocationChannel::Legacy { .. })
    }
}

/// How one legacy-capable leaf fills in its procflow field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcflowPolicy {
    field: String,
    default: String,
    legacy_entry: String,
    modern_form: String,
}

impl ProcflowPolicy {
    /// `field` is the argument name, `default` the value used for the modern
    /// form (normally the leaf's own name), `legacy_entry` the deprecated
    /// program named in errors and `modern_form` the replacement to suggest.
    pub fn new(
        field: impl Into<String>,
        default: impl Into<String>,
        legacy_entry: impl Into<String>,
        modern_form: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            default: default.into(),
            legacy_entry: legacy_entry.into(),
            modern_form: modern_form.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn legacy_entry(&self) -> &str {
        &self.legacy_entry
    }

    pub fn modern_form(&self) -> &str {
        &self.modern_form
    }

    /// Settle the procflow field for this invocation
    ///
    /// A supplied value is kept as is. Without one, the legacy channel is an
    /// error and the modern channel falls back to the sub-command's name.
    pub fn resolve(
        &self,
        args: ResolvedArgs,
        channel: &InvocationChannel,
        usage: &str,
    ) -> Result<ResolvedArgs, CliError> {
        if args.is_set(&self.field) {
            return Ok(args);
        }

        match channel {
            InvocationChannel::Legacy { entry_point } => {
                tracing::debug!(%entry_point, field = %self.field, "legacy call without procflow");
                Err(CliError::LegacyAmbiguity {
                    entry_point: self.legacy_entry.clone(),
                    field: self.field.clone(),
                    modern_form: self.modern_form.clone(),
                    usage: usage.to_string(),
                })
            }
            InvocationChannel::Modern => {
                tracing::debug!(
                    field = %self.field,
                    value = %self.default,
                    "procflow taken from sub-command"
                );
                Ok(args.with_derived(&self.field, ArgValue::Single(self.default.clone())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn policy() -> ProcflowPolicy {
        ProcflowPolicy::new(
            "procflow",
            "single_source",
            "run_procflow",
            "geoips run <procflow_name>",
        )
    }

    fn args_with(procflow: Option<&str>) -> ResolvedArgs {
        let mut values = BTreeMap::new();
        let mut supplied = BTreeSet::new();
        match procflow {
            Some(name) => {
                values.insert("procflow".to_string(), ArgValue::Single(name.to_string()));
                supplied.insert("procflow".to_string());
            }
            None => {
                values.insert("procflow".to_string(), ArgValue::Unset);
            }
        }
        ResolvedArgs::from_parts(values, supplied)
    }

    #[test]
    fn test_explicit_value_used_verbatim_on_both_channels() {
        for channel in [
            InvocationChannel::Modern,
            InvocationChannel::legacy("run_procflow"),
        ] {
            let resolved = policy()
                .resolve(args_with(Some("config_based")), &channel, "")
                .unwrap();
            assert_eq!(resolved.value("procflow"), Some("config_based"));
        }
    }

    #[test]
    fn test_legacy_channel_without_value_fails() {
        let err = policy()
            .resolve(args_with(None), &InvocationChannel::legacy("run_procflow"), "usage")
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("run_procflow"));
        assert!(text.contains("geoips run <procflow_name>"));
        assert!(matches!(err, CliError::LegacyAmbiguity { .. }));
    }

    #[test]
    fn test_modern_channel_defaults_to_subcommand() {
        let resolved = policy()
            .resolve(args_with(None), &InvocationChannel::Modern, "")
            .unwrap();
        assert_eq!(resolved.value("procflow"), Some("single_source"));
        assert!(!resolved.is_supplied("procflow"));
    }
}
