//! cli::commands::unsupported
//!
//! Operations the CLI exposes but cannot perform yet.
//!
//! They parse like any other command and then fail with
//! [`UnsupportedOperation`], so scripts see a non-zero exit instead of a
//! placeholder printed as if it were data.

use anyhow::Result;
use thiserror::Error;

use crate::cli::args::{ObsPipelineAction, ScorecardAction};

/// A recognised operation with no API support behind it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} is not yet implemented")]
pub struct UnsupportedOperation(pub String);

impl UnsupportedOperation {
    pub fn new(operation: impl Into<String>) -> Self {
        Self(operation.into())
    }
}

/// Fail with the unsupported-operation error for `operation`.
pub fn unsupported(operation: &str) -> Result<()> {
    Err(UnsupportedOperation::new(operation).into())
}

pub fn scorecards(action: ScorecardAction) -> Result<()> {
    match action {
        ScorecardAction::List => unsupported("scorecards list"),
        ScorecardAction::Get { .. } => unsupported("scorecards get"),
    }
}

pub fn obs_pipelines(action: ObsPipelineAction) -> Result<()> {
    match action {
        ObsPipelineAction::List => unsupported("obs-pipelines list"),
        ObsPipelineAction::Get { .. } => unsupported("obs-pipelines get"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_operation() {
        let err = unsupported("rum heatmaps query").unwrap_err();
        assert_eq!(err.to_string(), "rum heatmaps query is not yet implemented");
        assert!(err.downcast_ref::<UnsupportedOperation>().is_some());
    }

    #[test]
    fn stub_groups_fail() {
        assert!(scorecards(ScorecardAction::List).is_err());
        assert!(obs_pipelines(ObsPipelineAction::Get {
            pipeline_id: "p1".into()
        })
        .is_err());
    }
}
