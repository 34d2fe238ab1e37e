//! Error taxonomy for catalog operations.

use crate::domain::{ShowId, SyncStep};
use crate::store::StoreError;
use thiserror::Error;

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// Classification of a [`CatalogError`], looking through step wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    DuplicateName,
    Schema,
    SyncInconsistency,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Team member '{name}' already exists for show {show}")]
    DuplicateName { show: ShowId, name: String },

    #[error("Schema error in table '{table}': {detail}")]
    Schema { table: String, detail: String },

    #[error("Key creatives out of sync for show {show}: stored '{stored}', expected '{expected}'")]
    SyncInconsistency {
        show: ShowId,
        stored: String,
        expected: String,
    },

    #[error("{step} failed: {source}")]
    StepFailed {
        step: SyncStep,
        #[source]
        source: Box<CatalogError>,
    },
}

impl CatalogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn show_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            entity: "Show",
            key: key.to_string(),
        }
    }

    pub fn member_not_found(show: ShowId, name: &str) -> Self {
        Self::NotFound {
            entity: "Team member",
            key: format!("'{name}' in show {show}"),
        }
    }

    pub fn schema(table: &str, detail: impl Into<String>) -> Self {
        Self::Schema {
            table: table.to_string(),
            detail: detail.into(),
        }
    }

    /// Tags the error with the step it aborted. Already-tagged errors keep
    /// their innermost step.
    #[must_use]
    pub fn at_step(self, step: SyncStep) -> Self {
        match self {
            Self::StepFailed { .. } => self,
            other => Self::StepFailed {
                step,
                source: Box::new(other),
            },
        }
    }

    /// The error with any step wrapper removed.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::StepFailed { source, .. } => source.root(),
            other => other,
        }
    }

    #[must_use]
    pub fn step(&self) -> Option<SyncStep> {
        match self {
            Self::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::Schema { .. } => ErrorKind::Schema,
            Self::SyncInconsistency { .. } | Self::StepFailed { .. } => {
                ErrorKind::SyncInconsistency
            }
        }
    }

    /// Incidents need operator attention; everything else is an expected
    /// outcome the caller can act on.
    #[must_use]
    pub fn is_incident(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Schema | ErrorKind::SyncInconsistency
        )
    }

    /// Message safe to show an end user. Incidents get a generic text; the
    /// detail goes to the log via [`CatalogError::report`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Schema => "The show store is misconfigured; contact an operator".to_string(),
            ErrorKind::SyncInconsistency => {
                "Show data is out of sync; contact an operator".to_string()
            }
            _ => self.root().to_string(),
        }
    }

    /// Logs the error at the level its kind calls for.
    pub fn report(&self) {
        let step = self.step().map(|s| s.as_str());
        if self.is_incident() {
            tracing::error!(error = %self, step, "Catalog incident");
        } else {
            tracing::debug!(error = %self, step, "Catalog operation rejected");
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        Self::Schema {
            table: err.table().unwrap_or("<store>").to_string(),
            detail: err.to_string(),
        }
    }
}
