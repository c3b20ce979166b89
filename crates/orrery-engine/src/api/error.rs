//! Error taxonomy for the viewer core.
//!
//! Catalog errors are fatal at startup. Load errors are per body and
//! recoverable. Mode conflicts are returned synchronously from
//! `request_mode` and leave the current mode unchanged.

use thiserror::Error;
use crate::api::types::{BodyId, ViewMode};

/// A body id outside the fixed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown body: {0}")]
pub struct UnknownBodyError(pub BodyId);

/// Malformed static body data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid descriptor for {id}: {reason}")]
pub struct InvalidDescriptorError {
    pub id: BodyId,
    pub reason: String,
}

impl InvalidDescriptorError {
    pub fn new(id: &BodyId, reason: impl Into<String>) -> Self {
        Self { id: id.clone(), reason: reason.into() }
    }
}

/// A body's visual asset could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load asset for {id}: {message}")]
pub struct LoadError {
    pub id: BodyId,
    pub message: String,
}

impl LoadError {
    pub fn new(id: &BodyId, message: impl Into<String>) -> Self {
        Self { id: id.clone(), message: message.into() }
    }
}

/// A mode request that is illegal under the current constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot enter {requested} while {active} is active: {reason}")]
pub struct ModeConflictError {
    pub requested: ViewMode,
    pub active: ViewMode,
    pub reason: &'static str,
}

/// Startup failure while building the body catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidDescriptor(#[from] InvalidDescriptorError),
    #[error("duplicate body id in catalog: {0}")]
    DuplicateId(BodyId),
    #[error("catalog has no primary body (reference distance 0)")]
    MissingPrimary,
}

/// Synchronous rejection of a `request_mode` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeRequestError {
    #[error(transparent)]
    UnknownBody(#[from] UnknownBodyError),
    #[error(transparent)]
    Conflict(#[from] ModeConflictError),
}

/// Internal control-flow signal: the transition that scheduled a mutation
/// has been superseded. Never escapes the director.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AnimationCancelled;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_both_modes() {
        let err = ModeConflictError {
            requested: ViewMode::FreeFlight,
            active: ViewMode::Orbit,
            reason: "free flight is disabled in orbit mode",
        };
        let msg = err.to_string();
        assert!(msg.contains("free-flight"), "{msg}");
        assert!(msg.contains("orbit"), "{msg}");
    }

    #[test]
    fn request_error_wraps_unknown_body() {
        let err: ModeRequestError = UnknownBodyError(BodyId::new("vulcan")).into();
        assert_eq!(err.to_string(), "unknown body: vulcan");
    }
}
