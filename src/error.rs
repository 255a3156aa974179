//! Error types for contact-tracing requests

use crate::config::ConfigError;
use crate::graph::GraphError;
use crate::loader::LoadError;
use std::fmt;
use thiserror::Error;

/// Coarse outcome category callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StoreUnavailable,
    NotFound,
    InvalidArgument,
    Unimplemented,
    MutationPartiallyApplied,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::StoreUnavailable => "StoreUnavailable",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::Unimplemented => "Unimplemented",
            ErrorKind::MutationPartiallyApplied => "MutationPartiallyApplied",
        };
        f.write_str(name)
    }
}

/// Errors returned by analytic requests
#[derive(Error, Debug)]
pub enum TraceError {
    /// No session could be acquired, or the store failed mid-request
    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(String),

    /// A single-row request matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Parameters rejected before touching the store
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation unknown, or not available in this build/configuration
    #[error("Operation '{0}' is not implemented")]
    Unimplemented(String),

    /// A risk batch was committed but not every candidate carries the flag
    #[error("Risk mutation partially applied: {flagged} of {expected} people flagged")]
    MutationPartiallyApplied { flagged: usize, expected: usize },

    /// Store-level failure
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),
}

impl TraceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TraceError::StoreUnavailable(_) | TraceError::Graph(_) => ErrorKind::StoreUnavailable,
            TraceError::NotFound(_) => ErrorKind::NotFound,
            TraceError::InvalidArgument(_) | TraceError::Config(_) | TraceError::Load(_) => {
                ErrorKind::InvalidArgument
            }
            TraceError::Unimplemented(_) => ErrorKind::Unimplemented,
            TraceError::MutationPartiallyApplied { .. } => ErrorKind::MutationPartiallyApplied,
        }
    }
}

pub type TraceResult<T> = Result<T, TraceError>;
