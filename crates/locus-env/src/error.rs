use std::fmt;

use crate::backend::{BackendKind, ENV_SERVICE_URL};

/// Errors surfaced by the execution environment. Nothing here is retried or
/// swallowed; every failure goes straight back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// A capability-gated operation was invoked against a backend variant
    /// that does not support it.
    UnsupportedOperation { op: String, kind: BackendKind },
    /// The service backend was selected without a service URL.
    MissingServiceUrl,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvError::UnsupportedOperation { op, kind } => {
                write!(f, "{kind} backend doesn't support {op}, only spark")
            }
            EnvError::MissingServiceUrl => {
                write!(f, "service backend requires {ENV_SERVICE_URL} to be set")
            }
        }
    }
}

impl std::error::Error for EnvError {}
