use crate::backend::{BackendKind, ENV_QUERY_BACKEND, ENV_SERVICE_URL};

/// Resolved environment configuration. Immutable once an [`ExecEnv`] owns it.
///
/// [`ExecEnv`]: crate::ExecEnv
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub backend: BackendKind,
    pub service_url: Option<String>,
}

impl EnvConfig {
    /// Read configuration from the process environment.
    ///
    /// `LOCUS_QUERY_BACKEND` selects the variant; an absent value defaults
    /// to spark, an unrecognized one also defaults to spark after a
    /// warning. `LOCUS_SERVICE_URL` is picked up when present.
    pub fn from_env() -> Self {
        let backend = match std::env::var(ENV_QUERY_BACKEND) {
            Ok(raw) => match raw.parse::<BackendKind>() {
                Ok(kind) => kind,
                Err(err) => {
                    tracing::warn!(target: "locus::env", "{err}; defaulting to spark");
                    BackendKind::Spark
                }
            },
            Err(_) => BackendKind::Spark,
        };
        EnvConfig {
            backend,
            service_url: std::env::var(ENV_SERVICE_URL).ok(),
        }
    }
}
