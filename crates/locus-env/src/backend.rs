//! The execution backend: a closed set of variants, each declaring what it
//! supports. Capability gating is a match over the variant tag, so a new
//! variant cannot be added without deciding every gated operation.

use std::fmt;
use std::str::FromStr;

use crate::config::EnvConfig;
use crate::error::EnvError;

pub const ENV_QUERY_BACKEND: &str = "LOCUS_QUERY_BACKEND";
pub const ENV_SERVICE_URL: &str = "LOCUS_SERVICE_URL";

const LOG_TARGET: &str = "locus::backend";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    #[default]
    Spark,
    Service,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Spark => "spark",
            BackendKind::Service => "service",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct BackendKindParseError {
    value: String,
}

impl fmt::Display for BackendKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid query backend {:?} (expected one of: spark, service)",
            self.value
        )
    }
}

impl std::error::Error for BackendKindParseError {}

impl FromStr for BackendKind {
    type Err = BackendKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "spark" => Ok(BackendKind::Spark),
            "service" => Ok(BackendKind::Service),
            _ => Err(BackendKindParseError { value: s }),
        }
    }
}

/// Delegating handle onto the backend's filesystem. All real I/O lives
/// behind the backend; this only names locations under its scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsHandle {
    scheme: String,
}

impl FsHandle {
    fn local() -> Self {
        FsHandle {
            scheme: "file".to_string(),
        }
    }

    fn for_url(url: &str) -> Self {
        let scheme = url.split("://").next().unwrap_or("https");
        FsHandle {
            scheme: scheme.to_string(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Render `path` as a URL under this filesystem's scheme. Paths that
    /// already carry a scheme are returned untouched.
    pub fn resolve(&self, path: &str) -> String {
        if path.contains("://") {
            return path.to_string();
        }
        format!("{}://{}", self.scheme, path.trim_start_matches('/'))
    }
}

/// Bridge to the cluster-side utility object. Only the spark variant can
/// produce one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterUtils {
    namespace: &'static str,
}

impl ClusterUtils {
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }
}

/// The backend's textual log sink. Three severities, one-way, no fields
/// beyond the originating backend variant.
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    kind: BackendKind,
}

impl Logger {
    pub fn error(&self, msg: &str) {
        tracing::error!(target: LOG_TARGET, backend = %self.kind, "{msg}");
    }

    pub fn warn(&self, msg: &str) {
        tracing::warn!(target: LOG_TARGET, backend = %self.kind, "{msg}");
    }

    pub fn info(&self, msg: &str) {
        tracing::info!(target: LOG_TARGET, backend = %self.kind, "{msg}");
    }
}

/// Distributed-cluster variant.
#[derive(Debug)]
pub struct SparkBackend {
    fs: FsHandle,
    utils: ClusterUtils,
}

impl SparkBackend {
    fn connect() -> Self {
        SparkBackend {
            fs: FsHandle::local(),
            utils: ClusterUtils {
                namespace: "locus.cluster.utils",
            },
        }
    }

    pub fn fs(&self) -> &FsHandle {
        &self.fs
    }

    pub fn utils(&self) -> &ClusterUtils {
        &self.utils
    }
}

/// Thin-client variant talking to a remote query service.
#[derive(Debug)]
pub struct ServiceBackend {
    url: String,
    fs: FsHandle,
}

impl ServiceBackend {
    fn connect(url: &str) -> Self {
        ServiceBackend {
            url: url.to_string(),
            fs: FsHandle::for_url(url),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn fs(&self) -> &FsHandle {
        &self.fs
    }
}

#[derive(Debug)]
pub enum Backend {
    Spark(SparkBackend),
    Service(ServiceBackend),
}

impl Backend {
    /// Construct the backend named by `config`. Misconfiguration surfaces
    /// here and propagates unchanged to the caller.
    pub fn connect(config: &EnvConfig) -> Result<Backend, EnvError> {
        match config.backend {
            BackendKind::Spark => Ok(Backend::Spark(SparkBackend::connect())),
            BackendKind::Service => {
                let url = config
                    .service_url
                    .as_deref()
                    .ok_or(EnvError::MissingServiceUrl)?;
                Ok(Backend::Service(ServiceBackend::connect(url)))
            }
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Spark(_) => BackendKind::Spark,
            Backend::Service(_) => BackendKind::Service,
        }
    }

    pub fn fs(&self) -> &FsHandle {
        match self {
            Backend::Spark(b) => b.fs(),
            Backend::Service(b) => b.fs(),
        }
    }

    pub fn logger(&self) -> Logger {
        Logger { kind: self.kind() }
    }

    /// Capability gate: operations that need the cluster-side JVM bridge
    /// only exist on the spark variant. `op` names the caller for the error
    /// message.
    pub fn spark(&self, op: &str) -> Result<&SparkBackend, EnvError> {
        match self {
            Backend::Spark(b) => Ok(b),
            Backend::Service(_) => Err(EnvError::UnsupportedOperation {
                op: op.to_string(),
                kind: self.kind(),
            }),
        }
    }

    /// Release the backend's resources. Both variants currently hold only
    /// in-process state, so this is the structured drop point.
    pub fn shutdown(self) {
        tracing::info!(target: LOG_TARGET, backend = %self.kind(), "backend shut down");
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_known_values() {
        assert_eq!("spark".parse::<BackendKind>().unwrap(), BackendKind::Spark);
        assert_eq!(
            " Service ".parse::<BackendKind>().unwrap(),
            BackendKind::Service
        );
        assert!("yarn".parse::<BackendKind>().is_err());
        assert!("".parse::<BackendKind>().is_err());
    }

    #[test]
    fn fs_handle_resolves_under_scheme() {
        let fs = FsHandle::local();
        assert_eq!(fs.scheme(), "file");
        assert_eq!(fs.resolve("/tmp/out.tsv"), "file://tmp/out.tsv");
        assert_eq!(fs.resolve("gs://bucket/x"), "gs://bucket/x");

        let fs = FsHandle::for_url("https://query.example.org");
        assert_eq!(fs.scheme(), "https");
    }

    #[test]
    fn spark_gate_rejects_service() {
        let config = EnvConfig {
            backend: BackendKind::Service,
            service_url: Some("https://query.example.org".to_string()),
        };
        let backend = Backend::connect(&config).unwrap();
        let err = backend.spark("jvm_utils").unwrap_err();
        match err {
            EnvError::UnsupportedOperation { op, kind } => {
                assert_eq!(op, "jvm_utils");
                assert_eq!(kind, BackendKind::Service);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn service_without_url_fails_to_connect() {
        let config = EnvConfig {
            backend: BackendKind::Service,
            service_url: None,
        };
        assert!(matches!(
            Backend::connect(&config),
            Err(EnvError::MissingServiceUrl)
        ));
    }
}
