//! Execution environment for the locus query engine.
//!
//! [`ExecEnv`] is the one context object the rest of the system threads
//! through call sites: it owns the run's single [`Backend`] (constructed
//! lazily, exactly once), mints process-unique identifiers, hands out
//! reproducible seeds, and forwards log lines to the backend's sink.
//!
//! Backend selection is environment-driven: `LOCUS_QUERY_BACKEND` picks
//! `spark` (default) or `service`, and the service variant additionally
//! needs `LOCUS_SERVICE_URL`.

pub mod backend;
pub mod config;
pub mod error;
pub mod seed;
pub mod table;
pub mod uid;

mod env;

pub use backend::{
    Backend, BackendKind, BackendKindParseError, ClusterUtils, FsHandle, Logger, ServiceBackend,
    SparkBackend, ENV_QUERY_BACKEND, ENV_SERVICE_URL,
};
pub use config::EnvConfig;
pub use env::ExecEnv;
pub use error::EnvError;
pub use seed::SeedGenerator;
pub use table::Table;
pub use uid::UidGenerator;
