use std::sync::Mutex;

use once_cell::sync::OnceCell;

use crate::backend::{Backend, ClusterUtils, FsHandle, Logger, SparkBackend};
use crate::config::EnvConfig;
use crate::error::EnvError;
use crate::seed::SeedGenerator;
use crate::table::Table;
use crate::uid::UidGenerator;

/// The run's execution environment. Construct one at application start and
/// pass it by reference; every accessor takes `&self`, so an `ExecEnv` can
/// be shared across threads as-is (or behind an `Arc`).
///
/// The backend cell is initialized at most once. Racing first accessors
/// block on the cell and all observe the same instance; a failed
/// construction leaves the cell empty so a later call can retry after the
/// configuration problem is fixed.
pub struct ExecEnv {
    config: EnvConfig,
    backend: OnceCell<Backend>,
    logger: OnceCell<Logger>,
    seeds: Mutex<Option<SeedGenerator>>,
    dummy_table: OnceCell<Table>,
    uids: UidGenerator,
}

impl ExecEnv {
    pub fn new(config: EnvConfig) -> Self {
        ExecEnv {
            config,
            backend: OnceCell::new(),
            logger: OnceCell::new(),
            seeds: Mutex::new(None),
            dummy_table: OnceCell::new(),
            uids: UidGenerator::new(),
        }
    }

    /// Configuration-driven constructor; the backend itself is not touched
    /// until first use.
    pub fn from_env() -> Self {
        ExecEnv::new(EnvConfig::from_env())
    }

    /// Explicit-initialization path: adopt an already-constructed backend.
    /// No lazy construction and no stderr diagnostic will ever happen on
    /// this environment.
    pub fn with_backend(backend: Backend) -> Self {
        let env = ExecEnv::new(EnvConfig {
            backend: backend.kind(),
            service_url: None,
        });
        let _ = env.backend.set(backend);
        env
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// The run's backend, constructed from configuration on first call and
    /// memoized for every later one. The lazy path announces itself once on
    /// standard error so unintentional default initialization is visible.
    pub fn backend(&self) -> Result<&Backend, EnvError> {
        self.backend.get_or_try_init(|| {
            eprintln!(
                "Initializing locus {} backend with default parameters...",
                self.config.backend
            );
            Backend::connect(&self.config)
        })
    }

    /// The backend, provided it is the spark variant; `op` names the
    /// requesting operation for the error.
    pub fn spark_backend(&self, op: &str) -> Result<&SparkBackend, EnvError> {
        self.backend()?.spark(op)
    }

    /// The cluster-side JVM bridge. Spark-only.
    pub fn jvm_utils(&self, op: &str) -> Result<&ClusterUtils, EnvError> {
        Ok(self.spark_backend(op)?.utils())
    }

    /// The backend's filesystem handle; constructs the backend if needed.
    pub fn fs(&self) -> Result<&FsHandle, EnvError> {
        Ok(self.backend()?.fs())
    }

    /// One-row, one-partition placeholder table, built exactly once.
    pub fn dummy_table(&self) -> &Table {
        self.dummy_table
            .get_or_init(|| Table::range(1, 1).key_by(&[]).cache())
    }

    /// Install a fresh seed generator, replacing any existing one. `None`
    /// seeds from OS entropy.
    pub fn set_seed(&self, master: Option<u64>) {
        let mut slot = self.lock_seeds();
        *slot = Some(SeedGenerator::from_master(master));
    }

    /// Next value from the installed seed generator. If none was installed,
    /// an entropy-seeded one is created first, so the stream is only
    /// reproducible when the caller seeded explicitly.
    pub fn next_seed(&self) -> u64 {
        let mut slot = self.lock_seeds();
        slot.get_or_insert_with(|| SeedGenerator::from_master(None))
            .next_seed()
    }

    /// Fresh process-unique identifier.
    pub fn uid(&self, base: Option<&str>) -> String {
        self.uids.next(base)
    }

    pub fn log_error(&self, msg: &str) -> Result<(), EnvError> {
        self.logger()?.error(msg);
        Ok(())
    }

    pub fn log_warn(&self, msg: &str) -> Result<(), EnvError> {
        self.logger()?.warn(msg);
        Ok(())
    }

    pub fn log_info(&self, msg: &str) -> Result<(), EnvError> {
        self.logger()?.info(msg);
        Ok(())
    }

    /// Tear the environment down, releasing the backend if it was ever
    /// constructed. Dropping an `ExecEnv` without calling this is allowed;
    /// the backend then goes away at process exit.
    pub fn shutdown(self) {
        if let Some(backend) = self.backend.into_inner() {
            backend.shutdown();
        }
    }

    fn logger(&self) -> Result<&Logger, EnvError> {
        self.logger.get_or_try_init(|| Ok(self.backend()?.logger()))
    }

    fn lock_seeds(&self) -> std::sync::MutexGuard<'_, Option<SeedGenerator>> {
        self.seeds
            .lock()
            .unwrap_or_else(|_| panic!("seed generator lock poisoned"))
    }
}
