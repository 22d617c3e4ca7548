/// Lightweight table handle. Real table semantics live in the query layers;
/// this carries just enough shape for subsystems that need a non-empty
/// placeholder, like the environment's memoized dummy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    n_rows: u64,
    n_partitions: u64,
    key: Vec<String>,
    cached: bool,
}

impl Table {
    pub fn range(n_rows: u64, n_partitions: u64) -> Self {
        Table {
            n_rows,
            n_partitions: n_partitions.max(1),
            key: Vec::new(),
            cached: false,
        }
    }

    pub fn key_by(mut self, key: &[&str]) -> Self {
        self.key = key.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn cache(mut self) -> Self {
        self.cached = true;
        self
    }

    pub fn n_rows(&self) -> u64 {
        self.n_rows
    }

    pub fn n_partitions(&self) -> u64 {
        self.n_partitions
    }

    pub fn key(&self) -> &[String] {
        &self.key
    }

    pub fn is_cached(&self) -> bool {
        self.cached
    }
}
