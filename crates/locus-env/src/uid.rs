use std::sync::atomic::{AtomicU64, Ordering};

/// Mints process-unique identifier strings from a monotonic counter. The
/// counter only ever grows; no two calls return the same string for the
/// life of the generator.
#[derive(Debug)]
pub struct UidGenerator {
    counter: AtomicU64,
}

impl UidGenerator {
    pub const fn new() -> Self {
        UidGenerator {
            counter: AtomicU64::new(0),
        }
    }

    /// Next identifier: `__uid_{base}{n}`, counter incremented first, so
    /// the first call yields `__uid_1` (or `__uid_base1` with a base).
    pub fn next(&self, base: Option<&str>) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("__uid_{}{}", base.unwrap_or(""), n)
    }
}

impl Default for UidGenerator {
    fn default() -> Self {
        UidGenerator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uids_are_distinct_and_ordered() {
        let gen = UidGenerator::new();
        assert_eq!(gen.next(None), "__uid_1");
        assert_eq!(gen.next(Some("x")), "__uid_x2");
        assert_eq!(gen.next(Some("x")), "__uid_x3");
        assert_eq!(gen.next(None), "__uid_4");
    }

    #[test]
    fn uids_are_distinct_across_threads() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let gen = Arc::new(UidGenerator::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let gen = Arc::clone(&gen);
            handles.push(std::thread::spawn(move || {
                (0..200).map(|_| gen.next(Some("t"))).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for h in handles {
            for uid in h.join().expect("uid thread") {
                assert!(seen.insert(uid.clone()), "duplicate uid {uid}");
            }
        }
        assert_eq!(seen.len(), 8 * 200);
    }
}
