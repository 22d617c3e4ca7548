//! Reproducible seed stream for downstream randomized choices.

const FNV_OFFSET_BASIS: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

// Knuth MMIX constants.
const LCG_MUL: u64 = 6364136223846793005;
const LCG_ADD: u64 = 1442695040888963407;

/// Deterministic seed source: the same master seed and call count produce
/// the same value, across processes and platforms. Without a master seed
/// the stream starts from OS entropy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedGenerator {
    state: u64,
}

impl SeedGenerator {
    pub fn from_master(master: Option<u64>) -> Self {
        let state = match master {
            Some(m) => scramble_master(m),
            None => entropy_u64(),
        };
        SeedGenerator { state }
    }

    pub fn next_seed(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(LCG_MUL).wrapping_add(LCG_ADD);
        self.state
    }
}

// FNV-1a over a domain-tagged rendering of the master seed.
fn scramble_master(master: u64) -> u64 {
    let mut h = FNV_OFFSET_BASIS;
    for &b in b"locus:seed:" {
        h ^= b as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    for b in master.to_le_bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

fn entropy_u64() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        // Entropy failure leaves the clock as the only source.
        Err(_) => {
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default();
            now.as_nanos() as u64 | 1
        }
    }
}
