use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// SplitMix64 finalizer over (master, stream); distinct streams get
/// decorrelated seeds even for adjacent indices.
pub fn derive_seed(master: u64, stream: u64) -> u64 {
    let mut x = master ^ stream.wrapping_add(1).wrapping_mul(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Deterministic per-sample RNG, independent of which thread runs the sample.
pub fn sample_rng(master: u64, index: usize) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_seed(master, index as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn streams_are_reproducible_and_distinct() {
        let a = sample_rng(7, 0).next_u64();
        assert_eq!(a, sample_rng(7, 0).next_u64());
        assert_ne!(a, sample_rng(7, 1).next_u64());
        assert_ne!(a, sample_rng(8, 0).next_u64());
    }
}
