//! Hash functions mapping shingle texts to 32-bit shingle values.
use std::hash::Hasher;

use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;

/// Deterministic hash function from the bytes of a shingle to a 32-bit value.
///
/// Any closure `Fn(&[u8]) -> u32` is a [`ShingleHasher`], so a different checksum can be
/// plugged in without touching shingling or signatures.
///
/// # Examples
///
/// ```
/// use find_plagiarism::shingling::ShingleHasher;
///
/// let hasher = |bytes: &[u8]| bytes.len() as u32;
/// assert_eq!(hasher.hash32(b"a b c"), 5);
/// ```
pub trait ShingleHasher {
    /// Hashes the bytes of a shingle.
    fn hash32(&self, bytes: &[u8]) -> u32;
}

impl<F> ShingleHasher for F
where
    F: Fn(&[u8]) -> u32,
{
    fn hash32(&self, bytes: &[u8]) -> u32 {
        self(bytes)
    }
}

/// Keyed SipHash-1-3 truncated to the lower 32 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SipShingleHasher {
    k0: u64,
    k1: u64,
}

impl SipShingleHasher {
    /// Creates an instance whose keys are derived from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut seeder = rand_xoshiro::SplitMix64::seed_from_u64(seed);
        Self {
            k0: seeder.next_u64(),
            k1: seeder.next_u64(),
        }
    }
}

impl ShingleHasher for SipShingleHasher {
    #[inline(always)]
    fn hash32(&self, bytes: &[u8]) -> u32 {
        let mut s = SipHasher13::new_with_keys(self.k0, self.k1);
        s.write(bytes);
        (s.finish() & 0xFFFF_FFFF) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let h1 = SipShingleHasher::new(42);
        let h2 = SipShingleHasher::new(42);
        assert_eq!(h1.hash32(b"the cat sat"), h2.hash32(b"the cat sat"));
    }

    #[test]
    fn test_seeds() {
        let h1 = SipShingleHasher::new(1);
        let h2 = SipShingleHasher::new(2);
        assert_ne!(h1, h2);
        assert_ne!(h1.hash32(b"the cat sat"), h2.hash32(b"the cat sat"));
    }

    #[test]
    fn test_closure() {
        let hasher = |bytes: &[u8]| -> u32 { bytes.iter().map(|&b| b as u32).sum() };
        assert_eq!(hasher.hash32(&[1, 2, 3]), 6);
    }
}
