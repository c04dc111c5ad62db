//! MinHash signatures estimating the Jaccard similarity of shingle sets.
use hashbrown::HashSet;

use crate::hash_family::{HashFamily, HashFunctionParams};

/// The signature value of a document without shingles. It never collides with a hash
/// value because every modulus is less than `u64::MAX`.
pub const EMPTY_SLOT: u64 = u64::MAX;

/// MinHash for the Jaccard similarity.
///
/// # Reference
///
/// * Section 3.3 of <http://infolab.stanford.edu/~ullman/mmds/ch3.pdf>
pub struct MinHasher {
    family: HashFamily,
}

impl MinHasher {
    /// Creates an instance with the given hash functions.
    pub const fn new(family: HashFamily) -> Self {
        Self { family }
    }

    /// Gets the number of hash functions, i.e., the signature length.
    pub fn num_hashes(&self) -> usize {
        self.family.len()
    }

    /// Gets the hash functions.
    pub const fn family(&self) -> &HashFamily {
        &self.family
    }

    /// Creates an iterator of the minimum hash values of `shingles`, one for each hash
    /// function in order.
    pub fn iter<'a>(&'a self, shingles: &'a HashSet<u32>) -> MinHashIter<'a> {
        MinHashIter {
            shingles,
            functions: self.family.functions().iter(),
        }
    }

    /// Computes the signature of `shingles`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashbrown::HashSet;
    /// use lsh::hash_family::{HashFamily, HashFunctionParams, NEXT_PRIME};
    /// use lsh::minhash::MinHasher;
    ///
    /// let family = HashFamily::from_params(vec![
    ///     HashFunctionParams { a: 1, b: 0, c: NEXT_PRIME },
    ///     HashFunctionParams { a: 2, b: 1, c: NEXT_PRIME },
    /// ])
    /// .unwrap();
    /// let hasher = MinHasher::new(family);
    ///
    /// let shingles = HashSet::from_iter([5, 3, 9]);
    /// assert_eq!(hasher.signature(&shingles).values(), &[3, 7]);
    /// ```
    pub fn signature(&self, shingles: &HashSet<u32>) -> Signature {
        let mut values = Vec::with_capacity(self.num_hashes());
        values.extend(self.iter(shingles));
        Signature { values }
    }
}

/// Iterator created by [`MinHasher::iter`].
pub struct MinHashIter<'a> {
    shingles: &'a HashSet<u32>,
    functions: std::slice::Iter<'a, HashFunctionParams>,
}

impl<'a> Iterator for MinHashIter<'a> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let f = self.functions.next()?;
        Some(
            self.shingles
                .iter()
                .map(|&x| f.apply(x))
                .min()
                .unwrap_or(EMPTY_SLOT),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.functions.size_hint()
    }
}

impl<'a> ExactSizeIterator for MinHashIter<'a> {}

/// MinHash signature of one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    values: Vec<u64>,
}

impl Signature {
    /// Creates a signature from raw values.
    pub const fn new(values: Vec<u64>) -> Self {
        Self { values }
    }

    /// Gets the minimum hash values.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Gets the signature length.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks if the signature has no component.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Checks if the signature was computed from an empty shingle set.
    pub fn has_no_shingles(&self) -> bool {
        self.values.first() == Some(&EMPTY_SLOT)
    }

    /// Counts the components in which two signatures agree.
    ///
    /// # Panics
    ///
    /// It will panic if the signatures have different lengths.
    pub fn num_matches(&self, other: &Self) -> usize {
        assert_eq!(
            self.len(),
            other.len(),
            "signatures must have the same length"
        );
        self.values
            .iter()
            .zip(other.values.iter())
            .filter(|(x, y)| x == y)
            .count()
    }

    /// Estimates the Jaccard similarity as the fraction of agreeing components.
    /// A document without shingles has the similarity 0 to any document.
    ///
    /// # Panics
    ///
    /// It will panic if the signatures have different lengths.
    pub fn similarity(&self, other: &Self) -> f64 {
        let matches = self.num_matches(other);
        if self.is_empty() || self.has_no_shingles() || other.has_no_shingles() {
            return 0.;
        }
        matches as f64 / self.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{RngCore, SeedableRng};

    fn random_shingles(n: usize, seed: u64) -> Vec<u32> {
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(seed);
        let mut seen = HashSet::new();
        let mut shingles = vec![];
        while shingles.len() < n {
            let x = rng.next_u32();
            if seen.insert(x) {
                shingles.push(x);
            }
        }
        shingles
    }

    fn mean_absolute_error(
        lhs: &HashSet<u32>,
        rhs: &HashSet<u32>,
        k: usize,
        trials: u64,
    ) -> f64 {
        let exact = crate::jaccard_similarity(lhs, rhs);
        let mut sum_error = 0.;
        for seed in 0..trials {
            let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(seed);
            let hasher = MinHasher::new(HashFamily::generate(k, &mut rng).unwrap());
            let estimated = hasher.signature(lhs).similarity(&hasher.signature(rhs));
            sum_error += (estimated - exact).abs();
        }
        sum_error / trials as f64
    }

    #[test]
    fn test_convergence() {
        // J = 200 / 400
        let shingles = random_shingles(400, 13);
        let lhs = HashSet::from_iter(shingles[..300].iter().cloned());
        let rhs = HashSet::from_iter(shingles[100..].iter().cloned());

        let mae_10 = mean_absolute_error(&lhs, &rhs, 10, 30);
        let mae_100 = mean_absolute_error(&lhs, &rhs, 100, 30);
        let mae_1000 = mean_absolute_error(&lhs, &rhs, 1000, 30);
        assert!(mae_10 > mae_100, "{mae_10} <= {mae_100}");
        assert!(mae_100 > mae_1000, "{mae_100} <= {mae_1000}");
        assert!(mae_1000 < 0.05);
    }

    #[test]
    fn test_identical_sets() {
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(1);
        let hasher = MinHasher::new(HashFamily::generate(50, &mut rng).unwrap());
        let shingles = HashSet::from_iter(random_shingles(20, 2));
        let x = hasher.signature(&shingles);
        let y = hasher.signature(&shingles.clone());
        assert_eq!(x.similarity(&y), 1.);
    }

    #[test]
    fn test_disjoint_sets() {
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(1);
        let hasher = MinHasher::new(HashFamily::generate(50, &mut rng).unwrap());
        let shingles = random_shingles(40, 2);
        let x = hasher.signature(&HashSet::from_iter(shingles[..20].iter().cloned()));
        let y = hasher.signature(&HashSet::from_iter(shingles[20..].iter().cloned()));
        // Linear functions with a != 0 are bijections modulo a prime.
        assert_eq!(x.similarity(&y), 0.);
        assert_eq!(x.similarity(&y), y.similarity(&x));
    }

    #[test]
    fn test_empty_set() {
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(1);
        let hasher = MinHasher::new(HashFamily::generate(8, &mut rng).unwrap());
        let empty = hasher.signature(&HashSet::new());
        assert_eq!(empty.values(), &[EMPTY_SLOT; 8]);
        assert!(empty.has_no_shingles());
        assert_eq!(empty.similarity(&empty.clone()), 0.);
    }

    #[test]
    fn test_iter_len() {
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(1);
        let hasher = MinHasher::new(HashFamily::generate(8, &mut rng).unwrap());
        let shingles = HashSet::from_iter([1, 2, 3]);
        assert_eq!(hasher.iter(&shingles).len(), 8);
    }

    #[test]
    #[should_panic]
    fn test_length_mismatch() {
        let x = Signature::new(vec![1, 2, 3]);
        let y = Signature::new(vec![1, 2]);
        x.similarity(&y);
    }
}
