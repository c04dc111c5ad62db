//! MinHash with random linear hash functions over 32-bit shingles.
pub mod hash_family;
pub mod minhash;

use std::hash::Hash;

use hashbrown::HashSet;

/// Computes the Jaccard similarity, defined as 0 for two empty sets.
///
/// # Examples
///
/// ```
/// use hashbrown::HashSet;
///
/// let x = HashSet::from_iter([1, 2, 3, 4]);
/// let y = HashSet::from_iter([2, 3, 4, 5]);
/// assert_eq!(lsh::jaccard_similarity(&x, &y), 0.6);
/// ```
pub fn jaccard_similarity<T>(lhs: &HashSet<T>, rhs: &HashSet<T>) -> f64
where
    T: Hash + Eq,
{
    let (small, large) = if lhs.len() <= rhs.len() {
        (lhs, rhs)
    } else {
        (rhs, lhs)
    };
    let intersection = small.iter().filter(|x| large.contains(*x)).count();
    let union = lhs.len() + rhs.len() - intersection;
    if union == 0 {
        0.
    } else {
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jaccard_bounds() {
        let x = HashSet::from_iter([1u32, 2, 3]);
        let y = HashSet::from_iter([4u32, 5]);
        let e = HashSet::<u32>::new();
        assert_eq!(jaccard_similarity(&x, &y), 0.);
        assert_eq!(jaccard_similarity(&x, &x), 1.);
        assert_eq!(jaccard_similarity(&e, &e), 0.);
        assert_eq!(jaccard_similarity(&x, &e), 0.);
    }

    #[test]
    fn test_jaccard_symmetry() {
        let x = HashSet::from_iter([1u32, 2, 4]);
        let y = HashSet::from_iter([1u32, 2, 5, 7]);
        assert_eq!(jaccard_similarity(&x, &y), 0.4);
        assert_eq!(jaccard_similarity(&y, &x), 0.4);
    }
}
