//! Random linear hash functions `h(x) = (a*x + b) mod c` over 32-bit shingle values.
use anyhow::{anyhow, Result};
use hashbrown::HashSet;
use rand::Rng;

/// The maximum value of a shingle, i.e., shingles are 32-bit integers.
pub const MAX_SHINGLE_VALUE: u64 = u32::MAX as u64;

/// The smallest prime greater than [`MAX_SHINGLE_VALUE`], used as the modulus `c`.
pub const NEXT_PRIME: u64 = 4_294_967_311;

/// The maximum number of duplicated draws tolerated for one coefficient list.
pub const MAX_DRAW_ATTEMPTS: usize = 1 << 20;

/// Parameters of a hash function `h(x) = (a*x + b) mod c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashFunctionParams {
    /// Multiplier.
    pub a: u64,
    /// Increment.
    pub b: u64,
    /// Prime modulus.
    pub c: u64,
}

impl HashFunctionParams {
    /// Evaluates the hash function.
    ///
    /// `a*x + b` cannot overflow because `(2^32-1)^2 + (2^32-1) < 2^64`.
    #[inline(always)]
    pub const fn apply(&self, x: u32) -> u64 {
        (self.a * x as u64 + self.b) % self.c
    }
}

/// A family of `k` random linear hash functions sharing the modulus [`NEXT_PRIME`].
///
/// Hashing the shingles of a document with a random linear function and keeping the
/// minimum emulates taking the first shingle under a random permutation of the
/// shingle universe, without materializing the permutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashFamily {
    functions: Vec<HashFunctionParams>,
}

impl HashFamily {
    /// Draws `k` hash functions.
    ///
    /// Coefficients are drawn uniformly from `[0, MAX_SHINGLE_VALUE]`. The `a`s are
    /// pairwise distinct, and so are the `b`s.
    ///
    /// # Errors
    ///
    /// An error will be returned if unique coefficients cannot be drawn within
    /// [`MAX_DRAW_ATTEMPTS`], which never happens with a sound random generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use lsh::hash_family::HashFamily;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    /// let family = HashFamily::generate(10, &mut rng).unwrap();
    /// assert_eq!(family.len(), 10);
    /// ```
    pub fn generate<R>(k: usize, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let coeff_a = pick_random_coeffs(k, MAX_SHINGLE_VALUE, MAX_DRAW_ATTEMPTS, rng)?;
        let coeff_b = pick_random_coeffs(k, MAX_SHINGLE_VALUE, MAX_DRAW_ATTEMPTS, rng)?;
        let functions = coeff_a
            .into_iter()
            .zip(coeff_b)
            .map(|(a, b)| HashFunctionParams { a, b, c: NEXT_PRIME })
            .collect();
        Ok(Self { functions })
    }

    /// Creates a family from given parameters.
    ///
    /// # Errors
    ///
    /// An error will be returned if a parameter has a modulus not greater than
    /// [`MAX_SHINGLE_VALUE`] or a coefficient greater than [`MAX_SHINGLE_VALUE`].
    pub fn from_params(functions: Vec<HashFunctionParams>) -> Result<Self> {
        for (i, f) in functions.iter().enumerate() {
            if f.c <= MAX_SHINGLE_VALUE {
                return Err(anyhow!(
                    "The modulus of hash function {i} must exceed {MAX_SHINGLE_VALUE}."
                ));
            }
            // Keeps a*x + b within u64.
            if f.a > MAX_SHINGLE_VALUE || f.b > MAX_SHINGLE_VALUE {
                return Err(anyhow!(
                    "The coefficients of hash function {i} must not exceed {MAX_SHINGLE_VALUE}."
                ));
            }
        }
        Ok(Self { functions })
    }

    /// Gets the number of hash functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Checks if the family has no hash function.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Gets the hash functions.
    pub fn functions(&self) -> &[HashFunctionParams] {
        &self.functions
    }
}

/// Draws `k` pairwise-distinct values uniformly from `[0, max_value]`, retrying
/// duplicated draws.
///
/// # Errors
///
/// An error will be returned if more than `max_attempts` draws are duplicates.
/// Accepted draws are not counted.
pub fn pick_random_coeffs<R>(
    k: usize,
    max_value: u64,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<u64>>
where
    R: Rng + ?Sized,
{
    let mut coeffs = Vec::with_capacity(k);
    let mut seen = HashSet::with_capacity(k);
    let mut rejected = 0;
    while coeffs.len() < k {
        let x = rng.gen_range(0..=max_value);
        if seen.insert(x) {
            coeffs.push(x);
            continue;
        }
        if rejected == max_attempts {
            return Err(anyhow!(
                "Could not draw {k} unique coefficients from [0, {max_value}] with {max_attempts} retries."
            ));
        }
        rejected += 1;
    }
    Ok(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;

    #[test]
    fn test_unique_coeffs() {
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(7);
        let coeffs = pick_random_coeffs(1000, MAX_SHINGLE_VALUE, MAX_DRAW_ATTEMPTS, &mut rng)
            .unwrap();
        assert_eq!(coeffs.len(), 1000);
        let unique: HashSet<_> = coeffs.iter().collect();
        assert_eq!(unique.len(), 1000);
        assert!(coeffs.iter().all(|&c| c <= MAX_SHINGLE_VALUE));
    }

    #[test]
    fn test_unique_coeffs_in_small_domain() {
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(7);
        let mut coeffs = pick_random_coeffs(8, 7, MAX_DRAW_ATTEMPTS, &mut rng).unwrap();
        coeffs.sort_unstable();
        assert_eq!(coeffs, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_too_many_attempts() {
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(7);
        let result = pick_random_coeffs(5, 3, 1000, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn test_accepted_draws_are_not_attempts() {
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(7);
        let coeffs = pick_random_coeffs(100, MAX_SHINGLE_VALUE, 0, &mut rng).unwrap();
        assert_eq!(coeffs.len(), 100);

        // Needs at least one retry to cover the whole domain.
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(7);
        assert!(pick_random_coeffs(64, 63, 0, &mut rng).is_err());
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(7);
        assert_eq!(
            pick_random_coeffs(64, 63, MAX_DRAW_ATTEMPTS, &mut rng)
                .unwrap()
                .len(),
            64
        );
    }

    #[test]
    fn test_generate() {
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(42);
        let family = HashFamily::generate(100, &mut rng).unwrap();
        assert_eq!(family.len(), 100);
        let a: HashSet<_> = family.functions().iter().map(|f| f.a).collect();
        let b: HashSet<_> = family.functions().iter().map(|f| f.b).collect();
        assert_eq!(a.len(), 100);
        assert_eq!(b.len(), 100);
        assert!(family.functions().iter().all(|f| f.c == NEXT_PRIME));
    }

    #[test]
    fn test_generate_is_reproducible() {
        let mut rng1 = rand_xoshiro::SplitMix64::seed_from_u64(3);
        let mut rng2 = rand_xoshiro::SplitMix64::seed_from_u64(3);
        assert_eq!(
            HashFamily::generate(10, &mut rng1).unwrap(),
            HashFamily::generate(10, &mut rng2).unwrap()
        );
    }

    #[test]
    fn test_apply() {
        let f = HashFunctionParams {
            a: MAX_SHINGLE_VALUE,
            b: MAX_SHINGLE_VALUE,
            c: NEXT_PRIME,
        };
        let expected = (MAX_SHINGLE_VALUE as u128 * MAX_SHINGLE_VALUE as u128
            + MAX_SHINGLE_VALUE as u128)
            % NEXT_PRIME as u128;
        assert_eq!(f.apply(u32::MAX) as u128, expected);

        let g = HashFunctionParams { a: 3, b: 5, c: 11 };
        assert_eq!(g.apply(4), 6);
    }

    #[test]
    fn test_from_params() {
        let ok = HashFamily::from_params(vec![HashFunctionParams {
            a: 1,
            b: 2,
            c: NEXT_PRIME,
        }]);
        assert!(ok.is_ok());
        let small_modulus = HashFamily::from_params(vec![HashFunctionParams { a: 1, b: 2, c: 11 }]);
        assert!(small_modulus.is_err());
    }
}
