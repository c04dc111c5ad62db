//! Conversion of token sequences into sets of shingles.
use hashbrown::HashSet;

use crate::errors::{FindPlagiarismError, Result};
use crate::shingling::{ShingleHasher, SipShingleHasher};

/// Set of distinct 32-bit shingle values of a document.
pub type ShingleSet = HashSet<u32>;

/// Default number of tokens in a shingle.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Separator put between tokens when a shingle text is built.
const SEPARATOR: char = ' ';

/// Configuration of feature extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureConfig {
    window_size: usize,
    seed: u64,
}

impl FeatureConfig {
    /// Creates a configuration.
    ///
    /// # Arguments
    ///
    /// * `window_size` - Number of consecutive tokens in a shingle (must be more than 0).
    /// * `seed` - Seed value of the default shingle hasher.
    pub fn new(window_size: usize, seed: u64) -> Result<Self> {
        if window_size == 0 {
            return Err(FindPlagiarismError::input("Window size must not be 0."));
        }
        Ok(Self { window_size, seed })
    }

    /// Gets the window size.
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Gets the seed value.
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Extractor of shingle sets.
pub struct FeatureExtractor<H = SipShingleHasher> {
    window_size: usize,
    hasher: H,
    text: String,
}

impl FeatureExtractor<SipShingleHasher> {
    /// Creates an instance with the keyed SipHash of the configured seed.
    pub fn new(config: &FeatureConfig) -> Self {
        Self::with_hasher(config, SipShingleHasher::new(config.seed))
    }
}

impl<H> FeatureExtractor<H>
where
    H: ShingleHasher,
{
    /// Creates an instance with an arbitrary shingle hasher.
    pub fn with_hasher(config: &FeatureConfig, hasher: H) -> Self {
        Self {
            window_size: config.window_size,
            hasher,
            text: String::new(),
        }
    }

    /// Extracts the shingles of `tokens` into `shingles`, which is cleared first.
    ///
    /// Every window of `window_size` consecutive tokens is joined with a single space and
    /// hashed. A sequence shorter than the window yields no shingle.
    ///
    /// # Examples
    ///
    /// ```
    /// use find_plagiarism::feature::{FeatureConfig, FeatureExtractor};
    ///
    /// let config = FeatureConfig::new(3, 42).unwrap();
    /// let mut extractor = FeatureExtractor::new(&config);
    /// let mut shingles = Default::default();
    ///
    /// extractor.extract(&["a", "b", "c", "a", "b", "c"], &mut shingles);
    /// assert_eq!(shingles.len(), 3);
    ///
    /// extractor.extract(&["a", "b"], &mut shingles);
    /// assert!(shingles.is_empty());
    /// ```
    pub fn extract<S>(&mut self, tokens: &[S], shingles: &mut ShingleSet)
    where
        S: AsRef<str>,
    {
        shingles.clear();
        for window in tokens.windows(self.window_size) {
            self.text.clear();
            for (k, token) in window.iter().enumerate() {
                if k != 0 {
                    self.text.push(SEPARATOR);
                }
                self.text.push_str(token.as_ref());
            }
            shingles.insert(self.hasher.hash32(self.text.as_bytes()));
        }
    }
}
