//! Bijection between unordered pairs of item indices and linear offsets.
use std::ops::Range;

use crate::errors::{Result, TriangleMatrixError};

/// Computes the number of unordered pairs of distinct items, i.e., `n*(n-1)/2`.
///
/// # Examples
///
/// ```
/// use triangle_matrix::index::num_pairs;
///
/// assert_eq!(num_pairs(0), 0);
/// assert_eq!(num_pairs(1), 0);
/// assert_eq!(num_pairs(4), 6);
/// ```
pub const fn num_pairs(num_items: usize) -> usize {
    if num_items < 2 {
        0
    } else if num_items % 2 == 0 {
        num_items / 2 * (num_items - 1)
    } else {
        (num_items - 1) / 2 * num_items
    }
}

/// Maps an unordered pair `(i, j)` with `i != j` of `num_items` items to an offset
/// in `[0, num_items*(num_items-1)/2)`.
///
/// Pairs are laid out row by row, i.e., the offsets of `(i, i+1), (i, i+2), ..., (i, n-1)`
/// are consecutive, and row `i` directly follows row `i-1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriangleIndex {
    num_items: usize,
}

impl TriangleIndex {
    /// Creates an index for `num_items` items.
    ///
    /// # Errors
    ///
    /// An error will be returned when the number of pairs overflows `usize`.
    pub fn new(num_items: usize) -> Result<Self> {
        if num_items >= 2 && num_items.checked_mul(num_items - 1).is_none() {
            return Err(TriangleMatrixError::Overflow { num_items });
        }
        Ok(Self { num_items })
    }

    /// Gets the number of items.
    pub const fn num_items(&self) -> usize {
        self.num_items
    }

    /// Gets the number of pairs, i.e., the length of the linear buffer.
    pub const fn num_pairs(&self) -> usize {
        num_pairs(self.num_items)
    }

    /// Gets the offset of the pair `(i, j)`. The pair is unordered, so `(j, i)` gives the
    /// same offset.
    ///
    /// The offset is `floor(i*(n-(i+1)/2)) + (j-i) - 1` for `i < j`, evaluated without
    /// rounding as `i*(2n-i-1)/2 + (j-i-1)`. The product `i*(2n-i-1)` is always even.
    ///
    /// # Panics
    ///
    /// It will panic when `i == j` or either index is out of range. Both indicate a bug
    /// in the caller rather than a data condition.
    ///
    /// # Examples
    ///
    /// ```
    /// use triangle_matrix::index::TriangleIndex;
    ///
    /// let index = TriangleIndex::new(4).unwrap();
    /// assert_eq!(index.offset(0, 1), 0);
    /// assert_eq!(index.offset(0, 3), 2);
    /// assert_eq!(index.offset(1, 2), 3);
    /// assert_eq!(index.offset(3, 2), 5);
    /// ```
    #[inline(always)]
    pub fn offset(&self, i: usize, j: usize) -> usize {
        assert_ne!(i, j, "a triangle matrix cannot be accessed with i == j");
        let (i, j) = if j < i { (j, i) } else { (i, j) };
        assert!(
            j < self.num_items,
            "index {j} is out of range for {} items",
            self.num_items
        );
        self.row_start(i) + (j - i - 1)
    }

    /// Gets the pair `(i, j)` with `i < j` located at `offset`. This is the inverse of
    /// [`TriangleIndex::offset`].
    ///
    /// # Panics
    ///
    /// It will panic when `offset` is out of range.
    pub fn pair(&self, offset: usize) -> (usize, usize) {
        assert!(
            offset < self.num_pairs(),
            "offset {offset} is out of range for {} pairs",
            self.num_pairs()
        );
        // Binary search for the last row starting at or before the offset.
        let (mut lo, mut hi) = (0, self.num_items - 1);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.row_start(mid) <= offset {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let i = lo;
        (i, i + 1 + offset - self.row_start(i))
    }

    /// Gets the range of offsets storing the pairs `(i, i+1), ..., (i, n-1)`.
    ///
    /// # Panics
    ///
    /// It will panic when `i` is out of range.
    pub fn row_range(&self, i: usize) -> Range<usize> {
        assert!(
            i < self.num_items,
            "index {i} is out of range for {} items",
            self.num_items
        );
        let start = self.row_start(i);
        start..start + (self.num_items - i - 1)
    }

    /// Creates an iterator of all pairs `(i, j)` with `i < j` in the order of offsets.
    pub const fn pairs(&self) -> PairIter {
        PairIter {
            num_items: self.num_items,
            i: 0,
            j: 1,
        }
    }

    #[inline(always)]
    fn row_start(&self, i: usize) -> usize {
        i * (2 * self.num_items - i - 1) / 2
    }
}

/// Iterator of pairs `(i, j)` with `i < j`, created by [`TriangleIndex::pairs`].
pub struct PairIter {
    num_items: usize,
    i: usize,
    j: usize,
}

impl Iterator for PairIter {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.j >= self.num_items {
            return None;
        }
        let pair = (self.i, self.j);
        self.j += 1;
        if self.j == self.num_items {
            self.i += 1;
            self.j = self.i + 1;
        }
        Some(pair)
    }
}
