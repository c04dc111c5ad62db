//! Symmetric matrix of pairwise values without the diagonal.
use crate::errors::{Result, TriangleMatrixError};
use crate::index::TriangleIndex;

/// Symmetric `n x n` matrix storing only the `n*(n-1)/2` values above the diagonal.
///
/// # Examples
///
/// ```
/// use triangle_matrix::TriangleMatrix;
///
/// let mut matrix = TriangleMatrix::<f64>::new(3).unwrap();
/// matrix.set(2, 0, 0.5);
/// assert_eq!(*matrix.get(0, 2), 0.5);
/// assert_eq!(matrix.len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleMatrix<T> {
    index: TriangleIndex,
    values: Vec<T>,
}

impl<T> TriangleMatrix<T>
where
    T: Clone + Default,
{
    /// Creates a matrix of `num_items` items filled with `T::default()`.
    ///
    /// # Errors
    ///
    /// An error will be returned when the number of pairs overflows `usize`.
    pub fn new(num_items: usize) -> Result<Self> {
        let index = TriangleIndex::new(num_items)?;
        Ok(Self {
            index,
            values: vec![T::default(); index.num_pairs()],
        })
    }
}

impl<T> TriangleMatrix<T> {
    /// Creates a matrix from values laid out in the order of [`TriangleIndex::pairs`].
    ///
    /// # Errors
    ///
    /// An error will be returned when `values.len()` is not `num_items*(num_items-1)/2`.
    pub fn from_values(num_items: usize, values: Vec<T>) -> Result<Self> {
        let index = TriangleIndex::new(num_items)?;
        if values.len() != index.num_pairs() {
            return Err(TriangleMatrixError::LengthMismatch {
                expected: index.num_pairs(),
                actual: values.len(),
            });
        }
        Ok(Self { index, values })
    }

    /// Gets the value of the pair `(i, j)`.
    ///
    /// # Panics
    ///
    /// It will panic when `i == j` or either index is out of range.
    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.values[self.index.offset(i, j)]
    }

    /// Gets the mutable value of the pair `(i, j)`.
    ///
    /// # Panics
    ///
    /// It will panic when `i == j` or either index is out of range.
    #[inline(always)]
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut T {
        let k = self.index.offset(i, j);
        &mut self.values[k]
    }

    /// Sets the value of the pair `(i, j)`.
    ///
    /// # Panics
    ///
    /// It will panic when `i == j` or either index is out of range.
    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        *self.get_mut(i, j) = value;
    }

    /// Creates an iterator of `(i, j, value)` with `i < j` in the order of offsets.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.index
            .pairs()
            .zip(self.values.iter())
            .map(|((i, j), v)| (i, j, v))
    }

    /// Splits the values into disjoint rows, where the `i`-th element is
    /// `(i, [value(i, i+1), ..., value(i, n-1)])`.
    ///
    /// Rows can be filled independently, e.g., by different threads.
    pub fn rows_mut(&mut self) -> Vec<(usize, &mut [T])> {
        let mut rows = Vec::with_capacity(self.index.num_items());
        let mut rest = self.values.as_mut_slice();
        for i in 0..self.index.num_items() {
            let (row, tail) = std::mem::take(&mut rest).split_at_mut(self.index.row_range(i).len());
            rows.push((i, row));
            rest = tail;
        }
        rows
    }

    /// Gets the values in the order of offsets.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Gets the index mapping pairs to offsets.
    pub const fn index(&self) -> &TriangleIndex {
        &self.index
    }

    /// Gets the number of items.
    pub const fn num_items(&self) -> usize {
        self.index.num_items()
    }

    /// Gets the number of stored pairwise values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks if no value is stored, i.e., there are less than two items.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets the memory usage of the values in bytes.
    pub fn memory_in_bytes(&self) -> usize {
        self.values.len() * std::mem::size_of::<T>()
    }
}
