//! Compressed sparse row matrices for channel adjacency.
//!
//! A matrix is kept in canonical form at all times: column indices are
//! strictly increasing within each row and no stored entry equals the zero
//! value (`T::default()`). Structural equality is therefore value equality.

use std::fmt;
use std::ops::Add;

use crate::id_index::validate_positions;
use crate::{GraphError, Result};

/// Value types a [`SparseMatrix`] can store. `Default` is the implicit zero.
pub trait Entry: Copy + PartialEq + Default + fmt::Debug {}

impl<T: Copy + PartialEq + Default + fmt::Debug> Entry for T {}

/// Entries that can be summed. Accumulation saturates, so a sum of non-zero
/// weights is never zero.
pub trait Weight: Entry {
    /// `self + rhs`, clamped at the type's maximum.
    #[must_use]
    fn accumulate(self, rhs: Self) -> Self;
}

macro_rules! unsigned_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                fn accumulate(self, rhs: Self) -> Self {
                    self.saturating_add(rhs)
                }
            }
        )*
    };
}

unsigned_weight!(u8, u16, u32, u64, usize);

impl Weight for bool {
    fn accumulate(self, rhs: Self) -> Self {
        self | rhs
    }
}

/// A sparse matrix in CSR layout.
///
/// `row_ptrs[r]..row_ptrs[r + 1]` delimits row `r` inside `cols` and `vals`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseMatrix<T = u32> {
    shape: (usize, usize),
    row_ptrs: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<T>,
}

impl<T: Entry> SparseMatrix<T> {
    /// An all-zero matrix of the given shape.
    #[must_use]
    pub fn zeros(shape: (usize, usize)) -> Self {
        Self {
            shape,
            row_ptrs: vec![0; shape.0 + 1],
            cols: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// Builds from per-row entry lists that are already sorted by column,
    /// free of duplicates, and free of zeros.
    #[contracts::debug_ensures(ret.row_ptrs.len() == shape.0 + 1)]
    fn from_sorted_rows(shape: (usize, usize), rows: Vec<Vec<(usize, T)>>) -> Self {
        let nnz = rows.iter().map(Vec::len).sum();
        let mut row_ptrs = Vec::with_capacity(shape.0 + 1);
        let mut cols = Vec::with_capacity(nnz);
        let mut vals = Vec::with_capacity(nnz);
        row_ptrs.push(0);
        for row in rows {
            for (c, v) in row {
                cols.push(c);
                vals.push(v);
            }
            row_ptrs.push(cols.len());
        }
        row_ptrs.resize(shape.0 + 1, cols.len());
        Self {
            shape,
            row_ptrs,
            cols,
            vals,
        }
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of rows.
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.shape.0
    }

    /// Number of columns.
    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.shape.1
    }

    /// Whether the matrix is square.
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.shape.0 == self.shape.1
    }

    /// Number of stored (non-zero) entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.vals.len()
    }

    fn row_bounds(&self, row: usize) -> (usize, usize) {
        if row >= self.shape.0 {
            return (0, 0);
        }
        (self.row_ptrs[row], self.row_ptrs[row + 1])
    }

    /// Column indices of the non-zero entries in `row`, ascending.
    /// Empty for rows outside the matrix.
    #[must_use]
    pub fn row_indices(&self, row: usize) -> &[usize] {
        let (start, end) = self.row_bounds(row);
        &self.cols[start..end]
    }

    /// `(column, value)` pairs of the non-zero entries in `row`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let (start, end) = self.row_bounds(row);
        self.cols[start..end]
            .iter()
            .copied()
            .zip(self.vals[start..end].iter().copied())
    }

    /// All non-zero entries as `(row, column, value)`, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.shape.0).flat_map(move |r| self.row(r).map(move |(c, v)| (r, c, v)))
    }

    /// Value at `(row, col)`; zero when absent or outside the matrix.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        let (start, end) = self.row_bounds(row);
        self.cols[start..end]
            .binary_search(&col)
            .map_or_else(|_| T::default(), |pos| self.vals[start + pos])
    }

    /// Whether `(row, col)` holds a non-zero entry.
    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.row_indices(row).binary_search(&col).is_ok()
    }

    /// Stores `value` at `(row, col)`. Storing zero removes the entry.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.shape.0 {
            return Err(GraphError::out_of_range(row, self.shape.0));
        }
        if col >= self.shape.1 {
            return Err(GraphError::out_of_range(col, self.shape.1));
        }
        let (start, end) = self.row_bounds(row);
        match self.cols[start..end].binary_search(&col) {
            Ok(pos) if value == T::default() => {
                self.cols.remove(start + pos);
                self.vals.remove(start + pos);
                self.row_ptrs[row + 1..].iter_mut().for_each(|p| *p -= 1);
            }
            Ok(pos) => self.vals[start + pos] = value,
            Err(_) if value == T::default() => {}
            Err(pos) => {
                self.cols.insert(start + pos, col);
                self.vals.insert(start + pos, value);
                self.row_ptrs[row + 1..].iter_mut().for_each(|p| *p += 1);
            }
        }
        Ok(())
    }

    /// The transposed matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut rows: Vec<Vec<(usize, T)>> = vec![Vec::new(); self.shape.1];
        // Row-major traversal keeps every output row sorted by column.
        for (r, c, v) in self.iter() {
            rows[c].push((r, v));
        }
        Self::from_sorted_rows((self.shape.1, self.shape.0), rows)
    }

    /// The entries strictly below the main diagonal (`col < row`).
    #[must_use]
    pub fn strict_lower_triangle(&self) -> Self {
        let rows: Vec<Vec<(usize, T)>> = (0..self.shape.0)
            .map(|r| self.row(r).take_while(|&(c, _)| c < r).collect())
            .collect();
        Self::from_sorted_rows(self.shape, rows)
    }

    /// Restricts rows and columns to `positions`, in that order.
    ///
    /// Entry `(i, j)` of the result is entry `(positions[i], positions[j])`
    /// of `self`. Fails when a position is out of range or repeated.
    pub fn select(&self, positions: &[usize]) -> Result<Self> {
        validate_positions(positions, self.shape.0)?;
        validate_positions(positions, self.shape.1)?;

        let mut col_map: Vec<Option<usize>> = vec![None; self.shape.1];
        for (new, &old) in positions.iter().enumerate() {
            col_map[old] = Some(new);
        }

        let rows: Vec<Vec<(usize, T)>> = positions
            .iter()
            .map(|&old_row| {
                let mut row: Vec<(usize, T)> = self
                    .row(old_row)
                    .filter_map(|(c, v)| col_map[c].map(|new_c| (new_c, v)))
                    .collect();
                row.sort_unstable_by_key(|&(c, _)| c);
                row
            })
            .collect();
        Ok(Self::from_sorted_rows((positions.len(), positions.len()), rows))
    }

    /// Boolean matrix that is true wherever the entry exceeds `threshold`.
    #[must_use]
    pub fn gt(&self, threshold: T) -> SparseMatrix<bool>
    where
        T: PartialOrd,
    {
        let rows: Vec<Vec<(usize, bool)>> = (0..self.shape.0)
            .map(|r| {
                self.row(r)
                    .filter(|&(_, v)| v > threshold)
                    .map(|(c, _)| (c, true))
                    .collect()
            })
            .collect();
        SparseMatrix::<bool>::from_sorted_rows(self.shape, rows)
    }

    /// Dense row-major copy, mainly for diagnostics and tests.
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<T>> {
        let mut dense = vec![vec![T::default(); self.shape.1]; self.shape.0];
        for (r, c, v) in self.iter() {
            dense[r][c] = v;
        }
        dense
    }
}

impl<T: Weight> SparseMatrix<T> {
    /// Builds a matrix from `(row, col, value)` triplets. Repeated
    /// coordinates are summed with [`Weight::accumulate`]; zero values are
    /// dropped.
    pub fn from_triplets(
        shape: (usize, usize),
        triplets: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Result<Self> {
        let mut rows: Vec<Vec<(usize, T)>> = vec![Vec::new(); shape.0];
        for (r, c, v) in triplets {
            if r >= shape.0 {
                return Err(GraphError::out_of_range(r, shape.0));
            }
            if c >= shape.1 {
                return Err(GraphError::out_of_range(c, shape.1));
            }
            rows[r].push((c, v));
        }
        let rows = rows.into_iter().map(merge_sorted_duplicates).collect();
        Ok(Self::from_sorted_rows(shape, rows))
    }

    /// Entrywise saturating sum. Fails when the shapes differ.
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        if self.shape != other.shape {
            return Err(GraphError::matrix_shape(
                "matrix addition",
                self.shape,
                other.shape,
            ));
        }
        Ok(self.add_aligned(other))
    }

    fn add_aligned(&self, other: &Self) -> Self {
        let rows: Vec<Vec<(usize, T)>> = (0..self.shape.0)
            .map(|r| merge_rows(self.row(r), other.row(r)))
            .collect();
        Self::from_sorted_rows(self.shape, rows)
    }

    /// Entrywise sum of every matrix in `matrices`, each of shape `shape`.
    /// An empty input yields the zero matrix.
    pub fn sum<'a>(
        shape: (usize, usize),
        matrices: impl IntoIterator<Item = &'a Self>,
    ) -> Result<Self>
    where
        T: 'a,
    {
        matrices
            .into_iter()
            .try_fold(Self::zeros(shape), |acc, m| acc.try_add(m))
    }
}

/// Entrywise saturating sum.
///
/// # Panics
///
/// Panics when the shapes differ. Use [`SparseMatrix::try_add`] when the
/// operands are not already known to agree.
impl<T: Weight> Add for &SparseMatrix<T> {
    type Output = SparseMatrix<T>;

    fn add(self, rhs: Self) -> SparseMatrix<T> {
        assert_eq!(
            self.shape, rhs.shape,
            "cannot add sparse matrices of different shapes"
        );
        self.add_aligned(rhs)
    }
}

impl SparseMatrix<u32> {
    /// Square `n x n` adjacency with weight one per listed edge; repeated
    /// edges accumulate.
    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Result<Self> {
        Self::from_triplets((n, n), edges.into_iter().map(|(r, c)| (r, c, 1)))
    }
}

fn merge_sorted_duplicates<T: Weight>(
    mut row: Vec<(usize, T)>,
) -> Vec<(usize, T)> {
    row.sort_by_key(|&(c, _)| c);
    let mut merged: Vec<(usize, T)> = Vec::with_capacity(row.len());
    for (c, v) in row {
        match merged.last_mut() {
            Some((last_c, last_v)) if *last_c == c => *last_v = (*last_v).accumulate(v),
            _ => merged.push((c, v)),
        }
    }
    merged.retain(|&(_, v)| v != T::default());
    merged
}

fn merge_rows<T: Weight>(
    left: impl Iterator<Item = (usize, T)>,
    right: impl Iterator<Item = (usize, T)>,
) -> Vec<(usize, T)> {
    let mut out = Vec::new();
    let mut left = left.peekable();
    let mut right = right.peekable();
    loop {
        let next = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => break,
            (Some(l), None) => {
                left.next();
                l
            }
            (None, Some(r)) => {
                right.next();
                r
            }
            (Some((lc, lv)), Some((rc, rv))) => {
                if lc < rc {
                    left.next();
                    (lc, lv)
                } else if rc < lc {
                    right.next();
                    (rc, rv)
                } else {
                    left.next();
                    right.next();
                    (lc, lv.accumulate(rv))
                }
            }
        };
        if next.1 != T::default() {
            out.push(next);
        }
    }
    out
}
