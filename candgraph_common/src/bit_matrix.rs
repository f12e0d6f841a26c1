//! Dense boolean matrix backed by packed 64-bit words.
//!
//! Each row occupies `words_per_row` words. Padding bits past the last
//! column are always zero, so popcounts over whole words are exact.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{GraphError, Result};

const WORD_BITS: usize = u64::BITS as usize;

/// A `rows x cols` boolean matrix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    words_per_row: usize,
    words: Vec<u64>,
}

impl BitMatrix {
    /// A matrix with every bit set to `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: bool) -> Self {
        let words_per_row = cols.div_ceil(WORD_BITS);
        let fill = if value { u64::MAX } else { 0 };
        let mut matrix = Self {
            rows,
            cols,
            words_per_row,
            words: vec![fill; rows * words_per_row],
        };
        matrix.clear_padding();
        matrix
    }

    /// An all-false matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, false)
    }

    /// An all-true matrix.
    #[must_use]
    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, true)
    }

    /// Builds from nested rows. Every row must have `cols` entries.
    pub fn from_rows<R: AsRef<[bool]>>(cols: usize, rows: &[R]) -> Result<Self> {
        let mut matrix = Self::zeros(rows.len(), cols);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(GraphError::shape(
                    format!("bit matrix row {r}"),
                    cols,
                    row.len(),
                ));
            }
            for (c, &bit) in row.iter().enumerate() {
                if bit {
                    matrix.words[r * matrix.words_per_row + c / WORD_BITS] |= 1 << (c % WORD_BITS);
                }
            }
        }
        Ok(matrix)
    }

    fn last_word_mask(&self) -> u64 {
        match self.cols % WORD_BITS {
            0 => u64::MAX,
            used => (1_u64 << used) - 1,
        }
    }

    fn clear_padding(&mut self) {
        if self.words_per_row == 0 {
            return;
        }
        let mask = self.last_word_mask();
        for r in 0..self.rows {
            self.words[(r + 1) * self.words_per_row - 1] &= mask;
        }
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of rows.
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.cols
    }

    fn locate(&self, row: usize, col: usize) -> Result<(usize, u64)> {
        if row >= self.rows {
            return Err(GraphError::out_of_range(row, self.rows));
        }
        if col >= self.cols {
            return Err(GraphError::out_of_range(col, self.cols));
        }
        Ok((
            row * self.words_per_row + col / WORD_BITS,
            1 << (col % WORD_BITS),
        ))
    }

    /// Bit at `(row, col)`; false outside the matrix.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.locate(row, col)
            .is_ok_and(|(word, mask)| self.words[word] & mask != 0)
    }

    /// Writes the bit at `(row, col)`.
    #[contracts::debug_ensures(ret.is_err() || self.get(row, col) == value)]
    pub fn set(&mut self, row: usize, col: usize, value: bool) -> Result<()> {
        let (word, mask) = self.locate(row, col)?;
        if value {
            self.words[word] |= mask;
        } else {
            self.words[word] &= !mask;
        }
        Ok(())
    }

    fn row_words(&self, row: usize) -> &[u64] {
        if row >= self.rows {
            return &[];
        }
        &self.words[row * self.words_per_row..(row + 1) * self.words_per_row]
    }

    /// Columns with a set bit in `row`, ascending. Empty for rows outside
    /// the matrix.
    pub fn row_ones(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        self.row_words(row)
            .iter()
            .enumerate()
            .flat_map(|(w, &word)| SetBits(word).map(move |bit| w * WORD_BITS + bit))
    }

    /// Number of set bits in `row`.
    #[must_use]
    pub fn row_count(&self, row: usize) -> usize {
        self.row_words(row)
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum()
    }

    /// Number of set bits in every row, in row order.
    #[must_use]
    pub fn row_counts(&self) -> Vec<usize> {
        #[cfg(feature = "rayon")]
        let rows = (0..self.rows).into_par_iter();

        #[cfg(not(feature = "rayon"))]
        let rows = 0..self.rows;

        rows.map(|r| self.row_count(r)).collect()
    }

    /// Total number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// A new matrix made of the given rows, in the given order. Positions
    /// are validated by the caller.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        let mut words = Vec::with_capacity(rows.len() * self.words_per_row);
        for &r in rows {
            if r >= self.rows {
                return Err(GraphError::out_of_range(r, self.rows));
            }
            words.extend_from_slice(self.row_words(r));
        }
        Ok(Self {
            rows: rows.len(),
            cols: self.cols,
            words_per_row: self.words_per_row,
            words,
        })
    }

    /// Dense nested copy, mainly for diagnostics and tests.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.get(r, c)).collect())
            .collect()
    }
}

/// Iterates the positions of set bits in a word, lowest first.
struct SetBits(u64);

impl Iterator for SetBits {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(bit)
    }
}
