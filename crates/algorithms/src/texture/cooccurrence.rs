//! Co-occurrence matrix for one base/offset window pair
//!
//! Gray levels are 1-based values (`1..=n_grey`). They are translated to
//! 0-based matrix indices only inside [`level_index`]; everything that looks at
//! level *values* (the index matrices, the means) stays 1-based.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use glcmkit_core::{Error, Result};

/// How the pair counts are turned into probabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Divide by the total number of window cells, even when missing values
    /// removed pairs (the matrix may then sum to less than 1)
    #[default]
    WindowCells,
    /// Divide by the number of pairs actually accumulated
    ValidPairs,
}

impl Normalization {
    fn divisor(self, window_cells: usize, pairs: usize) -> usize {
        match self {
            Normalization::WindowCells => window_cells,
            Normalization::ValidPairs => pairs,
        }
    }
}

/// Map a 1-based gray level to a 0-based matrix index.
///
/// Returns `None` for missing values and for anything that is not an integer
/// in `[1, n_grey]`.
pub fn level_index(value: f64, n_grey: usize) -> Option<usize> {
    if value.is_finite() && value.fract() == 0.0 && value >= 1.0 && value <= n_grey as f64 {
        Some(value as usize - 1)
    } else {
        None
    }
}

/// Constant `imat`/`jmat` matrices holding the 1-based row and column level
/// of every cell: `imat[[i, j]] = i + 1`, `jmat[[i, j]] = j + 1`.
#[derive(Debug, Clone)]
pub struct IndexMatrices {
    pub imat: Array2<f64>,
    pub jmat: Array2<f64>,
}

impl IndexMatrices {
    pub fn new(n_grey: usize) -> Self {
        let imat = Array2::from_shape_fn((n_grey, n_grey), |(i, _)| (i + 1) as f64);
        let jmat = imat.t().to_owned();
        Self { imat, jmat }
    }

    pub fn n_grey(&self) -> usize {
        self.imat.nrows()
    }
}

/// Gray-level co-occurrence matrix (`pij`).
///
/// Reused across windows: [`clear`](Self::clear), [`accumulate`](Self::accumulate),
/// then [`normalize`](Self::normalize).
#[derive(Debug, Clone)]
pub struct CooccurrenceMatrix {
    pij: Array2<f64>,
    pairs: usize,
}

impl CooccurrenceMatrix {
    /// Empty `n_grey x n_grey` matrix
    pub fn new(n_grey: usize) -> Self {
        Self {
            pij: Array2::zeros((n_grey, n_grey)),
            pairs: 0,
        }
    }

    /// Build the normalized matrix for a single window pair.
    ///
    /// # Errors
    /// [`Error::InvalidDimensions`] if the windows differ in shape,
    /// [`Error::DataRange`] if a finite cell is not a level in `[1, n_grey]`.
    pub fn from_windows(
        base: ArrayView2<'_, f64>,
        offset: ArrayView2<'_, f64>,
        n_grey: usize,
        normalization: Normalization,
    ) -> Result<Self> {
        if base.dim() != offset.dim() {
            let (height, width) = offset.dim();
            return Err(Error::InvalidDimensions { width, height });
        }
        for window in [base.view(), offset.view()] {
            for ((row, col), &value) in window.indexed_iter() {
                if value.is_finite() && level_index(value, n_grey).is_none() {
                    return Err(Error::DataRange { row, col, value, n_grey });
                }
            }
        }

        let window_cells = base.len();
        let mut glcm = Self::new(n_grey);
        glcm.accumulate(base.view(), offset.view());
        glcm.normalize(window_cells, normalization);
        Ok(glcm)
    }

    /// Reset all counts to zero
    pub fn clear(&mut self) {
        self.pij.fill(0.0);
        self.pairs = 0;
    }

    /// Count every cell pair where both the base and the offset value are
    /// valid levels. Returns the number of pairs added.
    pub fn accumulate(&mut self, base: ArrayView2<'_, f64>, offset: ArrayView2<'_, f64>) -> usize {
        let n_grey = self.n_grey();
        let mut added = 0;
        for (&b, &o) in base.iter().zip(offset.iter()) {
            let (Some(i), Some(j)) = (level_index(b, n_grey), level_index(o, n_grey)) else {
                continue;
            };
            self.pij[(i, j)] += 1.0;
            added += 1;
        }
        self.pairs += added;
        added
    }

    /// Turn counts into probabilities. A zero divisor leaves the matrix as is.
    pub fn normalize(&mut self, window_cells: usize, normalization: Normalization) {
        let divisor = normalization.divisor(window_cells, self.pairs);
        if divisor > 0 {
            self.pij /= divisor as f64;
        }
    }

    /// The matrix values
    pub fn pij(&self) -> &Array2<f64> {
        &self.pij
    }

    /// Number of gray levels
    pub fn n_grey(&self) -> usize {
        self.pij.nrows()
    }

    /// Number of accumulated pairs since the last clear
    pub fn pairs(&self) -> usize {
        self.pairs
    }

    /// Total probability mass
    pub fn sum(&self) -> f64 {
        self.pij.sum()
    }

    /// Row marginal: `sum_j pij[i][j]`
    pub fn row_marginal(&self) -> Array1<f64> {
        self.pij.sum_axis(Axis(1))
    }

    /// Column marginal: `sum_i pij[i][j]`
    pub fn col_marginal(&self) -> Array1<f64> {
        self.pij.sum_axis(Axis(0))
    }

    /// Haralick mean: average of the level-weighted row and column marginals,
    /// each taken as a mean over the `n_grey` levels.
    pub fn haralick_mean(&self) -> f64 {
        let n = self.n_grey();
        if n == 0 {
            return f64::NAN;
        }
        let weighted = |marginal: Array1<f64>| -> f64 {
            marginal
                .iter()
                .enumerate()
                .map(|(k, p)| (k + 1) as f64 * p)
                .sum::<f64>()
                / n as f64
        };
        (weighted(self.row_marginal()) + weighted(self.col_marginal())) / 2.0
    }
}

/// Simple mean of the base window on a 0-based level scale
/// (mean of the non-missing levels minus one). NaN if nothing is valid.
pub fn envi_mean(base: ArrayView2<'_, f64>) -> f64 {
    let (sum, count) = base
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64 - 1.0
    }
}
