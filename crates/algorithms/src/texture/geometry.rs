//! Window placement for a base/offset window pair
//!
//! All coordinates here are 0-based array indices. A scan position `(row, col)`
//! anchors the base window at `(row, col) + base_ul` and the offset window at
//! `(row, col) + offset_ul`; its statistics are written to
//! `(row, col) + center`.

use glcmkit_core::{Error, Result};

/// Derived geometry of one texture run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    /// Window height and width
    pub window: (usize, usize),
    /// Signed (row, col) shift of the offset window
    pub shift: (isize, isize),
    /// Upper-left of the base window relative to the scan position
    pub base_ul: (usize, usize),
    /// Upper-left of the offset window relative to the scan position
    pub offset_ul: (usize, usize),
    /// Output cell relative to the scan position
    pub center: (usize, usize),
    /// Exclusive end of the scan range (rows, cols)
    pub scan_end: (usize, usize),
    /// Last row/col not swept by the bottom/right border fill
    fill_limit: (isize, isize),
}

impl WindowGeometry {
    /// Derive the geometry for a `rows x cols` raster.
    ///
    /// The scan range is `rows - |sr| - ceil(wh/2)` (same for columns), capped
    /// so that both windows always lie inside the raster.
    ///
    /// # Errors
    /// [`Error::InvalidGeometry`] when a window dimension is zero or no scan
    /// position remains.
    pub fn new(rows: usize, cols: usize, window: (usize, usize), shift: (isize, isize)) -> Result<Self> {
        let invalid = || Error::InvalidGeometry {
            rows,
            cols,
            window_rows: window.0,
            window_cols: window.1,
            shift_row: shift.0,
            shift_col: shift.1,
        };

        if window.0 == 0 || window.1 == 0 {
            return Err(invalid());
        }

        let fill_row = fill_limit(rows, window.0, shift.0);
        let fill_col = fill_limit(cols, window.1, shift.1);
        let end_row = fill_row.min(in_bounds_limit(rows, window.0, shift.0));
        let end_col = fill_col.min(in_bounds_limit(cols, window.1, shift.1));
        if end_row <= 0 || end_col <= 0 {
            return Err(invalid());
        }

        let base_ul = (shift.0.min(0).unsigned_abs(), shift.1.min(0).unsigned_abs());
        let offset_ul = (
            base_ul.0.saturating_add_signed(shift.0),
            base_ul.1.saturating_add_signed(shift.1),
        );
        let center = (base_ul.0 + window.0 / 2, base_ul.1 + window.1 / 2);

        Ok(Self {
            window,
            shift,
            base_ul,
            offset_ul,
            center,
            scan_end: (end_row as usize, end_col as usize),
            fill_limit: (fill_row, fill_col),
        })
    }

    /// Number of cells in one window
    pub fn window_cells(&self) -> usize {
        self.window.0 * self.window.1
    }

    /// Number of scan positions (rows, cols)
    pub fn scan_shape(&self) -> (usize, usize) {
        self.scan_end
    }

    /// Upper-left of the base window for a scan position
    pub fn base_origin(&self, row: usize, col: usize) -> (usize, usize) {
        (row + self.base_ul.0, col + self.base_ul.1)
    }

    /// Upper-left of the offset window for a scan position
    pub fn offset_origin(&self, row: usize, col: usize) -> (usize, usize) {
        (row + self.offset_ul.0, col + self.offset_ul.1)
    }

    /// Output cell written by a scan position
    pub fn output_cell(&self, row: usize, col: usize) -> (usize, usize) {
        (row + self.center.0, col + self.center.1)
    }

    /// Centre cell inside a window, in window coordinates
    pub fn window_center(&self) -> (usize, usize) {
        (self.window.0 / 2, self.window.1 / 2)
    }

    /// Whether an output cell lies in one of the four border sweeps.
    ///
    /// Left/top cover everything before `center`; right/bottom cover
    /// everything after `len - |shift| - ceil(window/2)`.
    pub fn is_border(&self, row: usize, col: usize) -> bool {
        col < self.center.1
            || row < self.center.0
            || col as isize > self.fill_limit.1
            || row as isize > self.fill_limit.0
    }
}

/// `len - |shift| - ceil(window/2)`
fn fill_limit(len: usize, window: usize, shift: isize) -> isize {
    len as isize - shift.abs() - window.div_ceil(2) as isize
}

/// `len - |shift| - window + 1`: last exclusive start keeping both windows in bounds
fn in_bounds_limit(len: usize, window: usize, shift: isize) -> isize {
    len as isize - shift.abs() - window as isize + 1
}
