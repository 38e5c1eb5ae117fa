//! Gray-Level Co-occurrence Matrix (GLCM) texture features
//!
//! For every scan position a base window and a shifted offset window are
//! paired cell by cell into a co-occurrence matrix, which is normalized and
//! reduced by each requested [`Statistic`]. Positions the windows cannot
//! reach, or that the missing-value policy rejects, hold `na_val`.
//!
//! Input cells must be integer gray levels in `[1, n_grey]`; non-finite cells
//! and the raster's nodata value are missing.

use ndarray::{s, Array2, Array3, ArrayView1, ArrayView2};
use std::str::FromStr;
use tracing::debug;

use crate::maybe_rayon::*;
use glcmkit_core::raster::{Raster, RasterElement};
use glcmkit_core::{Algorithm, Error, Result};

use super::cooccurrence::{envi_mean, level_index, CooccurrenceMatrix, IndexMatrices, Normalization};
use super::geometry::WindowGeometry;
use super::statistics::{parse_statistics, Statistic};

/// What to do with missing cells inside a window pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NaPolicy {
    /// Drop individual pairs that touch a missing cell
    #[default]
    Ignore,
    /// Skip the position if the base window's centre cell is missing,
    /// otherwise behave like `Ignore`
    Center,
    /// Skip the position if any cell of either window is missing
    Any,
}

impl NaPolicy {
    /// Whether the window pair at a position is skipped entirely
    fn rejects(self, base: &ArrayView2<'_, f64>, offset: &ArrayView2<'_, f64>, center: (usize, usize)) -> bool {
        match self {
            NaPolicy::Ignore => false,
            NaPolicy::Center => !base[center].is_finite(),
            NaPolicy::Any => base.iter().chain(offset.iter()).any(|v| !v.is_finite()),
        }
    }
}

impl FromStr for NaPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ignore" => Ok(NaPolicy::Ignore),
            "center" => Ok(NaPolicy::Center),
            "any" => Ok(NaPolicy::Any),
            _ => Err(Error::UnknownNaPolicy(s.to_string())),
        }
    }
}

/// Parameters for GLCM texture computation
#[derive(Debug, Clone)]
pub struct TextureParams {
    /// Number of gray levels; input cells must lie in `[1, n_grey]`
    pub n_grey: usize,
    /// Window (height, width)
    pub window: (usize, usize),
    /// Offset window shift (rows, cols), may be negative
    pub shift: (isize, isize),
    /// Statistics to compute, one output layer each, in this order
    pub statistics: Vec<Statistic>,
    /// Missing-value policy
    pub na_policy: NaPolicy,
    /// Fill value for border and skipped positions
    pub na_val: f64,
    /// Co-occurrence normalization divisor
    pub normalization: Normalization,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            n_grey: 32,
            window: (3, 3),
            shift: (1, 1),
            statistics: Statistic::ALL.to_vec(),
            na_policy: NaPolicy::Ignore,
            na_val: f64::NAN,
            normalization: Normalization::WindowCells,
        }
    }
}

/// Texture output: one `rows x cols` layer per requested statistic
#[derive(Debug, Clone)]
pub struct TextureStack {
    data: Array3<f64>,
    statistics: Vec<Statistic>,
    na_val: f64,
}

impl TextureStack {
    /// Dimensions as (rows, cols, layers)
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Statistic of each layer, in layer order
    pub fn statistics(&self) -> &[Statistic] {
        &self.statistics
    }

    /// Fill value used for border and skipped cells
    pub fn na_val(&self) -> f64 {
        self.na_val
    }

    /// Value at (row, col) in layer `layer`
    pub fn get(&self, row: usize, col: usize, layer: usize) -> Option<f64> {
        self.data.get((row, col, layer)).copied()
    }

    /// The `rows x cols x layers` array
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// Consume the stack and return the underlying array
    pub fn into_array(self) -> Array3<f64> {
        self.data
    }

    /// Extract one layer as a raster whose nodata is `na_val`
    pub fn layer(&self, layer: usize) -> Result<Raster<f64>> {
        let (_, _, layers) = self.shape();
        if layer >= layers {
            return Err(Error::InvalidParameter {
                name: "layer",
                value: layer.to_string(),
                reason: format!("stack has {} layers", layers),
            });
        }
        let plane = self.data.slice(s![.., .., layer]).to_owned();
        let mut raster = Raster::from_array(plane);
        raster.set_nodata(Some(self.na_val));
        Ok(raster)
    }

    /// First layer holding `statistic`
    pub fn layer_by(&self, statistic: Statistic) -> Option<Raster<f64>> {
        let idx = self.statistics.iter().position(|&s| s == statistic)?;
        self.layer(idx).ok()
    }
}

/// GLCM texture algorithm
#[derive(Debug, Clone, Default)]
pub struct GlcmTexture;

impl Algorithm for GlcmTexture {
    type Input = Raster<f64>;
    type Output = TextureStack;
    type Params = TextureParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "GLCM Texture"
    }

    fn description(&self) -> &'static str {
        "Windowed gray-level co-occurrence texture statistics (Haralick)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        calc_texture(&input, &params)
    }
}

/// Compute GLCM texture statistics from names, as a scripting host would call it.
///
/// `statistics` are registry names (see [`Statistic::name`]) and `na_opt` is
/// one of `"ignore"`, `"center"`, `"any"`. Both are resolved before any
/// computation starts.
pub fn calc_texture_named<T: RasterElement, S: AsRef<str>>(
    raster: &Raster<T>,
    n_grey: usize,
    window: (usize, usize),
    shift: (isize, isize),
    statistics: &[S],
    na_opt: &str,
    na_val: f64,
) -> Result<TextureStack> {
    let params = TextureParams {
        n_grey,
        window,
        shift,
        statistics: parse_statistics(statistics)?,
        na_policy: na_opt.parse()?,
        na_val,
        normalization: Normalization::WindowCells,
    };
    calc_texture(raster, &params)
}

/// Compute GLCM texture statistics.
///
/// # Arguments
/// * `raster` - Gray levels in `[1, n_grey]`; missing cells are allowed
/// * `params` - Window geometry, statistics and missing-value handling
///
/// # Returns
/// A stack with the raster's rows and columns and one layer per statistic.
///
/// # Errors
/// * [`Error::InvalidParameter`] if `n_grey` is zero
/// * [`Error::InvalidGeometry`] if no window position fits the raster
/// * [`Error::DataRange`] if a non-missing cell is not a valid gray level
pub fn calc_texture<T: RasterElement>(raster: &Raster<T>, params: &TextureParams) -> Result<TextureStack> {
    if params.n_grey == 0 {
        return Err(Error::InvalidParameter {
            name: "n_grey",
            value: "0".into(),
            reason: "at least one gray level is required".into(),
        });
    }

    let (rows, cols) = raster.shape();
    let geometry = WindowGeometry::new(rows, cols, params.window, params.shift)?;
    let levels = gray_levels(raster, params.n_grey)?;
    let index = IndexMatrices::new(params.n_grey);
    let n_stats = params.statistics.len();
    let (scan_rows, scan_cols) = geometry.scan_shape();

    debug!(
        rows,
        cols,
        n_grey = params.n_grey,
        window = ?geometry.window,
        shift = ?geometry.shift,
        center = ?geometry.center,
        scan_rows,
        scan_cols,
        policy = ?params.na_policy,
        "GLCM texture geometry"
    );

    let mut data = Array3::from_elem((rows, cols, n_stats), params.na_val);

    if n_stats > 0 {
        let computed: Vec<(Vec<f64>, usize)> = (0..scan_rows)
            .into_par_iter()
            .map(|row| texture_row(&levels, &geometry, &index, params, row))
            .collect::<Result<Vec<_>>>()?;

        let mut skipped = 0;
        for (row, (values, row_skipped)) in computed.iter().enumerate() {
            skipped += row_skipped;
            for (col, stat_values) in values.chunks(n_stats).enumerate() {
                let (out_r, out_c) = geometry.output_cell(row, col);
                data.slice_mut(s![out_r, out_c, ..])
                    .assign(&ArrayView1::from(stat_values));
            }
        }
        debug!(skipped, total = scan_rows * scan_cols, "GLCM windows rejected by missing-value policy");
    }

    // Border sweeps
    for ((row, col, _), v) in data.indexed_iter_mut() {
        if geometry.is_border(row, col) {
            *v = params.na_val;
        }
    }

    Ok(TextureStack {
        data,
        statistics: params.statistics.clone(),
        na_val: params.na_val,
    })
}

/// Statistics for every scan position of one row.
///
/// Returns `scan_cols * n_stats` values (position-major) and the number of
/// positions the missing-value policy rejected. Each row owns its matrix.
fn texture_row(
    levels: &Raster<f64>,
    geometry: &WindowGeometry,
    index: &IndexMatrices,
    params: &TextureParams,
    row: usize,
) -> Result<(Vec<f64>, usize)> {
    let n_stats = params.statistics.len();
    let (_, scan_cols) = geometry.scan_shape();
    let (wh, ww) = geometry.window;
    let center = geometry.window_center();

    let mut glcm = CooccurrenceMatrix::new(params.n_grey);
    let mut values = vec![params.na_val; scan_cols * n_stats];
    let mut skipped = 0;

    for (col, out) in values.chunks_mut(n_stats).enumerate() {
        let (br, bc) = geometry.base_origin(row, col);
        let (or, oc) = geometry.offset_origin(row, col);
        let base = levels.window(br, bc, wh, ww)?;
        let offset = levels.window(or, oc, wh, ww)?;

        if params.na_policy.rejects(&base, &offset, center) {
            skipped += 1;
            continue;
        }

        glcm.clear();
        glcm.accumulate(base.view(), offset.view());
        glcm.normalize(geometry.window_cells(), params.normalization);

        let haralick_mean = glcm.haralick_mean();
        let simple_mean = envi_mean(base);
        for (slot, stat) in out.iter_mut().zip(&params.statistics) {
            *slot = stat.evaluate(glcm.pij(), index, haralick_mean, simple_mean);
        }
    }

    Ok((values, skipped))
}

/// Convert raster cells to gray-level values, NaN marking missing cells.
fn gray_levels<T: RasterElement>(raster: &Raster<T>, n_grey: usize) -> Result<Raster<f64>> {
    let mut levels = Array2::from_elem(raster.shape(), f64::NAN);
    for ((row, col), &v) in raster.data().indexed_iter() {
        if raster.is_nodata(v) {
            continue;
        }
        let value = v.to_f64().unwrap_or(f64::NAN);
        if level_index(value, n_grey).is_none() {
            return Err(Error::DataRange { row, col, value, n_grey });
        }
        levels[(row, col)] = value;
    }
    Ok(Raster::from_array(levels))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> Raster<f64> {
        Raster::from_vec(
            vec![
                1.0, 1.0, 2.0, 2.0, //
                1.0, 1.0, 2.0, 2.0, //
                3.0, 3.0, 4.0, 4.0, //
                3.0, 3.0, 4.0, 4.0,
            ],
            4,
            4,
        )
        .unwrap()
    }

    fn stripes(rows: usize, cols: usize) -> Raster<f64> {
        let data = (0..rows * cols).map(|i| ((i % cols) % 3 + 1) as f64).collect();
        Raster::from_vec(data, rows, cols).unwrap()
    }

    #[test]
    fn test_na_policy_parse() {
        assert_eq!("ignore".parse::<NaPolicy>().unwrap(), NaPolicy::Ignore);
        assert_eq!("center".parse::<NaPolicy>().unwrap(), NaPolicy::Center);
        assert_eq!("any".parse::<NaPolicy>().unwrap(), NaPolicy::Any);
        assert!(matches!("all".parse::<NaPolicy>(), Err(Error::UnknownNaPolicy(_))));
    }

    #[test]
    fn test_block_raster_values() {
        let result = calc_texture_named(
            &blocks(),
            4,
            (2, 2),
            (0, 1),
            &["contrast", "homogeneity", "second_moment"],
            "ignore",
            -9999.0,
        )
        .unwrap();
        assert_eq!(result.shape(), (4, 4, 3));

        // Scan (0, 0): base cols 0..2, offset cols 1..3 over rows 0..2
        // pairs (1,1) (1,2) (1,1) (1,2) -> contrast 0.5
        assert!((result.get(1, 1, 0).unwrap() - 0.5).abs() < 1e-12);
        assert!((result.get(1, 1, 1).unwrap() - 0.75).abs() < 1e-12);
        assert!((result.get(1, 1, 2).unwrap() - 0.5).abs() < 1e-12);

        // Scan (1, 1): base rows 1..3 cols 1..3, offset cols 2..4
        // pairs (1,2) (2,2) (3,4) (4,4)
        assert!((result.get(2, 2, 0).unwrap() - 0.5).abs() < 1e-12);

        for col in 0..4 {
            assert_eq!(result.get(0, col, 0), Some(-9999.0));
        }
        for row in 0..4 {
            assert_eq!(result.get(row, 0, 2), Some(-9999.0));
            assert_eq!(result.get(row, 3, 1), Some(-9999.0));
        }
    }

    #[test]
    fn test_uniform_window_with_zero_shift() {
        let raster = Raster::filled(5, 5, 2.0);
        let params = TextureParams {
            n_grey: 4,
            window: (3, 3),
            shift: (0, 0),
            na_val: -1.0,
            ..Default::default()
        };
        let result = calc_texture(&raster, &params).unwrap();
        let layer = |s: Statistic| result.layer_by(s).unwrap().get(2, 2).unwrap();

        assert!((layer(Statistic::SecondMoment) - 1.0).abs() < 1e-12);
        assert!(layer(Statistic::Entropy).abs() < 1e-12);
        assert!((layer(Statistic::Homogeneity) - 1.0).abs() < 1e-12);
        assert!(layer(Statistic::Contrast).abs() < 1e-12);
        assert!((layer(Statistic::Mean) - 0.5).abs() < 1e-12);
        assert!((layer(Statistic::MeanEnvi) - 1.0).abs() < 1e-12);
        assert!(layer(Statistic::VarianceEnvi).abs() < 1e-12);
        assert!(layer(Statistic::Correlation).is_nan());
    }

    #[test]
    fn test_zero_shift_correlation() {
        let params = TextureParams {
            n_grey: 3,
            window: (3, 3),
            shift: (0, 0),
            statistics: vec![Statistic::Correlation],
            na_val: -1.0,
            ..Default::default()
        };
        let result = calc_texture(&stripes(6, 6), &params).unwrap();
        for row in 1..5 {
            for col in 1..5 {
                let v = result.get(row, col, 0).unwrap();
                assert!((v - 1.0).abs() < 1e-10, "({row}, {col}) = {v}");
            }
        }
    }

    #[test]
    fn test_ignore_policy_drops_pairs() {
        let mut raster = Raster::filled(3, 3, 1.0);
        raster.set(1, 1, f64::NAN).unwrap();
        let params = TextureParams {
            n_grey: 2,
            window: (3, 3),
            shift: (0, 0),
            statistics: vec![Statistic::SecondMoment],
            ..Default::default()
        };
        let result = calc_texture(&raster, &params).unwrap();
        // 8 of 9 pairs, divided by 9 cells
        let expected = (8.0_f64 / 9.0).powi(2);
        assert!((result.get(1, 1, 0).unwrap() - expected).abs() < 1e-12);

        let by_pairs = calc_texture(
            &raster,
            &TextureParams {
                normalization: Normalization::ValidPairs,
                ..params
            },
        )
        .unwrap();
        assert!((by_pairs.get(1, 1, 0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_envi_mean_skips_missing_base_cells() {
        let mut raster = Raster::filled(3, 3, 2.0);
        raster.set(0, 2, f64::NAN).unwrap();
        let params = TextureParams {
            n_grey: 2,
            window: (3, 3),
            shift: (0, 0),
            statistics: vec![Statistic::MeanEnvi, Statistic::Mean],
            na_val: -1.0,
            ..Default::default()
        };
        let result = calc_texture(&raster, &params).unwrap();
        // Eight valid cells of level 2, the missing one is left out of the average
        assert!((result.get(1, 1, 0).unwrap() - 1.0).abs() < 1e-12);
        // 8 of 9 pairs on level 2: (2 * 8/9) / 2 levels
        assert!((result.get(1, 1, 1).unwrap() - 8.0 / 9.0).abs() < 1e-12);

        let any = calc_texture(&raster, &TextureParams { na_policy: NaPolicy::Any, ..params }).unwrap();
        assert_eq!(any.get(1, 1, 0), Some(-1.0));
    }

    #[test]
    fn test_layer_extraction() {
        let params = TextureParams {
            n_grey: 3,
            window: (3, 3),
            shift: (0, 1),
            statistics: vec![Statistic::Contrast, Statistic::Entropy],
            na_val: -9999.0,
            ..Default::default()
        };
        let result = calc_texture(&stripes(6, 7), &params).unwrap();
        let layer = result.layer(1).unwrap();
        assert_eq!(layer.shape(), (6, 7));
        assert_eq!(layer.nodata(), Some(-9999.0));
        assert_eq!(layer.get(2, 2).unwrap(), result.get(2, 2, 1).unwrap());
        assert!(result.layer_by(Statistic::Variance).is_none());
    }

    #[test]
    fn test_integer_raster_with_nodata() {
        let mut raster: Raster<u8> = Raster::filled(5, 5, 3);
        raster.set(2, 2, 0).unwrap();
        raster.set_nodata(Some(0));
        let params = TextureParams {
            n_grey: 3,
            window: (3, 3),
            shift: (0, 1),
            statistics: vec![Statistic::Contrast],
            na_policy: NaPolicy::Center,
            na_val: -9999.0,
            ..Default::default()
        };
        let result = calc_texture(&raster, &params).unwrap();
        assert_eq!(result.get(2, 2, 0), Some(-9999.0));
        assert!(result.get(1, 1, 0).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_data_range_error() {
        let mut raster = Raster::filled(5, 5, 1.0);
        raster.set(4, 4, 5.0).unwrap();
        let err = calc_texture_named(&raster, 4, (3, 3), (0, 1), &["mean"], "ignore", 0.0);
        assert!(matches!(err, Err(Error::DataRange { row: 4, col: 4, n_grey: 4, .. })));

        raster.set(4, 4, 1.5).unwrap();
        let err = calc_texture_named(&raster, 4, (3, 3), (0, 1), &["mean"], "ignore", 0.0);
        assert!(matches!(err, Err(Error::DataRange { .. })));
    }

    #[test]
    fn test_structural_errors_fail_fast() {
        let raster = Raster::filled(5, 5, 1.0);
        assert!(matches!(
            calc_texture_named(&raster, 4, (3, 3), (0, 1), &["mean", "energy"], "ignore", 0.0),
            Err(Error::UnknownStatistic(_))
        ));
        assert!(matches!(
            calc_texture_named(&raster, 4, (3, 3), (0, 1), &["mean"], "none", 0.0),
            Err(Error::UnknownNaPolicy(_))
        ));
        assert!(matches!(
            calc_texture_named(&raster, 4, (7, 3), (0, 1), &["mean"], "ignore", 0.0),
            Err(Error::InvalidGeometry { .. })
        ));
        assert!(matches!(
            calc_texture_named(&raster, 0, (3, 3), (0, 1), &["mean"], "ignore", 0.0),
            Err(Error::InvalidParameter { name: "n_grey", .. })
        ));
    }

    #[test]
    fn test_empty_statistics() {
        let raster = Raster::filled(4, 4, 1.0);
        let empty: [&str; 0] = [];
        let result = calc_texture_named(&raster, 1, (3, 3), (0, 0), &empty, "any", 0.0).unwrap();
        assert_eq!(result.shape(), (4, 4, 0));
        assert!(result.layer(0).is_err());
    }

    #[test]
    fn test_algorithm_trait() {
        let algo = GlcmTexture;
        assert_eq!(algo.name(), "GLCM Texture");
        let raster = Raster::filled(8, 8, 1.0);
        let result = algo.execute_default(raster).unwrap();
        assert_eq!(result.shape(), (8, 8, 10));
        assert!(result.get(0, 0, 0).unwrap().is_nan());
    }
}
