//! Texture statistics over a normalized co-occurrence matrix
//!
//! Every statistic is a pure function of `(pij, imat, jmat, haralick_mean,
//! envi_mean)`. None of them renormalize `pij`: when missing values removed
//! pairs, the matrix may sum to less than one and the statistics see it as is.

use ndarray::{Array1, Array2, Axis, Zip};
use glcmkit_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

use super::cooccurrence::IndexMatrices;

/// Signature shared by all statistic functions:
/// `(pij, imat, jmat, haralick_mean, envi_mean) -> value`
pub type StatisticFn = fn(&Array2<f64>, &Array2<f64>, &Array2<f64>, f64, f64) -> f64;

/// Available GLCM texture statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    /// Haralick mean of the row and column marginals
    Mean,
    /// Simple mean of the base window levels (0-based)
    MeanEnvi,
    /// Haralick variance around the Haralick mean
    Variance,
    /// Variance around the simple window mean, minus one
    VarianceEnvi,
    /// Homogeneity (inverse difference moment)
    Homogeneity,
    /// Contrast — local intensity variation
    Contrast,
    /// Dissimilarity — absolute-difference weighted
    Dissimilarity,
    /// Entropy — randomness/disorder
    Entropy,
    /// Angular second moment (energy) — uniformity
    SecondMoment,
    /// Correlation — linear dependency of gray levels
    Correlation,
}

impl Statistic {
    /// Every statistic, in catalogue order
    pub const ALL: [Statistic; 10] = [
        Statistic::Mean,
        Statistic::MeanEnvi,
        Statistic::Variance,
        Statistic::VarianceEnvi,
        Statistic::Homogeneity,
        Statistic::Contrast,
        Statistic::Dissimilarity,
        Statistic::Entropy,
        Statistic::SecondMoment,
        Statistic::Correlation,
    ];

    /// Registry key of this statistic
    pub fn name(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::MeanEnvi => "mean_ENVI",
            Statistic::Variance => "variance",
            Statistic::VarianceEnvi => "variance_ENVI",
            Statistic::Homogeneity => "homogeneity",
            Statistic::Contrast => "contrast",
            Statistic::Dissimilarity => "dissimilarity",
            Statistic::Entropy => "entropy",
            Statistic::SecondMoment => "second_moment",
            Statistic::Correlation => "correlation",
        }
    }

    /// The reduction function registered for this statistic
    pub fn function(self) -> StatisticFn {
        match self {
            Statistic::Mean => mean,
            Statistic::MeanEnvi => mean_envi,
            Statistic::Variance => variance,
            Statistic::VarianceEnvi => variance_envi,
            Statistic::Homogeneity => homogeneity,
            Statistic::Contrast => contrast,
            Statistic::Dissimilarity => dissimilarity,
            Statistic::Entropy => entropy,
            Statistic::SecondMoment => second_moment,
            Statistic::Correlation => correlation,
        }
    }

    /// Evaluate against a normalized matrix
    pub fn evaluate(self, pij: &Array2<f64>, index: &IndexMatrices, haralick_mean: f64, envi_mean: f64) -> f64 {
        (self.function())(pij, &index.imat, &index.jmat, haralick_mean, envi_mean)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| Error::UnknownStatistic(s.to_string()))
    }
}

/// Resolve an ordered list of registry names. Duplicates are kept.
///
/// # Errors
/// [`Error::UnknownStatistic`] for the first name without a registry entry.
pub fn parse_statistics<S: AsRef<str>>(names: &[S]) -> Result<Vec<Statistic>> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

// Haralick, 1973

fn mean(_pij: &Array2<f64>, _imat: &Array2<f64>, _jmat: &Array2<f64>, haralick_mean: f64, _envi_mean: f64) -> f64 {
    haralick_mean
}

fn mean_envi(_pij: &Array2<f64>, _imat: &Array2<f64>, _jmat: &Array2<f64>, _haralick_mean: f64, envi_mean: f64) -> f64 {
    envi_mean
}

/// Haralick eq. 4
fn variance(pij: &Array2<f64>, imat: &Array2<f64>, _jmat: &Array2<f64>, haralick_mean: f64, _envi_mean: f64) -> f64 {
    Zip::from(pij)
        .and(imat)
        .fold(0.0, |acc, &p, &i| acc + (i - haralick_mean).powi(2) * p)
}

/// ENVI convention: carries a `- 1` term
fn variance_envi(pij: &Array2<f64>, imat: &Array2<f64>, _jmat: &Array2<f64>, _haralick_mean: f64, envi_mean: f64) -> f64 {
    Zip::from(pij)
        .and(imat)
        .fold(0.0, |acc, &p, &i| acc + (i - envi_mean).powi(2) * p)
        - 1.0
}

/// Haralick eq. 5
fn homogeneity(pij: &Array2<f64>, imat: &Array2<f64>, jmat: &Array2<f64>, _haralick_mean: f64, _envi_mean: f64) -> f64 {
    Zip::from(pij)
        .and(imat)
        .and(jmat)
        .fold(0.0, |acc, &p, &i, &j| acc + p / (1.0 + (i - j).powi(2)))
}

/// Haralick eq. 2
fn contrast(pij: &Array2<f64>, imat: &Array2<f64>, jmat: &Array2<f64>, _haralick_mean: f64, _envi_mean: f64) -> f64 {
    Zip::from(pij)
        .and(imat)
        .and(jmat)
        .fold(0.0, |acc, &p, &i, &j| acc + p * (i - j).powi(2))
}

fn dissimilarity(pij: &Array2<f64>, imat: &Array2<f64>, jmat: &Array2<f64>, _haralick_mean: f64, _envi_mean: f64) -> f64 {
    Zip::from(pij)
        .and(imat)
        .and(jmat)
        .fold(0.0, |acc, &p, &i, &j| acc + p * (i - j).abs())
}

/// Haralick eq. 9, empty cells contribute nothing
fn entropy(pij: &Array2<f64>, _imat: &Array2<f64>, _jmat: &Array2<f64>, _haralick_mean: f64, _envi_mean: f64) -> f64 {
    pij.iter().filter(|&&p| p > 0.0).map(|&p| -p * p.ln()).sum()
}

fn second_moment(pij: &Array2<f64>, _imat: &Array2<f64>, _jmat: &Array2<f64>, _haralick_mean: f64, _envi_mean: f64) -> f64 {
    pij.iter().map(|p| p * p).sum()
}

/// Gonzalez & Woods (2009, p. 832) correlation.
///
/// The row/column means are level-weighted *sums* of the marginals. A window
/// with a single level in either marginal has zero deviation, so the ratio is
/// 0/0 and the result is NaN.
fn correlation(pij: &Array2<f64>, imat: &Array2<f64>, jmat: &Array2<f64>, _haralick_mean: f64, _envi_mean: f64) -> f64 {
    let rows = pij.sum_axis(Axis(1));
    let cols = pij.sum_axis(Axis(0));

    let mr = weighted_sum(&rows);
    let mc = weighted_sum(&cols);
    let sigr = deviation(&rows, mr);
    let sigc = deviation(&cols, mc);

    let cross = Zip::from(pij)
        .and(imat)
        .and(jmat)
        .fold(0.0, |acc, &p, &i, &j| acc + i * j * p);

    (cross - mr * mc) / (sigr * sigc)
}

/// `sum_k k * marginal[k]` with 1-based k
fn weighted_sum(marginal: &Array1<f64>) -> f64 {
    marginal
        .iter()
        .enumerate()
        .map(|(k, p)| (k + 1) as f64 * p)
        .sum()
}

fn deviation(marginal: &Array1<f64>, center: f64) -> f64 {
    marginal
        .iter()
        .enumerate()
        .map(|(k, p)| ((k + 1) as f64 - center).powi(2) * p)
        .sum::<f64>()
        .sqrt()
}
