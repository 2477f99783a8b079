//! Reversible elementwise normalization of sample vectors.
//!
//! The helper never normalizes anything itself. It works against the
//! [`Scaler`] capability, which every normalization must implement in full:
//! forward and inverse transforms, plus the ability to build an independent
//! sub-scaler over a subset of dimensions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A reversible, elementwise normalization over fixed-width sample vectors.
pub trait Scaler {
    /// Number of dimensions this scaler was built for.
    fn n_features(&self) -> usize;

    /// Map a raw sample to normalized units.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `sample.len() != self.n_features()`.
    fn transform(&self, sample: &[f64]) -> Result<Vec<f64>>;

    /// Map a normalized sample back to raw units.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `sample.len() != self.n_features()`.
    fn inverse_transform(&self, sample: &[f64]) -> Result<Vec<f64>>;

    /// Build a fresh scaler over the dimensions where `mask` is `true`.
    ///
    /// The returned value owns its parameters; `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `mask.len() != self.n_features()`.
    fn restrict(&self, mask: &[bool]) -> Result<Self>
    where
        Self: Sized;

    /// Row-wise [`transform`](Self::transform).
    ///
    /// # Errors
    ///
    /// Propagates the first row error.
    fn transform_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }

    /// Row-wise [`inverse_transform`](Self::inverse_transform).
    ///
    /// # Errors
    ///
    /// Propagates the first row error.
    fn inverse_transform_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.inverse_transform(row)).collect()
    }
}

fn check_width(expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { expected, got })
    }
}

fn select<T: Copy>(values: &[T], mask: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(mask)
        .filter_map(|(&v, &keep)| keep.then_some(v))
        .collect()
}

/// Standardizes each dimension to zero mean and unit variance.
///
/// Dimensions with zero variance keep a scale of `1.0`, so constant columns
/// are shifted but never divided by zero.
///
/// # Examples
///
/// ```
/// use tunespace::scaling::{Scaler, StandardScaler};
///
/// let scaler = StandardScaler::fit(&[vec![0.0, 10.0], vec![2.0, 10.0]]).unwrap();
/// let z = scaler.transform(&[2.0, 10.0]).unwrap();
/// assert_eq!(z, vec![1.0, 0.0]);
/// assert_eq!(scaler.inverse_transform(&z).unwrap(), vec![2.0, 10.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    var: Vec<f64>,
}

impl StandardScaler {
    /// Fit per-dimension mean and (population) variance from `rows`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedScaler`] if `rows` is empty and
    /// [`Error::DimensionMismatch`] if rows differ in width.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(Error::UnsupportedScaler(
                "cannot fit a scaler without samples".into(),
            ));
        };
        let width = first.len();
        for row in rows {
            check_width(width, row.len())?;
        }

        let n = rows.len() as f64;
        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, &x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut var = vec![0.0; width];
        for row in rows {
            for ((v, &x), &m) in var.iter_mut().zip(row).zip(&mean) {
                *v += (x - m) * (x - m);
            }
        }
        for v in &mut var {
            *v /= n;
        }

        let scale = var
            .iter()
            .map(|&v| if v > 0.0 { v.sqrt() } else { 1.0 })
            .collect();

        Ok(Self { mean, scale, var })
    }

    /// Build a scaler from explicit per-dimension centers and scales.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the lengths differ and
    /// [`Error::UnsupportedScaler`] if any scale is zero or not finite.
    pub fn from_parts(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        check_width(mean.len(), scale.len())?;
        if let Some(i) = scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(Error::UnsupportedScaler(format!(
                "scale of dimension {i} must be finite and non-zero, got {}",
                scale[i]
            )));
        }
        let var = scale.iter().map(|s| s * s).collect();
        Ok(Self { mean, scale, var })
    }

    /// Per-dimension centers.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Per-dimension scales.
    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Per-dimension variances.
    #[must_use]
    pub fn var(&self) -> &[f64] {
        &self.var
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, sample: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features(), sample.len())?;
        Ok(sample
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }

    fn inverse_transform(&self, sample: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features(), sample.len())?;
        Ok(sample
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&z, (&m, &s))| z * s + m)
            .collect())
    }

    fn restrict(&self, mask: &[bool]) -> Result<Self> {
        check_width(self.n_features(), mask.len())?;
        Ok(Self {
            mean: select(&self.mean, mask),
            scale: select(&self.scale, mask),
            var: select(&self.var, mask),
        })
    }
}

/// A scaler that leaves samples unchanged, for callers working in raw units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdentityScaler {
    n_features: usize,
}

impl IdentityScaler {
    /// Creates an identity scaler over `n_features` dimensions.
    #[must_use]
    pub fn new(n_features: usize) -> Self {
        Self { n_features }
    }
}

impl Scaler for IdentityScaler {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn transform(&self, sample: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features, sample.len())?;
        Ok(sample.to_vec())
    }

    fn inverse_transform(&self, sample: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features, sample.len())?;
        Ok(sample.to_vec())
    }

    fn restrict(&self, mask: &[bool]) -> Result<Self> {
        check_width(self.n_features, mask.len())?;
        Ok(Self {
            n_features: mask.iter().filter(|&&keep| keep).count(),
        })
    }
}
