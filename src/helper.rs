//! The constraint helper: projection, perturbation and grid search over a
//! relaxed one-hot configuration space.

use core::ops::Range;

use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::parameter::{Param, ParamKind};
use crate::scaling::Scaler;
use crate::types::SampleSpace;

mod builder;
mod grid;
mod perturb;
mod projection;
mod space;

pub use builder::ConstraintHelperBuilder;

/// Default probability of flipping each categorical group after the first.
pub(crate) const DEFAULT_FLIP_PROBABILITY: f64 = 0.3;
/// Default multiplicative decay applied to the flip probability per group.
pub(crate) const DEFAULT_FLIP_DECAY: f64 = 0.5;
/// Default row cap for [`ConstraintHelper::categorical_grid_default`].
pub(crate) const DEFAULT_MAX_GRID_SIZE: usize = 2048;

/// Repairs, perturbs and enumerates configurations in a relaxed space where
/// every categorical parameter is a block of independent dimensions.
///
/// The helper owns the parameter catalog and the two collaborators it relies
/// on: a [`Scaler`] for moving between raw and normalized units, and an
/// [`Encoding`] describing where each one-hot block lives. All operations are
/// pure functions of their inputs; randomness comes from an explicitly passed
/// [`fastrand::Rng`].
///
/// # Examples
///
/// ```
/// use tunespace::prelude::*;
///
/// let params = vec![Param::float(), Param::boolean(), Param::categorical()];
/// let encoding = OneHotEncoding::new(&params, vec![3]).unwrap();
/// let helper = ConstraintHelper::new(params, IdentityScaler::new(5), encoding).unwrap();
///
/// let repaired = helper
///     .apply_constraints(&[0.4, 1.0, 0.2, 0.9, 0.3], SampleSpace::Raw, SampleSpace::Raw)
///     .unwrap();
/// assert_eq!(repaired, vec![0.4, 1.0, 0.0, 1.0, 0.0]);
/// ```
#[derive(Clone, Debug)]
pub struct ConstraintHelper<S, E> {
    params: Vec<Param>,
    scaler: S,
    decoded_scaler: Option<S>,
    encoding: E,
    width: usize,
    flip_probability: f64,
    flip_decay: f64,
    max_grid_size: usize,
}

/// One parameter's position in the full vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Segment {
    pub(crate) kind: ParamKind,
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl<S: Scaler, E: Encoding> ConstraintHelper<S, E> {
    /// Creates a helper with default settings.
    ///
    /// # Errors
    ///
    /// See [`ConstraintHelperBuilder::build`].
    pub fn new(params: Vec<Param>, scaler: S, encoding: E) -> Result<Self> {
        Self::builder(params, scaler, encoding).build()
    }

    /// Returns a builder for configuring perturbation and grid defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use tunespace::prelude::*;
    ///
    /// let params = vec![Param::categorical(), Param::categorical()];
    /// let encoding = OneHotEncoding::new(&params, vec![2, 2]).unwrap();
    /// let helper = ConstraintHelper::builder(params, IdentityScaler::new(4), encoding)
    ///     .flip_probability(0.5)
    ///     .max_grid_size(64)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(helper.max_grid_size(), 64);
    /// ```
    #[must_use]
    pub fn builder(params: Vec<Param>, scaler: S, encoding: E) -> ConstraintHelperBuilder<S, E> {
        ConstraintHelperBuilder::new(params, scaler, encoding)
    }

    /// The parameter catalog.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The scaler collaborator.
    #[must_use]
    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    /// The scaler for decoded configurations, if one was configured.
    #[must_use]
    pub fn decoded_scaler(&self) -> Option<&S> {
        self.decoded_scaler.as_ref()
    }

    /// The encoding collaborator.
    #[must_use]
    pub fn encoding(&self) -> &E {
        &self.encoding
    }

    /// Initial flip probability used by the perturber.
    #[must_use]
    pub fn flip_probability(&self) -> f64 {
        self.flip_probability
    }

    /// Per-group decay of the flip probability.
    #[must_use]
    pub fn flip_decay(&self) -> f64 {
        self.flip_decay
    }

    /// Row cap used by [`categorical_grid_default`](Self::categorical_grid_default).
    #[must_use]
    pub fn max_grid_size(&self) -> usize {
        self.max_grid_size
    }

    /// Walk the catalog in order, placing each parameter in the full vector.
    ///
    /// Fails if a categorical block is not where the encoding says it is.
    pub(crate) fn segments(&self) -> Result<Vec<Segment>> {
        let n_values = self.encoding.n_values();
        let start_indices = self.encoding.start_indices();

        let mut segments = Vec::with_capacity(self.params.len());
        let (mut offset, mut cat_idx) = (0, 0);
        for param in &self.params {
            let len = match param.kind() {
                ParamKind::Float | ParamKind::Int | ParamKind::Bool => 1,
                ParamKind::Categorical => {
                    let (Some(&n), Some(&start)) =
                        (n_values.get(cat_idx), start_indices.get(cat_idx))
                    else {
                        return Err(Error::InvalidEncoding(format!(
                            "encoding describes {} categorical groups, catalog has more",
                            n_values.len()
                        )));
                    };
                    if offset != start {
                        return Err(Error::InvariantViolation {
                            cat_index: cat_idx,
                            expected: start,
                            got: offset,
                        });
                    }
                    cat_idx += 1;
                    n
                }
            };
            segments.push(Segment {
                kind: param.kind(),
                offset,
                len,
            });
            offset += len;
        }
        if cat_idx != n_values.len() {
            return Err(Error::InvalidEncoding(format!(
                "encoding describes {} categorical groups, catalog has {cat_idx}",
                n_values.len()
            )));
        }
        Ok(segments)
    }

    /// Dimension ranges of the non-boolean categorical blocks, in order.
    pub(crate) fn blocks(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.encoding
            .start_indices()
            .iter()
            .zip(self.encoding.n_values())
            .map(|(&start, &n)| start..start + n)
    }

    /// `true` for every dimension inside a non-boolean categorical block.
    pub(crate) fn block_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.width];
        for block in self.blocks() {
            mask[block].fill(true);
        }
        mask
    }

    pub(crate) fn check_width(&self, sample: &[f64]) -> Result<()> {
        if sample.len() == self.width {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.width,
                got: sample.len(),
            })
        }
    }

    /// Bring `sample` into raw units.
    pub(crate) fn to_raw(&self, sample: &[f64], input: SampleSpace) -> Result<Vec<f64>> {
        self.check_width(sample)?;
        match input {
            SampleSpace::Raw => Ok(sample.to_vec()),
            SampleSpace::Scaled => self.scaler.inverse_transform(sample),
        }
    }

    /// Convert a repaired raw vector into the requested output space.
    ///
    /// When input and output spaces agree, dimensions with `touched[i] == false`
    /// are copied from `original` so that the scaler round-trip never moves them.
    pub(crate) fn finish(
        &self,
        original: &[f64],
        raw: Vec<f64>,
        input: SampleSpace,
        output: SampleSpace,
        touched: &[bool],
    ) -> Result<Vec<f64>> {
        let mut out = match output {
            SampleSpace::Raw => raw,
            SampleSpace::Scaled => self.scaler.transform(&raw)?,
        };
        if input == output {
            for ((o, &x), &t) in out.iter_mut().zip(original).zip(touched) {
                if !t {
                    *o = x;
                }
            }
        }
        Ok(out)
    }
}
