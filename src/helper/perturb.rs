use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::rng_util;
use crate::scaling::Scaler;
use crate::types::SampleSpace;

use super::ConstraintHelper;

/// Slack allowed when checking that a block is one-hot, so that blocks which
/// went through a scaler round-trip still qualify.
const ONE_HOT_TOLERANCE: f64 = 1e-9;

/// Index of the hot dimension if `block` is one-hot, `None` otherwise.
fn hot_index(block: &[f64]) -> Option<usize> {
    let mut hot = None;
    for (i, &v) in block.iter().enumerate() {
        if (v - 1.0).abs() <= ONE_HOT_TOLERANCE {
            if hot.is_some() {
                return None;
            }
            hot = Some(i);
        } else if v.abs() > ONE_HOT_TOLERANCE {
            return None;
        }
    }
    hot
}

impl<S: Scaler, E: Encoding> ConstraintHelper<S, E> {
    /// Move a valid configuration to a neighbouring one by switching some of
    /// its categorical groups to a different category.
    ///
    /// One group always switches. The remaining decisions are drawn with a
    /// probability that starts at [`flip_probability`](Self::flip_probability)
    /// and decays by [`flip_decay`](Self::flip_decay) per decision; the
    /// decisions are then dealt to the groups in a random order, so no group
    /// is favoured. A switching group takes one of its other categories
    /// uniformly at random. Groups with a single category cannot switch and
    /// are left out; if no group can switch the sample is returned as is.
    ///
    /// Numeric and boolean dimensions are never modified.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if `sample` has the wrong width.
    /// - [`Error::IllegalCategoricalState`] if any block is not one-hot;
    ///   repair the sample with [`valid_config`](Self::valid_config) first.
    ///
    /// # Examples
    ///
    /// ```
    /// use tunespace::prelude::*;
    ///
    /// let params = vec![Param::float(), Param::categorical()];
    /// let encoding = OneHotEncoding::new(&params, vec![3]).unwrap();
    /// let helper = ConstraintHelper::new(params, IdentityScaler::new(4), encoding).unwrap();
    ///
    /// let mut rng = fastrand::Rng::with_seed(42);
    /// let sample = [0.5, 1.0, 0.0, 0.0];
    /// let moved = helper
    ///     .randomize_categorical(&sample, SampleSpace::Raw, SampleSpace::Raw, &mut rng)
    ///     .unwrap();
    /// assert_eq!(moved[0], 0.5);
    /// assert_eq!(moved[1], 0.0);
    /// ```
    pub fn randomize_categorical(
        &self,
        sample: &[f64],
        input: SampleSpace,
        output: SampleSpace,
        rng: &mut fastrand::Rng,
    ) -> Result<Vec<f64>> {
        if self.n_categorical_groups() == 0 {
            self.check_width(sample)?;
            return Ok(sample.to_vec());
        }

        let mut raw = self.to_raw(sample, input)?;
        let mut hot = Vec::with_capacity(self.n_categorical_groups());
        for (group, block) in self.blocks().enumerate() {
            let values = &raw[block];
            let Some(h) = hot_index(values) else {
                return Err(Error::IllegalCategoricalState {
                    group,
                    values: values.to_vec(),
                });
            };
            hot.push(h);
        }

        let flippable: Vec<usize> = self
            .encoding
            .n_values()
            .iter()
            .enumerate()
            .filter_map(|(group, &n)| (n >= 2).then_some(group))
            .collect();

        // Decisions in order of decreasing probability, the first always set
        let mut decisions = vec![false; flippable.len()];
        let mut p = self.flip_probability;
        for (i, decision) in decisions.iter_mut().enumerate() {
            if i == 0 {
                *decision = true;
            } else {
                *decision = rng_util::bernoulli(rng, p);
                p *= self.flip_decay;
            }
        }

        let mut order: Vec<usize> = (0..flippable.len()).collect();
        rng.shuffle(&mut order);

        let blocks: Vec<_> = self.blocks().collect();
        let n_values = self.encoding.n_values();
        let mut n_flipped = 0_usize;
        for (slot, &group) in flippable.iter().enumerate() {
            if !decisions[order[slot]] {
                continue;
            }
            let n = n_values[group];
            let choice = rng_util::usize_excluding(rng, n, hot[group]);
            for (i, v) in raw[blocks[group].clone()].iter_mut().enumerate() {
                *v = if i == choice { 1.0 } else { 0.0 };
            }
            n_flipped += 1;
        }

        trace_debug!(
            flipped = n_flipped,
            groups = flippable.len(),
            "randomized categorical groups"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = n_flipped;

        self.finish(sample, raw, input, output, &self.block_mask())
    }
}
