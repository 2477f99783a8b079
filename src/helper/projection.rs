use crate::encoding::{Encoding, argmax};
use crate::error::{Error, Result};
use crate::parameter::ParamKind;
use crate::scaling::Scaler;
use crate::types::SampleSpace;

use super::ConstraintHelper;

impl<S: Scaler, E: Encoding> ConstraintHelper<S, E> {
    /// Collapse every categorical block of a raw vector to a single hot
    /// dimension, picking the largest value (lowest index on ties).
    fn project_blocks(&self, raw: &mut [f64]) {
        for block in self.blocks() {
            let cvals = &mut raw[block];
            let hot = argmax(cvals);
            for (i, v) in cvals.iter_mut().enumerate() {
                *v = if i == hot { 1.0 } else { 0.0 };
            }
        }
    }

    /// Project every categorical block onto its nearest one-hot corner.
    ///
    /// Numeric and boolean dimensions are left as they are. When `input` and
    /// `output` are the same space they are copied through bit-for-bit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `sample` has the wrong width,
    /// or propagates scaler errors.
    pub fn apply_constraints(
        &self,
        sample: &[f64],
        input: SampleSpace,
        output: SampleSpace,
    ) -> Result<Vec<f64>> {
        let mut raw = self.to_raw(sample, input)?;
        self.project_blocks(&mut raw);
        self.finish(sample, raw, input, output, &self.block_mask())
    }

    /// Repair an arbitrary relaxed vector into a valid configuration.
    ///
    /// Integer dimensions are rounded half-to-even and categorical blocks are
    /// projected as in [`apply_constraints`](Self::apply_constraints).
    /// Boolean dimensions are also snapped to `0` or `1` at `0.5`, which goes
    /// beyond plain integer rounding so the result always satisfies the 0/1
    /// legality of boolean flags.
    ///
    /// If the encoding has a decoder, the one-hot blocks are then collapsed
    /// to category indices. A `Scaled` output in that case is produced by the
    /// [`decoded_scaler`](crate::ConstraintHelperBuilder::decoded_scaler),
    /// since the main scaler only covers the one-hot layout.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if `sample` has the wrong width.
    /// - [`Error::UnsupportedScaler`] if the encoding decodes, `output` is
    ///   `Scaled`, and no decoded scaler was configured.
    ///
    /// Scaler errors are propagated.
    pub fn valid_config(
        &self,
        sample: &[f64],
        input: SampleSpace,
        output: SampleSpace,
    ) -> Result<Vec<f64>> {
        let mut raw = self.to_raw(sample, input)?;
        let mut touched = vec![true; self.width];
        for segment in self.segments()? {
            let i = segment.offset;
            match segment.kind {
                ParamKind::Int => raw[i] = raw[i].round_ties_even(),
                ParamKind::Bool => raw[i] = if raw[i] >= 0.5 { 1.0 } else { 0.0 },
                ParamKind::Float => touched[i] = false,
                ParamKind::Categorical => {}
            }
        }
        self.project_blocks(&mut raw);

        if let Some(decoded) = self.encoding.decode(&raw) {
            return match (output, &self.decoded_scaler) {
                (SampleSpace::Raw, _) => Ok(decoded),
                (SampleSpace::Scaled, Some(decoded_scaler)) => decoded_scaler.transform(&decoded),
                (SampleSpace::Scaled, None) => Err(Error::UnsupportedScaler(
                    "scaled output of decoded configurations needs a decoded scaler".into(),
                )),
            };
        }
        self.finish(sample, raw, input, output, &touched)
    }

    /// Row-wise [`valid_config`](Self::valid_config).
    ///
    /// # Errors
    ///
    /// Propagates the first row error.
    pub fn valid_configs(
        &self,
        rows: &[Vec<f64>],
        input: SampleSpace,
        output: SampleSpace,
    ) -> Result<Vec<Vec<f64>>> {
        rows.iter()
            .map(|row| self.valid_config(row, input, output))
            .collect()
    }
}
