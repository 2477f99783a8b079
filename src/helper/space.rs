use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::parameter::ParamKind;
use crate::scaling::Scaler;

use super::ConstraintHelper;

impl<S: Scaler, E: Encoding> ConstraintHelper<S, E> {
    /// Total width of a sample vector.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.width
    }

    /// Number of non-boolean categorical groups.
    #[must_use]
    pub fn n_categorical_groups(&self) -> usize {
        self.encoding.n_values().len()
    }

    /// One entry per dimension: `true` for plain numeric dimensions, `false`
    /// for booleans and for every dimension of a categorical block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] if a categorical block does not
    /// start where the catalog places it.
    pub fn numerical_mask(&self) -> Result<Vec<bool>> {
        let mut mask = Vec::with_capacity(self.width);
        for segment in self.segments()? {
            let numeric = matches!(segment.kind, ParamKind::Float | ParamKind::Int);
            mask.extend(core::iter::repeat_n(numeric, segment.len));
        }
        Ok(mask)
    }

    /// Number of bits in the combination space: one per boolean parameter
    /// plus one per category of every non-boolean categorical parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCategoricalParameters`] if the space is all
    /// numeric, or [`Error::InvariantViolation`] as for
    /// [`numerical_mask`](Self::numerical_mask).
    pub fn combination_bit_width(&self) -> Result<usize> {
        let bits = self
            .segments()?
            .iter()
            .filter(|s| matches!(s.kind, ParamKind::Bool | ParamKind::Categorical))
            .map(|s| s.len)
            .sum();
        if bits == 0 {
            return Err(Error::NoCategoricalParameters);
        }
        Ok(bits)
    }

    /// `2^bits`, saturating at `u64::MAX` when the space has 64 bits or more.
    ///
    /// # Errors
    ///
    /// As for [`combination_bit_width`](Self::combination_bit_width).
    pub fn combination_space_size(&self) -> Result<u64> {
        let bits = self.combination_bit_width()?;
        Ok(u32::try_from(bits)
            .ok()
            .and_then(|b| 1_u64.checked_shl(b))
            .unwrap_or(u64::MAX))
    }
}
