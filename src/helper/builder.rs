use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::parameter::Param;
use crate::scaling::Scaler;

use super::{
    ConstraintHelper, DEFAULT_FLIP_DECAY, DEFAULT_FLIP_PROBABILITY, DEFAULT_MAX_GRID_SIZE,
};

/// A builder for constructing [`ConstraintHelper`] instances with a fluent API.
///
/// Created via [`ConstraintHelper::builder()`].
///
/// # Defaults
///
/// - Flip probability: `0.3`
/// - Flip decay: `0.5`
/// - Max grid size: `2048`
pub struct ConstraintHelperBuilder<S, E> {
    params: Vec<Param>,
    scaler: S,
    decoded_scaler: Option<S>,
    encoding: E,
    flip_probability: f64,
    flip_decay: f64,
    max_grid_size: usize,
}

impl<S: Scaler, E: Encoding> ConstraintHelperBuilder<S, E> {
    pub(super) fn new(params: Vec<Param>, scaler: S, encoding: E) -> Self {
        Self {
            params,
            scaler,
            decoded_scaler: None,
            encoding,
            flip_probability: DEFAULT_FLIP_PROBABILITY,
            flip_decay: DEFAULT_FLIP_DECAY,
            max_grid_size: DEFAULT_MAX_GRID_SIZE,
        }
    }

    /// Set the probability of flipping the second group in a perturbation.
    /// Later groups use this value multiplied by the decay once per step.
    #[must_use]
    pub fn flip_probability(mut self, p: f64) -> Self {
        self.flip_probability = p;
        self
    }

    /// Set the multiplicative decay of the flip probability.
    #[must_use]
    pub fn flip_decay(mut self, decay: f64) -> Self {
        self.flip_decay = decay;
        self
    }

    /// Set the row cap used by
    /// [`categorical_grid_default`](ConstraintHelper::categorical_grid_default).
    #[must_use]
    pub fn max_grid_size(mut self, max_size: usize) -> Self {
        self.max_grid_size = max_size;
        self
    }

    /// Set the scaler used for decoded configurations.
    ///
    /// When the encoding has a decoder,
    /// [`valid_config`](ConstraintHelper::valid_config) returns compact
    /// category indices, which are narrower than the one-hot layout the main
    /// scaler covers. Scaled output in that case goes through this scaler.
    #[must_use]
    pub fn decoded_scaler(mut self, scaler: S) -> Self {
        self.decoded_scaler = Some(scaler);
        self
    }

    /// Validate the configuration and build the helper.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidProbability`] if the flip probability or decay is
    ///   outside `[0, 1]`.
    /// - [`Error::InvalidEncoding`] if the encoding reports fewer start
    ///   offsets than cardinalities, or a different number of categorical
    ///   groups than the catalog holds.
    /// - [`Error::InvariantViolation`] if a categorical block does not start
    ///   where the catalog places it.
    /// - [`Error::UnsupportedScaler`] if the scaler's width differs from the
    ///   full vector width, or if a decoded scaler is set but the encoding has
    ///   no decoder or decodes to a different width.
    pub fn build(self) -> Result<ConstraintHelper<S, E>> {
        for p in [self.flip_probability, self.flip_decay] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidProbability(p));
            }
        }
        let n_groups = self.encoding.n_values().len();
        if self.encoding.start_indices().len() < n_groups {
            return Err(Error::InvalidEncoding(format!(
                "{n_groups} cardinalities but only {} start offsets",
                self.encoding.start_indices().len()
            )));
        }

        let mut helper = ConstraintHelper {
            params: self.params,
            scaler: self.scaler,
            decoded_scaler: self.decoded_scaler,
            encoding: self.encoding,
            width: 0,
            flip_probability: self.flip_probability,
            flip_decay: self.flip_decay,
            max_grid_size: self.max_grid_size,
        };
        helper.width = helper
            .segments()?
            .last()
            .map_or(0, |s| s.offset + s.len);

        let n_features = helper.scaler.n_features();
        if n_features != helper.width {
            return Err(Error::UnsupportedScaler(format!(
                "scaler covers {n_features} features but the space has {}",
                helper.width
            )));
        }

        if let Some(decoded_scaler) = &helper.decoded_scaler {
            let Some(decoded) = helper.encoding.decode(&vec![0.0; helper.width]) else {
                return Err(Error::UnsupportedScaler(
                    "a decoded scaler was given but the encoding has no decoder".into(),
                ));
            };
            if decoded_scaler.n_features() != decoded.len() {
                return Err(Error::UnsupportedScaler(format!(
                    "decoded scaler covers {} features but decoded configurations have {}",
                    decoded_scaler.n_features(),
                    decoded.len()
                )));
            }
        }

        trace_info!(
            width = helper.width,
            categorical_groups = n_groups,
            "constraint helper ready"
        );
        Ok(helper)
    }
}
