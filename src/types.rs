//! Core types shared across the helper's operations.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The units a sample vector is expressed in.
///
/// Operations accept an input space and an output space. A [`Scaled`](Self::Scaled)
/// input is inverse-transformed through the scaler before it is repaired, and a
/// [`Scaled`](Self::Scaled) output is transformed back afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SampleSpace {
    /// Natural units of the tuned system.
    Raw,
    /// Normalized units produced by the scaler.
    #[default]
    Scaled,
}
