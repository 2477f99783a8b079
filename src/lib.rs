#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Constraint projection and discrete search for continuous-relaxation
//! optimizers that tune mixed numeric, boolean and categorical knobs.
//!
//! The optimizer works in a relaxed space where every categorical parameter
//! is a block of independent dimensions, one per category. Its raw output is
//! rarely a legal configuration. This crate repairs such vectors, perturbs
//! valid ones for exploration, and enumerates or samples the categorical
//! subspace to build full candidate configurations.
//!
//! # Getting Started
//!
//! ```
//! use tunespace::prelude::*;
//!
//! let params = vec![
//!     Param::float().name("buffer_mb"),
//!     Param::int().name("workers"),
//!     Param::categorical().name("sync_method"),
//! ];
//! let encoding = OneHotEncoding::new(&params, vec![3]).unwrap();
//! let helper = ConstraintHelper::new(params, IdentityScaler::new(5), encoding).unwrap();
//!
//! // Raw optimizer output: fractional integer, no hot category
//! let proposal = [128.4, 3.7, 0.2, 0.6, 0.5];
//! let config = helper
//!     .valid_config(&proposal, SampleSpace::Raw, SampleSpace::Raw)
//!     .unwrap();
//! assert_eq!(config, vec![128.4, 4.0, 0.0, 1.0, 0.0]);
//!
//! // Explore a neighbouring category assignment
//! let mut rng = fastrand::Rng::with_seed(7);
//! let moved = helper
//!     .randomize_categorical(&config, SampleSpace::Raw, SampleSpace::Raw, &mut rng)
//!     .unwrap();
//! assert_ne!(moved[2..], config[2..]);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`ConstraintHelper`] | Repair, perturb and grid-search sample vectors. |
//! | [`Param`](parameter::Param) | One entry of the parameter catalog: float, int, bool or categorical. |
//! | [`Scaler`](scaling::Scaler) | Reversible normalization between raw and scaled units. |
//! | [`Encoding`](encoding::Encoding) | Where each categorical one-hot block lives in the vector. |
//! | [`SampleSpace`] | Whether a vector is in raw or scaled units. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on parameters, scalers and encodings | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod encoding;
mod error;
mod helper;
pub mod parameter;
mod rng_util;
pub mod scaling;
mod types;

pub use error::{Error, Result};
pub use helper::{ConstraintHelper, ConstraintHelperBuilder};
pub use types::SampleSpace;

/// Convenient wildcard import for the most common types.
///
/// ```
/// use tunespace::prelude::*;
/// ```
pub mod prelude {
    pub use crate::encoding::{Encoding, OneHotEncoding};
    pub use crate::error::{Error, Result};
    pub use crate::helper::{ConstraintHelper, ConstraintHelperBuilder};
    pub use crate::parameter::{Param, ParamKind};
    pub use crate::scaling::{IdentityScaler, Scaler, StandardScaler};
    pub use crate::types::SampleSpace;
}
