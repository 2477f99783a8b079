//! Parameter catalog entries.
//!
//! A [`Param`] describes one tunable knob: whether it is a plain float, an
//! integer, a boolean flag, or a multi-valued categorical. The catalog is an
//! ordered slice of `Param`s, and its order fixes the layout of every sample
//! vector the helper handles.
//!
//! # Example
//!
//! ```
//! use tunespace::parameter::Param;
//!
//! let catalog = vec![
//!     Param::float().name("shared_buffers"),
//!     Param::int().name("max_workers"),
//!     Param::boolean().name("enable_seqscan"),
//!     Param::categorical().name("wal_sync_method"),
//! ];
//!
//! assert!(catalog[1].is_integer());
//! assert!(catalog[2].is_categorical() && catalog[2].is_boolean());
//! assert!(catalog[3].is_categorical() && !catalog[3].is_boolean());
//! ```

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of a tunable parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamKind {
    /// A real-valued parameter occupying one dimension.
    Float,
    /// An integer parameter occupying one dimension; repaired by rounding.
    Int,
    /// A two-valued flag occupying a single 0/1 dimension.
    Bool,
    /// A multi-valued categorical occupying a one-hot block. Its cardinality
    /// is reported by the [`Encoding`](crate::encoding::Encoding).
    Categorical,
}

/// Metadata for one tunable parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    name: Option<String>,
    kind: ParamKind,
}

impl Param {
    /// Creates a parameter of the given kind.
    #[must_use]
    pub fn new(kind: ParamKind) -> Self {
        Self { name: None, kind }
    }

    /// Creates a real-valued parameter.
    #[must_use]
    pub fn float() -> Self {
        Self::new(ParamKind::Float)
    }

    /// Creates an integer parameter.
    #[must_use]
    pub fn int() -> Self {
        Self::new(ParamKind::Int)
    }

    /// Creates a boolean parameter.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(ParamKind::Bool)
    }

    /// Creates a multi-valued categorical parameter.
    #[must_use]
    pub fn categorical() -> Self {
        Self::new(ParamKind::Categorical)
    }

    /// Sets a display name for this parameter.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the parameter's name, if one was set.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the parameter kind.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Whether the parameter takes whole-number values.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.kind == ParamKind::Int
    }

    /// Whether the parameter is categorical. Booleans count as categorical.
    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, ParamKind::Bool | ParamKind::Categorical)
    }

    /// Whether the parameter is a boolean flag.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.kind == ParamKind::Bool
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} ({:?})", self.kind),
            None => write!(f, "{:?}", self.kind),
        }
    }
}
