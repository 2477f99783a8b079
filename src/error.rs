#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the parameter catalog and the encoding disagree about
    /// where a categorical block starts.
    #[error(
        "invariant violation: categorical {cat_index} expected at offset {expected}, catalog places it at {got}"
    )]
    InvariantViolation {
        /// Index of the categorical group within the encoding.
        cat_index: usize,
        /// The start offset recorded by the encoding.
        expected: usize,
        /// The running offset reached by walking the catalog.
        got: usize,
    },

    /// Returned when a grid or combination operation is requested on a
    /// space without categorical or boolean parameters.
    #[error("the parameter space has no categorical parameters")]
    NoCategoricalParameters,

    /// Returned when a categorical block is not a legal one-hot block.
    #[error("categorical {group}: block is not one-hot: {values:?}")]
    IllegalCategoricalState {
        /// Index of the offending categorical group.
        group: usize,
        /// The block's current values in raw space.
        values: Vec<f64>,
    },

    /// Returned when the combination grid and numeric assignment do not add
    /// up to the full vector width.
    #[error("shape mismatch: expected {expected} columns, got {got}")]
    ShapeMismatch {
        /// The full vector width.
        expected: usize,
        /// Combination grid columns plus numeric assignment length.
        got: usize,
    },

    /// Returned at construction when the scaler cannot serve this space.
    #[error("unsupported scaler: {0}")]
    UnsupportedScaler(String),

    /// Returned when a sample has the wrong number of dimensions.
    #[error("dimension mismatch: expected {expected} dimensions, got {got}")]
    DimensionMismatch {
        /// The expected number of dimensions.
        expected: usize,
        /// The actual number of dimensions.
        got: usize,
    },

    /// Returned when the encoding's block layout is malformed.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Returned when a configured probability is outside `[0, 1]`.
    #[error("invalid probability: {0} must be in [0.0, 1.0]")]
    InvalidProbability(f64),

    /// Returned when a merged grid would contain a non-finite cell.
    #[error("non-finite value at row {row}, column {column}")]
    NonFiniteValue {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        column: usize,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
