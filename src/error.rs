use thiserror::Error;

/// Unified error type for `gravity_od` operations.
///
/// The solvers themselves never fail on well-formed input: degenerate sums,
/// zero-cost pairs and non-convergence are all recovered locally. These
/// variants are raised at the input boundary, before any balancing happens.
#[derive(Debug, Error)]
pub enum GravityError {
    /// Raised when provided vectors or matrices have incompatible dimensions.
    #[error("dimension mismatch in {context}: expected {expected} but found {found}")]
    DimensionMismatch {
        /// Human-readable context describing the operation.
        context: &'static str,
        /// The required dimension, usually the zone count.
        expected: usize,
        /// The dimension that was actually supplied.
        found: usize,
    },

    /// Raised when a zone system has no zones at all.
    #[error("at least one zone is required")]
    EmptyZoneSet,

    /// Raised when a production, attraction or cost entry is negative.
    #[error("{context} at index {index} must be non-negative, found {value}")]
    NegativeValue {
        context: &'static str,
        index: usize,
        value: f64,
    },

    /// Raised when an input entry is NaN or infinite.
    #[error("{context} at index {index} is not finite")]
    NonFiniteValue { context: &'static str, index: usize },

    /// Raised when the cost from origin `row` to destination `col` is negative.
    #[error("cost from zone {row} to zone {col} must be non-negative, found {value}")]
    NegativeCost { row: usize, col: usize, value: f64 },

    /// Raised when the cost from origin `row` to destination `col` is NaN or infinite.
    #[error("cost from zone {row} to zone {col} is not finite")]
    NonFiniteCost { row: usize, col: usize },

    /// Raised when a balancing sum or trip cell overflows.
    #[error("encountered a non-finite value during {context}")]
    NumericalError { context: &'static str },

    /// Raised when a required vector has not been provided for the requested model.
    #[error("{component} must be provided before solving the model")]
    MissingComponent { component: &'static str },

    /// Raised when a model selector does not name one of the three variants.
    #[error("unknown model selector `{selector}`; expected 1, 2, 3 or a model name")]
    InvalidSelector { selector: String },

    /// Raised when a balancing option is outside its admissible range.
    #[error("balancing option `{option}` has invalid value {value}")]
    InvalidOption { option: &'static str, value: f64 },
}

impl GravityError {
    /// Helper to format a [`DimensionMismatch`](GravityError::DimensionMismatch) error.
    pub fn dimension_mismatch(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }

    /// Helper for bubbling up missing component errors from builders.
    pub fn missing_component(component: &'static str) -> Self {
        Self::MissingComponent { component }
    }

    /// Helper to reject an out-of-range balancing option.
    pub fn invalid_option(option: &'static str, value: f64) -> Self {
        Self::InvalidOption { option, value }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, GravityError>;
