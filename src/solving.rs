//! Diagnostics for the doubly-constrained fixed-point iteration.

use serde::{Deserialize, Serialize};

/// Diagnostics returned alongside a doubly-constrained trip matrix.
///
/// Hitting the iteration cap is not an error; `converged` records whether the
/// tolerance was met before the cap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalancingSummary {
    /// Number of balancing iterations performed.
    pub iterations: usize,
    /// Maximum absolute change in `Ai` or `Bj` observed in the final iteration.
    pub max_gap: f64,
    /// Whether `max_gap` fell within the tolerance before the cap.
    pub converged: bool,
    /// `max_gap` of every iteration, in order.
    pub gap_history: Vec<f64>,
}
