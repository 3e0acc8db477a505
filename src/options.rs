//! Balancing configuration passed explicitly into every solver call.

use serde::{Deserialize, Serialize};

use crate::error::{GravityError, Result};

/// Numeric knobs shared by the three gravity model variants.
///
/// Missing fields fall back to their defaults when deserialized, so a config
/// file only needs to name the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancingOptions {
    /// Distance-decay exponent applied to every cost in the interaction term.
    pub alpha: f64,
    /// Largest elementwise change in the balancing factors accepted as converged.
    pub tolerance: f64,
    /// Division guard: costs below it are suppressed, sums at or below it fall back to 1.
    pub epsilon: f64,
    /// Hard cap on doubly-constrained balancing iterations.
    pub max_iterations: usize,
}

impl Default for BalancingOptions {
    fn default() -> Self {
        Self {
            alpha: 2.0,
            tolerance: 1e-3,
            epsilon: 1e-6,
            max_iterations: 1_000,
        }
    }
}

impl BalancingOptions {
    /// Override the decay exponent while preserving other defaults.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Override the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Override the division-guard epsilon.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the maximum number of balancing iterations that should be attempted.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Checks that every option is usable by the solvers.
    ///
    /// Besides range checks, `epsilon^alpha` must be a normal number with a
    /// finite reciprocal; otherwise the power-distance term over- or underflows
    /// for costs near epsilon.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(GravityError::invalid_option("alpha", self.alpha));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(GravityError::invalid_option("tolerance", self.tolerance));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(GravityError::invalid_option("epsilon", self.epsilon));
        }
        let floor = self.epsilon.powf(self.alpha);
        if !(floor.is_normal() && floor.recip().is_normal()) {
            return Err(GravityError::invalid_option("epsilon", self.epsilon));
        }
        if self.max_iterations == 0 {
            return Err(GravityError::invalid_option("max_iterations", 0.0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_constants() {
        let options = BalancingOptions::default();
        assert_eq!(options.alpha, 2.0);
        assert_eq!(options.tolerance, 0.001);
        assert_eq!(options.epsilon, 1e-6);
        assert_eq!(options.max_iterations, 1000);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let options: BalancingOptions =
            serde_json::from_str(r#"{ "alpha": 1.5, "max_iterations": 50 }"#).unwrap();
        assert_eq!(options.alpha, 1.5);
        assert_eq!(options.max_iterations, 50);
        assert_eq!(options.tolerance, 0.001);
        assert_eq!(options.epsilon, 1e-6);
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let zero_epsilon = BalancingOptions::default().with_epsilon(0.0);
        assert!(matches!(
            zero_epsilon.validate(),
            Err(GravityError::InvalidOption {
                option: "epsilon",
                ..
            })
        ));

        let nan_alpha = BalancingOptions::default().with_alpha(f64::NAN);
        assert!(nan_alpha.validate().is_err());

        let mut no_iterations = BalancingOptions::default();
        no_iterations.max_iterations = 0;
        assert!(no_iterations.validate().is_err());

        assert_eq!(
            BalancingOptions::default()
                .with_max_iterations(0)
                .max_iterations,
            1
        );
    }

    #[test]
    fn validate_rejects_powers_that_leave_the_normal_range() {
        // 1e-6^70 underflows to zero.
        let steep = BalancingOptions::default().with_alpha(70.0);
        assert!(matches!(
            steep.validate(),
            Err(GravityError::InvalidOption {
                option: "epsilon",
                ..
            })
        ));

        // 1e-200^2 underflows as well.
        let tiny_epsilon = BalancingOptions::default().with_epsilon(1e-200);
        assert!(tiny_epsilon.validate().is_err());

        let huge_epsilon = BalancingOptions::default()
            .with_epsilon(10.0)
            .with_alpha(400.0);
        assert!(huge_epsilon.validate().is_err());

        assert!(BalancingOptions::default()
            .with_alpha(-1.0)
            .validate()
            .is_err());
        assert!(BalancingOptions::default().with_alpha(0.0).validate().is_ok());
        assert!(BalancingOptions::default().with_alpha(50.0).validate().is_ok());
    }
}
