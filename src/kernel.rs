//! The weighted power-distance term shared by every gravity model variant.

/// How a cost below the division guard is treated by [`kernel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CostGuard {
    /// Near-zero cost contributes nothing (the cell carries zero trips).
    Suppress,
    /// Near-zero cost is raised to epsilon before the power is taken.
    Floor,
}

/// Evaluates `weight / cost^alpha` under the given guard.
///
/// A power that underflows to zero or a subnormal is floored at the smallest
/// normal `f64`, so the result is never NaN for finite, non-negative inputs.
pub fn kernel(weight: f64, cost: f64, alpha: f64, epsilon: f64, guard: CostGuard) -> f64 {
    let cost = match guard {
        CostGuard::Suppress if cost < epsilon => return 0.0,
        CostGuard::Suppress => cost,
        CostGuard::Floor => cost.max(epsilon),
    };
    weight / cost.powf(alpha).max(f64::MIN_POSITIVE)
}

/// Reciprocal of a balancing sum, or `1.0` when the sum is at or below epsilon.
pub fn normalizer(sum: f64, epsilon: f64) -> f64 {
    if sum > epsilon {
        1.0 / sum
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn suppress_zeroes_near_zero_costs() {
        assert_eq!(kernel(10.0, 0.0, 2.0, 1e-6, CostGuard::Suppress), 0.0);
        assert_eq!(kernel(10.0, 5e-7, 2.0, 1e-6, CostGuard::Suppress), 0.0);
        assert_relative_eq!(kernel(10.0, 2.0, 2.0, 1e-6, CostGuard::Suppress), 2.5);
    }

    #[test]
    fn floor_keeps_near_zero_costs_finite() {
        let value = kernel(1.0, 0.0, 2.0, 1e-3, CostGuard::Floor);
        assert!(value.is_finite());
        assert_relative_eq!(value, 1e6, max_relative = 1e-12);
        assert_relative_eq!(kernel(3.0, 3.0, 1.0, 1e-6, CostGuard::Floor), 1.0);
    }

    #[test]
    fn underflowing_power_stays_finite() {
        // 1e-5^70 underflows to zero.
        let value = kernel(1.0, 1e-5, 70.0, 1e-6, CostGuard::Suppress);
        assert!(value.is_finite() && value > 0.0);
        assert_relative_eq!(value, 1.0 / f64::MIN_POSITIVE);

        let floored = kernel(1.0, 0.0, 2.0, 1e-200, CostGuard::Floor);
        assert!(floored.is_finite());
        assert_eq!(kernel(0.0, 1e-5, 70.0, 1e-6, CostGuard::Floor), 0.0);
    }

    #[test]
    fn normalizer_falls_back_on_degenerate_sums() {
        assert_eq!(normalizer(0.0, 1e-6), 1.0);
        assert_eq!(normalizer(1e-6, 1e-6), 1.0);
        assert_relative_eq!(normalizer(4.0, 1e-6), 0.25);
    }
}
