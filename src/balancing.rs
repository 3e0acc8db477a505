//! The three balancing procedures: production-constrained, attraction-constrained
//! and doubly-constrained (iterative proportional fitting).

use log::{debug, trace, warn};
use nalgebra::{DMatrix, DVector};

use crate::error::{GravityError, Result};
use crate::kernel::{kernel, normalizer, CostGuard};
use crate::model::{ModelKind, TripDistribution};
use crate::options::BalancingOptions;
use crate::solving::BalancingSummary;

/// Distributes each origin's production across destinations so that every row
/// of the trip matrix sums to `production[i]`.
///
/// The production vector also serves as the destination size term.
pub fn production_constrained(
    production: &DVector<f64>,
    costs: &DMatrix<f64>,
    options: &BalancingOptions,
) -> Result<TripDistribution> {
    options.validate()?;
    let n = zone_count(costs)?;
    check_length("production length", production, n)?;
    debug!("production-constrained balancing over {n} zones");

    let (alpha, epsilon) = (options.alpha, options.epsilon);
    let weighted = DMatrix::from_fn(n, n, |i, j| {
        kernel(production[j], costs[(i, j)], alpha, epsilon, CostGuard::Suppress)
    });
    let row_factors = (0..n)
        .map(|i| balancing_factor(weighted.row(i).sum(), epsilon))
        .collect::<Result<Vec<_>>>()
        .map(DVector::from_vec)?;
    let trips = DMatrix::from_fn(n, n, |i, j| {
        row_factors[i] * production[i] * weighted[(i, j)]
    });

    Ok(TripDistribution {
        kind: ModelKind::ProductionConstrained,
        trips,
        row_factors: Some(row_factors),
        column_factors: None,
        summary: None,
    })
}

/// Distributes each destination's attraction across origins so that every
/// column of the trip matrix sums to `attraction[j]`.
///
/// The attraction vector also serves as the origin size term.
pub fn attraction_constrained(
    attraction: &DVector<f64>,
    costs: &DMatrix<f64>,
    options: &BalancingOptions,
) -> Result<TripDistribution> {
    options.validate()?;
    let n = zone_count(costs)?;
    check_length("attraction length", attraction, n)?;
    debug!("attraction-constrained balancing over {n} zones");

    let (alpha, epsilon) = (options.alpha, options.epsilon);
    let weighted = DMatrix::from_fn(n, n, |i, j| {
        kernel(attraction[i], costs[(i, j)], alpha, epsilon, CostGuard::Suppress)
    });
    let column_factors = (0..n)
        .map(|j| balancing_factor(weighted.column(j).sum(), epsilon))
        .collect::<Result<Vec<_>>>()
        .map(DVector::from_vec)?;
    let trips = DMatrix::from_fn(n, n, |i, j| {
        column_factors[j] * attraction[j] * weighted[(i, j)]
    });

    Ok(TripDistribution {
        kind: ModelKind::AttractionConstrained,
        trips,
        row_factors: None,
        column_factors: Some(column_factors),
        summary: None,
    })
}

/// Balances row factors `Ai` and column factors `Bj` until both marginals hold,
/// then assembles a trip matrix rounded up to whole trips.
///
/// Inside the iteration near-zero costs are floored to epsilon; the final
/// assembly suppresses those cells instead. Reaching `max_iterations` without
/// meeting the tolerance is not an error: the last factors are used and the
/// outcome is recorded in the returned [`BalancingSummary`].
pub fn doubly_constrained(
    production: &DVector<f64>,
    attraction: &DVector<f64>,
    costs: &DMatrix<f64>,
    options: &BalancingOptions,
) -> Result<TripDistribution> {
    options.validate()?;
    let n = zone_count(costs)?;
    check_length("production length", production, n)?;
    check_length("attraction length", attraction, n)?;

    let (alpha, epsilon) = (options.alpha, options.epsilon);
    let production = production.map(|p| p.max(epsilon));
    let attraction = attraction.map(|a| a.max(epsilon));
    debug!(
        "doubly-constrained balancing over {n} zones (total production {}, total attraction {})",
        production.sum(),
        attraction.sum()
    );

    let mut row_factors = DVector::from_element(n, 1.0);
    // Warm start: Bj ~ 1 / A[j].
    let mut column_factors = attraction.map(|a| 1.0 / (a + epsilon));

    let mut gap_history = Vec::new();
    let mut max_gap = f64::INFINITY;
    let mut converged = false;
    let mut iteration = 0usize;

    while iteration < options.max_iterations {
        let previous_rows = row_factors.clone();
        let previous_columns = column_factors.clone();

        for i in 0..n {
            let sum: f64 = (0..n)
                .map(|j| {
                    kernel(
                        column_factors[j] * attraction[j],
                        costs[(i, j)],
                        alpha,
                        epsilon,
                        CostGuard::Floor,
                    )
                })
                .sum();
            row_factors[i] = balancing_factor(sum, epsilon)?;
        }

        // Gauss-Seidel: uses the row factors computed above.
        for j in 0..n {
            let sum: f64 = (0..n)
                .map(|i| {
                    kernel(
                        row_factors[i] * production[i],
                        costs[(i, j)],
                        alpha,
                        epsilon,
                        CostGuard::Floor,
                    )
                })
                .sum();
            column_factors[j] = balancing_factor(sum, epsilon)?;
        }

        max_gap = (&row_factors - &previous_rows)
            .amax()
            .max((&column_factors - &previous_columns).amax());
        iteration += 1;
        gap_history.push(max_gap);
        trace!("balancing iteration {iteration}: max gap {max_gap:e}");

        if max_gap <= options.tolerance {
            converged = true;
            break;
        }
    }

    if converged {
        debug!("balancing converged after {iteration} iterations (max gap {max_gap:e})");
    } else {
        warn!(
            "balancing stopped at the {} iteration cap with max gap {max_gap:e}",
            options.max_iterations
        );
    }

    // Same grouping as the loop sums, so large masses meet small factors first.
    let trips = DMatrix::from_fn(n, n, |i, j| {
        let flow = row_factors[i]
            * production[i]
            * kernel(
                column_factors[j] * attraction[j],
                costs[(i, j)],
                alpha,
                epsilon,
                CostGuard::Suppress,
            );
        flow.ceil()
    });
    if !trips.iter().all(|t| t.is_finite()) {
        return Err(GravityError::NumericalError {
            context: "trip assembly",
        });
    }

    Ok(TripDistribution {
        kind: ModelKind::DoublyConstrained,
        trips,
        row_factors: Some(row_factors),
        column_factors: Some(column_factors),
        summary: Some(BalancingSummary {
            iterations: iteration,
            max_gap,
            converged,
            gap_history,
        }),
    })
}

/// Turns a balancing sum into a factor, refusing sums that overflowed.
fn balancing_factor(sum: f64, epsilon: f64) -> Result<f64> {
    if !sum.is_finite() {
        return Err(GravityError::NumericalError {
            context: "balancing sum",
        });
    }
    Ok(normalizer(sum, epsilon))
}

fn zone_count(costs: &DMatrix<f64>) -> Result<usize> {
    let n = costs.nrows();
    if n == 0 {
        return Err(GravityError::EmptyZoneSet);
    }
    if costs.ncols() != n {
        return Err(GravityError::dimension_mismatch(
            "cost matrix columns",
            n,
            costs.ncols(),
        ));
    }
    Ok(n)
}

fn check_length(context: &'static str, values: &DVector<f64>, n: usize) -> Result<()> {
    if values.len() != n {
        return Err(GravityError::dimension_mismatch(context, n, values.len()));
    }
    Ok(())
}
