//! Zone-level inputs and the validation performed before any balancing.

use nalgebra::{DMatrix, DVector};

use crate::error::{GravityError, Result};

/// Validated zonal totals and the pairwise cost matrix of one zone system.
///
/// Production and attraction are both optional because each single-sided
/// model needs only one of them.
#[derive(Clone, Debug)]
pub struct ZoneData {
    costs: DMatrix<f64>,
    production: Option<DVector<f64>>,
    attraction: Option<DVector<f64>>,
}

impl ZoneData {
    /// Starts a builder from a row-of-rows cost table, as collected by a prompt loop.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<ZoneDataBuilder> {
        let n = rows.len();
        if n == 0 {
            return Err(GravityError::EmptyZoneSet);
        }
        for row in rows {
            if row.len() != n {
                return Err(GravityError::dimension_mismatch(
                    "cost matrix row length",
                    n,
                    row.len(),
                ));
            }
        }
        let costs = DMatrix::from_fn(n, n, |i, j| rows[i][j]);
        Ok(ZoneDataBuilder::new(costs))
    }

    /// Number of zones.
    pub fn zone_count(&self) -> usize {
        self.costs.nrows()
    }

    /// Returns the pairwise cost matrix `d`, origins by row.
    pub fn costs(&self) -> &DMatrix<f64> {
        &self.costs
    }

    /// Returns the production vector `P`, if supplied.
    pub fn production(&self) -> Option<&DVector<f64>> {
        self.production.as_ref()
    }

    /// Returns the attraction vector `A`, if supplied.
    pub fn attraction(&self) -> Option<&DVector<f64>> {
        self.attraction.as_ref()
    }
}

/// Builder that checks shapes and signs before constructing [`ZoneData`].
#[derive(Debug)]
pub struct ZoneDataBuilder {
    costs: DMatrix<f64>,
    production: Option<DVector<f64>>,
    attraction: Option<DVector<f64>>,
}

impl ZoneDataBuilder {
    /// Start building zone data from an n×n cost matrix.
    pub fn new(costs: DMatrix<f64>) -> Self {
        Self {
            costs,
            production: None,
            attraction: None,
        }
    }

    /// Sets the production vector `P`.
    pub fn production(mut self, production: DVector<f64>) -> Self {
        self.production = Some(production);
        self
    }

    /// Sets the attraction vector `A`.
    pub fn attraction(mut self, attraction: DVector<f64>) -> Self {
        self.attraction = Some(attraction);
        self
    }

    /// Finalizes construction after validating shapes and values.
    pub fn build(self) -> Result<ZoneData> {
        let n = self.costs.nrows();
        if n == 0 {
            return Err(GravityError::EmptyZoneSet);
        }
        if self.costs.ncols() != n {
            return Err(GravityError::dimension_mismatch(
                "cost matrix columns",
                n,
                self.costs.ncols(),
            ));
        }
        check_costs(&self.costs)?;

        if let Some(production) = &self.production {
            if production.len() != n {
                return Err(GravityError::dimension_mismatch(
                    "production length",
                    n,
                    production.len(),
                ));
            }
            check_entries("production", production.iter())?;
        }

        if let Some(attraction) = &self.attraction {
            if attraction.len() != n {
                return Err(GravityError::dimension_mismatch(
                    "attraction length",
                    n,
                    attraction.len(),
                ));
            }
            check_entries("attraction", attraction.iter())?;
        }

        Ok(ZoneData {
            costs: self.costs,
            production: self.production,
            attraction: self.attraction,
        })
    }
}

/// Rejects NaN, infinite and negative costs, reporting the origin/destination pair.
fn check_costs(costs: &DMatrix<f64>) -> Result<()> {
    for (row, origin) in costs.row_iter().enumerate() {
        for (col, value) in origin.iter().enumerate() {
            if !value.is_finite() {
                return Err(GravityError::NonFiniteCost { row, col });
            }
            if *value < 0.0 {
                return Err(GravityError::NegativeCost {
                    row,
                    col,
                    value: *value,
                });
            }
        }
    }
    Ok(())
}

/// Rejects NaN, infinite and negative vector entries.
fn check_entries<'a>(context: &'static str, values: impl Iterator<Item = &'a f64>) -> Result<()> {
    for (index, value) in values.enumerate() {
        if !value.is_finite() {
            return Err(GravityError::NonFiniteValue { context, index });
        }
        if *value < 0.0 {
            return Err(GravityError::NegativeValue {
                context,
                index,
                value: *value,
            });
        }
    }
    Ok(())
}
