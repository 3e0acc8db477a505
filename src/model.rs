//! High-level entry point: pick a model variant and solve it over validated zone data.

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::balancing::{attraction_constrained, doubly_constrained, production_constrained};
use crate::data::ZoneData;
use crate::error::{GravityError, Result};
use crate::options::BalancingOptions;
use crate::solving::BalancingSummary;

/// Which conservation constraints the trip matrix must satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Row sums equal production.
    ProductionConstrained,
    /// Column sums equal attraction.
    AttractionConstrained,
    /// Row sums equal production and column sums equal attraction.
    DoublyConstrained,
}

impl ModelKind {
    /// All variants, in menu order.
    pub const ALL: [ModelKind; 3] = [
        ModelKind::ProductionConstrained,
        ModelKind::AttractionConstrained,
        ModelKind::DoublyConstrained,
    ];

    /// Numeric menu code (`1`, `2` or `3`) of the variant.
    pub fn code(self) -> u8 {
        match self {
            ModelKind::ProductionConstrained => 1,
            ModelKind::AttractionConstrained => 2,
            ModelKind::DoublyConstrained => 3,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::ProductionConstrained => "production constrained",
            ModelKind::AttractionConstrained => "attraction constrained",
            ModelKind::DoublyConstrained => "doubly constrained",
        };
        f.write_str(name)
    }
}

impl FromStr for ModelKind {
    type Err = GravityError;

    /// Accepts the menu codes `1`–`3` or a model name such as `doubly`.
    fn from_str(selector: &str) -> Result<Self> {
        let normalized = selector.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "1" | "production" | "production constrained" => Ok(ModelKind::ProductionConstrained),
            "2" | "attraction" | "attraction constrained" => Ok(ModelKind::AttractionConstrained),
            "3" | "doubly" | "doubly constrained" => Ok(ModelKind::DoublyConstrained),
            _ => Err(GravityError::InvalidSelector {
                selector: selector.to_string(),
            }),
        }
    }
}

/// A zone system ready to be balanced under any of the three variants.
#[derive(Clone, Debug)]
pub struct GravityProblem {
    data: ZoneData,
}

impl GravityProblem {
    /// Wraps validated zone data.
    pub fn new(data: ZoneData) -> Self {
        Self { data }
    }

    /// Accessor for the zone data.
    pub fn data(&self) -> &ZoneData {
        &self.data
    }

    /// Computes the trip matrix for the chosen variant.
    pub fn solve(&self, kind: ModelKind, options: &BalancingOptions) -> Result<TripDistribution> {
        let costs = self.data.costs();
        match kind {
            ModelKind::ProductionConstrained => {
                production_constrained(self.production()?, costs, options)
            }
            ModelKind::AttractionConstrained => {
                attraction_constrained(self.attraction()?, costs, options)
            }
            ModelKind::DoublyConstrained => {
                doubly_constrained(self.production()?, self.attraction()?, costs, options)
            }
        }
    }

    fn production(&self) -> Result<&DVector<f64>> {
        self.data
            .production()
            .ok_or_else(|| GravityError::missing_component("production vector"))
    }

    fn attraction(&self) -> Result<&DVector<f64>> {
        self.data
            .attraction()
            .ok_or_else(|| GravityError::missing_component("attraction vector"))
    }
}

/// Describes the result of one balancing run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TripDistribution {
    /// Variant that produced the matrix.
    pub kind: ModelKind,
    /// Estimated trips, origins by row and destinations by column.
    pub trips: DMatrix<f64>,
    /// Per-origin balancing factors `Ai`, when the variant computes them.
    pub row_factors: Option<DVector<f64>>,
    /// Per-destination balancing factors `Bj`, when the variant computes them.
    pub column_factors: Option<DVector<f64>>,
    /// Iteration diagnostics of the doubly-constrained variant.
    pub summary: Option<BalancingSummary>,
}

impl TripDistribution {
    /// Number of zones.
    pub fn zone_count(&self) -> usize {
        self.trips.nrows()
    }

    /// Total trips leaving each origin.
    pub fn row_sums(&self) -> DVector<f64> {
        DVector::from_fn(self.zone_count(), |i, _| self.trips.row(i).sum())
    }

    /// Total trips arriving at each destination.
    pub fn column_sums(&self) -> DVector<f64> {
        DVector::from_fn(self.zone_count(), |j, _| self.trips.column(j).sum())
    }

    /// Sum of every cell.
    pub fn total(&self) -> f64 {
        self.trips.sum()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::data::ZoneDataBuilder;

    fn problem() -> GravityProblem {
        let data = ZoneData::from_rows(&[vec![1.0, 2.0], vec![2.0, 1.0]])
            .unwrap()
            .production(DVector::from_vec(vec![100.0, 100.0]))
            .attraction(DVector::from_vec(vec![100.0, 100.0]))
            .build()
            .unwrap();
        GravityProblem::new(data)
    }

    #[test]
    fn parses_menu_codes_and_names() {
        assert_eq!(
            "1".parse::<ModelKind>().unwrap(),
            ModelKind::ProductionConstrained
        );
        assert_eq!(
            " 2 ".parse::<ModelKind>().unwrap(),
            ModelKind::AttractionConstrained
        );
        assert_eq!(
            "Doubly-Constrained".parse::<ModelKind>().unwrap(),
            ModelKind::DoublyConstrained
        );
        for kind in ModelKind::ALL {
            assert_eq!(kind.code().to_string().parse::<ModelKind>().unwrap(), kind);
        }
        assert!(matches!(
            "4".parse::<ModelKind>(),
            Err(GravityError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn solve_dispatches_every_variant() {
        let problem = problem();
        let options = BalancingOptions::default();
        for kind in ModelKind::ALL {
            let result = problem.solve(kind, &options).unwrap();
            assert_eq!(result.kind, kind);
            assert_eq!(result.zone_count(), 2);
            assert_eq!(result.summary.is_some(), kind == ModelKind::DoublyConstrained);
        }

        let production = problem
            .solve(ModelKind::ProductionConstrained, &options)
            .unwrap();
        assert_relative_eq!(production.total(), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn solve_reports_missing_vectors() {
        let costs = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let data = ZoneDataBuilder::new(costs)
            .production(DVector::from_vec(vec![5.0, 5.0]))
            .build()
            .unwrap();
        let problem = GravityProblem::new(data);
        let options = BalancingOptions::default();

        assert!(problem.solve(ModelKind::ProductionConstrained, &options).is_ok());
        assert!(matches!(
            problem.solve(ModelKind::AttractionConstrained, &options),
            Err(GravityError::MissingComponent {
                component: "attraction vector"
            })
        ));
        assert!(problem.solve(ModelKind::DoublyConstrained, &options).is_err());
    }

    #[test]
    fn distribution_serializes_to_json() {
        let result = problem()
            .solve(ModelKind::AttractionConstrained, &BalancingOptions::default())
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "attraction_constrained");
        assert!(json["row_factors"].is_null());
    }
}
