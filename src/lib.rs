//! Gravity-model trip distribution for origin-destination (OD) matrices.
//!
//! Given zonal totals and a pairwise cost matrix, this crate estimates the
//! number of trips between every pair of zones. Trips decay with a power of
//! cost, `weight / cost^alpha`, and balancing factors scale the result so that
//! conservation constraints hold:
//!
//! - production-constrained: row sums equal the production vector,
//! - attraction-constrained: column sums equal the attraction vector,
//! - doubly-constrained: both, found by iterative proportional fitting.
//!
//! Modules:
//!
//! - `data` validates zone inputs,
//! - `options` holds the numeric configuration,
//! - `kernel` evaluates the shared power-distance term,
//! - `balancing` implements the three solvers,
//! - `model` ties them together behind [`GravityProblem`].
//!
//! # Quick start
//!
//! ```
//! use gravity_od::data::ZoneData;
//! use gravity_od::{BalancingOptions, GravityProblem, ModelKind};
//! use nalgebra::DVector;
//!
//! let data = ZoneData::from_rows(&[vec![1.0, 2.0], vec![2.0, 1.0]])
//!     .expect("square cost table")
//!     .production(DVector::from_vec(vec![100.0, 100.0]))
//!     .attraction(DVector::from_vec(vec![100.0, 100.0]))
//!     .build()
//!     .expect("validated zone data");
//!
//! let problem = GravityProblem::new(data);
//! let kind: ModelKind = "3".parse().expect("menu code");
//! let result = problem
//!     .solve(kind, &BalancingOptions::default())
//!     .expect("balanced");
//! assert_eq!(result.trips[(0, 1)], result.trips[(1, 0)]);
//! ```
//!
//! Solvers never fail on validated input. Degenerate sums fall back to a
//! factor of one, near-zero costs carry no trips, and the doubly-constrained
//! loop accepts its last iterate when the iteration cap is reached.

pub mod balancing;
pub mod data;
pub mod error;
pub mod kernel;
pub mod model;
pub mod options;
pub mod solving;
pub mod synthetic;

pub use error::{GravityError, Result};
pub use model::{GravityProblem, ModelKind, TripDistribution};
pub use options::BalancingOptions;
pub use solving::BalancingSummary;
