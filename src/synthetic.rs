//! Seeded random zone systems for tests and benchmarks.

use nalgebra::{DMatrix, DVector};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, LogNormal, Uniform};

use crate::data::{ZoneData, ZoneDataBuilder};
use crate::error::{GravityError, Result};

/// Generates zones scattered uniformly over a square, with Euclidean costs and
/// log-normal productions and attractions whose totals agree.
#[derive(Clone, Debug)]
pub struct ZoneSystemGenerator {
    zones: usize,
    extent: f64,
    mass_mu: f64,
    mass_sigma: f64,
    seed: u64,
}

impl ZoneSystemGenerator {
    /// A generator for `zones` zones reproducible from `seed`.
    pub fn new(zones: usize, seed: u64) -> Self {
        Self {
            zones,
            extent: 100.0,
            mass_mu: 5.0,
            mass_sigma: 0.5,
            seed,
        }
    }

    /// Side length of the square the zone centroids are drawn from.
    pub fn extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    /// Parameters of the log-normal distribution of zone masses.
    pub fn mass_distribution(mut self, mu: f64, sigma: f64) -> Self {
        self.mass_mu = mu;
        self.mass_sigma = sigma;
        self
    }

    /// Draws a zone system with both production and attraction set.
    ///
    /// Intrazonal costs are zero, so every diagonal cell is suppressed.
    pub fn generate(&self) -> Result<ZoneData> {
        if self.zones == 0 {
            return Err(GravityError::EmptyZoneSet);
        }
        if !(self.extent.is_finite() && self.extent > 0.0) {
            return Err(GravityError::invalid_option("extent", self.extent));
        }
        let masses = LogNormal::new(self.mass_mu, self.mass_sigma)
            .map_err(|_| GravityError::invalid_option("mass_sigma", self.mass_sigma))?;
        let coordinate = Uniform::new(0.0, self.extent);
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let points: Vec<(f64, f64)> = (0..self.zones)
            .map(|_| (coordinate.sample(&mut rng), coordinate.sample(&mut rng)))
            .collect();
        let costs = DMatrix::from_fn(self.zones, self.zones, |i, j| {
            let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
            dx.hypot(dy)
        });

        let production = DVector::from_fn(self.zones, |_, _| masses.sample(&mut rng));
        let mut attraction = DVector::from_fn(self.zones, |_, _| masses.sample(&mut rng));
        attraction *= production.sum() / attraction.sum();

        ZoneDataBuilder::new(costs)
            .production(production)
            .attraction(attraction)
            .build()
    }
}
