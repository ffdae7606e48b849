//! Particle swarm optimization over a bounded continuous space.

use crate::error::{ForecastError, Result};
use crate::swarm::particle::{Particle, VelocityCoefficients};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Configuration for a swarm run.
#[derive(Debug, Clone)]
pub struct SwarmConfig {
    /// Number of particles.
    pub n_particles: usize,
    /// Fixed iteration budget; there is no early stopping.
    pub iterations: usize,
    /// Velocity-update coefficients.
    pub coefficients: VelocityCoefficients,
    /// Random seed for reproducibility (None for random).
    pub seed: Option<u64>,
}

impl SwarmConfig {
    /// Create a config with the given swarm size and iteration budget.
    pub fn new(n_particles: usize, iterations: usize) -> Self {
        Self {
            n_particles,
            iterations,
            coefficients: VelocityCoefficients::default(),
            seed: None,
        }
    }

    /// Set the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self::new(5, 10)
    }
}

/// Outcome of a swarm run.
#[derive(Debug, Clone)]
pub struct SwarmResult {
    /// Best position found, still continuous-valued; callers decode it
    /// (here: truncate to integers).
    pub best_position: Vec<f64>,
    /// Fitness at the best position.
    pub best_score: f64,
    /// Global best score at the end of each iteration. Non-increasing.
    pub history: Vec<f64>,
}

/// Swarm optimizer minimizing a black-box fitness function.
#[derive(Debug, Clone, Default)]
pub struct SwarmOptimizer {
    config: SwarmConfig,
}

impl SwarmOptimizer {
    pub fn new(config: SwarmConfig) -> Self {
        Self { config }
    }

    /// Minimize `fitness` over the box `bounds`.
    ///
    /// Each iteration evaluates every particle, updates personal and
    /// global bests on strict improvement (ties keep the earlier
    /// holder), and only then — after all evaluations have finished —
    /// moves every particle using the iteration's global best. That
    /// barrier ordering is a correctness requirement, not a tuning
    /// choice.
    ///
    /// The fitness function is expected to absorb its own failures by
    /// returning `f64::INFINITY` for a candidate it cannot score; a
    /// non-finite score never becomes a best. If no candidate ever
    /// produces a finite score the search fails with
    /// [`ForecastError::SearchFailed`].
    pub fn optimize<F>(&self, bounds: &[(f64, f64)], mut fitness: F) -> Result<SwarmResult>
    where
        F: FnMut(&[f64]) -> f64,
    {
        if bounds.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        for &(low, high) in bounds {
            if !(low < high) {
                return Err(ForecastError::InvalidParameter(format!(
                    "bound [{low}, {high}] is not a proper interval"
                )));
            }
        }
        if self.config.n_particles == 0 || self.config.iterations == 0 {
            return Err(ForecastError::InvalidParameter(
                "swarm size and iteration budget must be positive".to_string(),
            ));
        }

        let mut rng: StdRng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut particles: Vec<Particle> = (0..self.config.n_particles)
            .map(|_| Particle::new(bounds, &mut rng))
            .collect();

        let mut global_best_position: Option<Vec<f64>> = None;
        let mut global_best_score = f64::INFINITY;
        let mut history = Vec::with_capacity(self.config.iterations);

        for _ in 0..self.config.iterations {
            for particle in &mut particles {
                let score = fitness(&particle.position);
                particle.observe(score);
                if score < global_best_score {
                    global_best_score = score;
                    global_best_position = Some(particle.position.clone());
                }
            }
            history.push(global_best_score);

            // Until some candidate scores, there is no attractor to move
            // towards; the swarm re-samples its current positions.
            if let Some(global_best) = &global_best_position {
                for particle in &mut particles {
                    particle.update_velocity(global_best, self.config.coefficients, &mut rng);
                    particle.update_position(bounds);
                }
            }
        }

        let best_position = global_best_position.ok_or_else(|| {
            ForecastError::SearchFailed(format!(
                "no candidate produced a finite fitness in {} iterations",
                self.config.iterations
            ))
        })?;

        Ok(SwarmResult {
            best_position,
            best_score: global_best_score,
            history,
        })
    }
}
