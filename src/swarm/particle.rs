//! A single candidate solution in hyperparameter space.

use rand::rngs::StdRng;
use rand::Rng;

/// Velocity-update coefficients for the swarm.
#[derive(Debug, Clone, Copy)]
pub struct VelocityCoefficients {
    /// Weight on the previous velocity.
    pub inertia: f64,
    /// Pull towards the particle's own best position.
    pub cognitive: f64,
    /// Pull towards the swarm's best position.
    pub social: f64,
}

impl Default for VelocityCoefficients {
    fn default() -> Self {
        Self {
            inertia: 0.5,
            cognitive: 1.5,
            social: 1.5,
        }
    }
}

/// A particle: current position, velocity, and personal-best memory.
///
/// Mutated every iteration by the optimizer; reads the swarm's global
/// best but otherwise shares nothing with other particles.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Current position, one coordinate per search dimension.
    pub position: Vec<f64>,
    /// Current velocity, same dimensionality as the position.
    pub velocity: Vec<f64>,
    /// Best position this particle has visited.
    pub best_position: Vec<f64>,
    /// Fitness at the best position. Starts at infinity so the first
    /// evaluation always becomes the personal best.
    pub best_score: f64,
}

impl Particle {
    /// Initialize a particle uniformly within `bounds`, with velocity
    /// drawn uniformly from [-1, 1] per dimension.
    pub fn new(bounds: &[(f64, f64)], rng: &mut StdRng) -> Self {
        let position: Vec<f64> = bounds
            .iter()
            .map(|&(low, high)| rng.gen_range(low..=high))
            .collect();
        let velocity = bounds.iter().map(|_| rng.gen_range(-1.0..=1.0)).collect();
        Self {
            best_position: position.clone(),
            position,
            velocity,
            best_score: f64::INFINITY,
        }
    }

    /// Record a fitness evaluation, updating the personal best on strict
    /// improvement.
    pub fn observe(&mut self, score: f64) {
        if score < self.best_score {
            self.best_score = score;
            self.best_position = self.position.clone();
        }
    }

    /// Standard velocity update with two fresh uniform[0,1) draws per
    /// dimension. Velocities are not clamped.
    pub fn update_velocity(
        &mut self,
        global_best: &[f64],
        coefficients: VelocityCoefficients,
        rng: &mut StdRng,
    ) {
        for i in 0..self.velocity.len() {
            let r1: f64 = rng.gen();
            let r2: f64 = rng.gen();
            let cognitive =
                coefficients.cognitive * r1 * (self.best_position[i] - self.position[i]);
            let social = coefficients.social * r2 * (global_best[i] - self.position[i]);
            self.velocity[i] = coefficients.inertia * self.velocity[i] + cognitive + social;
        }
    }

    /// Move by the current velocity, then clamp each coordinate into its
    /// bound. The velocity is left as-is even when the position
    /// saturates, matching basic PSO; swarms can stagnate at a boundary
    /// because of this.
    pub fn update_position(&mut self, bounds: &[(f64, f64)]) {
        for i in 0..self.position.len() {
            self.position[i] += self.velocity[i];
            self.position[i] = self.position[i].clamp(bounds[i].0, bounds[i].1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const BOUNDS: [(f64, f64); 2] = [(20.0, 100.0), (5.0, 30.0)];

    #[test]
    fn initializes_within_bounds() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            let particle = Particle::new(&BOUNDS, &mut rng);
            for (x, (low, high)) in particle.position.iter().zip(&BOUNDS) {
                assert!(x >= low && x <= high);
            }
            for v in &particle.velocity {
                assert!((-1.0..=1.0).contains(v));
            }
            assert_eq!(particle.best_position, particle.position);
            assert_eq!(particle.best_score, f64::INFINITY);
        }
    }

    #[test]
    fn first_observation_becomes_personal_best() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut particle = Particle::new(&BOUNDS, &mut rng);
        particle.observe(123.0);
        assert_eq!(particle.best_score, 123.0);

        // Worse score leaves the best untouched.
        let best = particle.best_position.clone();
        particle.position[0] = 50.0;
        particle.observe(456.0);
        assert_eq!(particle.best_score, 123.0);
        assert_eq!(particle.best_position, best);
    }

    #[test]
    fn infinite_score_never_becomes_best_twice() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut particle = Particle::new(&BOUNDS, &mut rng);
        particle.observe(f64::INFINITY);
        // +inf does not strictly improve on the initial +inf.
        assert_eq!(particle.best_score, f64::INFINITY);
        assert_eq!(particle.best_position, particle.position);
    }

    #[test]
    fn position_clamps_under_adversarial_velocity() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut particle = Particle::new(&BOUNDS, &mut rng);
        particle.velocity = vec![1e12, -1e12];

        for _ in 0..5 {
            particle.update_position(&BOUNDS);
            for (x, (low, high)) in particle.position.iter().zip(&BOUNDS) {
                assert!(x >= low && x <= high);
            }
        }
        // Velocity is untouched by clamping.
        assert_eq!(particle.velocity, vec![1e12, -1e12]);
    }

    #[test]
    fn velocity_update_is_deterministic_for_a_seed() {
        let make = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut p = Particle::new(&BOUNDS, &mut rng);
            p.update_velocity(&[60.0, 12.0], VelocityCoefficients::default(), &mut rng);
            p.velocity.clone()
        };
        assert_eq!(make(42), make(42));
    }
}
