//! Derivative-free parameter estimation for the statistical model.

// Standard Nelder-Mead coefficients.
const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;
const INITIAL_STEP: f64 = 0.05;

/// Result of a bounded Nelder-Mead minimization.
#[derive(Debug, Clone)]
pub struct SimplexResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at the best point.
    pub optimal_value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the simplex converged within the tolerance.
    pub converged: bool,
}

/// Minimize `objective` with a bounded Nelder-Mead simplex.
///
/// Coordinates are clamped to `bounds` after every simplex move, which is
/// sufficient for the coefficient boxes used by the ARMA estimation.
///
/// # Example
/// ```
/// use salecast::utils::nelder_mead;
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     500,
///     1e-8,
/// );
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    max_iter: usize,
    tolerance: f64,
) -> SimplexResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return SimplexResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    // Simplex of n+1 vertices around the initial guess.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(clamp_point(initial.to_vec(), bounds));
    for i in 0..n {
        let mut vertex = initial.to_vec();
        let step = if initial[i].abs() > 1e-10 {
            INITIAL_STEP * initial[i].abs()
        } else {
            INITIAL_STEP
        };
        vertex[i] += step;
        simplex.push(clamp_point(vertex, bounds));
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| {
            values[a]
                .partial_cmp(&values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        if values[worst] - values[best] < tolerance {
            converged = true;
            break;
        }

        let centroid = centroid_excluding(&simplex, worst);

        let reflected = clamp_point(
            blend(&centroid, &simplex[worst], -REFLECTION),
            bounds,
        );
        let reflected_value = objective(&reflected);

        if reflected_value < values[second_worst] && reflected_value >= values[best] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        if reflected_value < values[best] {
            let expanded = clamp_point(blend(&centroid, &reflected, EXPANSION), bounds);
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        // Contract towards the better of reflected/worst.
        let anchor = if reflected_value < values[worst] {
            &reflected
        } else {
            &simplex[worst]
        };
        let contracted = clamp_point(blend(&centroid, anchor, CONTRACTION), bounds);
        let contracted_value = objective(&contracted);
        if contracted_value < values[worst].min(reflected_value) {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        // Shrink everything towards the best vertex.
        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i == best {
                continue;
            }
            for j in 0..n {
                simplex[i][j] = anchor[j] + SHRINK * (simplex[i][j] - anchor[j]);
            }
            simplex[i] = clamp_point(std::mem::take(&mut simplex[i]), bounds);
            values[i] = objective(&simplex[i]);
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);

    SimplexResult {
        optimal_point: simplex[best].clone(),
        optimal_value: values[best],
        iterations,
        converged,
    }
}

/// Centroid of all vertices except `exclude`.
fn centroid_excluding(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let dim = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; dim];
    for (i, vertex) in simplex.iter().enumerate() {
        if i == exclude {
            continue;
        }
        for (c, v) in centroid.iter_mut().zip(vertex) {
            *c += v;
        }
    }
    for c in &mut centroid {
        *c /= count;
    }
    centroid
}

/// centroid + factor * (point - centroid)
fn blend(centroid: &[f64], point: &[f64], factor: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point.iter())
        .map(|(c, p)| c + factor * (p - c))
        .collect()
}

fn clamp_point(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(bounds) = bounds {
        for (x, (low, high)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(*low, *high);
        }
    }
    point
}
