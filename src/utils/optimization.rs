//! Derivative-free optimization for parameter estimation.

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the simplex value spread.
    pub tolerance: f64,
    /// Relative step used to build the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            initial_step: 0.05,
        }
    }
}

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at the best point.
    pub optimal_value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the simplex converged within tolerance.
    pub converged: bool,
}

// Standard Nelder-Mead coefficients.
const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINKAGE: f64 = 0.5;

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// `bounds`, when given, clamps every candidate point per dimension.
///
/// # Example
/// ```
/// use fincast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Minimize (x-2)^2 + (y-3)^2
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let clamp = |mut point: Vec<f64>| -> Vec<f64> {
        if let Some(bounds) = bounds {
            for (x, &(lo, hi)) in point.iter_mut().zip(bounds.iter()) {
                *x = x.clamp(lo, hi);
            }
        }
        point
    };

    // Simplex of n+1 (value, point) vertices, kept sorted best-first.
    let mut simplex: Vec<(f64, Vec<f64>)> = Vec::with_capacity(n + 1);
    let start = clamp(initial.to_vec());
    simplex.push((objective(&start), start.clone()));
    for i in 0..n {
        let mut vertex = start.clone();
        vertex[i] += if vertex[i].abs() > 1e-10 {
            config.initial_step * vertex[i].abs()
        } else {
            config.initial_step
        };
        let vertex = clamp(vertex);
        simplex.push((objective(&vertex), vertex));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        simplex.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        if simplex[n].0 - simplex[0].0 < config.tolerance {
            converged = true;
            break;
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; n];
        for (_, vertex) in &simplex[..n] {
            for (c, x) in centroid.iter_mut().zip(vertex.iter()) {
                *c += x;
            }
        }
        for c in &mut centroid {
            *c /= n as f64;
        }

        let worst = simplex[n].clone();
        let towards = |coeff: f64, from: &[f64]| -> Vec<f64> {
            clamp(
                centroid
                    .iter()
                    .zip(from.iter())
                    .map(|(c, x)| c + coeff * (c - x))
                    .collect(),
            )
        };

        let reflected = towards(REFLECTION, &worst.1);
        let reflected_value = objective(&reflected);

        if reflected_value < simplex[0].0 {
            // Try to expand past the reflected point.
            let expanded = towards(REFLECTION * EXPANSION, &worst.1);
            let expanded_value = objective(&expanded);
            simplex[n] = if expanded_value < reflected_value {
                (expanded_value, expanded)
            } else {
                (reflected_value, reflected)
            };
            continue;
        }

        if reflected_value < simplex[n - 1].0 {
            simplex[n] = (reflected_value, reflected);
            continue;
        }

        // Contract towards the better of worst/reflected.
        let contracted = if reflected_value < worst.0 {
            towards(REFLECTION * CONTRACTION, &worst.1)
        } else {
            towards(-CONTRACTION, &worst.1)
        };
        let contracted_value = objective(&contracted);
        if contracted_value < worst.0.min(reflected_value) {
            simplex[n] = (contracted_value, contracted);
            continue;
        }

        // Shrink everything towards the best vertex.
        let best = simplex[0].1.clone();
        for (value, vertex) in simplex.iter_mut().skip(1) {
            for (x, b) in vertex.iter_mut().zip(best.iter()) {
                *x = b + SHRINKAGE * (*x - b);
            }
            let shrunk = clamp(vertex.clone());
            *value = objective(&shrunk);
            *vertex = shrunk;
        }
    }

    simplex.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    let (optimal_value, optimal_point) = simplex.swap_remove(0);

    NelderMeadResult {
        optimal_point,
        optimal_value,
        iterations,
        converged,
    }
}
