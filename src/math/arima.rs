//! ARIMA(1,1,1) estimation by conditional sum of squares (CSS).
//!
//! With `w_t = y_t - y_{t-1}` the model (no constant, as is conventional for
//! `d = 1`) is:
//!
//! ```text
//! w_t = φ w_{t-1} + e_t + θ e_{t-1}
//! ```
//!
//! Conditioning on `e_1 = 0`, the innovations follow the recursion
//! `e_t = w_t - φ w_{t-1} - θ e_{t-1}` and the objective is `Σ e_t²`.
//!
//! We minimize it with a deterministic grid search over `(φ, θ)`:
//! - a coarse grid over the stationary/invertible square `(-1, 1)²`
//! - a few rounds of finer grids centred on the incumbent
//!
//! Grid points are evaluated in parallel; the reduction picks the minimum SSE
//! and breaks ties by grid index, so results do not depend on thread timing.

use rayon::prelude::*;

/// Parameters are kept strictly inside the unit interval.
const PARAM_BOUND: f64 = 0.99;
const COARSE_STEPS: usize = 41;
const REFINE_STEPS: usize = 21;
const REFINE_ROUNDS: usize = 5;

/// Minimum number of differenced observations for a fit.
pub const MIN_DIFFS: usize = 4;

/// Estimated ARIMA(1,1,1) parameters and end-of-sample state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArimaEstimate {
    pub phi: f64,
    pub theta: f64,
    pub sigma2: f64,
    pub last_level: f64,
    pub last_diff: f64,
    pub last_resid: f64,
}

/// First difference of a series.
pub fn difference(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Conditional sum of squares and the final innovation for `(φ, θ)`.
pub fn css(diffs: &[f64], phi: f64, theta: f64) -> (f64, f64) {
    let mut sse = 0.0;
    let mut prev_e = 0.0;
    for t in 1..diffs.len() {
        let e = diffs[t] - phi * diffs[t - 1] - theta * prev_e;
        sse += e * e;
        prev_e = e;
    }
    (sse, prev_e)
}

/// Fit ARIMA(1,1,1) to a level series.
///
/// Returns `None` when there are fewer than `MIN_DIFFS + 1` levels or the
/// series contains non-finite values.
pub fn fit_arima_111(levels: &[f64]) -> Option<ArimaEstimate> {
    if levels.len() < MIN_DIFFS + 1 || levels.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let diffs = difference(levels);

    let coarse = grid(0.0, 0.0, PARAM_BOUND, COARSE_STEPS);
    let (mut phi, mut theta, mut sse) = best_on_grid(&diffs, &coarse)?;

    let mut half_width = 2.0 * PARAM_BOUND / (COARSE_STEPS as f64 - 1.0);
    for _ in 0..REFINE_ROUNDS {
        let local = grid(phi, theta, half_width, REFINE_STEPS);
        if let Some((p, t, s)) = best_on_grid(&diffs, &local) {
            if s <= sse {
                phi = p;
                theta = t;
                sse = s;
            }
        }
        half_width /= 4.0;
    }

    let (sse, last_resid) = css(&diffs, phi, theta);
    let n_resid = (diffs.len() - 1) as f64;
    let last_level = *levels.last()?;
    let last_diff = *diffs.last()?;

    Some(ArimaEstimate {
        phi,
        theta,
        sigma2: sse / n_resid,
        last_level,
        last_diff,
        last_resid,
    })
}

/// Point forecasts of the level `steps` periods ahead.
pub fn forecast_levels(est: &ArimaEstimate, steps: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(steps);
    let mut level = est.last_level;
    let mut diff = est.last_diff;
    for h in 0..steps {
        diff = if h == 0 {
            est.phi * est.last_diff + est.theta * est.last_resid
        } else {
            est.phi * diff
        };
        level += diff;
        out.push(level);
    }
    out
}

/// Square grid of `steps × steps` points centred on `(phi, theta)`, clipped to
/// the parameter bounds.
fn grid(phi: f64, theta: f64, half_width: f64, steps: usize) -> Vec<(f64, f64)> {
    let axis = |centre: f64| -> Vec<f64> {
        let lo = (centre - half_width).max(-PARAM_BOUND);
        let hi = (centre + half_width).min(PARAM_BOUND);
        let step = (hi - lo) / (steps as f64 - 1.0);
        (0..steps).map(|i| lo + step * i as f64).collect()
    };
    let phis = axis(phi);
    let thetas = axis(theta);
    phis.iter()
        .flat_map(|&p| thetas.iter().map(move |&t| (p, t)))
        .collect()
}

fn best_on_grid(diffs: &[f64], grid: &[(f64, f64)]) -> Option<(f64, f64, f64)> {
    let scored: Vec<(usize, f64)> = grid
        .par_iter()
        .enumerate()
        .filter_map(|(idx, &(phi, theta))| {
            let (sse, _) = css(diffs, phi, theta);
            sse.is_finite().then_some((idx, sse))
        })
        .collect();

    // Deterministic selection: minimum SSE, ties broken by grid index.
    let mut best = scored.first()?;
    for c in &scored[1..] {
        if c.1 < best.1 || (c.1 == best.1 && c.0 < best.0) {
            best = c;
        }
    }
    let (phi, theta) = grid[best.0];
    Some((phi, theta, best.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    fn simulate(phi: f64, theta: f64, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, 0.5).unwrap();
        let mut levels = vec![100.0];
        let (mut w_prev, mut e_prev) = (0.0, 0.0);
        for _ in 1..n {
            let e = noise.sample(&mut rng);
            let w = phi * w_prev + e + theta * e_prev;
            levels.push(levels.last().unwrap() + w);
            w_prev = w;
            e_prev = e;
        }
        levels
    }

    #[test]
    fn recovers_simulated_parameters() {
        let levels = simulate(0.6, 0.3, 2000, 7);
        let est = fit_arima_111(&levels).unwrap();
        assert!((est.phi - 0.6).abs() < 0.1, "phi {}", est.phi);
        assert!((est.theta - 0.3).abs() < 0.1, "theta {}", est.theta);
        assert!((est.sigma2 - 0.25).abs() < 0.05, "sigma2 {}", est.sigma2);
        assert_eq!(est.last_level, *levels.last().unwrap());
    }

    #[test]
    fn fit_is_deterministic() {
        let levels = simulate(-0.2, 0.5, 300, 11);
        let a = fit_arima_111(&levels).unwrap();
        let b = fit_arima_111(&levels).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_short_or_non_finite_is_rejected() {
        assert!(fit_arima_111(&[1.0, 2.0, 3.0, 4.0]).is_none());
        assert!(fit_arima_111(&[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0]).is_none());
    }

    #[test]
    fn forecast_follows_recursion() {
        let est = ArimaEstimate {
            phi: 0.5,
            theta: 0.2,
            sigma2: 1.0,
            last_level: 100.0,
            last_diff: 1.0,
            last_resid: 0.5,
        };
        let f = forecast_levels(&est, 3);
        // w1 = 0.5*1 + 0.2*0.5 = 0.6, w2 = 0.3, w3 = 0.15
        assert!((f[0] - 100.6).abs() < 1e-12);
        assert!((f[1] - 100.9).abs() < 1e-12);
        assert!((f[2] - 101.05).abs() < 1e-12);
    }

    #[test]
    fn linear_trend_forecast_keeps_drifting() {
        let levels: Vec<f64> = (0..24).map(|t| 150.0 + 0.5 * t as f64).collect();
        let est = fit_arima_111(&levels).unwrap();
        let f = forecast_levels(&est, 12);
        assert!(f.windows(2).all(|w| w[1] >= w[0] - 1e-9));
        assert!(f[0] > *levels.last().unwrap());
    }
}
