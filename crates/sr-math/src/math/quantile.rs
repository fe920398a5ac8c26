//! Gamma quantile solver: x such that P(a, x * rate) = p.
//!
//! Wilson-Hilferty seed refined by damped Newton-Raphson. Iteration
//! counts are hard-capped so every call terminates in bounded time.

use super::gamma::{gamma_p, gamma_pdf};
use super::MathError;

const NEWTON_MAX_ITERS: usize = 50;
const NEWTON_TOL: f64 = 1.0e-12;
const DENSITY_FLOOR: f64 = 1.0e-100;
const SEED_CUBE_FLOOR: f64 = 0.001;

/// Standard normal quantile (probit).
///
/// Abramowitz & Stegun 26.2.23 rational approximation; absolute error
/// below 4.5e-4, which only has to be good enough to seed Newton.
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    if (p - 0.5).abs() < 1e-10 {
        return 0.0;
    }

    let t = if p < 0.5 {
        (-2.0 * p.ln()).sqrt()
    } else {
        (-2.0 * (1.0 - p).ln()).sqrt()
    };

    let c0 = 2.515517;
    let c1 = 0.802853;
    let c2 = 0.010328;
    let d1 = 1.432788;
    let d2 = 0.189269;
    let d3 = 0.001308;

    let approx = t - (c0 + c1 * t + c2 * t * t) / (1.0 + d1 * t + d2 * t * t + d3 * t * t * t);

    if p < 0.5 {
        -approx
    } else {
        approx
    }
}

/// Inverse of the regularized lower incomplete gamma function with
/// respect to its argument, for a Gamma(shape, rate) variable.
///
/// Solves `P(shape, x * rate) = p` for x. Fails with an
/// invalid-parameter error when shape or rate is not finite-positive or
/// p does not lie strictly inside (0, 1); `p = 0` and `p = 1` are
/// rejected rather than mapped to the distribution edges.
pub fn gamma_quantile(shape: f64, rate: f64, p: f64) -> Result<f64, MathError> {
    if !shape.is_finite() || shape <= 0.0 {
        return Err(MathError::InvalidShape(shape));
    }
    if !rate.is_finite() || rate <= 0.0 {
        return Err(MathError::InvalidRate(rate));
    }
    if !p.is_finite() || p <= 0.0 || p >= 1.0 {
        return Err(MathError::InvalidProbability(p));
    }

    // Wilson-Hilferty: a chi-squared quantile with 2*shape degrees of
    // freedom is approximately nu * (1 - d + z*sqrt(d))^3 with
    // d = 2/(9*nu); Gamma(shape, rate) = chi2(2*shape) / (2*rate).
    // The cubed term is floored so the seed stays positive even for
    // extreme tail probabilities at small shapes.
    let z = normal_quantile(p);
    let nu = 2.0 * shape;
    let d = 2.0 / (9.0 * nu);
    let cube = 1.0 - d + z * d.sqrt();
    let chi2 = nu * cube.powi(3).max(SEED_CUBE_FLOOR);
    let mut x = chi2 / (2.0 * rate);

    for _ in 0..NEWTON_MAX_ITERS {
        let residual = gamma_p(shape, x * rate) - p;
        if residual.abs() < NEWTON_TOL {
            break;
        }
        let density = gamma_pdf(x, shape, rate);
        if !density.is_finite() || density < DENSITY_FLOOR {
            // Flat region; a Newton step would divide by ~0.
            break;
        }
        // Damped step: never undershoot below one-tenth of the current
        // estimate, which keeps the iterate positive.
        x = (x - residual / density).max(x / 10.0);
    }

    Ok(x)
}
