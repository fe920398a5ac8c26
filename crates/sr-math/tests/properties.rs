//! Property-based tests for the saferate numerical engine.

use proptest::prelude::*;
use sr_math::{estimate_rate, gamma_p, gamma_q, gamma_quantile, log_gamma};

const TOL: f64 = 1e-9;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// Shapes of the form k + 0.5 are the only ones the estimator produces;
// the strategies stay inside that family plus nearby fractional weights.
fn jeffreys_shape() -> impl Strategy<Value = f64> {
    (0.0..30.0f64).prop_map(|k| k + 0.5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// P and Q are complements on both sides of the regime split.
    #[test]
    fn gamma_p_q_complementary(a in jeffreys_shape(), x in 0.001..200.0f64) {
        let p = gamma_p(a, x);
        let q = gamma_q(a, x);
        prop_assert!(approx_eq(p + q, 1.0, 1e-11), "P+Q = {} at a={}, x={}", p + q, a, x);
    }

    /// P(a, x) is within [0, 1] and increases with x.
    #[test]
    fn gamma_p_monotone(a in jeffreys_shape(), x in 0.01..100.0f64, bump in 0.01..10.0f64) {
        let p1 = gamma_p(a, x);
        let p2 = gamma_p(a, x + bump);
        prop_assert!((0.0..=1.0).contains(&p1));
        prop_assert!(p2 >= p1 - 1e-12, "P({a},{}) = {p2} < P({a},{x}) = {p1}", x + bump);
    }

    /// The quantile solver inverts P(a, x*rate) across the exercised
    /// shape/rate/probability space.
    #[test]
    fn quantile_inverts_cdf(
        a in jeffreys_shape(),
        rate in prop_oneof![0.01..10.0f64, 1.0e3..1.0e7f64],
        p in 0.01..0.99f64,
    ) {
        let x = gamma_quantile(a, rate, p).unwrap();
        prop_assert!(x > 0.0);
        let round_trip = gamma_p(a, x * rate);
        prop_assert!(approx_eq(round_trip, p, 1e-8),
            "P({a}, {x}*{rate}) = {round_trip}, wanted {p}");
    }

    /// Quantiles are monotone in probability.
    #[test]
    fn quantile_monotone_in_p(a in jeffreys_shape(), rate in 0.1..100.0f64, p in 0.02..0.95f64) {
        let q1 = gamma_quantile(a, rate, p).unwrap();
        let q2 = gamma_quantile(a, rate, p + 0.04).unwrap();
        prop_assert!(q2 > q1, "quantile not increasing: q({p})={q1}, q({})={q2}", p + 0.04);
    }

    /// Rate estimates are finite, positive, and ordered.
    #[test]
    fn estimate_ordered(
        k in 0.0..25.0f64,
        m in 0.1..1.0e8f64,
        mass in 0.5..0.999f64,
    ) {
        let est = estimate_rate(k, m, mass).unwrap();
        prop_assert!(est.lo.is_finite() && est.lo > 0.0);
        prop_assert!(est.lo <= est.median && est.median <= est.hi);
    }

    /// The hi/lo ratio depends only on the count, not on exposure.
    #[test]
    fn interval_ratio_exposure_invariant(
        k in 0.0..15.0f64,
        m in 1.0..1.0e6f64,
        scale in 0.01..100.0f64,
    ) {
        let a = estimate_rate(k, m, 0.9).unwrap();
        let b = estimate_rate(k, m * scale, 0.9).unwrap();
        prop_assert!(approx_eq(a.hi / a.lo, b.hi / b.lo, 1e-6),
            "ratio changed with exposure: {} vs {}", a.hi / a.lo, b.hi / b.lo);
    }

    /// Wider credible mass gives a wider (or equal) interval around the
    /// same median.
    #[test]
    fn wider_mass_wider_interval(k in 0.0..20.0f64, m in 1.0..1.0e6f64) {
        let narrow = estimate_rate(k, m, 0.8).unwrap();
        let wide = estimate_rate(k, m, 0.95).unwrap();
        prop_assert!(approx_eq(narrow.median, wide.median, 1e-9));
        prop_assert!(wide.lo <= narrow.lo + TOL);
        prop_assert!(wide.hi >= narrow.hi - TOL);
    }

    /// log_gamma satisfies the recurrence on the positive reals the
    /// estimator touches.
    #[test]
    fn log_gamma_recurrence(z in 0.5..100.0f64) {
        let lhs = log_gamma(z + 1.0);
        let rhs = log_gamma(z) + z.ln();
        prop_assert!(approx_eq(lhs, rhs, 1e-8), "lg({}+1)={} vs {}", z, lhs, rhs);
    }
}
