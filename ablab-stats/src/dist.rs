//! Reference Distributions
//!
//! Thin wrappers over `statrs` for the standard normal and Student-t
//! distributions used by the design formulas and the post-hoc tests.

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Standard normal quantile (inverse CDF).
pub fn z_quantile(p: f64) -> f64 {
    std_normal().inverse_cdf(p)
}

/// Standard normal CDF.
pub fn z_cdf(x: f64) -> f64 {
    std_normal().cdf(x)
}

/// Student-t quantile for `df` degrees of freedom.
pub fn t_quantile(p: f64, df: f64) -> f64 {
    t_dist(df).inverse_cdf(p)
}

/// Student-t CDF at `x` for `df` degrees of freedom.
pub fn t_cdf(x: f64, df: f64) -> f64 {
    t_dist(df).cdf(x)
}

#[inline]
fn std_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("standard normal parameters are valid")
}

/// Standard Student-t(df). Callers validate `df >= 1` before reaching
/// this point, so construction cannot fail.
#[inline]
fn t_dist(df: f64) -> StudentsT {
    StudentsT::new(0.0, 1.0, df).expect("valid df for t-distribution")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_quantile_known_values() {
        assert!(z_quantile(0.5).abs() < 1e-9);
        assert!((z_quantile(0.975) - 1.959964).abs() < 1e-5);
        assert!((z_quantile(0.95) - 1.644854).abs() < 1e-5);
        assert!((z_quantile(0.80) - 0.841621).abs() < 1e-5);
    }

    #[test]
    fn test_normal_quantile_symmetry() {
        assert!((z_quantile(0.025) + z_quantile(0.975)).abs() < 1e-9);
    }

    #[test]
    fn test_normal_cdf_known_values() {
        assert!((z_cdf(0.0) - 0.5).abs() < 1e-9);
        assert!((z_cdf(1.959964) - 0.975).abs() < 1e-5);
        assert!((z_cdf(-1.959964) - 0.025).abs() < 1e-5);
    }

    #[test]
    fn test_t_quantile_known_values() {
        assert!((t_quantile(0.975, 18.0) - 2.100922).abs() < 1e-3);
        assert!((t_quantile(0.975, 38.0) - 2.024394).abs() < 1e-3);
        // Approaches the normal quantile for large df
        assert!((t_quantile(0.975, 1998.0) - 1.961152).abs() < 1e-3);
    }

    #[test]
    fn test_t_cdf_known_values() {
        assert!((t_cdf(0.0, 10.0) - 0.5).abs() < 1e-9);
        assert!((t_cdf(2.0, 10.0) - 0.963306).abs() < 1e-3);
    }

    #[test]
    fn test_t_cdf_heavier_tails_than_normal() {
        // The t distribution puts more mass in the tails than the normal
        assert!(t_cdf(2.0, 5.0) < z_cdf(2.0));
    }
}
