//! Two-parameter Gamma distribution with location fixed at zero.
//!
//! Accumulated precipitation is non-negative, so the distribution is anchored
//! at the origin and only shape and scale are estimated.

use crate::error::{ClimateError, Result};
use crate::utils::stats::{count_distinct, finite_values, mean};
use statrs::distribution::{ContinuousCDF, Gamma};
use statrs::function::gamma::digamma;

const MAX_BRACKET_STEPS: usize = 200;
const MAX_BISECTIONS: usize = 200;
const RELATIVE_TOLERANCE: f64 = 1e-12;

/// Maximum-likelihood Gamma parameters (location = 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaFit {
    /// Shape parameter (k).
    pub shape: f64,
    /// Scale parameter (theta).
    pub scale: f64,
}

impl GammaFit {
    /// Create from known parameters.
    pub fn new(shape: f64, scale: f64) -> Result<Self> {
        if !(shape.is_finite() && shape > 0.0) {
            return Err(ClimateError::InvalidParameter(format!(
                "gamma shape must be positive, got {shape}"
            )));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ClimateError::InvalidParameter(format!(
                "gamma scale must be positive, got {scale}"
            )));
        }
        Ok(Self { shape, scale })
    }

    /// Fit shape and scale by maximum likelihood.
    ///
    /// Missing and non-finite values are ignored. The shape solves
    /// `ln(k) - digamma(k) = ln(mean(x)) - mean(ln(x))` and the scale is
    /// `mean(x) / k`.
    ///
    /// # Errors
    /// * `InsufficientData` - fewer than two finite values
    /// * `DegenerateData` - a value is zero or negative, or all values are equal
    /// * `ComputationError` - the shape equation could not be bracketed
    pub fn fit(sample: &[f64]) -> Result<Self> {
        let data = finite_values(sample);
        if data.len() < 2 {
            return Err(ClimateError::InsufficientData {
                needed: 2,
                got: data.len(),
            });
        }
        if let Some(&v) = data.iter().find(|&&v| v <= 0.0) {
            return Err(ClimateError::DegenerateData(format!(
                "gamma fit with zero location requires positive values, found {v}"
            )));
        }
        if count_distinct(&data) < 2 {
            return Err(ClimateError::DegenerateData(
                "all values are equal".to_string(),
            ));
        }

        let m = mean(&data);
        let mean_log = data.iter().map(|x| x.ln()).sum::<f64>() / data.len() as f64;
        let s = m.ln() - mean_log;
        if !(s.is_finite() && s > 0.0) {
            return Err(ClimateError::DegenerateData(format!(
                "sample has no usable spread (log-mean gap {s})"
            )));
        }

        let shape = solve_shape(s)?;
        let fit = Self::new(shape, m / shape)?;
        tracing::debug!(
            shape = fit.shape,
            scale = fit.scale,
            n = data.len(),
            "fitted gamma distribution"
        );
        Ok(fit)
    }

    /// Rate parameter (1 / scale).
    pub fn rate(&self) -> f64 {
        1.0 / self.scale
    }

    /// Mean of the fitted distribution.
    pub fn mean(&self) -> f64 {
        self.shape * self.scale
    }

    /// Cumulative probability at each value; `NaN` for missing inputs.
    pub fn cdf_all(&self, values: &[f64]) -> Result<Vec<f64>> {
        let dist = self.distribution()?;
        Ok(values
            .iter()
            .map(|&x| {
                if x.is_nan() {
                    f64::NAN
                } else if x <= 0.0 {
                    0.0
                } else {
                    dist.cdf(x)
                }
            })
            .collect())
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> Result<f64> {
        Ok(self.cdf_all(&[x])?[0])
    }

    fn distribution(&self) -> Result<Gamma> {
        Gamma::new(self.shape, self.rate())
            .map_err(|e| ClimateError::ComputationError(format!("gamma distribution: {e}")))
    }
}

/// Solve `ln(k) - digamma(k) = s` for `k > 0`.
///
/// The left side decreases monotonically from +inf to 0, so a bracket is
/// grown around the Thom estimate and then bisected.
fn solve_shape(s: f64) -> Result<f64> {
    let objective = |k: f64| k.ln() - digamma(k) - s;

    let guess = (1.0 + (1.0 + 4.0 * s / 3.0).sqrt()) / (4.0 * s);
    let mut lo = guess;
    let mut hi = guess;

    let mut steps = 0;
    while objective(lo) < 0.0 {
        lo /= 2.0;
        steps += 1;
        if steps > MAX_BRACKET_STEPS || lo == 0.0 {
            return Err(ClimateError::ComputationError(
                "could not bracket gamma shape from below".to_string(),
            ));
        }
    }
    steps = 0;
    while objective(hi) > 0.0 {
        hi *= 2.0;
        steps += 1;
        if steps > MAX_BRACKET_STEPS || !hi.is_finite() {
            return Err(ClimateError::ComputationError(
                "could not bracket gamma shape from above".to_string(),
            ));
        }
    }

    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if objective(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= RELATIVE_TOLERANCE * hi {
            break;
        }
    }

    Ok(0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fit_satisfies_likelihood_equations() {
        let sample = vec![12.0, 30.5, 8.2, 44.0, 19.9, 25.1, 60.3, 15.0, 9.8, 33.3];
        let fit = GammaFit::fit(&sample).unwrap();

        let m = mean(&sample);
        let mean_log = sample.iter().map(|x| x.ln()).sum::<f64>() / sample.len() as f64;

        // Scale equation: mean = shape * scale
        assert_relative_eq!(fit.mean(), m, max_relative = 1e-10);
        // Shape equation
        assert_relative_eq!(
            fit.shape.ln() - digamma(fit.shape),
            m.ln() - mean_log,
            epsilon = 1e-9
        );
    }

    #[test]
    fn fit_recovers_exponential_like_shape() {
        // Nearly exponential data has shape close to 1.
        let sample: Vec<f64> = (1..200)
            .map(|i| -(1.0 - i as f64 / 200.0_f64).ln() * 50.0)
            .collect();
        let fit = GammaFit::fit(&sample).unwrap();
        assert!(fit.shape > 0.7 && fit.shape < 1.4, "shape = {}", fit.shape);
    }

    #[test]
    fn fit_ignores_missing_values() {
        let with_gaps = vec![10.0, f64::NAN, 20.0, 35.0, f64::NAN];
        let without = vec![10.0, 20.0, 35.0];
        assert_eq!(
            GammaFit::fit(&with_gaps).unwrap(),
            GammaFit::fit(&without).unwrap()
        );
    }

    #[test]
    fn fit_rejects_degenerate_samples() {
        assert_eq!(
            GammaFit::fit(&[5.0]),
            Err(ClimateError::InsufficientData { needed: 2, got: 1 })
        );
        assert_eq!(
            GammaFit::fit(&[f64::NAN, f64::NAN]),
            Err(ClimateError::InsufficientData { needed: 2, got: 0 })
        );
        assert!(matches!(
            GammaFit::fit(&[7.0, 7.0, 7.0]),
            Err(ClimateError::DegenerateData(_))
        ));
        assert!(matches!(
            GammaFit::fit(&[0.0, 0.0, 0.0]),
            Err(ClimateError::DegenerateData(_))
        ));
        assert!(matches!(
            GammaFit::fit(&[0.0, 3.0, 4.0]),
            Err(ClimateError::DegenerateData(_))
        ));
    }

    #[test]
    fn cdf_is_monotonic_and_bounded() {
        let fit = GammaFit::new(2.0, 10.0).unwrap();
        let probs = fit.cdf_all(&[0.0, 5.0, 20.0, 80.0, f64::NAN]).unwrap();

        assert_eq!(probs[0], 0.0);
        assert!(probs[1] < probs[2] && probs[2] < probs[3]);
        assert!(probs[3] <= 1.0);
        assert!(probs[4].is_nan());

        // Shape 2, scale 10: F(20) = 1 - e^-2 (1 + 2)
        let expected = 1.0 - (-2.0_f64).exp() * 3.0;
        assert_relative_eq!(fit.cdf(20.0).unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn new_rejects_non_positive_parameters() {
        assert!(GammaFit::new(0.0, 1.0).is_err());
        assert!(GammaFit::new(1.0, -1.0).is_err());
        assert!(GammaFit::new(f64::NAN, 1.0).is_err());
    }
}
