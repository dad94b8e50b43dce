use std::f64::consts::PI;

use faer::Mat;
use itertools::izip;
use rand::Rng;

use crate::covariance::Covariance;
use crate::error::{MathError, ProposalError};
use crate::proposal::ProposalDensity;

/// Multivariate Gaussian random-walk kernel.
///
/// `ln q(x|y) = ln N − ½·(x−y)ᵗΣ⁻¹(x−y)` with
/// `ln N = −½·dim·ln 2π + ½·ln det Σ⁻¹`.
#[derive(Debug, Clone)]
pub struct MultivariateGaussian {
    cov: Covariance,
    log_norm: f64,
}

impl MultivariateGaussian {
    /// Build the kernel from a symmetric positive definite covariance.
    ///
    /// The matrix is decomposed here once; a singular or indefinite
    /// covariance (and `dim == 0`) is rejected at this point, never
    /// later during evaluation.
    pub fn new(sigma: Mat<f64>) -> Result<Self, MathError> {
        let cov = Covariance::new(sigma)?;
        let log_norm = log_normalization(&cov);
        Ok(MultivariateGaussian { cov, log_norm })
    }

    /// Swap in a new covariance, rederiving factor, inverse and
    /// normalization together. On failure the old state is kept.
    pub fn set_covariance(&mut self, sigma: Mat<f64>) -> Result<(), MathError> {
        let cov = Covariance::new(sigma)?;
        self.log_norm = log_normalization(&cov);
        self.cov = cov;
        Ok(())
    }

    pub fn covariance(&self) -> &Covariance {
        &self.cov
    }
}

fn log_normalization(cov: &Covariance) -> f64 {
    -0.5 * cov.dim() as f64 * (2.0 * PI).ln() + 0.5 * cov.log_det_inv()
}

impl ProposalDensity for MultivariateGaussian {
    fn dim(&self) -> usize {
        self.cov.dim()
    }

    fn evaluate(&self, x: &[f64], y: &[f64]) -> Result<f64, ProposalError> {
        self.cov.check_dim(x)?;
        self.cov.check_dim(y)?;
        Ok(self.log_norm - 0.5 * self.cov.mahalanobis_sq(x, y))
    }

    fn propose<R: Rng + ?Sized>(
        &self,
        y: &[f64],
        rng: &mut R,
    ) -> Result<Box<[f64]>, ProposalError> {
        self.cov.check_dim(y)?;
        let step = self.cov.sample_transform(rng);
        Ok(izip!(y, step.as_slice()).map(|(y, s)| y + s).collect())
    }
}
