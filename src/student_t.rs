use std::f64::consts::PI;

use faer::Mat;
use itertools::izip;
use rand::Rng;
use rand_distr::ChiSquared;

use crate::covariance::Covariance;
use crate::error::{MathError, ProposalError};
use crate::math::ln_gamma;
use crate::proposal::ProposalDensity;

/// Multivariate Student-t random-walk kernel with `dof` degrees of
/// freedom.
///
/// `ln q(x|y) = ln N − ½(dof+dim)·ln(1 + (x−y)ᵗΣ⁻¹(x−y)/dof)` with
/// `ln N = lnΓ(½(dof+dim)) − lnΓ(½dof) − ½dim·ln(dof·π) + ½ln det Σ⁻¹`.
///
/// As `dof → ∞` this approaches the Gaussian kernel; smaller `dof`
/// gives heavier tails.
#[derive(Debug, Clone)]
pub struct MultivariateStudentT {
    cov: Covariance,
    dof: f64,
    chi_squared: ChiSquared<f64>,
    log_norm: f64,
}

impl MultivariateStudentT {
    /// Build the kernel from a symmetric positive definite scale matrix
    /// and `dof > 0`.
    pub fn new(sigma: Mat<f64>, dof: f64) -> Result<Self, MathError> {
        if !(dof > 0.0) {
            return Err(MathError::NonPositiveDof(dof));
        }
        let chi_squared = ChiSquared::new(dof).map_err(|_| MathError::NonPositiveDof(dof))?;
        let cov = Covariance::new(sigma)?;
        let log_norm = log_normalization(&cov, dof);
        Ok(MultivariateStudentT {
            cov,
            dof,
            chi_squared,
            log_norm,
        })
    }

    /// Swap in a new covariance, rederiving factor, inverse and
    /// normalization together. On failure the old state is kept.
    pub fn set_covariance(&mut self, sigma: Mat<f64>) -> Result<(), MathError> {
        let cov = Covariance::new(sigma)?;
        self.log_norm = log_normalization(&cov, self.dof);
        self.cov = cov;
        Ok(())
    }

    pub fn covariance(&self) -> &Covariance {
        &self.cov
    }

    pub fn dof(&self) -> f64 {
        self.dof
    }
}

fn log_normalization(cov: &Covariance, dof: f64) -> f64 {
    let dim = cov.dim() as f64;
    ln_gamma(0.5 * (dof + dim)) - ln_gamma(0.5 * dof) - 0.5 * dim * (dof * PI).ln()
        + 0.5 * cov.log_det_inv()
}

impl ProposalDensity for MultivariateStudentT {
    fn dim(&self) -> usize {
        self.cov.dim()
    }

    fn evaluate(&self, x: &[f64], y: &[f64]) -> Result<f64, ProposalError> {
        self.cov.check_dim(x)?;
        self.cov.check_dim(y)?;
        let mahalanobis_sq = self.cov.mahalanobis_sq(x, y);
        Ok(self.log_norm
            - 0.5 * (self.dof + self.cov.dim() as f64) * (1.0 + mahalanobis_sq / self.dof).ln())
    }

    fn propose<R: Rng + ?Sized>(
        &self,
        y: &[f64],
        rng: &mut R,
    ) -> Result<Box<[f64]>, ProposalError> {
        self.cov.check_dim(y)?;
        // Z ~ N(0, Σ) and an independent V ~ χ²(dof) give the t variate
        // Z·sqrt(dof/V). V is almost surely positive for every dof > 0,
        // so the ratio needs no epsilon guard.
        let step = self.cov.sample_transform(rng);
        let chi_squared: f64 = rng.sample(self.chi_squared);
        let scale = (self.dof / chi_squared).sqrt();
        Ok(izip!(y, step.as_slice())
            .map(|(y, s)| y + s * scale)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rejects_non_positive_dof() {
        for dof in [0.0, -1.5, f64::NAN] {
            assert!(matches!(
                MultivariateStudentT::new(Mat::identity(2, 2), dof),
                Err(MathError::NonPositiveDof(_))
            ));
        }
    }

    #[test]
    fn univariate_log_density_at_zero() {
        // dim = 1, Σ = 1, dof = 5:
        // ln N = lnΓ(3) − lnΓ(5/2) − ½ln(5π), with Γ(3) = 2 and
        // Γ(5/2) = 3/4·sqrt(π).
        let kernel = MultivariateStudentT::new(Mat::identity(1, 1), 5.0).unwrap();
        let expected = 2f64.ln() - (0.75 * PI.sqrt()).ln() - 0.5 * (5.0 * PI).ln();
        assert_relative_eq!(
            kernel.evaluate(&[0.0], &[0.0]).unwrap(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn heavier_tails_than_gaussian() {
        use crate::gaussian::MultivariateGaussian;
        let student = MultivariateStudentT::new(Mat::identity(1, 1), 3.0).unwrap();
        let gauss = MultivariateGaussian::new(Mat::identity(1, 1)).unwrap();
        let far = [8.0];
        let origin = [0.0];
        assert!(
            student.evaluate(&far, &origin).unwrap() > gauss.evaluate(&far, &origin).unwrap()
        );
    }

    #[test]
    fn large_dof_approaches_gaussian() {
        use crate::gaussian::MultivariateGaussian;
        let student = MultivariateStudentT::new(Mat::identity(2, 2), 1e7).unwrap();
        let gauss = MultivariateGaussian::new(Mat::identity(2, 2)).unwrap();
        let x = [0.7, -0.2];
        let y = [0.1, 0.4];
        assert_relative_eq!(
            student.evaluate(&x, &y).unwrap(),
            gauss.evaluate(&x, &y).unwrap(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn propose_respects_dimension() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let kernel = MultivariateStudentT::new(Mat::identity(3, 3), 4.0).unwrap();
        assert!(kernel.propose(&[0.0; 2], &mut rng).is_err());
        assert_eq!(kernel.propose(&[0.0; 3], &mut rng).unwrap().len(), 3);
    }
}
