use faer::linalg::solvers::{DenseSolveCore, Llt};
use faer::{Mat, Side};
use itertools::izip;

use crate::error::{DimensionError, MathError};

/// Covariance matrix of a random-walk kernel together with its derived
/// quantities: the Cholesky lower factor `L` (with `L·Lᵗ = Σ`), the
/// inverse `Σ⁻¹` and `ln det Σ⁻¹`.
///
/// The three derived quantities are computed exactly once, in [`new`],
/// from an owned copy of the input matrix. Replacing a covariance means
/// building a fresh `Covariance` and swapping it in whole, so readers
/// can never observe `Σ` updated while `L` or `Σ⁻¹` are stale.
///
/// [`new`]: Covariance::new
#[derive(Debug, Clone)]
pub struct Covariance {
    sigma: Mat<f64>,
    chol: Mat<f64>,
    inv: Mat<f64>,
    log_det_inv: f64,
}

impl Covariance {
    /// Decompose a symmetric positive definite matrix.
    ///
    /// Fails with [`MathError::NotPositiveDefinite`] if the Cholesky
    /// factorization does, and rejects empty or non-square input
    /// eagerly. Like the factorization itself, only the lower triangle
    /// of `sigma` is read.
    pub fn new(sigma: Mat<f64>) -> Result<Self, MathError> {
        let dim = sigma.nrows();
        if sigma.ncols() != dim {
            return Err(MathError::NotSquare {
                nrows: sigma.nrows(),
                ncols: sigma.ncols(),
            });
        }
        if dim == 0 {
            return Err(MathError::EmptyCovariance);
        }

        let llt =
            Llt::new(sigma.as_ref(), Side::Lower).map_err(|_| MathError::NotPositiveDefinite)?;
        let chol = llt.L().to_owned();
        let inv = llt.inverse();

        // ln det Σ⁻¹ = −2·Σ ln L_ii, cheaper and better conditioned
        // than taking the determinant of the inverse.
        let log_det_inv = -2.0 * (0..dim).map(|i| chol[(i, i)].ln()).sum::<f64>();

        Ok(Covariance {
            sigma,
            chol,
            inv,
            log_det_inv,
        })
    }

    pub fn dim(&self) -> usize {
        self.sigma.nrows()
    }

    pub fn sigma(&self) -> &Mat<f64> {
        &self.sigma
    }

    pub fn log_det_inv(&self) -> f64 {
        self.log_det_inv
    }

    pub(crate) fn check_dim(&self, v: &[f64]) -> Result<(), DimensionError> {
        DimensionError::check_len(self.dim(), v.len())
    }

    /// Draw `dim` independent standard-normal variates and push them
    /// through `L`, giving one zero-mean sample with covariance `Σ`.
    ///
    /// Both kernels sample through this; the Student-t rescales the
    /// result afterwards.
    pub(crate) fn sample_transform<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let dim = self.dim();
        let dist = rand_distr::StandardNormal;
        let z: Vec<f64> = (0..dim).map(|_| rng.sample(dist)).collect();
        let mut out = vec![0.0; dim];
        for i in 0..dim {
            // L is lower triangular, columns past i are zero
            let mut acc = 0.0;
            for (j, z) in z.iter().enumerate().take(i + 1) {
                acc += self.chol[(i, j)] * z;
            }
            out[i] = acc;
        }
        out
    }

    /// The quadratic form `(x−y)ᵗ Σ⁻¹ (x−y)`.
    ///
    /// Lengths must have been checked by the caller.
    pub(crate) fn mahalanobis_sq(&self, x: &[f64], y: &[f64]) -> f64 {
        let dim = self.dim();
        let diff: Vec<f64> = izip!(x, y).map(|(a, b)| a - b).collect();
        let mut acc = 0.0;
        for i in 0..dim {
            let mut row = 0.0;
            for j in 0..dim {
                row += self.inv[(i, j)] * diff[j];
            }
            acc += row * diff[i];
        }
        acc
    }
}
