use faer::{Mat, Scale};
use itertools::izip;

use crate::error::{DimensionError, MathError, ProposalError};
use crate::gaussian::MultivariateGaussian;
use crate::proposal::{AdaptiveProposal, ProposalDensity};
use crate::student_t::MultivariateStudentT;

/// Scaling applied to the empirical covariance when retraining a
/// random-walk kernel, `2.38² / dim` (Gelman et al.). Callers that want
/// a different rule can estimate with [`empirical_covariance`] and swap
/// the result in through `set_covariance` themselves.
pub const RW_SCALE_FACTOR: f64 = 2.38 * 2.38;

/// Unscaled sample covariance of a sequence of chain positions.
///
/// The first point fixes the dimension; any later point of a different
/// length fails with [`DimensionError::Mismatch`], and fewer than two
/// points cannot be estimated from. A history without spread yields a
/// singular matrix, which the kernels then reject when it is swapped
/// in.
pub fn empirical_covariance<'a>(
    points: impl Iterator<Item = &'a [f64]>,
) -> Result<Mat<f64>, ProposalError> {
    let mut points = points;
    let Some(first) = points.next() else {
        return Err(MathError::InsufficientHistory(0).into());
    };
    let dim = first.len();

    let mut count = 1usize;
    let mut sum = first.to_vec();
    let mut scatter = Mat::from_fn(dim, dim, |i, j| first[i] * first[j]);

    for point in points {
        DimensionError::check_len(dim, point.len())?;
        izip!(&mut sum, point).for_each(|(sum, x)| *sum += x);
        for i in 0..dim {
            for j in 0..dim {
                scatter[(i, j)] += point[i] * point[j];
            }
        }
        count += 1;
    }

    if count < 2 {
        return Err(MathError::InsufficientHistory(count).into());
    }

    let n = count as f64;
    let normalization = (n - 1.0).recip();
    Ok(Mat::from_fn(dim, dim, |i, j| {
        (scatter[(i, j)] - sum[i] * sum[j] / n) * normalization
    }))
}

fn scaled_estimate<'a>(
    dim: usize,
    points: impl Iterator<Item = &'a [f64]>,
) -> Result<Mat<f64>, ProposalError> {
    let mut sigma = empirical_covariance(points)?;
    if sigma.nrows() != dim {
        return Err(DimensionError::Mismatch {
            expected: dim,
            actual: sigma.nrows(),
        }
        .into());
    }
    sigma *= Scale(RW_SCALE_FACTOR / dim as f64);
    Ok(sigma)
}

impl AdaptiveProposal for MultivariateGaussian {
    fn adapt<'a>(
        &mut self,
        points: impl Iterator<Item = &'a [f64]>,
    ) -> Result<(), ProposalError> {
        let sigma = scaled_estimate(self.dim(), points)?;
        self.set_covariance(sigma)?;
        Ok(())
    }
}

impl AdaptiveProposal for MultivariateStudentT {
    fn adapt<'a>(
        &mut self,
        points: impl Iterator<Item = &'a [f64]>,
    ) -> Result<(), ProposalError> {
        let sigma = scaled_estimate(self.dim(), points)?;
        self.set_covariance(sigma)?;
        Ok(())
    }
}
