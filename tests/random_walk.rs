use anyhow::Result;
use faer::Mat;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rw_proposal::{
    AdaptiveProposal, Hyperrectangle, MultivariateGaussian, MultivariateStudentT, Proposal,
    ProposalDensity, RW_SCALE_FACTOR,
};

const DRAWS: usize = 100_000;

fn sample_steps(kernel: &impl ProposalDensity, seed: u64) -> Result<Vec<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut steps = Vec::with_capacity(DRAWS);
    for _ in 0..DRAWS {
        steps.push(kernel.propose(&[0.0], &mut rng)?[0]);
    }
    Ok(steps)
}

fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}

#[test]
fn gaussian_sampling_law() -> Result<()> {
    let kernel = MultivariateGaussian::new(Mat::identity(1, 1))?;
    let (mean, variance) = mean_and_variance(&sample_steps(&kernel, 42)?);
    assert!(mean.abs() < 0.02, "mean = {mean}");
    assert!((variance - 1.0).abs() < 0.05, "variance = {variance}");
    Ok(())
}

#[test]
fn student_t_sampling_law() -> Result<()> {
    // Var of a t variate with dof = 5 is dof / (dof − 2) = 5/3.
    let kernel = MultivariateStudentT::new(Mat::identity(1, 1), 5.0)?;
    let (mean, variance) = mean_and_variance(&sample_steps(&kernel, 43)?);
    assert!(mean.abs() < 0.03, "mean = {mean}");
    assert!((variance - 5.0 / 3.0).abs() < 0.1, "variance = {variance}");
    Ok(())
}

#[test]
fn kernels_integrate_to_one() -> Result<()> {
    let kernels: Vec<Proposal> = vec![
        MultivariateGaussian::new(Mat::identity(1, 1))?.into(),
        MultivariateStudentT::new(Mat::identity(1, 1), 5.0)?.into(),
    ];
    let current = [0.7];
    let step = 5e-3;
    let grid_points = (80.0 / step) as i64;
    for kernel in kernels {
        let mut integral = 0.0;
        for i in 0..grid_points {
            let x = -40.0 + (i as f64 + 0.5) * step;
            integral += kernel.evaluate(&[x], &current)?.exp() * step;
        }
        assert!((integral - 1.0).abs() < 1e-3, "integral = {integral}");
    }
    Ok(())
}

#[test]
fn proposed_steps_reproduce_the_covariance() -> Result<()> {
    let sigma = Mat::from_fn(2, 2, |i, j| if i == j { 2.0 } else { 1.0 });
    let kernel = MultivariateGaussian::new(sigma.clone())?;
    let mut rng = ChaCha8Rng::seed_from_u64(44);

    let mut draws: Vec<Box<[f64]>> = Vec::with_capacity(DRAWS);
    for _ in 0..DRAWS {
        draws.push(kernel.propose(&[0.0, 0.0], &mut rng)?);
    }

    // Retrain a fresh identity kernel from the draws; up to the
    // random-walk scaling its covariance must match the generating one.
    let mut adapted = MultivariateGaussian::new(Mat::identity(2, 2))?;
    adapted.adapt(draws.iter().map(|p| p.as_ref()))?;
    let scale = RW_SCALE_FACTOR / 2.0;
    for i in 0..2 {
        for j in 0..2 {
            let estimate = adapted.covariance().sigma()[(i, j)] / scale;
            assert!(
                (estimate - sigma[(i, j)]).abs() < 0.05,
                "sigma[{i},{j}] estimate = {estimate}"
            );
        }
    }
    Ok(())
}

#[test]
fn restricted_proposals_with_an_indicator() -> Result<()> {
    let kernel = MultivariateGaussian::new(Mat::identity(2, 2))?;
    let domain = Hyperrectangle::new(vec![-1.0, -1.0], vec![1.0, 1.0], true)?;
    let mut rng = ChaCha8Rng::seed_from_u64(45);

    let mut accepted = 0usize;
    for _ in 0..1_000 {
        let candidate = kernel.propose(&[0.0, 0.0], &mut rng)?;
        if domain.contains(&candidate)? {
            accepted += 1;
        }
    }
    // P(inside [-1,1]²) = erf(1/sqrt(2))² ≈ 0.466
    assert!(accepted > 350 && accepted < 600, "accepted = {accepted}");
    Ok(())
}
