use rand::Rng;

use crate::error::ProposalError;
use crate::gaussian::MultivariateGaussian;
use crate::student_t::MultivariateStudentT;

/// A proposal density `q(x|y)` for a local-random-walk Markov chain.
///
/// `evaluate` and `propose` only read the current covariance snapshot,
/// so a sampler may call them concurrently as long as no adaptation is
/// in flight; adaptation takes `&mut self` and the borrow checker
/// enforces the exclusive-writer discipline.
pub trait ProposalDensity {
    /// The fixed dimension of the kernel, set at construction.
    fn dim(&self) -> usize;

    /// Log of the density to propose `x` given `y`, `ln q(x|y)`.
    fn evaluate(&self, x: &[f64], y: &[f64]) -> Result<f64, ProposalError>;

    /// Draw a candidate point given the current position `y`.
    fn propose<R: Rng + ?Sized>(&self, y: &[f64], rng: &mut R)
        -> Result<Box<[f64]>, ProposalError>;
}

/// A proposal density that can be retrained from chain history.
pub trait AdaptiveProposal: ProposalDensity {
    /// Replace the internal covariance with an estimate from `points`,
    /// a sequence of chain positions in generation order.
    ///
    /// On failure the previous covariance and all derived state stay
    /// in place.
    fn adapt<'a>(
        &mut self,
        points: impl Iterator<Item = &'a [f64]>,
    ) -> Result<(), ProposalError>;
}

/// The closed set of random-walk kernels, for samplers that pick one at
/// runtime without reaching for trait objects.
#[derive(Debug, Clone)]
pub enum Proposal {
    Gaussian(MultivariateGaussian),
    StudentT(MultivariateStudentT),
}

impl ProposalDensity for Proposal {
    fn dim(&self) -> usize {
        match self {
            Proposal::Gaussian(inner) => inner.dim(),
            Proposal::StudentT(inner) => inner.dim(),
        }
    }

    fn evaluate(&self, x: &[f64], y: &[f64]) -> Result<f64, ProposalError> {
        match self {
            Proposal::Gaussian(inner) => inner.evaluate(x, y),
            Proposal::StudentT(inner) => inner.evaluate(x, y),
        }
    }

    fn propose<R: Rng + ?Sized>(
        &self,
        y: &[f64],
        rng: &mut R,
    ) -> Result<Box<[f64]>, ProposalError> {
        match self {
            Proposal::Gaussian(inner) => inner.propose(y, rng),
            Proposal::StudentT(inner) => inner.propose(y, rng),
        }
    }
}

impl AdaptiveProposal for Proposal {
    fn adapt<'a>(
        &mut self,
        points: impl Iterator<Item = &'a [f64]>,
    ) -> Result<(), ProposalError> {
        match self {
            Proposal::Gaussian(inner) => inner.adapt(points),
            Proposal::StudentT(inner) => inner.adapt(points),
        }
    }
}

impl From<MultivariateGaussian> for Proposal {
    fn from(density: MultivariateGaussian) -> Self {
        Proposal::Gaussian(density)
    }
}

impl From<MultivariateStudentT> for Proposal {
    fn from(density: MultivariateStudentT) -> Self {
        Proposal::StudentT(density)
    }
}
