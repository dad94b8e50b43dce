//! Proposal densities for local-random-walk MCMC samplers.
//!
//! A Metropolis-Hastings chain needs a kernel that can draw a candidate
//! point given the current one and evaluate the log probability of that
//! move. This crate provides the two standard adaptive random-walk
//! kernels, a multivariate Gaussian and a multivariate Student-t, built
//! on a shared Cholesky-based covariance core, together with the
//! [`ProposalDensity`] and [`AdaptiveProposal`] traits a sampler
//! dispatches through and the indicator predicates used to restrict a
//! chain to a subdomain.

pub(crate) mod adapt;
pub(crate) mod covariance;
pub(crate) mod error;
pub(crate) mod gaussian;
pub(crate) mod indicator;
pub(crate) mod math;
pub(crate) mod proposal;
pub(crate) mod student_t;

pub use adapt::{empirical_covariance, RW_SCALE_FACTOR};
pub use covariance::Covariance;
pub use error::{DimensionError, MathError, ProposalError};
pub use gaussian::MultivariateGaussian;
pub use indicator::{Ball, Hyperrectangle};
pub use proposal::{AdaptiveProposal, Proposal, ProposalDensity};
pub use student_t::MultivariateStudentT;
