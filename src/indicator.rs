//! Membership predicates used to restrict a chain to a subdomain.
//!
//! These are plain immutable configuration structs with a single
//! evaluation method; a sampler wraps [`Ball::contains`] or
//! [`Hyperrectangle::contains`] in whatever closure shape it wants.

use itertools::izip;

use crate::error::DimensionError;
use crate::math::vector_dot;

/// Indicator of a ball around `center`.
#[derive(Debug, Clone)]
pub struct Ball {
    center: Box<[f64]>,
    radius: f64,
    include_boundary: bool,
}

impl Ball {
    pub fn new(center: impl Into<Box<[f64]>>, radius: f64, include_boundary: bool) -> Self {
        Ball {
            center: center.into(),
            radius,
            include_boundary,
        }
    }

    pub fn dim(&self) -> usize {
        self.center.len()
    }

    /// Whether `point` lies inside the ball, with points at distance
    /// exactly `radius` counted only when `include_boundary` is set.
    pub fn contains(&self, point: &[f64]) -> Result<bool, DimensionError> {
        DimensionError::check_len(self.dim(), point.len())?;
        let diff: Vec<f64> = izip!(point, self.center.iter()).map(|(x, c)| x - c).collect();
        let distance = vector_dot(&diff, &diff).sqrt();
        Ok(if self.include_boundary {
            distance <= self.radius
        } else {
            distance < self.radius
        })
    }
}

/// Indicator of an axis-aligned box `[lower, upper]`.
#[derive(Debug, Clone)]
pub struct Hyperrectangle {
    lower: Box<[f64]>,
    upper: Box<[f64]>,
    include_boundary: bool,
}

impl Hyperrectangle {
    /// Fails if the bounds disagree in length or `upper[i] < lower[i]`
    /// on some axis.
    pub fn new(
        lower: impl Into<Box<[f64]>>,
        upper: impl Into<Box<[f64]>>,
        include_boundary: bool,
    ) -> Result<Self, DimensionError> {
        let lower = lower.into();
        let upper = upper.into();
        DimensionError::check_len(lower.len(), upper.len())?;
        for (axis, (lo, hi)) in izip!(lower.iter(), upper.iter()).enumerate() {
            if hi < lo {
                return Err(DimensionError::InvertedBounds { axis });
            }
        }
        Ok(Hyperrectangle {
            lower,
            upper,
            include_boundary,
        })
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Whether `point` lies inside the box, with faces counted only
    /// when `include_boundary` is set.
    pub fn contains(&self, point: &[f64]) -> Result<bool, DimensionError> {
        DimensionError::check_len(self.dim(), point.len())?;
        Ok(izip!(point, self.lower.iter(), self.upper.iter()).all(|(x, lo, hi)| {
            if self.include_boundary {
                lo <= x && x <= hi
            } else {
                lo < x && x < hi
            }
        }))
    }
}
