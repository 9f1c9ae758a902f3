//! Curve fitting on Lie groups with a generalized De Casteljau algorithm.
//!
//! The trajectory is split into chained Bézier segments of `degree` control points, each
//! sharing its first control point with the last one of the previous segment. Every sample
//! is obtained by repeatedly blending adjacent control points along geodesics,
//! `Qi ⊕ t (Qi+1 ⊖ Qi)`, until a single point remains.

use thiserror::Error;

use crate::group::LieGroup;

/// Errors raised when the curve fitting parameters do not match the trajectory.
#[derive(Debug, Error, PartialEq)]
pub enum CurveFittingError {
    /// The trajectory has fewer than three control points.
    #[error("trajectory must have more than 2 points, got {len}")]
    TrajectoryTooShort {
        /// Number of points in the trajectory.
        len: usize,
    },

    /// The degree must be at least 2.
    #[error("degree must be at least 2, got {degree}")]
    DegreeTooSmall {
        /// The requested degree.
        degree: usize,
    },

    /// The degree exceeds the number of control points.
    #[error("degree {degree} is larger than the trajectory length {len}")]
    DegreeTooLarge {
        /// The requested degree.
        degree: usize,
        /// Number of points in the trajectory.
        len: usize,
    },

    /// The number of interpolated points per segment is zero.
    #[error("k_interp must be greater than 0")]
    ZeroInterpolation,
}

/// Parameters of the De Casteljau curve fitting.
#[derive(Debug, Clone)]
pub struct DeCasteljau {
    /// Number of control points per segment.
    pub degree: usize,
    /// Sampling density. Each segment yields `k_interp` points for `degree == 2`
    /// and `k_interp * degree` points otherwise.
    pub k_interp: usize,
    /// Whether to add a segment joining the end of the trajectory back to its start.
    pub closed_curve: bool,
}

impl Default for DeCasteljau {
    fn default() -> Self {
        Self {
            degree: 3,
            k_interp: 10,
            closed_curve: false,
        }
    }
}

impl DeCasteljau {
    /// Create the parameters for an open curve.
    pub fn new(degree: usize, k_interp: usize) -> Self {
        Self {
            degree,
            k_interp,
            closed_curve: false,
        }
    }

    /// Set whether the curve is closed.
    pub fn with_closed_curve(mut self, closed_curve: bool) -> Self {
        self.closed_curve = closed_curve;
        self
    }

    /// Number of samples produced for each segment.
    pub fn samples_per_segment(&self) -> usize {
        if self.degree == 2 {
            self.k_interp
        } else {
            self.k_interp * self.degree
        }
    }

    fn validate(&self, len: usize) -> Result<(), CurveFittingError> {
        if len <= 2 {
            return Err(CurveFittingError::TrajectoryTooShort { len });
        }
        if self.degree < 2 {
            return Err(CurveFittingError::DegreeTooSmall {
                degree: self.degree,
            });
        }
        if self.degree > len {
            return Err(CurveFittingError::DegreeTooLarge {
                degree: self.degree,
                len,
            });
        }
        if self.k_interp == 0 {
            return Err(CurveFittingError::ZeroInterpolation);
        }
        Ok(())
    }

    /// Indices of the control points of every segment for a trajectory of `len` points.
    ///
    /// Regular segments advance by `degree - 1` points. For closed curves a last segment
    /// takes the trailing points left after the regular segments and completes them with
    /// points from the start of the trajectory.
    pub fn segment_indices(&self, len: usize) -> Result<Vec<Vec<usize>>, CurveFittingError> {
        self.validate(len)?;

        let step = self.degree - 1;
        let n_segments = (len - self.degree) / step + 1;

        let mut segments = (0..n_segments)
            .map(|s| (s * step..s * step + self.degree).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        log::debug!(
            "{} segments of {} control points for {} points",
            n_segments,
            self.degree,
            len
        );

        if self.closed_curve {
            let last_idx = n_segments * step;
            let left_over = len - 1 - last_idx;
            let wrap = (last_idx..len)
                .chain(0..self.degree - left_over - 1)
                .collect::<Vec<_>>();

            log::debug!("closing segment: {:?}", wrap);
            segments.push(wrap);
        }

        Ok(segments)
    }

    /// Fit a smooth curve through the control points of `trajectory`.
    pub fn fit<G: LieGroup>(&self, trajectory: &[G]) -> Result<Vec<G>, CurveFittingError> {
        let segments = self.segment_indices(trajectory.len())?;
        let segment_k_interp = self.samples_per_segment();

        let mut curve = Vec::with_capacity(segments.len() * segment_k_interp);
        let mut qs = Vec::with_capacity(self.degree);

        for segment in segments.iter() {
            for i in 1..=segment_k_interp {
                let t = i as f64 / segment_k_interp as f64;

                qs.clear();
                qs.extend(segment.iter().map(|&idx| trajectory[idx]));

                // each round shortens the control polygon by one point
                for _ in 0..self.degree - 1 {
                    for q in 0..qs.len() - 1 {
                        let delta = qs[q + 1].rminus(&qs[q], None, None) * t;
                        qs[q] = qs[q].rplus(&delta, None, None);
                    }
                    qs.pop();
                }

                curve.push(qs[0]);
            }
        }

        Ok(curve)
    }
}

/// Fit a smooth curve through `trajectory` with the De Casteljau algorithm.
///
/// # Arguments
///
/// * `trajectory` - The control points, at least 3.
/// * `degree` - Number of control points per segment, between 2 and the trajectory length.
/// * `k_interp` - Sampling density, greater than 0.
/// * `closed_curve` - Whether to close the curve back onto the start of the trajectory.
///
/// # Returns
///
/// The sampled curve, `segment_k_interp` points per segment.
pub fn decasteljau<G: LieGroup>(
    trajectory: &[G],
    degree: usize,
    k_interp: usize,
    closed_curve: bool,
) -> Result<Vec<G>, CurveFittingError> {
    DeCasteljau::new(degree, k_interp)
        .with_closed_curve(closed_curve)
        .fit(trajectory)
}
