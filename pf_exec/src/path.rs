//! # Path
//!
//! This module defines the reference path followed by the controller, along
//! with the projection of the robot's pose onto it.
//!
//! Paths are a sequence of points in the map frame, each point joined to the
//! next by a straight segment. The path frame at a point has its X axis along
//! the path tangent at that point and its Y axis to the left of it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

// Internal
use crate::loc::Pose;
use crate::pf_ctrl::TrackingError;
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Segments shorter than this have no usable direction.
const MIN_SEGMENT_LENGTH_M: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path defining the desired trajectory of the robot.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Path {
    pub points_m: Vec<Vector2<f64>>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PathError {
    #[error("A path needs at least two points, found {0}")]
    NotEnoughPoints(usize),

    #[error("Point separation must be positive and finite, found {0}")]
    InvalidSeparation(f64),

    #[error("The path has no segment with a non-zero length")]
    Degenerate,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create a new path from the given points.
    pub fn new(points_m: Vec<Vector2<f64>>) -> Self {
        Self { points_m }
    }

    /// Create a new empty path
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Produces a direct path between the two position vectors, with each point in the path having
    /// at most the given separation.
    pub fn direct(
        from: Vector2<f64>,
        to: Vector2<f64>,
        point_sep_m: f64,
    ) -> Result<Self, PathError> {
        if !(point_sep_m.is_finite() && point_sep_m > 0.0) {
            return Err(PathError::InvalidSeparation(point_sep_m));
        }

        let diff_vec = to - from;
        let dist = diff_vec.norm();

        // Number of segments needed so that none is longer than the separation
        let num_segments = ((dist / point_sep_m).ceil() as usize).max(1);
        let delta = diff_vec / num_segments as f64;

        let mut points_m: Vec<Vector2<f64>> = (0..num_segments)
            .map(|i| from + delta * i as f64)
            .collect();

        // Push the target itself to avoid accumulating rounding error
        points_m.push(to);

        Ok(Self { points_m })
    }

    /// Check that the path can be followed, i.e. it has at least two points
    /// and at least one segment with a direction.
    pub fn check(&self) -> Result<(), PathError> {
        if self.points_m.len() < 2 {
            return Err(PathError::NotEnoughPoints(self.points_m.len()));
        }

        if self
            .points_m
            .windows(2)
            .all(|w| (w[1] - w[0]).norm() < MIN_SEGMENT_LENGTH_M)
        {
            return Err(PathError::Degenerate);
        }

        Ok(())
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }

    /// Index of the final point of the path, or `None` if the path is empty.
    pub fn last_index(&self) -> Option<usize> {
        self.points_m.len().checked_sub(1)
    }

    /// Return the length of the path in meters.
    ///
    /// If the path is empty (not enough points) then `None` is returned.
    pub fn get_length(&self) -> Option<f64> {
        if self.points_m.len() < 2 {
            return None;
        }

        Some(self.points_m.windows(2).map(|w| (w[1] - w[0]).norm()).sum())
    }

    /// Get the unit tangent of the path at the given point.
    ///
    /// The tangent is the direction of the segment leaving the point. At the
    /// end of the path, or where that segment has no length, the nearest
    /// segment with a direction (searching forwards then backwards) is used.
    pub fn tangent(&self, index: usize) -> Option<Vector2<f64>> {
        if self.points_m.len() < 2 || index >= self.points_m.len() {
            return None;
        }

        let forwards = (index..self.points_m.len() - 1).map(|i| (i, i + 1));
        let backwards = (1..=index).rev().map(|i| (i - 1, i));

        forwards.chain(backwards).find_map(|(a, b)| {
            let seg = self.points_m[b] - self.points_m[a];
            let len = seg.norm();
            if len < MIN_SEGMENT_LENGTH_M {
                None
            }
            else {
                Some(seg / len)
            }
        })
    }

    /// Get the heading (angle to the +ve map X axis) of the path at the given
    /// point.
    pub fn heading(&self, index: usize) -> Option<f64> {
        self.tangent(index).map(|t| t.y.atan2(t.x))
    }

    /// Express a map frame point in the path frame at the given index.
    pub fn to_path_frame(&self, index: usize, point_m: &Vector2<f64>) -> Option<Vector2<f64>> {
        let heading_rad = self.heading(index)?;
        Some(Rotation2::new(-heading_rad) * (point_m - self.points_m[index]))
    }

    /// Find the index of the lookahead point, the first point at an arc length
    /// of at least `lookahead_dist_m` beyond `from_index`.
    ///
    /// If the path ends first the final point is returned.
    pub fn lookahead_index(&self, from_index: usize, lookahead_dist_m: f64) -> Option<usize> {
        let last = self.last_index()?;
        let mut index = from_index.min(last);
        let mut dist_m = 0f64;

        while index < last && dist_m < lookahead_dist_m {
            dist_m += (self.points_m[index + 1] - self.points_m[index]).norm();
            index += 1;
        }

        Some(index)
    }

    /// Project the pose onto the path, searching forwards from `from_index`.
    ///
    /// The projection is the closest point at or after `from_index`, so the
    /// returned index never goes backwards along the path. Ties go to the
    /// earlier point.
    pub fn project(&self, pose: &Pose, from_index: usize) -> Result<TrackingError, PathError> {
        self.check()?;

        // Can't fail, the path has been checked
        let last = self.points_m.len() - 1;
        let from_index = from_index.min(last);

        let mut proj_index = from_index;
        let mut min_dist_m = std::f64::INFINITY;
        for (i, p) in self.points_m.iter().enumerate().skip(from_index) {
            let dist_m = (p - pose.position_m).norm();
            if dist_m < min_dist_m {
                min_dist_m = dist_m;
                proj_index = i;
            }
        }

        let tangent = self.tangent(proj_index).ok_or(PathError::Degenerate)?;
        let offset = pose.position_m - self.points_m[proj_index];

        // 2D cross product of tangent and offset, positive if left of the path
        let lat_error_m = tangent.x * offset.y - tangent.y * offset.x;
        let head_error_rad = wrap_pi(pose.heading_rad - tangent.y.atan2(tangent.x));

        trace!(
            "Projected pose onto path point {} (lat {:.3} m, head {:.3} rad)",
            proj_index, lat_error_m, head_error_rad
        );

        Ok(TrackingError {
            lat_error_m,
            head_error_rad,
            proj_index,
        })
    }
}
