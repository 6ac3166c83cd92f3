//! # Force model
//!
//! Computes the forces of the potential field acting on the robot for one
//! control cycle. All forces are given in the robot frame (X forwards, Y to
//! the left).
//!
//! The attractive force pulls the robot towards the goal point on the path,
//! the repulsive force pushes the robot away from the nearest obstacle in each
//! sector around it. The resultant force is the plain sum of the two, no
//! saturation is applied at this stage so that the direction of the force is
//! kept intact for the command synthesis.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{trace, warn};
use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

// Internal
use super::Params;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Distances below this have no usable direction.
const DEGENERATE_DIST_M: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A force in the robot frame.
pub type ForceVector = Vector2<f64>;

/// Error between the robot and the reference path, provided by the path
/// projection.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackingError {
    /// Distance of the robot from the path, positive when the robot is to the
    /// left of the path.
    ///
    /// Units: meters
    pub lat_error_m: f64,

    /// Robot heading minus path heading, positive when the robot is rotated
    /// anticlockwise from the path.
    ///
    /// Units: radians
    pub head_error_rad: f64,

    /// Index of the path point the robot is projected onto.
    pub proj_index: usize,
}

/// The nearest obstacle in each sector around the robot, as an offset from the
/// robot in the robot frame.
///
/// Sectors without a detection hold [`ObstacleReading::no_obstacle`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleReading {
    pub sectors: Vec<Vector2<f64>>,
}

/// The obstacles considered by the force model, `None` meaning that there is
/// no obstacle in that sector.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleSet {
    pub sectors: Vec<Option<Vector2<f64>>>,
}

/// The forces computed in one control cycle.
#[derive(Debug, Copy, Clone, Default, Serialize, PartialEq)]
pub struct ForceSet {
    pub attractive: ForceVector,
    pub repulsive: ForceVector,
    pub resultant: ForceVector,
}

/// The potential field force model.
#[derive(Debug, Clone)]
pub struct ForceModel {
    k_att: f64,
    k_rep: f64,
    k_head: f64,
    min_obstacle_dist_m: f64,
    obstacle_influence_dist_m: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ObstacleReading {
    /// The sentinel for a sector without any detected obstacle, an offset at
    /// infinite distance.
    pub fn no_obstacle() -> Vector2<f64> {
        Vector2::repeat(std::f64::INFINITY)
    }

    /// A reading with no obstacles in any of the sectors.
    pub fn empty(num_sectors: usize) -> Self {
        Self {
            sectors: vec![Self::no_obstacle(); num_sectors],
        }
    }

    /// Build a reading from a set of obstacle points, keeping the nearest
    /// point in each sector.
    ///
    /// Points are offsets from the robot in the robot frame. Points with
    /// non-finite coordinates are ignored.
    pub fn from_points(points: &[Vector2<f64>], num_sectors: usize) -> Self {
        let mut reading = Self::empty(num_sectors);

        if num_sectors == 0 {
            return reading;
        }

        for point in points.iter().filter(|p| p.x.is_finite() && p.y.is_finite()) {
            let sector = sector_of(point.y.atan2(point.x), num_sectors);

            if point.norm() < reading.sectors[sector].norm() {
                reading.sectors[sector] = *point;
            }
        }

        reading
    }

    /// Number of sectors in the reading.
    pub fn num_sectors(&self) -> usize {
        self.sectors.len()
    }
}

impl ObstacleSet {
    /// Number of sectors which contain an obstacle.
    pub fn num_obstacles(&self) -> usize {
        self.sectors.iter().filter(|s| s.is_some()).count()
    }
}

impl ForceModel {

    /// Create a new force model from the parameters.
    pub fn new(params: &Params) -> Self {
        Self {
            k_att: params.k_att,
            k_rep: params.k_rep,
            k_head: params.k_head,
            min_obstacle_dist_m: params.min_obstacle_dist_m,
            obstacle_influence_dist_m: params.obstacle_influence_dist_m,
        }
    }

    /// Compute all forces for this cycle.
    ///
    /// `goal_p` is the goal point in the path frame at the projection point.
    pub fn compute(
        &self,
        goal_p: &Vector2<f64>,
        tracking: &TrackingError,
        reading: &ObstacleReading
    ) -> ForceSet {
        let attractive = self.compute_attractive(goal_p, tracking);
        let obstacles = self.find_obstacles(reading);
        let repulsive = self.compute_repulsive(&obstacles);
        let resultant = Self::compute_resultant(&attractive, &repulsive);

        trace!(
            "Forces: att [{:.3}, {:.3}], rep [{:.3}, {:.3}] ({} obstacles), res [{:.3}, {:.3}]",
            attractive.x, attractive.y,
            repulsive.x, repulsive.y,
            obstacles.num_obstacles(),
            resultant.x, resultant.y
        );

        ForceSet {
            attractive,
            repulsive,
            resultant,
        }
    }

    /// Compute the attractive force towards the goal.
    ///
    /// In the path frame the robot sits at `(0, lat_error_m)`. The force
    /// points from there to the goal, rotated into the robot frame using the
    /// heading error, with a magnitude of
    /// `k_att * (|goal - robot| + k_head * |head_error_rad|)`. If the robot is
    /// already at the goal the force is zero.
    pub fn compute_attractive(
        &self,
        goal_p: &Vector2<f64>,
        tracking: &TrackingError
    ) -> ForceVector {
        let robot_p = Vector2::new(0.0, tracking.lat_error_m);
        let to_goal_p = goal_p - robot_p;
        let dist_m = to_goal_p.norm();

        if dist_m < std::f64::EPSILON {
            return ForceVector::zeros();
        }

        let magnitude = self.k_att * (dist_m + self.k_head * tracking.head_error_rad.abs());

        Rotation2::new(-tracking.head_error_rad) * (to_goal_p / dist_m) * magnitude
    }

    /// Select the obstacles to consider from the reading.
    ///
    /// Sectors holding a non-finite offset (including the no obstacle
    /// sentinel) have no obstacle.
    pub fn find_obstacles(&self, reading: &ObstacleReading) -> ObstacleSet {
        ObstacleSet {
            sectors: reading
                .sectors
                .iter()
                .map(|o| {
                    if o.x.is_finite() && o.y.is_finite() {
                        Some(*o)
                    }
                    else {
                        None
                    }
                })
                .collect(),
        }
    }

    /// Compute the total repulsive force, the sum of the force from each
    /// sector.
    pub fn compute_repulsive(&self, obstacles: &ObstacleSet) -> ForceVector {
        obstacles
            .sectors
            .iter()
            .flatten()
            .map(|o| self.sector_repulsion(o))
            .fold(ForceVector::zeros(), |acc, f| acc + f)
    }

    /// Compute the repulsive force from a single obstacle.
    ///
    /// The force points away from the obstacle with a magnitude of
    /// `k_rep * (1/d - 1/d_inf)`, where `d` is the obstacle distance (no less
    /// than the minimum obstacle distance) and `d_inf` the influence distance.
    /// Without an influence distance the second term is zero.
    pub fn sector_repulsion(&self, offset: &Vector2<f64>) -> ForceVector {
        let dist_m = offset.norm();

        if !dist_m.is_finite() {
            return ForceVector::zeros();
        }

        if dist_m < DEGENERATE_DIST_M {
            warn!("Obstacle reported at the robot's origin, it has no direction and is ignored");
            return ForceVector::zeros();
        }

        let inv_influence = match self.obstacle_influence_dist_m {
            Some(d) if dist_m > d => return ForceVector::zeros(),
            Some(d) => 1.0 / d,
            None => 0.0
        };

        let eff_dist_m = dist_m.max(self.min_obstacle_dist_m);
        let magnitude = (self.k_rep * (1.0 / eff_dist_m - inv_influence)).max(0.0);

        -offset / dist_m * magnitude
    }

    /// Compute the resultant force, the sum of the attractive and repulsive
    /// forces.
    pub fn compute_resultant(
        attractive: &ForceVector,
        repulsive: &ForceVector
    ) -> ForceVector {
        attractive + repulsive
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the sector containing the given bearing (angle from the robot's X
/// axis, in [-pi, pi]).
///
/// Sector 0 starts directly behind the robot and sectors are numbered
/// anticlockwise.
pub fn sector_of(bearing_rad: f64, num_sectors: usize) -> usize {
    let width_rad = TAU / num_sectors as f64;
    let sector = ((bearing_rad + PI) / width_rad).floor();

    // A bearing of exactly pi belongs to the final sector
    (sector.max(0.0) as usize).min(num_sectors - 1)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> ForceModel {
        ForceModel::new(&Params::default())
    }

    #[test]
    fn test_sector_of() {
        assert_eq!(sector_of(-PI, 2), 0);
        assert_eq!(sector_of(-0.1, 2), 0);
        assert_eq!(sector_of(0.0, 2), 1);
        assert_eq!(sector_of(PI, 2), 1);
        assert_eq!(sector_of(0.0, 4), 2);
        assert_eq!(sector_of(-PI / 2.0 - 0.1, 4), 0);
    }

    #[test]
    fn test_from_points() {
        let points = vec![
            Vector2::new(1.0, 0.5),
            Vector2::new(0.5, 0.2),
            Vector2::new(std::f64::NAN, 0.1),
            Vector2::new(2.0, 1.0),
        ];

        let reading = ObstacleReading::from_points(&points, 2);

        assert_eq!(reading.num_sectors(), 2);
        assert_eq!(reading.sectors[0], ObstacleReading::no_obstacle());
        assert_eq!(reading.sectors[1], Vector2::new(0.5, 0.2));

        let reading = ObstacleReading::from_points(&[Vector2::new(1.0, -1.0)], 2);
        assert_eq!(reading.sectors[0], Vector2::new(1.0, -1.0));
        assert_eq!(reading.sectors[1], ObstacleReading::no_obstacle());
    }

    #[test]
    fn test_find_obstacles() {
        let reading = ObstacleReading {
            sectors: vec![
                Vector2::new(0.5, -0.5),
                ObstacleReading::no_obstacle(),
                Vector2::new(std::f64::NAN, 1.0),
                Vector2::new(1.0, std::f64::NEG_INFINITY),
            ],
        };

        let set = model().find_obstacles(&reading);

        assert_eq!(
            set.sectors,
            vec![Some(Vector2::new(0.5, -0.5)), None, None, None]
        );
        assert_eq!(set.num_obstacles(), 1);
    }

    #[test]
    fn test_attractive_goal_ahead() {
        let f = model().compute_attractive(&Vector2::new(5.0, 0.0), &TrackingError::default());

        assert_relative_eq!(f.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_attractive_errors() {
        let m = model();
        let goal = Vector2::new(1.0, 0.0);

        // Robot left of the path is pulled to the right
        let left = m.compute_attractive(&goal, &TrackingError {
            lat_error_m: 0.5,
            ..Default::default()
        });
        assert!(left.y < 0.0);

        // Further from the path gives a larger pull
        let further = m.compute_attractive(&goal, &TrackingError {
            lat_error_m: 1.0,
            ..Default::default()
        });
        assert!(further.norm() > left.norm());

        // Robot rotated anticlockwise from the path sees the goal to its right
        let rotated = m.compute_attractive(&goal, &TrackingError {
            head_error_rad: 0.3,
            ..Default::default()
        });
        assert_relative_eq!(rotated.norm(), 0.2 * (1.0 + 0.5 * 0.3), epsilon = 1e-12);
        assert_relative_eq!(rotated.y.atan2(rotated.x), -0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_attractive_grows_with_heading_error() {
        let m = model();
        let goal = Vector2::new(1.0, 0.0);

        let mut prev = 0.0;
        for head_error_rad in &[0.0, 0.5, 1.0, 2.0, -2.5, 3.0] {
            let f = m.compute_attractive(&goal, &TrackingError {
                head_error_rad: *head_error_rad,
                ..Default::default()
            });

            assert!(
                f.norm() > prev,
                "magnitude did not grow at a heading error of {}", head_error_rad
            );
            assert_relative_eq!(f.y.atan2(f.x), -head_error_rad, epsilon = 1e-12);
            prev = f.norm();
        }

        // Without the heading gain only the direction changes
        let m = ForceModel::new(&Params { k_head: 0.0, ..Default::default() });
        let f = m.compute_attractive(&goal, &TrackingError {
            head_error_rad: 1.0,
            ..Default::default()
        });
        assert_relative_eq!(f.norm(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_attractive_at_goal() {
        let f = model().compute_attractive(&Vector2::new(0.0, 0.25), &TrackingError {
            lat_error_m: 0.25,
            head_error_rad: 1.0,
            proj_index: 3
        });

        assert_eq!(f, ForceVector::zeros());
    }

    #[test]
    fn test_no_obstacle_is_zero() {
        let m = model();
        let set = ObstacleSet { sectors: vec![None, None, None] };

        assert_eq!(m.compute_repulsive(&set), ForceVector::zeros());
        assert_eq!(
            m.sector_repulsion(&ObstacleReading::no_obstacle()),
            ForceVector::zeros()
        );
    }

    #[test]
    fn test_repulsion_direction_and_law() {
        let m = model();

        // k_rep / d away from the obstacle
        let f = m.sector_repulsion(&Vector2::new(0.1, 0.0));
        assert_relative_eq!(f.x, -5.0, epsilon = 1e-9);
        assert_relative_eq!(f.y, 0.0, epsilon = 1e-12);

        let f = m.sector_repulsion(&Vector2::new(0.0, -2.0));
        assert_relative_eq!(f.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.y, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_repulsion_monotonic() {
        let m = ForceModel::new(&Params {
            obstacle_influence_dist_m: Some(3.0),
            ..Default::default()
        });

        let mut prev = std::f64::INFINITY;
        for i in 0..400 {
            let d = 0.001 + i as f64 * 0.01;
            let mag = m.sector_repulsion(&Vector2::new(d, d)).norm();
            assert!(mag <= prev, "magnitude increased at d = {}", d);
            prev = mag;
        }

        // Beyond the influence distance there is no force
        assert_eq!(m.sector_repulsion(&Vector2::new(3.5, 0.0)), ForceVector::zeros());
    }

    #[test]
    fn test_repulsion_degenerate() {
        let m = model();

        assert_eq!(m.sector_repulsion(&Vector2::zeros()), ForceVector::zeros());

        // Below the minimum distance the magnitude is capped
        let f = m.sector_repulsion(&Vector2::new(0.001, 0.0));
        assert_relative_eq!(f.x, -10.0, epsilon = 1e-9);
        assert!(f.x.is_finite());
    }

    #[test]
    fn test_repulsive_sums_sectors() {
        let m = model();
        let set = ObstacleSet {
            sectors: vec![Some(Vector2::new(0.0, -1.0)), Some(Vector2::new(0.0, 1.0))],
        };

        // Symmetric obstacles cancel
        let f = m.compute_repulsive(&set);
        assert_relative_eq!(f.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.y, 0.0, epsilon = 1e-12);

        let set = ObstacleSet {
            sectors: vec![Some(Vector2::new(1.0, -1.0)), Some(Vector2::new(1.0, 1.0))],
        };
        let f = m.compute_repulsive(&set);
        let single = m.sector_repulsion(&Vector2::new(1.0, 1.0));
        assert_relative_eq!(f.x, 2.0 * single.x, epsilon = 1e-12);
        assert_relative_eq!(f.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_resultant_is_sum() {
        let m = model();
        let reading = ObstacleReading {
            sectors: vec![Vector2::new(0.3, -0.4), Vector2::new(1.0, 2.0)],
        };
        let tracking = TrackingError {
            lat_error_m: -0.2,
            head_error_rad: 0.1,
            proj_index: 0,
        };

        let forces = m.compute(&Vector2::new(1.0, 0.0), &tracking, &reading);

        assert_eq!(forces.resultant, forces.attractive + forces.repulsive);
        assert_eq!(
            forces.attractive,
            m.compute_attractive(&Vector2::new(1.0, 0.0), &tracking)
        );
        assert_eq!(
            forces.repulsive,
            m.compute_repulsive(&m.find_obstacles(&reading))
        );
    }

    #[test]
    fn test_obstacle_ahead_opposes_attraction() {
        let m = model();
        let goal = Vector2::new(5.0, 0.0);
        let tracking = TrackingError::default();

        let free = m.compute(&goal, &tracking, &ObstacleReading::empty(2));
        let blocked = m.compute(&goal, &tracking, &ObstacleReading {
            sectors: vec![ObstacleReading::no_obstacle(), Vector2::new(0.1, 0.0)],
        });

        assert_relative_eq!(free.resultant.x, 1.0, epsilon = 1e-12);
        assert!(blocked.resultant.x < 0.0);

        // Repulsion outweighs attraction by (k_rep / k_att) * (goal distance / obstacle distance)
        let rep = blocked.repulsive.norm();
        assert!(rep > blocked.attractive.x);
        assert_relative_eq!(rep / blocked.attractive.x, (0.5 / 0.2) * (1.0 / 0.1) / 5.0, epsilon = 1e-9);
    }
}
