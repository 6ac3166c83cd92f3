//! # Localisation module
//!
//! Provides the pose of the robot in the map frame. Localisation itself is
//! performed elsewhere, this module only defines the data passed around.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and heading in the map frame) of the robot.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Pose {
    /// The position in the map frame
    pub position_m: Vector2<f64>,

    /// The heading of the robot, the angle from the map's +X axis, positive
    /// anticlockwise.
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad,
        }
    }

    /// Express a map frame point in the robot frame (X forwards, Y left).
    pub fn to_robot_frame(&self, point_m: &Vector2<f64>) -> Vector2<f64> {
        Rotation2::new(-self.heading_rad) * (point_m - self.position_m)
    }

    /// Advance the pose by applying a velocity for the given time step.
    ///
    /// The velocity is given in the robot frame as a speed along a direction
    /// relative to the heading, plus a turn rate. Used to simulate the robot
    /// in the demo executable and the tests.
    pub fn integrate(
        &mut self,
        speed_ms: f64,
        direction_rad: f64,
        rate_rads: f64,
        dt_s: f64
    ) {
        let travel = self.heading_rad + direction_rad;
        self.position_m += Vector2::new(travel.cos(), travel.sin()) * speed_ms * dt_s;
        self.heading_rad = util::maths::wrap_pi(self.heading_rad + rate_rads * dt_s);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_conversion() {
        let pose = Pose::new(1.0, 2.0, std::f64::consts::FRAC_PI_2);

        // A point 1 m north of the robot is straight ahead
        let ahead = pose.to_robot_frame(&Vector2::new(1.0, 3.0));
        assert_relative_eq!(ahead.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(ahead.y, 0.0, epsilon = 1e-12);

        // A point to the east is on the robot's right
        let right = pose.to_robot_frame(&Vector2::new(3.0, 2.0));
        assert_relative_eq!(right.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(right.y, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_integrate() {
        let mut pose = Pose::default();

        pose.integrate(1.0, 0.0, 0.0, 0.5);
        assert_relative_eq!(pose.position_m.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(pose.position_m.y, 0.0, epsilon = 1e-12);

        // Moving sideways to the left
        pose.integrate(1.0, std::f64::consts::FRAC_PI_2, 0.2, 1.0);
        assert_relative_eq!(pose.position_m.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(pose.position_m.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(pose.heading_rad, 0.2, epsilon = 1e-12);
    }
}
