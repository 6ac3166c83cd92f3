//! # Movement control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A movement demand for the actuation software.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveCmd {
    /// Move with the given velocity.
    ///
    /// The robot moves at `speed_ms` in the direction `direction_rad` while rotating about its
    /// Z+ (upwards) axis at `rate_rads`.
    Velocity {
        /// The speed of the movement in meters/second.
        speed_ms: f64,

        /// The direction of movement in radians, as an angle to the robot's current heading.
        ///
        /// Follows the right hand rule about the robot's Z+ (upwards) axis, so that positive
        /// angles are to the left.
        direction_rad: f64,

        /// The rotational velocity in radians/second.
        ///
        /// Follows the right hand rule about the robot's Z+ (upwards) axis, so that a positive
        /// rate will rotate the robot to the left.
        rate_rads: f64
    },

    /// Stop the robot, setting all velocities to zero.
    Stop
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl MoveCmd {
    /// Serialise the command into a JSON string for transport.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a command from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Returns true if the command demands no motion.
    pub fn is_stop(&self) -> bool {
        match self {
            MoveCmd::Stop => true,
            MoveCmd::Velocity { speed_ms, rate_rads, .. } =>
                *speed_ms == 0.0 && *rate_rads == 0.0
        }
    }
}
