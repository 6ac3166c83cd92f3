//! # Commands produced by the potential field controller
//!
//! The resultant force of a cycle is turned into a [`Command`] by the
//! [`CommandSynthesizer`], and every command then passes through [`validate`]
//! before leaving the controller. Conversion into the actuation message is
//! done by [`to_move_cmd`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::error;
use serde::Serialize;
use std::f64::consts::PI;

// Internal
use super::{ForceVector, Params};
use comms_if::tc::move_ctrl::MoveCmd;
use util::maths::{lin_map, wrap_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A velocity command for the robot.
#[derive(Debug, Copy, Clone, Default, Serialize, PartialEq)]
pub struct Command {
    /// Speed of the movement.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// Direction of movement as an angle to the current robot heading,
    /// positive to the left.
    ///
    /// Units: radians
    pub direction_rad: f64,

    /// Rotational velocity, positive anticlockwise.
    ///
    /// Units: radians/second
    pub rotation_rads: f64,
}

/// Converts resultant forces into commands.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    min_speed_factor: f64,
    rotation_gain: f64,
    max_angular_velocity_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Command {
    /// The stop command, all fields zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns true if every field of the command is a finite number.
    pub fn is_valid(&self) -> bool {
        self.speed_ms.is_finite()
            && self.direction_rad.is_finite()
            && self.rotation_rads.is_finite()
    }

    /// Returns true if this is the stop command.
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl CommandSynthesizer {
    pub fn new(params: &Params) -> Self {
        Self {
            min_speed_factor: params.min_speed_factor,
            rotation_gain: params.rotation_gain,
            max_angular_velocity_rads: params.max_angular_velocity_rads,
        }
    }

    /// Synthesize a command from the resultant force.
    ///
    /// The direction is the angle of the force in the robot frame. The speed
    /// is the nominal speed, reduced linearly as the direction moves away from
    /// straight ahead. The rotation is proportional to the direction and
    /// clamped to the maximum angular velocity.
    ///
    /// If there is no resultant force the robot keeps going at the nominal
    /// speed in `last_direction_rad` without rotating.
    pub fn synthesize(
        &self,
        resultant: &ForceVector,
        nominal_speed_ms: f64,
        last_direction_rad: f64
    ) -> Command {
        if resultant.norm() < std::f64::EPSILON {
            return Command {
                speed_ms: nominal_speed_ms,
                direction_rad: last_direction_rad,
                rotation_rads: 0.0,
            };
        }

        let direction_rad = wrap_pi(resultant.y.atan2(resultant.x));

        Command {
            speed_ms: nominal_speed_ms * self.speed_factor(direction_rad),
            direction_rad,
            rotation_rads: (self.rotation_gain * direction_rad).clamp(
                -self.max_angular_velocity_rads,
                self.max_angular_velocity_rads
            ),
        }
    }

    /// Get the fraction of the nominal speed to use when moving in the given
    /// direction.
    ///
    /// Falls linearly from 1 at 0 rad to the minimum speed factor at pi rad.
    pub fn speed_factor(&self, direction_rad: f64) -> f64 {
        lin_map((0.0, PI), (1.0, self.min_speed_factor), direction_rad.abs())
            .clamp(self.min_speed_factor, 1.0)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Validate a command before it is sent to actuation.
///
/// If any field is not a finite number the zero command is returned along
/// with `false`, otherwise the command is returned unchanged with `true`.
pub fn validate(cmd: &Command) -> (Command, bool) {
    if cmd.is_valid() {
        return (*cmd, true);
    }

    error!(
        "Non-numerical values in command (speed: {}, direction: {}, rotation: {}), \
        replacing with the stop command",
        cmd.speed_ms, cmd.direction_rad, cmd.rotation_rads
    );

    (Command::zero(), false)
}

/// Map a command onto the actuation message.
pub fn to_move_cmd(cmd: &Command) -> MoveCmd {
    if cmd.is_zero() {
        MoveCmd::Stop
    }
    else {
        MoveCmd::Velocity {
            speed_ms: cmd.speed_ms,
            direction_rad: cmd.direction_rad,
            rate_rads: cmd.rotation_rads,
        }
    }
}
