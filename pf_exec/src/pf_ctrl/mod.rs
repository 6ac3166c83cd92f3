//! # Potential field control module
//!
//! Potential field control keeps the robot on the reference path while
//! steering it clear of nearby obstacles. Each cycle the robot is treated as a
//! particle in a field of forces:
//!
//! - an attractive force pulls it towards a goal point a fixed arc length
//!   ahead of its projection onto the path,
//! - a repulsive force pushes it away from the nearest obstacle in each
//!   sector around it, growing as the obstacle gets closer.
//!
//! The sum of these forces gives the direction the robot should move in. The
//! speed is the nominal cruise speed, reduced as the direction swings away
//! from straight ahead, and the rotation rate follows the direction up to the
//! maximum angular velocity.
//!
//! Every command passes through a validation step which replaces any command
//! containing non-numerical values with the stop command, so that only finite
//! values ever reach actuation.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod cmd;
pub mod force;
pub mod observer;
pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use force::*;
pub use observer::*;
pub use params::{Params, ParamsError};
pub use state::*;

use crate::path::PathError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The minimum number of obstacle sectors.
pub const MIN_NUM_SECTORS: usize = 2;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum PfCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(ParamsError),

    /// The controller must be initialised before a path can be set.
    #[error("The controller has not been initialised")]
    NotInitialised,

    /// A move command was requested while not following a path.
    #[error("Cannot compute a move command in {0:?} mode")]
    NotTracking(PfCtrlMode),

    /// The path given to the controller cannot be followed.
    #[error("Invalid path: {0}")]
    InvalidPath(PathError),

    /// The obstacle reading doesn't have the configured number of sectors.
    #[error("Expected {expected} obstacle sectors, found {found}")]
    SectorCountMismatch {
        expected: usize,
        found: usize
    },
}
