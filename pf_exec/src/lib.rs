//! # Potential field navigation library.
//!
//! This library allows the executable, tests and benchmarks to access the
//! potential field controller and its collaborators.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Localisation - the robot's pose and frame conversions
pub mod loc;

/// Paths - reference paths and the projection of the robot onto them
pub mod path;

/// Potential field control module - keeps the robot on the path and away from obstacles
pub mod pf_ctrl;
