//! # Communications interface crate.
//!
//! Provides the messages exchanged between the navigation controller and the
//! rest of the robot software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Telecommands consumed by the actuation side of the robot
pub mod tc;
