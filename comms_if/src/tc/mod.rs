//! # Telecommand module
//!
//! Commands sent from the navigation software to the actuation software.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod move_ctrl;
