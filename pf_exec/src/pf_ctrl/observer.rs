//! # Force observers
//!
//! Observers receive the forces of each cycle for visualisation or archiving.
//! They are purely outputs of the controller, nothing they hold is read back.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{trace, warn};
use serde::Serialize;
use std::path::Path;

// Internal
use super::{Command, ForceSet};
use util::archive::{ArchiveError, Archiver};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Receives the data produced by the controller each cycle.
pub trait ForceObserver {
    /// Called once per cycle with the forces computed in that cycle and
    /// whether the command synthesized from them passed validation.
    fn observe_forces(&mut self, forces: &ForceSet, cmd_valid: bool);

    /// Called after `observe_forces` when the command failed validation and
    /// was replaced with the stop command.
    fn invalid_command(&mut self, _cmd: &Command) {}
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Observer writing the forces to a CSV archive, one row per cycle.
pub struct ForceArchive {
    arch: Archiver,
    cycle: u64,
}

/// Observer logging the forces at trace level.
#[derive(Default)]
pub struct ForceLog;

/// Flat record of the forces, as written by [`ForceArchive`].
#[derive(Serialize)]
struct ForceRecord {
    cycle: u64,
    att_x: f64,
    att_y: f64,
    rep_x: f64,
    rep_y: f64,
    res_x: f64,
    res_y: f64,
    cmd_valid: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ForceArchive {
    /// Create a new archive at `pf_ctrl/forces.csv` within the archive root.
    pub fn new<P: AsRef<Path>>(arch_root: P) -> Result<Self, ArchiveError> {
        Ok(Self {
            arch: Archiver::from_path(arch_root, "pf_ctrl/forces.csv")?,
            cycle: 0,
        })
    }
}

impl ForceObserver for ForceArchive {
    fn observe_forces(&mut self, forces: &ForceSet, cmd_valid: bool) {
        self.cycle += 1;

        let record = ForceRecord {
            cycle: self.cycle,
            att_x: forces.attractive.x,
            att_y: forces.attractive.y,
            rep_x: forces.repulsive.x,
            rep_y: forces.repulsive.y,
            res_x: forces.resultant.x,
            res_y: forces.resultant.y,
            cmd_valid,
        };

        // Failures are only logged, control carries on
        if let Err(e) = self.arch.serialise(record) {
            warn!("Could not archive forces: {}", e);
        }
    }
}

impl ForceObserver for ForceLog {
    fn observe_forces(&mut self, forces: &ForceSet, cmd_valid: bool) {
        trace!(
            "FAtt: [{:.4}, {:.4}], FRep: [{:.4}, {:.4}], FRes: [{:.4}, {:.4}], valid: {}",
            forces.attractive.x, forces.attractive.y,
            forces.repulsive.x, forces.repulsive.y,
            forces.resultant.x, forces.resultant.y,
            cmd_valid
        );
    }

    fn invalid_command(&mut self, cmd: &Command) {
        trace!(
            "Rejected command: speed {}, direction {}, rotation {}",
            cmd.speed_ms, cmd.direction_rad, cmd.rotation_rads
        );
    }
}
