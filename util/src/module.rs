//! Cyclic module interface
//!
//! Modules run by an executable's control loop (such as `pf_ctrl`) are
//! configured once through [`State::init`] and then stepped once per cycle
//! through [`State::proc`].

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// A module stepped by the control loop.
pub trait State {
    /// Configuration consumed by `init`, e.g. a parameter file name.
    type InitData;
    type InitError;

    /// Sensed data consumed by each cycle.
    type InputData;
    /// Demand produced by each cycle.
    type OutputData;
    /// Quantities computed during the cycle, for telemetry and tests.
    type StatusReport;
    type ProcError;

    /// Configure the module, leaving it ready to be stepped.
    fn init(&mut self, init_data: Self::InitData)
        -> Result<(), Self::InitError>;

    /// Run one cycle, returning the demand and a report of the cycle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
