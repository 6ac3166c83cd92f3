//! Potential field control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use nalgebra::Vector2;
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

// Internal
use super::*;
use crate::path::{Path, PathError};
use util::{module::State, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Potential field controller.
pub struct PfCtrl {
    params: Params,

    /// Executing mode
    mode: PfCtrlMode,

    /// Set once `initialize` has run, a stop doesn't clear it
    initialised: bool,

    force_model: ForceModel,
    synthesizer: CommandSynthesizer,

    /// The path being followed
    path: Option<Path>,

    /// Index of the path point the robot is projected onto. Never decreases
    /// while following the same path.
    proj_index: usize,

    /// The goal point in the map frame
    goal_m: Option<Vector2<f64>>,

    /// Tracking error used in the last cycle
    tracking: TrackingError,

    /// Forces computed in the last cycle
    forces: ForceSet,

    /// Direction of the last valid command, used when no forces act
    last_direction_rad: f64,

    /// Set when a stop is requested through a `StopHandle`
    stop_request: Arc<AtomicBool>,

    observers: Vec<Box<dyn ForceObserver + Send>>,
}

/// Input data for one control cycle.
#[derive(Debug, Clone)]
pub struct InputData {
    /// Tracking error from the path projection
    pub tracking: TrackingError,

    /// Nearest obstacle in each sector
    pub obstacles: ObstacleReading,
}

/// The status report containing the quantities computed in a cycle.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Mode at the end of the cycle
    pub mode: PfCtrlMode,

    /// Tracking error used, with the monotonic projection index applied
    pub tracking: TrackingError,

    /// Goal point in the map frame
    pub goal_m: Option<Vector2<f64>>,

    /// Forces computed in the cycle
    pub forces: ForceSet,

    /// False if the synthesized command failed validation and was replaced
    /// with the stop command
    pub cmd_valid: bool,

    /// True if the path was completed in this cycle
    pub path_complete: bool,

    /// True if a stop request overrode the cycle
    pub stop_override: bool,
}

/// Handle used to stop the controller from outside the control loop, for
/// instance from a safety monitor running on another thread.
#[derive(Debug, Clone)]
pub struct StopHandle {
    request: Arc<AtomicBool>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The possible modes of the controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum PfCtrlMode {
    /// Parameters are loaded but the controller hasn't been initialised
    Uninitialised,

    /// Waiting for a path
    Idle,

    /// Following a path
    Tracking,

    /// Motion stopped, only the stop command is produced until the controller
    /// is initialised or given a new path
    Stopped,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PfCtrl {
    fn default() -> Self {
        let params = Params::default();

        Self {
            force_model: ForceModel::new(&params),
            synthesizer: CommandSynthesizer::new(&params),
            params,
            mode: PfCtrlMode::Uninitialised,
            initialised: false,
            path: None,
            proj_index: 0,
            goal_m: None,
            tracking: TrackingError::default(),
            forces: ForceSet::default(),
            last_direction_rad: 0.0,
            stop_request: Arc::new(AtomicBool::new(false)),
            observers: Vec::new(),
        }
    }
}

impl State for PfCtrl {
    type InitData = String;
    type InitError = PfCtrlError;

    type InputData = InputData;
    type OutputData = Command;
    type StatusReport = StatusReport;
    type ProcError = PfCtrlError;

    /// Initialise the controller.
    ///
    /// Expected init data is the path to the parameter file, relative to the
    /// parameter directory.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let params: Params = params::load(&init_data)
            .map_err(PfCtrlError::ParamLoadError)?;

        self.set_params(params)?;
        self.initialize();

        Ok(())
    }

    /// Perform one control cycle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.compute_move_command(input_data)
    }
}

impl PfCtrl {
    /// Create a new, uninitialised, controller with the given parameters.
    pub fn new(params: Params) -> Result<Self, PfCtrlError> {
        let mut ctrl = Self::default();
        ctrl.set_params(params)?;
        Ok(ctrl)
    }

    /// Replace the parameters, taking effect from the next cycle.
    pub fn set_params(&mut self, params: Params) -> Result<(), PfCtrlError> {
        params.validate().map_err(PfCtrlError::InvalidParams)?;

        self.force_model = ForceModel::new(&params);
        self.synthesizer = CommandSynthesizer::new(&params);
        self.params = params;

        // The lookahead may have changed
        self.goal_m = self.lookahead_goal();

        Ok(())
    }

    /// Add an observer which will receive the forces of each cycle.
    pub fn add_observer(&mut self, observer: Box<dyn ForceObserver + Send>) {
        self.observers.push(observer);
    }

    /// Get a handle which can stop the controller from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            request: self.stop_request.clone(),
        }
    }

    /// Initialise the controller, clearing all tracking state and any path.
    ///
    /// The controller moves into `Idle` mode.
    pub fn initialize(&mut self) {
        self.path = None;
        self.clear_tracking();
        self.goal_m = None;
        self.stop_request.store(false, Ordering::SeqCst);
        self.initialised = true;

        self.set_mode(PfCtrlMode::Idle);
    }

    /// Begin following a new path.
    ///
    /// The projection index is reset to the start of the path and the goal to
    /// the first lookahead point. The controller moves into `Tracking` mode,
    /// cancelling any previous stop.
    pub fn set_path(&mut self, path: Path) -> Result<(), PfCtrlError> {
        if !self.initialised {
            return Err(PfCtrlError::NotInitialised);
        }

        path.check().map_err(PfCtrlError::InvalidPath)?;

        info!(
            "New path with {} points ({:.2} m)",
            path.get_num_points(),
            path.get_length().unwrap_or(0.0)
        );

        self.path = Some(path);
        self.clear_tracking();
        self.goal_m = self.lookahead_goal();
        self.stop_request.store(false, Ordering::SeqCst);

        self.set_mode(PfCtrlMode::Tracking);

        Ok(())
    }

    /// Clear the tracking state, keeping the current path and mode.
    ///
    /// The goal returns to the first lookahead point of the path.
    pub fn reset(&mut self) {
        self.clear_tracking();
        self.goal_m = self.lookahead_goal();

        debug!("PfCtrl tracking state reset");
    }

    /// Immediately stop any motion.
    ///
    /// Returns the stop command. Only the stop command will be produced until
    /// the controller is initialised or given a new path.
    pub fn stop_motion(&mut self) -> Command {
        self.stop_request.store(true, Ordering::SeqCst);
        self.set_mode(PfCtrlMode::Stopped);

        Command::zero()
    }

    /// Compute the command for this cycle.
    ///
    /// Processing involves:
    ///  1. Advancing the projection index and goal point
    ///  1. Checking for completion of the path
    ///  1. Computing the forces
    ///  1. Synthesizing and validating the command
    ///
    /// In `Stopped` mode the stop command is returned. In `Idle` or
    /// `Uninitialised` mode a `NotTracking` error is returned.
    pub fn compute_move_command(
        &mut self,
        input: &InputData
    ) -> Result<(Command, StatusReport), PfCtrlError> {

        // A stop requested since the last cycle takes effect before anything
        // else
        if self.take_stop_request() {
            return Ok((Command::zero(), self.report(true, false, true)));
        }

        match self.mode {
            PfCtrlMode::Tracking => (),
            PfCtrlMode::Stopped => return Ok((Command::zero(), self.report(true, false, false))),
            m => return Err(PfCtrlError::NotTracking(m))
        }

        if input.obstacles.num_sectors() != self.params.num_sectors {
            return Err(PfCtrlError::SectorCountMismatch {
                expected: self.params.num_sectors,
                found: input.obstacles.num_sectors()
            });
        }

        // ---- TARGET MANAGEMENT ----

        let (goal_p, path_complete) = {
            let path = match self.path {
                Some(ref p) => p,
                None => return Err(PfCtrlError::InvalidPath(PathError::NotEnoughPoints(0)))
            };

            // Can't underflow, the path was checked when set
            let last_index = path.get_num_points() - 1;

            if input.tracking.proj_index < self.proj_index {
                debug!(
                    "Projection index {} is behind the current index {}, keeping the current one",
                    input.tracking.proj_index, self.proj_index
                );
            }
            self.proj_index = input.tracking.proj_index.max(self.proj_index).min(last_index);

            self.tracking = TrackingError {
                proj_index: self.proj_index,
                ..input.tracking
            };

            let goal_index = path
                .lookahead_index(self.proj_index, self.params.lookahead_dist_m)
                .unwrap_or(last_index);
            let goal_m = path.points_m[goal_index];
            self.goal_m = Some(goal_m);

            let goal_p = path
                .to_path_frame(self.proj_index, &goal_m)
                .ok_or(PfCtrlError::InvalidPath(PathError::Degenerate))?;

            // The path is complete once the robot is projected onto the final
            // point and is within tolerance of it
            let path_complete = self.proj_index == last_index
                && self.tracking.lat_error_m.abs() <= self.params.goal_tolerance_m;

            (goal_p, path_complete)
        };

        if path_complete {
            info!("Path complete");
            self.forces = ForceSet::default();
            self.set_mode(PfCtrlMode::Idle);
            return Ok((Command::zero(), self.report(true, true, false)));
        }

        // ---- FORCES ----

        let forces = self.force_model.compute(&goal_p, &self.tracking, &input.obstacles);
        self.forces = forces;

        // ---- COMMAND GENERATION ----

        let raw_cmd = self.synthesizer.synthesize(
            &forces.resultant,
            self.params.nominal_speed_ms,
            self.last_direction_rad
        );

        let (cmd, cmd_valid) = validate(&raw_cmd);

        if cmd_valid {
            self.last_direction_rad = cmd.direction_rad;
        }

        for observer in self.observers.iter_mut() {
            observer.observe_forces(&forces, cmd_valid);
            if !cmd_valid {
                observer.invalid_command(&raw_cmd);
            }
        }

        // A stop requested while this cycle was computed overrides it
        if self.take_stop_request() {
            return Ok((Command::zero(), self.report(cmd_valid, false, true)));
        }

        debug!(
            "PfCtrl command: speed {:.3} m/s, direction {:.3} rad, rotation {:.3} rad/s",
            cmd.speed_ms, cmd.direction_rad, cmd.rotation_rads
        );

        Ok((cmd, self.report(cmd_valid, false, false)))
    }

    /// Current mode of the controller.
    pub fn mode(&self) -> PfCtrlMode {
        self.mode
    }

    /// Current projection index.
    pub fn proj_index(&self) -> usize {
        self.proj_index
    }

    /// Current goal point in the map frame.
    pub fn goal_position(&self) -> Option<Vector2<f64>> {
        self.goal_m
    }

    /// Forces computed in the last cycle.
    pub fn forces(&self) -> &ForceSet {
        &self.forces
    }

    /// The path being followed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    fn set_mode(&mut self, mode: PfCtrlMode) {
        if self.mode != mode {
            info!("PfCtrl mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    fn clear_tracking(&mut self) {
        self.proj_index = 0;
        self.tracking = TrackingError::default();
        self.forces = ForceSet::default();
        self.last_direction_rad = 0.0;
    }

    /// The lookahead point from the current projection index.
    fn lookahead_goal(&self) -> Option<Vector2<f64>> {
        let path = self.path.as_ref()?;
        path.lookahead_index(self.proj_index, self.params.lookahead_dist_m)
            .map(|i| path.points_m[i])
    }

    /// Check for an outstanding stop request, moving into `Stopped` mode if
    /// there is one.
    ///
    /// The request stays set until the controller is initialised or given a
    /// new path, but only triggers the transition once. An uninitialised
    /// controller has no motion to stop and ignores it.
    fn take_stop_request(&mut self) -> bool {
        let active = !matches!(self.mode, PfCtrlMode::Stopped | PfCtrlMode::Uninitialised);

        if active && self.stop_request.load(Ordering::SeqCst) {
            warn!("Stop requested, stopping motion");
            self.set_mode(PfCtrlMode::Stopped);
            self.forces = ForceSet::default();
            true
        }
        else {
            false
        }
    }

    fn report(&self, cmd_valid: bool, path_complete: bool, stop_override: bool) -> StatusReport {
        StatusReport {
            mode: self.mode,
            tracking: self.tracking,
            goal_m: self.goal_m,
            forces: self.forces,
            cmd_valid,
            path_complete,
            stop_override,
        }
    }
}

impl StopHandle {
    /// Request that the controller stops. The next cycle will produce the stop
    /// command.
    pub fn stop(&self) {
        self.request.store(true, Ordering::SeqCst);
    }

    /// Returns true if a stop has been requested and not yet cleared.
    pub fn is_stop_requested(&self) -> bool {
        self.request.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    /// Observer counting the cycles, the cycles flagged invalid and the
    /// rejected commands it has been given.
    struct CountingObserver {
        counts: Arc<Mutex<(usize, usize, usize)>>,
    }

    impl ForceObserver for CountingObserver {
        fn observe_forces(&mut self, _forces: &ForceSet, cmd_valid: bool) {
            let mut counts = self.counts.lock().unwrap();
            counts.0 += 1;
            if !cmd_valid {
                counts.1 += 1;
            }
        }

        fn invalid_command(&mut self, _cmd: &Command) {
            self.counts.lock().unwrap().2 += 1;
        }
    }

    fn straight_path() -> Path {
        Path::direct(Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0), 0.5).unwrap()
    }

    fn input(proj_index: usize) -> InputData {
        InputData {
            tracking: TrackingError {
                proj_index,
                ..Default::default()
            },
            obstacles: ObstacleReading::empty(2),
        }
    }

    fn tracking_ctrl() -> PfCtrl {
        let mut ctrl = PfCtrl::new(Params::default()).unwrap();
        ctrl.initialize();
        ctrl.set_path(straight_path()).unwrap();
        ctrl
    }

    #[test]
    fn test_lifecycle_contract() {
        let mut ctrl = PfCtrl::new(Params::default()).unwrap();
        assert_eq!(ctrl.mode(), PfCtrlMode::Uninitialised);

        match ctrl.compute_move_command(&input(0)) {
            Err(PfCtrlError::NotTracking(PfCtrlMode::Uninitialised)) => (),
            r => panic!("Expected NotTracking, got {:?}", r)
        }
        match ctrl.set_path(straight_path()) {
            Err(PfCtrlError::NotInitialised) => (),
            r => panic!("Expected NotInitialised, got {:?}", r)
        }

        ctrl.initialize();
        assert_eq!(ctrl.mode(), PfCtrlMode::Idle);
        match ctrl.compute_move_command(&input(0)) {
            Err(PfCtrlError::NotTracking(PfCtrlMode::Idle)) => (),
            r => panic!("Expected NotTracking, got {:?}", r)
        }

        match ctrl.set_path(Path::new(vec![Vector2::new(0.0, 0.0)])) {
            Err(PfCtrlError::InvalidPath(PathError::NotEnoughPoints(1))) => (),
            r => panic!("Expected InvalidPath, got {:?}", r)
        }
        assert_eq!(ctrl.mode(), PfCtrlMode::Idle);

        ctrl.set_path(straight_path()).unwrap();
        assert_eq!(ctrl.mode(), PfCtrlMode::Tracking);
        assert_eq!(ctrl.proj_index(), 0);
        assert_eq!(ctrl.goal_position(), Some(Vector2::new(1.0, 0.0)));
    }

    #[test]
    fn test_stop_before_initialise() {
        let mut ctrl = PfCtrl::new(Params::default()).unwrap();

        // A stop request doesn't stand in for initialisation
        ctrl.stop_handle().stop();
        match ctrl.compute_move_command(&input(0)) {
            Err(PfCtrlError::NotTracking(PfCtrlMode::Uninitialised)) => (),
            r => panic!("Expected NotTracking, got {:?}", r)
        }
        assert_eq!(ctrl.mode(), PfCtrlMode::Uninitialised);

        ctrl.stop_motion();
        assert_eq!(ctrl.mode(), PfCtrlMode::Stopped);
        match ctrl.set_path(straight_path()) {
            Err(PfCtrlError::NotInitialised) => (),
            r => panic!("Expected NotInitialised, got {:?}", r)
        }

        // Initialising clears the outstanding request
        ctrl.initialize();
        ctrl.set_path(straight_path()).unwrap();
        let (cmd, report) = ctrl.compute_move_command(&input(0)).unwrap();
        assert!(!cmd.is_zero());
        assert!(!report.stop_override);
    }

    #[test]
    fn test_invalid_params() {
        match PfCtrl::new(Params { k_rep: 0.0, ..Default::default() }) {
            Err(PfCtrlError::InvalidParams(ParamsError::NotPositive("k_rep"))) => (),
            Err(e) => panic!("Unexpected error {}", e),
            Ok(_) => panic!("Expected the parameters to be rejected")
        }
    }

    #[test]
    fn test_goal_ahead_no_obstacles() {
        let mut ctrl = tracking_ctrl();

        let (cmd, report) = ctrl.compute_move_command(&input(0)).unwrap();

        assert_eq!(cmd.direction_rad, 0.0);
        assert_eq!(cmd.rotation_rads, 0.0);
        assert_eq!(cmd.speed_ms, 0.3);
        assert!(report.cmd_valid);
        assert_eq!(report.mode, PfCtrlMode::Tracking);
        assert_eq!(report.forces.repulsive, ForceVector::zeros());
        assert_eq!(report.forces.resultant, report.forces.attractive);
    }

    #[test]
    fn test_stop_motion() {
        let mut ctrl = tracking_ctrl();

        assert_eq!(ctrl.stop_motion(), Command::zero());
        assert_eq!(ctrl.mode(), PfCtrlMode::Stopped);

        for _ in 0..3 {
            let (cmd, report) = ctrl.compute_move_command(&input(1)).unwrap();
            assert!(cmd.is_zero());
            assert_eq!(report.mode, PfCtrlMode::Stopped);
        }

        // Reset doesn't resume
        ctrl.reset();
        assert_eq!(ctrl.mode(), PfCtrlMode::Stopped);
        assert!(ctrl.compute_move_command(&input(1)).unwrap().0.is_zero());

        // A new path does
        ctrl.set_path(straight_path()).unwrap();
        let (cmd, _) = ctrl.compute_move_command(&input(0)).unwrap();
        assert!(!cmd.is_zero());

        // As does initialising and setting a path
        ctrl.stop_motion();
        ctrl.initialize();
        assert_eq!(ctrl.mode(), PfCtrlMode::Idle);
        ctrl.set_path(straight_path()).unwrap();
        assert!(!ctrl.compute_move_command(&input(0)).unwrap().0.is_zero());
    }

    #[test]
    fn test_stop_handle() {
        let mut ctrl = tracking_ctrl();
        let handle = ctrl.stop_handle();

        assert!(!ctrl.compute_move_command(&input(0)).unwrap().0.is_zero());

        std::thread::spawn(move || handle.stop()).join().unwrap();

        let (cmd, report) = ctrl.compute_move_command(&input(0)).unwrap();
        assert!(cmd.is_zero());
        assert!(report.stop_override);
        assert_eq!(ctrl.mode(), PfCtrlMode::Stopped);

        let (cmd, report) = ctrl.compute_move_command(&input(0)).unwrap();
        assert!(cmd.is_zero());
        assert!(!report.stop_override);

        ctrl.set_path(straight_path()).unwrap();
        assert!(!ctrl.stop_handle().is_stop_requested());
    }

    #[test]
    fn test_projection_index_monotonic() {
        let mut ctrl = tracking_ctrl();

        ctrl.compute_move_command(&input(5)).unwrap();
        assert_eq!(ctrl.proj_index(), 5);
        assert_eq!(ctrl.goal_position(), Some(Vector2::new(3.5, 0.0)));

        let (_, report) = ctrl.compute_move_command(&input(3)).unwrap();
        assert_eq!(ctrl.proj_index(), 5);
        assert_eq!(report.tracking.proj_index, 5);

        // Indices past the end are clamped to the final point
        let mut ctrl = tracking_ctrl();
        let (cmd, report) = ctrl.compute_move_command(&InputData {
            tracking: TrackingError {
                lat_error_m: 1.0,
                head_error_rad: 0.0,
                proj_index: 100
            },
            obstacles: ObstacleReading::empty(2),
        }).unwrap();
        assert_eq!(ctrl.proj_index(), 20);
        assert!(!report.path_complete);
        assert!(cmd.is_valid());
    }

    #[test]
    fn test_set_path_mid_tracking() {
        let mut ctrl = tracking_ctrl();

        ctrl.compute_move_command(&input(8)).unwrap();
        assert_eq!(ctrl.proj_index(), 8);

        let new_path = Path::direct(Vector2::new(0.0, 0.0), Vector2::new(0.0, 5.0), 0.25).unwrap();
        ctrl.set_path(new_path).unwrap();

        assert_eq!(ctrl.mode(), PfCtrlMode::Tracking);
        assert_eq!(ctrl.proj_index(), 0);
        assert_eq!(ctrl.goal_position(), Some(Vector2::new(0.0, 1.0)));
    }

    #[test]
    fn test_reset() {
        let mut ctrl = tracking_ctrl();

        ctrl.compute_move_command(&input(6)).unwrap();
        ctrl.reset();

        assert_eq!(ctrl.mode(), PfCtrlMode::Tracking);
        assert_eq!(ctrl.proj_index(), 0);
        assert_eq!(ctrl.forces(), &ForceSet::default());
        assert_eq!(ctrl.goal_position(), Some(Vector2::new(1.0, 0.0)));
        assert!(ctrl.path().is_some());
    }

    #[test]
    fn test_path_complete() {
        let mut ctrl = tracking_ctrl();

        let (cmd, report) = ctrl.compute_move_command(&InputData {
            tracking: TrackingError {
                lat_error_m: 0.05,
                head_error_rad: 0.2,
                proj_index: 20
            },
            obstacles: ObstacleReading::empty(2),
        }).unwrap();

        assert!(cmd.is_zero());
        assert!(report.path_complete);
        assert_eq!(ctrl.mode(), PfCtrlMode::Idle);
    }

    #[test]
    fn test_sector_mismatch() {
        let mut ctrl = tracking_ctrl();

        match ctrl.compute_move_command(&InputData {
            tracking: TrackingError::default(),
            obstacles: ObstacleReading::empty(3),
        }) {
            Err(PfCtrlError::SectorCountMismatch { expected: 2, found: 3 }) => (),
            r => panic!("Expected a sector mismatch, got {:?}", r)
        }
    }

    #[test]
    fn test_invalid_command_replaced() {
        let mut ctrl = tracking_ctrl();
        let counts = Arc::new(Mutex::new((0, 0, 0)));
        ctrl.add_observer(Box::new(CountingObserver { counts: counts.clone() }));

        let (cmd, report) = ctrl.compute_move_command(&InputData {
            tracking: TrackingError {
                lat_error_m: std::f64::NAN,
                head_error_rad: 0.0,
                proj_index: 0
            },
            obstacles: ObstacleReading::empty(2),
        }).unwrap();

        assert_eq!(cmd, Command::zero());
        assert!(!report.cmd_valid);
        assert_eq!(*counts.lock().unwrap(), (1, 1, 1));

        // The next sane cycle recovers
        let (cmd, report) = ctrl.compute_move_command(&input(0)).unwrap();
        assert!(report.cmd_valid);
        assert_eq!(cmd.speed_ms, 0.3);
        assert_eq!(*counts.lock().unwrap(), (2, 1, 1));
    }

    #[test]
    fn test_set_params_between_cycles() {
        let mut ctrl = tracking_ctrl();

        ctrl.set_params(Params {
            nominal_speed_ms: 0.5,
            lookahead_dist_m: 2.0,
            ..Default::default()
        }).unwrap();
        assert_eq!(ctrl.goal_position(), Some(Vector2::new(2.0, 0.0)));

        let (cmd, _) = ctrl.compute_move_command(&input(0)).unwrap();
        assert_eq!(cmd.speed_ms, 0.5);

        assert!(ctrl.set_params(Params { num_sectors: 0, ..Default::default() }).is_err());
        assert_eq!(ctrl.params().nominal_speed_ms, 0.5);
    }
}
