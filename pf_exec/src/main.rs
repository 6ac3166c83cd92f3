//! Potential field navigation executable entry point.
//!
//! Runs the controller in closed loop against a simulated robot following a
//! straight path, with optional point obstacles placed in the map.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logger and controller
//!     - Main loop:
//!         - Project the simulated pose onto the path
//!         - Sense the obstacles around the robot
//!         - Potential field control processing
//!         - Actuation of the simulated robot

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use log::{debug, info, warn};
use nalgebra::Vector2;
use std::path::PathBuf;
use structopt::StructOpt;

// Internal
use pf_lib::{
    loc::Pose,
    path::Path,
    pf_ctrl::{self, ForceArchive, ForceLog, InputData, ObstacleReading, PfCtrl},
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Period of one simulated cycle.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Separation of the points in the generated path.
const PATH_POINT_SEP_M: f64 = 0.1;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "pf_exec", about = "Potential field navigation along a straight path")]
struct Args {
    /// Parameter file to load instead of `pf_ctrl.toml` in the parameter
    /// directory
    #[structopt(short, long, parse(from_os_str))]
    params: Option<PathBuf>,

    /// Maximum number of cycles to run
    #[structopt(short = "n", long, default_value = "1000")]
    num_cycles: u64,

    /// X coordinate of the goal, the path starts at the origin
    #[structopt(long, default_value = "5.0", allow_hyphen_values = true)]
    goal_x: f64,

    /// Y coordinate of the goal
    #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
    goal_y: f64,

    /// Obstacle position in the map frame, may be repeated
    #[structopt(short, long, number_of_values = 2, allow_hyphen_values = true)]
    obstacle: Vec<f64>,

    /// Minimum level of the log
    #[structopt(short, long, default_value = "debug")]
    log_level: LevelFilter,

    /// Directory to create the session in, defaults to `sessions` in the
    /// software root
    #[structopt(long, parse(from_os_str))]
    sessions_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = match args.sessions_dir {
        Some(ref dir) => Session::in_dir("pf_exec", dir.clone()),
        None => Session::new("pf_exec", "sessions"),
    }.wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(args.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Potential Field Navigation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", args);

    // ---- INITIALISE CONTROLLER ----

    let mut ctrl = match args.params {
        Some(ref path) => {
            let params = util::params::load_from_path(path)
                .wrap_err("Could not load PfCtrl params")?;
            let mut ctrl = PfCtrl::new(params)
                .wrap_err("Invalid PfCtrl params")?;
            ctrl.initialize();
            ctrl
        },
        None => {
            let mut ctrl = PfCtrl::default();
            ctrl.init("pf_ctrl.toml".into())
                .wrap_err("Failed to initialise PfCtrl")?;
            ctrl
        }
    };

    ctrl.add_observer(Box::new(
        ForceArchive::new(&session.arch_root)
            .wrap_err("Failed to create the force archive")?
    ));
    ctrl.add_observer(Box::new(ForceLog::default()));

    info!("PfCtrl init complete");

    // ---- SIMULATION SETUP ----

    let goal_m = Vector2::new(args.goal_x, args.goal_y);
    let obstacles_m: Vec<Vector2<f64>> = args
        .obstacle
        .chunks_exact(2)
        .map(|o| Vector2::new(o[0], o[1]))
        .collect();

    let mut pose = Pose::default();

    let path = Path::direct(pose.position_m, goal_m, PATH_POINT_SEP_M)
        .wrap_err("Could not build the path")?;
    ctrl.set_path(path)
        .wrap_err("PfCtrl rejected the path")?;

    info!(
        "Following path to [{:.2}, {:.2}] with {} obstacles\n",
        goal_m.x, goal_m.y, obstacles_m.len()
    );

    // ---- MAIN LOOP ----

    for cycle in 0..args.num_cycles {

        // ---- DATA INPUT ----

        let tracking = match ctrl.path() {
            Some(p) => p.project(&pose, ctrl.proj_index())
                .wrap_err("Could not project the pose onto the path")?,
            None => return Err(eyre!("PfCtrl has no path"))
        };

        let obstacles_rb: Vec<Vector2<f64>> = obstacles_m
            .iter()
            .map(|o| pose.to_robot_frame(o))
            .collect();

        let input = InputData {
            tracking,
            obstacles: ObstacleReading::from_points(&obstacles_rb, ctrl.params().num_sectors),
        };

        // ---- CONTROL PROCESSING ----

        let (cmd, report) = ctrl.proc(&input)
            .wrap_err("Error during PfCtrl processing")?;

        if !report.cmd_valid {
            warn!("Cycle {}: command replaced with stop", cycle);
        }

        let move_cmd = pf_ctrl::to_move_cmd(&cmd);
        debug!(
            "Cycle {}: pose [{:.3}, {:.3}, {:.3}], cmd {}",
            cycle,
            pose.position_m.x,
            pose.position_m.y,
            pose.heading_rad,
            move_cmd.to_json().wrap_err("Could not serialise the move command")?
        );

        // ---- ACTUATION ----

        pose.integrate(cmd.speed_ms, cmd.direction_rad, cmd.rotation_rads, CYCLE_PERIOD_S);

        if report.path_complete {
            info!(
                "Path complete after {} cycles, final position [{:.3}, {:.3}]",
                cycle + 1, pose.position_m.x, pose.position_m.y
            );
            return Ok(());
        }
    }

    warn!("Path not completed after {} cycles", args.num_cycles);

    Ok(())
}
