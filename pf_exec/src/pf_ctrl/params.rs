//! Potential field controller parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::MIN_NUM_SECTORS;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the potential field controller.
///
/// Missing fields in a parameter file take their default value.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Params {

    // ---- FORCES ----

    /// Attractive force gain
    pub k_att: f64,

    /// Repulsive force gain
    pub k_rep: f64,

    /// Growth of the attractive force per radian of heading error, relative
    /// to the distance to the goal.
    ///
    /// Units: meters/radian
    pub k_head: f64,

    /// Number of obstacle sectors around the robot. Sectors split the full
    /// circle into equal bearing ranges, starting from directly behind and
    /// moving anticlockwise, so two sectors are right and left.
    pub num_sectors: usize,

    /// Obstacles closer than this produce the same repulsion as an obstacle at
    /// this distance.
    ///
    /// Units: meters
    pub min_obstacle_dist_m: f64,

    /// Obstacles further than this produce no repulsion. If not set all
    /// obstacles are considered.
    ///
    /// Units: meters
    pub obstacle_influence_dist_m: Option<f64>,

    // ---- GOAL ----

    /// Arc length along the path between the projection point and the goal.
    ///
    /// Units: meters
    pub lookahead_dist_m: f64,

    /// Distance from the final path point under which the path is complete.
    ///
    /// Units: meters
    pub goal_tolerance_m: f64,

    // ---- COMMAND ----

    /// Nominal cruise speed.
    ///
    /// Units: meters/second
    pub nominal_speed_ms: f64,

    /// Fraction of the nominal speed used when the resultant force points
    /// directly backwards. The speed factor falls linearly from 1 (force
    /// straight ahead) to this value.
    pub min_speed_factor: f64,

    /// Rotational velocity demanded per radian of movement direction.
    ///
    /// Units: 1/second
    pub rotation_gain: f64,

    /// Maximum rotational velocity.
    ///
    /// Units: radians/second
    pub max_angular_velocity_rads: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An invalid parameter value, the contained string names the parameter.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParamsError {
    #[error("Parameter `{0}` must be positive and finite")]
    NotPositive(&'static str),

    #[error("Parameter `{0}` must be non-negative and finite")]
    Negative(&'static str),

    #[error("Parameter `{0}` must be between 0 and 1")]
    NotAFraction(&'static str),

    #[error("Found {0} obstacle sectors (expected at least {})", MIN_NUM_SECTORS)]
    TooFewSectors(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            k_att: 0.2,
            k_rep: 0.5,
            k_head: 0.5,
            num_sectors: 2,
            min_obstacle_dist_m: 0.05,
            obstacle_influence_dist_m: None,
            lookahead_dist_m: 1.0,
            goal_tolerance_m: 0.1,
            nominal_speed_ms: 0.3,
            min_speed_factor: 0.0,
            rotation_gain: 1.0,
            max_angular_velocity_rads: 0.8,
        }
    }
}

impl Params {
    /// Check that all parameters are within their allowed ranges.
    pub fn validate(&self) -> Result<(), ParamsError> {
        fn positive(value: f64, name: &'static str) -> Result<(), ParamsError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            }
            else {
                Err(ParamsError::NotPositive(name))
            }
        }

        fn non_negative(value: f64, name: &'static str) -> Result<(), ParamsError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            }
            else {
                Err(ParamsError::Negative(name))
            }
        }

        positive(self.k_att, "k_att")?;
        positive(self.k_rep, "k_rep")?;
        non_negative(self.k_head, "k_head")?;
        positive(self.min_obstacle_dist_m, "min_obstacle_dist_m")?;
        if let Some(d) = self.obstacle_influence_dist_m {
            positive(d, "obstacle_influence_dist_m")?;
        }
        non_negative(self.lookahead_dist_m, "lookahead_dist_m")?;
        positive(self.goal_tolerance_m, "goal_tolerance_m")?;
        non_negative(self.nominal_speed_ms, "nominal_speed_ms")?;
        positive(self.rotation_gain, "rotation_gain")?;
        positive(self.max_angular_velocity_rads, "max_angular_velocity_rads")?;

        if !(0.0..=1.0).contains(&self.min_speed_factor) {
            return Err(ParamsError::NotAFraction("min_speed_factor"));
        }

        if self.num_sectors < MIN_NUM_SECTORS {
            return Err(ParamsError::TooFewSectors(self.num_sectors));
        }

        Ok(())
    }
}
