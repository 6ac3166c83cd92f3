//! Host platform utility functions

use std::env::{self, VarError};
use std::path::PathBuf;

/// Name of the environment variable pointing at the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "PF_NAV_ROOT";

/// Get the root directory of the software, which contains the `params` and
/// `sessions` directories.
pub fn get_pf_nav_root() -> Result<PathBuf, VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
