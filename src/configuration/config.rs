//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – integrator choice and progress reporting
//! - [`ParametersConfig`] – time span and step size
//! - [`LatticeConfig`]    – hexagonal lattice geometry, point mass, spring stiffness
//! - [`HingeConfig`]      – optional angular constraints
//! - [`SqueezeConfig`]    – optional boundary velocities
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   integrator: "verlet"    # or "euler"
//!   progress: true
//!
//! parameters:
//!   t_end: 100.0            # total simulation time
//!   dt: 0.01                # fixed step size
//!
//! lattice:
//!   rows: 4
//!   cols: 4
//!   l1: 1.0                 # between-row edge length
//!   l2: 1.0                 # zig-zag edge length
//!   alpha_deg: 120.0        # zig-zag opening angle
//!   mass: 1.0
//!   k: 1.0
//!
//! hinges:                   # optional
//!   k: 0.1
//!   rest_angle_deg: 60.0    # optional, omit to keep the initial angles
//!   axis: "x"
//!
//! squeeze:                  # optional
//!   axis: "x"
//!   velocity_axis: "y"
//!   speed: 0.05
//! ```
//!
//! The scenario builder maps this configuration into the runtime
//! [`Engine`](crate::simulation::engine::Engine) and
//! [`Parameters`](crate::simulation::params::Parameters).

use serde::{Deserialize, Serialize};

use crate::simulation::vector::Axis;

/// Which integrator method used by the engine
/// integrator: "euler"` or `integrator: "verlet"
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorConfig {
    #[serde(rename = "euler")] // Explicit (forward) Euler. First order, energy drifts upward
    Euler,

    #[serde(rename = "verlet")] // Velocity Verlet. Second order and symplectic, bounded energy error
    Verlet,
}

/// High-level engine configuration
#[derive(Deserialize, Debug)]
pub struct EngineConfig {
    pub integrator: IntegratorConfig, // Time integrator used for advancing the system state
    #[serde(default)]
    pub progress: bool, // `true` - log progress every 10% of the run
}

/// Time span and step size
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: f64, // total simulated time
    pub dt: f64,    // fixed step size
}

/// Hexagonal lattice the system is assembled from
#[derive(Deserialize, Debug, Clone)]
pub struct LatticeConfig {
    pub rows: usize,    // hexagon rows
    pub cols: usize,    // hexagon columns
    pub l1: f64,        // between-row edge length
    pub l2: f64,        // zig-zag edge length
    pub alpha_deg: f64, // zig-zag opening angle in degrees
    pub mass: f64,      // mass of every point
    pub k: f64,         // stiffness of every spring
}

/// Angular constraints between vertical and non-vertical springs
#[derive(Deserialize, Debug, Clone)]
pub struct HingeConfig {
    pub k: f64,                      // angular stiffness
    pub rest_angle_deg: Option<f64>, // fixed preferred angle; absent = capture the initial angle
    #[serde(default = "default_hinge_axis")]
    pub axis: Axis, // springs along this axis are "vertical"
}

fn default_hinge_axis() -> Axis {
    Axis::X
}

/// Opposite velocities on the two extreme layer pairs along `axis`
#[derive(Deserialize, Debug, Clone)]
pub struct SqueezeConfig {
    pub axis: Axis,          // axis the layers are selected along
    pub velocity_axis: Axis, // direction of the imposed velocity
    pub speed: f64,          // magnitude of the imposed velocity
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,           // Engine-level configuration
    pub parameters: ParametersConfig,   // Time span and step size
    pub lattice: LatticeConfig,         // Lattice geometry and material
    pub hinges: Option<HingeConfig>,    // Optional hinge potentials
    pub squeeze: Option<SqueezeConfig>, // Optional boundary squeeze
}

impl ScenarioConfig {
    /// Parse a scenario from YAML text
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
