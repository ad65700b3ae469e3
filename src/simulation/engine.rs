//! High-level runtime engine settings
//!
//! Selects the integrator, whether hinge potentials are built, the boundary
//! squeeze, and progress reporting used when assembling and running a `System`

use crate::configuration::config::IntegratorConfig;
use crate::simulation::vector::Axis;

/// Hinge-construction policy
#[derive(Debug, Clone, Copy)]
pub struct HingeOptions {
    pub k: f64,                  // angular stiffness
    pub rest_angle: Option<f64>, // radians; None = capture the angle at construction
    pub axis: Axis,              // springs along this axis count as "vertical"
}

/// Boundary squeeze: opposite velocities on the two extreme layer pairs
#[derive(Debug, Clone, Copy)]
pub struct Squeeze {
    pub axis: Axis,          // axis along which layers are selected
    pub velocity_axis: Axis, // direction of the imposed velocity
    pub speed: f64,          // +speed on the low layers, -speed on the high layers
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub integrator: IntegratorConfig, // euler or verlet
    pub hinges: Option<HingeOptions>, // None = springs only
    pub squeeze: Option<Squeeze>,     // None = every point starts at rest
    pub progress: bool,               // log progress every 10% of a run
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            integrator: IntegratorConfig::Verlet,
            hinges: None,
            squeeze: None,
            progress: false,
        }
    }
}
