//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - the assembled spring network (`System`) at t = 0

use tracing::info;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::engine::{Engine, HingeOptions, Squeeze};
use crate::simulation::error::SimResult;
use crate::simulation::lattice::hex_lattice;
use crate::simulation::params::Parameters;
use crate::simulation::system::System;

/// Fully-initialized simulation scenario
///
/// This is the main "runtime bundle" constructed from a [`ScenarioConfig`]:
/// it contains the engine settings, parameters and the assembled system
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> SimResult<Self> {
        // Parameters (runtime) from ParametersConfig + lattice material
        let parameters = Parameters {
            t_end: cfg.parameters.t_end,
            dt: cfg.parameters.dt,
            mass: cfg.lattice.mass,
            k: cfg.lattice.k,
        };

        // Engine (runtime) from EngineConfig and the optional sections
        let engine = Engine {
            integrator: cfg.engine.integrator,
            hinges: cfg.hinges.map(|h| HingeOptions {
                k: h.k,
                rest_angle: h.rest_angle_deg.map(f64::to_radians),
                axis: h.axis,
            }),
            squeeze: cfg.squeeze.map(|s| Squeeze {
                axis: s.axis,
                velocity_axis: s.velocity_axis,
                speed: s.speed,
            }),
            progress: cfg.engine.progress,
        };

        // Topology from the lattice generator
        let l = &cfg.lattice;
        let topology = hex_lattice(l.rows, l.cols, l.l1, l.l2, l.alpha_deg.to_radians())?;
        info!(rows = l.rows, cols = l.cols, "generated hex lattice");

        let system = System::uniform(&topology, parameters.mass, parameters.k, &engine)?;

        Ok(Self {
            engine,
            parameters,
            system,
        })
    }

    /// Run the system over the configured time span
    pub fn run(&mut self) -> SimResult<usize> {
        self.system.simulate(self.parameters.t_end, self.parameters.dt)
    }
}
