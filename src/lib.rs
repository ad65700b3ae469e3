pub mod simulation;
pub mod configuration;
pub mod persistence;
pub mod benchmark;

pub use simulation::error::{SimError, SimResult};
pub use simulation::vector::{Axis, NVec3, normalize_in_place, unit};
pub use simulation::states::{MassPoint, Trajectory};
pub use simulation::forces::{ForceContributor, ForceHandle, ForceSet};
pub use simulation::spring::Spring;
pub use simulation::hinge::HingePotential;
pub use simulation::integrator::{euler_integrator, euler_step, step_count, verlet_integrator, verlet_step};
pub use simulation::lattice::{hex_lattice, Topology};
pub use simulation::oscillator::{Oscillator, OscillatorRun};
pub use simulation::engine::{Engine, HingeOptions, Squeeze};
pub use simulation::params::Parameters;
pub use simulation::system::System;
pub use simulation::scenario::Scenario;

pub use configuration::config::{IntegratorConfig, EngineConfig, ParametersConfig, LatticeConfig, HingeConfig, SqueezeConfig, ScenarioConfig};

pub use persistence::snapshot::{Snapshot, playback_frames};

pub use benchmark::benchmark::{bench_energy_drift, bench_lattice_step, spring_pair};
