pub mod error;
pub mod vector;
pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod spring;
pub mod hinge;
pub mod integrator;
pub mod lattice;
pub mod oscillator;
pub mod system;
pub mod scenario;
