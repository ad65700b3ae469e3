//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - total simulated time and fixed step size,
//! - point mass and spring stiffness applied uniformly to the lattice

#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_end: f64, // total simulated time
    pub dt: f64,    // step size
    pub mass: f64,  // mass of every lattice point
    pub k: f64,     // stiffness of every lattice spring
}
