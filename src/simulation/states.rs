//! Core state types for the spring-network simulation
//!
//! - `MassPoint`  – mass, current position/velocity, registered force contributors
//! - `Trajectory` – append-only log of every recorded position/velocity
//!
//! Positions and velocities are only written by the integrators and by the
//! boundary-condition setup in `System`. History is appended explicitly with
//! [`MassPoint::record`], once per completed integrator step.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::{SimError, SimResult};
use super::forces::ForceHandle;
use super::vector::NVec3;

/// Append-only per-point history, one entry per recorded state
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    positions: Vec<NVec3>,
    velocities: Vec<NVec3>,
}

impl Trajectory {
    pub fn record(&mut self, x: NVec3, v: NVec3) {
        self.positions.push(x);
        self.velocities.push(v);
    }

    pub fn positions(&self) -> &[NVec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[NVec3] {
        &self.velocities
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Every `stride`-th recorded position, starting with the first
    ///
    /// Returns a fresh vector; the stored history is left untouched.
    pub fn subsample(&self, stride: usize) -> Vec<NVec3> {
        self.positions.iter().step_by(stride.max(1)).copied().collect()
    }
}

#[derive(Debug, Clone)]
pub struct MassPoint {
    m: f64,    // mass, fixed after construction
    x: NVec3,  // position
    v: NVec3,  // velocity
    history: Trajectory,
    forces: BTreeSet<ForceHandle>, // registered force contributors
}

impl MassPoint {
    /// Create a point at rest-or-moving state `(x, v)`
    ///
    /// `index` is only used to label the error when `m` is not positive.
    pub fn new(index: usize, m: f64, x: NVec3, v: NVec3) -> SimResult<Self> {
        if !(m > 0.0) || !m.is_finite() {
            return Err(SimError::NonPositiveMass { index, mass: m });
        }
        Ok(Self {
            m,
            x,
            v,
            history: Trajectory::default(),
            forces: BTreeSet::new(),
        })
    }

    pub fn mass(&self) -> f64 {
        self.m
    }

    pub fn position(&self) -> NVec3 {
        self.x
    }

    pub fn velocity(&self) -> NVec3 {
        self.v
    }

    pub fn set_position(&mut self, x: NVec3) {
        self.x = x;
    }

    pub fn set_velocity(&mut self, v: NVec3) {
        self.v = v;
    }

    /// Append the current state to the history
    pub fn record(&mut self) {
        self.history.record(self.x, self.v);
    }

    /// Drop the history and record the current state as its first entry
    pub fn restart_history(&mut self) {
        self.history = Trajectory::default();
        self.record();
    }

    pub fn history(&self) -> &Trajectory {
        &self.history
    }

    /// Register a force contributor; registering the same handle twice is a no-op
    pub fn add_force(&mut self, handle: ForceHandle) -> bool {
        self.forces.insert(handle)
    }

    pub fn forces(&self) -> impl Iterator<Item = &ForceHandle> {
        self.forces.iter()
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }
}
