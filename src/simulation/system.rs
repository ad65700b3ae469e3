//! System assembly and time stepping
//!
//! A [`System`] is built once from a lattice [`Topology`]:
//! 1. one `MassPoint` per coordinate, at rest
//! 2. one `Spring` per connection
//! 3. optionally, hinge potentials between each "vertical" spring and every
//!    non-vertical spring sharing an endpoint with it
//! 4. optionally, the boundary squeeze velocities
//!
//! The initial state is recorded after step 4, so each point's history
//! always holds `steps() + 1` entries. `simulate` can be called any number
//! of times; each call resumes from the current state.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::configuration::config::IntegratorConfig;

use super::engine::{Engine, HingeOptions, Squeeze};
use super::error::{SimError, SimResult};
use super::forces::ForceSet;
use super::hinge::HingePotential;
use super::integrator::{euler_integrator, step_count, verlet_integrator};
use super::lattice::Topology;
use super::spring::Spring;
use super::states::MassPoint;
use super::vector::NVec3;

/// Off-axis components below this fraction of the length count as zero
const VERTICAL_TOL: f64 = 1e-9;

/// Coordinates closer than this belong to the same layer
const LAYER_TOL: f64 = 1e-9;

#[derive(Debug)]
pub struct System {
    points: Vec<MassPoint>,
    forces: ForceSet,
    integrator: IntegratorConfig,
    progress: bool,
    t: f64,       // simulated time so far
    steps: usize, // completed steps so far
    interrupt: Option<Arc<AtomicBool>>,
}

impl System {
    /// Assemble a system from lattice topology and per-element parameters
    ///
    /// `masses` is parallel to `topology.coordinates`, `spring_constants`
    /// to `topology.connections`.
    pub fn new(topology: &Topology, masses: &[f64], spring_constants: &[f64], engine: &Engine) -> SimResult<Self> {
        if masses.len() != topology.coordinates.len() {
            return Err(SimError::TopologyMismatch {
                what: "masses",
                expected: topology.coordinates.len(),
                found: masses.len(),
            });
        }
        if spring_constants.len() != topology.connections.len() {
            return Err(SimError::TopologyMismatch {
                what: "spring_constants",
                expected: topology.connections.len(),
                found: spring_constants.len(),
            });
        }
        topology.validate()?;

        let mut points = topology
            .coordinates
            .iter()
            .zip(masses)
            .enumerate()
            .map(|(i, (x, m))| MassPoint::new(i, *m, *x, NVec3::zeros()))
            .collect::<SimResult<Vec<_>>>()?;

        let mut forces = ForceSet::new();
        for (id, ((&(a, b), &l0), &k)) in topology
            .connections
            .iter()
            .zip(&topology.rest_lengths)
            .zip(spring_constants)
            .enumerate()
        {
            let spring = Spring::new(id, &points, a, b, k, l0)?;
            forces.add_spring(spring, &mut points);
        }

        if let Some(opts) = &engine.hinges {
            for hinge in build_hinges(&points, &forces, opts)? {
                forces.add_hinge(hinge, &mut points);
            }
        }

        if let Some(squeeze) = &engine.squeeze {
            apply_squeeze(&mut points, squeeze);
        }

        for p in points.iter_mut() {
            p.record();
        }

        info!(
            points = points.len(),
            springs = forces.springs().len(),
            hinges = forces.hinges().len(),
            "assembled spring network"
        );

        Ok(Self {
            points,
            forces,
            integrator: engine.integrator,
            progress: engine.progress,
            t: 0.0,
            steps: 0,
            interrupt: None,
        })
    }

    /// Assemble with one mass for every point and one stiffness for every spring
    pub fn uniform(topology: &Topology, mass: f64, k: f64, engine: &Engine) -> SimResult<Self> {
        let masses = vec![mass; topology.coordinates.len()];
        let ks = vec![k; topology.connections.len()];
        Self::new(topology, &masses, &ks, engine)
    }

    /// Stop `simulate` after the step during which `flag` becomes true
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Impose a velocity on point `i` before the first step
    ///
    /// The recorded initial state is replaced so history still starts with
    /// the state integration begins from.
    pub fn set_initial_velocity(&mut self, i: usize, v: NVec3) -> SimResult<()> {
        if self.steps > 0 {
            return Err(SimError::AlreadyStarted { steps: self.steps });
        }
        let p = self.points.get_mut(i).ok_or(SimError::NotAParticipant {
            point: i,
            contributor: "system",
        })?;
        p.set_velocity(v);
        p.restart_history();
        Ok(())
    }

    pub fn points(&self) -> &[MassPoint] {
        &self.points
    }

    pub fn forces(&self) -> &ForceSet {
        &self.forces
    }

    pub fn springs(&self) -> &[Spring] {
        self.forces.springs()
    }

    pub fn hinges(&self) -> &[HingePotential] {
        self.forces.hinges()
    }

    pub fn integrator(&self) -> IntegratorConfig {
        self.integrator
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn acceleration(&self, i: usize) -> SimResult<NVec3> {
        self.forces.acceleration(&self.points, i)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.points.iter().map(MassPoint::kinetic_energy).sum()
    }

    pub fn potential_energy(&self) -> SimResult<f64> {
        self.forces.potential_energy(&self.points)
    }

    pub fn total_energy(&self) -> SimResult<f64> {
        Ok(self.kinetic_energy() + self.potential_energy()?)
    }

    /// Integrate for `floor(t / dt)` steps with the configured integrator
    ///
    /// Returns the number of completed steps. Force-evaluation failures are
    /// returned unchanged; the history stays consistent up to the last
    /// completed step.
    pub fn simulate(&mut self, t: f64, dt: f64) -> SimResult<usize> {
        if !(dt > 0.0 && dt.is_finite() && t >= 0.0 && t.is_finite()) {
            return Err(SimError::InvalidTimeStep { t, dt });
        }
        let steps = step_count(t, dt);
        info!(steps, dt, integrator = ?self.integrator, "starting simulation");

        let report_every = if self.progress { (steps / 10).max(1) } else { 0 };
        let interrupt = self.interrupt.clone();
        let mut done = 0usize;
        let mut on_step = |step: usize| {
            done = step;
            if report_every > 0 && step % report_every == 0 {
                info!(step, total = steps, "{:.0}% done", 100.0 * step as f64 / steps as f64);
            }
            match &interrupt {
                Some(flag) if flag.load(Ordering::Relaxed) => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        };

        let result = match self.integrator {
            IntegratorConfig::Euler => euler_integrator(&mut self.points, &self.forces, dt, steps, &mut on_step),
            IntegratorConfig::Verlet => verlet_integrator(&mut self.points, &self.forces, dt, steps, &mut on_step),
        };

        self.steps += done;
        self.t += done as f64 * dt;

        match result {
            Ok(completed) => {
                if completed < steps {
                    warn!(completed, requested = steps, "simulation interrupted");
                } else {
                    info!(completed, t = self.t, "simulation finished");
                }
                Ok(completed)
            }
            Err(e) => {
                error!(after_step = self.steps, "simulation aborted: {e}");
                Err(e)
            }
        }
    }
}

/// Pair every vertical spring with each non-vertical spring touching it
fn build_hinges(points: &[MassPoint], forces: &ForceSet, opts: &HingeOptions) -> SimResult<Vec<HingePotential>> {
    let springs = forces.springs();
    let axis = opts.axis.index();

    let vertical: Vec<bool> = springs
        .iter()
        .map(|s| {
            let (a, b) = s.endpoints();
            let r = points[b].position() - points[a].position();
            let tol = VERTICAL_TOL * r.magnitude();
            (0..3).filter(|j| *j != axis).all(|j| r[j].abs() <= tol)
        })
        .collect();

    // point -> springs touching it
    let mut touching: Vec<Vec<usize>> = vec![Vec::new(); points.len()];
    for s in springs {
        let (a, b) = s.endpoints();
        touching[a].push(s.id());
        touching[b].push(s.id());
    }

    let mut hinges = Vec::new();
    for (v, spring) in springs.iter().enumerate().filter(|(v, _)| vertical[*v]) {
        let (a, b) = spring.endpoints();
        for &other in touching[a].iter().chain(&touching[b]) {
            if vertical[other] {
                continue;
            }
            debug!(vertical = v, other, "hinge");
            hinges.push(HingePotential::new(spring, &springs[other], points, opts.k, opts.rest_angle)?);
        }
    }
    Ok(hinges)
}

/// Give the two lowest layers `+speed` and the two highest `-speed`
fn apply_squeeze(points: &mut [MassPoint], squeeze: &Squeeze) {
    let axis = squeeze.axis.index();

    let mut layers: Vec<f64> = points.iter().map(|p| p.position()[axis]).collect();
    layers.sort_by(|a, b| a.total_cmp(b));
    layers.dedup_by(|a, b| (*a - *b).abs() <= LAYER_TOL);

    let low: Vec<f64> = layers.iter().take(2).copied().collect();
    let high: Vec<f64> = layers.iter().rev().take(2).copied().collect();
    let in_layers = |x: f64, set: &[f64]| set.iter().any(|l| (x - l).abs() <= LAYER_TOL);

    let v = squeeze.velocity_axis.unit() * squeeze.speed;
    let (mut n_low, mut n_high) = (0usize, 0usize);
    for p in points.iter_mut() {
        let x = p.position()[axis];
        if in_layers(x, &low) {
            p.set_velocity(v);
            n_low += 1;
        } else if in_layers(x, &high) {
            p.set_velocity(-v);
            n_high += 1;
        }
    }
    debug!(low = n_low, high = n_high, layers = layers.len(), "applied squeeze");
}
