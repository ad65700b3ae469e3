//! Force contributors for the spring network
//!
//! Every component that pushes on mass points implements [`ForceContributor`].
//! Each mass point keeps a set of [`ForceHandle`]s naming the contributors it
//! participates in; its acceleration is the sum of their forces divided by
//! its mass. Summation order does not matter beyond floating-point rounding.

use super::error::{SimError, SimResult};
use super::hinge::HingePotential;
use super::spring::Spring;
use super::states::MassPoint;
use super::vector::NVec3;

/// Identity of a force contributor inside a [`ForceSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ForceHandle {
    Spring(usize),
    Hinge(usize),
}

/// Trait for force sources acting on a fixed set of mass points
/// Implementations return the force on whichever participant is asked
pub trait ForceContributor {
    /// Short label used in error messages
    fn name(&self) -> &'static str;

    /// Indices of every mass point this contributor pushes on
    fn participants(&self) -> Vec<usize>;

    /// Force on mass point `point` given the current state of all points
    fn force_on(&self, point: usize, points: &[MassPoint]) -> SimResult<NVec3>;

    /// Stored potential energy at the current state
    fn potential_energy(&self, points: &[MassPoint]) -> SimResult<f64>;
}

/// Owner of every spring and hinge in a system
#[derive(Debug, Clone, Default)]
pub struct ForceSet {
    springs: Vec<Spring>,
    hinges: Vec<HingePotential>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn hinges(&self) -> &[HingePotential] {
        &self.hinges
    }

    pub fn contributor(&self, handle: ForceHandle) -> &dyn ForceContributor {
        match handle {
            ForceHandle::Spring(i) => &self.springs[i],
            ForceHandle::Hinge(i) => &self.hinges[i],
        }
    }

    /// Store a spring and register it on both endpoints
    pub fn add_spring(&mut self, spring: Spring, points: &mut [MassPoint]) -> ForceHandle {
        let handle = ForceHandle::Spring(self.springs.len());
        register(handle, &spring, points);
        self.springs.push(spring);
        handle
    }

    /// Store a hinge and register it on its shared point and both edge points
    pub fn add_hinge(&mut self, hinge: HingePotential, points: &mut [MassPoint]) -> ForceHandle {
        let handle = ForceHandle::Hinge(self.hinges.len());
        register(handle, &hinge, points);
        self.hinges.push(hinge);
        handle
    }

    /// Acceleration of point `i`: sum of registered forces over its mass
    pub fn acceleration(&self, points: &[MassPoint], i: usize) -> SimResult<NVec3> {
        let p = points.get(i).ok_or(SimError::NotAParticipant {
            point: i,
            contributor: "system",
        })?;
        let mut total = NVec3::zeros();
        for handle in p.forces() {
            total += self.contributor(*handle).force_on(i, points)?;
        }
        Ok(total / p.mass())
    }

    /// Compute accelerations for all points from one consistent snapshot
    /// - `out[i]` is overwritten with the acceleration of point `i`
    pub fn accumulate_accels(&self, points: &[MassPoint], out: &mut [NVec3]) -> SimResult<()> {
        for (i, a) in out.iter_mut().enumerate().take(points.len()) {
            *a = self.acceleration(points, i)?;
        }
        Ok(())
    }

    /// Potential energy stored in every spring and hinge
    pub fn potential_energy(&self, points: &[MassPoint]) -> SimResult<f64> {
        let mut total = 0.0;
        for s in &self.springs {
            total += s.potential_energy(points)?;
        }
        for h in &self.hinges {
            total += h.potential_energy(points)?;
        }
        Ok(total)
    }
}

fn register(handle: ForceHandle, contributor: &dyn ForceContributor, points: &mut [MassPoint]) {
    for i in contributor.participants() {
        if let Some(p) = points.get_mut(i) {
            p.add_force(handle);
        }
    }
}
