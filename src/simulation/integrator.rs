//! Fixed-step time integrators for the spring network
//!
//! Provides explicit Euler and velocity-Verlet. Both update every point
//! synchronously: all accelerations used in a phase are computed from one
//! snapshot of positions before any point is moved, so a spring never sees
//! one endpoint already advanced and the other not.
//!
//! After every completed step each point records its state and the caller's
//! `on_step` hook decides whether to continue.

use std::ops::ControlFlow;

use super::error::SimResult;
use super::forces::ForceSet;
use super::states::MassPoint;
use super::vector::NVec3;

/// Advance all points by one explicit Euler step
///
/// x_n+1 = x_n + dt v_n
/// v_n+1 = v_n + dt a(x_n)
pub fn euler_step(points: &mut [MassPoint], forces: &ForceSet, dt: f64, accels: &mut [NVec3]) -> SimResult<()> {
    // a_n from the untouched positions x_n
    forces.accumulate_accels(points, accels)?;

    for (p, a) in points.iter_mut().zip(accels.iter()) {
        let v = p.velocity();
        p.set_position(p.position() + v * dt);
        p.set_velocity(v + *a * dt);
        p.record();
    }
    Ok(())
}

/// Advance all points by one velocity-Verlet step
///
/// `a_prev` must hold a_n on entry and holds a_n+1 on return. `x_prev` is
/// scratch space for x_n: if the new accelerations cannot be evaluated every
/// point is put back at x_n and the step leaves no trace.
pub fn verlet_step(
    points: &mut [MassPoint],
    forces: &ForceSet,
    dt: f64,
    a_prev: &mut [NVec3],
    a_next: &mut [NVec3],
    x_prev: &mut [NVec3],
) -> SimResult<()> {
    let half_dt2 = 0.5 * dt * dt;

    // Drift every point first: x_n+1 = x_n + dt v_n + dt^2/2 a_n
    for ((p, a), x) in points.iter_mut().zip(a_prev.iter()).zip(x_prev.iter_mut()) {
        *x = p.position();
        p.set_position(*x + p.velocity() * dt + *a * half_dt2);
    }

    // a_n+1 from the complete set of x_n+1
    if let Err(e) = forces.accumulate_accels(points, a_next) {
        for (p, x) in points.iter_mut().zip(x_prev.iter()) {
            p.set_position(*x);
        }
        return Err(e);
    }

    // v_n+1 = v_n + dt/2 (a_n + a_n+1)
    for ((p, a0), a1) in points.iter_mut().zip(a_prev.iter()).zip(a_next.iter()) {
        p.set_velocity(p.velocity() + (*a0 + *a1) * (0.5 * dt));
        p.record();
    }

    a_prev.swap_with_slice(a_next);
    Ok(())
}

/// Run `steps` explicit Euler steps
///
/// Returns the number of completed steps, which is less than `steps` only
/// when `on_step` breaks early.
pub fn euler_integrator(
    points: &mut [MassPoint],
    forces: &ForceSet,
    dt: f64,
    steps: usize,
    on_step: &mut dyn FnMut(usize) -> ControlFlow<()>,
) -> SimResult<usize> {
    let mut accels = vec![NVec3::zeros(); points.len()];
    for step in 0..steps {
        euler_step(points, forces, dt, &mut accels)?;
        if on_step(step + 1).is_break() {
            return Ok(step + 1);
        }
    }
    Ok(steps)
}

/// Run `steps` velocity-Verlet steps
///
/// The starting acceleration is evaluated once before the loop.
pub fn verlet_integrator(
    points: &mut [MassPoint],
    forces: &ForceSet,
    dt: f64,
    steps: usize,
    on_step: &mut dyn FnMut(usize) -> ControlFlow<()>,
) -> SimResult<usize> {
    let n = points.len();
    let mut a_prev = vec![NVec3::zeros(); n];
    let mut a_next = vec![NVec3::zeros(); n];
    let mut x_prev = vec![NVec3::zeros(); n];
    if steps > 0 {
        forces.accumulate_accels(points, &mut a_prev)?;
    }

    for step in 0..steps {
        verlet_step(points, forces, dt, &mut a_prev, &mut a_next, &mut x_prev)?;
        if on_step(step + 1).is_break() {
            return Ok(step + 1);
        }
    }
    Ok(steps)
}

/// Number of whole steps of size `dt` that fit in `t`
///
/// A relative tolerance absorbs representation error so that `1.0 / 0.1`
/// and `0.3 / 0.1` give 10 and 3.
pub fn step_count(t: f64, dt: f64) -> usize {
    let ratio = t / dt;
    (ratio + ratio.abs() * 1e-9).floor().max(0.0) as usize
}
