use std::time::Instant;

use crate::configuration::config::IntegratorConfig;
use crate::simulation::engine::{Engine, HingeOptions};
use crate::simulation::error::SimResult;
use crate::simulation::lattice::{hex_lattice, Topology};
use crate::simulation::system::System;
use crate::simulation::vector::{Axis, NVec3};

/// Two unit masses on one spring (`l0 = 1`) stretched to `separation` along x,
/// closing at `closing_speed`
pub fn spring_pair(separation: f64, closing_speed: f64, k: f64, integrator: IntegratorConfig) -> SimResult<System> {
    let topology = Topology {
        coordinates: vec![NVec3::zeros(), NVec3::new(separation, 0.0, 0.0)],
        connections: vec![(0, 1)],
        rest_lengths: vec![1.0],
    };
    let engine = Engine {
        integrator,
        ..Engine::default()
    };
    let mut sys = System::uniform(&topology, 1.0, k, &engine)?;
    sys.set_initial_velocity(0, NVec3::new(0.5 * closing_speed, 0.0, 0.0))?;
    sys.set_initial_velocity(1, NVec3::new(-0.5 * closing_speed, 0.0, 0.0))?;
    Ok(sys)
}

/// Energy drift of Euler vs Verlet on one spring for growing run lengths
/// Paste output directly into excel to graph
pub fn bench_energy_drift() -> SimResult<()> {
    let dt = 0.1;

    println!("steps,euler_drift,verlet_drift");
    for steps in [100usize, 1_000, 10_000, 100_000] {
        let mut drift = [0.0; 2];
        for (slot, integrator) in [IntegratorConfig::Euler, IntegratorConfig::Verlet].into_iter().enumerate() {
            let mut sys = spring_pair(1.2, 0.001, 0.001, integrator)?;
            let e0 = sys.total_energy()?;
            sys.simulate(steps as f64 * dt, dt)?;
            drift[slot] = (sys.total_energy()? - e0) / e0;
        }
        println!("{},{:.6e},{:.6e}", steps, drift[0], drift[1]);
    }
    Ok(())
}

/// Wall time per step on hex lattices of growing size, with hinges enabled
pub fn bench_lattice_step() -> SimResult<()> {
    let sizes = [2usize, 4, 8, 16, 32];
    let steps = 20;
    let dt = 0.01;

    for n in sizes {
        let topology = hex_lattice(n, n, 1.0, 1.0, 120f64.to_radians())?;

        let mut per_step = [0.0; 2];
        for (slot, integrator) in [IntegratorConfig::Euler, IntegratorConfig::Verlet].into_iter().enumerate() {
            let engine = Engine {
                integrator,
                hinges: Some(HingeOptions {
                    k: 0.1,
                    rest_angle: None,
                    axis: Axis::X,
                }),
                ..Engine::default()
            };
            let mut sys = System::uniform(&topology, 1.0, 1.0, &engine)?;

            // Warm up
            sys.simulate(dt, dt)?;

            let t0 = Instant::now();
            sys.simulate(steps as f64 * dt, dt)?;
            per_step[slot] = t0.elapsed().as_secs_f64() / steps as f64;
        }

        println!(
            "N = {:3}x{:<3} points = {:5}, euler step = {:8.6} s, verlet step = {:8.6} s",
            n,
            n,
            topology.coordinates.len(),
            per_step[0],
            per_step[1]
        );
    }
    Ok(())
}
