//! One-dimensional single-spring reference model
//!
//! A unit of mass `m` on a spring of stiffness `k` and rest length `l0`,
//! described only by its length `l` and rate `v`. Running it with both
//! integration schemes shows their discretization error side by side without
//! any lattice in the way.

/// Mass-on-a-spring parameters
#[derive(Debug, Clone, Copy)]
pub struct Oscillator {
    pub m: f64,
    pub k: f64,
    pub l0: f64,
}

/// Length and total energy after every step
#[derive(Debug, Clone, Default)]
pub struct OscillatorRun {
    pub lengths: Vec<f64>,
    pub energies: Vec<f64>,
}

impl Oscillator {
    pub fn acceleration(&self, l: f64) -> f64 {
        -self.k * (l - self.l0) / self.m
    }

    /// Kinetic plus spring energy
    pub fn energy(&self, l: f64, v: f64) -> f64 {
        let dl = l - self.l0;
        0.5 * self.k * dl * dl + 0.5 * self.m * v * v
    }

    /// Explicit Euler over `t` with step `dt` from `(l, v)`
    pub fn euler(&self, dt: f64, t: f64, mut l: f64, mut v: f64) -> OscillatorRun {
        let steps = crate::simulation::integrator::step_count(t, dt);
        let mut run = OscillatorRun::with_capacity(steps);
        for _ in 0..steps {
            let a = self.acceleration(l);
            l += v * dt;
            v += a * dt;
            run.push(l, self.energy(l, v));
        }
        run
    }

    /// Velocity Verlet over `t` with step `dt` from `(l, v)`
    pub fn verlet(&self, dt: f64, t: f64, mut l: f64, mut v: f64) -> OscillatorRun {
        let steps = crate::simulation::integrator::step_count(t, dt);
        let mut run = OscillatorRun::with_capacity(steps);
        let mut a1 = self.acceleration(l);
        for _ in 0..steps {
            l += v * dt + a1 * dt * dt / 2.0;
            let a2 = self.acceleration(l);
            v += (a1 + a2) * dt / 2.0;
            a1 = a2;
            run.push(l, self.energy(l, v));
        }
        run
    }
}

impl OscillatorRun {
    fn with_capacity(n: usize) -> Self {
        Self {
            lengths: Vec::with_capacity(n),
            energies: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, l: f64, e: f64) {
        self.lengths.push(l);
        self.energies.push(e);
    }

    /// Largest relative deviation of the recorded energies from `e0`
    pub fn max_relative_drift(&self, e0: f64) -> f64 {
        self.energies.iter().map(|e| ((e - e0) / e0).abs()).fold(0.0, f64::max)
    }
}
