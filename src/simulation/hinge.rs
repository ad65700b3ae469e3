//! Angular (hinge) potential over two springs sharing one mass point
//!
//! Energy `V = k/2 (theta - theta0)^2`, where `theta` is the angle at the
//! shared point between the arms pointing to the two edge points. Forces are
//! the closed-form negative gradient of `V`:
//!
//! ```text
//! c        = (r1 . r2) / (|r1| |r2|)
//! dtheta/de1 = -(r2 / (|r1||r2|) - c r1 / |r1|^2) / sin(theta)
//! F_e1     = -k (theta - theta0) dtheta/de1      (same for e2 with r1 <-> r2)
//! F_shared = -(F_e1 + F_e2)
//! ```

use std::f64::consts::PI;

use super::error::{SimError, SimResult};
use super::forces::ForceContributor;
use super::spring::Spring;
use super::states::MassPoint;
use super::vector::NVec3;

/// Below this `sin(theta)` the angle gradient is treated as undefined
const MIN_SIN: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct HingePotential {
    springs: (usize, usize),
    shared: usize,
    edges: (usize, usize),
    k: f64,
    theta0: f64,
}

impl HingePotential {
    /// Build a hinge from two springs that share exactly one endpoint
    ///
    /// With `rest_angle == None` the preferred angle is the angle measured
    /// right now; otherwise the given angle (radians, within `[0, pi]`) is used.
    pub fn new(
        a: &Spring,
        b: &Spring,
        points: &[MassPoint],
        k: f64,
        rest_angle: Option<f64>,
    ) -> SimResult<Self> {
        if rest_angle.is_some_and(|theta| !(0.0..=PI).contains(&theta)) {
            return Err(SimError::DegenerateGeometry("hinge rest angle must lie in [0, pi]"));
        }

        let (a1, a2) = a.endpoints();
        let (b1, b2) = b.endpoints();

        let shared: Vec<usize> = [a1, a2].into_iter().filter(|p| *p == b1 || *p == b2).collect();
        if shared.len() != 1 {
            return Err(SimError::AmbiguousHinge {
                first: a.id(),
                second: b.id(),
                shared: shared.len(),
            });
        }
        let common = shared[0];
        let e1 = if a1 == common { a2 } else { a1 };
        let e2 = if b1 == common { b2 } else { b1 };

        let mut hinge = Self {
            springs: (a.id(), b.id()),
            shared: common,
            edges: (e1, e2),
            k,
            theta0: 0.0,
        };
        hinge.theta0 = match rest_angle {
            Some(theta) => theta,
            None => hinge.angle(points)?,
        };
        Ok(hinge)
    }

    pub fn springs(&self) -> (usize, usize) {
        self.springs
    }

    pub fn shared(&self) -> usize {
        self.shared
    }

    pub fn edges(&self) -> (usize, usize) {
        self.edges
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn rest_angle(&self) -> f64 {
        self.theta0
    }

    fn arms(&self, points: &[MassPoint]) -> SimResult<(NVec3, NVec3, f64, f64)> {
        let s = points[self.shared].position();
        let r1 = points[self.edges.0].position() - s;
        let r2 = points[self.edges.1].position() - s;
        let (n1, n2) = (r1.magnitude(), r2.magnitude());
        if n1 == 0.0 || n2 == 0.0 {
            return Err(SimError::DegenerateGeometry("hinge arm has zero length"));
        }
        Ok((r1, r2, n1, n2))
    }

    /// Current angle at the shared point, in `[0, pi]`
    pub fn angle(&self, points: &[MassPoint]) -> SimResult<f64> {
        let (r1, r2, n1, n2) = self.arms(points)?;
        Ok((r1.dot(&r2) / (n1 * n2)).clamp(-1.0, 1.0).acos())
    }

    /// Forces on `(shared, edge1, edge2)`; they always sum to zero
    pub fn force_triplet(&self, points: &[MassPoint]) -> SimResult<(NVec3, NVec3, NVec3)> {
        let (r1, r2, n1, n2) = self.arms(points)?;
        let c = (r1.dot(&r2) / (n1 * n2)).clamp(-1.0, 1.0);
        let theta = c.acos();
        let dtheta = theta - self.theta0;
        if dtheta == 0.0 || self.k == 0.0 {
            return Ok((NVec3::zeros(), NVec3::zeros(), NVec3::zeros()));
        }

        let sin = (1.0 - c * c).sqrt();
        if sin < MIN_SIN {
            return Err(SimError::DegenerateGeometry("hinge arms are collinear"));
        }

        let scale = self.k * dtheta / sin;
        let f1 = (r2 / (n1 * n2) - r1 * (c / (n1 * n1))) * scale;
        let f2 = (r1 / (n1 * n2) - r2 * (c / (n2 * n2))) * scale;
        Ok((-(f1 + f2), f1, f2))
    }
}

impl ForceContributor for HingePotential {
    fn name(&self) -> &'static str {
        "hinge"
    }

    fn participants(&self) -> Vec<usize> {
        vec![self.shared, self.edges.0, self.edges.1]
    }

    fn force_on(&self, point: usize, points: &[MassPoint]) -> SimResult<NVec3> {
        let (on_shared, on_e1, on_e2) = self.force_triplet(points)?;
        if point == self.shared {
            Ok(on_shared)
        } else if point == self.edges.0 {
            Ok(on_e1)
        } else if point == self.edges.1 {
            Ok(on_e2)
        } else {
            Err(SimError::NotAParticipant { point, contributor: self.name() })
        }
    }

    fn potential_energy(&self, points: &[MassPoint]) -> SimResult<f64> {
        let dtheta = self.angle(points)? - self.theta0;
        Ok(0.5 * self.k * dtheta * dtheta)
    }
}
