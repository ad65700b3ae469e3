//! Linear (Hookean) spring between two mass points

use super::error::{SimError, SimResult};
use super::forces::ForceContributor;
use super::states::MassPoint;
use super::vector::{unit, NVec3};

/// Pairwise spring with stiffness `k` and rest length `l0`
///
/// The connecting vector is checked against the one at the endpoints' most
/// recent recorded state that differs from the current positions. If it has
/// flipped since then the endpoints crossed within one step: the signed
/// length turns negative, the compression `l0 - L` exceeds `l0` and force
/// evaluation fails with [`SimError::ForceUndefined`]. A spring that only
/// rotates never flips between consecutive states.
#[derive(Debug, Clone)]
pub struct Spring {
    id: usize,
    p1: usize,
    p2: usize,
    k: f64,
    l0: f64,
}

impl Spring {
    /// Connect `points[p1]` and `points[p2]`
    ///
    /// `id` is the spring's position in the owning force set and is only
    /// used to label errors.
    pub fn new(id: usize, points: &[MassPoint], p1: usize, p2: usize, k: f64, l0: f64) -> SimResult<Self> {
        let n = points.len();
        if p1 == p2 || p1 >= n || p2 >= n {
            return Err(SimError::InvalidConnection { index: id, a: p1, b: p2, points: n });
        }
        if !(l0 >= 0.0) {
            return Err(SimError::DegenerateGeometry("spring rest length must be non-negative"));
        }
        // coincident endpoints have no direction
        unit(&(points[p2].position() - points[p1].position()))?;
        Ok(Self { id, p1, p2, k, l0 })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn endpoints(&self) -> (usize, usize) {
        (self.p1, self.p2)
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn rest_length(&self) -> f64 {
        self.l0
    }

    /// Current length `|p2 - p1|`
    pub fn length(&self, points: &[MassPoint]) -> f64 {
        (points[self.p2].position() - points[self.p1].position()).magnitude()
    }

    /// Forces on `(p1, p2)`; the second is always the exact negation of the first
    pub fn force_pair(&self, points: &[MassPoint]) -> SimResult<(NVec3, NVec3)> {
        let r = points[self.p2].position() - points[self.p1].position();
        let len = r.magnitude();
        let dir = unit(&r)?;

        let flipped = self.previous_axis(points, &r).is_some_and(|prev| r.dot(&prev) < 0.0);
        let signed = if flipped { -len } else { len };
        let compression = self.l0 - signed;
        if compression > self.l0 {
            return Err(SimError::ForceUndefined {
                spring: self.id,
                compression,
                rest_length: self.l0,
            });
        }

        // Hooke: F = -k (L - l0); stretched springs pull p1 toward p2
        let f = -self.k * (len - self.l0);
        let on_p1 = dir * -f;
        Ok((on_p1, -on_p1))
    }

    /// Connecting vector at the latest recorded state that differs from `r`
    ///
    /// Looks at most two entries back: forces are evaluated either at
    /// positions not yet recorded or at the state recorded last.
    fn previous_axis(&self, points: &[MassPoint], r: &NVec3) -> Option<NVec3> {
        let h1 = points[self.p1].history().positions();
        let h2 = points[self.p2].history().positions();
        h1.iter()
            .rev()
            .zip(h2.iter().rev())
            .take(2)
            .map(|(a, b)| b - a)
            .find(|prev| prev != r)
    }
}

impl ForceContributor for Spring {
    fn name(&self) -> &'static str {
        "spring"
    }

    fn participants(&self) -> Vec<usize> {
        vec![self.p1, self.p2]
    }

    fn force_on(&self, point: usize, points: &[MassPoint]) -> SimResult<NVec3> {
        if point != self.p1 && point != self.p2 {
            return Err(SimError::NotAParticipant { point, contributor: self.name() });
        }
        let (on_p1, on_p2) = self.force_pair(points)?;
        Ok(if point == self.p1 { on_p1 } else { on_p2 })
    }

    fn potential_energy(&self, points: &[MassPoint]) -> SimResult<f64> {
        let dl = self.length(points) - self.l0;
        Ok(0.5 * self.k * dl * dl)
    }
}
