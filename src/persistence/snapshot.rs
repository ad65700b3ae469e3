//! On-disk snapshot of a simulated system
//!
//! A [`Snapshot`] carries every point's full history plus the springs and
//! hinges as index records, so the spring -> mass point relationships come
//! back unchanged after a save/load round trip. Encoding is `bincode` over
//! `serde`.
//!
//! Playback helpers pick frames out of the stored histories for rendering;
//! they only read the snapshot.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::configuration::config::IntegratorConfig;
use crate::simulation::error::{SimError, SimResult};
use crate::simulation::states::Trajectory;
use crate::simulation::system::System;
use crate::simulation::vector::NVec3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub mass: f64,
    pub history: Trajectory,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpringRecord {
    pub p1: usize,
    pub p2: usize,
    pub k: f64,
    pub rest_length: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HingeRecord {
    pub springs: (usize, usize),
    pub shared: usize,
    pub edges: (usize, usize),
    pub k: f64,
    pub rest_angle: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub t: f64,
    pub steps: usize,
    pub integrator: IntegratorConfig,
    pub points: Vec<PointRecord>,
    pub springs: Vec<SpringRecord>,
    pub hinges: Vec<HingeRecord>,
}

impl Snapshot {
    /// Copy everything a viewer needs out of `system`
    pub fn capture(system: &System) -> Self {
        Self {
            t: system.time(),
            steps: system.steps(),
            integrator: system.integrator(),
            points: system
                .points()
                .iter()
                .map(|p| PointRecord {
                    mass: p.mass(),
                    history: p.history().clone(),
                })
                .collect(),
            springs: system
                .springs()
                .iter()
                .map(|s| {
                    let (p1, p2) = s.endpoints();
                    SpringRecord { p1, p2, k: s.k(), rest_length: s.rest_length() }
                })
                .collect(),
            hinges: system
                .hinges()
                .iter()
                .map(|h| HingeRecord {
                    springs: h.springs(),
                    shared: h.shared(),
                    edges: h.edges(),
                    k: h.k(),
                    rest_angle: h.rest_angle(),
                })
                .collect(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Read a snapshot back and check that its records fit together
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Self = bincode::deserialize_from(reader)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Every history has the same length and every spring and hinge index
    /// names an existing point
    pub fn validate(&self) -> SimResult<()> {
        let n = self.points.len();
        let frames = self.frames();
        if let Some(p) = self.points.iter().find(|p| p.history.len() != frames) {
            return Err(SimError::TopologyMismatch {
                what: "history",
                expected: frames,
                found: p.history.len(),
            });
        }
        for (index, s) in self.springs.iter().enumerate() {
            if s.p1 == s.p2 || s.p1 >= n || s.p2 >= n {
                return Err(SimError::InvalidConnection { index, a: s.p1, b: s.p2, points: n });
            }
        }
        for (index, h) in self.hinges.iter().enumerate() {
            if let Some(&bad) = [h.shared, h.edges.0, h.edges.1].iter().find(|p| **p >= n) {
                return Err(SimError::InvalidConnection { index, a: h.shared, b: bad, points: n });
            }
        }
        Ok(())
    }

    /// Number of recorded frames (initial state included)
    pub fn frames(&self) -> usize {
        self.points.first().map_or(0, |p| p.history.len())
    }

    /// Positions of every point at recorded frame `frame`
    pub fn positions_at(&self, frame: usize) -> Option<Vec<NVec3>> {
        self.points
            .iter()
            .map(|p| p.history.positions().get(frame).copied())
            .collect()
    }

    /// Endpoint positions of every spring at recorded frame `frame`
    pub fn segments_at(&self, frame: usize) -> Option<Vec<(NVec3, NVec3)>> {
        let positions = self.positions_at(frame)?;
        self.springs
            .iter()
            .map(|s| Some((*positions.get(s.p1)?, *positions.get(s.p2)?)))
            .collect()
    }

    /// Per-point position sequences resampled for real-time playback
    ///
    /// `None` if some history is shorter than the first one.
    pub fn playback(&self, dt: f64, speed_factor: f64, fps: f64) -> Option<Vec<Vec<NVec3>>> {
        let frames = playback_frames(self.frames(), dt, speed_factor, fps);
        self.points
            .iter()
            .map(|p| frames.iter().map(|&f| p.history.positions().get(f).copied()).collect())
            .collect()
    }
}

/// Recorded-frame indices to show when `speed_factor` simulated seconds
/// play per wall second at `fps`
///
/// Frame `i` maps to recorded index `floor(i * stride)` with
/// `stride = speed_factor / dt / fps`; strides below one keep every frame.
pub fn playback_frames(len: usize, dt: f64, speed_factor: f64, fps: f64) -> Vec<usize> {
    let stride = (speed_factor / dt / fps).max(1.0);
    if !stride.is_finite() || len == 0 {
        return (0..len).collect();
    }
    let count = (len as f64 / stride) as usize;
    (0..count)
        .map(|i| ((i as f64 * stride) as usize).min(len - 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two points with `frames` recorded positions each, joined by one spring
    fn two_point_snapshot(frames: usize) -> Snapshot {
        let point = |x: f64| {
            let mut history = Trajectory::default();
            for _ in 0..frames {
                history.record(NVec3::new(x, 0.0, 0.0), NVec3::zeros());
            }
            PointRecord { mass: 1.0, history }
        };
        Snapshot {
            t: 0.0,
            steps: frames.saturating_sub(1),
            integrator: IntegratorConfig::Verlet,
            points: vec![point(0.0), point(1.0)],
            springs: vec![SpringRecord { p1: 0, p2: 1, k: 1.0, rest_length: 1.0 }],
            hinges: Vec::new(),
        }
    }

    #[test]
    fn well_formed_snapshot_validates() {
        let snapshot = two_point_snapshot(3);
        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.segments_at(2).unwrap().len(), 1);
        assert_eq!(snapshot.playback(1.0, 1.0, 1.0).unwrap()[1].len(), 3);
    }

    #[test]
    fn out_of_range_spring_index_gives_none_and_fails_validation() {
        let mut snapshot = two_point_snapshot(3);
        snapshot.springs[0].p2 = 99;

        assert!(snapshot.segments_at(0).is_none());
        assert!(matches!(
            snapshot.validate(),
            Err(SimError::InvalidConnection { index: 0, b: 99, points: 2, .. })
        ));
    }

    #[test]
    fn uneven_histories_give_none_and_fail_validation() {
        let mut snapshot = two_point_snapshot(3);
        snapshot.points[1].history = two_point_snapshot(1).points[1].history.clone();

        assert!(snapshot.playback(1.0, 1.0, 1.0).is_none());
        assert!(matches!(
            snapshot.validate(),
            Err(SimError::TopologyMismatch { what: "history", expected: 3, found: 1 })
        ));
    }

    #[test]
    fn out_of_range_hinge_index_fails_validation() {
        let mut snapshot = two_point_snapshot(2);
        snapshot.hinges.push(HingeRecord {
            springs: (0, 0),
            shared: 0,
            edges: (1, 5),
            k: 1.0,
            rest_angle: 1.0,
        });
        assert!(matches!(snapshot.validate(), Err(SimError::InvalidConnection { b: 5, .. })));
    }

    #[test]
    fn load_rejects_malformed_snapshot() {
        let mut snapshot = two_point_snapshot(2);
        snapshot.springs[0].p1 = 7;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.snap");
        snapshot.save(&path).unwrap();

        assert!(matches!(Snapshot::load(&path), Err(SimError::InvalidConnection { a: 7, .. })));
    }

    #[test]
    fn playback_frames_follow_stride() {
        // 40 simulated seconds per wall second, dt = 0.01, 60 fps -> stride 66.67
        let frames = playback_frames(1001, 0.01, 40.0, 60.0);
        assert_eq!(frames.len(), 15);
        assert_eq!(frames[0], 0);
        assert_eq!(frames[1], 66);
        assert_eq!(frames[3], 200);
    }

    #[test]
    fn playback_frames_never_skip_below_unit_stride() {
        assert_eq!(playback_frames(5, 1.0, 1.0, 60.0), vec![0, 1, 2, 3, 4]);
        assert!(playback_frames(0, 0.1, 1.0, 60.0).is_empty());
    }
}
