//! Hexagonal lattice topology generator
//!
//! Produces the `(coordinates, connections, rest_lengths)` triple a
//! [`System`](crate::System) is assembled from. Connections are index pairs
//! into the coordinate list.
//!
//! ```text
//!       /\  /\  /\  /
//! (0,0)/  \/  \/  \/   |------y
//!      |  |   |   |    |
//!      |  |   |   |    |x
//!      \  /\  /\  /\
//!       \/  \/  \/  \
//! ```
//!
//! Rows of zig-zag `l2` edges run along y; the `l1` edges between rows run
//! along x. `alpha` is the opening angle of the zig-zag.

use std::f64::consts::FRAC_PI_2;

use super::error::{SimError, SimResult};
use super::vector::{normalize_in_place, NVec3};

/// Lattice topology handed to system assembly
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    pub coordinates: Vec<NVec3>,
    pub connections: Vec<(usize, usize)>,
    pub rest_lengths: Vec<f64>,
}

impl Topology {
    /// Check the structural invariants System assembly relies on
    pub fn validate(&self) -> SimResult<()> {
        if self.connections.len() != self.rest_lengths.len() {
            return Err(SimError::TopologyMismatch {
                what: "rest_lengths",
                expected: self.connections.len(),
                found: self.rest_lengths.len(),
            });
        }
        let n = self.coordinates.len();
        for (index, &(a, b)) in self.connections.iter().enumerate() {
            if a == b || a >= n || b >= n {
                return Err(SimError::InvalidConnection { index, a, b, points: n });
            }
        }
        Ok(())
    }

    /// Drop connections that reference missing or identical points, then
    /// remove every point hanging off exactly one connection together with
    /// that connection
    ///
    /// The dangling-point sweep runs once in index order, so a point that
    /// only becomes dangling after a later removal is kept.
    pub fn prune(mut self) -> Self {
        let n = self.coordinates.len();

        let mut keep_conn: Vec<bool> = self
            .connections
            .iter()
            .map(|&(a, b)| a != b && a < n && b < n)
            .collect();
        let mut keep_point = vec![true; n];

        for i in 0..n {
            let mut touching = self
                .connections
                .iter()
                .enumerate()
                .filter(|(c, conn)| keep_conn[*c] && (conn.0 == i || conn.1 == i))
                .map(|(c, _)| c);
            if let (Some(c), None) = (touching.next(), touching.next()) {
                keep_conn[c] = false;
                keep_point[i] = false;
            }
        }

        // Old index -> new index
        let mut remap = vec![usize::MAX; n];
        let mut coordinates = Vec::with_capacity(n);
        for (i, x) in self.coordinates.drain(..).enumerate() {
            if keep_point[i] {
                remap[i] = coordinates.len();
                coordinates.push(x);
            }
        }

        let mut connections = Vec::new();
        let mut rest_lengths = Vec::new();
        for (c, (&(a, b), &l)) in self.connections.iter().zip(&self.rest_lengths).enumerate() {
            if keep_conn[c] {
                connections.push((remap[a], remap[b]));
                rest_lengths.push(l);
            }
        }

        Self { coordinates, connections, rest_lengths }
    }
}

/// Generate a hexagonal lattice of `n_hex_rows` x `n_hex_cols` cells
///
/// `l1` is the length of the between-row edges, `l2` the zig-zag edge
/// length and `alpha` (radians) the zig-zag opening angle.
pub fn hex_lattice(n_hex_rows: usize, n_hex_cols: usize, l1: f64, l2: f64, alpha: f64) -> SimResult<Topology> {
    let x_vec = NVec3::x();
    let l1_vec = NVec3::new(l1, 0.0, 0.0);

    let mut l2_up = NVec3::y() - x_vec * (alpha - FRAC_PI_2).tan();
    normalize_in_place(&mut l2_up)?;
    l2_up *= l2;
    let mut l2_down = l2_up;
    l2_down.x = -l2_down.x;

    let n_cols = (n_hex_cols + 1) * 2;
    let n_rows = n_hex_rows + 1;

    let mut coordinates: Vec<NVec3> = Vec::with_capacity(n_rows * n_cols);
    let mut connections = Vec::new();
    let mut rest_lengths = Vec::new();

    let mut next = NVec3::zeros();
    for i in 0..n_rows {
        let row_start = coordinates.len();
        for j in 0..n_cols {
            coordinates.push(next);
            let idx = coordinates.len() - 1;
            if j < n_cols - 1 {
                next = coordinates[idx] + if (i + j) % 2 == 0 { l2_up } else { l2_down };
                connections.push((idx, idx + 1));
                rest_lengths.push(l2);
            }
            if (i + j) % 2 == 0 {
                connections.push((idx, idx + n_cols));
                rest_lengths.push(l1);
            }
        }

        next = coordinates[row_start]
            + if i % 2 == 0 {
                l1_vec
            } else {
                l1_vec + x_vec * (2.0 * x_vec.dot(&l2_down))
            };
    }

    Ok(Topology { coordinates, connections, rest_lengths }.prune())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prune_drops_out_of_range_connections() {
        let topo = Topology {
            coordinates: vec![NVec3::zeros(), NVec3::x(), NVec3::y()],
            connections: vec![(0, 1), (1, 2), (2, 0), (2, 7)],
            rest_lengths: vec![1.0, 1.0, 1.0, 1.0],
        }
        .prune();
        assert_eq!(topo.coordinates.len(), 3);
        assert_eq!(topo.connections, vec![(0, 1), (1, 2), (2, 0)]);
        assert!(topo.validate().is_ok());
    }

    #[test]
    fn prune_removes_dangling_points_and_reindexes() {
        // 0 - 1 - 2 triangle plus a tail 3 hanging off point 2
        let topo = Topology {
            coordinates: vec![NVec3::zeros(), NVec3::x(), NVec3::y(), NVec3::z()],
            connections: vec![(0, 1), (1, 2), (2, 0), (2, 3)],
            rest_lengths: vec![1.0, 2.0, 3.0, 4.0],
        }
        .prune();
        assert_eq!(topo.coordinates.len(), 3);
        assert_eq!(topo.rest_lengths, vec![1.0, 2.0, 3.0]);

        // A dangling point in the middle of the list shifts later indices
        let topo = Topology {
            coordinates: vec![NVec3::zeros(), NVec3::z(), NVec3::x(), NVec3::y()],
            connections: vec![(0, 1), (0, 2), (2, 3), (3, 0)],
            rest_lengths: vec![9.0, 1.0, 1.0, 1.0],
        }
        .prune();
        assert_eq!(topo.coordinates, vec![NVec3::zeros(), NVec3::x(), NVec3::y()]);
        assert_eq!(topo.connections, vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn hex_lattice_is_valid_and_keeps_rest_lengths() {
        let l1 = 1.0;
        let l2 = 1.0;
        let topo = hex_lattice(2, 2, l1, l2, 120f64.to_radians()).unwrap();
        assert!(topo.validate().is_ok());
        assert!(!topo.coordinates.is_empty());
        assert!(!topo.connections.is_empty());

        for (&(a, b), &l) in topo.connections.iter().zip(&topo.rest_lengths) {
            let len = (topo.coordinates[b] - topo.coordinates[a]).magnitude();
            assert!((len - l).abs() < 1e-9, "connection ({a}, {b}) has length {len}, expected {l}");
        }
    }

    #[test]
    fn single_cell_is_one_hexagon() {
        let topo = hex_lattice(1, 1, 1.0, 1.0, 120f64.to_radians()).unwrap();
        assert_eq!(topo.coordinates.len(), 6);
        assert_eq!(topo.connections.len(), 6);
    }

    #[test]
    fn two_by_two_lattice_counts_and_degrees() {
        let topo = hex_lattice(2, 2, 1.0, 1.0, 120f64.to_radians()).unwrap();
        assert_eq!(topo.coordinates.len(), 16);
        assert_eq!(topo.connections.len(), 19);

        let mut degree = vec![0usize; topo.coordinates.len()];
        for &(a, b) in &topo.connections {
            degree[a] += 1;
            degree[b] += 1;
        }
        assert!(degree.iter().all(|d| *d == 2 || *d == 3), "degrees: {degree:?}");
    }
}
