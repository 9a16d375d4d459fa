//! Node-to-node cost matrices.

use crate::distance::{CoordPair, DistanceError, DistanceProvider};
use crate::node::Node;

/// A dense, possibly asymmetric `n x n` cost matrix in meters.
///
/// `get(i, j)` is the cost of travelling from node `i` to node `j`. The
/// diagonal is stored as zero and is never read by the formulation.
///
/// # Examples
/// ```
/// use cvrp_core::CostMatrix;
///
/// let matrix = CostMatrix::from_rows(vec![vec![0.0, 5.0], vec![7.0, 0.0]]).unwrap();
/// assert_eq!(matrix.get(0, 1), 5.0);
/// assert_eq!(matrix.get(1, 0), 7.0);
/// assert!(!matrix.is_symmetric(1e-9));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    data: Vec<f64>,
    size: usize,
}

impl CostMatrix {
    /// Create a zero matrix for `size` nodes.
    pub fn zeros(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Build a matrix from explicit rows.
    ///
    /// Returns `None` unless every row has as many entries as there are rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.into_iter().flatten().collect(),
            size,
        })
    }

    /// Cost from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    fn set(&mut self, from: usize, to: usize, cost: f64) {
        self.data[from * self.size + to] = cost;
    }

    /// Number of nodes covered.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether `get(i, j)` and `get(j, i)` agree within `tolerance`.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.size).all(|i| {
            ((i + 1)..self.size).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
        })
    }
}

/// Builds a [`CostMatrix`] for a node list from a [`DistanceProvider`].
///
/// All `n * (n - 1)` ordered pairs go to the provider in one
/// [`DistanceProvider::distances`] batch. Any failure aborts the build.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use cvrp_core::{CostMatrixBuilder, HaversineDistance, Node};
///
/// let nodes = [
///     Node::depot(Coord { x: 0.0, y: 0.0 }),
///     Node::customer(1, Coord { x: 0.0, y: 1.0 }, 1.0),
/// ];
/// let matrix = CostMatrixBuilder::new(&HaversineDistance).build(&nodes)?;
/// assert_eq!(matrix.size(), 2);
/// assert_eq!(matrix.get(0, 0), 0.0);
/// assert!(matrix.get(0, 1) > 111_000.0);
/// # Ok::<(), cvrp_core::DistanceError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CostMatrixBuilder<'a, P: DistanceProvider + ?Sized> {
    provider: &'a P,
}

impl<'a, P: DistanceProvider + ?Sized> CostMatrixBuilder<'a, P> {
    /// Wrap a provider.
    pub const fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Compute the matrix for `nodes`, indexed by position in the slice.
    pub fn build(&self, nodes: &[Node]) -> Result<CostMatrix, DistanceError> {
        if nodes.is_empty() {
            return Err(DistanceError::EmptyInput);
        }

        let arcs = ordered_arcs(nodes.len());
        let pairs: Vec<CoordPair> = arcs
            .iter()
            .map(|&(from, to)| (nodes[from].location, nodes[to].location))
            .collect();
        let costs = self.provider.distances(&pairs)?;
        if costs.len() != arcs.len() {
            return Err(DistanceError::LengthMismatch {
                expected: arcs.len(),
                actual: costs.len(),
            });
        }

        let mut matrix = CostMatrix::zeros(nodes.len());
        for ((from, to), value) in arcs.into_iter().zip(costs) {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DistanceError::InvalidCost { from, to, value });
            }
            matrix.set(from, to, value);
        }
        Ok(matrix)
    }
}

/// Every ordered pair `(i, j)` with `i != j`, row by row.
fn ordered_arcs(size: usize) -> Vec<(usize, usize)> {
    (0..size)
        .flat_map(|from| (0..size).filter(move |&to| to != from).map(move |to| (from, to)))
        .collect()
}
