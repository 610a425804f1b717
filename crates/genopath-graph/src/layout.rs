//! Concentric shell layout.
//!
//! Each entity class gets its own sphere: genes innermost, then phenotypes,
//! then diagnostics. Within a shell, nodes are spread with the Fibonacci
//! sphere (equal-area spiral) construction: node `i` of `n` sits at
//!
//! ```text
//! φ = arccos(1 - 2(i + ε + 0.5) / n)
//! θ = 2π (i + ε) / golden_ratio
//! ```
//!
//! where `ε` is a small random offset that keeps repeated loads from
//! drawing the exact same pattern. The placement never looks at edges.

use crate::graph::KnowledgeGraph;
use genopath_core::{EntityKind, MAX_LAYOUT_JITTER};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// (1 + √5) / 2
const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// A position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance from the origin.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Node identifier → position, gene shell first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    positions: IndexMap<String, Point3>,
}

impl Layout {
    pub fn get(&self, id: &str) -> Option<Point3> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point3)> {
        self.positions.iter().map(|(id, p)| (id.as_str(), *p))
    }
}

/// Shell radii and offset size for the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellLayout {
    /// Radius per shell, innermost first.
    pub radii: [f64; 3],
    /// Offsets are drawn from `[-jitter, jitter)`, in units of node index.
    /// Values outside `0..=MAX_LAYOUT_JITTER` are clamped when placing.
    pub jitter: f64,
}

impl Default for ShellLayout {
    fn default() -> Self {
        Self {
            radii: [0.5, 1.0, 1.5],
            jitter: 0.05,
        }
    }
}

impl ShellLayout {
    pub fn new(radii: [f64; 3], jitter: f64) -> Self {
        Self { radii, jitter }
    }

    /// Radius of the shell a class is placed on.
    pub fn radius(&self, kind: EntityKind) -> f64 {
        self.radii[kind.shell()]
    }

    /// Places every node of the graph, drawing offsets from `rng`.
    pub fn compute<R: Rng + ?Sized>(&self, graph: &KnowledgeGraph, rng: &mut R) -> Layout {
        let mut positions = IndexMap::with_capacity(graph.node_count());

        for kind in EntityKind::ALL {
            let nodes: Vec<_> = graph.nodes_of(kind).collect();
            let radius = self.radius(kind);
            let points = fibonacci_sphere(nodes.len(), radius, self.jitter, &mut *rng);
            debug!("Placed {} {} nodes at r={}", points.len(), kind.as_str(), radius);

            for (node, point) in nodes.into_iter().zip(points) {
                positions.insert(node.id.clone(), point);
            }
        }

        Layout { positions }
    }

    /// Places every node; a seed makes the offsets reproducible.
    pub fn compute_seeded(&self, graph: &KnowledgeGraph, seed: Option<u64>) -> Layout {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.compute(graph, &mut rng)
    }
}

/// `n` points spread over a sphere of the given radius.
///
/// Returns nothing for `n == 0`. For `n == 1` the single point lands near
/// the equator. `jitter` is clamped to `0..=MAX_LAYOUT_JITTER`; NaN means
/// no offset.
pub fn fibonacci_sphere<R: Rng + ?Sized>(
    n: usize,
    radius: f64,
    jitter: f64,
    rng: &mut R,
) -> Vec<Point3> {
    let jitter = if jitter.is_nan() {
        0.0
    } else {
        jitter.clamp(0.0, MAX_LAYOUT_JITTER)
    };
    (0..n)
        .map(|i| {
            let offset = if jitter > 0.0 {
                rng.gen_range(-jitter..jitter)
            } else {
                0.0
            };
            sphere_point(i as f64 + offset, n, radius)
        })
        .collect()
}

/// Position of (possibly fractional) spiral index `t` out of `n`.
fn sphere_point(t: f64, n: usize, radius: f64) -> Point3 {
    let cos_phi = (1.0 - 2.0 * (t + 0.5) / n as f64).clamp(-1.0, 1.0);
    let phi = cos_phi.acos();
    let theta = 2.0 * PI * t / GOLDEN_RATIO;

    Point3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use genopath_core::EntityNode;

    const EPS: f64 = 1e-9;

    fn graph(genes: usize, phens: usize, diags: usize) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        for i in 0..genes {
            graph.add_node(EntityNode::gene(format!("G{i}")));
        }
        for i in 0..phens {
            graph.add_node(EntityNode::phenotype(format!("HP:{i:07}")));
        }
        for i in 0..diags {
            graph.add_node(EntityNode::diagnostic(format!("measure {i}")));
        }
        graph
    }

    #[test]
    fn test_golden_ratio_constant() {
        assert!((GOLDEN_RATIO - (1.0 + 5f64.sqrt()) / 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_every_node_placed_on_its_shell() {
        let graph = graph(7, 40, 13);
        let shells = ShellLayout::default();
        let layout = shells.compute_seeded(&graph, None);

        assert_eq!(layout.len(), graph.node_count());
        for node in graph.nodes() {
            let point = layout.get(&node.id).unwrap();
            assert!(
                (point.norm() - shells.radius(node.kind)).abs() < EPS,
                "{} at {}",
                node.id,
                point.norm()
            );
        }
    }

    #[test]
    fn test_empty_and_single_shells() {
        let graph = graph(1, 0, 2);
        let layout = ShellLayout::default().compute_seeded(&graph, Some(3));

        assert_eq!(layout.len(), 3);
        let gene = layout.get("G0").unwrap();
        assert!(gene.x.is_finite() && gene.y.is_finite() && gene.z.is_finite());
        assert!((gene.norm() - 0.5).abs() < EPS);
        assert!(fibonacci_sphere(0, 1.0, 0.05, &mut StdRng::seed_from_u64(1)).is_empty());
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let graph = graph(5, 5, 5);
        let shells = ShellLayout::default();
        assert_eq!(
            shells.compute_seeded(&graph, Some(11)),
            shells.compute_seeded(&graph, Some(11))
        );
    }

    #[test]
    fn test_offset_stays_within_band() {
        let n = 25;
        let jitter = 0.05;
        let points = fibonacci_sphere(n, 1.0, jitter, &mut StdRng::seed_from_u64(9));

        for (i, point) in points.iter().enumerate() {
            let lo = sphere_point(i as f64 - jitter, n, 1.0);
            let hi = sphere_point(i as f64 + jitter, n, 1.0);
            // z falls monotonically with the spiral index
            assert!(point.z <= lo.z + EPS && point.z >= hi.z - EPS);
        }
    }

    #[test]
    fn test_zero_jitter_is_deterministic() {
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        assert_eq!(
            fibonacci_sphere(10, 1.5, 0.0, &mut a),
            fibonacci_sphere(10, 1.5, 0.0, &mut b)
        );
    }

    #[test]
    fn test_oversized_jitter_is_clamped() {
        let n = 8;
        let mut rng = StdRng::seed_from_u64(4);
        for jitter in [1e308, f64::INFINITY, f64::NAN] {
            let points = fibonacci_sphere(n, 1.0, jitter, &mut rng);
            assert_eq!(points.len(), n);
            for (i, point) in points.iter().enumerate() {
                assert!((point.norm() - 1.0).abs() < EPS);
                let lo = sphere_point(i as f64 - MAX_LAYOUT_JITTER, n, 1.0);
                let hi = sphere_point(i as f64 + MAX_LAYOUT_JITTER, n, 1.0);
                assert!(point.z <= lo.z + EPS && point.z >= hi.z - EPS);
            }
        }
    }
}
