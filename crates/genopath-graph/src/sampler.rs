//! Edge sampling for rendering.
//!
//! Large graphs have far more edges than a viewer can draw smoothly. The
//! sampler picks a fixed-size, seeded subset of edges to hand out; the graph
//! itself is never touched.

use crate::edge::{EdgeKind, GraphEdge};
use genopath_core::EdgeLimit;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

/// Returns all edges if they fit under `limit`, otherwise exactly `limit`
/// distinct edges chosen uniformly at random with `seed`.
///
/// Sampled edges keep their original relative order.
pub fn sample_edges(edges: &[GraphEdge], limit: EdgeLimit, seed: u64) -> Vec<GraphEdge> {
    let cap = match limit.cap() {
        Some(cap) if cap < edges.len() => cap,
        _ => return edges.to_vec(),
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, edges.len(), cap).into_vec();
    picked.sort_unstable();

    debug!("Sampled {} of {} edges (seed {})", cap, edges.len(), seed);
    picked.into_iter().map(|i| edges[i].clone()).collect()
}

/// The edges handed to the presentation layer, split by kind.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderEdges {
    pub gene_phenotype: Vec<GraphEdge>,
    pub phenotype_diagnostic: Vec<GraphEdge>,
    /// Edge count of the full graph, before sampling.
    pub total_edges: usize,
}

impl RenderEdges {
    /// Samples `edges` under `limit` and splits the result by kind.
    pub fn sample(edges: &[GraphEdge], limit: EdgeLimit, seed: u64) -> Self {
        let mut render = Self {
            total_edges: edges.len(),
            ..Self::default()
        };
        for edge in sample_edges(edges, limit, seed) {
            match edge.kind {
                EdgeKind::GenePhenotype => render.gene_phenotype.push(edge),
                EdgeKind::PhenotypeDiagnostic => render.phenotype_diagnostic.push(edge),
            }
        }
        render
    }

    /// Number of edges to draw.
    pub fn len(&self) -> usize {
        self.gene_phenotype.len() + self.phenotype_diagnostic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether some edges were left out.
    pub fn is_sampled(&self) -> bool {
        self.len() < self.total_edges
    }
}
