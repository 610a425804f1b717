//! GenoPhenoPath Graph - the gene → phenotype → diagnostic knowledge graph
//!
//! This crate turns the cleaned source tables into a three-tier directed
//! graph and derives everything a viewer needs from it: a 3D position for
//! every node, a capped set of edges to draw and summary statistics.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with additional indexes for:
//! - Identifier lookups
//! - Per-class node order (which also fixes each node's slot on its shell)
//!
//! # Example
//!
//! ```no_run
//! use genopath_core::BuildConfig;
//! use genopath_graph::load_and_build;
//!
//! let config = BuildConfig::default();
//! let output = load_and_build(&config)?;
//!
//! println!("{} nodes, {} edges", output.stats.total_nodes, output.stats.total_edges);
//! let drawn = output.render_edges(config.edge_limit, config.sampling_seed);
//! # Ok::<(), genopath_core::LoadError>(())
//! ```

mod builder;
mod edge;
mod graph;
mod layout;
mod pipeline;
mod registry;
mod sampler;
mod stats;

pub use builder::GraphBuilder;
pub use edge::{Edge, EdgeKind, GraphEdge};
pub use graph::{KnowledgeGraph, NodeId};
pub use layout::{fibonacci_sphere, Layout, Point3, ShellLayout};
pub use pipeline::{build, load_and_build, BuildOutput};
pub use registry::EntityRegistry;
pub use sampler::{sample_edges, RenderEdges};
pub use stats::{ClassStats, DegreeExtremum, DegreeStatUndefined, GraphStats, MinDegreePolicy};
