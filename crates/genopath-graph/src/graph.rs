//! Core graph data structure.
//!
//! The KnowledgeGraph wraps petgraph and adds indexes for fast lookups.
//! It's the central data structure the layout, sampler and statistics
//! all read from.

use crate::edge::{Edge, EdgeKind, GraphEdge};
use genopath_core::{EmptyClassWarning, EntityKind, EntityNode};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use tracing::warn;

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// The gene → phenotype → diagnostic graph.
///
/// Nodes are keyed by identifier: adding an identifier twice returns the
/// existing node and keeps the class it was first tagged with.
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    /// The underlying petgraph graph.
    pub(crate) graph: DiGraph<EntityNode, Edge>,

    /// Maps identifiers to graph node indexes.
    id_index: HashMap<String, NodeId>,

    /// Nodes of each class in insertion order.
    kind_index: HashMap<EntityKind, Vec<NodeId>>,
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_index: HashMap::new(),
            kind_index: HashMap::new(),
        }
    }

    /// Adds a node, or returns the existing one with the same identifier.
    pub fn add_node(&mut self, node: EntityNode) -> NodeId {
        if let Some(&existing) = self.id_index.get(&node.id) {
            let current = self.graph[existing].kind;
            if current != node.kind {
                warn!(
                    "'{}' is already a {}, not re-tagging it as {}",
                    node.id, current, node.kind
                );
            }
            return existing;
        }

        let id = node.id.clone();
        let kind = node.kind;
        let index = self.graph.add_node(node);

        self.id_index.insert(id, index);
        self.kind_index.entry(kind).or_default().push(index);

        index
    }

    /// Adds an edge between two nodes.
    ///
    /// Returns false when the edge already exists or the endpoint classes
    /// do not form a permitted pair; nothing is added in either case.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        let (Some(source), Some(target)) = (self.graph.node_weight(from), self.graph.node_weight(to))
        else {
            return false;
        };

        let Some(kind) = EdgeKind::between(source.kind, target.kind) else {
            warn!(
                "Refusing {} -> {} edge ({} -> {})",
                source.kind, target.kind, source.id, target.id
            );
            return false;
        };

        if self.graph.contains_edge(from, to) {
            return false;
        }

        self.graph.add_edge(from, to, Edge::new(kind));
        true
    }

    /// Gets a node by its identifier.
    pub fn get_by_id(&self, id: &str) -> Option<&EntityNode> {
        let index = self.id_index.get(id)?;
        self.graph.node_weight(*index)
    }

    /// Gets a node by its graph index.
    pub fn get(&self, index: NodeId) -> Option<&EntityNode> {
        self.graph.node_weight(index)
    }

    /// Gets the node index for an identifier.
    pub fn get_index(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Class of the node with this identifier.
    pub fn kind_of(&self, id: &str) -> Option<EntityKind> {
        self.get_by_id(id).map(|node| node.kind)
    }

    /// Node indexes of one class, in insertion order.
    pub fn indexes_of(&self, kind: EntityKind) -> &[NodeId] {
        self.kind_index
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Nodes of one class, in insertion order.
    pub fn nodes_of(&self, kind: EntityKind) -> impl Iterator<Item = &EntityNode> {
        self.indexes_of(kind)
            .iter()
            .filter_map(|idx| self.graph.node_weight(*idx))
    }

    /// Identifiers of one class, in insertion order.
    pub fn ids_of(&self, kind: EntityKind) -> Vec<String> {
        self.nodes_of(kind).map(|node| node.id.clone()).collect()
    }

    /// Number of nodes in one class.
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.indexes_of(kind).len()
    }

    /// A warning for every class with no nodes.
    pub fn empty_classes(&self) -> Vec<EmptyClassWarning> {
        EntityKind::ALL
            .into_iter()
            .filter(|kind| self.count_of(*kind) == 0)
            .map(|kind| EmptyClassWarning { kind })
            .collect()
    }

    /// In-degree plus out-degree.
    pub fn degree(&self, index: NodeId) -> usize {
        self.graph.edges_directed(index, Direction::Incoming).count()
            + self.graph.edges_directed(index, Direction::Outgoing).count()
    }

    /// Nodes this node points at.
    pub fn successors(&self, index: NodeId) -> Vec<&EntityNode> {
        self.graph
            .neighbors_directed(index, Direction::Outgoing)
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    /// Nodes pointing at this node.
    pub fn predecessors(&self, index: NodeId) -> Vec<&EntityNode> {
        self.graph
            .neighbors_directed(index, Direction::Incoming)
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    /// Searches for nodes whose identifier contains the query, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&EntityNode> {
        let query_lower = query.to_lowercase();
        EntityKind::ALL
            .iter()
            .flat_map(|kind| self.nodes_of(*kind))
            .filter(|node| node.id.to_lowercase().contains(&query_lower))
            .collect()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of edges of one kind.
    pub fn edge_count_of(&self, kind: EdgeKind) -> usize {
        self.graph
            .edge_weights()
            .filter(|edge| edge.kind == kind)
            .count()
    }

    /// Iterates over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &EntityNode> {
        self.graph.node_weights()
    }

    /// Returns all edges with source and target identifiers, in insertion order.
    pub fn export_edges(&self) -> Vec<GraphEdge> {
        self.graph
            .edge_references()
            .filter_map(|edge_ref| {
                let source = self.graph.node_weight(edge_ref.source())?;
                let target = self.graph.node_weight(edge_ref.target())?;
                Some(GraphEdge {
                    source: source.id.clone(),
                    target: target.id.clone(),
                    kind: edge_ref.weight().kind,
                })
            })
            .collect()
    }
}
