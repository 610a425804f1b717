//! Graph builder for constructing the knowledge graph from the source tables.
//!
//! The builder works in two passes:
//! 1. Add every registered entity as a node, class by class
//! 2. Group the association tables by their source key and add one edge
//!    per (source, target) pair
//!
//! Grouping is explicit, so the tables do not need to be sorted by key.

use crate::graph::{KnowledgeGraph, NodeId};
use crate::registry::EntityRegistry;
use genopath_core::{
    EntityKind, EntityNode, GenePhenotypeRow, PhenotypeDiagnosticRow, SourceTables,
};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

/// Builds a KnowledgeGraph from a registry and the association tables.
pub struct GraphBuilder {
    graph: KnowledgeGraph,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            graph: KnowledgeGraph::new(),
        }
    }

    /// Builds the full graph for one load.
    pub fn from_tables(registry: &EntityRegistry, tables: &SourceTables) -> KnowledgeGraph {
        let mut builder = Self::new();
        builder.add_entities(registry);
        builder.connect_genes(&tables.gene_phenotypes);
        builder.connect_phenotypes(&tables.phenotype_diagnostics);
        builder.build()
    }

    /// Adds every registered entity, genes first.
    pub fn add_entities(&mut self, registry: &EntityRegistry) {
        for (kind, id) in registry.iter() {
            self.graph.add_node(EntityNode::new(id, kind));
        }
    }

    /// Adds gene → phenotype edges.
    pub fn connect_genes(&mut self, rows: &[GenePhenotypeRow]) {
        let groups = group_by_source(
            rows.iter()
                .map(|row| (row.gene_symbol.as_str(), row.hpo_id.as_str())),
        );
        let added = self.connect(&groups, EntityKind::Gene, EntityKind::Phenotype);
        debug!("{} genes connected by {} edges", groups.len(), added);
    }

    /// Adds phenotype → diagnostic edges.
    ///
    /// Phenotypes that only appear in this table become Phenotype nodes.
    pub fn connect_phenotypes(&mut self, rows: &[PhenotypeDiagnosticRow]) {
        let groups = group_by_source(
            rows.iter()
                .map(|row| (row.hpo_id.as_str(), row.maxo_label.as_str())),
        );
        let before = self.graph.count_of(EntityKind::Phenotype);
        let added = self.connect(&groups, EntityKind::Phenotype, EntityKind::Diagnostic);
        debug!(
            "{} phenotypes connected by {} edges ({} only known from diagnostics)",
            groups.len(),
            added,
            self.graph.count_of(EntityKind::Phenotype) - before
        );
    }

    /// Finishes building and returns the graph.
    pub fn build(self) -> KnowledgeGraph {
        info!(
            "Built graph: {} genes, {} phenotypes, {} diagnostics, {} edges",
            self.graph.count_of(EntityKind::Gene),
            self.graph.count_of(EntityKind::Phenotype),
            self.graph.count_of(EntityKind::Diagnostic),
            self.graph.edge_count()
        );
        self.graph
    }

    fn connect(
        &mut self,
        groups: &IndexMap<&str, IndexSet<&str>>,
        source_kind: EntityKind,
        target_kind: EntityKind,
    ) -> usize {
        let mut added = 0;
        for (source, targets) in groups {
            let from = self.ensure_node(source, source_kind);
            for target in targets {
                let to = self.ensure_node(target, target_kind);
                if self.graph.add_edge(from, to) {
                    added += 1;
                }
            }
        }
        added
    }

    fn ensure_node(&mut self, id: &str, kind: EntityKind) -> NodeId {
        match self.graph.get_index(id) {
            Some(index) => index,
            None => self.graph.add_node(EntityNode::new(id, kind)),
        }
    }
}

/// Groups (source, target) pairs by source, keeping first-seen order for
/// both sources and targets. Repeated pairs collapse into one.
fn group_by_source<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> IndexMap<&'a str, IndexSet<&'a str>> {
    let mut groups: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
    for (source, target) in pairs {
        groups.entry(source).or_default().insert(target);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{EdgeKind, GraphEdge};
    use genopath_core::VariantRow;

    fn tables(genes: &[(&str, &str)], diags: &[(&str, &str)]) -> SourceTables {
        let variants = genes
            .iter()
            .map(|(g, _)| VariantRow {
                gene_symbol: g.to_string(),
                pathogenicity_score: 99.0,
            })
            .collect();
        let g2p = genes
            .iter()
            .map(|(g, p)| GenePhenotypeRow {
                gene_symbol: g.to_string(),
                hpo_id: p.to_string(),
                hpo_name: None,
            })
            .collect();
        let p2d = diags
            .iter()
            .map(|(p, d)| PhenotypeDiagnosticRow {
                hpo_id: p.to_string(),
                maxo_label: d.to_string(),
                maxo_id: None,
            })
            .collect();
        SourceTables::from_rows(variants, g2p, p2d, 15.0)
    }

    fn build(tables: &SourceTables) -> KnowledgeGraph {
        GraphBuilder::from_tables(&EntityRegistry::from_tables(tables), tables)
    }

    fn pairs(graph: &KnowledgeGraph) -> Vec<(String, String)> {
        graph
            .export_edges()
            .into_iter()
            .map(|GraphEdge { source, target, .. }| (source, target))
            .collect()
    }

    #[test]
    fn test_three_genes_one_phenotype() {
        let tables = tables(
            &[("G1", "P1"), ("G2", "P1"), ("G3", "P1")],
            &[("P1", "D1"), ("P1", "D2")],
        );
        let graph = build(&tables);

        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count_of(EdgeKind::GenePhenotype), 3);
        assert_eq!(graph.edge_count_of(EdgeKind::PhenotypeDiagnostic), 2);

        let edges = pairs(&graph);
        for (s, t) in [("G1", "P1"), ("G2", "P1"), ("G3", "P1"), ("P1", "D1"), ("P1", "D2")] {
            assert!(edges.contains(&(s.to_string(), t.to_string())), "{s} -> {t}");
        }
    }

    #[test]
    fn test_last_group_is_flushed() {
        let tables = tables(&[("G1", "P1"), ("G2", "P2")], &[("P2", "D9")]);
        let graph = build(&tables);

        let edges = pairs(&graph);
        assert!(edges.contains(&("G2".into(), "P2".into())));
        assert!(edges.contains(&("P2".into(), "D9".into())));
    }

    #[test]
    fn test_non_contiguous_rows_still_connect() {
        let tables = tables(
            &[("G1", "P1"), ("G2", "P2"), ("G1", "P3"), ("G1", "P1")],
            &[],
        );
        let graph = build(&tables);

        let g1 = graph.get_index("G1").unwrap();
        let mut targets: Vec<&str> = graph.successors(g1).iter().map(|n| n.id.as_str()).collect();
        targets.sort();
        assert_eq!(targets, vec!["P1", "P3"]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_phenotype_only_in_diagnostics_becomes_node() {
        let tables = tables(&[("G1", "P1")], &[("P7", "D1")]);
        let graph = build(&tables);

        assert_eq!(graph.kind_of("P7"), Some(EntityKind::Phenotype));
        assert_eq!(graph.ids_of(EntityKind::Phenotype), vec!["P1", "P7"]);
    }

    #[test]
    fn test_edges_always_join_permitted_classes() {
        let tables = tables(
            &[("G1", "P1"), ("G1", "P2"), ("G2", "P2")],
            &[("P1", "D1"), ("P2", "D1"), ("P3", "D2")],
        );
        let graph = build(&tables);

        for edge in graph.export_edges() {
            let pair = (
                graph.kind_of(&edge.source).unwrap(),
                graph.kind_of(&edge.target).unwrap(),
            );
            assert_eq!(pair, edge.kind.endpoints());
        }
    }

    #[test]
    fn test_empty_tables_build_empty_graph() {
        let graph = build(&SourceTables::default());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
