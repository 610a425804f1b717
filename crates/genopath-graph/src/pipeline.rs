//! The one-shot build: tables in, graph + layout + statistics out.
//!
//! Nothing is cached between builds. Every call starts from the tables and
//! produces a fresh, independent result, so callers are free to run it on
//! whatever thread they like and keep whatever they want of the output.

use crate::builder::GraphBuilder;
use crate::graph::KnowledgeGraph;
use crate::layout::{Layout, ShellLayout};
use crate::registry::EntityRegistry;
use crate::sampler::RenderEdges;
use crate::stats::GraphStats;
use genopath_core::{BuildConfig, EdgeLimit, EmptyClassWarning, EntityKind, SourceTables};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Everything a presentation layer needs from one build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub graph: KnowledgeGraph,
    pub genes: Vec<String>,
    pub phenotypes: Vec<String>,
    pub diagnostics: Vec<String>,
    pub layout: Layout,
    /// Ontology annotation per node: the HPO term name of a phenotype, the
    /// MAxO identifier of a diagnostic. Absent when the table has none.
    pub labels: HashMap<String, String>,
    pub stats: GraphStats,
    pub warnings: Vec<EmptyClassWarning>,
    pub elapsed: Duration,
}

impl BuildOutput {
    /// Ordered identifiers of one class.
    pub fn ids(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Gene => &self.genes,
            EntityKind::Phenotype => &self.phenotypes,
            EntityKind::Diagnostic => &self.diagnostics,
        }
    }

    pub fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Edges to draw, sampled under `limit`. The graph is left untouched.
    pub fn render_edges(&self, limit: EdgeLimit, seed: u64) -> RenderEdges {
        RenderEdges::sample(&self.graph.export_edges(), limit, seed)
    }
}

/// Builds graph, layout and statistics from already loaded tables.
pub fn build(tables: &SourceTables, config: &BuildConfig) -> BuildOutput {
    let start = Instant::now();

    let registry = EntityRegistry::from_tables(tables);
    let graph = GraphBuilder::from_tables(&registry, tables);

    let warnings = graph.empty_classes();
    for warning in &warnings {
        warn!("{}", warning);
    }

    let shells = ShellLayout::new(config.shell_radii, config.layout_jitter);
    let layout = shells.compute_seeded(&graph, config.layout_seed);
    let stats = GraphStats::compute(&graph);
    let labels = annotation_labels(&graph, tables);

    let elapsed = start.elapsed();
    info!(
        "Build finished in {}ms: {} nodes, {} edges",
        elapsed.as_millis(),
        stats.total_nodes,
        stats.total_edges
    );

    BuildOutput {
        genes: graph.ids_of(EntityKind::Gene),
        phenotypes: graph.ids_of(EntityKind::Phenotype),
        diagnostics: graph.ids_of(EntityKind::Diagnostic),
        graph,
        layout,
        labels,
        stats,
        warnings,
        elapsed,
    }
}

fn annotation_labels(graph: &KnowledgeGraph, tables: &SourceTables) -> HashMap<String, String> {
    let names = tables.phenotype_names();
    let maxo_ids = tables.diagnostic_ids();
    graph
        .nodes()
        .filter_map(|node| {
            let label = match node.kind {
                EntityKind::Gene => None,
                EntityKind::Phenotype => names.get(node.id.as_str()),
                EntityKind::Diagnostic => maxo_ids.get(node.id.as_str()),
            }?;
            Some((node.id.clone(), label.to_string()))
        })
        .collect()
}

/// Loads the configured tables and builds from them.
///
/// Fails only if a table cannot be loaded; no partial output is returned.
pub fn load_and_build(config: &BuildConfig) -> genopath_core::Result<BuildOutput> {
    let start = Instant::now();
    let tables = SourceTables::load(&config.data, config.pathogenicity_threshold)?;
    let mut output = build(&tables, config);
    output.elapsed = start.elapsed();
    Ok(output)
}
