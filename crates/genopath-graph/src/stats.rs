//! Degree statistics over the full graph.
//!
//! Always computed from the complete graph, never from the sampled edges
//! handed to a viewer. Degree is in-degree plus out-degree.
//!
//! Minimum degree is not symmetric across classes: for genes it is the
//! smallest *non-zero* degree (genes without phenotypes are listed apart as
//! uncovered), for phenotypes and diagnostics zero counts.

use crate::edge::EdgeKind;
use crate::graph::KnowledgeGraph;
use genopath_core::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use thiserror::Error;

/// Min/max degree was asked for a class that has no qualifying nodes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("degree statistics are undefined for the {0} class")]
pub struct DegreeStatUndefined(pub EntityKind);

/// Whether zero-degree nodes take part in the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinDegreePolicy {
    NonZero,
    IncludeZero,
}

impl MinDegreePolicy {
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Gene => MinDegreePolicy::NonZero,
            EntityKind::Phenotype | EntityKind::Diagnostic => MinDegreePolicy::IncludeZero,
        }
    }
}

/// A degree value and every node that attains it, in class order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeExtremum {
    pub degree: usize,
    pub nodes: Vec<String>,
}

/// Degree statistics for one entity class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    pub kind: EntityKind,
    pub node_count: usize,
    /// `None` for an empty class.
    pub average_degree: Option<f64>,
    pub max: Option<DegreeExtremum>,
    pub min: Option<DegreeExtremum>,
    pub min_policy: MinDegreePolicy,
    /// Nodes with no edges at all.
    pub zero_degree: Vec<String>,
}

impl ClassStats {
    pub fn compute(graph: &KnowledgeGraph, kind: EntityKind, min_policy: MinDegreePolicy) -> Self {
        let degrees: Vec<(&str, usize)> = graph
            .indexes_of(kind)
            .iter()
            .filter_map(|idx| Some((graph.get(*idx)?.id.as_str(), graph.degree(*idx))))
            .collect();

        let average_degree = if degrees.is_empty() {
            None
        } else {
            let sum: usize = degrees.iter().map(|(_, d)| d).sum();
            Some(sum as f64 / degrees.len() as f64)
        };

        let max = degrees
            .iter()
            .map(|(_, d)| *d)
            .max()
            .map(|degree| extremum(&degrees, degree));

        let min = degrees
            .iter()
            .map(|(_, d)| *d)
            .filter(|d| min_policy == MinDegreePolicy::IncludeZero || *d > 0)
            .min()
            .map(|degree| extremum(&degrees, degree));

        let zero_degree = degrees
            .iter()
            .filter(|(_, d)| *d == 0)
            .map(|(id, _)| id.to_string())
            .collect();

        Self {
            kind,
            node_count: degrees.len(),
            average_degree,
            max,
            min,
            min_policy,
            zero_degree,
        }
    }

    pub fn average(&self) -> Result<f64, DegreeStatUndefined> {
        self.average_degree.ok_or(DegreeStatUndefined(self.kind))
    }

    pub fn max_degree(&self) -> Result<&DegreeExtremum, DegreeStatUndefined> {
        self.max.as_ref().ok_or(DegreeStatUndefined(self.kind))
    }

    pub fn min_degree(&self) -> Result<&DegreeExtremum, DegreeStatUndefined> {
        self.min.as_ref().ok_or(DegreeStatUndefined(self.kind))
    }
}

fn extremum(degrees: &[(&str, usize)], degree: usize) -> DegreeExtremum {
    DegreeExtremum {
        degree,
        nodes: degrees
            .iter()
            .filter(|(_, d)| *d == degree)
            .map(|(id, _)| id.to_string())
            .collect(),
    }
}

/// Read-only snapshot of graph-wide counts and per-class degree statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub gene_to_pheno_edges: usize,
    pub pheno_to_diag_edges: usize,
    /// Mean degree over all nodes, `None` for an empty graph.
    pub average_degree: Option<f64>,
    pub genes: ClassStats,
    pub phenotypes: ClassStats,
    pub diagnostics: ClassStats,
}

impl GraphStats {
    pub fn compute(graph: &KnowledgeGraph) -> Self {
        let class =
            |kind: EntityKind| ClassStats::compute(graph, kind, MinDegreePolicy::for_kind(kind));

        let total_nodes = graph.node_count();
        let total_edges = graph.edge_count();
        // every edge adds one to two degrees
        let average_degree =
            (total_nodes > 0).then(|| (2 * total_edges) as f64 / total_nodes as f64);

        Self {
            total_nodes,
            total_edges,
            gene_to_pheno_edges: graph.edge_count_of(EdgeKind::GenePhenotype),
            pheno_to_diag_edges: graph.edge_count_of(EdgeKind::PhenotypeDiagnostic),
            average_degree,
            genes: class(EntityKind::Gene),
            phenotypes: class(EntityKind::Phenotype),
            diagnostics: class(EntityKind::Diagnostic),
        }
    }

    pub fn class(&self, kind: EntityKind) -> &ClassStats {
        match kind {
            EntityKind::Gene => &self.genes,
            EntityKind::Phenotype => &self.phenotypes,
            EntityKind::Diagnostic => &self.diagnostics,
        }
    }

    /// Genes with no phenotype connection.
    pub fn uncovered_genes(&self) -> &[String] {
        &self.genes.zero_degree
    }

    /// Multi-line, human-readable report.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Nodes: {} (genes {}, phenotypes {}, diagnostics {})",
            self.total_nodes,
            self.genes.node_count,
            self.phenotypes.node_count,
            self.diagnostics.node_count
        );
        let _ = writeln!(
            out,
            "Edges: {} (gene-phenotype {}, phenotype-diagnostic {})",
            self.total_edges, self.gene_to_pheno_edges, self.pheno_to_diag_edges
        );
        let _ = writeln!(out, "Average degree: {}", fmt_average(self.average_degree));

        for class in [&self.genes, &self.phenotypes, &self.diagnostics] {
            let _ = writeln!(out, "{}:", class.kind);
            let _ = writeln!(out, "  average degree: {}", fmt_average(class.average_degree));
            let _ = writeln!(out, "  max degree: {}", fmt_extremum(class.max.as_ref()));
            let _ = writeln!(out, "  min degree: {}", fmt_extremum(class.min.as_ref()));
        }

        if !self.uncovered_genes().is_empty() {
            let _ = writeln!(
                out,
                "Genes without phenotypes: {}",
                self.uncovered_genes().join(", ")
            );
        }
        out
    }
}

fn fmt_average(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "undefined".to_string())
}

fn fmt_extremum(value: Option<&DegreeExtremum>) -> String {
    match value {
        Some(ext) => format!("{} ({})", ext.degree, ext.nodes.join(", ")),
        None => "undefined".to_string(),
    }
}
