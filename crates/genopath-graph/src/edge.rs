//! Edge types for the knowledge graph.
//!
//! Only two relationships exist: a gene is associated with a phenotype, and
//! a phenotype is investigated by a diagnostic measure. Nothing else is ever
//! constructed, so the kind is derived from the endpoint classes.

use genopath_core::EntityKind;
use serde::{Deserialize, Serialize};

/// The type of relationship between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Gene A is annotated with phenotype B.
    GenePhenotype,

    /// Phenotype A is investigated by diagnostic measure B.
    PhenotypeDiagnostic,
}

impl EdgeKind {
    /// The edge kind for a (source, target) class pair, if that pair is permitted.
    pub fn between(source: EntityKind, target: EntityKind) -> Option<Self> {
        if source.downstream() != Some(target) {
            return None;
        }
        match source {
            EntityKind::Gene => Some(Self::GenePhenotype),
            EntityKind::Phenotype => Some(Self::PhenotypeDiagnostic),
            EntityKind::Diagnostic => None,
        }
    }

    /// Classes at the two ends of this kind of edge.
    pub fn endpoints(&self) -> (EntityKind, EntityKind) {
        match self {
            Self::GenePhenotype => (EntityKind::Gene, EntityKind::Phenotype),
            Self::PhenotypeDiagnostic => (EntityKind::Phenotype, EntityKind::Diagnostic),
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::GenePhenotype => "gene_phenotype",
            Self::PhenotypeDiagnostic => "phenotype_diagnostic",
        };
        write!(f, "{}", s)
    }
}

/// Weight stored on every graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(kind: EdgeKind) -> Self {
        Self { kind }
    }
}

/// A simplified edge for export and drawing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_two_pairs_are_permitted() {
        let mut permitted = Vec::new();
        for source in EntityKind::ALL {
            for target in EntityKind::ALL {
                if let Some(kind) = EdgeKind::between(source, target) {
                    assert_eq!(kind.endpoints(), (source, target));
                    permitted.push(kind);
                }
            }
        }
        assert_eq!(
            permitted,
            vec![EdgeKind::GenePhenotype, EdgeKind::PhenotypeDiagnostic]
        );
    }
}
