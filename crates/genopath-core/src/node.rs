//! Entity node types.
//!
//! Every node in the knowledge graph belongs to exactly one of three
//! disjoint classes. The class decides which shell the node is placed on
//! and which edges it may take part in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The class of an entity in the knowledge graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A gene symbol from the patient's filtered variants.
    Gene,

    /// An HPO phenotype code.
    Phenotype,

    /// A MAxO diagnostic measure label.
    Diagnostic,
}

impl EntityKind {
    /// All classes, innermost shell first.
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Gene,
        EntityKind::Phenotype,
        EntityKind::Diagnostic,
    ];

    /// Index of the shell this class is placed on (0 = innermost).
    pub fn shell(&self) -> usize {
        match self {
            EntityKind::Gene => 0,
            EntityKind::Phenotype => 1,
            EntityKind::Diagnostic => 2,
        }
    }

    /// The class an edge from this class is allowed to point at.
    pub fn downstream(&self) -> Option<EntityKind> {
        match self {
            EntityKind::Gene => Some(EntityKind::Phenotype),
            EntityKind::Phenotype => Some(EntityKind::Diagnostic),
            EntityKind::Diagnostic => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Gene => "gene",
            EntityKind::Phenotype => "phenotype",
            EntityKind::Diagnostic => "diagnostic",
        }
    }

    /// Class label attached to nodes, as shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Gene => "Gene",
            EntityKind::Phenotype => "Phenotype",
            EntityKind::Diagnostic => "Diagnostic",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A node in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNode {
    /// Gene symbol, HPO code or MAxO label.
    pub id: String,

    /// Class tag, fixed on first insertion.
    pub kind: EntityKind,
}

impl EntityNode {
    pub fn new(id: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn gene(id: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Gene)
    }

    pub fn phenotype(id: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Phenotype)
    }

    pub fn diagnostic(id: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shells_are_ordered() {
        let shells: Vec<usize> = EntityKind::ALL.iter().map(|k| k.shell()).collect();
        assert_eq!(shells, vec![0, 1, 2]);
    }

    #[test]
    fn test_downstream_chain() {
        assert_eq!(EntityKind::Gene.downstream(), Some(EntityKind::Phenotype));
        assert_eq!(
            EntityKind::Phenotype.downstream(),
            Some(EntityKind::Diagnostic)
        );
        assert_eq!(EntityKind::Diagnostic.downstream(), None);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::Diagnostic).unwrap();
        assert_eq!(json, "\"diagnostic\"");
    }
}
