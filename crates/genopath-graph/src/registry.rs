use genopath_core::{EntityKind, SourceTables};
use indexmap::IndexSet;

/// The typed entity registry.
///
/// Holds one insertion-ordered set of identifiers per entity class. The
/// order is the order the identifiers were first seen in the source views
/// and later decides where each node sits on its shell.
#[derive(Debug, Default, Clone)]
pub struct EntityRegistry {
    genes: IndexSet<String>,
    phenotypes: IndexSet<String>,
    diagnostics: IndexSet<String>,
}

impl EntityRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every entity the cleaned tables mention.
    ///
    /// * genes - the gene-deduplicated gene → phenotype view
    /// * phenotypes - the phenotype-deduplicated gene → phenotype view
    /// * diagnostics - the MAxO labels of the phenotype → diagnostic table
    pub fn from_tables(tables: &SourceTables) -> Self {
        let mut registry = Self::new();
        for row in tables.genes_view() {
            registry.insert(EntityKind::Gene, &row.gene_symbol);
        }
        for row in tables.phenotypes_view() {
            registry.insert(EntityKind::Phenotype, &row.hpo_id);
        }
        for row in &tables.phenotype_diagnostics {
            registry.insert(EntityKind::Diagnostic, &row.maxo_label);
        }
        registry
    }

    /// Registers an identifier. Returns false if the class already had it.
    pub fn insert(&mut self, kind: EntityKind, id: &str) -> bool {
        let set = self.set_mut(kind);
        if set.contains(id) {
            return false;
        }
        set.insert(id.to_string())
    }

    /// Identifiers of one class, in first-seen order.
    pub fn ids(&self, kind: EntityKind) -> &IndexSet<String> {
        match kind {
            EntityKind::Gene => &self.genes,
            EntityKind::Phenotype => &self.phenotypes,
            EntityKind::Diagnostic => &self.diagnostics,
        }
    }

    /// The first class (innermost shell first) holding this identifier.
    pub fn kind_of(&self, id: &str) -> Option<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| self.ids(*kind).contains(id))
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.ids(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    /// All registered entities, class by class.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &str)> {
        EntityKind::ALL.into_iter().flat_map(move |kind| {
            self.ids(kind).iter().map(move |id| (kind, id.as_str()))
        })
    }

    fn set_mut(&mut self, kind: EntityKind) -> &mut IndexSet<String> {
        match kind {
            EntityKind::Gene => &mut self.genes,
            EntityKind::Phenotype => &mut self.phenotypes,
            EntityKind::Diagnostic => &mut self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genopath_core::{GenePhenotypeRow, PhenotypeDiagnosticRow, VariantRow};

    fn tables() -> SourceTables {
        let variants = ["G2", "G1", "G4"]
            .iter()
            .map(|g| VariantRow {
                gene_symbol: g.to_string(),
                pathogenicity_score: 20.0,
            })
            .collect();
        let g2p = [("G2", "P2"), ("G2", "P1"), ("G1", "P1")]
            .iter()
            .map(|(g, p)| GenePhenotypeRow {
                gene_symbol: g.to_string(),
                hpo_id: p.to_string(),
                hpo_name: None,
            })
            .collect();
        let p2d = [("P1", "D2"), ("P1", "D1"), ("P2", "D2")]
            .iter()
            .map(|(p, d)| PhenotypeDiagnosticRow {
                hpo_id: p.to_string(),
                maxo_label: d.to_string(),
                maxo_id: None,
            })
            .collect();
        SourceTables::from_rows(variants, g2p, p2d, 15.0)
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let registry = EntityRegistry::from_tables(&tables());

        let genes: Vec<&str> = registry.ids(EntityKind::Gene).iter().map(String::as_str).collect();
        let phens: Vec<&str> = registry
            .ids(EntityKind::Phenotype)
            .iter()
            .map(String::as_str)
            .collect();
        let diags: Vec<&str> = registry
            .ids(EntityKind::Diagnostic)
            .iter()
            .map(String::as_str)
            .collect();

        assert_eq!(genes, vec!["G2", "G1"]);
        assert_eq!(phens, vec!["P2", "P1"]);
        assert_eq!(diags, vec!["D2", "D1"]);
    }

    #[test]
    fn test_gene_without_phenotypes_is_never_registered() {
        let registry = EntityRegistry::from_tables(&tables());
        assert_eq!(registry.kind_of("G4"), None);
        assert_eq!(registry.kind_of("G1"), Some(EntityKind::Gene));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut registry = EntityRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.insert(EntityKind::Diagnostic, "D1"));
        assert!(!registry.insert(EntityKind::Diagnostic, "D1"));

        assert!(!registry.is_empty());
        assert_eq!(registry.len(EntityKind::Gene), 0);
        assert_eq!(registry.iter().count(), 1);
    }
}
