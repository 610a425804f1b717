//! Tabular loader for the three source tables.
//!
//! - variant table: one row per called variant, with a gene symbol and a
//!   pathogenicity score. Sorted by score (descending) and cut at a threshold.
//! - gene → phenotype table: HPO annotations per gene, kept only for genes
//!   that survive the variant filter.
//! - phenotype → diagnostic table: MAxO annotations per HPO term, used as-is.
//!
//! All tables are tab-separated with a header row. Columns are looked up by
//! header name, so extra or reordered columns are fine.

use crate::config::DataPaths;
use crate::error::{LoadError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Variants scoring below this are not considered pathogenic enough to show.
pub const PATHOGENICITY_THRESHOLD: f64 = 15.0;

const VARIANT_GENE_COLUMNS: &[&str] = &["Gene Symbol", "gene_symbol"];
const VARIANT_SCORE_COLUMNS: &[&str] = &["Pathogenicity Score", "pathogenicity_score"];

/// Cell spellings read as a missing value rather than as data.
const MISSING_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A row of the variant table, reduced to the columns the graph needs.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRow {
    pub gene_symbol: String,
    pub pathogenicity_score: f64,
}

/// A row of the gene → phenotype table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenePhenotypeRow {
    pub gene_symbol: String,
    pub hpo_id: String,
    pub hpo_name: Option<String>,
}

/// A row of the phenotype → diagnostic table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhenotypeDiagnosticRow {
    pub hpo_id: String,
    pub maxo_label: String,
    pub maxo_id: Option<String>,
}

/// The three cleaned tables a build starts from.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    /// Variants at or above the threshold, highest score first.
    pub variants: Vec<VariantRow>,
    /// Gene → phenotype rows whose gene appears in `variants`, in file order.
    pub gene_phenotypes: Vec<GenePhenotypeRow>,
    /// Phenotype → diagnostic rows, in file order.
    pub phenotype_diagnostics: Vec<PhenotypeDiagnosticRow>,
}

impl SourceTables {
    /// Reads and cleans all three tables. Any failure aborts the whole load.
    pub fn load(paths: &DataPaths, threshold: f64) -> Result<Self> {
        let variants = read_variants(&paths.variants)?;
        let gene_phenotypes = read_gene_phenotypes(&paths.gene_phenotypes)?;
        let phenotype_diagnostics = read_phenotype_diagnostics(&paths.phenotype_diagnostics)?;

        let tables = Self::from_rows(variants, gene_phenotypes, phenotype_diagnostics, threshold);
        info!(
            "Loaded {} variants, {} gene-phenotype rows, {} phenotype-diagnostic rows",
            tables.variants.len(),
            tables.gene_phenotypes.len(),
            tables.phenotype_diagnostics.len()
        );
        Ok(tables)
    }

    /// Applies the filters to already parsed rows.
    pub fn from_rows(
        variants: Vec<VariantRow>,
        gene_phenotypes: Vec<GenePhenotypeRow>,
        phenotype_diagnostics: Vec<PhenotypeDiagnosticRow>,
        threshold: f64,
    ) -> Self {
        let variants = filter_variants(variants, threshold);
        let gene_phenotypes = retain_variant_genes(gene_phenotypes, &variants);
        Self {
            variants,
            gene_phenotypes,
            phenotype_diagnostics,
        }
    }

    /// One gene → phenotype row per gene symbol, first occurrence wins.
    pub fn genes_view(&self) -> Vec<&GenePhenotypeRow> {
        first_by_key(&self.gene_phenotypes, |row| &row.gene_symbol)
    }

    /// One gene → phenotype row per HPO code, first occurrence wins.
    pub fn phenotypes_view(&self) -> Vec<&GenePhenotypeRow> {
        first_by_key(&self.gene_phenotypes, |row| &row.hpo_id)
    }

    /// HPO term name per phenotype code, first named row wins.
    pub fn phenotype_names(&self) -> HashMap<&str, &str> {
        let mut names = HashMap::new();
        for row in &self.gene_phenotypes {
            if let Some(name) = &row.hpo_name {
                names.entry(row.hpo_id.as_str()).or_insert(name.as_str());
            }
        }
        names
    }

    /// MAxO term identifier per diagnostic label, first row with one wins.
    pub fn diagnostic_ids(&self) -> HashMap<&str, &str> {
        let mut ids = HashMap::new();
        for row in &self.phenotype_diagnostics {
            if let Some(id) = &row.maxo_id {
                ids.entry(row.maxo_label.as_str()).or_insert(id.as_str());
            }
        }
        ids
    }
}

/// Sorts by score, highest first, and drops rows below `threshold`.
///
/// The sort is stable: equal scores keep their file order.
pub fn filter_variants(mut rows: Vec<VariantRow>, threshold: f64) -> Vec<VariantRow> {
    rows.sort_by(|a, b| b.pathogenicity_score.total_cmp(&a.pathogenicity_score));
    rows.retain(|row| row.pathogenicity_score >= threshold);
    rows
}

/// Keeps only rows whose gene symbol occurs in the variant table.
pub fn retain_variant_genes(
    rows: Vec<GenePhenotypeRow>,
    variants: &[VariantRow],
) -> Vec<GenePhenotypeRow> {
    let genes: HashSet<&str> = variants.iter().map(|v| v.gene_symbol.as_str()).collect();
    rows.into_iter()
        .filter(|row| genes.contains(row.gene_symbol.as_str()))
        .collect()
}

/// First row for every distinct key, in row order.
pub fn first_by_key<T, F>(rows: &[T], key: F) -> Vec<&T>
where
    F: Fn(&T) -> &String,
{
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(key(*row).as_str()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Readers
// ─────────────────────────────────────────────────────────────────────────────

pub fn read_variants(path: &Path) -> Result<Vec<VariantRow>> {
    let table = Table::open(path)?;
    let gene = table.column_any(VARIANT_GENE_COLUMNS)?;
    let score = table.column_any(VARIANT_SCORE_COLUMNS)?;

    let mut rows = Vec::new();
    for (row, record) in table.records() {
        let record = record?;
        let Some(gene_symbol) = field(&record, gene) else {
            debug!("{}: row {} has no gene symbol, skipping", path.display(), row);
            continue;
        };
        let raw = record.get(score).unwrap_or("").trim();
        if MISSING_VALUES.contains(&raw) {
            debug!("{}: row {} has no pathogenicity score, skipping", path.display(), row);
            continue;
        }
        let pathogenicity_score: f64 = raw.parse().map_err(|_| {
            LoadError::malformed(path, row, format!("invalid pathogenicity score '{}'", raw))
        })?;
        if pathogenicity_score.is_nan() {
            debug!("{}: row {} has a NaN pathogenicity score, skipping", path.display(), row);
            continue;
        }
        rows.push(VariantRow {
            gene_symbol,
            pathogenicity_score,
        });
    }
    Ok(rows)
}

pub fn read_gene_phenotypes(path: &Path) -> Result<Vec<GenePhenotypeRow>> {
    let table = Table::open(path)?;
    let gene = table.column("gene_symbol")?;
    let hpo = table.column("hpo_id")?;
    let name = table.optional_column("hpo_name");

    let mut rows = Vec::new();
    for (row, record) in table.records() {
        let record = record?;
        match (field(&record, gene), field(&record, hpo)) {
            (Some(gene_symbol), Some(hpo_id)) => rows.push(GenePhenotypeRow {
                gene_symbol,
                hpo_id,
                hpo_name: name.and_then(|idx| field(&record, idx)),
            }),
            _ => debug!("{}: row {} is incomplete, skipping", path.display(), row),
        }
    }
    Ok(rows)
}

pub fn read_phenotype_diagnostics(path: &Path) -> Result<Vec<PhenotypeDiagnosticRow>> {
    let table = Table::open(path)?;
    let hpo = table.column("hpo_id")?;
    let label = table.column("maxo_label")?;
    let maxo = table.optional_column("maxo_id");

    let mut rows = Vec::new();
    for (row, record) in table.records() {
        let record = record?;
        match (field(&record, hpo), field(&record, label)) {
            (Some(hpo_id), Some(maxo_label)) => rows.push(PhenotypeDiagnosticRow {
                hpo_id,
                maxo_label,
                maxo_id: maxo.and_then(|idx| field(&record, idx)),
            }),
            _ => debug!("{}: row {} is incomplete, skipping", path.display(), row),
        }
    }
    Ok(rows)
}

/// A tab-separated file with its header row already read.
struct Table<'a> {
    path: &'a Path,
    headers: StringRecord,
    reader: csv::Reader<std::fs::File>,
}

impl<'a> Table<'a> {
    fn open(path: &'a Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| LoadError::csv(path, e))?;
        let headers = reader
            .headers()
            .map_err(|e| LoadError::csv(path, e))?
            .clone();
        Ok(Self {
            path,
            headers,
            reader,
        })
    }

    fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.optional_column(name)
            .ok_or_else(|| LoadError::missing_column(self.path, name))
    }

    fn column_any(&self, names: &[&str]) -> Result<usize> {
        names
            .iter()
            .find_map(|name| self.optional_column(name))
            .ok_or_else(|| LoadError::missing_column(self.path, names[0]))
    }

    /// Data records numbered from 1.
    fn records(self) -> impl Iterator<Item = (usize, Result<StringRecord>)> + 'a {
        let path = self.path;
        self.reader
            .into_records()
            .enumerate()
            .map(move |(idx, record)| (idx + 1, record.map_err(|e| LoadError::csv(path, e))))
    }
}

/// A trimmed, non-empty field.
fn field(record: &StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn variant(gene: &str, score: f64) -> VariantRow {
        VariantRow {
            gene_symbol: gene.to_string(),
            pathogenicity_score: score,
        }
    }

    fn g2p(gene: &str, hpo: &str) -> GenePhenotypeRow {
        GenePhenotypeRow {
            gene_symbol: gene.to_string(),
            hpo_id: hpo.to_string(),
            hpo_name: None,
        }
    }

    #[test]
    fn test_filter_variants_sorts_and_cuts() {
        let rows = vec![
            variant("A", 12.0),
            variant("B", 15.0),
            variant("C", 30.5),
            variant("D", 15.0),
        ];
        let kept = filter_variants(rows, PATHOGENICITY_THRESHOLD);
        let genes: Vec<&str> = kept.iter().map(|r| r.gene_symbol.as_str()).collect();
        assert_eq!(genes, vec!["C", "B", "D"]);
    }

    #[test]
    fn test_gene_filter_and_views() {
        let tables = SourceTables::from_rows(
            vec![variant("G1", 20.0), variant("G2", 18.0), variant("G9", 1.0)],
            vec![
                g2p("G1", "HP:1"),
                g2p("G1", "HP:2"),
                g2p("G9", "HP:3"),
                g2p("G2", "HP:1"),
            ],
            vec![],
            PATHOGENICITY_THRESHOLD,
        );

        assert_eq!(tables.gene_phenotypes.len(), 3);

        let genes: Vec<&str> = tables
            .genes_view()
            .iter()
            .map(|r| r.gene_symbol.as_str())
            .collect();
        assert_eq!(genes, vec!["G1", "G2"]);

        let phenotypes: Vec<&str> = tables
            .phenotypes_view()
            .iter()
            .map(|r| r.hpo_id.as_str())
            .collect();
        assert_eq!(phenotypes, vec!["HP:1", "HP:2"]);
    }

    #[test]
    fn test_term_labels_first_named_row_wins() {
        let mut first = g2p("G1", "HP:1");
        first.hpo_name = Some("Seizure".to_string());
        let mut second = g2p("G2", "HP:1");
        second.hpo_name = Some("Fits".to_string());
        let tables = SourceTables::from_rows(
            vec![variant("G1", 20.0), variant("G2", 20.0)],
            vec![g2p("G2", "HP:2"), first, second],
            vec![
                PhenotypeDiagnosticRow {
                    hpo_id: "HP:1".to_string(),
                    maxo_label: "EEG".to_string(),
                    maxo_id: None,
                },
                PhenotypeDiagnosticRow {
                    hpo_id: "HP:2".to_string(),
                    maxo_label: "EEG".to_string(),
                    maxo_id: Some("MAXO:0000011".to_string()),
                },
            ],
            PATHOGENICITY_THRESHOLD,
        );

        let names = tables.phenotype_names();
        assert_eq!(names.get("HP:1"), Some(&"Seizure"));
        assert_eq!(names.get("HP:2"), None);
        assert_eq!(tables.diagnostic_ids().get("EEG"), Some(&"MAXO:0000011"));
    }

    #[test]
    fn test_everything_filtered_out_is_not_an_error() {
        let tables = SourceTables::from_rows(
            vec![variant("G1", 2.0)],
            vec![g2p("G1", "HP:1")],
            vec![],
            PATHOGENICITY_THRESHOLD,
        );
        assert!(tables.variants.is_empty());
        assert!(tables.gene_phenotypes.is_empty());
        assert!(tables.genes_view().is_empty());
    }

    #[test]
    fn test_read_tables_from_disk() {
        let dir = tempdir().unwrap();
        let variants = dir.path().join("variants.tsv");
        let genes = dir.path().join("genes.tsv");
        let diags = dir.path().join("diags.tsv");

        fs::write(
            &variants,
            "Chrom\tGene Symbol\tPathogenicity Score\n1\tBRCA1\t22.5\n2\tTP53\t9\n3\t\t40\n",
        )
        .unwrap();
        fs::write(
            &genes,
            "ncbi_gene_id\tgene_symbol\thpo_id\thpo_name\n672\tBRCA1\tHP:0003002\tBreast carcinoma\n",
        )
        .unwrap();
        fs::write(
            &diags,
            "hpo_id\tmaxo_id\tmaxo_label\nHP:0003002\tMAXO:0000123\tmammography\n",
        )
        .unwrap();

        let paths = DataPaths {
            variants,
            gene_phenotypes: genes,
            phenotype_diagnostics: diags,
        };
        let tables = SourceTables::load(&paths, PATHOGENICITY_THRESHOLD).unwrap();

        assert_eq!(tables.variants, vec![variant("BRCA1", 22.5)]);
        assert_eq!(
            tables.gene_phenotypes[0].hpo_name.as_deref(),
            Some("Breast carcinoma")
        );
        assert_eq!(tables.phenotype_diagnostics[0].maxo_label, "mammography");
        assert_eq!(
            tables.phenotype_diagnostics[0].maxo_id.as_deref(),
            Some("MAXO:0000123")
        );
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let paths = DataPaths {
            variants: dir.path().join("nope.tsv"),
            ..DataPaths::default()
        };
        let err = SourceTables::load(&paths, PATHOGENICITY_THRESHOLD).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("genes.tsv");
        fs::write(&path, "gene_symbol\thpo_name\nBRCA1\tBreast carcinoma\n").unwrap();

        let err = read_gene_phenotypes(&path).unwrap_err();
        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "hpo_id"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_score_reports_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variants.tsv");
        fs::write(
            &path,
            "Gene Symbol\tPathogenicity Score\nBRCA1\t20\nTP53\thigh\n",
        )
        .unwrap();

        let err = read_variants(&path).unwrap_err();
        match err {
            LoadError::Malformed { row, .. } => assert_eq!(row, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_scores_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variants.tsv");
        fs::write(
            &path,
            "Gene Symbol\tPathogenicity Score\n\
             BRCA1\t22\nTP53\t\nKRAS\tNA\nEGFR\tNaN\nMYC\tnull\nALK\t#N/A\nRET\t16\n",
        )
        .unwrap();

        let rows = read_variants(&path).unwrap();
        let genes: Vec<&str> = rows.iter().map(|r| r.gene_symbol.as_str()).collect();
        assert_eq!(genes, vec!["BRCA1", "RET"]);
    }
}
