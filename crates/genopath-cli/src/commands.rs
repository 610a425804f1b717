//! CLI command implementations.

use crate::SourceArgs;
use colored::Colorize;
use genopath_core::{BuildConfig, EdgeLimit, EntityKind};
use genopath_graph::{load_and_build, BuildOutput, RenderEdges};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Name of the config file looked up in the working directory.
const CONFIG_FILE: &str = "genopath.json";

/// Spinner captions cycled while the build runs.
const LOADING_MESSAGES: &[&str] = &[
    "Reading variant tables...",
    "Mapping genes to phenotypes...",
    "Mapping phenotypes to diagnostics...",
    "Placing nodes on shells...",
];

/// Write a default config file.
pub fn init(path: &Path) -> Result<()> {
    let config_path = path.join(CONFIG_FILE);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    fs::create_dir_all(path)?;
    BuildConfig::default().save(&config_path)?;

    println!("{} Wrote {}", "✓".green(), config_path.display());
    println!(
        "  Point {} at your tables, then run {}",
        "data".cyan(),
        "genopath build".cyan()
    );

    Ok(())
}

/// Build the graph and print node and edge counts.
pub async fn build(sources: &SourceArgs) -> Result<()> {
    let output = run_build(resolve_config(sources)?).await?;

    println!(
        "{} Graph loaded in {:.2} seconds",
        "✓".green(),
        output.elapsed.as_secs_f64()
    );
    print_warnings(&output);

    let stats = &output.stats;
    println!();
    println!(
        "  {:<28}{}",
        "Genes",
        stats.genes.node_count.to_string().cyan()
    );
    println!(
        "  {:<28}{}",
        "Phenotypes",
        stats.phenotypes.node_count.to_string().cyan()
    );
    println!(
        "  {:<28}{}",
        "Diagnostic Measures",
        stats.diagnostics.node_count.to_string().cyan()
    );
    println!(
        "  {:<28}{}",
        "Gene-Phenotype Edges",
        stats.gene_to_pheno_edges.to_string().cyan()
    );
    println!(
        "  {:<28}{}",
        "Phenotype-Diagnostic Edges",
        stats.pheno_to_diag_edges.to_string().cyan()
    );
    println!(
        "  {:<28}{}",
        "Total Edges",
        stats.total_edges.to_string().cyan()
    );

    Ok(())
}

/// Print degree statistics.
pub async fn stats(sources: &SourceArgs, json: bool) -> Result<()> {
    let output = run_build(resolve_config(sources)?).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output.stats)?);
        return Ok(());
    }

    print_warnings(&output);
    print!("{}", output.stats.summary());
    Ok(())
}

/// Export the graph for a viewer.
pub async fn export(sources: &SourceArgs, path: &Path, limit: Option<EdgeLimit>) -> Result<()> {
    let config = resolve_config(sources)?;
    let limit = limit.unwrap_or(config.edge_limit);
    let seed = config.sampling_seed;
    let output = run_build(config).await?;

    let edges = output.render_edges(limit, seed);
    if edges.is_sampled() {
        println!(
            "{} Exporting {} of {} edges (limit {})",
            "⚠".yellow(),
            edges.len(),
            edges.total_edges,
            limit
        );
    }

    let document = export_document(&output, &edges, limit);
    fs::write(path, serde_json::to_string_pretty(&document)?)?;
    println!("{} Exported to {}", "✓".green(), path.display());

    Ok(())
}

fn export_document(
    output: &BuildOutput,
    edges: &RenderEdges,
    limit: EdgeLimit,
) -> serde_json::Value {
    let nodes: Vec<_> = EntityKind::ALL
        .iter()
        .flat_map(|kind| output.ids(*kind).iter().map(move |id| (*kind, id)))
        .filter_map(|(kind, id)| {
            let position = output.layout.get(id)?;
            Some(json!({
                "id": id,
                "class": kind,
                "label": output.label(id),
                "x": position.x,
                "y": position.y,
                "z": position.z,
            }))
        })
        .collect();

    json!({
        "version": env!("CARGO_PKG_VERSION"),
        "edgeLimit": limit,
        "sampled": edges.is_sampled(),
        "nodes": nodes,
        "edges": edges,
        "stats": output.stats,
    })
}

/// Search node identifiers.
pub async fn search(sources: &SourceArgs, term: &str) -> Result<()> {
    let output = run_build(resolve_config(sources)?).await?;
    let matches = output.graph.search(term);

    if matches.is_empty() {
        println!("No nodes found matching \"{}\"", term);
        return Ok(());
    }

    for kind in EntityKind::ALL {
        let ids: Vec<&str> = matches
            .iter()
            .filter(|node| node.kind == kind)
            .map(|node| node.id.as_str())
            .collect();
        if ids.is_empty() {
            continue;
        }
        println!(
            "{} {}",
            format!("{}s:", kind.label()).yellow(),
            ids.join(", ")
        );
    }

    Ok(())
}

/// Runs the build on a blocking worker while a spinner shows progress.
async fn run_build(config: BuildConfig) -> Result<BuildOutput> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Building knowledge graph...");

    let handle = tokio::task::spawn_blocking(move || load_and_build(&config));

    let mut frame = 0;
    while !handle.is_finished() {
        tokio::time::sleep(Duration::from_millis(400)).await;
        spinner.set_message(LOADING_MESSAGES[frame % LOADING_MESSAGES.len()]);
        frame += 1;
    }

    let result = handle.await;
    spinner.finish_and_clear();

    Ok(result??)
}

/// Config file (explicit, or ./genopath.json if present, or defaults) plus
/// command-line overrides.
fn resolve_config(sources: &SourceArgs) -> Result<BuildConfig> {
    let mut config = match &sources.config {
        Some(path) => BuildConfig::load(path)?,
        None if Path::new(CONFIG_FILE).exists() => BuildConfig::load(CONFIG_FILE)?,
        None => BuildConfig::default(),
    };

    override_path(&mut config.data.variants, &sources.variants);
    override_path(&mut config.data.gene_phenotypes, &sources.gene_phenotypes);
    override_path(&mut config.data.phenotype_diagnostics, &sources.diagnostics);
    config.validate()?;

    debug!("Using config: {:?}", config);
    Ok(config)
}

fn override_path(target: &mut PathBuf, value: &Option<PathBuf>) {
    if let Some(path) = value {
        *target = path.clone();
    }
}

fn print_warnings(output: &BuildOutput) {
    for warning in &output.warnings {
        println!("{} {}", "⚠".yellow(), warning);
    }
}
