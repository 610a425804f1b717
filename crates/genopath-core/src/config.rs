//! Build configuration.
//!
//! Every knob of a build lives here: where the three source tables are,
//! the pathogenicity cut-off, shell radii and how many edges are handed to
//! the presentation layer. All fields have defaults, so a config file only
//! needs to name what it changes.

use crate::error::ConfigError;
use crate::tables::PATHOGENICITY_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default number of edges drawn.
pub const DEFAULT_EDGE_LIMIT: usize = 1000;

/// Default seed for edge sampling.
pub const DEFAULT_SAMPLING_SEED: u64 = 42;

/// Largest layout offset, in units of node index. Half an index keeps every
/// node between its spiral neighbours.
pub const MAX_LAYOUT_JITTER: f64 = 0.5;

/// Locations of the three source tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Patient variant table with pathogenicity scores.
    pub variants: PathBuf,
    /// Gene to HPO phenotype annotations.
    pub gene_phenotypes: PathBuf,
    /// HPO phenotype to MAxO diagnostic annotations.
    pub phenotype_diagnostics: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            variants: PathBuf::from("Data/vartest.tsv"),
            gene_phenotypes: PathBuf::from("Data/genes_to_phenotype.txt"),
            phenotype_diagnostics: PathBuf::from("Data/maxo_diagnostic_annotations2.txt"),
        }
    }
}

/// Cap on the number of edges handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EdgeLimitRepr", into = "EdgeLimitRepr")]
pub enum EdgeLimit {
    Limited(usize),
    Unlimited,
}

impl EdgeLimit {
    /// The cap as a number, `None` when unlimited.
    pub fn cap(&self) -> Option<usize> {
        match self {
            EdgeLimit::Limited(n) => Some(*n),
            EdgeLimit::Unlimited => None,
        }
    }
}

impl Default for EdgeLimit {
    fn default() -> Self {
        EdgeLimit::Limited(DEFAULT_EDGE_LIMIT)
    }
}

impl fmt::Display for EdgeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeLimit::Limited(n) => write!(f, "{}", n),
            EdgeLimit::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl FromStr for EdgeLimit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "unlimited" | "none" | "no-limit" | "no limit" => Ok(EdgeLimit::Unlimited),
            other => other
                .parse::<usize>()
                .map(EdgeLimit::Limited)
                .map_err(|_| ConfigError::EdgeLimit(trimmed.to_string())),
        }
    }
}

/// On-disk form: a bare number or one of the "unlimited" spellings.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum EdgeLimitRepr {
    Count(usize),
    Word(String),
}

impl TryFrom<EdgeLimitRepr> for EdgeLimit {
    type Error = ConfigError;

    fn try_from(repr: EdgeLimitRepr) -> Result<Self, Self::Error> {
        match repr {
            EdgeLimitRepr::Count(n) => Ok(EdgeLimit::Limited(n)),
            EdgeLimitRepr::Word(word) => word.parse(),
        }
    }
}

impl From<EdgeLimit> for EdgeLimitRepr {
    fn from(limit: EdgeLimit) -> Self {
        match limit {
            EdgeLimit::Limited(n) => EdgeLimitRepr::Count(n),
            EdgeLimit::Unlimited => EdgeLimitRepr::Word("unlimited".to_string()),
        }
    }
}

/// Configuration for one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub data: DataPaths,

    /// Variants scoring below this are dropped.
    pub pathogenicity_threshold: f64,

    /// Shell radii for genes, phenotypes and diagnostics.
    pub shell_radii: [f64; 3],

    /// Half-width of the per-node index offset used by the layout.
    pub layout_jitter: f64,

    /// Seed for the layout offsets. Unset means a fresh layout each build.
    pub layout_seed: Option<u64>,

    pub edge_limit: EdgeLimit,

    pub sampling_seed: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            data: DataPaths::default(),
            pathogenicity_threshold: PATHOGENICITY_THRESHOLD,
            shell_radii: [0.5, 1.0, 1.5],
            layout_jitter: 0.05,
            layout_seed: None,
            edge_limit: EdgeLimit::default(),
            sampling_seed: DEFAULT_SAMPLING_SEED,
        }
    }
}

impl BuildConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the numeric knobs are usable by the layout and the filter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pathogenicity_threshold.is_nan() {
            return Err(ConfigError::Invalid {
                field: "pathogenicity_threshold",
                message: "must be a number".to_string(),
            });
        }
        if let Some(radius) = self
            .shell_radii
            .iter()
            .find(|r| !r.is_finite() || **r <= 0.0)
        {
            return Err(ConfigError::Invalid {
                field: "shell_radii",
                message: format!("{} is not a positive finite radius", radius),
            });
        }
        if !(0.0..=MAX_LAYOUT_JITTER).contains(&self.layout_jitter) {
            return Err(ConfigError::Invalid {
                field: "layout_jitter",
                message: format!(
                    "{} is outside 0 to {}",
                    self.layout_jitter, MAX_LAYOUT_JITTER
                ),
            });
        }
        Ok(())
    }

    /// Writes this config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
