//! GenoPhenoPath Core - entities, tables and configuration
//!
//! This crate holds everything the graph layer needs before a single node
//! exists: the three entity classes, the loaders for the source tables and
//! the configuration surface of a build.
//!
//! # Example
//!
//! ```no_run
//! use genopath_core::{BuildConfig, SourceTables};
//!
//! let config = BuildConfig::default();
//! let tables = SourceTables::load(&config.data, config.pathogenicity_threshold)?;
//! println!("{} variant rows kept", tables.variants.len());
//! # Ok::<(), genopath_core::LoadError>(())
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod tables;

pub use config::{
    BuildConfig, DataPaths, EdgeLimit, DEFAULT_EDGE_LIMIT, DEFAULT_SAMPLING_SEED,
    MAX_LAYOUT_JITTER,
};
pub use error::{ConfigError, EmptyClassWarning, LoadError, Result};
pub use node::{EntityKind, EntityNode};
pub use tables::{
    GenePhenotypeRow, PhenotypeDiagnosticRow, SourceTables, VariantRow, PATHOGENICITY_THRESHOLD,
};
