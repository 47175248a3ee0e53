// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. table::TableError)
    clippy::module_name_repetitions
)]

//! # Bioreport
//!
//! Venn diagrams and run logs for bioinformatics reports.
//!
//! A typical job reads a table whose columns are gene (or sample, or
//! feature) lists, draws the overlap of 2 to 4 of them, and writes:
//! - the diagram as PNG and/or SVG
//! - the lists side by side as a padded table
//! - a timestamped log of what happened
//!
//! ## Modules
//!
//! - [`logger`]: Leveled console/file logging
//! - [`venn`]: Set normalization, canvas sizing, rendering, saving
//! - [`table`]: Reading and writing column tables
//! - [`config`]: Persisted command-line defaults

pub mod config;
pub mod logger;
pub mod table;
pub mod venn;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::logger::{DebugValue, Level, Logger, LoggerConfig};
    pub use crate::table::{Table, read_table};
    pub use crate::venn::{
        NamedSet, OutputFormat, VennEngine, VennError, VennOptions, VennResult, draw_venn_plot,
    };
}
