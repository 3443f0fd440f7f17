//! enumscan-core: enumeration-like constant extraction for Go package trees
//!
//! Go has no enum keyword; enumerations are written as groups of constants
//! sharing a named type. This library walks a tree of Go packages, finds the
//! packages worth analyzing, infers a type for every exported constant, and
//! builds a report of constants grouped by type and package.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use enumscan_core::prelude::*;
//!
//! let result = Enumscan::new("/path/to/sdk/services").analyze()?;
//!
//! for ty in result.report.type_names() {
//!     println!("{}", ty);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`scan`]: Leaf-package discovery over the directory tree
//! - [`parse`]: Package clause scanning and full Go parsing (tree-sitter)
//! - [`enums`]: Constant shape recognition and type grouping
//! - [`report`]: Report assembly and JSON output
//! - [`builder`]: Fluent builder API for configuration
//! - [`config`]: `enumscan.toml` loading
//! - [`error`]: Typed error handling

pub mod builder;
pub mod common;
pub mod config;
pub mod enums;
pub mod error;
pub mod logging;
pub mod parse;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod source;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{EnumscanError, EnumscanResult, IoResultExt};

// Builder API
pub use builder::{AnalysisResult, Enumscan};

// Configuration
pub use config::{load_config, load_config_file, EnumscanConfig, OutputConfig, CONFIG_FILE_NAME};

// Constant classification
pub use enums::{
    classify_package, group_by_type, shape_of, strip_quotes, ConstDecl, ConstShape,
    ConstantClassifier, EnumEntry, EnumMap, LiteralKind, PLAIN_STRING_TYPE,
};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Parsing
pub use parse::{
    list_go_files, parse_go_file, read_package_clause, select_single_package, GoFile, GoPackage,
    SourceFilter, DEFAULT_MARKER_FILE,
};

// Paths
pub use common::{is_exported, normalize_path_string, relative_dest};

// Reporting
pub use report::{assemble, Report, ReportEntry};

// Package discovery
pub use scan::{
    classify_directory, discover_units, read_unit, ChildEntry, DirectoryKind, ScanOptions, Unit,
};

pub use source::SourceTextCache;
