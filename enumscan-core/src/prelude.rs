//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use enumscan_core::prelude::*;
//! ```

// Core types
pub use crate::error::{EnumscanError, EnumscanResult};
pub use crate::scan::{discover_units, ScanOptions, Unit};

// Classification
pub use crate::enums::{classify_package, EnumEntry, EnumMap};

// Reporting
pub use crate::report::{assemble, Report, ReportEntry};

// Configuration
pub use crate::config::{load_config, EnumscanConfig};

// Builder API
pub use crate::builder::{AnalysisResult, Enumscan};
