//! Enumeration candidate extraction from Go constant declarations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │      shape.rs       │     │  enum_extractor.rs  │
//! │  ─────────────────  │     │  ─────────────────  │
//! │  Reduce a const     │────▶│  Load package,      │
//! │  spec to a closed   │     │  resolve text,      │
//! │  set of shapes      │     │  group by type      │
//! └─────────────────────┘     └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use enumscan_core::enums::{classify_package, ConstantClassifier};
//! use enumscan_core::parse::SourceFilter;
//!
//! let enums = classify_package(&dir, &SourceFilter::default())?;
//! for (ty, members) in &enums {
//!     println!("{ty}: {} members", members.len());
//! }
//! ```

pub mod enum_extractor;
pub mod shape;

pub use enum_extractor::{
    classify_package, group_by_type, strip_quotes, ConstDecl, ConstantClassifier, EnumEntry,
    EnumMap, PLAIN_STRING_TYPE,
};
pub use shape::{shape_of, ConstShape, LiteralKind};
