//! Small helpers shared by the walker and the classifier.

mod paths;
mod visibility;

pub use paths::{normalize_path_string, relative_dest};
pub use visibility::is_exported;
