//! Builder pattern API for enumeration scans.
//!
//! ```rust,ignore
//! use enumscan_core::prelude::*;
//!
//! let result = Enumscan::new("/path/to/sdk/services")
//!     .ignore_patterns(["^docs"])
//!     .skip_preview(true)
//!     .analyze()?;
//!
//! result.report.write_json(Path::new("enums.json"), true)?;
//! ```

use std::path::PathBuf;

use tracing::info;

use crate::enums::classify_package;
use crate::error::EnumscanResult;
use crate::parse::{SourceFilter, DEFAULT_MARKER_FILE};
use crate::report::{assemble, Report};
use crate::scan::{discover_units, ScanOptions, Unit};

/// Builder for configuring a scan.
#[derive(Debug, Clone)]
pub struct Enumscan {
    /// Root of the source tree
    root: PathBuf,

    /// Marker file that redirects analysis to the parent directory
    marker_file: String,

    /// Whether `*_test.go` files are parsed
    include_test_files: bool,

    /// Regexes over relative directory paths that prune traversal
    ignore_patterns: Vec<String>,

    /// Drop preview API versions
    skip_preview: bool,
}

impl Enumscan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            marker_file: DEFAULT_MARKER_FILE.to_string(),
            include_test_files: true,
            ignore_patterns: Vec::new(),
            skip_preview: false,
        }
    }

    pub fn marker_file(mut self, name: impl Into<String>) -> Self {
        self.marker_file = name.into();
        self
    }

    pub fn include_test_files(mut self, enabled: bool) -> Self {
        self.include_test_files = enabled;
        self
    }

    /// Add directory ignore patterns (regular expressions).
    pub fn ignore_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignore_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn skip_preview(mut self, enabled: bool) -> Self {
        self.skip_preview = enabled;
        self
    }

    fn scan_options(&self) -> EnumscanResult<ScanOptions> {
        let options = ScanOptions {
            filter: SourceFilter {
                marker_file: self.marker_file.clone(),
                include_test_files: self.include_test_files,
            },
            ignore: Vec::new(),
            skip_preview: self.skip_preview,
        };
        options.with_ignore_patterns(&self.ignore_patterns)
    }

    /// Discover packages, classify their constants, and build the report.
    pub fn analyze(&self) -> EnumscanResult<AnalysisResult> {
        let options = self.scan_options()?;

        // 1. Find leaf packages
        let units = discover_units(&self.root, &options)?;

        // 2. Classify each package with a fresh classifier
        let report = assemble(&units, |unit| classify_package(&unit.path, &options.filter))?;

        info!(
            root = %self.root.display(),
            packages = units.len(),
            names = report.len(),
            constants = report.total_constants(),
            "scan complete"
        );

        Ok(AnalysisResult {
            root: self.root.clone(),
            units,
            report,
        })
    }
}

/// Result of running a scan.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Root path that was scanned
    pub root: PathBuf,

    /// Packages analyzed, in traversal order
    pub units: Vec<Unit>,

    pub report: Report,
}

impl AnalysisResult {
    pub fn package_count(&self) -> usize {
        self.units.len()
    }

    /// Total number of classified constants.
    pub fn constant_count(&self) -> usize {
        self.report.total_constants()
    }

    /// Packages under a management-plane path.
    pub fn management_plane_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_management_plane())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn create_test_tree(root: &Path) {
        let files = [
            (
                "compute/mgmt/2019/compute/enums.go",
                "package compute\n\ntype Kind string\n\nconst (\n\tKindA Kind = \"a\"\n\tKindB Kind = \"b\"\n)\n",
            ),
            ("compute/mgmt/2019/compute/computeapi/interfaces.go", "package computeapi\n"),
            (
                "web/mgmt/2020-preview/web/enums.go",
                "package web\n\nconst TierFree Tier = \"Free\"\n",
            ),
        ];
        for (rel, content) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }

    #[test]
    fn test_builder_basic() {
        let dir = tempfile::tempdir().unwrap();
        create_test_tree(dir.path());

        let result = Enumscan::new(dir.path()).analyze().unwrap();

        assert_eq!(result.package_count(), 2);
        assert_eq!(result.constant_count(), 3);
        let compute = result.report.get("compute").unwrap();
        assert_eq!(compute[0].dest, "compute/mgmt/2019/compute");
        assert_eq!(compute[0].enums["Kind"].len(), 2);
        assert_eq!(result.management_plane_units().count(), 2);
    }

    #[test]
    fn test_builder_skip_preview() {
        let dir = tempfile::tempdir().unwrap();
        create_test_tree(dir.path());

        let result = Enumscan::new(dir.path()).skip_preview(true).analyze().unwrap();
        assert_eq!(result.package_count(), 1);
        assert!(result.report.get("web").is_none());
    }

    #[test]
    fn test_builder_ignore_patterns() {
        let dir = tempfile::tempdir().unwrap();
        create_test_tree(dir.path());

        let result = Enumscan::new(dir.path())
            .ignore_patterns(["^web"])
            .analyze()
            .unwrap();
        assert_eq!(result.report.package_names().collect::<Vec<_>>(), vec!["compute"]);
    }

    #[test]
    fn test_builder_custom_marker() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("svc/svcapi")).unwrap();
        fs::write(root.join("svc/enums.go"), "package svc\nconst A Mode = \"a\"\n").unwrap();
        fs::write(root.join("svc/svcapi/api.go"), "package svcapi\n").unwrap();

        let result = Enumscan::new(root).marker_file("api.go").analyze().unwrap();
        assert_eq!(result.units[0].dest, "svc");
        assert!(result.report.get("svc").unwrap()[0].enums.contains_key("Mode"));
    }

    #[test]
    fn test_builder_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Enumscan::new(dir.path()).ignore_patterns(["["]).analyze().is_err());
    }
}
