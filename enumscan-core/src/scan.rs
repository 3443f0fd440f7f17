//! Package discovery over a directory tree.
//!
//! Non-leaf directories are organizational only: a directory is analyzed
//! when it has no child directories. Generated `*api` directories carry an
//! `interfaces.go` marker and hold no declarations of interest; for those
//! the parent directory is analyzed instead.
//!
//! Traversal is sequential and sorted by file name so the unit order is
//! stable between runs. Every error aborts the walk.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::common::relative_dest;
use crate::error::{EnumscanError, EnumscanResult, IoResultExt};
use crate::parse::{list_go_files, read_package_clause, select_single_package, SourceFilter};

/// Immediate child of a directory, as seen by the leaf policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub name: String,
    pub is_dir: bool,
}

impl ChildEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Outcome of the leaf policy for one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryKind {
    /// Has child directories; not analyzed itself
    Skip,
    /// Analyze this directory
    Leaf(PathBuf),
    /// Contains the marker file; analyze the parent directory
    RedirectedLeaf(PathBuf),
}

/// Decides whether `dir` is analyzed, given its immediate children.
///
/// A directory without a parent is never redirected.
pub fn classify_directory(dir: &Path, children: &[ChildEntry], marker_file: &str) -> DirectoryKind {
    if children.iter().any(|c| c.is_dir) {
        return DirectoryKind::Skip;
    }
    if children.iter().any(|c| c.name == marker_file) {
        if let Some(parent) = dir.parent() {
            return DirectoryKind::RedirectedLeaf(parent.to_path_buf());
        }
    }
    DirectoryKind::Leaf(dir.to_path_buf())
}

/// A discovered Go package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    /// Package name from the package clause
    pub name: String,
    /// Directory that is analyzed (after redirect)
    pub path: PathBuf,
    /// `path` relative to the scanned root, `/`-separated
    pub dest: String,
}

impl Unit {
    /// Returns true for management-plane packages (a `mgmt` path segment).
    pub fn is_management_plane(&self) -> bool {
        self.dest.split('/').any(|segment| segment == "mgmt")
    }

    /// Returns true for preview API versions.
    pub fn is_preview(&self) -> bool {
        self.dest.contains("preview")
    }
}

/// Discovery settings.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Which files take part in parsing
    pub filter: SourceFilter,
    /// Directories whose relative path matches any of these are not traversed
    pub ignore: Vec<Regex>,
    /// Drop units whose destination mentions `preview`
    pub skip_preview: bool,
}

impl ScanOptions {
    /// Compiles `patterns` and adds them to the ignore list.
    pub fn with_ignore_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> EnumscanResult<Self> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|e| {
                EnumscanError::invalid_argument(format!("bad ignore pattern '{}': {}", pattern, e))
            })?;
            self.ignore.push(regex);
        }
        Ok(self)
    }
}

/// Checks if a directory entry matches an ignore pattern and should be
/// pruned from traversal. Nothing is pruned unless patterns are configured.
#[inline]
fn is_pruned(root: &Path, entry: &walkdir::DirEntry, options: &ScanOptions) -> bool {
    if options.ignore.is_empty() || !entry.file_type().is_dir() {
        return false;
    }
    relative_dest(root, entry.path())
        .is_some_and(|dest| options.ignore.iter().any(|re| re.is_match(&dest)))
}

fn walk_error(root: &Path, err: walkdir::Error) -> EnumscanError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let message = err.to_string();
    EnumscanError::Io {
        path,
        message,
        source: err.into_io_error(),
    }
}

fn list_children(dir: &Path) -> EnumscanResult<Vec<ChildEntry>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        let file_type = entry.file_type().with_path(entry.path())?;
        children.push(ChildEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: file_type.is_dir(),
        });
    }
    Ok(children)
}

/// Reads only the package clauses in `dir` and builds its unit.
pub fn read_unit(root: &Path, dir: &Path, filter: &SourceFilter) -> EnumscanResult<Unit> {
    let mut names = BTreeSet::new();
    for file in list_go_files(dir, filter)? {
        let source = fs::read_to_string(&file).with_path(&file)?;
        names.insert(read_package_clause(&file, &source)?);
    }
    let name = select_single_package(dir, names)?;

    let dest = relative_dest(root, dir).ok_or_else(|| {
        EnumscanError::discovery(dir, format!("outside the scanned root {}", root.display()))
    })?;

    Ok(Unit {
        name,
        path: dir.to_path_buf(),
        dest,
    })
}

/// Walks `root` and returns every leaf package in traversal order.
pub fn discover_units(root: &Path, options: &ScanOptions) -> EnumscanResult<Vec<Unit>> {
    let mut units = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_pruned(root, e, options));

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path();
        let children = list_children(dir)?;
        let target = match classify_directory(dir, &children, &options.filter.marker_file) {
            DirectoryKind::Skip => continue,
            DirectoryKind::Leaf(path) => path,
            DirectoryKind::RedirectedLeaf(parent) => {
                debug!(
                    leaf = %dir.display(),
                    target = %parent.display(),
                    "marker file found, analyzing parent directory"
                );
                parent
            }
        };

        let unit = read_unit(root, &target, &options.filter)?;
        if options.skip_preview && unit.is_preview() {
            debug!(dest = %unit.dest, "skipping preview package");
            continue;
        }
        info!(package = %unit.name, dest = %unit.dest, "discovered package");
        units.push(unit);
    }

    Ok(units)
}
