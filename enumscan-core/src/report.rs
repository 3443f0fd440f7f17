//! Report assembly and JSON output.
//!
//! The report is keyed by package name. Several directories can share one
//! name (stable and preview API versions, for instance), so each key holds
//! one entry per directory, in traversal order:
//!
//! ```json
//! {
//!   "compute": [
//!     {
//!       "dest": "compute/mgmt/2019-07-01/compute",
//!       "enums": { "CachingTypes": [{ "name": "CachingTypesNone", "value": "None" }] }
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enums::{EnumMap, PLAIN_STRING_TYPE};
use crate::error::{EnumscanError, EnumscanResult};
use crate::scan::Unit;

/// Enumeration candidates of one package directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Package directory relative to the scanned root
    pub dest: String,
    /// Members grouped by inferred type
    pub enums: EnumMap,
}

/// Package name to the directories declaring that package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    packages: BTreeMap<String, Vec<ReportEntry>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the classification of one unit under its package name.
    pub fn add_unit(&mut self, unit: &Unit, mut enums: EnumMap) {
        enums.remove(PLAIN_STRING_TYPE);
        self.packages
            .entry(unit.name.clone())
            .or_default()
            .push(ReportEntry {
                dest: unit.dest.clone(),
                enums,
            });
    }

    pub fn get(&self, package: &str) -> Option<&[ReportEntry]> {
        self.packages.get(package).map(Vec::as_slice)
    }

    /// Package names in sorted order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Every entry of every package.
    pub fn entries(&self) -> impl Iterator<Item = &ReportEntry> {
        self.packages.values().flatten()
    }

    /// Number of distinct package names.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Total number of constants across all entries.
    pub fn total_constants(&self) -> usize {
        self.entries()
            .flat_map(|entry| entry.enums.values())
            .map(Vec::len)
            .sum()
    }

    /// Serializes the report. Pretty output uses two-space indentation.
    pub fn to_json(&self, pretty: bool) -> EnumscanResult<String> {
        let result = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        result.map_err(|e| EnumscanError::internal(format!("failed to serialize report: {}", e)))
    }

    /// Writes the report to `path`, replacing any existing file.
    ///
    /// The JSON goes to a sibling temporary file first and is renamed into
    /// place, so a failed run never leaves a truncated report behind.
    pub fn write_json(&self, path: &Path, pretty: bool) -> EnumscanResult<()> {
        let json = self.to_json(pretty)?;
        let tmp = temp_sibling(path);
        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(EnumscanError::io(&tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(EnumscanError::io(path, e));
        }
        debug!(path = %path.display(), packages = self.len(), "report written");
        Ok(())
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "report.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Builds the report from discovered units in order.
///
/// `classify` is called once per unit; the first error aborts assembly.
pub fn assemble<F>(units: &[Unit], mut classify: F) -> EnumscanResult<Report>
where
    F: FnMut(&Unit) -> EnumscanResult<EnumMap>,
{
    let mut report = Report::new();
    for unit in units {
        let enums = classify(unit)?;
        debug!(package = %unit.name, dest = %unit.dest, types = enums.len(), "classified package");
        report.add_unit(unit, enums);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EnumEntry;

    fn unit(name: &str, dest: &str) -> Unit {
        Unit {
            name: name.to_string(),
            path: PathBuf::from("/root").join(dest),
            dest: dest.to_string(),
        }
    }

    fn enum_map(items: &[(&str, &[(&str, &str)])]) -> EnumMap {
        items
            .iter()
            .map(|(ty, entries)| {
                let entries = entries
                    .iter()
                    .map(|(n, v)| EnumEntry {
                        name: n.to_string(),
                        value: v.to_string(),
                    })
                    .collect();
                (ty.to_string(), entries)
            })
            .collect()
    }

    #[test]
    fn test_assemble_groups_by_package_in_unit_order() {
        let units = [
            unit("web", "web/mgmt/2020/web"),
            unit("compute", "compute/mgmt/2019/compute"),
            unit("web", "web/mgmt/2019-preview/web"),
        ];
        let report = assemble(&units, |u| {
            Ok(match u.name.as_str() {
                "web" => enum_map(&[("Tier", &[("TierFree", "Free")])]),
                _ => enum_map(&[("Kind", &[("KindA", "a"), ("KindB", "b")])]),
            })
        })
        .unwrap();

        assert_eq!(report.package_names().collect::<Vec<_>>(), vec!["compute", "web"]);
        let web = report.get("web").unwrap();
        assert_eq!(web.len(), 2);
        assert_eq!(web[0].dest, "web/mgmt/2020/web");
        assert_eq!(web[1].dest, "web/mgmt/2019-preview/web");
        assert_eq!(report.total_constants(), 4);
        assert!(web.iter().all(|entry| entry.enums.contains_key("Tier")));
    }

    #[test]
    fn test_string_type_never_reported() {
        let units = [unit("p", "p")];
        let report = assemble(&units, |_| {
            Ok(enum_map(&[("string", &[("Name", "x")]), ("Kind", &[("KindA", "a")])]))
        })
        .unwrap();
        let entry = &report.get("p").unwrap()[0];
        assert!(!entry.enums.contains_key("string"));
        assert_eq!(entry.enums.len(), 1);
    }

    #[test]
    fn test_package_without_candidates_still_listed() {
        let units = [unit("p", "p")];
        let report = assemble(&units, |_| Ok(enum_map(&[("string", &[("Name", "x")])]))).unwrap();
        let entry = &report.get("p").unwrap()[0];
        assert!(entry.enums.is_empty());
        assert_eq!(
            report.to_json(false).unwrap(),
            r#"{"p":[{"dest":"p","enums":{}}]}"#
        );
    }

    #[test]
    fn test_assemble_stops_at_first_error() {
        let units = [unit("a", "a"), unit("b", "b"), unit("c", "c")];
        let mut seen = Vec::new();
        let err = assemble(&units, |u| {
            seen.push(u.dest.clone());
            if u.dest == "b" {
                Err(EnumscanError::internal("boom"))
            } else {
                Ok(EnumMap::new())
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn test_no_units_gives_empty_object() {
        let report = assemble(&[], |_| Ok(EnumMap::new())).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.to_json(true).unwrap(), "{}");
    }

    #[test]
    fn test_json_shape() {
        let mut report = Report::new();
        report.add_unit(&unit("svc", "svc/v1"), enum_map(&[("Kind", &[("KindA", "a")])]));

        let value: serde_json::Value = serde_json::from_str(&report.to_json(false).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "svc": [{ "dest": "svc/v1", "enums": { "Kind": [{ "name": "KindA", "value": "a" }] } }]
            })
        );
    }

    #[test]
    fn test_pretty_json_uses_two_space_indent() {
        let mut report = Report::new();
        report.add_unit(&unit("p", "p"), enum_map(&[("Kind", &[("KindA", "a")])]));
        let json = report.to_json(true).unwrap();
        assert!(json.starts_with("{\n  \"p\": [\n    {\n      \"dest\""), "{json}");
    }

    #[test]
    fn test_write_json_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("enums.json");
        fs::write(&out, "stale").unwrap();

        let mut report = Report::new();
        report.add_unit(&unit("p", "p"), enum_map(&[("Kind", &[("KindA", "a")])]));
        report.write_json(&out, true).unwrap();

        let parsed: Report = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(parsed, report);
        assert!(!dir.path().join("enums.json.tmp").exists());
    }

    #[test]
    fn test_write_json_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing/enums.json");
        let err = Report::new().write_json(&out, true).unwrap_err();
        assert!(matches!(err, EnumscanError::Io { .. }));
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("enums.json");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("keep"), "").unwrap();

        let err = Report::new().write_json(&out, true).unwrap_err();
        assert_eq!(err.path(), Some(&out));
        assert!(!dir.path().join("enums.json.tmp").exists());
        assert!(out.join("keep").exists());
    }
}
