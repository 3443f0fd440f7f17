//! Path normalization for report destinations.

use std::path::Path;

/// Normalize a path string to use forward slashes consistently.
#[inline]
pub fn normalize_path_string(path: &str) -> String {
    path.replace('\\', "/")
}

/// Returns `path` relative to `root`, `/`-separated and without a leading
/// separator. The root itself maps to the empty string.
///
/// Returns `None` when `path` is not under `root`.
pub fn relative_dest(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Some(normalize_path_string(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_backslashes() {
        assert_eq!(
            normalize_path_string(r"compute\mgmt\2019-07-01\compute"),
            "compute/mgmt/2019-07-01/compute"
        );
    }

    #[test]
    fn test_relative_dest_nested() {
        let root = PathBuf::from("/sdk/services");
        let dir = root.join("compute").join("mgmt").join("compute");
        assert_eq!(
            relative_dest(&root, &dir).as_deref(),
            Some("compute/mgmt/compute")
        );
    }

    #[test]
    fn test_relative_dest_root_is_empty() {
        let root = PathBuf::from("/sdk/services");
        assert_eq!(relative_dest(&root, &root).as_deref(), Some(""));
    }

    #[test]
    fn test_relative_dest_outside_root() {
        let root = PathBuf::from("/sdk/services");
        assert_eq!(relative_dest(&root, Path::new("/sdk")), None);
    }
}
