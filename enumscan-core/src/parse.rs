//! Go syntax layer.
//!
//! Two levels of parsing are offered:
//! - [`read_package_clause`]: a cheap scan that reads only the `package`
//!   clause of a file, skipping leading comments. Used by discovery.
//! - [`parse_go_file`]: a full tree-sitter parse. Any syntax error is fatal
//!   and reported with its line and column.
//!
//! File selection is shared by both passes through [`SourceFilter`], which
//! keeps the auxiliary marker file (and, on request, `_test.go` files) out of
//! the parse set.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tree_sitter::{Node, Parser, Tree};

use crate::common::is_exported;
use crate::error::{EnumscanError, EnumscanResult, IoResultExt};

/// Extension of Go source files.
pub const GO_EXTENSION: &str = "go";

/// Conventional name of the generated interfaces file whose presence marks
/// a directory as an auxiliary `*api` package.
pub const DEFAULT_MARKER_FILE: &str = "interfaces.go";

const TEST_FILE_SUFFIX: &str = "_test.go";

/// Decides which `.go` files of a directory take part in parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter {
    /// File name excluded from every parse pass.
    pub marker_file: String,
    /// Whether `*_test.go` files are parsed. On by default, so an external
    /// `package x_test` file makes its directory ambiguous.
    pub include_test_files: bool,
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self {
            marker_file: DEFAULT_MARKER_FILE.to_string(),
            include_test_files: true,
        }
    }
}

impl SourceFilter {
    /// Returns true if a file with this name should be parsed.
    pub fn accepts(&self, file_name: &str) -> bool {
        if file_name == self.marker_file {
            return false;
        }
        if !self.include_test_files && file_name.ends_with(TEST_FILE_SUFFIX) {
            return false;
        }
        Path::new(file_name)
            .extension()
            .is_some_and(|ext| ext == GO_EXTENSION)
    }
}

/// Lists the Go files of `dir` accepted by `filter`, sorted by file name.
pub fn list_go_files(dir: &Path, filter: &SourceFilter) -> EnumscanResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        let file_type = entry.file_type().with_path(entry.path())?;
        if file_type.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if filter.accepts(&name.to_string_lossy()) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Requires exactly one distinct package name among the files of `dir`.
pub fn select_single_package(dir: &Path, names: BTreeSet<String>) -> EnumscanResult<String> {
    let mut iter = names.into_iter();
    match (iter.next(), iter.next()) {
        (None, _) => Err(EnumscanError::discovery(dir, "didn't find any packages")),
        (Some(name), None) => Ok(name),
        (Some(first), Some(second)) => {
            let mut all = vec![first, second];
            all.extend(iter);
            Err(EnumscanError::discovery(
                dir,
                format!("found more than one package: {}", all.join(", ")),
            ))
        }
    }
}

// ============================================================================
// Package clause only
// ============================================================================

/// Cursor over Go source that understands whitespace and comments only.
struct ClauseScanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> ClauseScanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn skip_trivia(&mut self) -> Result<(), &'static str> {
        loop {
            let rest = &self.src[self.pos..];
            let trimmed =
                rest.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
            self.pos += rest.len() - trimmed.len();

            if let Some(after) = trimmed.strip_prefix("//") {
                match after.find('\n') {
                    Some(i) => self.pos += 2 + i + 1,
                    None => self.pos = self.src.len(),
                }
            } else if let Some(after) = trimmed.strip_prefix("/*") {
                match after.find("*/") {
                    Some(i) => self.pos += 2 + i + 2,
                    None => return Err("comment not terminated"),
                }
            } else {
                return Ok(());
            }
        }
    }

    fn peek_identifier(&self) -> Option<&'a str> {
        let rest = &self.src[self.pos..];
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if c.is_alphabetic() || c == '_' => {}
            _ => return None,
        }
        let end = chars
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        Some(&rest[..end])
    }

    fn position(&self) -> (usize, usize) {
        line_column(self.src, self.pos)
    }
}

fn line_column(src: &str, offset: usize) -> (usize, usize) {
    let before = &src[..offset];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => offset - nl,
        None => offset + 1,
    };
    (line, column)
}

/// Reads the package name from the `package` clause of a Go file without
/// parsing the rest of it.
pub fn read_package_clause(path: &Path, source: &str) -> EnumscanResult<String> {
    let mut scanner = ClauseScanner::new(source);
    let fail = |scanner: &ClauseScanner, message: &str| {
        let (line, column) = scanner.position();
        EnumscanError::parse_at(path, message, line, column)
    };

    scanner.skip_trivia().map_err(|m| fail(&scanner, m))?;
    match scanner.peek_identifier() {
        Some(keyword @ "package") => scanner.pos += keyword.len(),
        _ => return Err(fail(&scanner, "expected 'package'")),
    }
    scanner.skip_trivia().map_err(|m| fail(&scanner, m))?;
    match scanner.peek_identifier() {
        Some("_") => Err(fail(&scanner, "invalid package name _")),
        Some(name) => Ok(name.to_string()),
        None => Err(fail(&scanner, "expected package name")),
    }
}

// ============================================================================
// Full parse
// ============================================================================

/// Creates a tree-sitter parser configured for Go.
pub fn new_go_parser() -> EnumscanResult<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| EnumscanError::internal(format!("failed to set Go language: {}", e)))?;
    Ok(parser)
}

/// A fully parsed Go file.
#[derive(Debug)]
pub struct GoFile {
    /// Path the tree was parsed from
    pub path: PathBuf,
    /// Name from the package clause
    pub package: String,
    tree: Tree,
}

impl GoFile {
    /// Root `source_file` node.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// All parsed files of one package directory.
#[derive(Debug)]
pub struct GoPackage {
    /// Package name shared by every file
    pub name: String,
    /// Directory the files were read from
    pub dir: PathBuf,
    /// Files in file-name order
    pub files: Vec<GoFile>,
}

/// Returns the UTF-8 text of `node`, or an empty string on invalid UTF-8.
pub fn node_text<'s>(node: &Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// 1-indexed line and column of the start of `node`.
pub fn node_location(node: &Node) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column + 1)
}

fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Parses `source` as a complete Go file.
pub fn parse_go_file(parser: &mut Parser, path: &Path, source: &[u8]) -> EnumscanResult<GoFile> {
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| EnumscanError::internal(format!("no syntax tree for {}", path.display())))?;

    let root = tree.root_node();
    if let Some(bad) = first_error(root) {
        let (line, column) = node_location(&bad);
        let message = if bad.is_missing() {
            format!("missing {}", bad.kind())
        } else {
            format!("syntax error near '{}'", truncate(node_text(&bad, source), 40))
        };
        return Err(EnumscanError::parse_at(path, message, line, column));
    }

    let package = package_name(root, source)
        .ok_or_else(|| EnumscanError::parse(path, "expected 'package'"))?;

    Ok(GoFile {
        path: path.to_path_buf(),
        package,
        tree,
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    line.chars().take(max_chars).collect()
}

fn package_name(root: Node, source: &[u8]) -> Option<String> {
    let mut cursor = root.walk();
    let clause = root
        .named_children(&mut cursor)
        .find(|n| n.kind() == "package_clause")?;
    let mut clause_cursor = clause.walk();
    let ident = clause
        .named_children(&mut clause_cursor)
        .find(|n| n.kind() == "package_identifier")?;
    Some(node_text(&ident, source).to_string())
}

/// Collects the spec nodes of kind `spec_kind` in a declaration, looking
/// through grouping `*_list` nodes.
pub fn declaration_specs<'t>(decl: Node<'t>, spec_kind: &str) -> Vec<Node<'t>> {
    let mut cursor = decl.walk();
    let mut specs = Vec::new();
    let children: Vec<Node<'t>> = decl.named_children(&mut cursor).collect();
    for child in children {
        if child.kind() == spec_kind {
            specs.push(child);
        } else if child.kind().ends_with("_list") {
            specs.extend(declaration_specs(child, spec_kind));
        }
    }
    specs
}

/// Name nodes of a `const_spec` or `var_spec`, in declaration order.
pub fn spec_names<'t>(spec: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = spec.walk();
    spec.children_by_field_name("name", &mut cursor).collect()
}

/// Names of all exported top-level declarations of a file.
pub fn exported_names(root: Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = root.walk();
    let decls: Vec<Node> = root.named_children(&mut cursor).collect();

    for decl in decls {
        let candidates: Vec<Node> = match decl.kind() {
            "function_declaration" | "method_declaration" => {
                decl.child_by_field_name("name").into_iter().collect()
            }
            "type_declaration" => {
                let mut specs = declaration_specs(decl, "type_spec");
                specs.extend(declaration_specs(decl, "type_alias"));
                specs
                    .into_iter()
                    .filter_map(|s| s.child_by_field_name("name"))
                    .collect()
            }
            "const_declaration" => declaration_specs(decl, "const_spec")
                .into_iter()
                .flat_map(spec_names)
                .collect(),
            "var_declaration" => declaration_specs(decl, "var_spec")
                .into_iter()
                .flat_map(spec_names)
                .collect(),
            _ => Vec::new(),
        };

        names.extend(
            candidates
                .iter()
                .map(|n| node_text(n, source))
                .filter(|name| is_exported(name))
                .map(str::to_string),
        );
    }

    names
}
