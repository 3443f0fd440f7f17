//! Constant classification for a single Go package.
//!
//! Loads every selected file of a package directory, then walks the
//! top-level `const` declarations and infers a type label and a literal
//! value for each exported constant. Constants are grouped by inferred type;
//! plain `string` constants are dropped from the result.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tree_sitter::{Node, Parser};

use super::shape::{shape_of, ConstShape};
use crate::common::is_exported;
use crate::error::{EnumscanError, EnumscanResult};
use crate::parse::{
    declaration_specs, exported_names, list_go_files, new_go_parser, node_location,
    parse_go_file, select_single_package, spec_names, GoPackage, SourceFilter,
};
use crate::source::SourceTextCache;

/// Type label of untyped string constants, which are not reported.
pub const PLAIN_STRING_TYPE: &str = "string";

/// One member of an enumeration candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub name: String,
    pub value: String,
}

/// Inferred type label to its members.
pub type EnumMap = BTreeMap<String, Vec<EnumEntry>>;

/// A resolved exported constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDecl {
    pub name: String,
    pub inferred_type: String,
    /// Literal text with one pair of surrounding double quotes removed
    pub value: String,
}

/// Constants keyed by name, keeping first-seen order. A later declaration
/// with the same name replaces the earlier one in place.
#[derive(Debug, Default)]
struct ConstTable {
    decls: Vec<ConstDecl>,
    index: HashMap<String, usize>,
}

impl ConstTable {
    fn insert(&mut self, decl: ConstDecl) -> Option<ConstDecl> {
        match self.index.get(&decl.name) {
            Some(&i) => Some(std::mem::replace(&mut self.decls[i], decl)),
            None => {
                self.index.insert(decl.name.clone(), self.decls.len());
                self.decls.push(decl);
                None
            }
        }
    }
}

/// Removes one leading and one trailing `"` when the text is a quoted
/// string. Rune and raw string literals keep their delimiters.
pub fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(raw)
}

/// Groups constants by inferred type and drops the plain `string` group.
pub fn group_by_type(decls: impl IntoIterator<Item = ConstDecl>) -> EnumMap {
    let mut map = EnumMap::new();
    for decl in decls {
        map.entry(decl.inferred_type).or_default().push(EnumEntry {
            name: decl.name,
            value: decl.value,
        });
    }
    map.remove(PLAIN_STRING_TYPE);
    map
}

fn expression_items(list: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Infers constant types for one package.
///
/// Owns the Go parser and the source cache used for the package; create a
/// new classifier for every package.
pub struct ConstantClassifier {
    parser: Parser,
    cache: SourceTextCache,
}

impl ConstantClassifier {
    pub fn new() -> EnumscanResult<Self> {
        Ok(Self {
            parser: new_go_parser()?,
            cache: SourceTextCache::new(),
        })
    }

    /// Fully parses the package in `dir`.
    ///
    /// Fails on syntax errors, when the files do not agree on exactly one
    /// package name, and when the package exports nothing.
    pub fn load_package(&mut self, dir: &Path, filter: &SourceFilter) -> EnumscanResult<GoPackage> {
        let paths = list_go_files(dir, filter)?;
        let mut files = Vec::with_capacity(paths.len());
        let mut names = BTreeSet::new();

        for path in paths {
            let source = self.cache.load(&path)?;
            let file = parse_go_file(&mut self.parser, &path, source)?;
            names.insert(file.package.clone());
            files.push(file);
        }

        let name = select_single_package(dir, names)?;

        let mut exports = 0;
        for file in &files {
            let source = self.cache.load(&file.path)?;
            exports += exported_names(file.root(), source).len();
        }
        if exports == 0 {
            return Err(EnumscanError::NoExports {
                package: name,
                path: dir.to_path_buf(),
            });
        }

        debug!(package = %name, files = files.len(), exports, "loaded package");
        Ok(GoPackage {
            name,
            dir: dir.to_path_buf(),
            files,
        })
    }

    /// Resolves every exported top-level constant of `package`.
    pub fn constants(&mut self, package: &GoPackage) -> EnumscanResult<Vec<ConstDecl>> {
        let mut table = ConstTable::default();

        for file in &package.files {
            let root = file.root();
            let mut cursor = root.walk();
            let decls: Vec<Node> = root
                .named_children(&mut cursor)
                .filter(|n| n.kind() == "const_declaration")
                .collect();

            for decl in decls {
                for spec in declaration_specs(decl, "const_spec") {
                    let declared_type = spec.child_by_field_name("type");
                    let values = spec
                        .child_by_field_name("value")
                        .map(expression_items)
                        .unwrap_or_default();

                    for (i, name_node) in spec_names(spec).into_iter().enumerate() {
                        let name = self.cache.slice(&file.path, name_node.byte_range())?;
                        if !is_exported(&name) {
                            continue;
                        }
                        let shape = shape_of(declared_type, values.get(i).copied());
                        let resolved = self.resolve(&file.path, name, &name_node, shape)?;
                        if let Some(previous) = table.insert(resolved) {
                            warn!(
                                package = %package.name,
                                constant = %previous.name,
                                file = %file.path.display(),
                                "constant declared more than once, keeping the later declaration"
                            );
                        }
                    }
                }
            }
        }

        Ok(table.decls)
    }

    /// Groups the package's exported constants into enumeration candidates.
    pub fn classify(&mut self, package: &GoPackage) -> EnumscanResult<EnumMap> {
        let decls = self.constants(package)?;
        Ok(group_by_type(decls))
    }

    fn resolve(
        &mut self,
        path: &Path,
        name: String,
        name_node: &Node,
        shape: ConstShape,
    ) -> EnumscanResult<ConstDecl> {
        let (inferred_type, raw) = match shape {
            ConstShape::ExplicitTyped { type_name, literal } => (
                self.cache.slice(path, type_name.byte_range())?,
                self.cache.slice(path, literal.byte_range())?,
            ),
            ConstShape::BareLiteral { kind, literal } => (
                kind.label().to_string(),
                self.cache.slice(path, literal.byte_range())?,
            ),
            ConstShape::SingleArgCall { callee, argument } => (
                self.cache.slice(path, callee)?,
                self.cache.slice(path, argument.byte_range())?,
            ),
            ConstShape::Unrecognized { reason } => {
                let (line, column) = node_location(name_node);
                return Err(EnumscanError::UnrecognizedConstant {
                    name,
                    path: path.to_path_buf(),
                    line,
                    column,
                    reason,
                });
            }
        };

        let value = strip_quotes(&raw).to_string();
        Ok(ConstDecl {
            name,
            inferred_type,
            value,
        })
    }
}

/// Loads and classifies the package in `dir` with a fresh classifier.
pub fn classify_package(dir: &Path, filter: &SourceFilter) -> EnumscanResult<EnumMap> {
    let mut classifier = ConstantClassifier::new()?;
    let package = classifier.load_package(dir, filter)?;
    classifier.classify(&package)
}
