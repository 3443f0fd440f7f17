//! Shapes a `const_spec` can take.
//!
//! A `const_spec` is reduced to one of three recognized forms before any
//! text is extracted:
//!
//! ```text
//! const A Kind = "a"        ExplicitTyped   -> type "Kind", value "a"
//! const B = 5               BareLiteral     -> type "int",  value "5"
//! const C = Kind("c")       SingleArgCall   -> type "Kind", value "c"
//! ```
//!
//! Everything else is `Unrecognized` and carries the reason, so the caller
//! can report the offending constant with its location.

use std::ops::Range;

use tree_sitter::Node;

/// Lexical kind of a Go basic literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

impl LiteralKind {
    /// Maps a tree-sitter node kind to a literal kind.
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "int_literal" => Some(Self::Int),
            "float_literal" => Some(Self::Float),
            "imaginary_literal" => Some(Self::Imag),
            "rune_literal" => Some(Self::Char),
            "interpreted_string_literal" | "raw_string_literal" => Some(Self::String),
            _ => None,
        }
    }

    /// Lower-case token name used as the inferred type label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Imag => "imag",
            Self::Char => "char",
            Self::String => "string",
        }
    }
}

/// The recognized forms of a constant's declared type and value.
#[derive(Debug, Clone)]
pub enum ConstShape<'t> {
    /// `Name T = literal`
    ExplicitTyped {
        type_name: Node<'t>,
        literal: Node<'t>,
    },
    /// `Name = literal`
    BareLiteral { kind: LiteralKind, literal: Node<'t> },
    /// `Name = Callee(argument)`; `callee` is the byte range of the callee
    /// expression including any type arguments
    SingleArgCall {
        callee: Range<usize>,
        argument: Node<'t>,
    },
    Unrecognized { reason: String },
}

impl ConstShape<'_> {
    fn unrecognized(reason: impl Into<String>) -> Self {
        Self::Unrecognized {
            reason: reason.into(),
        }
    }
}

fn is_literal(node: &Node) -> bool {
    LiteralKind::from_node_kind(node.kind()).is_some()
}

fn call_arguments<'t>(arguments: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = arguments.walk();
    arguments
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Determines the shape of one constant from its declared type node (if any)
/// and its positional value node (if any).
pub fn shape_of<'t>(declared_type: Option<Node<'t>>, value: Option<Node<'t>>) -> ConstShape<'t> {
    let Some(value) = value else {
        return ConstShape::unrecognized(
            "constant has no value of its own (implicit repetition is not supported)",
        );
    };

    if let Some(type_name) = declared_type {
        if type_name.kind() != "type_identifier" {
            return ConstShape::unrecognized(format!(
                "declared type is a {} rather than a plain identifier",
                type_name.kind()
            ));
        }
        if !is_literal(&value) {
            return ConstShape::unrecognized(format!(
                "typed constant value is a {}, expected a literal",
                value.kind()
            ));
        }
        return ConstShape::ExplicitTyped {
            type_name,
            literal: value,
        };
    }

    if let Some(kind) = LiteralKind::from_node_kind(value.kind()) {
        return ConstShape::BareLiteral {
            kind,
            literal: value,
        };
    }

    match value.kind() {
        "call_expression" => {
            let (Some(function), Some(arguments)) = (
                value.child_by_field_name("function"),
                value.child_by_field_name("arguments"),
            ) else {
                return ConstShape::unrecognized("incomplete call expression");
            };
            let callee_end = value
                .child_by_field_name("type_arguments")
                .map_or(function.end_byte(), |t| t.end_byte());
            match call_arguments(arguments).as_slice() {
                [argument] => ConstShape::SingleArgCall {
                    callee: function.start_byte()..callee_end,
                    argument: *argument,
                },
                args => ConstShape::unrecognized(format!(
                    "call has {} arguments, expected exactly one",
                    args.len()
                )),
            }
        }
        "type_conversion_expression" => {
            match (
                value.child_by_field_name("type"),
                value.child_by_field_name("operand"),
            ) {
                (Some(ty), Some(operand)) => ConstShape::SingleArgCall {
                    callee: ty.byte_range(),
                    argument: operand,
                },
                _ => ConstShape::unrecognized("incomplete conversion expression"),
            }
        }
        other => ConstShape::unrecognized(format!(
            "value is a {}, expected a literal or a single-argument conversion",
            other
        )),
    }
}
