//! Go export rule for identifiers.

/// Returns true when `name` is exported: its first character is an
/// upper-case letter.
///
/// The blank identifier `_` and names starting with a lower-case letter,
/// a digit or an underscore are package-private.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
