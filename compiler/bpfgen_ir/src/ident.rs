//! Identifier Sanitizing
//!
//! Turns arbitrary ELF symbol names into Go identifiers. Word boundaries
//! marked by `_` are compressed into camel case: `foo_bar` becomes `FooBar`.
//!
//! The first accepted character is always upper-cased, so the `exported`
//! flag only matters for inputs whose first kept character has no upper-case
//! form. Callers that need an unexported name must lower-case it themselves.
//!
//! Character classes are Go's: a letter is general category L and a digit is
//! category Nd. `char::is_alphabetic` and `char::is_numeric` are wider (they
//! admit `Ⅻ`, `²` and combining marks) and would let invalid names through.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Word separator deleted by [`sanitize`].
const SEPARATOR: char = '_';

/// Sanitize `name` into a Go identifier.
///
/// The result may be empty if `name` contains no letters or digits. That is
/// a usable (if unhelpful) identifier fragment, not an error: the renderer
/// always prefixes it with `Program`, `Map` or `Section`.
///
/// # Example
///
/// ```
/// use bpfgen_ir::sanitize;
///
/// assert_eq!(sanitize("foo_bar", false), "FooBar");
/// assert_eq!(sanitize("map_1", false), "Map1");
/// assert_eq!(sanitize("_leading", false), "Leading");
/// ```
pub fn sanitize(name: &str, exported: bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut capitalize = false;

    for c in name.chars() {
        if is_letter(c) {
            if out.is_empty() || capitalize {
                out.push(to_upper(c));
            } else {
                out.push(c);
            }
            capitalize = false;
        } else if is_digit(c) {
            // A digit can't start an identifier.
            if out.is_empty() {
                continue;
            }
            out.push(c);
            capitalize = false;
        } else if c == SEPARATOR {
            capitalize = true;
        }
    }

    if exported {
        upper_first(&out)
    } else {
        out
    }
}

/// Upper-case the first character of `s`, leaving the rest untouched.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => std::iter::once(to_upper(first)).chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `s` would be an exported Go identifier (starts upper-case).
pub fn is_exported(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_uppercase)
}

/// Whether `s` is a syntactically valid Go identifier.
///
/// Keywords are not rejected; they are valid in every position bpfgen
/// emits an identifier except the package clause, which is checked
/// separately by the context.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_letter(first) || first == SEPARATOR => {}
        _ => return false,
    }
    chars.all(|c| is_letter(c) || is_digit(c) || c == SEPARATOR)
}

/// Simple upper-case mapping. A character whose upper case is longer than
/// one character (`ß`, `ǰ`) is kept as is, which keeps combining marks out
/// of the result.
fn to_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// A Go letter: Unicode category Lu, Ll, Lt, Lm or Lo.
fn is_letter(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphabetic();
    }
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// A Go digit: Unicode category Nd.
fn is_digit(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_digit();
    }
    matches!(get_general_category(c), GeneralCategory::DecimalNumber)
}
