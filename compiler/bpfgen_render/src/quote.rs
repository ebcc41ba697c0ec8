//! Go string literals for names taken from the object file.
//!
//! Symbol names are arbitrary bytes as far as the ELF format is concerned,
//! so every name that lands in generated source goes through [`go_quote`].

/// Quote `s` as an interpreted Go string literal.
///
/// Quotes, backslashes and control characters are escaped; everything else
/// is kept as is, so ordinary names read the same as in the object file.
pub fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            // The Go compiler rejects a byte order mark inside a file.
            c if c.is_control() || c == '\u{feff}' => out.push_str(&escape(c)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn escape(c: char) -> String {
    let code = u32::from(c);
    if code < 0x80 {
        format!("\\x{code:02x}")
    } else if code <= 0xffff {
        format!("\\u{code:04x}")
    } else {
        format!("\\U{code:08x}")
    }
}

/// The struct tag that binds a field to `name` at load time.
///
/// Emitted as a raw string unless the quoted name contains a backquote,
/// which a raw string cannot hold.
///
/// # Example
///
/// ```
/// use bpfgen_render::struct_tag;
///
/// assert_eq!(struct_tag("xdp_prog"), r#"`ebpf:"xdp_prog"`"#);
/// assert_eq!(struct_tag("a`b"), r#""ebpf:\"a`b\"""#);
/// ```
pub fn struct_tag(name: &str) -> String {
    let tag = format!("ebpf:{}", go_quote(name));
    if tag.contains('`') {
        go_quote(&tag)
    } else {
        format!("`{tag}`")
    }
}

#[cfg(test)]
mod tests;
