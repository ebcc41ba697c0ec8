use super::*;
use pretty_assertions::assert_eq;

#[test]
fn plain_names_are_unchanged() {
    assert_eq!(go_quote("xdp_prog"), "\"xdp_prog\"");
    assert_eq!(go_quote(".rodata"), "\".rodata\"");
    assert_eq!(go_quote(""), "\"\"");
}

#[test]
fn escapes_quotes_and_backslashes() {
    assert_eq!(go_quote(r#"a"b\c"#), r#""a\"b\\c""#);
}

#[test]
fn escapes_control_characters() {
    assert_eq!(go_quote("a\nb\tc\r"), r#""a\nb\tc\r""#);
    assert_eq!(go_quote("\u{0}\u{1b}"), r#""\x00\x1b""#);
    assert_eq!(go_quote("\u{85}"), r#""\u0085""#);
    assert_eq!(go_quote("\u{7}\u{8}\u{b}\u{c}"), r#""\a\b\v\f""#);
}

#[test]
fn keeps_printable_unicode() {
    assert_eq!(go_quote("größe"), "\"größe\"");
}

#[test]
fn escapes_byte_order_mark() {
    assert_eq!(go_quote("a\u{feff}"), r#""a\ufeff""#);
}

#[test]
fn tags_are_raw_strings() {
    assert_eq!(struct_tag("counters"), "`ebpf:\"counters\"`");
    assert_eq!(struct_tag(".rodata"), "`ebpf:\".rodata\"`");
}

#[test]
fn tag_values_are_quoted() {
    assert_eq!(struct_tag(r#"a"b"#), r#"`ebpf:"a\"b"`"#);
    assert_eq!(struct_tag("a\nb"), r#"`ebpf:"a\nb"`"#);
}

#[test]
fn backquote_falls_back_to_interpreted_string() {
    assert_eq!(struct_tag("a`b"), r#""ebpf:\"a`b\"""#);
}
