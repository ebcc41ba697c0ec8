//! Scan and Layout
//!
//! The scan walks the source once, tracking string, rune and raw-string
//! literals, comments, and bracket nesting. It records for every line the
//! indentation level and the block the line belongs to. The layout pass then
//! normalizes blank lines, aligns columns and emits the result.
//!
//! Indentation follows what was left open at the end of the previous lines:
//! a line that leaves several groups open (`foo(bar{`) indents the next
//! line once, and a line starting with closers dedents by the groups it
//! closes that had indented.

use crate::align::aligned_texts;
use crate::emitter::{Emitter, StringEmitter};
use crate::error::FormatError;
use crate::SourceFormatter;

/// The kind of bracket group a line sits in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// Not inside any group.
    TopLevel,
    /// A `struct { ... }` type.
    Struct,
    /// A composite literal, `T{ ... }`.
    Composite,
    /// Any other group: function bodies, parameter lists, import groups.
    Other,
}

/// One source line after the scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the input.
    pub number: usize,
    /// Line content. Indentation is stripped unless the line is verbatim.
    pub text: &'a str,
    /// Tab levels to emit before `text`.
    pub indent: usize,
    /// Starts inside a raw string or block comment; emitted unchanged.
    pub verbatim: bool,
    /// Ends inside a raw string or block comment.
    pub open_tail: bool,
    /// Innermost group enclosing the line; `0` is the top level.
    pub block: usize,
    pub block_kind: BlockKind,
    /// Leaves a bracket group open.
    pub opens: bool,
    /// Starts by closing a bracket group.
    pub closes: bool,
    pub has_comment: bool,
}

impl Line<'_> {
    pub fn is_blank(&self) -> bool {
        !self.verbatim && self.text.is_empty()
    }
}

/// Built-in layout-only formatter for generated Go.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanonicalFormatter;

impl CanonicalFormatter {
    pub fn new() -> Self {
        CanonicalFormatter
    }
}

impl SourceFormatter for CanonicalFormatter {
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let lines = normalize_blank_lines(scan(source)?);
        let texts = aligned_texts(&lines);

        let mut emitter = StringEmitter::with_capacity(source.len());
        for (line, text) in lines.iter().zip(texts) {
            if line.verbatim {
                emitter.emit(&text);
            } else if !text.is_empty() {
                emitter.emit_indent(line.indent);
                emitter.emit(&text);
            }
            emitter.emit_newline();
        }
        emitter.ensure_trailing_newline();

        tracing::debug!(lines = lines.len(), "formatted");
        Ok(emitter.output())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Code,
    Str,
    Rune,
    Raw,
    BlockComment,
}

impl Mode {
    fn describe(self) -> &'static str {
        match self {
            Mode::Code => "code",
            Mode::Str => "string literal",
            Mode::Rune => "rune literal",
            Mode::Raw => "raw string literal",
            Mode::BlockComment => "block comment",
        }
    }
}

/// An open bracket group.
struct Group {
    ch: char,
    line: usize,
    indents: bool,
    block: usize,
    kind: BlockKind,
}

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Classify a group from its opening bracket and the text before it.
fn group_kind(open: char, before: &str) -> BlockKind {
    if open != '{' {
        return BlockKind::Other;
    }
    if before.trim_end().ends_with("struct") {
        BlockKind::Struct
    } else if before.ends_with(|c: char| !c.is_whitespace()) {
        BlockKind::Composite
    } else {
        BlockKind::Other
    }
}

/// Scan `source` into lines, validating literal and bracket structure.
pub fn scan(source: &str) -> Result<Vec<Line<'_>>, FormatError> {
    let mut mode = Mode::Code;
    let mut mode_line = 0;
    let mut stack: Vec<Group> = Vec::new();
    let mut next_block = 1;
    let mut lines = Vec::new();

    for (index, raw) in source.split('\n').enumerate() {
        let number = index + 1;
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let verbatim = matches!(mode, Mode::Raw | Mode::BlockComment);
        let depth = stack.iter().filter(|g| g.indents).count();
        let (block, block_kind) = stack
            .last()
            .map_or((0, BlockKind::TopLevel), |g| (g.block, g.kind));
        let mut floor = stack.len();
        let mut dedent = 0;
        let mut leading = !verbatim;
        let mut has_comment = mode == Mode::BlockComment;

        let mut chars = raw.char_indices().peekable();
        while let Some((pos, c)) = chars.next() {
            match mode {
                Mode::Str | Mode::Rune => {
                    if c == '\\' {
                        chars.next();
                    } else if (mode == Mode::Str && c == '"') || (mode == Mode::Rune && c == '\'') {
                        mode = Mode::Code;
                    }
                }
                Mode::Raw => {
                    if c == '`' {
                        mode = Mode::Code;
                    }
                }
                Mode::BlockComment => {
                    if c == '*' && chars.peek().is_some_and(|&(_, n)| n == '/') {
                        chars.next();
                        mode = Mode::Code;
                    }
                }
                Mode::Code => {
                    if c.is_whitespace() {
                        continue;
                    }
                    let next = chars.peek().map(|&(_, n)| n);
                    match c {
                        '/' if next == Some('/') => {
                            has_comment = true;
                            break;
                        }
                        '/' if next == Some('*') => {
                            chars.next();
                            has_comment = true;
                            mode = Mode::BlockComment;
                            mode_line = number;
                        }
                        '"' => {
                            mode = Mode::Str;
                            mode_line = number;
                        }
                        '\'' => {
                            mode = Mode::Rune;
                            mode_line = number;
                        }
                        '`' => {
                            mode = Mode::Raw;
                            mode_line = number;
                        }
                        '(' | '[' | '{' => {
                            stack.push(Group {
                                ch: c,
                                line: number,
                                indents: false,
                                block: next_block,
                                kind: group_kind(c, &raw[..pos]),
                            });
                            next_block += 1;
                        }
                        ')' | ']' | '}' => {
                            let group = stack
                                .pop()
                                .ok_or(FormatError::Unexpected { line: number, found: c })?;
                            let expected = closer_for(group.ch);
                            if expected != c {
                                return Err(FormatError::Unbalanced {
                                    line: number,
                                    expected,
                                    found: c,
                                });
                            }
                            if leading && group.indents {
                                dedent += 1;
                            }
                            floor = floor.min(stack.len());
                            continue;
                        }
                        _ => {}
                    }
                    leading = false;
                }
            }
        }

        if matches!(mode, Mode::Str | Mode::Rune) {
            return Err(FormatError::Unterminated {
                line: mode_line,
                what: mode.describe(),
            });
        }

        // Only the innermost group this line leaves open indents.
        let opens = stack.len() > floor;
        if let Some(group) = stack.last_mut().filter(|_| opens) {
            group.indents = true;
        }

        let open_tail = matches!(mode, Mode::Raw | Mode::BlockComment);
        let text = if verbatim {
            raw
        } else if open_tail {
            raw.trim_start()
        } else {
            raw.trim()
        };

        lines.push(Line {
            number,
            text,
            indent: depth - dedent,
            verbatim,
            open_tail,
            block,
            block_kind,
            opens,
            closes: dedent > 0,
            has_comment,
        });
    }

    match mode {
        Mode::Raw | Mode::BlockComment => Err(FormatError::Unterminated {
            line: mode_line,
            what: mode.describe(),
        }),
        _ => match stack.last() {
            Some(group) => Err(FormatError::Unclosed {
                line: group.line,
                open: group.ch,
            }),
            None => Ok(lines),
        },
    }
}

/// Drop leading, trailing and repeated blank lines, and blank lines just
/// inside a group's delimiters.
fn normalize_blank_lines(lines: Vec<Line<'_>>) -> Vec<Line<'_>> {
    let mut out: Vec<Line<'_>> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_blank() {
            match out.last() {
                None => continue,
                Some(prev) if prev.is_blank() || prev.opens => continue,
                Some(_) => {}
            }
        } else if line.closes && out.last().is_some_and(Line::is_blank) {
            out.pop();
        }
        out.push(line);
    }
    while out.last().is_some_and(Line::is_blank) {
        out.pop();
    }
    out
}
