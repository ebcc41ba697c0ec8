//! Column Alignment
//!
//! Consecutive struct fields and consecutive single-line keyed elements of
//! a composite literal are aligned into columns with spaces:
//!
//! ```text
//! ProgramXdpProg *ebpf.ProgramSpec `ebpf:"xdp_prog"`
//! MapCounters    *ebpf.MapSpec     `ebpf:"counters"`
//! ```
//!
//! Column widths follow elastic tabstops: column `c` spans the consecutive
//! lines that have a cell after `c`, and each cell is padded to the widest
//! cell of its column plus one space. Blank lines, comments and multi-line
//! entries end a run.
//!
//! Keyed elements also end a run where `gofmt` would: once a key is longer
//! than [`SMALL_KEY`], a key whose size differs from the geometric mean of
//! the literal's earlier keys by a factor of [`KEY_RATIO`] or more starts a
//! new section.

use std::borrow::Cow;

use rustc_hash::FxHashMap;

use crate::layout::{BlockKind, Line};

/// Keys up to this many bytes never break alignment.
pub const SMALL_KEY: usize = 40;

/// Size ratio against the running geometric mean that breaks alignment.
pub const KEY_RATIO: f64 = 2.5;

/// Key statistics of one composite literal.
#[derive(Debug, Default)]
struct KeySizes {
    ln_sum: f64,
    count: u32,
    /// Key size of the previous element, `0` if it was not a single line.
    prev: usize,
}

impl KeySizes {
    /// Record a single-line element with a `size`-byte key and report
    /// whether alignment breaks before it.
    #[allow(clippy::cast_precision_loss, reason = "key sizes are line lengths")]
    fn breaks_before(&mut self, size: usize) -> bool {
        let prev = std::mem::replace(&mut self.prev, size);
        let breaks = if prev == 0 || self.count == 0 || (prev <= SMALL_KEY && size <= SMALL_KEY) {
            false
        } else {
            let geomean = (self.ln_sum / f64::from(self.count)).exp();
            let ratio = size as f64 / geomean;
            KEY_RATIO * ratio <= 1.0 || KEY_RATIO <= ratio
        };
        if size > 0 {
            self.ln_sum += (size as f64).ln();
            self.count += 1;
        }
        breaks
    }
}

/// For each line, whether a keyed-element run must restart at it.
fn key_breaks(lines: &[Line<'_>], cells: &[Option<Vec<&str>>]) -> Vec<bool> {
    let mut literals: FxHashMap<usize, KeySizes> = FxHashMap::default();
    lines
        .iter()
        .zip(cells)
        .map(|(line, cells)| {
            if line.block_kind != BlockKind::Composite {
                return false;
            }
            let sizes = literals.entry(line.block).or_default();
            match cells {
                Some(cells) => sizes.breaks_before(cells[0].len() - 1),
                None if line.is_blank() => {
                    *sizes = KeySizes::default();
                    false
                }
                None => {
                    sizes.prev = 0;
                    false
                }
            }
        })
        .collect()
}

/// The text to emit for each line, aligned where a run applies.
pub fn aligned_texts<'a>(lines: &[Line<'a>]) -> Vec<Cow<'a, str>> {
    let cells: Vec<Option<Vec<&'a str>>> = lines.iter().map(cells_of).collect();
    let breaks = key_breaks(lines, &cells);
    let mut texts: Vec<Cow<'a, str>> = lines.iter().map(|l| Cow::Borrowed(l.text)).collect();

    let mut start = 0;
    while start < lines.len() {
        if cells[start].is_none() {
            start += 1;
            continue;
        }
        let block = lines[start].block;
        let mut end = start + 1;
        while end < lines.len()
            && cells[end].is_some()
            && lines[end].block == block
            && !breaks[end]
        {
            end += 1;
        }

        let run: Vec<&[&str]> = cells[start..end].iter().flatten().map(Vec::as_slice).collect();
        for (offset, text) in pad_run(&run).into_iter().enumerate() {
            texts[start + offset] = Cow::Owned(text);
        }
        start = end;
    }
    texts
}

/// Pad the cells of one run into columns.
fn pad_run(run: &[&[&str]]) -> Vec<String> {
    let columns = run.iter().map(|cells| cells.len()).max().unwrap_or(0);
    let mut widths = vec![vec![0usize; columns]; run.len()];

    for column in 0..columns.saturating_sub(1) {
        let mut i = 0;
        while i < run.len() {
            if run[i].len() <= column + 1 {
                i += 1;
                continue;
            }
            let mut j = i;
            while j < run.len() && run[j].len() > column + 1 {
                j += 1;
            }
            let width = run[i..j]
                .iter()
                .map(|cells| cells[column].chars().count())
                .max()
                .unwrap_or(0);
            for row in &mut widths[i..j] {
                row[column] = width;
            }
            i = j;
        }
    }

    run.iter()
        .zip(&widths)
        .map(|(cells, widths)| {
            let mut text = String::new();
            let last = cells.len() - 1;
            for (column, cell) in cells.iter().enumerate() {
                if column == last {
                    text.push_str(cell);
                } else {
                    let width = widths[column];
                    text.push_str(&format!("{cell:<width$} "));
                }
            }
            text
        })
        .collect()
}

/// The alignable cells of a line, if it can take part in a run.
fn cells_of<'a>(line: &Line<'a>) -> Option<Vec<&'a str>> {
    if line.verbatim
        || line.open_tail
        || line.has_comment
        || line.opens
        || line.closes
        || line.is_blank()
    {
        return None;
    }
    match line.block_kind {
        BlockKind::Struct => field_cells(line.text),
        BlockKind::Composite => keyed_cells(line.text),
        BlockKind::TopLevel | BlockKind::Other => None,
    }
}

/// `Name Type` or `Name Type Tag`.
fn field_cells(text: &str) -> Option<Vec<&str>> {
    let cells = split_top_level(text);
    let is_field = match cells.as_slice() {
        [_, _] => true,
        [_, _, tag] => tag.starts_with(['`', '"']),
        _ => false,
    };
    is_field.then_some(cells)
}

/// `Key: value,` where the value fits on the line.
fn keyed_cells(text: &str) -> Option<Vec<&str>> {
    if !text.ends_with(',') {
        return None;
    }
    let colon = top_level_colon(text)?;
    let key = &text[..=colon];
    let value = text[colon + 1..].trim_start();
    if colon == 0 || key[..colon].ends_with(char::is_whitespace) || value == "," {
        return None;
    }
    Some(vec![key, value])
}

/// Call `visit` for every character outside literals and brackets.
fn visit_top_level(text: &str, mut visit: impl FnMut(usize, char, Option<char>)) {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' && q != '`' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => visit(pos, c, chars.peek().map(|&(_, n)| n)),
            _ => {}
        }
    }
}

/// Split on whitespace outside literals and brackets.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut start = 0;
    visit_top_level(text, |pos, c, _| {
        if c.is_whitespace() {
            if start < pos {
                cells.push(&text[start..pos]);
            }
            start = pos + c.len_utf8();
        }
    });
    if start < text.len() {
        cells.push(&text[start..]);
    }
    cells
}

/// Byte offset of the first `:` at the top level that is not part of `:=`.
fn top_level_colon(text: &str) -> Option<usize> {
    let mut found = None;
    visit_top_level(text, |pos, c, next| {
        if found.is_none() && c == ':' && next != Some('=') {
            found = Some(pos);
        }
    });
    found
}
