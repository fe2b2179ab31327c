use regex::Regex;

use crate::remap::errors::RemapResult;
use crate::remap::options::ValueTable;
use crate::remap::resolve::resolve_path;
use crate::remap::value::Value;

/// Compiles the scan pattern for a prefix character. Group 1 is the
/// identifier (maximal munch), group 2 the dotted segment run; bracket text
/// is never part of the span.
pub(crate) fn scan_pattern(prefix: char) -> RemapResult<Regex> {
    Ok(Regex::new(&format!(
        r"{}([A-Za-z_][A-Za-z0-9_]*)((?:\.(?:[A-Za-z_][A-Za-z0-9_]*|[0-9]+))*)",
        regex::escape(&prefix.to_string())
    ))?)
}

/// A resolved reference span inside one line.
///
/// `start..end` is the full scanned span; `start..splice_end` is the region
/// actually replaced (identifier plus consumed segments). Unconsumed trailing
/// segments stay literal in the output.
#[derive(Clone, Debug)]
pub struct Reference<'d, 'l> {
    pub start: usize,
    pub end: usize,
    pub splice_end: usize,
    pub name: &'l str,
    pub segments: Vec<&'l str>,
    pub consumed: usize,
    pub value: &'d Value,
}

impl Reference<'_, '_> {
    /// True when the value was reached by consuming at least one segment.
    pub fn descended(&self) -> bool {
        self.consumed > 0
    }
}

/// Lazy left-to-right scan over one line. Yields non-overlapping spans whose
/// identifier is a table key; unknown identifiers and backslash-escaped
/// prefixes are skipped silently, resuming after the whole candidate span.
#[derive(Clone, Debug)]
pub struct References<'d, 'l> {
    table: &'d ValueTable,
    pattern: &'d Regex,
    line: &'l str,
    pos: usize,
}

impl<'d, 'l> References<'d, 'l> {
    pub(crate) fn new(table: &'d ValueTable, pattern: &'d Regex, line: &'l str) -> Self {
        References {
            table,
            pattern,
            line,
            pos: 0,
        }
    }
}

impl<'d, 'l> Iterator for References<'d, 'l> {
    type Item = Reference<'d, 'l>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.line;
        loop {
            let base = self.pos;
            let caps = self.pattern.captures(&line[base..])?;
            let full = caps.get(0)?;
            let start = base + full.start();
            let end = base + full.end();
            // Non-overlapping: whatever happens below, the next scan resumes
            // after this candidate.
            self.pos = end;

            // A prefix preceded by a backslash is escaped and stays literal.
            if start > 0 && line.as_bytes()[start - 1] == b'\\' {
                continue;
            }

            let name_m = caps.get(1)?;
            let name = &line[base + name_m.start()..base + name_m.end()];
            let root = match self.table.get(name) {
                Some(root) => root,
                None => continue,
            };

            let path = &line[base + name_m.end()..end];
            let segments: Vec<&'l str> = if path.is_empty() {
                Vec::new()
            } else {
                path[1..].split('.').collect()
            };

            let (value, consumed) = resolve_path(root, &segments);
            let splice_end = base
                + name_m.end()
                + segments[..consumed].iter().map(|s| 1 + s.len()).sum::<usize>();

            return Some(Reference {
                start,
                end,
                splice_end,
                name,
                segments,
                consumed,
                value,
            });
        }
    }
}
