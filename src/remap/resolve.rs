use crate::remap::value::Value;

/// Longest-match descent. Segments are consumed while they land inside
/// containers; the walk stops at the first segment that does not resolve and
/// reports the value reached plus the number of segments consumed. Never
/// errors: unresolved tails simply stay literal in the output.
pub(crate) fn resolve_path<'d>(root: &'d Value, segments: &[&str]) -> (&'d Value, usize) {
    let mut current = root;
    let mut consumed = 0;
    for segment in segments {
        let next = match current {
            Value::Object(entries) => entries.get(*segment),
            Value::Array(items) => array_index(segment).and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => {
                current = value;
                consumed += 1;
            }
            None => break,
        }
    }
    (current, consumed)
}

/// Canonical decimal index: digits only, no leading zero except `0` itself.
fn array_index(segment: &str) -> Option<usize> {
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<usize>().ok()
}
