const TERMINAL_PUNCTUATION: [char; 5] = ['.', '!', '?', '"', '\''];

/// Whether `curr` is the wrapped remainder of `prev`.
///
/// Rules are checked in order and the first that applies wins. A capitalised
/// line after terminal punctuation still counts as a continuation unless it
/// starts with a digit or the word "citations".
pub fn continues(prev: &str, curr: &str) -> bool {
    let Some(first) = curr.chars().next() else {
        return false;
    };
    if prev.is_empty() {
        return false;
    }
    if first.is_lowercase() {
        return true;
    }
    if !prev.ends_with(TERMINAL_PUNCTUATION) {
        return true;
    }
    !first.is_ascii_digit() && !starts_with_citations(curr)
}

/// Merge `curr` onto `prev` with a single space.
pub fn join_lines(prev: &str, curr: &str) -> String {
    format!("{} {}", prev.trim_end(), curr.trim_start())
}

/// Append `line` to `lines`, merging into the last entry when it continues it.
pub fn push_line(lines: &mut Vec<String>, line: &str) {
    match lines.last_mut() {
        Some(last) if continues(last.as_str(), line) => {
            let merged = join_lines(last.as_str(), line);
            *last = merged;
        }
        _ => lines.push(line.to_string()),
    }
}

pub(crate) fn starts_with_citations(s: &str) -> bool {
    s.get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("citations"))
}
