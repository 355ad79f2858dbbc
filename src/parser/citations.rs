use std::sync::LazyLock;

use regex::Regex;

use super::join::starts_with_citations;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://").unwrap());

/// Drop a trailing citation block: everything from the first "Citations..."
/// line or bare URL line onwards. Blank markers never start a block.
pub fn strip_citations<S: AsRef<str>>(lines: &[S]) -> &[S] {
    let cut = lines.iter().position(|line| {
        let s = line.as_ref().trim();
        !s.is_empty() && (starts_with_citations(s) || looks_like_url(s))
    });
    match cut {
        Some(i) => &lines[..i],
        None => lines,
    }
}

fn looks_like_url(s: &str) -> bool {
    URL_RE.is_match(s) || s.starts_with("www.")
}
