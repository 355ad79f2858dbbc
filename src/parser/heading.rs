/// A line that opens a numbered section: `"2.1) Scope"` → number `"2.1"`, rest `"Scope"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading<'a> {
    pub number: &'a str,
    /// Remainder after the number and its optional separator, untouched.
    pub rest: &'a str,
}

/// Match `line` against the heading shape: optional leading whitespace, digit
/// groups joined by single dots, an optional `.` or `)` separator with trailing
/// whitespace, then whatever is left.
pub fn match_heading(line: &str) -> Option<Heading<'_>> {
    let s = line.trim_start();
    let bytes = s.as_bytes();

    let mut end = digit_run(bytes, 0);
    if end == 0 {
        return None;
    }

    // "1.2.3": a dot only belongs to the number when a digit follows it
    while end < bytes.len() && bytes[end] == b'.' {
        let next = digit_run(bytes, end + 1);
        if next == end + 1 {
            break;
        }
        end = next;
    }
    let number = &s[..end];

    let mut pos = end;
    if pos < bytes.len() && (bytes[pos] == b'.' || bytes[pos] == b')') {
        pos += 1;
        let skipped = s[pos..].len() - s[pos..].trim_start().len();
        pos += skipped;
    }

    Some(Heading {
        number,
        rest: &s[pos..],
    })
}

pub fn is_heading(line: &str) -> bool {
    match_heading(line).is_some()
}

fn digit_run(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(line: &str) -> Option<(&str, &str)> {
        match_heading(line).map(|h| (h.number, h.rest))
    }

    #[test]
    fn dotted_number_with_separator() {
        assert_eq!(parts("1. Theft"), Some(("1", "Theft")));
        assert_eq!(parts("2.1) Scope of law"), Some(("2.1", "Scope of law")));
        assert_eq!(parts("1.2.3. Deep"), Some(("1.2.3", "Deep")));
    }

    #[test]
    fn no_separator() {
        assert_eq!(parts("1.1 Definitions"), Some(("1.1", " Definitions")));
        assert_eq!(parts("12abc"), Some(("12", "abc")));
    }

    #[test]
    fn bare_number() {
        assert_eq!(parts("7"), Some(("7", "")));
        assert_eq!(parts("7."), Some(("7", "")));
        assert_eq!(parts("3.4."), Some(("3.4", "")));
    }

    #[test]
    fn leading_whitespace_allowed() {
        assert_eq!(parts("   4) Penalties"), Some(("4", "Penalties")));
    }

    #[test]
    fn dot_without_digit_is_separator() {
        assert_eq!(parts("1.a"), Some(("1", "a")));
        assert_eq!(parts("5..x"), Some(("5", ".x")));
    }

    #[test]
    fn rest_keeps_punctuation() {
        assert_eq!(parts("3) (a) Forfeit, etc."), Some(("3", "(a) Forfeit, etc.")));
    }

    #[test]
    fn non_headings() {
        assert!(!is_heading(""));
        assert!(!is_heading("Theft"));
        assert!(!is_heading(".1 Foo"));
        assert!(!is_heading("  ) 1"));
    }
}
