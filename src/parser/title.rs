const MAX_TITLE_CHARS: usize = 60;
const MAX_TITLE_WORDS: usize = 8;

/// Short, few words, capitalised, not a sentence.
pub fn looks_like_title(s: &str) -> bool {
    let s = s.trim();
    let Some(first) = s.chars().next() else {
        return false;
    };
    if s.chars().count() > MAX_TITLE_CHARS {
        return false;
    }
    if s.split_whitespace().count() > MAX_TITLE_WORDS {
        return false;
    }
    if !(first.is_uppercase() || first.is_ascii_digit()) {
        return false;
    }
    !s.ends_with(['.', ':', ';'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_capitalised_phrase() {
        assert!(looks_like_title("Definitions"));
        assert!(looks_like_title("Tax Evasion"));
        assert!(looks_like_title("  Rights of the Crown  "));
        assert!(looks_like_title("2024 Amendments"));
    }

    #[test]
    fn sentence_rejected() {
        assert!(!looks_like_title("This is a full sentence about definitions."));
        assert!(!looks_like_title("Penalties:"));
        assert!(!looks_like_title("See below;"));
    }

    #[test]
    fn lowercase_start_rejected() {
        assert!(!looks_like_title("a"));
        assert!(!looks_like_title("(a) Forfeiture"));
    }

    #[test]
    fn empty_rejected() {
        assert!(!looks_like_title(""));
        assert!(!looks_like_title("   "));
    }

    #[test]
    fn length_limits() {
        assert!(!looks_like_title("One Two Three Four Five Six Seven Eight Nine"));
        assert!(looks_like_title("One Two Three Four Five Six Seven Eight"));
        let long = format!("A{}", "b".repeat(60));
        assert!(!looks_like_title(&long));
    }
}
