use super::join::push_line;

/// Fold body lines into paragraphs. Empty lines are paragraph breaks; other
/// lines are rejoined with their predecessor when they continue it.
pub fn assemble_paragraphs<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut buf: Vec<String> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.is_empty() {
            flush(&mut buf, &mut paragraphs);
            continue;
        }
        push_line(&mut buf, line);
    }
    flush(&mut buf, &mut paragraphs);

    paragraphs
}

/// Paragraphs separated by one blank line, outer whitespace trimmed.
pub fn assemble_text<S: AsRef<str>>(lines: &[S]) -> String {
    assemble_paragraphs(lines).join("\n\n").trim().to_string()
}

fn flush(buf: &mut Vec<String>, paragraphs: &mut Vec<String>) {
    if buf.is_empty() {
        return;
    }
    paragraphs.push(buf.join(" ").trim().to_string());
    buf.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_lines_rejoined() {
        let lines = ["Theft is punishable", "by hanging."];
        assert_eq!(assemble_paragraphs(&lines), vec!["Theft is punishable by hanging."]);
    }

    #[test]
    fn blank_marker_splits() {
        let lines = ["First rule.", "", "2 witnesses are needed."];
        assert_eq!(
            assemble_text(&lines),
            "First rule.\n\n2 witnesses are needed."
        );
    }

    #[test]
    fn unjoined_lines_share_paragraph() {
        let lines = ["First rule.", "2 witnesses are needed."];
        assert_eq!(
            assemble_paragraphs(&lines),
            vec!["First rule. 2 witnesses are needed."]
        );
    }

    #[test]
    fn repeated_markers_collapse() {
        let lines = ["", "", "Only.", "", ""];
        assert_eq!(assemble_paragraphs(&lines), vec!["Only."]);
    }

    #[test]
    fn empty_input() {
        let lines: [&str; 0] = [];
        assert!(assemble_paragraphs(&lines).is_empty());
        assert_eq!(assemble_text(&lines), "");
        assert_eq!(assemble_text(&["", ""]), "");
    }

    #[test]
    fn leading_indent_trimmed() {
        let lines = ["   Indented start", "  and its tail."];
        assert_eq!(assemble_text(&lines), "Indented start and its tail.");
    }
}
