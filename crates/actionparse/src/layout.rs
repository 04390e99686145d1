//! Text layout used by the help renderer.
//!
//! The renderer only needs three pure text transforms, so they sit behind a
//! trait and can be swapped for a richer implementation.

pub trait Layout {
    /// Render `(label, description)` rows as aligned two-column text.
    fn table(&self, rows: &[(String, String)]) -> String;

    /// Wrap `text` to at most `width` columns, keeping explicit line breaks.
    fn wrap(&self, text: &str, width: usize) -> String;

    /// Remove terminal display markup (ANSI escape sequences).
    fn strip_markup(&self, text: &str) -> String;
}

/// Plain-text layout: two-space indent, labels padded to the widest one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainLayout;

const INDENT: &str = "  ";
const GAP: &str = "  ";

impl Layout for PlainLayout {
    fn table(&self, rows: &[(String, String)]) -> String {
        let width = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for (label, description) in rows {
            let mut lines = description.lines();
            match lines.next() {
                Some(first) if !first.trim().is_empty() => {
                    out.push_str(&format!("{INDENT}{label:width$}{GAP}{first}\n"));
                }
                _ => {
                    out.push_str(&format!("{INDENT}{label}\n"));
                }
            }
            for line in lines {
                out.push_str(&format!("{INDENT}{:width$}{GAP}{line}\n", ""));
            }
        }
        out
    }

    fn wrap(&self, text: &str, width: usize) -> String {
        if width == 0 {
            return text.to_string();
        }

        let mut out: Vec<String> = Vec::new();
        for paragraph in text.lines() {
            let mut line = String::new();
            let mut line_len = 0usize;
            for word in paragraph.split_whitespace() {
                let word_len = word.chars().count();
                if line_len > 0 && line_len + 1 + word_len > width {
                    out.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                if line_len > 0 {
                    line.push(' ');
                    line_len += 1;
                }
                line.push_str(word);
                line_len += word_len;
            }
            out.push(line);
        }
        out.join("\n")
    }

    fn strip_markup(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '\u{1b}' {
                out.push(c);
                continue;
            }
            // CSI: ESC '[' params... final byte in '@'..='~'
            if chars.peek() == Some(&'[') {
                chars.next();
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let text = PlainLayout.wrap("the quick brown fox jumps", 10);
        assert_eq!(text, "the quick\nbrown fox\njumps");
    }

    #[test]
    fn wrap_keeps_explicit_newlines_and_long_words() {
        let text = PlainLayout.wrap("a\nsupercalifragilistic b", 5);
        assert_eq!(text, "a\nsupercalifragilistic\nb");
    }

    #[test]
    fn table_aligns_descriptions() {
        let rows = vec![
            ("-e, --eye <str>".to_string(), "The eye string.".to_string()),
            ("-h, --help".to_string(), "Displays this help.".to_string()),
            ("--quiet".to_string(), String::new()),
        ];
        let text = PlainLayout.table(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  -e, --eye <str>  The eye string.");
        assert_eq!(lines[1], "  -h, --help       Displays this help.");
        assert_eq!(lines[2], "  --quiet");
    }

    #[test]
    fn table_indents_continuation_lines() {
        let rows = vec![("list".to_string(), "first\nsecond".to_string())];
        let text = PlainLayout.table(&rows);
        assert_eq!(text, "  list  first\n        second\n");
    }

    #[test]
    fn strip_markup_removes_ansi_sequences() {
        let text = PlainLayout.strip_markup("\u{1b}[1;31mred\u{1b}[0m plain");
        assert_eq!(text, "red plain");
    }
}
