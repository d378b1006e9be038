use unicode_segmentation::UnicodeSegmentation;

use crate::content::{Heading, SourceContent};

/// Turns lightly marked-up notes (markdown or plain text) into a `SourceContent`.
pub struct StructureParser {
    max_heading_level: u8,
}

impl Default for StructureParser {
    fn default() -> Self {
        Self {
            max_heading_level: 6,
        }
    }
}

impl StructureParser {
    pub fn new(max_heading_level: u8) -> Self {
        Self { max_heading_level }
    }

    pub fn parse(&self, filename: &str, raw_text: &str) -> SourceContent {
        let mut plain = String::with_capacity(raw_text.len());
        let mut headings = Vec::new();

        for line in Self::skip_front_matter(raw_text).lines() {
            if let Some(heading) = self.parse_heading(line) {
                plain.push_str(&heading.text);
                plain.push('\n');
                headings.push(heading);
                continue;
            }
            plain.push_str(&Self::strip_inline_markup(Self::strip_block_marker(line)));
            plain.push('\n');
        }

        SourceContent::new(filename, raw_text.to_string(), plain, headings)
    }

    fn parse_heading(&self, line: &str) -> Option<Heading> {
        let trimmed = line.trim_start();
        let level = trimmed.chars().take_while(|c| *c == '#').count();
        if level == 0 || level > self.max_heading_level as usize {
            return None;
        }

        let rest = &trimmed[level..];
        // "#hashtag" is not a heading
        if !rest.starts_with(' ') && !rest.is_empty() {
            return None;
        }

        let text = Self::strip_inline_markup(rest.trim().trim_end_matches('#').trim());
        if text.is_empty() {
            return None;
        }
        Some(Heading::new(level as u8, text))
    }

    fn skip_front_matter(text: &str) -> &str {
        let Some(rest) = text.strip_prefix("---\n") else {
            return text;
        };
        match rest.find("\n---") {
            Some(end) => {
                let after = &rest[end + 4..];
                after.strip_prefix('\n').unwrap_or(after)
            }
            None => text,
        }
    }

    fn strip_block_marker(line: &str) -> &str {
        let trimmed = line.trim_start();
        for marker in ["> ", "- ", "* ", "+ "] {
            if let Some(rest) = trimmed.strip_prefix(marker) {
                return rest;
            }
        }
        line
    }

    /// Drop emphasis and code markers, keep link text and discard link targets
    fn strip_inline_markup(line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '*' | '_' | '`' => {}
                '[' => {
                    // [[wiki link]] and [text](target) both keep only the text
                    while chars.peek() == Some(&'[') {
                        chars.next();
                    }
                }
                ']' => {
                    while chars.peek() == Some(&']') {
                        chars.next();
                    }
                    if chars.peek() == Some(&'(') {
                        for skipped in chars.by_ref() {
                            if skipped == ')' {
                                break;
                            }
                        }
                    }
                }
                _ => out.push(c),
            }
        }

        out
    }
}

/// Split text into trimmed, non-empty sentences
pub fn sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Text between `heading` and `next` (or the end of the text), trimmed.
///
/// Returns `None` when the heading line cannot be located or the section is empty.
pub fn section_text(plain_text: &str, heading: &Heading, next: Option<&Heading>) -> Option<String> {
    let (_, body_start) = locate_line(plain_text, &heading.text, 0)?;
    let end = next
        .and_then(|n| locate_line(plain_text, &n.text, body_start))
        .map(|(line_start, _)| line_start)
        .unwrap_or(plain_text.len());

    let body = plain_text[body_start..end].trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Byte span `(line_start, next_line_start)` of the first line at or after `from`
/// whose trimmed content equals `needle`.
fn locate_line(text: &str, needle: &str, from: usize) -> Option<(usize, usize)> {
    let needle = needle.trim();
    let mut offset = from;

    for line in text[from..].split_inclusive('\n') {
        let next = offset + line.len();
        if line.trim() == needle {
            return Some((offset, next));
        }
        offset = next;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markdown_headings() {
        let parser = StructureParser::default();
        let text = "# 3. The Yawning Portal\n\nDurnan **waited**.\n\n## Synopsis\nThe party met [Volo](https://example.com).\n";
        let content = parser.parse("session-3.md", text);

        assert_eq!(content.headings.len(), 2);
        assert_eq!(content.headings[0], Heading::new(1, "3. The Yawning Portal"));
        assert_eq!(content.headings[1], Heading::new(2, "Synopsis"));
        assert!(content.plain_text.contains("Durnan waited."));
        assert!(content.plain_text.contains("The party met Volo."));
        assert_eq!(content.raw_text, text);
    }

    #[test]
    fn test_hashtag_is_not_heading() {
        let parser = StructureParser::default();
        let content = parser.parse("notes.md", "#loot\nA sword.");
        assert!(content.headings.is_empty());
    }

    #[test]
    fn test_front_matter_skipped() {
        let parser = StructureParser::default();
        let content = parser.parse("notes.md", "---\ntags: [session]\n---\n# Title\nBody");
        assert_eq!(content.headings, vec![Heading::new(1, "Title")]);
        assert!(!content.plain_text.contains("tags"));
    }

    #[test]
    fn test_section_text_between_headings() {
        let text = "Intro\nSynopsis\nWe fought goblins.\nLoot was found.\nNPCs\nDurnan\n";
        let synopsis = Heading::new(2, "Synopsis");
        let npcs = Heading::new(2, "NPCs");

        assert_eq!(
            section_text(text, &synopsis, Some(&npcs)).as_deref(),
            Some("We fought goblins.\nLoot was found.")
        );
        assert_eq!(section_text(text, &npcs, None).as_deref(), Some("Durnan"));
        assert_eq!(section_text(text, &Heading::new(2, "Missing"), None), None);
    }

    #[test]
    fn test_sentences() {
        let parts = sentences("Durnan the barkeep poured ale. Volo laughed!\nThe end");
        assert_eq!(parts, vec!["Durnan the barkeep poured ale.", "Volo laughed!", "The end"]);
    }
}
