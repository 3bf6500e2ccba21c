//! Blueprint section parser
//!
//! Splits raw blueprint text on lines starting with `---` and derives a
//! title for each block from its first line. Parsing never fails: blocks
//! without a recognised heading get a fallback title, and empty blocks are
//! dropped.

use super::model::Section;

/// Separator between sections: a line break followed by three hyphens
pub const SECTION_DELIMITER: &str = "\n---";

/// Title used when a block has no heading line
pub const FALLBACK_TITLE: &str = "Overview";

/// Top-level heading of the document root, shown under a friendlier name
const ROOT_HEADING: &str = "Blueprint.md";
const ROOT_TITLE: &str = "Introduction";

/// Byte order mark some editors put at the start of UTF-8 files
const BOM: char = '\u{feff}';

/// Parse blueprint text into ordered sections
pub fn parse_sections(text: &str) -> Vec<Section> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let sections: Vec<Section> = text
        .split(SECTION_DELIMITER)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| Section::new(section_title(block), block))
        .collect();

    tracing::debug!("Parsed {} sections from {} bytes", sections.len(), text.len());
    sections
}

/// Derive the display title of a trimmed, non-empty block
fn section_title(block: &str) -> String {
    let first_line = block.lines().next().unwrap_or_default();

    if let Some(rest) = first_line.strip_prefix("##") {
        return rest.trim().to_string();
    }

    if let Some(rest) = first_line.strip_prefix("# ") {
        let title = rest.trim();
        return if title == ROOT_HEADING { ROOT_TITLE } else { title }.to_string();
    }

    FALLBACK_TITLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn titles(text: &str) -> Vec<String> {
        parse_sections(text).into_iter().map(|s| s.title).collect()
    }

    #[test]
    fn empty_document_has_no_sections() {
        assert!(parse_sections("").is_empty());
        assert!(parse_sections("  \n\t\n").is_empty());
    }

    #[test]
    fn document_without_delimiters_is_one_section() {
        let sections = parse_sections("\n\nJust some prose.\nMore prose.\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "Just some prose.\nMore prose.");
    }

    #[test]
    fn second_level_heading_title_is_trimmed() {
        assert_eq!(titles("## Foo \nbody"), vec!["Foo"]);
    }

    #[test]
    fn third_level_heading_keeps_extra_marker() {
        assert_eq!(titles("### Deep\nbody"), vec!["# Deep"]);
    }

    #[test]
    fn root_heading_becomes_introduction() {
        assert_eq!(titles("# Blueprint.md\nWelcome"), vec!["Introduction"]);
    }

    #[test]
    fn leading_bom_is_ignored() {
        let text = "\u{feff}# Blueprint.md\nHello\n---\n## Storage\nDisk";
        assert_eq!(titles(text), vec!["Introduction", "Storage"]);
        assert_eq!(parse_sections(text)[0].content, "# Blueprint.md\nHello");
    }

    #[test]
    fn other_top_level_heading_is_kept() {
        assert_eq!(titles("#   Architecture  \ntext"), vec!["Architecture"]);
    }

    #[test]
    fn block_without_heading_is_overview() {
        assert_eq!(titles("Plain text first\n## not first"), vec!["Overview"]);
        assert_eq!(titles("#hashtag but no space"), vec!["Overview"]);
    }

    #[test]
    fn content_keeps_heading_line() {
        let sections = parse_sections("# Blueprint.md\nIntro text\n---\n## Storage\nDisk layout");
        assert_eq!(
            sections,
            vec![
                Section::new("Introduction", "# Blueprint.md\nIntro text"),
                Section::new("Storage", "## Storage\nDisk layout"),
            ]
        );
    }

    #[test]
    fn empty_blocks_are_dropped() {
        let text = "\n---\n## A\none\n---\n---\n   \n---\n## B\ntwo\n---";
        assert_eq!(titles(text), vec!["A", "B"]);
    }

    #[test]
    fn delimiter_must_follow_a_newline() {
        let sections = parse_sections("## A\nsee --- inline");
        assert_eq!(sections.len(), 1);
    }

    proptest! {
        #[test]
        fn contents_reconstruct_document(blocks in proptest::collection::vec("[a-zA-Z #\n]{0,40}", 0..8)) {
            let text = blocks.join(SECTION_DELIMITER);
            let expected: Vec<&str> =
                blocks.iter().map(|b| b.trim()).filter(|b| !b.is_empty()).collect();

            let sections = parse_sections(&text);
            let contents: Vec<&str> = sections.iter().map(|s| s.content.as_str()).collect();

            prop_assert_eq!(contents, expected);
        }
    }
}
