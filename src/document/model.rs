//! Content model for blueprint documents

use serde::{Deserialize, Serialize};

/// A titled block of the blueprint, the unit of selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Display title derived from the first line
    pub title: String,
    /// Trimmed raw text of the block, heading line included
    pub content: String,
}

impl Section {
    /// Create a new section
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_keeps_raw_content() {
        let section = Section::new("Intro", "# Intro\n\nSome text");
        assert_eq!(section.title, "Intro");
        assert_eq!(section.content, "# Intro\n\nSome text");
    }

    #[test]
    fn section_serializes() {
        let section = Section::new("Storage", "## Storage");
        let json = serde_json::to_string(&section).unwrap();
        assert!(json.contains("\"title\":\"Storage\""));
    }
}
