//! Blueprint document handling
//!
//! A blueprint is a markdown-like text split into sections by `---` lines.

pub mod model;
pub mod parser;
pub mod source;

pub use model::Section;
pub use parser::parse_sections;
pub use source::{DEFAULT_DOCUMENT, DocumentError, DocumentSource};
