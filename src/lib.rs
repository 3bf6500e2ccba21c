//! Blueprint Explainer - a terminal viewer for technical blueprints
//!
//! Splits a blueprint document into sections and streams a plain-language
//! explanation of the selected section from Claude, caching each finished
//! explanation for the rest of the session.

pub mod app;
pub mod cache;
pub mod config;
pub mod document;
pub mod explain;
pub mod theme;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
