//! View controller: document, selection and explanation state
//!
//! Every selection bumps a generation counter. Events from a stream started
//! for an older generation are dropped, so reselecting preempts an
//! in-flight explanation without cancelling its network request.

use crate::cache::{MemoryCache, SessionCache, cache_key};
use crate::document::{DocumentError, Section};

/// Message shown when a selection does not match any section
pub const SECTION_NOT_FOUND: &str = "Could not find the selected section.";

/// Lifecycle of the loaded blueprint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DocumentState {
    /// Fetch in progress; nothing can be selected yet
    #[default]
    Loading,
    /// Sections ready for selection
    Loaded(Vec<Section>),
    /// Load failed; shown in place of the section list
    Failed(String),
}

/// Where the explanation for the current selection stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExplanationPhase {
    /// Nothing selected yet
    #[default]
    Idle,
    /// Chunks are arriving
    Streaming,
    /// Text came straight from the cache
    ServedFromCache,
    /// Stream finished and was cached
    Completed,
    /// Request failed
    Failed,
}

/// What the explanation pane should show; exactly one applies at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplanationPane<'a> {
    /// Nothing requested yet
    Initial,
    /// Waiting for or receiving chunks; holds the text so far
    Loading(&'a str),
    /// The request failed
    Error(&'a str),
    /// A finished explanation
    Text(&'a str),
}

/// Work order for an explanation stream, issued on a cache miss
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Generation the resulting events must carry
    pub generation: u64,
    /// Index of the selected section
    pub index: usize,
    /// Raw section content to explain
    pub content: String,
}

/// Progress reported by an explanation stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplanationEvent {
    /// Another text fragment arrived
    Chunk {
        /// Generation of the originating request
        generation: u64,
        /// Fragment text
        text: String,
    },
    /// Stream ended normally
    Completed {
        /// Generation of the originating request
        generation: u64,
    },
    /// Stream failed
    Failed {
        /// Generation of the originating request
        generation: u64,
        /// User-facing message
        message: String,
    },
}

impl ExplanationEvent {
    /// Generation this event belongs to
    pub fn generation(&self) -> u64 {
        match self {
            Self::Chunk { generation, .. }
            | Self::Completed { generation }
            | Self::Failed { generation, .. } => *generation,
        }
    }
}

/// Orchestrates parser output, the session cache and explanation streams
#[derive(Debug, Default)]
pub struct ViewController<C: SessionCache = MemoryCache> {
    document: DocumentState,
    selected: Option<usize>,
    explanation: String,
    phase: ExplanationPhase,
    explanation_error: Option<String>,
    generation: u64,
    cache: C,
}

impl<C: SessionCache> ViewController<C> {
    /// Create a controller using the given cache
    pub fn new(cache: C) -> Self {
        Self {
            document: DocumentState::Loading,
            selected: None,
            explanation: String::new(),
            phase: ExplanationPhase::Idle,
            explanation_error: None,
            generation: 0,
            cache,
        }
    }

    /// Mark a document fetch as started
    pub fn begin_document_load(&mut self) {
        self.document = DocumentState::Loading;
    }

    /// Store the outcome of a document fetch, replacing any earlier document
    pub fn finish_document_load(&mut self, result: Result<Vec<Section>, DocumentError>) {
        self.document = match result {
            Ok(sections) => {
                tracing::info!("Blueprint loaded with {} sections", sections.len());
                DocumentState::Loaded(sections)
            }
            Err(e) => {
                tracing::error!("{}", e);
                DocumentState::Failed(e.to_string())
            }
        };

        // Indices from an older document mean nothing now
        self.generation += 1;
        self.selected = None;
        self.explanation.clear();
        self.explanation_error = None;
        self.phase = ExplanationPhase::Idle;
    }

    /// Select a section; returns a fetch to start on a cache miss
    pub fn select(&mut self, index: usize) -> Option<FetchRequest> {
        self.generation += 1;
        self.selected = Some(index);
        self.explanation_error = None;

        let Some(section) = self.sections().get(index) else {
            tracing::warn!("Selected section {} does not exist", index);
            self.explanation.clear();
            self.explanation_error = Some(SECTION_NOT_FOUND.to_string());
            self.phase = ExplanationPhase::Failed;
            return None;
        };
        let content = section.content.clone();

        if let Some(cached) = self.cache.get(&cache_key(index)) {
            tracing::debug!("Explanation for section {} served from cache", index);
            self.explanation = cached;
            self.phase = ExplanationPhase::ServedFromCache;
            return None;
        }

        self.explanation.clear();
        self.phase = ExplanationPhase::Streaming;
        Some(FetchRequest { generation: self.generation, index, content })
    }

    /// Apply a stream event; returns false when it was stale and dropped
    pub fn apply(&mut self, event: ExplanationEvent) -> bool {
        if event.generation() != self.generation || self.phase != ExplanationPhase::Streaming {
            tracing::trace!("Dropping stale explanation event for generation {}", event.generation());
            return false;
        }

        match event {
            ExplanationEvent::Chunk { text, .. } => {
                self.explanation.push_str(&text);
            }
            ExplanationEvent::Completed { .. } => {
                if let Some(index) = self.selected {
                    let key = cache_key(index);
                    if self.cache.get(&key).is_none() {
                        self.cache.set(&key, self.explanation.clone());
                    }
                }
                self.phase = ExplanationPhase::Completed;
            }
            ExplanationEvent::Failed { message, .. } => {
                self.explanation_error = Some(message);
                self.phase = ExplanationPhase::Failed;
            }
        }
        true
    }

    /// Current pane contents
    pub fn explanation_pane(&self) -> ExplanationPane<'_> {
        match self.phase {
            ExplanationPhase::Idle => ExplanationPane::Initial,
            ExplanationPhase::Streaming => ExplanationPane::Loading(&self.explanation),
            ExplanationPhase::Failed => ExplanationPane::Error(
                self.explanation_error.as_deref().unwrap_or(SECTION_NOT_FOUND),
            ),
            ExplanationPhase::ServedFromCache | ExplanationPhase::Completed => {
                ExplanationPane::Text(&self.explanation)
            }
        }
    }

    /// Document lifecycle state
    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    /// Loaded sections, empty while loading or after a failed load
    pub fn sections(&self) -> &[Section] {
        match &self.document {
            DocumentState::Loaded(sections) => sections,
            _ => &[],
        }
    }

    /// Whether selection is possible
    pub fn can_select(&self) -> bool {
        matches!(self.document, DocumentState::Loaded(_))
    }

    /// Selected section index
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Selected section, if it exists
    pub fn selected_section(&self) -> Option<&Section> {
        self.selected.and_then(|i| self.sections().get(i))
    }

    /// Accumulated explanation text for the current selection
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Explanation error, if the last request failed
    pub fn explanation_error(&self) -> Option<&str> {
        self.explanation_error.as_deref()
    }

    /// Explanation phase
    pub fn phase(&self) -> ExplanationPhase {
        self.phase
    }

    /// Whether the loading indicator should show
    pub fn is_loading(&self) -> bool {
        self.phase == ExplanationPhase::Streaming
    }

    /// Current generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The injected cache
    pub fn cache(&self) -> &C {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loaded() -> ViewController {
        let mut controller = ViewController::new(MemoryCache::new());
        controller.finish_document_load(Ok(vec![
            Section::new("Introduction", "# Blueprint.md\nHello"),
            Section::new("Storage", "## Storage\nDisk"),
        ]));
        controller
    }

    fn chunk(generation: u64, text: &str) -> ExplanationEvent {
        ExplanationEvent::Chunk { generation, text: text.into() }
    }

    #[test]
    fn starts_loading_and_idle() {
        let controller = ViewController::new(MemoryCache::new());
        assert_eq!(controller.document(), &DocumentState::Loading);
        assert!(!controller.can_select());
        assert_eq!(controller.explanation_pane(), ExplanationPane::Initial);
    }

    #[test]
    fn failed_load_keeps_message() {
        let mut controller = ViewController::new(MemoryCache::new());
        controller.finish_document_load(Err(DocumentError::Status {
            status: 404,
            reason: "Not Found".into(),
        }));

        assert!(matches!(controller.document(), DocumentState::Failed(msg) if msg.contains("404")));
        assert!(controller.sections().is_empty());
    }

    #[test]
    fn miss_starts_streaming() {
        let mut controller = loaded();
        let request = controller.select(1).unwrap();

        assert_eq!(request.index, 1);
        assert_eq!(request.content, "## Storage\nDisk");
        assert_eq!(request.generation, controller.generation());
        assert!(controller.is_loading());
        assert_eq!(controller.explanation_pane(), ExplanationPane::Loading(""));
        assert_eq!(controller.selected_section().map(|s| s.title.as_str()), Some("Storage"));
    }

    #[test]
    fn chunks_accumulate_and_complete_into_cache() {
        let mut controller = loaded();
        let generation = controller.select(0).unwrap().generation;

        let mut renders = Vec::new();
        for text in ["Hello ", "world"] {
            assert!(controller.apply(chunk(generation, text)));
            renders.push(controller.explanation().to_string());
        }
        assert!(controller.apply(ExplanationEvent::Completed { generation }));

        assert_eq!(renders, vec!["Hello ", "Hello world"]);
        assert_eq!(controller.cache().get("explanation-0").as_deref(), Some("Hello world"));
        assert_eq!(controller.explanation_pane(), ExplanationPane::Text("Hello world"));
        assert!(!controller.is_loading());
    }

    #[test]
    fn reselect_is_served_from_cache() {
        let mut controller = loaded();
        let generation = controller.select(0).unwrap().generation;
        controller.apply(chunk(generation, "Cached text"));
        controller.apply(ExplanationEvent::Completed { generation });

        controller.select(1);
        assert!(controller.select(0).is_none());

        assert_eq!(controller.phase(), ExplanationPhase::ServedFromCache);
        assert!(!controller.is_loading());
        assert_eq!(controller.explanation(), "Cached text");
    }

    #[test]
    fn failure_leaves_cache_empty() {
        let mut controller = loaded();
        let generation = controller.select(0).unwrap().generation;
        controller.apply(chunk(generation, "partial"));
        controller.apply(ExplanationEvent::Failed { generation, message: "boom".into() });

        assert!(controller.cache().is_empty());
        assert!(!controller.is_loading());
        assert_eq!(controller.explanation_pane(), ExplanationPane::Error("boom"));
        assert_eq!(controller.explanation(), "partial");
    }

    #[test]
    fn stale_events_are_dropped() {
        let mut controller = loaded();
        let old = controller.select(0).unwrap().generation;
        let new = controller.select(1).unwrap().generation;

        assert!(!controller.apply(chunk(old, "late")));
        assert!(!controller.apply(ExplanationEvent::Completed { generation: old }));
        assert!(controller.apply(chunk(new, "fresh")));

        assert_eq!(controller.explanation(), "fresh");
        assert!(controller.cache().get("explanation-0").is_none());
    }

    #[test]
    fn events_after_completion_are_dropped() {
        let mut controller = loaded();
        let generation = controller.select(0).unwrap().generation;
        controller.apply(ExplanationEvent::Completed { generation });

        assert!(!controller.apply(chunk(generation, "extra")));
    }

    #[test]
    fn out_of_range_selection_fails() {
        let mut controller = loaded();
        assert!(controller.select(7).is_none());
        assert_eq!(controller.explanation_pane(), ExplanationPane::Error(SECTION_NOT_FOUND));
    }

    #[test]
    fn new_selection_clears_previous_error() {
        let mut controller = loaded();
        controller.select(9);
        controller.select(0);
        assert!(controller.explanation_error().is_none());
    }

    #[test]
    fn reload_resets_selection() {
        let mut controller = loaded();
        controller.select(0);
        controller.finish_document_load(Ok(vec![Section::new("Overview", "text")]));

        assert_eq!(controller.selected_index(), None);
        assert_eq!(controller.explanation_pane(), ExplanationPane::Initial);
        assert_eq!(controller.sections().len(), 1);
    }

    #[derive(Default)]
    struct RecordingCache {
        sets: Vec<(String, String)>,
        inner: MemoryCache,
    }

    impl SessionCache for RecordingCache {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) {
            self.sets.push((key.to_string(), value.clone()));
            self.inner.set(key, value);
        }
    }

    #[test]
    fn cache_is_written_once_per_key() {
        let mut controller = ViewController::new(RecordingCache::default());
        controller.finish_document_load(Ok(vec![Section::new("A", "a")]));

        let generation = controller.select(0).unwrap().generation;
        controller.apply(chunk(generation, "first"));
        controller.apply(ExplanationEvent::Completed { generation });
        controller.select(0);

        assert_eq!(controller.cache().sets, vec![("explanation-0".to_string(), "first".to_string())]);
    }
}
