//! Search store: the observable UI state behind the search box.
//!
//! Holds the live input text, the committed search text and the status
//! message shown when there is nothing to list. Handles are cheap to clone
//! and all clones share one state; every change that actually alters the
//! state is broadcast to subscribers.

use std::sync::Arc;

use tokio::sync::watch;

/// Status message shown before any search and after a reset.
pub const DEFAULT_MESSAGE: &str = "Search for the movie title!";

/// Snapshot of the search UI state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// Uncommitted value bound to the text field
    pub input_text: String,
    /// Committed query that drives fetching
    pub search_text: String,
    /// User-facing status message
    pub message: String,
}

impl SearchState {
    /// State at construction and after `reset`.
    pub fn initial() -> Self {
        Self {
            input_text: String::new(),
            search_text: String::new(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Port through which the movies query reports user-facing status.
///
/// Implementations must not call back into the query that owns them.
pub trait StatusSink: Send + Sync {
    /// Shows `text` as the user-facing status message.
    fn set_message(&self, text: &str);
}

/// Injectable search state container.
#[derive(Debug, Clone)]
pub struct SearchStore {
    state: Arc<watch::Sender<SearchState>>,
}

impl Default for SearchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStore {
    /// Creates a store in the initial state.
    pub fn new() -> Self {
        Self::with_state(SearchState::initial())
    }

    /// Creates a store starting from `state`.
    pub fn with_state(state: SearchState) -> Self {
        let (sender, _) = watch::channel(state);
        Self {
            state: Arc::new(sender),
        }
    }

    /// Sets the uncommitted input text.
    pub fn set_input_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state
            .send_if_modified(|state| replace(&mut state.input_text, text));
    }

    /// Sets the committed search text.
    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state
            .send_if_modified(|state| replace(&mut state.search_text, text));
    }

    /// Commits the current input text as the search text.
    pub fn commit_input(&self) {
        self.state.send_if_modified(|state| {
            let input = state.input_text.clone();
            replace(&mut state.search_text, input)
        });
    }

    /// Sets the status message.
    pub fn set_message(&self, text: impl Into<String>) {
        let text = text.into();
        self.state
            .send_if_modified(|state| replace(&mut state.message, text));
    }

    /// Restores the initial state in a single transition.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            let initial = SearchState::initial();
            if *state == initial {
                return false;
            }
            *state = initial;
            true
        });
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Current uncommitted input text.
    pub fn input_text(&self) -> String {
        self.state.borrow().input_text.clone()
    }

    /// Current committed search text.
    pub fn search_text(&self) -> String {
        self.state.borrow().search_text.clone()
    }

    /// Current status message.
    pub fn message(&self) -> String {
        self.state.borrow().message.clone()
    }

    /// Subscribes to state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }
}

impl StatusSink for SearchStore {
    fn set_message(&self, text: &str) {
        SearchStore::set_message(self, text);
    }
}

fn replace(field: &mut String, value: String) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    true
}
