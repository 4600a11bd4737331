//! Streaming item extractor
//!
//! The extractor consumes one page's tokens in a single forward pass and yields each item
//! as soon as its link is matched. It never looks ahead or backtracks, and keeps no more
//! than the partial item held in its [`MatchState`].
//!
//! # Matching
//!
//! | State | Matches | Then |
//! |-------|---------|------|
//! | SeekingId | container start tag with a non-empty label | SeekingImage |
//! | SeekingImage | self-closing image tag with a source | SeekingLink |
//! | SeekingLink | anchor start tag with an absolute reference | emit item, SeekingId |
//! | SeekingLink | anchor start tag with any other reference | discard, SeekingId |
//!
//! A labelled container seen while an item is partway matched restarts the match from it.
//! End of stream stops the pass and drops any partial item.

mod item;
mod state;

pub use item::Item;
pub use state::MatchState;

use crate::config::MatcherConfig;
use crate::token::{tokenize_str, Token};
use std::borrow::Borrow;

/// Single-page item extractor
#[derive(Debug)]
pub struct Extractor {
    rules: MatcherConfig,
    state: MatchState,
    finished: bool,
}

impl Extractor {
    pub fn new(rules: MatcherConfig) -> Self {
        Self {
            rules,
            state: MatchState::SeekingId,
            finished: false,
        }
    }

    /// Feeds one token, returning the item it completes, if any
    ///
    /// Once end of stream has been seen every further token is ignored.
    pub fn push(&mut self, token: &Token) -> Option<Item> {
        if self.finished {
            return None;
        }

        if token.is_end_of_stream() {
            if !self.state.is_idle() {
                tracing::trace!("Dropping partial item at end of stream ({})", self.state);
            }
            self.finished = true;
            self.state = MatchState::SeekingId;
            return None;
        }

        let previous = self.state.name();
        let (next, item) = std::mem::take(&mut self.state).step(token, &self.rules);
        if next.name() != previous {
            tracing::trace!("Matcher {} -> {}", previous, next);
        }
        self.state = next;
        item
    }

    /// Returns true once end of stream has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Lazily extracts items from a token sequence
    pub fn items<I>(self, tokens: I) -> Items<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<Token>,
    {
        Items {
            extractor: self,
            tokens: tokens.into_iter(),
        }
    }
}

/// Iterator of items produced from a token iterator
#[derive(Debug)]
pub struct Items<I> {
    extractor: Extractor,
    tokens: I,
}

impl<I> Iterator for Items<I>
where
    I: Iterator,
    I::Item: Borrow<Token>,
{
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        while !self.extractor.is_finished() {
            let token = self.tokens.next()?;
            if let Some(item) = self.extractor.push(token.borrow()) {
                return Some(item);
            }
        }
        None
    }
}

/// Extracts every item from a complete document
///
/// # Example
///
/// ```
/// use sumi_glean::config::MatcherConfig;
/// use sumi_glean::extract_items;
///
/// let html = r#"<span title="x1"><img src="/i.png"/><a href="http://dest/a" title="A">A</a></span>"#;
/// let items = extract_items(html, &MatcherConfig::default());
///
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].id(), "x1");
/// assert_eq!(items[0].page_ref(), "http://dest/a");
/// ```
pub fn extract_items(html: &str, rules: &MatcherConfig) -> Vec<Item> {
    Extractor::new(rules.clone())
        .items(tokenize_str(html))
        .collect()
}
