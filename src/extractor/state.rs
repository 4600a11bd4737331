/// Matcher state definitions
///
/// The matcher walks a linear progression per item: id, then image, then link. The item
/// under construction lives inside the state, so there is never more than one partial item.
use crate::config::MatcherConfig;
use crate::extractor::Item;
use crate::token::Token;
use std::fmt;

/// Current state of the item matcher
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MatchState {
    /// Looking for a container start tag carrying a label
    #[default]
    SeekingId,

    /// Id recorded; looking for a self-closing image tag with a source
    SeekingImage { id: String },

    /// Id and image recorded; looking for an anchor with a reference
    SeekingLink { id: String, image_ref: String },
}

impl MatchState {
    /// Advances the matcher by one token, returning the next state and any completed item
    pub fn step(self, token: &Token, rules: &MatcherConfig) -> (Self, Option<Item>) {
        match self {
            Self::SeekingId => (seek_id(token, rules).unwrap_or(Self::SeekingId), None),
            Self::SeekingImage { id } => seek_image(id, token, rules),
            Self::SeekingLink { id, image_ref } => seek_link(id, image_ref, token, rules),
        }
    }

    /// Returns true when no item is under construction
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::SeekingId)
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::SeekingId => "seeking_id",
            Self::SeekingImage { .. } => "seeking_image",
            Self::SeekingLink { .. } => "seeking_link",
        }
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Container start tag with a non-empty label opens a new item
fn seek_id(token: &Token, rules: &MatcherConfig) -> Option<MatchState> {
    if !token.is_start(&rules.container_tag) {
        return None;
    }
    let id = token.attr(&rules.label_attr).filter(|id| !id.is_empty())?;
    Some(MatchState::SeekingImage { id: id.to_string() })
}

fn seek_image(id: String, token: &Token, rules: &MatcherConfig) -> (MatchState, Option<Item>) {
    if let Some(restarted) = restart(&id, token, rules) {
        return (restarted, None);
    }

    let src = if token.is_self_closing(&rules.image_tag) {
        token.attr(&rules.source_attr)
    } else {
        None
    };

    match src {
        Some(src) => (
            MatchState::SeekingLink {
                id,
                image_ref: src.to_string(),
            },
            None,
        ),
        None => (MatchState::SeekingImage { id }, None),
    }
}

fn seek_link(
    id: String,
    image_ref: String,
    token: &Token,
    rules: &MatcherConfig,
) -> (MatchState, Option<Item>) {
    if let Some(restarted) = restart(&id, token, rules) {
        return (restarted, None);
    }

    let href = if token.is_start(&rules.anchor_tag) {
        token.attr(&rules.reference_attr)
    } else {
        None
    };

    let Some(href) = href else {
        return (MatchState::SeekingLink { id, image_ref }, None);
    };

    if !href.starts_with(&rules.absolute_prefix) {
        tracing::debug!("Discarding item '{}': link '{}' is not absolute", id, href);
        return (MatchState::SeekingId, None);
    }

    let title = token.attr(&rules.label_attr).unwrap_or_default();
    let item = Item::new(id, image_ref, href.to_string(), title.to_string());
    (MatchState::SeekingId, Some(item))
}

/// A new labelled container mid-match abandons the partial item and starts over from it
fn restart(current_id: &str, token: &Token, rules: &MatcherConfig) -> Option<MatchState> {
    let next = seek_id(token, rules)?;
    tracing::trace!("Abandoning partial item '{}' at new container", current_id);
    Some(next)
}
