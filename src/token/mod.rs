//! Markup tokens consumed by the extractor
//!
//! A [`Token`] is the read-only, forward-only unit the extractor matches against. Tokens are
//! produced by [`StreamTokenizer`], which wraps the html5ever tokenizer and accepts the page
//! body chunk by chunk as it arrives from the network.

mod tokenizer;

pub use tokenizer::{tokenize_str, StreamTokenizer};

/// Kind of a markup token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name ...>`
    StartTag,
    /// `<name ... />`
    SelfClosingTag,
    /// End of the document (or of the readable input)
    EndOfStream,
    /// Anything else: end tags, text, comments, doctypes, parse errors
    Other,
}

/// One attribute of a tag, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// A single markup token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Lower-cased tag name; empty for non-tag tokens
    pub name: String,
    pub attrs: Vec<Attribute>,
}

impl Token {
    /// Creates a start-tag token
    pub fn start(name: &str, attrs: &[(&str, &str)]) -> Self {
        Self::tag(TokenKind::StartTag, name, attrs)
    }

    /// Creates a self-closing-tag token
    pub fn self_closing(name: &str, attrs: &[(&str, &str)]) -> Self {
        Self::tag(TokenKind::SelfClosingTag, name, attrs)
    }

    /// Creates an end-of-stream token
    pub fn end_of_stream() -> Self {
        Self {
            kind: TokenKind::EndOfStream,
            name: String::new(),
            attrs: Vec::new(),
        }
    }

    /// Creates a token the extractor never matches on
    pub fn other(name: &str) -> Self {
        Self {
            kind: TokenKind::Other,
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    fn tag(kind: TokenKind, name: &str, attrs: &[(&str, &str)]) -> Self {
        Self {
            kind,
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(key, value)| Attribute {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    /// Looks up an attribute value by key
    ///
    /// When a key occurs more than once the first occurrence wins, the same precedence the
    /// tokenizer applies to markup.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }

    /// Returns true for a start tag with the given name
    pub fn is_start(&self, name: &str) -> bool {
        self.kind == TokenKind::StartTag && self.name == name
    }

    /// Returns true for a self-closing tag with the given name
    pub fn is_self_closing(&self, name: &str) -> bool {
        self.kind == TokenKind::SelfClosingTag && self.name == name
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.kind == TokenKind::EndOfStream
    }
}
