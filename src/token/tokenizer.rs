//! Streaming tokenizer built on html5ever
//!
//! Bytes are decoded incrementally (a character split across two network chunks is
//! reassembled) and fed to the html5ever tokenizer, whose output is buffered until the
//! caller drains it. Nothing is ever re-read.

use super::{Attribute, Token, TokenKind};
use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token as RawToken, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts, TokenizerResult,
};
use std::collections::vec_deque::Drain;
use std::collections::VecDeque;

/// Token sink that converts html5ever tokens and queues them
#[derive(Default)]
struct TokenQueue {
    tokens: VecDeque<Token>,
}

impl TokenSink for TokenQueue {
    type Handle = ();

    fn process_token(&mut self, token: RawToken, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            RawToken::TagToken(tag) => {
                let raw_kind = raw_text_kind(&tag);
                self.tokens.push_back(convert_tag(tag));
                if let Some(kind) = raw_kind {
                    return TokenSinkResult::RawData(kind);
                }
            }
            RawToken::EOFToken => self.tokens.push_back(Token::end_of_stream()),
            // Text runs are by far the most frequent token and never matched on
            RawToken::CharacterTokens(_) | RawToken::NullCharacterToken => {}
            _ => self.tokens.push_back(Token::other("")),
        }
        TokenSinkResult::Continue
    }
}

/// Elements whose content is not markup; mirrors what a tree builder tells the tokenizer
fn raw_text_kind(tag: &Tag) -> Option<RawKind> {
    if tag.kind != TagKind::StartTag || tag.self_closing {
        return None;
    }
    match &*tag.name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

/// html5ever keeps only the first of several attributes sharing a key
fn convert_tag(tag: Tag) -> Token {
    let kind = match (tag.kind, tag.self_closing) {
        (TagKind::StartTag, true) => TokenKind::SelfClosingTag,
        (TagKind::StartTag, false) => TokenKind::StartTag,
        (TagKind::EndTag, _) => TokenKind::Other,
    };

    Token {
        kind,
        name: tag.name.to_string(),
        attrs: tag
            .attrs
            .into_iter()
            .map(|attr| Attribute {
                key: attr.name.local.to_string(),
                value: attr.value.to_string(),
            })
            .collect(),
    }
}

/// Incremental tokenizer fed with raw body chunks
///
/// # Example
///
/// ```
/// use sumi_glean::token::{StreamTokenizer, TokenKind};
///
/// let mut tokenizer = StreamTokenizer::new();
/// let mut tokens: Vec<_> = tokenizer.feed(b"<span title=\"x1\">").collect();
/// tokens.extend(tokenizer.finish());
///
/// assert!(tokens[0].is_start("span"));
/// assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfStream));
/// ```
pub struct StreamTokenizer {
    inner: Tokenizer<TokenQueue>,
    input: BufferQueue,
    decoder: Decoder,
    finished: bool,
}

impl StreamTokenizer {
    /// Creates a tokenizer expecting UTF-8 input
    pub fn new() -> Self {
        Self::with_encoding(UTF_8)
    }

    /// Creates a tokenizer decoding the body with the given encoding
    ///
    /// A byte-order mark at the start of the body still takes precedence.
    pub fn with_encoding(encoding: &'static Encoding) -> Self {
        Self {
            inner: Tokenizer::new(TokenQueue::default(), TokenizerOpts::default()),
            input: BufferQueue::new(),
            decoder: encoding.new_decoder(),
            finished: false,
        }
    }

    /// Feeds the next chunk of body bytes, returning every token completed so far
    pub fn feed(&mut self, chunk: &[u8]) -> Drain<'_, Token> {
        if !self.finished {
            let text = self.decode(chunk, false);
            self.push_text(text);
        }
        self.inner.sink.tokens.drain(..)
    }

    /// Flushes the remaining input; the last token returned is always `EndOfStream`
    ///
    /// Calling this more than once yields nothing further.
    pub fn finish(&mut self) -> Drain<'_, Token> {
        if !self.finished {
            self.finished = true;
            let text = self.decode(&[], true);
            self.push_text(text);
            self.inner.end();
        }
        self.inner.sink.tokens.drain(..)
    }

    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        self.input.push_back(StrTendril::from(text));
        // The sink never yields a script handle, so the tokenizer only stops when the
        // input is used up.
        let result = self.inner.feed(&mut self.input);
        debug_assert!(matches!(result, TokenizerResult::Done));
    }

    fn decode(&mut self, bytes: &[u8], last: bool) -> String {
        let capacity = self
            .decoder
            .max_utf8_buffer_length(bytes.len())
            .unwrap_or(bytes.len());
        let mut text = String::with_capacity(capacity);
        let mut consumed = 0;

        loop {
            let (result, read, _replaced) =
                self.decoder
                    .decode_to_string(&bytes[consumed..], &mut text, last);
            consumed += read;
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => text.reserve(bytes.len() - consumed + 16),
            }
        }

        text
    }
}

impl Default for StreamTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenizes a whole document, ending with `EndOfStream`
pub fn tokenize_str(html: &str) -> Vec<Token> {
    let mut tokenizer = StreamTokenizer::new();
    let mut tokens: Vec<Token> = tokenizer.feed(html.as_bytes()).collect();
    tokens.extend(tokenizer.finish());
    tokens
}
