//! Lenient HTML fragment parser.
//!
//! Tokenizing (character references, raw-text states, comments) is html5ever's;
//! tree construction is a small open-element stack instead of the full HTML5
//! tree builder. A stray `<` is text, unmatched end tags are dropped, unclosed
//! elements close at end of input, and a tag cut off by end of input is discarded.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use super::tree::{Attribute, Document, Element, NodeId, NodeKind};

/// Elements that never have children or an end tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text is serialized without escaping.
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// Tokenizer state to switch to after the start tag of `name`, if any.
fn raw_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => Some(RawKind::Rawtext),
        "textarea" | "title" => Some(RawKind::Rcdata),
        _ => None,
    }
}

/// Parses `content` as the inside of a document body: top-level nodes become
/// children of the synthetic root.
pub fn parse(content: &str) -> Document {
    let mut input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(content));

    let mut tokenizer = Tokenizer::new(TreeSink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();
    tokenizer.sink.doc
}

struct TreeSink {
    doc: Document,
    /// Open elements, innermost last.
    open: Vec<(String, NodeId)>,
}

impl Default for TreeSink {
    fn default() -> Self {
        Self {
            doc: Document::new(),
            open: Vec::new(),
        }
    }
}

impl TreeSink {
    fn current(&self) -> NodeId {
        self.open
            .last()
            .map(|(_, id)| *id)
            .unwrap_or_else(|| self.doc.root())
    }

    fn start_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        let name = tag.name.to_string();
        let el = Element {
            name: name.clone(),
            attrs: tag
                .attrs
                .into_iter()
                .map(|attr| Attribute {
                    name: attr.name.local.to_string(),
                    value: attr.value.to_string(),
                })
                .collect(),
            self_closing: tag.self_closing,
        };
        let parent = self.current();
        let id = self.doc.append(parent, NodeKind::Element(el));
        if tag.self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
            return TokenSinkResult::Continue;
        }
        let next = match raw_kind(&name) {
            Some(kind) => TokenSinkResult::RawData(kind),
            None => TokenSinkResult::Continue,
        };
        self.open.push((name, id));
        next
    }

    fn end_tag(&mut self, name: &str) {
        if let Some(idx) = self.open.iter().rposition(|(open, _)| open == name) {
            self.open.truncate(idx);
        }
    }
}

impl TokenSink for TreeSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => return self.start_tag(tag),
                TagKind::EndTag => self.end_tag(&tag.name),
            },
            Token::CharacterTokens(text) => {
                let parent = self.current();
                self.doc.append_text(parent, &text);
            }
            Token::CommentToken(text) => {
                let parent = self.current();
                self.doc.append(parent, NodeKind::Comment(text.to_string()));
            }
            Token::DoctypeToken(doctype) => {
                let parent = self.current();
                let name = doctype.name.map(|n| n.to_string()).unwrap_or_default();
                self.doc.append(parent, NodeKind::Doctype(name));
            }
            Token::ParseError(err) => tracing::trace!(%err, "html parse error"),
            Token::NullCharacterToken | Token::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}
