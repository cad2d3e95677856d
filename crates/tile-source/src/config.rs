//! Structured configuration documents.
//!
//! Source configuration arrives as an XML fragment. It is parsed once into an
//! owned [`ConfigNode`] tree that sources read from without caring about the
//! underlying XML reader.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{SourceError, SourceResult};

/// Content of an element, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Text(String),
    Element(ConfigNode),
}

/// An element of a configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNode {
    name: String,
    attributes: Vec<(String, String)>,
    content: Vec<Content>,
}

impl ConfigNode {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder: append a text run.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content.push(Content::Text(text.into()));
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.content.push(Content::Element(child));
        self
    }

    /// Parse a document and return its root element.
    ///
    /// Declarations, comments and processing instructions are dropped. Text
    /// is kept exactly as written apart from entity unescaping.
    pub fn parse_str(xml: &str) -> SourceResult<ConfigNode> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<ConfigNode> = Vec::new();
        let mut root: Option<ConfigNode> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(multiple_roots());
                    }
                    stack.push(Self::from_start(&e)?);
                }
                Event::Empty(e) => {
                    let node = Self::from_start(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.content.push(Content::Element(node)),
                        None if root.is_none() => root = Some(node),
                        None => return Err(multiple_roots()),
                    }
                }
                Event::End(_) => {
                    // quick-xml already rejects mismatched end tags
                    let node = stack.pop().ok_or_else(|| {
                        SourceError::InvalidConfig("unexpected closing tag".to_string())
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.content.push(Content::Element(node)),
                        None => root = Some(node),
                    }
                }
                Event::Text(t) => {
                    if let Some(node) = stack.last_mut() {
                        node.push_text(t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(node) = stack.last_mut() {
                        node.push_text(String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(SourceError::InvalidConfig(format!(
                "unclosed element <{}>",
                open.name
            )));
        }
        root.ok_or_else(|| SourceError::InvalidConfig("document has no root element".to_string()))
    }

    fn from_start(e: &BytesStart<'_>) -> SourceResult<ConfigNode> {
        let mut node = ConfigNode::new(String::from_utf8_lossy(e.name().as_ref()));
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            node.attributes.push((key, value));
        }
        Ok(node)
    }

    fn push_text(&mut self, text: Cow<'_, str>) {
        if text.is_empty() {
            return;
        }
        match self.content.last_mut() {
            Some(Content::Text(run)) => run.push_str(&text),
            _ => self.content.push(Content::Text(text.into_owned())),
        }
    }

    /// Element tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &ConfigNode> {
        self.content.iter().filter_map(|c| match c {
            Content::Element(node) => Some(node),
            Content::Text(_) => None,
        })
    }

    /// Child elements with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> {
        self.children().filter(move |c| c.name == name)
    }

    /// First child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&ConfigNode> {
        self.children().find(|c| c.name == name)
    }

    /// All descendant text concatenated in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for c in &self.content {
            match c {
                Content::Text(t) => out.push_str(t),
                Content::Element(node) => node.collect_text(out),
            }
        }
    }
}

fn multiple_roots() -> SourceError {
    SourceError::InvalidConfig("document has more than one root element".to_string())
}
