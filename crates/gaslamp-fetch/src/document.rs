//! Navigable XML documents parsed under a fixed anti-injection policy.
//!
//! Parsing never processes a DTD. Entity declarations inside a `DOCTYPE`
//! are skipped, and every entity reference other than the five predefined
//! XML entities and numeric character references expands to empty text. No
//! file or network access can be triggered by document content.
//!
//! [`XmlParser`] holds only its options and the resulting [`XmlDocument`] is
//! immutable, so both can be shared across threads.

use quick_xml::Reader;
use quick_xml::escape::{EscapeError, escape, unescape_with};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::debug;

/// How entity references are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityPolicy {
    /// Predefined entities and character references expand normally; every
    /// other reference, declared or not, expands to empty content.
    #[default]
    Empty,
}

/// Parser configuration.
///
/// The entity policy is fixed to [`EntityPolicy::Empty`] and cannot be
/// changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop whitespace-only text and trim text nodes.
    pub trim_whitespace: bool,
    /// Keep comments in the tree. They are never interpreted.
    pub keep_comments: bool,
    entities: EntityPolicy,
}

impl ParseOptions {
    /// Options used for every oBIX response.
    #[must_use]
    pub const fn secure() -> Self {
        Self {
            trim_whitespace: true,
            keep_comments: true,
            entities: EntityPolicy::Empty,
        }
    }

    /// Sets whitespace trimming.
    #[must_use]
    pub const fn with_trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    /// Sets whether comments are kept.
    #[must_use]
    pub const fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Returns the entity policy.
    #[must_use]
    pub const fn entity_policy(&self) -> EntityPolicy {
        self.entities
    }

    /// Always false.
    #[must_use]
    pub const fn resolves_external_entities(&self) -> bool {
        false
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::secure()
    }
}

/// Errors that can occur while parsing a document.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The reader rejected the input.
    #[error("Malformed XML at byte {position}: {source}")]
    Syntax {
        /// Byte offset reached when the error was detected.
        position: usize,
        /// Underlying reader error.
        #[source]
        source: quick_xml::Error,
    },

    /// An attribute could not be read.
    #[error("Malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    /// A character or entity reference is malformed.
    #[error("Malformed reference: {0}")]
    Escape(#[from] EscapeError),

    /// Names, attributes or text are not valid UTF-8.
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The input ended inside an element.
    #[error("Unclosed element <{0}>")]
    Unclosed(String),

    /// A closing tag had no open element.
    #[error("Closing tag without a matching opening tag")]
    UnexpectedClose,

    /// A second top-level element was found.
    #[error("Document has more than one root element")]
    MultipleRoots,

    /// Non-whitespace text appeared outside the root element.
    #[error("Text outside the root element")]
    TextOutsideRoot,

    /// No element was found.
    #[error("Document has no root element")]
    NoRoot,
}

/// Index of a node within its document.
///
/// Ids increase in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// The content of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with its qualified name and attributes in source order.
    Element {
        /// Qualified name, e.g. `obix:obj` or `obj`.
        name: String,
        /// Attribute name/value pairs with entities expanded.
        attributes: Vec<(String, String)>,
    },
    /// Character data.
    Text(String),
    /// A comment, kept verbatim.
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<NodeData>,
    top_level: Vec<NodeId>,
    root: NodeId,
}

impl XmlDocument {
    /// Parses `input` with [`ParseOptions::secure`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a well-formed document.
    pub fn parse(input: &[u8]) -> Result<Self, XmlError> {
        XmlParser::default().parse(input)
    }

    /// Returns the root element.
    #[must_use]
    pub const fn root(&self) -> Node<'_> {
        Node {
            doc: self,
            id: self.root,
        }
    }

    /// Returns top-level nodes: the root element and any comments around it.
    pub fn top_level(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.top_level.iter().map(|&id| Node { doc: self, id })
    }

    /// Returns every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        (0..self.nodes.len())
            .map(|index| Node {
                doc: self,
                id: NodeId(index),
            })
            .filter(Node::is_element)
    }

    /// Returns the total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a parsed document has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

/// A borrowed handle to one node of an [`XmlDocument`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a XmlDocument,
    id: NodeId,
}

impl<'a> Node<'a> {
    /// Returns this node's id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node content.
    #[must_use]
    pub fn kind(&self) -> &'a NodeKind {
        &self.doc.data(self.id).kind
    }

    /// Returns true for elements.
    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self.kind(), NodeKind::Element { .. })
    }

    /// Returns the qualified element name.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the element name without its namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> Option<&'a str> {
        self.name()
            .map(|name| name.rsplit_once(':').map_or(name, |(_, local)| local))
    }

    /// Returns true if this is an element with the given local name.
    #[must_use]
    pub fn has_local_name(&self, name: &str) -> bool {
        self.local_name() == Some(name)
    }

    /// Returns the element's attributes.
    #[must_use]
    pub fn attributes(&self) -> &'a [(String, String)] {
        match self.kind() {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the value of the named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the content of a text node.
    #[must_use]
    pub fn text(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the parent node.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.doc.data(self.id).parent.map(|id| Self { doc: self.doc, id })
    }

    /// Returns the direct children in document order.
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
        let doc = self.doc;
        doc.data(self.id)
            .children
            .iter()
            .map(move |&id| Node { doc, id })
    }

    /// Returns every descendant, excluding `self`, in document order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'a> {
        let mut stack = self.doc.data(self.id).children.clone();
        stack.reverse();
        Descendants {
            doc: self.doc,
            stack,
        }
    }

    /// Returns the first descendant element with the given local name.
    #[must_use]
    pub fn first_descendant(&self, local_name: &str) -> Option<Self> {
        self.descendants().find(|node| node.has_local_name(local_name))
    }

    /// Serializes the subtree rooted at this node.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) {
        match self.kind() {
            NodeKind::Text(text) => out.push_str(&escape(text.as_str())),
            NodeKind::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            NodeKind::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape(value.as_str()));
                    out.push('"');
                }
                let mut children = self.children().peekable();
                if children.peek().is_none() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in children {
                    child.write_xml(out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", self.kind())
            .finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

/// Depth-first, document-order iterator over a node's descendants.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    doc: &'a XmlDocument,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.data(id).children.iter().rev().copied());
        Some(Node { doc: self.doc, id })
    }
}

/// XML parser bound to a set of [`ParseOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser {
    options: ParseOptions,
}

impl XmlParser {
    /// Creates a parser with the given options.
    #[must_use]
    pub const fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Returns the parser options.
    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses a complete document.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a well-formed document with a
    /// single root element.
    pub fn parse(&self, input: &[u8]) -> Result<XmlDocument, XmlError> {
        let mut reader = Reader::from_reader(input);
        reader.trim_text(self.options.trim_whitespace);
        reader.check_end_names(true);

        let mut tree = TreeBuilder::default();
        let mut buf = Vec::new();
        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(source) => {
                    return Err(XmlError::Syntax {
                        position: reader.buffer_position(),
                        source,
                    });
                }
            };

            match event {
                Event::Start(start) => tree.open(element(&start)?)?,
                Event::Empty(start) => {
                    tree.open(element(&start)?)?;
                    tree.close()?;
                }
                Event::End(_) => tree.close()?,
                Event::Text(text) => {
                    let text = expand_entities(std::str::from_utf8(&text)?)?;
                    tree.text(text, self.options.trim_whitespace)?;
                }
                Event::CData(data) => {
                    tree.text(std::str::from_utf8(&data)?.to_string(), false)?;
                }
                Event::Comment(comment) => {
                    if self.options.keep_comments {
                        tree.comment(std::str::from_utf8(&comment)?.to_string());
                    }
                }
                Event::DocType(_) => {
                    debug!("skipping DOCTYPE declaration; its entities are never expanded");
                }
                Event::Decl(_) | Event::PI(_) => {}
                Event::Eof => break,
            }
            buf.clear();
        }

        tree.finish()
    }
}

/// Builds an element node from a start tag.
fn element(start: &BytesStart<'_>) -> Result<NodeKind, XmlError> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
        let value = expand_entities(std::str::from_utf8(&attribute.value)?)?;
        attributes.push((key, value));
    }
    Ok(NodeKind::Element { name, attributes })
}

fn expand_entities(raw: &str) -> Result<String, EscapeError> {
    Ok(unescape_with(raw, resolve_entity)?.into_owned())
}

/// Entity resolution for [`EntityPolicy::Empty`].
fn resolve_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        _ => "",
    })
}

#[derive(Debug, Default)]
struct TreeBuilder {
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
    top_level: Vec<NodeId>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied();
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.top_level.push(id),
        }
        id
    }

    fn open(&mut self, kind: NodeKind) -> Result<(), XmlError> {
        if self.open.is_empty() && self.root.is_some() {
            return Err(XmlError::MultipleRoots);
        }
        let id = self.push(kind);
        if self.root.is_none() {
            self.root = Some(id);
        }
        self.open.push(id);
        Ok(())
    }

    fn close(&mut self) -> Result<(), XmlError> {
        self.open.pop().map(|_| ()).ok_or(XmlError::UnexpectedClose)
    }

    fn text(&mut self, text: String, trim: bool) -> Result<(), XmlError> {
        let blank = text.trim().is_empty();
        if self.open.is_empty() {
            return if blank {
                Ok(())
            } else {
                Err(XmlError::TextOutsideRoot)
            };
        }
        if text.is_empty() || (trim && blank) {
            return Ok(());
        }
        self.push(NodeKind::Text(text));
        Ok(())
    }

    fn comment(&mut self, comment: String) {
        self.push(NodeKind::Comment(comment));
    }

    fn finish(self) -> Result<XmlDocument, XmlError> {
        if let Some(&id) = self.open.last() {
            let name = match &self.nodes[id.0].kind {
                NodeKind::Element { name, .. } => name.clone(),
                _ => String::new(),
            };
            return Err(XmlError::Unclosed(name));
        }
        let root = self.root.ok_or(XmlError::NoRoot)?;
        Ok(XmlDocument {
            nodes: self.nodes,
            top_level: self.top_level,
            root,
        })
    }
}
