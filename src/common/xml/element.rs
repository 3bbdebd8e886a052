//! Mutable XML element tree.
//!
//! Presentation parts are edited in place (text replaced, runs split, attributes
//! rewritten) and written back on save, so they are held as a small owned tree
//! instead of the read-only event streams used for other parts. Element names
//! keep their namespace prefix (`a:t`, `p:sp`); lookups by local name ignore it.

use super::escape::escape_xml;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt::Write as _;
use thiserror::Error;

/// Errors raised while building an element tree.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("Invalid attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid UTF-8 in XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Unknown entity reference: &{0};")]
    UnknownEntity(String),

    #[error("Unbalanced end tag: {0}")]
    UnbalancedEnd(String),

    #[error("Document has no root element")]
    NoRoot,
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Local part of a possibly prefixed name.
#[inline]
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder-style text append.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Qualified name, e.g. `p:sp`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    #[inline]
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Attribute by exact qualified name (`r:embed`, `sz`).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute by local name, ignoring any prefix.
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local_name(key) == local)
            .map(|(_, value)| value.as_str())
    }

    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attr(name).and_then(|v| v.trim().parse().ok())
    }

    /// OOXML boolean attribute (`1`, `true`, `on` / `0`, `false`, `off`).
    pub fn attr_bool(&self, name: &str) -> Option<bool> {
        match self.attr(name)? {
            "1" | "true" | "on" => Some(true),
            "0" | "false" | "off" => Some(false),
            _ => None,
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set an attribute, replacing the value in place when it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(pos).1)
    }

    // ========================================================================
    // Children
    // ========================================================================

    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Element children in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(local))
    }

    pub fn child_mut(&mut self, local: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.is(local))
    }

    /// Descend through a `/`-separated path of local names.
    pub fn find(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .try_fold(self, |current, step| current.child(step))
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut Element> {
        path.split('/')
            .try_fold(self, |current, step| current.child_mut(step))
    }

    /// Index in `children()` of the first element with the given local name.
    pub fn position(&self, local: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(e) if e.is(local)))
    }

    /// First child with the given local name, inserting `make()` at `index` when absent.
    pub fn get_or_insert_child(
        &mut self,
        local: &str,
        index: usize,
        make: impl FnOnce() -> Element,
    ) -> &mut Element {
        let pos = match self.position(local) {
            Some(pos) => pos,
            None => {
                let index = index.min(self.children.len());
                self.children.insert(index, Node::Element(make()));
                index
            },
        };
        match &mut self.children[pos] {
            Node::Element(e) => e,
            Node::Text(_) => unreachable!("position() only matches elements"),
        }
    }

    #[inline]
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn insert(&mut self, index: usize, child: Element) {
        let index = index.min(self.children.len());
        self.children.insert(index, Node::Element(child));
    }

    /// Remove every child element with the given local name.
    pub fn remove_children(&mut self, local: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, Node::Element(e) if e.is(local)));
        before - self.children.len()
    }

    /// Detach the child elements matching `pred`.
    ///
    /// Returns the children index where the first detached element used to sit
    /// (or the end of the list when nothing matched) so that [`Element::attach`]
    /// can put replacements back in the same place.
    pub fn detach(&mut self, mut pred: impl FnMut(&Element) -> bool) -> (usize, Vec<Element>) {
        let mut slot = None;
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());
        for node in std::mem::take(&mut self.children) {
            match node {
                Node::Element(e) if pred(&e) => {
                    slot.get_or_insert(kept.len());
                    taken.push(e);
                },
                other => kept.push(other),
            }
        }
        self.children = kept;
        (slot.unwrap_or(self.children.len()), taken)
    }

    /// Insert `elements` consecutively starting at children index `slot`.
    pub fn attach(&mut self, slot: usize, elements: impl IntoIterator<Item = Element>) {
        let slot = slot.min(self.children.len());
        let tail = self.children.split_off(slot);
        self.children.extend(elements.into_iter().map(Node::Element));
        self.children.extend(tail);
    }

    /// Concatenated text of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Parse an XML document and return its root element.
    ///
    /// Whitespace-only text is dropped except inside `t` elements, where it is
    /// run content.
    pub fn parse(xml: &[u8]) -> Result<Element, XmlError> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => stack.push(Self::from_start(&e)?),
                Event::Empty(e) => {
                    let element = Self::from_start(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push(element),
                        None => root = Some(element),
                    }
                },
                Event::End(e) => {
                    let element = stack.pop().ok_or_else(|| {
                        XmlError::UnbalancedEnd(String::from_utf8_lossy(e.name().as_ref()).into_owned())
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.push(element),
                        None => root = Some(element),
                    }
                },
                Event::Text(e) => {
                    let text = std::str::from_utf8(e.as_ref())?;
                    if let Some(current) = stack.last_mut() {
                        current.push_text(text);
                    }
                },
                Event::CData(e) => {
                    let text = std::str::from_utf8(e.as_ref())?;
                    if let Some(current) = stack.last_mut() {
                        current.push_text(text);
                    }
                },
                Event::GeneralRef(e) => {
                    let name = std::str::from_utf8(e.as_ref())?;
                    let resolved = resolve_entity(name)?;
                    if let Some(current) = stack.last_mut() {
                        current.push_text(resolved.encode_utf8(&mut [0; 4]));
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        let mut root = root.ok_or(XmlError::NoRoot)?;
        root.drop_layout_whitespace();
        Ok(root)
    }

    fn from_start(e: &BytesStart<'_>) -> Result<Element, XmlError> {
        let name = std::str::from_utf8(e.name().as_ref())?.to_string();
        let mut element = Element::new(name);
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    /// Append text, merging with a trailing text node.
    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    fn drop_layout_whitespace(&mut self) {
        if self.is("t") {
            return;
        }
        self.children.retain(|node| match node {
            Node::Text(t) => !t.trim().is_empty(),
            Node::Element(_) => true,
        });
        for child in self.elements_mut() {
            child.drop_layout_whitespace();
        }
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serialize as a standalone document with an XML declaration.
    pub fn to_xml(&self) -> String {
        let mut out =
            String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n");
        self.write_to(&mut out);
        out
    }

    /// Serialize this element (no declaration) onto `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", key, escape_xml(value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(&escape_xml(t)),
                Node::Element(e) => e.write_to(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Resolve a general entity reference (without `&` and `;`).
pub(crate) fn resolve_entity(name: &str) -> Result<char, XmlError> {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => name.strip_prefix('#').and_then(|num| {
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse().ok(),
            };
            code.and_then(char::from_u32)
        }),
    };
    resolved.ok_or_else(|| XmlError::UnknownEntity(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sp xmlns:p="urn:p" xmlns:a="urn:a">
  <p:nvSpPr><p:cNvPr id="2" name="Title 1"/></p:nvSpPr>
  <p:txBody>
    <a:p><a:r><a:rPr sz="2400"/><a:t> Fish &amp; Chips &#169;</a:t></a:r></a:p>
  </p:txBody>
</p:sp>"#;

    #[test]
    fn test_parse_structure() {
        let root = Element::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(root.name(), "p:sp");
        assert_eq!(root.local_name(), "sp");
        assert_eq!(root.elements().count(), 2);

        let c_nv_pr = root.find("nvSpPr/cNvPr").unwrap();
        assert_eq!(c_nv_pr.attr("id"), Some("2"));
        assert_eq!(c_nv_pr.attr_i64("id"), Some(2));
        assert_eq!(c_nv_pr.attr("name"), Some("Title 1"));
    }

    #[test]
    fn test_run_text_keeps_spaces_and_entities() {
        let root = Element::parse(SAMPLE.as_bytes()).unwrap();
        let t = root.find("txBody/p/r/t").unwrap();
        assert_eq!(t.text(), " Fish & Chips \u{a9}");
    }

    #[test]
    fn test_round_trip_escapes() {
        let root = Element::parse(SAMPLE.as_bytes()).unwrap();
        let xml = root.to_xml();
        assert!(xml.contains("Fish &amp; Chips"));
        let again = Element::parse(xml.as_bytes()).unwrap();
        assert_eq!(root, again);
    }

    #[test]
    fn test_set_and_remove_attr() {
        let mut e = Element::new("p:sld");
        e.set_attr("show", "0");
        e.set_attr("show", "1");
        assert_eq!(e.attributes().count(), 1);
        assert_eq!(e.attr_bool("show"), Some(true));
        assert_eq!(e.remove_attr("show").as_deref(), Some("1"));
        assert_eq!(e.attr("show"), None);
    }

    #[test]
    fn test_detach_and_attach_preserve_position() {
        let mut tree = Element::new("p:spTree")
            .with_child(Element::new("p:nvGrpSpPr"))
            .with_child(Element::new("p:grpSpPr"))
            .with_child(Element::new("p:sp").with_attr("n", "1"))
            .with_child(Element::new("p:pic"))
            .with_child(Element::new("p:extLst"));

        let (slot, shapes) = tree.detach(|e| e.is("sp") || e.is("pic"));
        assert_eq!(slot, 2);
        assert_eq!(shapes.len(), 2);
        assert_eq!(tree.elements().count(), 3);

        tree.attach(slot, shapes);
        let names: Vec<_> = tree.elements().map(|e| e.local_name().to_string()).collect();
        assert_eq!(names, ["nvGrpSpPr", "grpSpPr", "sp", "pic", "extLst"]);
    }

    #[test]
    fn test_get_or_insert_child() {
        let mut p = Element::new("a:p").with_child(Element::new("a:r"));
        p.get_or_insert_child("pPr", 0, || Element::new("a:pPr"))
            .set_attr("algn", "ctr");
        p.get_or_insert_child("pPr", 0, || Element::new("a:pPr"));
        assert_eq!(p.elements().count(), 2);
        assert_eq!(p.elements().next().unwrap().attr("algn"), Some("ctr"));
    }

    #[test]
    fn test_unknown_entity_is_error() {
        let err = Element::parse(b"<a>&bogus;</a>").unwrap_err();
        assert!(matches!(err, XmlError::UnknownEntity(name) if name == "bogus"));
    }

    #[test]
    fn test_no_root() {
        assert!(matches!(Element::parse(b"   ").unwrap_err(), XmlError::NoRoot));
    }
}
