// ABOUTME: Document tree module for the cardpost application
// ABOUTME: Owned element/text tree parsed from rendered HTML and serialized back to markup

use crate::errors::Result;
use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, Event};

/// Elements that never have children and serialize self-closed
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// Elements whose body is text up to the matching end tag
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea"];

/// Raw-text elements whose body still decodes character references
const ESCAPABLE_RAW_TEXT_TAGS: &[&str] = &["textarea"];

/// Longest entity name worth looking up (`&CounterClockwiseContourIntegral;`)
const MAX_ENTITY_LEN: usize = 32;

/// Child-index path from a root element to one of its descendants
pub type NodePath = Vec<usize>;

/// A node in the rendered document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any previous value in place
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", &joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let kept: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        if kept.is_empty() {
            self.remove_attr("class");
        } else {
            let joined = kept.join(" ");
            self.set_attr("class", &joined);
        }
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Children ignoring whitespace-only text nodes
    pub fn significant_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|child| !child.is_whitespace())
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// True when any descendant (not self) matches the predicate
    pub fn has_descendant(&self, predicate: &dyn Fn(&Element) -> bool) -> bool {
        self.element_children()
            .any(|child| predicate(child) || child.has_descendant(predicate))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn text(text: &str) -> Self {
        Node::Text(text.to_string())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// True for an element with the given tag
    pub fn is_element(&self, tag: &str) -> bool {
        self.as_element().map(|e| e.is(tag)).unwrap_or(false)
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }
}

/// Resolve a path of child indices below `root`
pub fn element_at<'a>(root: &'a Element, path: &[usize]) -> Option<&'a Element> {
    let mut current = root;
    for &idx in path {
        current = current.children.get(idx)?.as_element()?;
    }
    Some(current)
}

pub fn element_at_mut<'a>(root: &'a mut Element, path: &[usize]) -> Option<&'a mut Element> {
    let mut current = root;
    for &idx in path {
        current = current.children.get_mut(idx)?.as_element_mut()?;
    }
    Some(current)
}

/// Rendered document: the ordered block-level nodes of one render pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Parse an HTML fragment (e.g. the output of a markdown renderer)
    pub fn from_html(html: &str) -> Result<Self> {
        Ok(Self::new(parse_fragment(html)?))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(Node::is_whitespace)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(node, &mut out);
        }
        out
    }
}

/// Parse an HTML fragment into a list of root nodes.
/// Unclosed elements are closed at the end of input, stray end tags are ignored.
/// The bodies of `script`, `style` and `textarea` are kept as a single text child.
pub fn parse_fragment(html: &str) -> Result<Vec<Node>> {
    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    let mut rest = html;
    while let Some((open_end, tag)) = find_raw_text_open(rest) {
        parse_markup(&rest[..open_end], &mut stack, &mut roots)?;
        let after_open = &rest[open_end..];

        // A self-closed `<script/>` leaves nothing open to fill
        if stack.last().map(|open| open.tag.as_str()) != Some(tag) {
            rest = after_open;
            continue;
        }

        let (body, after_close) = split_raw_text(after_open, tag);
        if !body.is_empty() {
            let text = if ESCAPABLE_RAW_TEXT_TAGS.contains(&tag) {
                decode_entities(body)
            } else {
                body.to_string()
            };
            attach(&mut stack, &mut roots, Node::Text(text));
        }
        if let Some(closed) = stack.pop() {
            attach(&mut stack, &mut roots, closed.into());
        }
        rest = after_close;
    }
    parse_markup(rest, &mut stack, &mut roots)?;

    while let Some(open) = stack.pop() {
        attach(&mut stack, &mut roots, open.into());
    }

    Ok(roots)
}

/// Feed one stretch of ordinary markup through the reader, continuing the open-element stack
fn parse_markup(html: &str, stack: &mut Vec<Element>, roots: &mut Vec<Node>) -> Result<()> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let element = element_from_start(&e);
                if VOID_TAGS.contains(&element.tag.as_str()) {
                    attach(stack, roots, element.into());
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(e) => {
                let element = element_from_start(&e);
                attach(stack, roots, element.into());
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                match stack.iter().rposition(|open| open.tag == name) {
                    Some(pos) => {
                        while stack.len() > pos {
                            if let Some(closed) = stack.pop() {
                                attach(stack, roots, closed.into());
                            }
                        }
                    }
                    None => debug!("Ignoring stray end tag </{}>", name),
                }
            }
            Event::Text(e) => {
                let text = decode_entities(&String::from_utf8_lossy(&e));
                if !text.is_empty() {
                    attach(stack, roots, Node::Text(text));
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                attach(stack, roots, Node::Text(text));
            }
            Event::Eof => break,
            // Comments, declarations and processing instructions carry no content
            _ => {}
        }
    }
    Ok(())
}

/// Locate the next raw-text start tag outside comments.
/// Returns the byte offset just past its `>` and the lowercase tag name.
fn find_raw_text_open(html: &str) -> Option<(usize, &'static str)> {
    let bytes = html.as_bytes();
    let mut i = 0;
    while let Some(offset) = html[i..].find('<') {
        let lt = i + offset;
        if html[lt..].starts_with("<!--") {
            i = match html[lt + 4..].find("-->") {
                Some(end) => lt + 4 + end + 3,
                None => return None,
            };
            continue;
        }
        for &tag in RAW_TEXT_TAGS {
            let name_end = lt + 1 + tag.len();
            let matches_name = html
                .get(lt + 1..name_end)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag));
            let boundary = bytes
                .get(name_end)
                .is_some_and(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/');
            if matches_name && boundary {
                return tag_end(html, name_end).map(|end| (end, tag));
            }
        }
        i = lt + 1;
    }
    None
}

/// Offset just past the `>` closing a start tag, skipping quoted attribute values
fn tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (offset, &b) in html.as_bytes()[from..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(from + offset + 1),
            None => {}
        }
    }
    None
}

/// Split raw text at its case-insensitive `</tag` end; returns the body and what follows the end tag
fn split_raw_text<'a>(html: &'a str, tag: &str) -> (&'a str, &'a str) {
    let lower = html.to_ascii_lowercase();
    let close = format!("</{}", tag);
    match lower.find(&close) {
        Some(pos) => {
            let after = match html[pos..].find('>') {
                Some(gt) => &html[pos + gt + 1..],
                None => "",
            };
            (&html[..pos], after)
        }
        None => (html, ""),
    }
}

fn attach(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Build an element from a start tag. Duplicate attributes keep their first value,
/// malformed ones end the attribute list.
fn element_from_start(start: &BytesStart<'_>) -> Element {
    let tag = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
    let mut element = Element::new(&tag);
    let mut attributes = start.html_attributes();
    attributes.with_checks(false);
    for attr in attributes {
        let attr = match attr {
            Ok(attr) => attr,
            Err(e) => {
                warn!("Dropping malformed attributes in <{}>: {}", tag, e);
                break;
            }
        };
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        if element.attr(&key).is_some() {
            warn!("Ignoring duplicate attribute {} in <{}>", key, tag);
            continue;
        }
        let value = decode_entities(&String::from_utf8_lossy(&attr.value));
        element.attrs.push((key, value));
    }
    element
}

/// Replace character references one at a time; unknown or malformed ones stay literal
pub fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];
        let resolved = candidate
            .find(';')
            .filter(|&semi| semi > 0 && semi <= MAX_ENTITY_LEN)
            .and_then(|semi| resolve_entity(&candidate[..semi]).map(|text| (text, semi)));
        match resolved {
            Some((text, semi)) => {
                out.push_str(&text);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = candidate;
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_html5_entity(name).map(str::to_string)
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => escape_into(text, false, out),
        Node::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (key, value) in &element.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
    if VOID_TAGS.contains(&element.tag.as_str()) {
        out.push_str(" />");
        return;
    }
    out.push('>');
    let raw = RAW_TEXT_TAGS.contains(&element.tag.as_str())
        && !ESCAPABLE_RAW_TEXT_TAGS.contains(&element.tag.as_str());
    for child in &element.children {
        match child {
            Node::Text(text) if raw => out.push_str(text),
            _ => write_node(child, out),
        }
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn escape_into(text: &str, in_attr: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
