//! Minimal element tree built from quick-xml events.
//!
//! The tree only keeps what the decoder looks at: element names, element
//! children and character data. Attributes, comments, processing
//! instructions and the prolog are dropped while reading. Nesting is capped
//! at [`MAX_DEPTH`] so the recursive readers built on the tree stay bounded.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::constants::MAX_DEPTH;
use crate::error::LlsdError;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub children: Vec<Node>,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            children: Vec::new(),
        }
    }

    /// Element children in document order; character data is skipped.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Concatenated character data of the direct children, or `None` when the
    /// element carries no text at all (`<x/>`, `<x></x>`).
    pub fn text(&self) -> Option<String> {
        let mut out: Option<String> = None;
        for child in &self.children {
            if let Node::Text(t) = child {
                out.get_or_insert_with(String::new).push_str(t);
            }
        }
        out
    }
}

/// Parses `xml` into its top-level nodes.
///
/// Fails only when the markup itself is broken: bad syntax, mismatched or
/// unmatched end tags, or elements still open at end of input.
pub fn parse(xml: &str) -> Result<Vec<Node>, LlsdError> {
    let mut reader = Reader::from_str(xml);

    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|err| LlsdError::malformed(reader.error_position(), err.to_string()))?;
        match event {
            Event::Start(start) => {
                check_depth(stack.len() + 1, reader.buffer_position())?;
                stack.push(Element::open(&start));
            }
            Event::Empty(start) => {
                check_depth(stack.len() + 1, reader.buffer_position())?;
                attach(&mut stack, &mut roots, Node::Element(Element::open(&start)));
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                match stack.pop() {
                    Some(done) if done.name == name => {
                        attach(&mut stack, &mut roots, Node::Element(done))
                    }
                    Some(done) => {
                        return Err(LlsdError::malformed(
                            reader.buffer_position(),
                            format!("expected </{}>, found </{name}>", done.name),
                        ))
                    }
                    None => {
                        return Err(LlsdError::malformed(
                            reader.buffer_position(),
                            format!("</{name}> has no matching start tag"),
                        ))
                    }
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|err| {
                    LlsdError::malformed(reader.buffer_position(), err.to_string())
                })?;
                if !text.is_empty() {
                    attach(&mut stack, &mut roots, Node::Text(text.into_owned()));
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                attach(&mut stack, &mut roots, Node::Text(text));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(LlsdError::malformed(
            reader.buffer_position(),
            format!("element <{}> is never closed", open.name),
        ));
    }
    Ok(roots)
}

/// Fails once an element would sit deeper than [`MAX_DEPTH`].
fn check_depth(depth: usize, position: u64) -> Result<(), LlsdError> {
    if depth > MAX_DEPTH {
        return Err(LlsdError::malformed(
            position,
            format!("elements nested deeper than {MAX_DEPTH} levels"),
        ));
    }
    Ok(())
}

fn attach(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(xml: &str) -> Element {
        match parse(xml).unwrap().into_iter().next() {
            Some(Node::Element(el)) => el,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn builds_nested_tree() {
        let el = root("<a><b>x</b> <c/></a>");
        assert_eq!(el.name, "a");
        let names: Vec<&str> = el.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
        assert_eq!(el.elements().next().unwrap().text().as_deref(), Some("x"));
    }

    #[test]
    fn empty_and_self_closing_have_no_text() {
        assert_eq!(root("<a/>").text(), None);
        assert_eq!(root("<a></a>").text(), None);
        assert_eq!(root("<a> </a>").text().as_deref(), Some(" "));
    }

    #[test]
    fn unescapes_entities_and_keeps_cdata() {
        assert_eq!(root("<a>x &amp; y &lt;z&gt;</a>").text().as_deref(), Some("x & y <z>"));
        assert_eq!(root("<a><![CDATA[<raw>]]></a>").text().as_deref(), Some("<raw>"));
    }

    #[test]
    fn skips_prolog_and_comments() {
        let nodes = parse("<?xml version=\"1.0\"?><!-- hi --><a/>").unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn rejects_broken_markup() {
        assert!(matches!(parse("<a><b></a>"), Err(LlsdError::MalformedDocument { .. })));
        assert!(matches!(parse("<a>"), Err(LlsdError::MalformedDocument { .. })));
        assert!(matches!(parse("</a>"), Err(LlsdError::MalformedDocument { .. })));
    }

    #[test]
    fn nesting_is_capped() {
        let at_limit = format!("{}{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH));
        assert!(parse(&at_limit).is_ok());

        let empty_at_limit = format!(
            "{}<a/>{}",
            "<a>".repeat(MAX_DEPTH - 1),
            "</a>".repeat(MAX_DEPTH - 1)
        );
        assert!(parse(&empty_at_limit).is_ok());

        let over = format!("{}<a/>{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH));
        assert!(matches!(parse(&over), Err(LlsdError::MalformedDocument { .. })));
    }
}
