//! XML to [`Node`] normalization.
//!
//! Reduction rules, applied to every element:
//!
//! - attributes become string-valued keys of the element's mapping;
//! - each child element is added under its tag name, a repeated tag is
//!   promoted to an ordered list ([`Mapping::push_child`]);
//! - an element with no attributes and no children reduces to its trimmed
//!   text as a scalar;
//! - otherwise non-empty text is kept under [`TEXT_KEY`].
//!
//! Scalar children whose tag appears in the coercion table are converted to
//! typed nodes. Values that do not parse stay strings.

use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use coverdeck_types::error::{CoverdeckError, Result};

use crate::record::{Mapping, Node, TEXT_KEY};

/// Date format used by the metadata service.
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse an XML document and reduce its root element.
pub fn parse_document(xml: &str) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(OpenElement::from_start(e)?),
            Ok(Event::Empty(ref e)) => {
                let element = OpenElement::from_start(e)?;
                close_element(element, &mut stack, &mut root)?;
            },
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| CoverdeckError::Xml("unbalanced end tag".to_string()))?;
                close_element(element, &mut stack, &mut root)?;
            },
            Ok(Event::Text(ref t)) => {
                if let Some(top) = stack.last_mut() {
                    let text = t.unescape().map_err(|e| xml_error(&reader, e))?;
                    top.text.push_str(&text);
                }
            },
            Ok(Event::CData(t)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {},
        }
    }

    if let Some(open) = stack.last() {
        return Err(CoverdeckError::Xml(format!(
            "unexpected end of document inside <{}>",
            open.tag
        )));
    }
    root.ok_or_else(|| CoverdeckError::Xml("document has no root element".to_string()))
}

/// Convert a scalar child according to the coercion table.
pub fn coerce(tag: &str, text: String) -> Node {
    match tag {
        "id" | "PlatformId" => match text.parse::<i64>() {
            Ok(n) => Node::Integer(n),
            Err(_) => Node::Text(text),
        },
        "ReleaseDate" => match NaiveDate::parse_from_str(&text, DATE_FORMAT) {
            Ok(d) => Node::Date(d),
            Err(_) => Node::Text(text),
        },
        _ => Node::Text(text),
    }
}

/// An element whose end tag has not been seen yet.
struct OpenElement {
    tag: String,
    map: Mapping,
    text: String,
}

impl OpenElement {
    fn from_start(e: &BytesStart<'_>) -> Result<Self> {
        let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut map = Mapping::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| CoverdeckError::Xml(format!("bad attribute: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| CoverdeckError::Xml(format!("bad attribute value: {e}")))?;
            map.push_child(key, Node::Text(value.into_owned()));
        }
        Ok(Self {
            tag,
            map,
            text: String::new(),
        })
    }

    /// Reduce to a node following the module rules (without coercion).
    fn reduce(self) -> (String, Node) {
        let text = self.text.trim();
        if self.map.is_empty() {
            return (self.tag, Node::Text(text.to_string()));
        }
        let mut map = self.map;
        if !text.is_empty() {
            map.set(TEXT_KEY, Node::Text(text.to_string()));
        }
        (self.tag, Node::Map(map))
    }
}

fn close_element(
    element: OpenElement,
    stack: &mut [OpenElement],
    root: &mut Option<Node>,
) -> Result<()> {
    let (tag, node) = element.reduce();
    match stack.last_mut() {
        Some(parent) => {
            let node = match node {
                Node::Text(text) => coerce(&tag, text),
                other => other,
            };
            parent.map.push_child(tag, node);
        },
        None => {
            if root.is_some() {
                return Err(CoverdeckError::Xml(
                    "more than one root element".to_string(),
                ));
            }
            *root = Some(node);
        },
    }
    Ok(())
}

fn xml_error(reader: &Reader<&[u8]>, e: quick_xml::Error) -> CoverdeckError {
    CoverdeckError::Xml(format!("at byte {}: {e}", reader.buffer_position()))
}
