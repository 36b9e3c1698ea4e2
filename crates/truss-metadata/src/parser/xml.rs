//! Minimal XML document reader shared by the POM and Ivy parsers.
//!
//! Descriptors are small, so the whole document is materialized as an
//! element tree; parsers then navigate by element name. Namespace prefixes
//! are stripped: descriptor vocabularies are matched by local name.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Malformed XML in a descriptor
#[derive(Error, Debug)]
#[error("{message}")]
pub(crate) struct XmlError {
    pub message: String,
}

impl XmlError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One element of a parsed descriptor document
#[derive(Debug, Clone, Default)]
pub(crate) struct XmlElement {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    /// First child with the given local name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All children with the given local name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Non-empty text content of the named child
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|child| child.text.as_str())
            .filter(|text| !text.is_empty())
    }

    /// Attribute value by local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Parse a descriptor document into its root element
pub(crate) fn parse_document(bytes: &[u8]) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::new("unbalanced closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| XmlError::new(e.to_string()))?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(value.trim());
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(XmlError::new(e.to_string())),
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(XmlError::new("unexpected end of input inside an open element"));
    }
    root.ok_or_else(|| XmlError::new("document has no root element"))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None => {
            if root.is_some() {
                return Err(XmlError::new("document has more than one root element"));
            }
            *root = Some(element);
            Ok(())
        }
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = HashMap::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::new(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlError::new(e.to_string()))?
            .into_owned();
        attributes.insert(key, value);
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}
