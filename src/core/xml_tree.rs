//! Generic XML tree and the response parser that produces it.
//!
//! Layout conventions:
//!
//! - the document root is stored under its own name in a top-level map and is
//!   *not* wrapped in a sequence;
//! - every child element is wrapped in a [`XmlNode::Sequence`], singletons included;
//! - an element with no attributes and no children becomes a [`XmlNode::Scalar`]
//!   holding its raw text (an empty element is `Scalar("")`);
//! - attributes live under `$`, text mixed with child elements under `_`.
//!
//! So every leaf is reachable by indexing by tag name and taking element `0`
//! whenever a sequence is met, which is what [`XmlNode::first`] does.

use crate::utils::error::XmlError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::BTreeMap;

pub const ATTRIBUTES_KEY: &str = "$";
pub const TEXT_KEY: &str = "_";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XmlNode {
    Scalar(String),
    Map(BTreeMap<String, XmlNode>),
    Sequence(Vec<XmlNode>),
}

impl XmlNode {
    /// Index a map by key. Scalars and sequences have no keys.
    pub fn get(&self, key: &str) -> Option<&XmlNode> {
        match self {
            XmlNode::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// 若為序列則取第一個元素，否則回傳自身
    pub fn first(&self) -> Option<&XmlNode> {
        match self {
            XmlNode::Sequence(items) => items.first(),
            other => Some(other),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlNode::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Walk `keys` from this node, collapsing sequences to their first element
    /// after every step, and return the text found there.
    pub fn text_at(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .try_fold(self, |node, key| node.get(key)?.first())?
            .as_text()
    }

    /// Compact JSON rendering, used when an error node has no usable description.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

impl From<&str> for XmlNode {
    fn from(text: &str) -> Self {
        XmlNode::Scalar(text.to_string())
    }
}

struct Frame {
    name: String,
    attributes: BTreeMap<String, XmlNode>,
    children: BTreeMap<String, Vec<XmlNode>>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Self, XmlError> {
        let name = decode_utf8(start.name().as_ref())?;
        let mut attributes = BTreeMap::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = decode_utf8(attr.key.as_ref())?;
            let value = attr.decode_and_unescape_value(reader.decoder())?;
            attributes.insert(key, XmlNode::Scalar(value.into_owned()));
        }

        Ok(Self {
            name,
            attributes,
            children: BTreeMap::new(),
            text: String::new(),
        })
    }

    fn close(self) -> (String, XmlNode) {
        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, XmlNode::Scalar(self.text));
        }

        let mut map: BTreeMap<String, XmlNode> = self
            .children
            .into_iter()
            .map(|(key, items)| (key, XmlNode::Sequence(items)))
            .collect();
        if !self.attributes.is_empty() {
            map.insert(ATTRIBUTES_KEY.to_string(), XmlNode::Map(self.attributes));
        }
        if !self.text.trim().is_empty() {
            map.insert(TEXT_KEY.to_string(), XmlNode::Scalar(self.text));
        }
        (self.name, XmlNode::Map(map))
    }
}

/// Parse a response body into an [`XmlNode`] tree.
///
/// # Errors
///
/// Returns `XmlError` for malformed documents: mismatched or unclosed tags,
/// invalid encoding, unknown entities, a missing or repeated root element,
/// or non-whitespace content outside the root.
pub fn parse(body: &str) -> Result<XmlNode, XmlError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().expand_empty_elements = true;

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, XmlNode)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let frame = Frame::open(&e, &reader)?;
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::MultipleRoots(frame.name));
                }
                stack.push(frame);
            }
            Event::End(_) => {
                // quick-xml already rejects mismatched end tags
                let frame = stack.pop().ok_or(XmlError::MissingRoot)?;
                let (name, node) = frame.close();
                match stack.last_mut() {
                    Some(parent) => parent.children.entry(name).or_default().push(node),
                    None if root.is_some() => return Err(XmlError::MultipleRoots(name)),
                    None => root = Some((name, node)),
                }
            }
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::Encoding(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::Encoding(err.to_string()))?;
                push_text(&mut stack, &unescaped)?;
            }
            Event::CData(e) => {
                let text = decode_utf8(&e.into_inner())?;
                push_text(&mut stack, &text)?;
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e.resolve_char_ref()? {
                    push_text(&mut stack, ch.encode_utf8(&mut [0u8; 4]))?;
                } else {
                    let name = e
                        .decode()
                        .map_err(|err| XmlError::Encoding(err.to_string()))?
                        .into_owned();
                    let resolved = quick_xml::escape::resolve_predefined_entity(&name)
                        .ok_or(XmlError::UnknownEntity(name.clone()))?;
                    push_text(&mut stack, resolved)?;
                }
            }
            Event::Eof => break,
            // declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnclosedElement(open.name));
    }

    let (name, node) = root.ok_or(XmlError::MissingRoot)?;
    let mut tree = BTreeMap::new();
    tree.insert(name, node);
    Ok(XmlNode::Map(tree))
}

/// Append text to the open element. Only whitespace may sit outside the root.
fn push_text(stack: &mut [Frame], text: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(frame) => frame.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => return Err(XmlError::ContentOutsideRoot(text.trim().to_string())),
    }
    Ok(())
}

fn decode_utf8(bytes: &[u8]) -> Result<String, XmlError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|err| XmlError::Encoding(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_map_and_children_are_sequences() {
        let tree = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<CityStateLookupResponse><ZipCode ID="0"><Zip5>80202</Zip5><City>DENVER</City><State>CO</State></ZipCode></CityStateLookupResponse>"#,
        )
        .unwrap();

        let response = tree.get("CityStateLookupResponse").unwrap();
        assert!(matches!(response, XmlNode::Map(_)));

        let zip_code = response.get("ZipCode").unwrap();
        let XmlNode::Sequence(items) = zip_code else {
            panic!("expected a sequence, got {:?}", zip_code);
        };
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].get("City"),
            Some(&XmlNode::Sequence(vec![XmlNode::from("DENVER")]))
        );
        assert_eq!(items[0].text_at(&["$", "ID"]), Some("0"));
    }

    #[test]
    fn test_repeated_children_keep_document_order() {
        let tree = parse("<R><Postage>1</Postage><Postage>2</Postage></R>").unwrap();

        let postage = tree.get("R").unwrap().get("Postage").unwrap();
        assert_eq!(
            postage,
            &XmlNode::Sequence(vec![XmlNode::from("1"), XmlNode::from("2")])
        );
    }

    #[test]
    fn test_text_is_kept_raw_and_entities_resolved() {
        let tree = parse("<R><Description> Tom &amp; Jerry &#65; </Description><Empty/></R>").unwrap();

        let root = tree.get("R").unwrap();
        assert_eq!(root.text_at(&["Description"]), Some(" Tom & Jerry A "));
        assert_eq!(root.text_at(&["Empty"]), Some(""));
    }

    #[test]
    fn test_cdata_is_text() {
        let tree = parse("<R><Note><![CDATA[a < b]]></Note></R>").unwrap();
        assert_eq!(tree.get("R").unwrap().text_at(&["Note"]), Some("a < b"));
    }

    #[test]
    fn test_whitespace_between_children_is_dropped() {
        let tree = parse("<R>\n  <A>1</A>\n</R>").unwrap();
        let root = tree.get("R").unwrap();
        assert!(!root.contains_key(TEXT_KEY));
        assert_eq!(root.text_at(&["A"]), Some("1"));
    }

    #[test]
    fn test_root_level_error_shape() {
        let tree = parse("<Error><Number>80040B1A</Number><Description>Authorization failure.</Description></Error>").unwrap();
        let error = tree.get("Error").unwrap();
        assert_eq!(error.text_at(&["Description"]), Some("Authorization failure."));
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        assert!(parse("<A><B></A>").is_err());
        assert!(parse("<A><B>").is_err());
        assert!(matches!(parse(""), Err(XmlError::MissingRoot)));
        assert!(parse("<A>&bogus;</A>").is_err());
    }

    #[test]
    fn test_second_root_element_is_rejected() {
        let result = parse(
            "<CityStateLookupResponse><ZipCode><City>X</City></ZipCode></CityStateLookupResponse>\
             <Error><Description>late</Description></Error>",
        );
        assert!(matches!(result, Err(XmlError::MultipleRoots(ref name)) if name == "Error"));

        assert!(matches!(parse("<A/><B/>"), Err(XmlError::MultipleRoots(_))));
    }

    #[test]
    fn test_content_outside_root_is_rejected() {
        assert!(matches!(
            parse("<A>1</A>trailing garbage"),
            Err(XmlError::ContentOutsideRoot(ref text)) if text == "trailing garbage"
        ));
        assert!(matches!(
            parse("leading junk<A>1</A>"),
            Err(XmlError::ContentOutsideRoot(_))
        ));
        assert!(parse("<A>1</A><![CDATA[x]]>").is_err());
        assert!(parse("<A>1</A>&amp;").is_err());

        // whitespace and comments around the root are fine
        let tree = parse("\n<!-- note -->\n<A>1</A>\n  \n").unwrap();
        assert_eq!(tree.text_at(&["A"]), Some("1"));
    }

    #[test]
    fn test_to_json_string_renders_tree() {
        let tree = parse("<Error><Number>1</Number></Error>").unwrap();
        let error = tree.get("Error").unwrap();
        assert_eq!(error.to_json_string(), r#"{"Number":["1"]}"#);
    }
}
