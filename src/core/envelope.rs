//! Request envelope serialization.
//!
//! The target API validates request fields positionally, so [`Params`] keeps
//! insertion order and the builder writes children exactly in that order.

use crate::utils::error::XmlError;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use std::io::{self, Write};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(f64),
    Nested(Params),
}

impl ParamValue {
    fn write_xml<W: Write>(&self, writer: &mut Writer<W>, tag: &str) -> io::Result<()> {
        match self {
            ParamValue::Text(text) if text.is_empty() => {
                writer.create_element(tag).write_empty()?;
            }
            ParamValue::Text(text) => {
                writer
                    .create_element(tag)
                    .write_text_content(BytesText::new(text))?;
            }
            ParamValue::Number(value) => {
                writer
                    .create_element(tag)
                    .write_text_content(BytesText::new(&value.to_string()))?;
            }
            ParamValue::Nested(params) => {
                writer
                    .create_element(tag)
                    .write_inner_content(|w| params.write_xml(w))?;
            }
        }
        Ok(())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<Params> for ParamValue {
    fn from(value: Params) -> Self {
        ParamValue::Nested(value)
    }
}

/// Ordered parameter tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    fields: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// 依序加入欄位（順序即為輸出順序）
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for (name, value) in &self.fields {
            value.write_xml(writer, name)?;
        }
        Ok(())
    }
}

/// Build the request document for `operation_name`, with `USERID` on the root.
///
/// # Errors
///
/// Returns `XmlError` if writing fails or the output is not valid UTF-8.
pub fn build(operation_name: &str, user_id: &str, params: &Params) -> Result<String, XmlError> {
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer
        .create_element(operation_name)
        .with_attribute(("USERID", user_id))
        .write_inner_content(|w| params.write_xml(w))?;

    String::from_utf8(buf).map_err(|err| XmlError::Encoding(err.to_string()))
}
