//! Request body construction.
//!
//! Multi-field JSON and XML bodies are collected into [`Fields`], an ordered
//! map that keeps the declaration order of the fields. Form bodies use
//! [`FormFields`]. Single bodies go through [`json`], [`xml`] or
//! [`read_stream`] directly.

use std::io::Read;

use reqwest::blocking::multipart::Part;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ClientError;

/// Root element name for multi-field XML bodies.
pub const XML_ROOT: &str = "body";

/// Ordered key/value fields of a JSON or XML request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Creates an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a text field.
    pub fn insert_text(&mut self, key: &str, text: impl Into<String>) {
        self.0.insert(key.to_string(), Value::String(text.into()));
    }

    /// Inserts a serialized value, keeping its native JSON type.
    pub fn insert_value<T>(&mut self, key: &str, value: &T) -> Result<(), ClientError>
    where
        T: Serialize + ?Sized,
    {
        self.0.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Reads a stream to its end and inserts its content as text.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn insert_stream<R: Read>(&mut self, key: &str, reader: R) -> Result<(), ClientError> {
        let bytes = read_stream(reader)?;
        self.insert_text(key, String::from_utf8_lossy(&bytes));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Marshals the fields as a JSON object.
    pub fn to_json(&self) -> Result<Vec<u8>, ClientError> {
        Ok(serde_json::to_vec(&self.0)?)
    }

    /// Marshals the fields as an XML document rooted at `<body>`.
    pub fn to_xml(&self) -> Result<Vec<u8>, ClientError> {
        let text = quick_xml::se::to_string_with_root(XML_ROOT, &self.0)?;
        Ok(text.into_bytes())
    }
}

/// Ordered `application/x-www-form-urlencoded` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair; repeated keys are kept.
    pub fn add(&mut self, key: &str, value: impl Into<String>) {
        self.0.push((key.to_string(), value.into()));
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Encodes the pairs in insertion order.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.encode().into_bytes()
    }
}

/// Reads a stream fully into memory.
pub fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>, ClientError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Reads a stream fully and wraps it as a multipart part.
pub fn stream_part<R: Read>(reader: R) -> Result<Part, ClientError> {
    Ok(Part::bytes(read_stream(reader)?))
}

/// Marshals a single value as the whole JSON body.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ClientError> {
    Ok(serde_json::to_vec(value)?)
}

/// Marshals a single value as the whole XML body.
///
/// The root element is named after the value's type.
pub fn xml<T: Serialize>(value: &T) -> Result<Vec<u8>, ClientError> {
    Ok(quick_xml::se::to_string(value)?.into_bytes())
}
