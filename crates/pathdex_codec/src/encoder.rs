//! Serde-driven document encoder.
//!
//! Any `Serialize` type is written as CBOR into a reusable buffer and read
//! back into a [`Value`]. The buffer is reused across calls and always
//! left empty when [`DocumentEncoder::encode`] returns.

use crate::error::{CodecError, CodecResult};
use crate::value::Value;
use ciborium::value::Value as Cbor;
use serde::Serialize;
use std::ops::{Deref, DerefMut};

/// Default initial capacity of the encode buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// How field names are written into documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldNaming {
    /// Keep field names exactly as serialized.
    #[default]
    Preserve,
    /// Lower-case the first character of every field name.
    CamelCase,
}

impl FieldNaming {
    /// Apply this policy to one field name.
    pub fn apply(self, name: String) -> String {
        match self {
            FieldNaming::Preserve => name,
            FieldNaming::CamelCase => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) if first.is_uppercase() => {
                        first.to_lowercase().chain(chars).collect()
                    }
                    _ => name,
                }
            }
        }
    }
}

/// Encode a single value with a throwaway encoder.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> CodecResult<Value> {
    DocumentEncoder::new().encode(value)
}

/// A reusable serde to [`Value`] encoder.
#[derive(Debug)]
pub struct DocumentEncoder {
    buffer: Vec<u8>,
    naming: FieldNaming,
}

impl DocumentEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    /// Create a new encoder with the specified buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            naming: FieldNaming::default(),
        }
    }

    /// Set the field naming policy.
    #[must_use]
    pub fn naming(mut self, naming: FieldNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Returns the field naming policy.
    pub fn field_naming(&self) -> FieldNaming {
        self.naming
    }

    /// Current buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Number of bytes currently held in the buffer.
    ///
    /// Always zero between calls.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Encode a value into its document form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value contains a map
    /// key that cannot be used as a field name.
    pub fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> CodecResult<Value> {
        let naming = self.naming;
        let mut buffer = ScopedBuffer::new(&mut self.buffer);

        ciborium::ser::into_writer(value, &mut *buffer)
            .map_err(|e| CodecError::encoding_failed(format!("{e:?}")))?;

        let raw: Cbor = ciborium::de::from_reader(buffer.as_slice())
            .map_err(|e| CodecError::decoding_failed(format!("{e:?}")))?;

        convert(raw, naming)
    }
}

impl Default for DocumentEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrow of the encode buffer that empties it on drop.
struct ScopedBuffer<'a> {
    buffer: &'a mut Vec<u8>,
}

impl<'a> ScopedBuffer<'a> {
    fn new(buffer: &'a mut Vec<u8>) -> Self {
        buffer.clear();
        Self { buffer }
    }
}

impl Deref for ScopedBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        self.buffer
    }
}

impl DerefMut for ScopedBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        self.buffer
    }
}

impl Drop for ScopedBuffer<'_> {
    fn drop(&mut self) {
        self.buffer.clear();
    }
}

fn convert(raw: Cbor, naming: FieldNaming) -> CodecResult<Value> {
    Ok(match raw {
        Cbor::Null => Value::Null,
        Cbor::Bool(b) => Value::Bool(b),
        Cbor::Integer(n) => {
            let wide = i128::from(n);
            match i64::try_from(wide) {
                Ok(n) => Value::Integer(n),
                // u64 beyond i64::MAX; the text form is identical
                Err(_) => Value::Text(wide.to_string()),
            }
        }
        Cbor::Float(f) => Value::Float(f),
        Cbor::Text(s) => Value::Text(s),
        Cbor::Bytes(b) => Value::Bytes(b),
        Cbor::Tag(_, inner) => convert(*inner, naming)?,
        Cbor::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| convert(item, naming))
                .collect::<CodecResult<_>>()?,
        ),
        Cbor::Map(pairs) => {
            let mut fields = Vec::with_capacity(pairs.len());
            for (key, value) in pairs {
                fields.push((naming.apply(field_name(key)?), convert(value, naming)?));
            }
            Value::Map(fields)
        }
        other => {
            return Err(CodecError::decoding_failed(format!(
                "unsupported CBOR item: {other:?}"
            )))
        }
    })
}

fn field_name(key: Cbor) -> CodecResult<String> {
    match key {
        Cbor::Text(s) => Ok(s),
        Cbor::Integer(n) => Ok(i128::from(n).to_string()),
        Cbor::Bool(b) => Ok(crate::render::render_bool(b).to_string()),
        Cbor::Tag(_, inner) => field_name(*inner),
        Cbor::Null => Err(CodecError::unsupported_key("null")),
        Cbor::Float(_) => Err(CodecError::unsupported_key("float")),
        Cbor::Bytes(_) => Err(CodecError::unsupported_key("bytes")),
        Cbor::Array(_) => Err(CodecError::unsupported_key("array")),
        Cbor::Map(_) => Err(CodecError::unsupported_key("map")),
        _ => Err(CodecError::unsupported_key("unknown")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Nested {
        label: String,
        weight: i32,
    }

    #[derive(Serialize)]
    #[allow(non_snake_case)]
    struct Record {
        Id: String,
        Score: f64,
        Active: bool,
        Tags: Vec<String>,
        Child: Option<Nested>,
        Children: Vec<Nested>,
    }

    fn record() -> Record {
        Record {
            Id: "r1".into(),
            Score: 2.5,
            Active: true,
            Tags: vec!["a".into(), "b".into()],
            Child: None,
            Children: vec![Nested {
                label: "x".into(),
                weight: 3,
            }],
        }
    }

    #[test]
    fn encodes_struct_fields_in_order() {
        let doc = to_document(&record()).unwrap();
        let fields: Vec<&str> = doc
            .as_map()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(
            fields,
            vec!["Id", "Score", "Active", "Tags", "Child", "Children"]
        );
        assert_eq!(doc.get("Score"), Some(&Value::Float(2.5)));
        assert_eq!(doc.get("Child"), Some(&Value::Null));
    }

    #[test]
    fn camel_case_naming() {
        let mut encoder = DocumentEncoder::new().naming(FieldNaming::CamelCase);
        let doc = encoder.encode(&record()).unwrap();

        assert_eq!(doc.get("id"), Some(&Value::Text("r1".into())));
        assert_eq!(doc.get("active"), Some(&Value::Bool(true)));
        let children = doc.get("children").unwrap().as_array().unwrap();
        assert_eq!(children[0].get("label"), Some(&Value::Text("x".into())));
    }

    #[test]
    fn naming_policy_leaves_lowercase_alone() {
        assert_eq!(FieldNaming::CamelCase.apply("already".into()), "already");
        assert_eq!(FieldNaming::CamelCase.apply("URL".into()), "uRL");
        assert_eq!(FieldNaming::CamelCase.apply(String::new()), "");
        assert_eq!(FieldNaming::Preserve.apply("Keep".into()), "Keep");
    }

    #[test]
    fn buffer_is_empty_between_calls() {
        let mut encoder = DocumentEncoder::with_capacity(16);
        encoder.encode(&record()).unwrap();
        assert_eq!(encoder.buffered(), 0);
        encoder.encode(&42u8).unwrap();
        assert_eq!(encoder.buffered(), 0);
    }

    #[test]
    fn integer_keys_become_field_names() {
        let mut map = BTreeMap::new();
        map.insert(7u32, "seven");
        let doc = to_document(&map).unwrap();
        assert_eq!(doc.get("7"), Some(&Value::Text("seven".into())));
    }

    #[test]
    fn large_unsigned_keeps_its_digits() {
        let doc = to_document(&u64::MAX).unwrap();
        assert_eq!(doc, Value::Text(u64::MAX.to_string()));
    }

    #[test]
    fn single_precision_fields_render_their_own_digits() {
        #[derive(Serialize)]
        struct Priced {
            price: f32,
            ratio: f64,
        }
        let doc = to_document(&Priced {
            price: 0.1,
            ratio: 0.1,
        })
        .unwrap();

        let price = crate::render_scalar(doc.get("price").unwrap());
        let ratio = crate::render_scalar(doc.get("ratio").unwrap());
        assert_eq!(price.as_deref(), Some("0.1"));
        assert_eq!(ratio.as_deref(), Some("0.1"));
    }

    #[test]
    fn unit_enum_variant_is_text() {
        #[derive(Serialize)]
        enum Color {
            Red,
        }
        assert_eq!(to_document(&Color::Red).unwrap(), Value::Text("Red".into()));
    }
}
