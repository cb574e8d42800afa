//! # pathdex Codec
//!
//! Structural document model for pathdex.
//!
//! The index never looks at Rust types directly. Every entity is first
//! reduced to a [`Value`]: a tree of maps (named fields), arrays and
//! scalars. This crate provides:
//!
//! - The [`Value`] type itself
//! - Scalar stringification ([`render_scalar`]) used as index leaf keys
//! - [`DocumentEncoder`], which turns any `serde::Serialize` type into a
//!   [`Value`] through a reusable CBOR buffer
//!
//! ## Usage
//!
//! ```
//! use pathdex_codec::{render_scalar, to_document, Value};
//!
//! #[derive(serde::Serialize)]
//! struct Point {
//!     x: i64,
//!     visible: bool,
//! }
//!
//! let doc = to_document(&Point { x: 3, visible: true }).unwrap();
//! assert_eq!(doc.get("x"), Some(&Value::Integer(3)));
//! assert_eq!(render_scalar(doc.get("visible").unwrap()).as_deref(), Some("True"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod encoder;
mod error;
mod render;
mod value;

pub use encoder::{to_document, DocumentEncoder, FieldNaming, DEFAULT_BUFFER_CAPACITY};
pub use error::{CodecError, CodecResult};
pub use render::{render_bool, render_float, render_scalar};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(serde::Serialize)]
    struct Sample {
        name: String,
        count: i64,
        flags: Vec<bool>,
    }

    #[test]
    fn reused_encoder_produces_documents() {
        let mut encoder = DocumentEncoder::new();
        encoder.encode(&1u8).unwrap();
        let doc = encoder
            .encode(&Sample {
                name: "n".into(),
                count: 2,
                flags: vec![true, false],
            })
            .unwrap();

        assert_eq!(doc.get("name"), Some(&Value::Text("n".into())));
        assert_eq!(
            doc.get("flags"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Bool(false)]))
        );
    }

    proptest! {
        #[test]
        fn integers_render_like_display(n in any::<i64>()) {
            let doc = to_document(&n).unwrap();
            prop_assert_eq!(render_scalar(&doc), Some(n.to_string()));
        }

        #[test]
        fn text_survives_encoding(s in ".{0,40}") {
            let doc = to_document(&s).unwrap();
            prop_assert_eq!(render_scalar(&doc), Some(s));
        }
    }
}
