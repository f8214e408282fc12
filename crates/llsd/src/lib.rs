//! LLSD XML codec.
//!
//! Converts between the dynamic [`Value`] tree and the LLSD XML wire form:
//!
//! ```text
//! <llsd>
//!   <map>
//!     <key>name</key><string>value</string>
//!   </map>
//! </llsd>
//! ```
//!
//! Encoding is total over [`Value`]; only native values passed through
//! [`to_value`]/[`to_xml`] can fail, with [`LlsdError::UnsupportedType`].
//! Decoding fails only on broken markup ([`LlsdError::MalformedDocument`]);
//! everything else degrades to a default value.
//!
//! ```
//! use llsd::{decode, encode, Value};
//!
//! let value: Value = [("foo", "bar")].into_iter().collect();
//! let xml = encode(&value);
//! assert_eq!(xml, "<llsd><map><key>foo</key><string>bar</string></map></llsd>");
//! assert_eq!(decode(&xml).unwrap(), value);
//! ```

mod constants;
mod decoder;
mod dom;
mod encoder;
mod error;
mod json;
mod ser;
mod text;
mod value;

pub mod client;

pub use constants::*;
pub use decoder::LlsdDecoder;
pub use dom::{Element, Node};
pub use encoder::{EncoderOptions, LlsdEncoder};
pub use error::LlsdError;
pub use json::{from_json, to_json};
pub use ser::{to_value, ValueSerializer};
pub use value::{Map, Value};

/// Encodes `value` as a compact document without XML prolog.
pub fn encode(value: &Value) -> String {
    LlsdEncoder::new().encode(value)
}

/// Encodes `value` with explicit declaration and indentation settings.
pub fn encode_with(value: &Value, options: EncoderOptions) -> String {
    LlsdEncoder::with_options(options).encode(value)
}

/// Decodes a document. Returns an empty map when there is no `llsd`
/// envelope.
pub fn decode(xml: &str) -> Result<Value, LlsdError> {
    LlsdDecoder::new().decode(xml)
}

/// Serializes a native value straight to a document. On error nothing is
/// written.
pub fn to_xml<T: ?Sized + serde::Serialize>(value: &T) -> Result<String, LlsdError> {
    Ok(encode(&to_value(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_nested() {
        let inner: Value = [("goo", "poo")].into_iter().collect();
        let value: Value = [("foo", Value::from("bar")), ("doo", inner)]
            .into_iter()
            .collect();
        let xml = encode(&value);
        assert_eq!(
            xml,
            "<llsd><map><key>foo</key><string>bar</string>\
             <key>doo</key><map><key>goo</key><string>poo</string></map></map></llsd>"
        );
        assert_eq!(decode(&xml).unwrap(), value);
    }

    #[test]
    fn pretty_output_decodes_to_same_value() {
        let value = Value::Array(vec![
            Value::from("foo"),
            Value::Array(vec![Value::from(""), Value::Integer(3)]),
        ]);
        let xml = encode_with(
            &value,
            EncoderOptions {
                xml_declaration: true,
                indent: Some(4),
            },
        );
        assert!(xml.starts_with(XML_DECLARATION));
        assert_eq!(decode(&xml).unwrap(), value);
    }

    #[test]
    fn to_xml_rejects_out_of_range_integers() {
        assert_eq!(
            to_xml(&vec![1u64, u64::MAX]),
            Err(LlsdError::UnsupportedType(format!("u64 value {}", u64::MAX)))
        );
        assert_eq!(
            to_xml(&vec![1u64]).unwrap(),
            "<llsd><array><integer>1</integer></array></llsd>"
        );
    }
}
