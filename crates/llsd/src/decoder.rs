//! LLSD XML decoder.
//!
//! Decoding is permissive: once the markup is well-formed, every document
//! yields a [`Value`]. Empty scalar elements take their zero value, unknown
//! element names degrade to strings, and a missing envelope yields an empty
//! map.

use crate::constants::*;
use crate::dom::{self, Element, Node};
use crate::error::LlsdError;
use crate::text;
use crate::value::{Map, Value};

/// LLSD XML decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct LlsdDecoder;

impl LlsdDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes a document. Only broken markup is an error.
    pub fn decode(&self, xml: &str) -> Result<Value, LlsdError> {
        tracing::trace!(len = xml.len(), "decoding llsd document");
        let nodes = dom::parse(xml)?;
        let envelope = nodes.iter().find_map(|node| match node {
            Node::Element(el) if el.name == LLSD_ELEMENT => Some(el),
            _ => None,
        });
        let Some(envelope) = envelope else {
            tracing::debug!("no <llsd> envelope, decoding as empty map");
            return Ok(Value::Map(Map::new()));
        };
        Ok(self.read_root(envelope))
    }

    /// Decodes a UTF-8 encoded document.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Value, LlsdError> {
        let xml = std::str::from_utf8(bytes)
            .map_err(|err| LlsdError::malformed(err.valid_up_to() as u64, err.to_string()))?;
        self.decode(xml)
    }

    /// Interprets the first element inside the envelope. Further siblings are
    /// ignored.
    fn read_root(&self, envelope: &Element) -> Value {
        match envelope.elements().next() {
            Some(first) => self.read_any(first),
            None => {
                tracing::debug!("empty <llsd> envelope, decoding as empty map");
                Value::Map(Map::new())
            }
        }
    }

    /// Dispatches on the element name.
    pub fn read_any(&self, el: &Element) -> Value {
        match el.name.as_str() {
            MAP_ELEMENT => Value::Map(self.read_map(el)),
            ARRAY_ELEMENT => Value::Array(self.read_arr(el)),
            UNDEF_ELEMENT => Value::Undefined,
            BOOLEAN_ELEMENT => {
                Value::Boolean(text::parse_boolean(el.text().as_deref().unwrap_or("")))
            }
            INTEGER_ELEMENT => Value::Integer(el.text().map_or(0, |t| text::parse_integer(&t))),
            REAL_ELEMENT => Value::Real(el.text().map_or(0.0, |t| text::parse_real(&t))),
            STRING_ELEMENT => Value::String(el.text().unwrap_or_default()),
            UUID_ELEMENT => match non_empty(el.text()) {
                Some(t) => Value::Uuid(t),
                None => Value::nil_uuid(),
            },
            DATE_ELEMENT => match non_empty(el.text()) {
                Some(t) => Value::Date(text::parse_date(&t)),
                None => Value::epoch(),
            },
            URI_ELEMENT => Value::Uri(non_empty(el.text())),
            BINARY_ELEMENT => Value::Binary(
                el.text().map_or_else(Vec::new, |t| text::parse_binary(&t)),
            ),
            other => {
                tracing::debug!(element = other, "unknown element, decoding text as string");
                Value::String(el.text().unwrap_or_default())
            }
        }
    }

    /// Reads alternating `key` / value children. A value replaces any earlier
    /// entry with the same key.
    pub fn read_map(&self, el: &Element) -> Map {
        let mut map = Map::new();
        let mut pending: Option<String> = None;
        for child in el.elements() {
            if child.name == KEY_ELEMENT {
                if let Some(dropped) = pending.replace(child.text().unwrap_or_default()) {
                    tracing::debug!(key = %dropped, "map key without value, dropping");
                }
                continue;
            }
            match pending.take() {
                Some(key) => {
                    let value = self.read_any(child);
                    map.insert(key, value);
                }
                None => {
                    tracing::debug!(element = %child.name, "map value without key, dropping");
                }
            }
        }
        if let Some(dropped) = pending {
            tracing::debug!(key = %dropped, "map key without value, dropping");
        }
        map
    }

    pub fn read_arr(&self, el: &Element) -> Vec<Value> {
        el.elements().map(|child| self.read_any(child)).collect()
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(xml: &str) -> Value {
        LlsdDecoder::new().decode(xml).unwrap()
    }

    #[test]
    fn first_element_in_envelope_wins() {
        assert_eq!(
            decode("<llsd>text<integer>1</integer><integer>2</integer></llsd>"),
            Value::Integer(1)
        );
    }

    #[test]
    fn missing_or_empty_envelope_is_empty_map() {
        assert_eq!(decode("<other><integer>1</integer></other>"), Value::Map(Map::new()));
        assert_eq!(decode("<llsd/>"), Value::Map(Map::new()));
        assert_eq!(decode("<llsd>  </llsd>"), Value::Map(Map::new()));
        assert_eq!(decode(""), Value::Map(Map::new()));
    }

    #[test]
    fn envelope_found_after_other_top_level_nodes() {
        assert_eq!(decode("junk<x/><llsd><boolean>true</boolean></llsd>"), Value::Boolean(true));
    }

    #[test]
    fn dangling_and_orphan_map_children_are_dropped() {
        let v = decode(
            "<llsd><map><string>orphan</string><key>a</key><key>b</key>\
             <integer>2</integer><key>c</key></map></llsd>",
        );
        let expected: Value = [("b", 2)].into_iter().collect();
        assert_eq!(v, expected);
    }

    #[test]
    fn empty_key_element_is_empty_key() {
        let v = decode("<llsd><map><key/><integer>1</integer></map></llsd>");
        assert_eq!(v.get(""), Some(&Value::Integer(1)));
    }

    #[test]
    fn uri_empty_text_is_absent() {
        assert_eq!(decode("<llsd><uri></uri></llsd>"), Value::Uri(None));
        assert_eq!(decode("<llsd><uri>x</uri></llsd>"), Value::Uri(Some("x".into())));
    }

    #[test]
    fn rejects_invalid_utf8_bytes() {
        let err = LlsdDecoder::new().decode_bytes(b"<llsd>\xff</llsd>").unwrap_err();
        assert!(matches!(err, LlsdError::MalformedDocument { position: 6, .. }));
    }
}
