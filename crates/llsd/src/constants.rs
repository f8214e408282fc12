//! Wire grammar constants for LLSD XML.

/// Envelope element wrapping every document.
pub const LLSD_ELEMENT: &str = "llsd";

pub const MAP_ELEMENT: &str = "map";
pub const ARRAY_ELEMENT: &str = "array";
pub const KEY_ELEMENT: &str = "key";

pub const UNDEF_ELEMENT: &str = "undef";
pub const BOOLEAN_ELEMENT: &str = "boolean";
pub const INTEGER_ELEMENT: &str = "integer";
pub const REAL_ELEMENT: &str = "real";
pub const STRING_ELEMENT: &str = "string";
pub const UUID_ELEMENT: &str = "uuid";
pub const DATE_ELEMENT: &str = "date";
pub const URI_ELEMENT: &str = "uri";
pub const BINARY_ELEMENT: &str = "binary";

/// Boolean token that decodes to `false`. Every other non-empty text is `true`.
pub const FALSE_TOKEN: &str = "false";
pub const TRUE_TOKEN: &str = "true";

/// Decode default for an empty `<uuid/>`.
pub const NIL_UUID: &str = "00000000-0000-0000-0000-000000000000";

/// Decode default for an empty `<date/>`, as rendered on the wire.
pub const EPOCH_DATE: &str = "1970-01-01T00:00:00Z";

/// Optional prolog emitted when [`crate::EncoderOptions::xml_declaration`] is set.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Content type for LLSD XML request bodies.
pub const CONTENT_TYPE_LLSD_XML: &str = "application/llsd+xml";

/// Content type for url-encoded form bodies.
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Deepest element nesting the decoder accepts, counting the `llsd`
/// envelope as level 1.
pub const MAX_DEPTH: usize = 256;
