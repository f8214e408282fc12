//! LLSD XML encoder.

use quick_xml::escape::escape;

use crate::constants::*;
use crate::text;
use crate::value::{Map, Value};

/// Encoder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Prepend `<?xml version="1.0" encoding="UTF-8"?>`.
    pub xml_declaration: bool,
    /// Put every element on its own line, indented by this many spaces per
    /// nesting level. `None` writes the compact form.
    pub indent: Option<usize>,
}

/// LLSD XML encoder.
///
/// Builds each document in an internal buffer and hands it over on return.
/// Encoding a [`Value`] cannot fail: every variant has a wire form.
pub struct LlsdEncoder {
    options: EncoderOptions,
    out: String,
    depth: usize,
}

impl Default for LlsdEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LlsdEncoder {
    pub fn new() -> Self {
        Self::with_options(EncoderOptions::default())
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        Self {
            options,
            out: String::new(),
            depth: 0,
        }
    }

    pub fn options(&self) -> EncoderOptions {
        self.options
    }

    /// Encodes `value` as a complete document inside the `llsd` envelope.
    pub fn encode(&mut self, value: &Value) -> String {
        tracing::trace!(kind = value.element_name(), "encoding llsd document");
        self.out.clear();
        self.depth = 0;
        if self.options.xml_declaration {
            self.out.push_str(XML_DECLARATION);
            if self.options.indent.is_some() {
                self.out.push('\n');
            }
        }
        self.out.push('<');
        self.out.push_str(LLSD_ELEMENT);
        self.out.push('>');
        self.depth = 1;
        self.break_line();
        self.write_any(value);
        self.depth = 0;
        self.break_line();
        self.write_close(LLSD_ELEMENT);
        std::mem::take(&mut self.out)
    }

    /// Appends the element for `value` to the buffer.
    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Undefined => self.write_empty(UNDEF_ELEMENT),
            Value::Boolean(b) => self.write_text(BOOLEAN_ELEMENT, text::render_boolean(*b)),
            Value::Integer(i) => self.write_text(INTEGER_ELEMENT, &i.to_string()),
            Value::Real(f) => self.write_text(REAL_ELEMENT, &text::render_real(*f)),
            Value::String(s) => self.write_text(STRING_ELEMENT, s),
            Value::Uuid(s) => self.write_text(UUID_ELEMENT, s),
            Value::Date(d) => self.write_text(DATE_ELEMENT, &text::render_date(d)),
            Value::Uri(Some(s)) => self.write_text(URI_ELEMENT, s),
            Value::Uri(None) => self.write_empty(URI_ELEMENT),
            Value::Binary(b) => self.write_text(BINARY_ELEMENT, &text::render_binary(b)),
            Value::Array(items) => self.write_arr(items),
            Value::Map(map) => self.write_map(map),
        }
    }

    pub fn write_arr(&mut self, items: &[Value]) {
        if items.is_empty() {
            self.write_empty(ARRAY_ELEMENT);
            return;
        }
        self.write_open(ARRAY_ELEMENT);
        self.depth += 1;
        for item in items {
            self.break_line();
            self.write_any(item);
        }
        self.depth -= 1;
        self.break_line();
        self.write_close(ARRAY_ELEMENT);
    }

    pub fn write_map(&mut self, map: &Map) {
        if map.is_empty() {
            self.write_empty(MAP_ELEMENT);
            return;
        }
        self.write_open(MAP_ELEMENT);
        self.depth += 1;
        for (key, value) in map {
            self.break_line();
            self.write_text(KEY_ELEMENT, key);
            self.break_line();
            self.write_any(value);
        }
        self.depth -= 1;
        self.break_line();
        self.write_close(MAP_ELEMENT);
    }

    /// Writes `<name>text</name>`, or `<name/>` when `text` is empty.
    fn write_text(&mut self, name: &str, text: &str) {
        if text.is_empty() {
            self.write_empty(name);
            return;
        }
        self.write_open(name);
        self.out.push_str(&escape(text));
        self.write_close(name);
    }

    fn write_empty(&mut self, name: &str) {
        self.out.push('<');
        self.out.push_str(name);
        self.out.push_str("/>");
    }

    fn write_open(&mut self, name: &str) {
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
    }

    fn write_close(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    fn break_line(&mut self) {
        if let Some(width) = self.options.indent {
            self.out.push('\n');
            self.out.extend(std::iter::repeat(' ').take(width * self.depth));
        }
    }
}
