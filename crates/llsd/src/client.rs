//! Request helpers layered on a pluggable transport.
//!
//! [`LlsdClient`] encodes request values, hands the document to a
//! [`Transport`] and decodes the response body. The transport owns every
//! HTTP concern (connections, TLS, status handling); it only has to report
//! failures as [`TransportError`] so callers can tell them apart from codec
//! failures.

use thiserror::Error;

use crate::constants::{CONTENT_TYPE_FORM, CONTENT_TYPE_LLSD_XML};
use crate::encoder::{EncoderOptions, LlsdEncoder};
use crate::error::LlsdError;
use crate::value::Value;
use crate::LlsdDecoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub content_type: Option<&'static str>,
    pub body: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("remote returned HTTP status {0}")]
    Status(u16),
    #[error("connection failed: {0}")]
    Connection(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("codec error: {0}")]
    Codec(#[from] LlsdError),
}

/// Performs one request and returns the response body.
pub trait Transport {
    fn send(&self, request: &Request) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &Request) -> Result<String, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &Request) -> Result<String, TransportError> {
        (**self).send(request)
    }
}

pub struct LlsdClient<T> {
    transport: T,
    options: EncoderOptions,
}

impl<T: Transport> LlsdClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, EncoderOptions::default())
    }

    /// Request bodies are encoded with `options`.
    pub fn with_options(transport: T, options: EncoderOptions) -> Self {
        Self { transport, options }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GETs `url` and returns the undecoded body.
    pub fn get_raw(&self, url: &str) -> Result<String, TransportError> {
        self.send(Method::Get, url, None, None)
    }

    pub fn get(&self, url: &str) -> Result<Value, ClientError> {
        let body = self.get_raw(url)?;
        Ok(LlsdDecoder::new().decode(&body)?)
    }

    pub fn post(&self, url: &str, value: &Value) -> Result<Value, ClientError> {
        let doc = self.encode(value);
        self.exchange(Method::Post, url, Some(CONTENT_TYPE_LLSD_XML), Some(doc))
    }

    pub fn put(&self, url: &str, value: &Value) -> Result<Value, ClientError> {
        let doc = self.encode(value);
        self.exchange(Method::Put, url, Some(CONTENT_TYPE_LLSD_XML), Some(doc))
    }

    pub fn delete(&self, url: &str) -> Result<Value, ClientError> {
        self.exchange(Method::Delete, url, None, None)
    }

    /// POSTs an already encoded document.
    pub fn post_raw(&self, url: &str, xml: impl Into<String>) -> Result<Value, ClientError> {
        self.exchange(Method::Post, url, Some(CONTENT_TYPE_LLSD_XML), Some(xml.into()))
    }

    /// POSTs `pairs` as an `application/x-www-form-urlencoded` body.
    pub fn post_form<I, K, V>(&self, url: &str, pairs: I) -> Result<Value, ClientError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        self.exchange(Method::Post, url, Some(CONTENT_TYPE_FORM), Some(body))
    }

    fn encode(&self, value: &Value) -> String {
        LlsdEncoder::with_options(self.options).encode(value)
    }

    fn exchange(
        &self,
        method: Method,
        url: &str,
        content_type: Option<&'static str>,
        body: Option<String>,
    ) -> Result<Value, ClientError> {
        let response = self.send(method, url, content_type, body)?;
        Ok(LlsdDecoder::new().decode(&response)?)
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        content_type: Option<&'static str>,
        body: Option<String>,
    ) -> Result<String, TransportError> {
        let request = Request {
            method,
            url: url.to_owned(),
            content_type,
            body,
        };
        tracing::debug!(method = method.as_str(), url, "sending llsd request");
        let result = self.transport.send(&request);
        if let Err(err) = &result {
            tracing::debug!(method = method.as_str(), url, %err, "llsd request failed");
        }
        result
    }
}
