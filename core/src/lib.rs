//! Core components for talking to hosted queue services.
//!
//! This crate provides the foundational types for the quesign ecosystem.
//! Service crates build on it; it knows nothing about any concrete service.
//!
//! ## Overview
//!
//! The crate is built around a few key pieces:
//!
//! - [`SignedRequest`]: a ready-to-send, replayable request descriptor
//! - [`HttpSend`]: the boundary trait for the HTTP transport collaborator
//! - [`XmlConsumer`]: the streaming XML response-parsing contract
//! - [`Error`]: the structured error type shared by every crate in the family
//!
//! A service crate canonicalizes and signs an operation into a
//! [`SignedRequest`], hands it to an [`HttpSend`] implementation, and feeds
//! the response body through an [`XmlConsumer`] with [`parse_xml`]. Failed
//! responses are interpreted into a [`ServiceFault`] so callers can decide
//! whether the fault is transient.
//!
//! ## Utilities
//!
//! - [`hash`]: base64 and HMAC-SHA1 helpers
//! - [`time`]: timestamp formatting for the wire protocols
//! - [`utils`]: general utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, ErrorRecord, Result, ServiceFault};
mod http;
pub use http::{HttpSend, NoopHttpSend};
mod request;
pub use request::SignedRequest;
mod xml;
pub use xml::{parse_xml, XmlConsumer};
