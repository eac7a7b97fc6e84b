//! Queue service support for quesign.
//!
//! This crate signs, sends and parses calls against the hosted message queue
//! API, covering both its wire protocols: signed-query requests for the
//! control operations and header-signed REST requests for the message path.
//!
//! ```no_run
//! use quesign_http_send_reqwest::ReqwestHttpSend;
//! use quesign_sqs::{Client, Config};
//!
//! fn main() -> quesign_core::Result<()> {
//!     let config = Config::default().from_env();
//!     let client = Client::new(config, ReqwestHttpSend::default())?;
//!
//!     let queue_url = client.create_queue("my_queue", None)?;
//!     client.send_message(&queue_url, "hello")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod client;
pub use client::{queue_name_by_url, Client, Grantee};

mod config;
pub use config::Config;

mod constants;
pub use constants::DEFAULT_ENDPOINT;

mod credential;
pub use credential::Credential;

mod parse;
pub use parse::{Grant, Message};

mod retry;
mod sign_request;
