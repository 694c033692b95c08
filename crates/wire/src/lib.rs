//! Candidate line protocol
//!
//! The harness and a candidate store talk over the candidate's standard input
//! and output. This crate owns both directions of that contract:
//!
//! - [`request`]: command lines the harness writes
//! - [`response`]: the one line a candidate writes per `lookup`
//! - [`dump`]: the full-state map a candidate writes when its input closes
//!
//! Decoding failures on the harness side are reported as
//! `HarnessError::ProtocolViolation` with the offending text.

#![warn(missing_docs)]

pub mod dump;
mod number;
pub mod request;
pub mod response;

pub use dump::{encode_dump, parse_dump};
pub use request::{encode_request, parse_request, Request, RequestError};
pub use response::{encode_lookup_response, parse_lookup_response, MISSING_TOKEN};
