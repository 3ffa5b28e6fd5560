//! # moqt-wire: MoQT wire-format decoding and validation
//!
//! A sans-IO decoder for the Media over QUIC Transport control and data
//! planes. Given an opaque byte buffer and a channel classification, it
//! parses the buffer against the MoQT v1 grammar, enforces the
//! structural and semantic invariants, and returns either a typed
//! decoded message or an [Error] naming the violated rule.
//!
//! The crate never transports bytes and never encodes messages; it is
//! the validation core a CLI, network loop, or test harness drives
//! through three entry points on [SessionState]:
//!
//! - [SessionState::validate_control] for one framed control message
//! - [SessionState::validate_stream] for a unidirectional data stream
//! - [SessionState::validate_datagram] for a single datagram
//!
//! Cross-message invariants (request-id directionality and ceilings,
//! track-alias uniqueness, the auth-token cache budget, version
//! agreement) live on the session; everything decoded is returned by
//! value and projects to a [Record] for rendering.

mod error;
mod record;
mod session;
mod types;

pub mod coding;
pub mod data;
pub mod message;

pub use error::*;
pub use record::*;
pub use session::*;
pub use types::*;
