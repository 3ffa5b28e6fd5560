//! MAX_REQUEST_ID flow-control messages.

use crate::{coding::Decode, Error};

/// MaxRequestId message (0x15), raising the peer's request-id ceiling.
///
/// The monotonicity rule lives in the session validator, which knows the
/// previous ceiling for the direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxRequestId {
	pub request_id: u64,
}

impl MaxRequestId {
	pub const ID: u64 = 0x15;

	pub fn decode_msg<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let request_id = u64::decode(buf)?;
		Ok(Self { request_id })
	}
}
