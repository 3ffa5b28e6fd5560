//! ANNOUNCE messages.

use crate::{
	coding::Decode,
	message::{decode_version_parameters, VersionParameter},
	session::{Direction, SessionState},
	Error, TrackNamespace,
};

/// Announce message (0x06): a publisher advertising a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announce {
	pub request_id: u64,
	pub namespace: TrackNamespace,
	pub parameters: Vec<VersionParameter>,
}

impl Announce {
	pub const ID: u64 = 0x06;

	pub fn decode_msg<B: bytes::Buf>(buf: &mut B, session: &mut SessionState) -> Result<Self, Error> {
		let request_id = u64::decode(buf)?;
		session.check_request_id(request_id, Direction::Client)?;

		let namespace = TrackNamespace::decode(buf)?;
		let parameters = decode_version_parameters(buf, session.token_cache_mut())?;

		Ok(Self {
			request_id,
			namespace,
			parameters,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ProtocolViolation;

	#[test]
	fn announce() {
		let mut session = SessionState::new();
		#[rustfmt::skip]
		let payload = [
			0x00,                   // request id
			0x02,                   // two namespace fields
			0x04, b'd', b'e', b'm', b'o',
			0x02, b't', b'v',
			0x00,                   // no parameters
		];

		let msg = Announce::decode_msg(&mut &payload[..], &mut session).unwrap();
		assert_eq!(msg.namespace.fields().len(), 2);
		assert_eq!(msg.namespace.fields()[1].as_ref(), b"tv");
	}

	#[test]
	fn empty_namespace_rejected() {
		let mut session = SessionState::new();
		let payload = [0x00, 0x00, 0x00];

		let err = Announce::decode_msg(&mut &payload[..], &mut session).unwrap_err();
		assert_eq!(err, ProtocolViolation::NamespaceFieldCount(0).into());
	}
}
