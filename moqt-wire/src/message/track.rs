//! TRACK_STATUS_REQUEST messages.

use crate::{
	coding::{read_bytes, Decode},
	message::{decode_version_parameters, VersionParameter},
	session::{Direction, SessionState},
	Error, FullTrackName, TrackNamespace,
};

/// TrackStatusRequest message (0x0d), probing a track's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackStatusRequest {
	pub request_id: u64,
	pub full_track_name: FullTrackName,
	pub parameters: Vec<VersionParameter>,
}

impl TrackStatusRequest {
	pub const ID: u64 = 0x0d;

	pub fn decode_msg<B: bytes::Buf>(buf: &mut B, session: &mut SessionState) -> Result<Self, Error> {
		let request_id = u64::decode(buf)?;
		session.check_request_id(request_id, Direction::Client)?;

		let namespace = TrackNamespace::decode(buf)?;
		let name_len = u64::decode(buf)?;
		let name = read_bytes(buf, name_len, "track name")?;
		let full_track_name = FullTrackName::new(namespace, name)?;

		let parameters = decode_version_parameters(buf, session.token_cache_mut())?;

		Ok(Self {
			request_id,
			full_track_name,
			parameters,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn track_status_request() {
		let mut session = SessionState::new();
		#[rustfmt::skip]
		let payload = [
			0x06,             // request id
			0x01, 0x02, b'n', b's',
			0x01, b'v',       // track name
			0x00,             // no parameters
		];

		let msg = TrackStatusRequest::decode_msg(&mut &payload[..], &mut session).unwrap();
		assert_eq!(msg.request_id, 6);
		assert_eq!(msg.full_track_name.name.as_ref(), b"v");
	}
}
