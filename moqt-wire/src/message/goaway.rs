//! GOAWAY messages.

use crate::{
	coding::{read_bytes, Decode},
	Error, ProtocolViolation,
};

/// GoAway message (0x10), pointing the peer at a replacement session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoAway {
	/// None when the peer sent a zero-length URI.
	pub new_session_uri: Option<String>,
}

impl GoAway {
	pub const ID: u64 = 0x10;

	pub const MAX_URI_LEN: u64 = 8192;

	pub fn decode_msg<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let len = u64::decode(buf)?;
		if len > Self::MAX_URI_LEN {
			return Err(ProtocolViolation::UriTooLong(len).into());
		}

		let new_session_uri = match len {
			0 => None,
			len => {
				let uri = read_bytes(buf, len, "URI")?;
				Some(String::from_utf8_lossy(&uri).into_owned())
			}
		};

		Ok(Self { new_session_uri })
	}
}
