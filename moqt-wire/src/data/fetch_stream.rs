//! Fetch data streams.

use bytes::Bytes;

use crate::{
	coding::{read_bytes, read_u8, Decode},
	data::{decode_extension_headers, ExtensionHeader},
	Error, ObjectStatus,
};

/// One object on a fetch stream. Unlike subgroup objects, each carries
/// its own location and priority, and extensions are always framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchObject {
	pub group_id: u64,
	pub subgroup_id: u64,
	pub object_id: u64,
	pub publisher_priority: u8,
	pub extensions: Vec<ExtensionHeader>,
	pub status: ObjectStatus,
	pub payload: Option<Bytes>,
}

impl FetchObject {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let group_id = u64::decode(buf)?;
		let subgroup_id = u64::decode(buf)?;
		let object_id = u64::decode(buf)?;
		let publisher_priority = read_u8(buf, "publisher priority")?;

		let ext_len = u64::decode(buf)?;
		let mut ext_data = read_bytes(buf, ext_len, "extension headers")?;
		let extensions = decode_extension_headers(&mut ext_data)?;

		let payload_len = u64::decode(buf)?;
		if payload_len == 0 {
			let status = ObjectStatus::decode(buf)?;
			return Ok(Self {
				group_id,
				subgroup_id,
				object_id,
				publisher_priority,
				extensions,
				status,
				payload: None,
			});
		}

		let payload = read_bytes(buf, payload_len, "object payload")?;
		Ok(Self {
			group_id,
			subgroup_id,
			object_id,
			publisher_priority,
			extensions,
			status: ObjectStatus::Normal,
			payload: Some(payload),
		})
	}
}

/// A decoded fetch stream: the request id, then objects until
/// end-of-stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStream {
	pub request_id: u64,
	pub objects: Vec<FetchObject>,
}

impl FetchStream {
	pub const TYPE: u64 = 0x05;

	pub fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let request_id = u64::decode(buf)?;

		let mut objects = Vec::new();
		while buf.has_remaining() {
			match FetchObject::decode(buf) {
				Ok(object) => objects.push(object),
				// Same end-of-stream policy as subgroup streams.
				Err(Error::Validation(_)) if !objects.is_empty() => break,
				Err(err) => return Err(err),
			}
		}

		Ok(Self { request_id, objects })
	}
}
