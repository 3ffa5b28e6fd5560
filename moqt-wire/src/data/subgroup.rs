//! Subgroup data streams.
//!
//! The stream type selects one of six header layouts: whether the
//! subgroup id is encoded, implied zero, or taken from the first
//! object's id, and whether objects carry extension headers.

use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
	coding::{read_bytes, read_u8, Decode},
	data::{decode_extension_headers, ExtensionHeader},
	Error, ObjectStatus, ProtocolViolation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u64)]
pub enum SubgroupHeaderType {
	ZeroId = 0x08,
	ZeroIdExt = 0x09,
	FirstObjectId = 0x0a,
	FirstObjectIdExt = 0x0b,
	ExplicitId = 0x0c,
	ExplicitIdExt = 0x0d,
}

impl SubgroupHeaderType {
	/// Whether the header carries an encoded subgroup-id field.
	pub fn has_explicit_subgroup_id(&self) -> bool {
		matches!(self, Self::ExplicitId | Self::ExplicitIdExt)
	}

	/// Whether the subgroup id is the first object's id.
	pub fn subgroup_id_from_first_object(&self) -> bool {
		matches!(self, Self::FirstObjectId | Self::FirstObjectIdExt)
	}

	/// Whether objects on this stream carry extension headers.
	pub fn has_extensions(&self) -> bool {
		u64::from(*self) % 2 == 1
	}
}

/// One object on a subgroup stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgroupObject {
	pub object_id: u64,
	pub extensions: Vec<ExtensionHeader>,
	pub status: ObjectStatus,
	/// None when the object carried a status instead of bytes.
	pub payload: Option<Bytes>,
}

impl SubgroupObject {
	fn decode<B: bytes::Buf>(buf: &mut B, extensions_present: bool) -> Result<Self, Error> {
		let object_id = u64::decode(buf)?;

		let extensions = match extensions_present {
			true => {
				let len = u64::decode(buf)?;
				let mut data = read_bytes(buf, len, "extension headers")?;
				decode_extension_headers(&mut data)?
			}
			false => Vec::new(),
		};

		let payload_len = u64::decode(buf)?;
		if payload_len == 0 {
			let status = ObjectStatus::decode(buf)?;
			return Ok(Self {
				object_id,
				extensions,
				status,
				payload: None,
			});
		}

		let payload = read_bytes(buf, payload_len, "object payload")?;
		Ok(Self {
			object_id,
			extensions,
			status: ObjectStatus::Normal,
			payload: Some(payload),
		})
	}
}

/// A decoded subgroup stream: one header, then objects until
/// end-of-stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgroupStream {
	pub header_type: SubgroupHeaderType,
	pub track_alias: u64,
	pub group_id: u64,
	/// Only present for the explicit-id header layouts.
	pub explicit_subgroup_id: Option<u64>,
	pub publisher_priority: u8,
	pub objects: Vec<SubgroupObject>,
}

impl SubgroupStream {
	/// The effective subgroup id after resolving the header layout.
	/// None for a first-object layout with no objects.
	pub fn subgroup_id(&self) -> Option<u64> {
		if self.header_type.has_explicit_subgroup_id() {
			return self.explicit_subgroup_id;
		}
		if self.header_type.subgroup_id_from_first_object() {
			return self.objects.first().map(|o| o.object_id);
		}
		Some(0)
	}

	pub fn decode<B: bytes::Buf>(buf: &mut B, header_type: SubgroupHeaderType) -> Result<Self, Error> {
		let track_alias = u64::decode(buf)?;
		let group_id = u64::decode(buf)?;

		let explicit_subgroup_id = match header_type.has_explicit_subgroup_id() {
			true => Some(u64::decode(buf)?),
			false => None,
		};

		let publisher_priority = read_u8(buf, "publisher priority")?;

		let extensions_present = header_type.has_extensions();
		let mut objects: Vec<SubgroupObject> = Vec::new();

		while buf.has_remaining() {
			let object = match SubgroupObject::decode(buf, extensions_present) {
				Ok(object) => object,
				// A truncated tail after a complete object is a clean
				// end-of-stream; anything decodable-but-invalid is not.
				Err(Error::Validation(_)) if !objects.is_empty() => break,
				Err(err) => return Err(err),
			};

			if let Some(last) = objects.last() {
				if object.object_id <= last.object_id {
					return Err(ProtocolViolation::ObjectIdNotAscending {
						prev: last.object_id,
						next: object.object_id,
					}
					.into());
				}
			}

			objects.push(object);
		}

		Ok(Self {
			header_type,
			track_alias,
			group_id,
			explicit_subgroup_id,
			publisher_priority,
			objects,
		})
	}
}
