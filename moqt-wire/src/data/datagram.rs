//! Object datagrams.

use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
	coding::{read_bytes, read_u8, Decode},
	data::{decode_extension_headers, ExtensionHeader},
	Error, ObjectStatus, ProtocolViolation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u64)]
pub enum DatagramType {
	ObjectNoExt = 0x00,
	ObjectWithExt = 0x01,
	StatusNoExt = 0x02,
	StatusWithExt = 0x03,
}

impl DatagramType {
	pub fn name(&self) -> &'static str {
		match self {
			Self::ObjectNoExt => "OBJECT_DATAGRAM_NO_EXT",
			Self::ObjectWithExt => "OBJECT_DATAGRAM_WITH_EXT",
			Self::StatusNoExt => "OBJECT_STATUS_NO_EXT",
			Self::StatusWithExt => "OBJECT_STATUS_WITH_EXT",
		}
	}

	pub fn has_extensions(&self) -> bool {
		matches!(self, Self::ObjectWithExt | Self::StatusWithExt)
	}

	/// Status datagrams carry a status varint instead of payload bytes.
	pub fn is_status(&self) -> bool {
		matches!(self, Self::StatusNoExt | Self::StatusWithExt)
	}
}

/// A decoded datagram: one object or one object status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
	pub kind: DatagramType,
	pub track_alias: u64,
	pub group_id: u64,
	pub object_id: u64,
	pub publisher_priority: u8,
	pub extensions: Vec<ExtensionHeader>,
	pub status: ObjectStatus,
	/// The remaining bytes of the datagram, for the object flavors.
	pub payload: Option<Bytes>,
}

impl Datagram {
	pub fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let raw = u64::decode(buf)?;
		let kind = DatagramType::try_from(raw).map_err(|_| ProtocolViolation::UnknownDatagramType(raw))?;

		let track_alias = u64::decode(buf)?;
		let group_id = u64::decode(buf)?;
		let object_id = u64::decode(buf)?;
		let publisher_priority = read_u8(buf, "publisher priority")?;

		let extensions = match kind.has_extensions() {
			true => {
				let len = u64::decode(buf)?;
				// A with-extensions type promising zero of them is nonsense.
				if len == 0 {
					return Err(ProtocolViolation::EmptyExtensions.into());
				}
				let mut data = read_bytes(buf, len, "extension headers")?;
				decode_extension_headers(&mut data)?
			}
			false => Vec::new(),
		};

		let (status, payload) = match kind.is_status() {
			true => (ObjectStatus::decode(buf)?, None),
			false => (ObjectStatus::Normal, Some(buf.copy_to_bytes(buf.remaining()))),
		};

		Ok(Self {
			kind,
			track_alias,
			group_id,
			object_id,
			publisher_priority,
			extensions,
			status,
			payload,
		})
	}
}
