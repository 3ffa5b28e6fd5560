//! Wire-level value types shared by the control and data planes.

use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
	coding::{decode_tuple, read_u8, Decode},
	Error, ProtocolViolation,
};

/// A position within a track, ordered by group then object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
	pub group: u64,
	pub object: u64,
}

impl Decode for Location {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let group = u64::decode(buf)?;
		let object = u64::decode(buf)?;
		Ok(Self { group, object })
	}
}

/// Group delivery order requested by a subscriber or publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum GroupOrder {
	Default = 0x00,
	Ascending = 0x01,
	Descending = 0x02,
}

impl GroupOrder {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Default => "DEFAULT",
			Self::Ascending => "ASCENDING",
			Self::Descending => "DESCENDING",
		}
	}
}

impl Decode for GroupOrder {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let order = read_u8(buf, "group order")?;
		Self::try_from(order).map_err(|_| ProtocolViolation::InvalidGroupOrder(order).into())
	}
}

/// Subscription filter selecting which objects a subscription covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u64)]
pub enum FilterType {
	NextGroupStart = 0x01,
	LatestObject = 0x02,
	AbsoluteStart = 0x03,
	AbsoluteRange = 0x04,
}

impl FilterType {
	pub fn name(&self) -> &'static str {
		match self {
			Self::NextGroupStart => "NEXT_GROUP_START",
			Self::LatestObject => "LATEST_OBJECT",
			Self::AbsoluteStart => "ABSOLUTE_START",
			Self::AbsoluteRange => "ABSOLUTE_RANGE",
		}
	}
}

impl Decode for FilterType {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let filter = u64::decode(buf)?;
		Self::try_from(filter).map_err(|_| ProtocolViolation::InvalidFilterType(filter).into())
	}
}

/// Status carried in place of a payload when an object has no bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u64)]
pub enum ObjectStatus {
	Normal = 0x00,
	DoesNotExist = 0x01,
	EndOfGroup = 0x03,
	EndOfTrack = 0x04,
}

impl ObjectStatus {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Normal => "NORMAL",
			Self::DoesNotExist => "OBJECT_DOES_NOT_EXIST",
			Self::EndOfGroup => "END_OF_GROUP",
			Self::EndOfTrack => "END_OF_TRACK",
		}
	}
}

impl Decode for ObjectStatus {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let status = u64::decode(buf)?;
		Self::try_from(status).map_err(|_| ProtocolViolation::InvalidObjectStatus(status).into())
	}
}

/// An ordered tuple of opaque byte fields naming a track namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackNamespace {
	fields: Vec<Bytes>,
}

impl TrackNamespace {
	pub const MAX_FIELDS: usize = 32;

	pub fn new(fields: Vec<Bytes>) -> Result<Self, Error> {
		if fields.is_empty() || fields.len() > Self::MAX_FIELDS {
			return Err(ProtocolViolation::NamespaceFieldCount(fields.len()).into());
		}
		Ok(Self { fields })
	}

	pub fn fields(&self) -> &[Bytes] {
		&self.fields
	}

	/// Total bytes across all fields, for the full-track-name budget.
	pub fn total_len(&self) -> usize {
		self.fields.iter().map(|f| f.len()).sum()
	}
}

impl Decode for TrackNamespace {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		Self::new(decode_tuple(buf)?)
	}
}

/// A namespace plus track name, bounded to 4096 bytes combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTrackName {
	pub namespace: TrackNamespace,
	pub name: Bytes,
}

impl FullTrackName {
	pub const MAX_LEN: usize = 4096;

	pub fn new(namespace: TrackNamespace, name: Bytes) -> Result<Self, Error> {
		let total = namespace.total_len() + name.len();
		if total > Self::MAX_LEN {
			return Err(ProtocolViolation::TrackNameTooLong(total).into());
		}
		Ok(Self { namespace, name })
	}
}
