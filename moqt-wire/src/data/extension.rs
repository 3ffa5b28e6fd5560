//! Per-object extension headers.

use num_enum::{FromPrimitive, IntoPrimitive};

use crate::{
	coding::Decode,
	message::{decode_parameter_value, ParameterValue},
	Error,
};

#[derive(Debug, Copy, Clone, FromPrimitive, IntoPrimitive, Eq, PartialEq, Hash)]
#[repr(u64)]
pub enum ExtensionType {
	PriorGroupIdGap = 0x40,
	#[num_enum(catch_all)]
	Unknown(u64),
}

impl ExtensionType {
	pub fn name(&self) -> Option<&'static str> {
		match self {
			Self::PriorGroupIdGap => Some("PRIOR_GROUP_ID_GAP"),
			Self::Unknown(_) => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionHeader {
	pub kind: ExtensionType,
	pub value: ParameterValue,
}

/// Parse extension headers out of an already-bounded buffer, repeating
/// until it is exhausted. Values follow the shared type-code parity
/// convention.
pub fn decode_extension_headers<B: bytes::Buf>(buf: &mut B) -> Result<Vec<ExtensionHeader>, Error> {
	let mut headers = Vec::new();

	while buf.has_remaining() {
		let raw = u64::decode(buf)?;
		let value = decode_parameter_value(buf, raw, "extension header value")?;
		headers.push(ExtensionHeader {
			kind: ExtensionType::from(raw),
			value,
		});
	}

	Ok(headers)
}
