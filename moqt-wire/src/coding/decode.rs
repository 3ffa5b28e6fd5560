use crate::{Error, ValidationError};

/// Read a value from the front of the buffer, advancing the cursor.
///
/// Consumed bytes are whatever the cursor advanced past; a failed decode
/// may leave the cursor mid-field and the buffer should be discarded.
pub trait Decode: Sized {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error>;
}

impl Decode for u8 {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		match buf.has_remaining() {
			true => Ok(buf.get_u8()),
			false => Err(ValidationError::Short.into()),
		}
	}
}

impl Decode for u16 {
	/// Big-endian, not a varint.
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		match buf.remaining() >= 2 {
			true => Ok(buf.get_u16()),
			false => Err(ValidationError::Short.into()),
		}
	}
}

/// Read one byte, naming the field on failure.
pub fn read_u8<B: bytes::Buf>(buf: &mut B, what: &'static str) -> Result<u8, Error> {
	match buf.has_remaining() {
		true => Ok(buf.get_u8()),
		false => Err(ValidationError::Missing(what).into()),
	}
}

/// Read exactly `len` bytes, naming the field on failure.
pub fn read_bytes<B: bytes::Buf>(buf: &mut B, len: u64, what: &'static str) -> Result<bytes::Bytes, Error> {
	match (buf.remaining() as u64) >= len {
		true => Ok(buf.copy_to_bytes(len as usize)),
		false => Err(ValidationError::Missing(what).into()),
	}
}
