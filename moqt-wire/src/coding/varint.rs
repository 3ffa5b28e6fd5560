//! QUIC variable-length integers (RFC 9000 §16).
//!
//! The two most-significant bits of the first byte select the width
//! (00→1, 01→2, 10→4, 11→8); the remaining bits, big-endian, are the
//! value. Values are capped at 2^62 - 1.

use crate::{Error, ValidationError};

use super::Decode;

/// Largest value a varint can carry.
pub const VARINT_MAX: u64 = (1 << 62) - 1;

impl Decode for u64 {
	/// Decode a varint, consuming 1, 2, 4, or 8 bytes.
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		if !buf.has_remaining() {
			return Err(ValidationError::Short.into());
		}

		let first = buf.get_u8();
		let rest = (1usize << (first >> 6)) - 1;

		if buf.remaining() < rest {
			return Err(ValidationError::Short.into());
		}

		let mut value = (first & 0x3f) as u64;
		for _ in 0..rest {
			value = (value << 8) | buf.get_u8() as u64;
		}

		Ok(value)
	}
}

/// The number of bytes [encode_varint] uses for `value`.
pub const fn varint_len(value: u64) -> usize {
	if value < 0x40 {
		1
	} else if value < 0x4000 {
		2
	} else if value < 0x4000_0000 {
		4
	} else {
		8
	}
}

/// Encode a varint using the shortest width that fits.
pub fn encode_varint<W: bytes::BufMut>(w: &mut W, value: u64) -> Result<(), Error> {
	if value < 0x40 {
		w.put_u8(value as u8);
	} else if value < 0x4000 {
		w.put_u16(value as u16 | 0x4000);
	} else if value < 0x4000_0000 {
		w.put_u32(value as u32 | 0x8000_0000);
	} else if value <= VARINT_MAX {
		w.put_u64(value | 0xc000_0000_0000_0000);
	} else {
		return Err(ValidationError::ValueTooLarge.into());
	}

	Ok(())
}
