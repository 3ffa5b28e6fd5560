use bytes::Bytes;

use crate::Error;

use super::{read_bytes, Decode};

/// Read a tuple: a varint count followed by that many length-prefixed
/// byte fields. Empty fields are legal; bounds on the count are the
/// caller's concern.
pub fn decode_tuple<B: bytes::Buf>(buf: &mut B) -> Result<Vec<Bytes>, Error> {
	let count = u64::decode(buf)?;

	let mut fields = Vec::with_capacity(count.min(32) as usize);
	for _ in 0..count {
		let len = u64::decode(buf)?;
		fields.push(read_bytes(buf, len, "tuple field")?);
	}

	Ok(fields)
}
