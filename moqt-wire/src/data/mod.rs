//! Data-plane decoders: unidirectional streams and datagrams.

mod datagram;
mod extension;
mod fetch_stream;
mod subgroup;

pub use datagram::*;
pub use extension::*;
pub use fetch_stream::*;
pub use subgroup::*;

use crate::{coding::Decode, Error, ProtocolViolation};

/// A decoded unidirectional data stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataStream {
	Subgroup(SubgroupStream),
	Fetch(FetchStream),
}

impl DataStream {
	/// Decode an entire stream buffer, dispatching on the stream type.
	pub fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let stream_type = u64::decode(buf)?;

		if let Ok(header_type) = SubgroupHeaderType::try_from(stream_type) {
			return Ok(Self::Subgroup(SubgroupStream::decode(buf, header_type)?));
		}

		if stream_type == FetchStream::TYPE {
			return Ok(Self::Fetch(FetchStream::decode(buf)?));
		}

		Err(ProtocolViolation::UnknownStreamType(stream_type).into())
	}
}
