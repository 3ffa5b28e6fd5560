//! CLIENT_SETUP / SERVER_SETUP handshake messages.

use crate::{
	coding::Decode,
	message::{decode_setup_parameters, SetupParameter},
	Error,
};

/// ClientSetup message (0x20): the versions the client supports plus
/// setup parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSetup {
	pub versions: Vec<u64>,
	pub parameters: Vec<SetupParameter>,
}

impl ClientSetup {
	pub const ID: u64 = 0x20;

	pub fn decode_msg<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let count = u64::decode(buf)?;

		let mut versions = Vec::with_capacity(count.min(16) as usize);
		for _ in 0..count {
			versions.push(u64::decode(buf)?);
		}

		let parameters = decode_setup_parameters(buf)?;

		Ok(Self { versions, parameters })
	}
}

/// ServerSetup message (0x21): the version the server selected plus
/// setup parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSetup {
	pub version: u64,
	pub parameters: Vec<SetupParameter>,
}

impl ServerSetup {
	pub const ID: u64 = 0x21;

	pub fn decode_msg<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let version = u64::decode(buf)?;
		let parameters = decode_setup_parameters(buf)?;

		Ok(Self { version, parameters })
	}
}
