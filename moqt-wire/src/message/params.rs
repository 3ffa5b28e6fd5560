//! Key/value parameter lists.
//!
//! All parameter contexts share one parity convention: an even type code
//! carries a varint value, an odd type code carries length-prefixed
//! bytes. Unknown codes are preserved verbatim so forward-compatible
//! peers keep working; only the known-name tables differ per context.

use bytes::Bytes;
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::{
	coding::{read_bytes, Decode},
	message::{AuthToken, TokenCache},
	Error, ProtocolViolation,
};

/// Largest length-prefixed parameter value accepted.
pub const MAX_PARAMETER_LENGTH: u64 = 65535;

/// A parameter value, dispatched on type-code parity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
	VarInt(u64),
	Bytes(Bytes),
}

/// Decode a parameter value for the given raw type code.
///
/// `what` names the field in truncation errors, since this helper also
/// serves the extension-header context.
pub(crate) fn decode_parameter_value<B: bytes::Buf>(
	buf: &mut B,
	kind: u64,
	what: &'static str,
) -> Result<ParameterValue, Error> {
	if kind % 2 == 0 {
		return Ok(ParameterValue::VarInt(u64::decode(buf)?));
	}

	let len = u64::decode(buf)?;
	if len > MAX_PARAMETER_LENGTH {
		return Err(ProtocolViolation::ParameterTooLarge(len).into());
	}

	Ok(ParameterValue::Bytes(read_bytes(buf, len, what)?))
}

/// Parameters negotiated in CLIENT_SETUP / SERVER_SETUP.
#[derive(Debug, Copy, Clone, FromPrimitive, IntoPrimitive, Eq, PartialEq, Hash)]
#[repr(u64)]
pub enum SetupParameterType {
	Path = 0x01,
	MaxRequestId = 0x02,
	MaxAuthTokenCacheSize = 0x04,
	#[num_enum(catch_all)]
	Unknown(u64),
}

impl SetupParameterType {
	pub fn name(&self) -> Option<&'static str> {
		match self {
			Self::Path => Some("PATH"),
			Self::MaxRequestId => Some("MAX_REQUEST_ID"),
			Self::MaxAuthTokenCacheSize => Some("MAX_AUTH_TOKEN_CACHE_SIZE"),
			Self::Unknown(_) => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupParameter {
	pub kind: SetupParameterType,
	pub value: ParameterValue,
}

/// Parameters attached to individual control messages.
#[derive(Debug, Copy, Clone, FromPrimitive, IntoPrimitive, Eq, PartialEq, Hash)]
#[repr(u64)]
pub enum VersionParameterType {
	AuthorizationToken = 0x01,
	DeliveryTimeout = 0x02,
	MaxCacheDuration = 0x04,
	#[num_enum(catch_all)]
	Unknown(u64),
}

impl VersionParameterType {
	pub fn name(&self) -> Option<&'static str> {
		match self {
			Self::AuthorizationToken => Some("AUTHORIZATION_TOKEN"),
			Self::DeliveryTimeout => Some("DELIVERY_TIMEOUT"),
			Self::MaxCacheDuration => Some("MAX_CACHE_DURATION"),
			Self::Unknown(_) => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParameter {
	pub kind: VersionParameterType,
	pub value: ParameterValue,
	/// Present when the parameter is an AUTHORIZATION_TOKEN; its cache
	/// operation has already been applied by the time decoding returns.
	pub token: Option<AuthToken>,
}

/// Decode the setup-parameter list: varint count, then entries.
pub fn decode_setup_parameters<B: bytes::Buf>(buf: &mut B) -> Result<Vec<SetupParameter>, Error> {
	let count = u64::decode(buf)?;

	let mut params = Vec::with_capacity(count.min(64) as usize);
	for _ in 0..count {
		let raw = u64::decode(buf)?;
		let value = decode_parameter_value(buf, raw, "parameter value")?;
		params.push(SetupParameter {
			kind: SetupParameterType::from(raw),
			value,
		});
	}

	Ok(params)
}

/// Decode the version-parameter list, routing AUTHORIZATION_TOKEN values
/// through the token cache as they parse.
pub fn decode_version_parameters<B: bytes::Buf>(
	buf: &mut B,
	cache: &mut TokenCache,
) -> Result<Vec<VersionParameter>, Error> {
	let count = u64::decode(buf)?;

	let mut params = Vec::with_capacity(count.min(64) as usize);
	for _ in 0..count {
		let raw = u64::decode(buf)?;
		let kind = VersionParameterType::from(raw);
		let value = decode_parameter_value(buf, raw, "parameter value")?;

		let token = match (kind, &value) {
			(VersionParameterType::AuthorizationToken, ParameterValue::Bytes(data)) => {
				let token = AuthToken::decode(&mut data.clone())?;
				cache.apply(&token)?;
				Some(token)
			}
			_ => None,
		};

		params.push(VersionParameter { kind, value, token });
	}

	Ok(params)
}
