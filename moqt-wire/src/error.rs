use num_enum::IntoPrimitive;
use thiserror::Error;

/// Session termination codes defined by the MoQT transport.
///
/// Every decode failure maps to one of these so a host can close the
/// session with the right code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive)]
#[repr(u64)]
pub enum TerminationCode {
	NoError = 0x00,
	InternalError = 0x01,
	Unauthorized = 0x02,
	ProtocolViolation = 0x03,
	InvalidRequestId = 0x04,
	DuplicateTrackAlias = 0x05,
	KeyValueFormattingError = 0x06,
	TooManyRequests = 0x07,
	InvalidPath = 0x08,
	MalformedPath = 0x09,
	GoawayTimeout = 0x10,
	ControlMessageTimeout = 0x11,
	DataStreamTimeout = 0x12,
	AuthTokenCacheOverflow = 0x13,
	DuplicateAuthTokenAlias = 0x14,
	VersionNegotiationFailed = 0x15,
}

/// The byte stream is malformed against the wire grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	#[error("empty {0}")]
	Empty(&'static str),

	#[error("unexpected end of buffer")]
	Short,

	#[error("insufficient data for {0}")]
	Missing(&'static str),

	#[error("message payload incomplete: expected {0} bytes")]
	PayloadIncomplete(u16),

	#[error("trailing bytes after {0}")]
	TrailingBytes(&'static str),

	#[error("end group must be >= start group")]
	EndGroupBeforeStart,

	#[error("end location must be >= start location")]
	EndBeforeStart,

	#[error("varint value too large")]
	ValueTooLarge,
}

impl ValidationError {
	pub fn code(&self) -> TerminationCode {
		match self {
			// Encode-side failure; nothing on the wire to blame.
			Self::ValueTooLarge => TerminationCode::InternalError,
			_ => TerminationCode::ProtocolViolation,
		}
	}
}

/// The stream is well-framed but violates a semantic rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
	#[error("unknown message type: {0}")]
	UnknownMessageType(u64),

	#[error("unknown stream type: {0}")]
	UnknownStreamType(u64),

	#[error("unknown datagram type: {0}")]
	UnknownDatagramType(u64),

	#[error("invalid group order: {0}")]
	InvalidGroupOrder(u8),

	#[error("invalid group order in SUBSCRIBE_OK: {0}")]
	InvalidGroupOrderInSubscribeOk(u8),

	#[error("invalid forward value: {0}")]
	InvalidForward(u8),

	#[error("invalid content exists value: {0}")]
	InvalidContentExists(u8),

	#[error("invalid filter type: {0}")]
	InvalidFilterType(u64),

	#[error("invalid fetch type: {0}")]
	InvalidFetchType(u64),

	#[error("invalid object status: {0}")]
	InvalidObjectStatus(u64),

	#[error("invalid alias type: {0}")]
	InvalidAliasType(u64),

	#[error("unknown auth token alias: {0}")]
	UnknownAuthTokenAlias(u64),

	#[error("duplicate auth token alias: {0}")]
	DuplicateAuthTokenAlias(u64),

	#[error("auth token cache overflow")]
	AuthTokenCacheOverflow,

	#[error("parameter length too large: {0}")]
	ParameterTooLarge(u64),

	#[error("track namespace must have 1-32 fields, got {0}")]
	NamespaceFieldCount(usize),

	#[error("full track name exceeds 4096 bytes: {0}")]
	TrackNameTooLong(usize),

	#[error("client request ID must be even, got {0}")]
	RequestIdNotEven(u64),

	#[error("server request ID must be odd, got {0}")]
	RequestIdNotOdd(u64),

	#[error("request ID {id} exceeds maximum {max}")]
	RequestIdExceedsMax { id: u64, max: u64 },

	#[error("max request ID decreased from {prev} to {next}")]
	MaxRequestIdDecreased { prev: u64, next: u64 },

	#[error("duplicate track alias: {0}")]
	DuplicateTrackAlias(u64),

	#[error("selected version {0:#x} was not offered")]
	VersionNotOffered(u64),

	#[error("new session URI too long: {0} bytes")]
	UriTooLong(u64),

	#[error("object IDs must be ascending, got {next} after {prev}")]
	ObjectIdNotAscending { prev: u64, next: u64 },

	#[error("extension header length is 0 for type with extensions")]
	EmptyExtensions,
}

impl ProtocolViolation {
	pub fn code(&self) -> TerminationCode {
		match self {
			Self::RequestIdNotEven(_)
			| Self::RequestIdNotOdd(_)
			| Self::RequestIdExceedsMax { .. }
			| Self::MaxRequestIdDecreased { .. } => TerminationCode::InvalidRequestId,
			Self::DuplicateTrackAlias(_) => TerminationCode::DuplicateTrackAlias,
			Self::ParameterTooLarge(_) => TerminationCode::KeyValueFormattingError,
			Self::NamespaceFieldCount(_) | Self::TrackNameTooLong(_) => TerminationCode::MalformedPath,
			Self::AuthTokenCacheOverflow => TerminationCode::AuthTokenCacheOverflow,
			Self::DuplicateAuthTokenAlias(_) => TerminationCode::DuplicateAuthTokenAlias,
			Self::VersionNotOffered(_) => TerminationCode::VersionNegotiationFailed,
			_ => TerminationCode::ProtocolViolation,
		}
	}
}

/// Any failure surfaced by the decoder.
///
/// Grammar failures are [Error::Validation]; semantic failures are
/// [Error::Protocol]. Both are fatal to the message being decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] ValidationError),

	#[error("protocol violation: {0}")]
	Protocol(#[from] ProtocolViolation),
}

impl Error {
	/// The session termination code a host should close with.
	pub fn code(&self) -> TerminationCode {
		match self {
			Self::Validation(err) => err.code(),
			Self::Protocol(err) => err.code(),
		}
	}
}
