//! Control-plane messages.
//!
//! Every control message is framed as a varint type, a 16-bit big-endian
//! length, and exactly that many payload bytes. Types with a decoded
//! grammar produce a [ControlMessage] variant; the remaining recognized
//! types keep their payload opaque.

mod announce;
mod auth_token;
mod fetch;
mod goaway;
mod params;
mod request;
mod setup;
mod subscribe;
mod track;

pub use announce::*;
pub use auth_token::*;
pub use fetch::*;
pub use goaway::*;
pub use params::*;
pub use request::*;
pub use setup::*;
pub use subscribe::*;
pub use track::*;

use bytes::{Buf, Bytes};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
	coding::Decode,
	session::SessionState,
	Error, ProtocolViolation, ValidationError,
};

/// Every control message type the session recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u64)]
pub enum MessageType {
	SubscribeUpdate = 0x02,
	Subscribe = 0x03,
	SubscribeOk = 0x04,
	SubscribeError = 0x05,
	Announce = 0x06,
	AnnounceOk = 0x07,
	AnnounceError = 0x08,
	Unannounce = 0x09,
	Unsubscribe = 0x0a,
	SubscribeDone = 0x0b,
	AnnounceCancel = 0x0c,
	TrackStatusRequest = 0x0d,
	TrackStatus = 0x0e,
	Goaway = 0x10,
	SubscribeAnnounces = 0x11,
	SubscribeAnnouncesOk = 0x12,
	SubscribeAnnouncesError = 0x13,
	UnsubscribeAnnounces = 0x14,
	MaxRequestId = 0x15,
	Fetch = 0x16,
	FetchCancel = 0x17,
	FetchOk = 0x18,
	FetchError = 0x19,
	RequestsBlocked = 0x1a,
	ClientSetup = 0x20,
	ServerSetup = 0x21,
}

impl MessageType {
	pub fn name(&self) -> &'static str {
		match self {
			Self::SubscribeUpdate => "SUBSCRIBE_UPDATE",
			Self::Subscribe => "SUBSCRIBE",
			Self::SubscribeOk => "SUBSCRIBE_OK",
			Self::SubscribeError => "SUBSCRIBE_ERROR",
			Self::Announce => "ANNOUNCE",
			Self::AnnounceOk => "ANNOUNCE_OK",
			Self::AnnounceError => "ANNOUNCE_ERROR",
			Self::Unannounce => "UNANNOUNCE",
			Self::Unsubscribe => "UNSUBSCRIBE",
			Self::SubscribeDone => "SUBSCRIBE_DONE",
			Self::AnnounceCancel => "ANNOUNCE_CANCEL",
			Self::TrackStatusRequest => "TRACK_STATUS_REQUEST",
			Self::TrackStatus => "TRACK_STATUS",
			Self::Goaway => "GOAWAY",
			Self::SubscribeAnnounces => "SUBSCRIBE_ANNOUNCES",
			Self::SubscribeAnnouncesOk => "SUBSCRIBE_ANNOUNCES_OK",
			Self::SubscribeAnnouncesError => "SUBSCRIBE_ANNOUNCES_ERROR",
			Self::UnsubscribeAnnounces => "UNSUBSCRIBE_ANNOUNCES",
			Self::MaxRequestId => "MAX_REQUEST_ID",
			Self::Fetch => "FETCH",
			Self::FetchCancel => "FETCH_CANCEL",
			Self::FetchOk => "FETCH_OK",
			Self::FetchError => "FETCH_ERROR",
			Self::RequestsBlocked => "REQUESTS_BLOCKED",
			Self::ClientSetup => "CLIENT_SETUP",
			Self::ServerSetup => "SERVER_SETUP",
		}
	}
}

/// One decoded control message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMessage {
	ClientSetup(ClientSetup),
	ServerSetup(ServerSetup),
	Subscribe(Subscribe),
	SubscribeOk(SubscribeOk),
	Fetch(Fetch),
	Announce(Announce),
	Goaway(GoAway),
	MaxRequestId(MaxRequestId),
	TrackStatusRequest(TrackStatusRequest),
	/// A recognized type whose payload grammar is not decoded yet.
	Opaque { kind: MessageType, payload: Bytes },
}

impl ControlMessage {
	pub fn kind(&self) -> MessageType {
		match self {
			Self::ClientSetup(_) => MessageType::ClientSetup,
			Self::ServerSetup(_) => MessageType::ServerSetup,
			Self::Subscribe(_) => MessageType::Subscribe,
			Self::SubscribeOk(_) => MessageType::SubscribeOk,
			Self::Fetch(_) => MessageType::Fetch,
			Self::Announce(_) => MessageType::Announce,
			Self::Goaway(_) => MessageType::Goaway,
			Self::MaxRequestId(_) => MessageType::MaxRequestId,
			Self::TrackStatusRequest(_) => MessageType::TrackStatusRequest,
			Self::Opaque { kind, .. } => *kind,
		}
	}

	/// Decode one framed message from the front of the buffer. Bytes
	/// after the declared length are left untouched.
	pub fn decode<B: bytes::Buf>(buf: &mut B, session: &mut SessionState) -> Result<Self, Error> {
		let raw = u64::decode(buf)?;
		let kind = MessageType::try_from(raw).map_err(|_| ProtocolViolation::UnknownMessageType(raw))?;

		let len = match buf.remaining() >= 2 {
			true => buf.get_u16(),
			false => return Err(ValidationError::Missing("message length").into()),
		};

		if buf.remaining() < len as usize {
			return Err(ValidationError::PayloadIncomplete(len).into());
		}
		let mut payload = buf.copy_to_bytes(len as usize);

		let msg = match kind {
			MessageType::ClientSetup => Self::ClientSetup(ClientSetup::decode_msg(&mut payload)?),
			MessageType::ServerSetup => Self::ServerSetup(ServerSetup::decode_msg(&mut payload)?),
			MessageType::Subscribe => Self::Subscribe(Subscribe::decode_msg(&mut payload, session)?),
			MessageType::SubscribeOk => Self::SubscribeOk(SubscribeOk::decode_msg(&mut payload, session)?),
			MessageType::Fetch => Self::Fetch(Fetch::decode_msg(&mut payload, session)?),
			MessageType::Announce => Self::Announce(Announce::decode_msg(&mut payload, session)?),
			MessageType::Goaway => Self::Goaway(GoAway::decode_msg(&mut payload)?),
			MessageType::MaxRequestId => Self::MaxRequestId(MaxRequestId::decode_msg(&mut payload)?),
			MessageType::TrackStatusRequest => {
				Self::TrackStatusRequest(TrackStatusRequest::decode_msg(&mut payload, session)?)
			}
			kind => return Ok(Self::Opaque { kind, payload }),
		};

		// The declared length must bracket the payload exactly.
		if payload.has_remaining() {
			return Err(ValidationError::TrailingBytes("message payload").into());
		}

		Ok(msg)
	}
}
