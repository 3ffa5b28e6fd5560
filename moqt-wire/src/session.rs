//! Per-session validation state and the three decode entry points.
//!
//! A session owns everything needed for cross-message invariants: the
//! negotiated version, per-direction request-id ceilings, the live
//! subscription and fetch tables, the track-alias map, and the
//! auth-token cache. One message is decoded at a time against it; state
//! mutations commit only once the message's own grammar has succeeded,
//! except token-cache operations, which apply as their value parses.

use std::collections::HashMap;

use bytes::Bytes;

use crate::{
	data::{DataStream, Datagram},
	message::{ControlMessage, FetchType, ParameterValue, SetupParameter, SetupParameterType, TokenCache},
	Error, FilterType, FullTrackName, ProtocolViolation, ValidationError,
};

/// Version 1 of the protocol, assumed until a SERVER_SETUP selects one.
pub const CURRENT_VERSION: u64 = 0x00000001;

/// Which endpoint originated a request id. Client ids are even, server
/// ids are odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Client,
	Server,
}

/// A live subscription created by SUBSCRIBE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
	pub track_alias: u64,
	pub full_track_name: FullTrackName,
	pub filter_type: FilterType,
}

/// A live fetch created by FETCH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFetch {
	pub fetch_type: FetchType,
}

/// All mutable state for one MoQT session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
	version: Option<u64>,
	offered_versions: Vec<u64>,
	/// Ceilings per originating direction; None until negotiated, which
	/// means unlimited.
	max_request_id_client: Option<u64>,
	max_request_id_server: Option<u64>,
	subscriptions: HashMap<u64, Subscription>,
	fetches: HashMap<u64, ActiveFetch>,
	track_aliases: HashMap<u64, FullTrackName>,
	auth_tokens: TokenCache,
}

impl SessionState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Decode and validate one framed control message. Bytes after the
	/// frame are ignored.
	pub fn validate_control(&mut self, data: &[u8]) -> Result<ControlMessage, Error> {
		if data.is_empty() {
			return Err(ValidationError::Empty("message").into());
		}

		tracing::trace!(hex = %hex::encode(data), "decoding control message");

		let mut buf = Bytes::copy_from_slice(data);
		let msg = ControlMessage::decode(&mut buf, self)?;

		self.apply(&msg)?;

		tracing::debug!(kind = msg.kind().name(), "decoded control message");
		Ok(msg)
	}

	/// Decode an entire unidirectional data stream buffer.
	pub fn validate_stream(&mut self, data: &[u8]) -> Result<DataStream, Error> {
		if data.is_empty() {
			return Err(ValidationError::Empty("data stream").into());
		}

		tracing::trace!(hex = %hex::encode(data), "decoding data stream");

		let mut buf = Bytes::copy_from_slice(data);
		let stream = DataStream::decode(&mut buf)?;

		tracing::debug!("decoded data stream");
		Ok(stream)
	}

	/// Decode a single datagram payload.
	pub fn validate_datagram(&mut self, data: &[u8]) -> Result<Datagram, Error> {
		if data.is_empty() {
			return Err(ValidationError::Empty("datagram").into());
		}

		tracing::trace!(hex = %hex::encode(data), "decoding datagram");

		let mut buf = Bytes::copy_from_slice(data);
		let datagram = Datagram::decode(&mut buf)?;

		tracing::debug!(kind = datagram.kind.name(), "decoded datagram");
		Ok(datagram)
	}

	/// The version selected by SERVER_SETUP, or the assumed default.
	pub fn version(&self) -> u64 {
		self.version.unwrap_or(CURRENT_VERSION)
	}

	pub fn max_request_id(&self, direction: Direction) -> Option<u64> {
		match direction {
			Direction::Client => self.max_request_id_client,
			Direction::Server => self.max_request_id_server,
		}
	}

	pub fn subscription(&self, request_id: u64) -> Option<&Subscription> {
		self.subscriptions.get(&request_id)
	}

	pub fn subscription_count(&self) -> usize {
		self.subscriptions.len()
	}

	pub fn fetch(&self, request_id: u64) -> Option<&ActiveFetch> {
		self.fetches.get(&request_id)
	}

	pub fn track_alias(&self, alias: u64) -> Option<&FullTrackName> {
		self.track_aliases.get(&alias)
	}

	pub fn auth_tokens(&self) -> &TokenCache {
		&self.auth_tokens
	}

	pub(crate) fn token_cache_mut(&mut self) -> &mut TokenCache {
		&mut self.auth_tokens
	}

	/// Parity and ceiling checks for a request id appearing on the wire.
	pub(crate) fn check_request_id(&self, id: u64, direction: Direction) -> Result<(), Error> {
		match direction {
			Direction::Client => {
				if id % 2 != 0 {
					return Err(ProtocolViolation::RequestIdNotEven(id).into());
				}
			}
			Direction::Server => {
				if id % 2 != 1 {
					return Err(ProtocolViolation::RequestIdNotOdd(id).into());
				}
			}
		}

		if let Some(max) = self.max_request_id(direction) {
			if id > max {
				return Err(ProtocolViolation::RequestIdExceedsMax { id, max }.into());
			}
		}

		Ok(())
	}

	/// Commit a successfully decoded message's side effects.
	fn apply(&mut self, msg: &ControlMessage) -> Result<(), Error> {
		match msg {
			ControlMessage::ClientSetup(setup) => {
				self.offered_versions = setup.versions.clone();
				// The client's MAX_REQUEST_ID grants ids to the server.
				self.apply_setup_parameters(&setup.parameters, Direction::Server)?;
			}
			ControlMessage::ServerSetup(setup) => {
				if !self.offered_versions.is_empty() && !self.offered_versions.contains(&setup.version) {
					return Err(ProtocolViolation::VersionNotOffered(setup.version).into());
				}
				self.version = Some(setup.version);
				self.apply_setup_parameters(&setup.parameters, Direction::Client)?;
			}
			ControlMessage::Subscribe(sub) => {
				if self.track_aliases.contains_key(&sub.track_alias) {
					return Err(ProtocolViolation::DuplicateTrackAlias(sub.track_alias).into());
				}
				self.track_aliases.insert(sub.track_alias, sub.full_track_name.clone());
				self.subscriptions.insert(
					sub.request_id,
					Subscription {
						track_alias: sub.track_alias,
						full_track_name: sub.full_track_name.clone(),
						filter_type: sub.filter_type,
					},
				);
			}
			ControlMessage::Fetch(fetch) => {
				self.fetches.insert(
					fetch.request_id,
					ActiveFetch {
						fetch_type: fetch.fetch_type.clone(),
					},
				);
			}
			ControlMessage::MaxRequestId(msg) => {
				// The grant flows toward the client's next requests.
				self.raise_max_request_id(Direction::Client, msg.request_id)?;
			}
			_ => {}
		}

		Ok(())
	}

	fn apply_setup_parameters(&mut self, params: &[SetupParameter], direction: Direction) -> Result<(), Error> {
		for param in params {
			match (param.kind, &param.value) {
				(SetupParameterType::MaxRequestId, ParameterValue::VarInt(v)) => {
					self.raise_max_request_id(direction, *v)?;
				}
				(SetupParameterType::MaxAuthTokenCacheSize, ParameterValue::VarInt(v)) => {
					self.auth_tokens.set_max_size(*v);
				}
				_ => {}
			}
		}

		Ok(())
	}

	fn raise_max_request_id(&mut self, direction: Direction, value: u64) -> Result<(), Error> {
		let slot = match direction {
			Direction::Client => &mut self.max_request_id_client,
			Direction::Server => &mut self.max_request_id_server,
		};

		if let Some(prev) = *slot {
			if value < prev {
				return Err(ProtocolViolation::MaxRequestIdDecreased { prev, next: value }.into());
			}
		}
		*slot = Some(value);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::coding::encode_varint;
	use crate::message::MessageType;
	use crate::record::Value;

	fn frame(kind: MessageType, payload: &[u8]) -> Vec<u8> {
		let mut buf = Vec::new();
		encode_varint(&mut buf, kind.into()).unwrap();
		buf.extend_from_slice(&(payload.len() as u16).to_be_bytes());
		buf.extend_from_slice(payload);
		buf
	}

	#[rustfmt::skip]
	fn subscribe_payload(request_id: u8, track_alias: u8) -> Vec<u8> {
		vec![
			request_id,
			track_alias,
			0x01, 0x04, b'l', b'i', b'v', b'e',
			0x03, b'c', b'a', b'm',
			0x80, // subscriber priority
			0x01, // group order: ascending
			0x01, // forward
			0x04, // filter: absolute range
			0x05, 0x00, // start (5, 0)
			0x07, // end group
			0x00, // no parameters
		]
	}

	/// ANNOUNCE carrying a single AUTHORIZATION_TOKEN parameter.
	fn announce_with_token(request_id: u8, token: &[u8]) -> Vec<u8> {
		let mut payload = vec![request_id, 0x01, 0x02, b'n', b's', 0x01, 0x01];
		payload.push(token.len() as u8);
		payload.extend_from_slice(token);
		frame(MessageType::Announce, &payload)
	}

	fn client_setup_with_cache_size(size: u8) -> Vec<u8> {
		// One version (0x1), one parameter: MAX_AUTH_TOKEN_CACHE_SIZE.
		frame(MessageType::ClientSetup, &[0x01, 0x01, 0x01, 0x04, 0x40, size])
	}

	#[test]
	fn subscribe_inserts_subscription() {
		let mut session = SessionState::new();
		let msg = frame(MessageType::Subscribe, &subscribe_payload(0x02, 0x0a));

		let decoded = session.validate_control(&msg).unwrap();

		let sub = session.subscription(2).unwrap();
		assert_eq!(sub.track_alias, 10);
		assert_eq!(sub.filter_type, FilterType::AbsoluteRange);
		assert!(session.track_alias(10).is_some());

		let rec = decoded.record();
		assert_eq!(rec.get("group_order"), Some(&Value::Str("ASCENDING".into())));
		assert_eq!(rec.get("type"), Some(&Value::Str("SUBSCRIBE".into())));
	}

	#[test]
	fn failed_subscribe_leaves_state_unchanged() {
		let mut session = SessionState::new();
		let mut payload = subscribe_payload(0x02, 0x0a);
		payload[18] = 0x04; // end group below start group

		let err = session.validate_control(&frame(MessageType::Subscribe, &payload)).unwrap_err();
		assert_eq!(err, ValidationError::EndGroupBeforeStart.into());
		assert_eq!(session.subscription_count(), 0);
	}

	#[test]
	fn truncation_is_never_a_silent_success() {
		let mut session = SessionState::new();
		let mut msg = frame(MessageType::Subscribe, &subscribe_payload(0x02, 0x0a));
		msg.pop();

		let err = session.validate_control(&msg).unwrap_err();
		assert!(matches!(err, Error::Validation(_)));
		assert_eq!(session.subscription_count(), 0);
	}

	#[test]
	fn duplicate_track_alias() {
		let mut session = SessionState::new();

		session
			.validate_control(&frame(MessageType::Subscribe, &subscribe_payload(0x02, 0x0a)))
			.unwrap();

		let err = session
			.validate_control(&frame(MessageType::Subscribe, &subscribe_payload(0x04, 0x0a)))
			.unwrap_err();
		assert_eq!(err, ProtocolViolation::DuplicateTrackAlias(10).into());
		assert_eq!(session.subscription_count(), 1);
	}

	#[test]
	fn client_request_ids_must_be_even() {
		let mut session = SessionState::new();
		let msg = frame(MessageType::Subscribe, &subscribe_payload(0x03, 0x0a));

		let err = session.validate_control(&msg).unwrap_err();
		assert_eq!(err, ProtocolViolation::RequestIdNotEven(3).into());
	}

	#[test]
	fn server_setup_installs_client_ceiling() {
		let mut session = SessionState::new();
		// SERVER_SETUP: version 1, MAX_REQUEST_ID = 4.
		let setup = frame(MessageType::ServerSetup, &[0x01, 0x01, 0x02, 0x04]);
		session.validate_control(&setup).unwrap();
		assert_eq!(session.max_request_id(Direction::Client), Some(4));

		let err = session
			.validate_control(&frame(MessageType::Subscribe, &subscribe_payload(0x06, 0x0a)))
			.unwrap_err();
		assert_eq!(err, ProtocolViolation::RequestIdExceedsMax { id: 6, max: 4 }.into());
	}

	#[test]
	fn max_request_id_is_monotone() {
		let mut session = SessionState::new();

		let first = frame(MessageType::MaxRequestId, &[0x40, 0x64]); // 100
		session.validate_control(&first).unwrap();
		assert_eq!(session.max_request_id(Direction::Client), Some(100));

		// Equal is fine.
		session.validate_control(&first).unwrap();

		let smaller = frame(MessageType::MaxRequestId, &[0x32]); // 50
		let err = session.validate_control(&smaller).unwrap_err();
		assert_eq!(err, ProtocolViolation::MaxRequestIdDecreased { prev: 100, next: 50 }.into());
		assert_eq!(session.max_request_id(Direction::Client), Some(100));
	}

	#[test]
	fn fetch_inserts_active_fetch() {
		let mut session = SessionState::new();
		#[rustfmt::skip]
		let payload = [
			0x04, 0x00, 0x01,
			0x02, // relative joining
			0x02, // joining subscribe id
			0x01, // joining start
			0x00,
		];

		session.validate_control(&frame(MessageType::Fetch, &payload)).unwrap();
		assert!(session.fetch(4).is_some());
	}

	#[test]
	fn version_agreement() {
		let mut session = SessionState::new();

		// CLIENT_SETUP offering versions 1 and 2.
		let client = frame(MessageType::ClientSetup, &[0x02, 0x01, 0x02, 0x00]);
		session.validate_control(&client).unwrap();

		let bad_server = frame(MessageType::ServerSetup, &[0x03, 0x00]);
		let err = session.validate_control(&bad_server).unwrap_err();
		assert_eq!(err, ProtocolViolation::VersionNotOffered(3).into());

		let good_server = frame(MessageType::ServerSetup, &[0x02, 0x00]);
		session.validate_control(&good_server).unwrap();
		assert_eq!(session.version(), 2);
	}

	#[test]
	fn server_setup_without_offer_is_accepted() {
		let mut session = SessionState::new();
		let server = frame(MessageType::ServerSetup, &[0x05, 0x00]);
		session.validate_control(&server).unwrap();
		assert_eq!(session.version(), 5);
	}

	#[test]
	fn auth_token_lifecycle() {
		let mut session = SessionState::new();
		session.validate_control(&client_setup_with_cache_size(64)).unwrap();
		assert_eq!(session.auth_tokens().max_size(), 64);

		// REGISTER alias 3 with a 4-byte value: 8 + 4 = 12.
		let register = announce_with_token(0x00, &[0x01, 0x03, 0x00, 0xde, 0xad, 0xbe, 0xef]);
		session.validate_control(&register).unwrap();
		assert_eq!(session.auth_tokens().current_size(), 12);

		// USE_ALIAS of the registered alias.
		let use_known = announce_with_token(0x02, &[0x02, 0x03]);
		session.validate_control(&use_known).unwrap();

		// USE_ALIAS of an unregistered alias.
		let use_unknown = announce_with_token(0x04, &[0x02, 0x04]);
		let err = session.validate_control(&use_unknown).unwrap_err();
		assert_eq!(err, ProtocolViolation::UnknownAuthTokenAlias(4).into());

		// REGISTER that would overflow the 64-byte budget: 12 + 8 + 45 > 64.
		let mut big = vec![0x01, 0x04, 0x00];
		big.extend_from_slice(&[0xaa; 45]);
		let err = session.validate_control(&announce_with_token(0x06, &big)).unwrap_err();
		assert_eq!(err, ProtocolViolation::AuthTokenCacheOverflow.into());
		assert_eq!(session.auth_tokens().current_size(), 12);
	}

	#[test]
	fn register_commits_before_a_later_parameter_fails() {
		let mut session = SessionState::new();
		session.validate_control(&client_setup_with_cache_size(64)).unwrap();

		// ANNOUNCE with two parameters: a valid REGISTER, then a
		// truncated second parameter.
		#[rustfmt::skip]
		let payload = [
			0x00,                   // request id
			0x01, 0x02, b'n', b's', // namespace
			0x02,                   // two parameters
			0x01, 0x04, 0x01, 0x03, 0x00, 0xff, // AUTHORIZATION_TOKEN: REGISTER alias 3
			0x02,                   // DELIVERY_TIMEOUT with no value
		];

		let err = session.validate_control(&frame(MessageType::Announce, &payload)).unwrap_err();
		assert!(matches!(err, Error::Validation(_)));

		// The token registered before the failure point.
		assert!(session.auth_tokens().contains(3));
		assert_eq!(session.auth_tokens().current_size(), 9);
	}

	#[test]
	fn empty_inputs() {
		let mut session = SessionState::new();
		assert_eq!(
			session.validate_control(&[]).unwrap_err(),
			ValidationError::Empty("message").into()
		);
		assert_eq!(
			session.validate_stream(&[]).unwrap_err(),
			ValidationError::Empty("data stream").into()
		);
		assert_eq!(
			session.validate_datagram(&[]).unwrap_err(),
			ValidationError::Empty("datagram").into()
		);
	}

	#[test]
	fn suffix_bytes_do_not_change_the_result() {
		let mut session = SessionState::new();
		let msg = frame(MessageType::Subscribe, &subscribe_payload(0x02, 0x0a));
		let decoded = session.validate_control(&msg).unwrap();

		let mut session = SessionState::new();
		let mut extended = msg.clone();
		extended.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
		let decoded_extended = session.validate_control(&extended).unwrap();

		assert_eq!(decoded, decoded_extended);
	}

	#[test]
	fn stream_and_datagram_entry_points() {
		let mut session = SessionState::new();

		let stream = [0x05, 0x0c];
		assert!(matches!(
			session.validate_stream(&stream).unwrap(),
			DataStream::Fetch(_)
		));

		let datagram = [0x00, 0x01, 0x05, 0x09, 0x00, 0xaa];
		let decoded = session.validate_datagram(&datagram).unwrap();
		assert_eq!(decoded.object_id, 9);
	}
}
