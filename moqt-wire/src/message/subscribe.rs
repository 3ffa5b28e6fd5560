//! SUBSCRIBE / SUBSCRIBE_OK messages.

use crate::{
	coding::{read_bytes, read_u8, Decode},
	message::{decode_version_parameters, VersionParameter},
	session::{Direction, SessionState},
	Error, FilterType, FullTrackName, GroupOrder, Location, ProtocolViolation, TrackNamespace, ValidationError,
};

/// Subscribe message (0x03), sent by a subscriber to request objects
/// from a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscribe {
	pub request_id: u64,
	pub track_alias: u64,
	pub full_track_name: FullTrackName,
	pub subscriber_priority: u8,
	pub group_order: GroupOrder,
	pub forward: bool,
	pub filter_type: FilterType,
	pub start: Option<Location>,
	pub end_group: Option<u64>,
	pub parameters: Vec<VersionParameter>,
}

impl Subscribe {
	pub const ID: u64 = 0x03;

	pub fn decode_msg<B: bytes::Buf>(buf: &mut B, session: &mut SessionState) -> Result<Self, Error> {
		let request_id = u64::decode(buf)?;
		session.check_request_id(request_id, Direction::Client)?;

		let track_alias = u64::decode(buf)?;

		let namespace = TrackNamespace::decode(buf)?;
		let name_len = u64::decode(buf)?;
		let name = read_bytes(buf, name_len, "track name")?;
		let full_track_name = FullTrackName::new(namespace, name)?;

		let subscriber_priority = read_u8(buf, "subscriber priority")?;
		let group_order = GroupOrder::decode(buf)?;

		let forward = match read_u8(buf, "forward flag")? {
			0 => false,
			1 => true,
			other => return Err(ProtocolViolation::InvalidForward(other).into()),
		};

		let filter_type = FilterType::decode(buf)?;

		let start = match filter_type {
			FilterType::AbsoluteStart | FilterType::AbsoluteRange => Some(Location::decode(buf)?),
			_ => None,
		};

		let end_group = match (filter_type, &start) {
			(FilterType::AbsoluteRange, Some(start)) => {
				let end_group = u64::decode(buf)?;
				if end_group < start.group {
					return Err(ValidationError::EndGroupBeforeStart.into());
				}
				Some(end_group)
			}
			_ => None,
		};

		let parameters = decode_version_parameters(buf, session.token_cache_mut())?;

		Ok(Self {
			request_id,
			track_alias,
			full_track_name,
			subscriber_priority,
			group_order,
			forward,
			filter_type,
			start,
			end_group,
			parameters,
		})
	}
}

/// SubscribeOk message (0x04), the publisher's acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOk {
	pub request_id: u64,
	pub expires_ms: u64,
	pub group_order: GroupOrder,
	pub content_exists: bool,
	pub largest: Option<Location>,
	pub parameters: Vec<VersionParameter>,
}

impl SubscribeOk {
	pub const ID: u64 = 0x04;

	pub fn decode_msg<B: bytes::Buf>(buf: &mut B, session: &mut SessionState) -> Result<Self, Error> {
		let request_id = u64::decode(buf)?;
		let expires_ms = u64::decode(buf)?;

		// The publisher must commit to an order here; DEFAULT is only
		// meaningful in the request direction.
		let order = read_u8(buf, "group order")?;
		let group_order = match GroupOrder::try_from(order) {
			Ok(GroupOrder::Default) | Err(_) => {
				return Err(ProtocolViolation::InvalidGroupOrderInSubscribeOk(order).into());
			}
			Ok(order) => order,
		};

		let content_exists = match read_u8(buf, "content exists flag")? {
			0 => false,
			1 => true,
			other => return Err(ProtocolViolation::InvalidContentExists(other).into()),
		};

		let largest = match content_exists {
			true => Some(Location::decode(buf)?),
			false => None,
		};

		let parameters = decode_version_parameters(buf, session.token_cache_mut())?;

		Ok(Self {
			request_id,
			expires_ms,
			group_order,
			content_exists,
			largest,
			parameters,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[rustfmt::skip]
	fn absolute_range_payload() -> Vec<u8> {
		vec![
			0x02,                               // request id
			0x0a,                               // track alias
			0x01, 0x04, b'l', b'i', b'v', b'e', // namespace: ["live"]
			0x03, b'c', b'a', b'm',             // track name: "cam"
			0x80,                               // subscriber priority
			0x01,                               // group order: ascending
			0x01,                               // forward
			0x04,                               // filter type: absolute range
			0x05, 0x00,                         // start location (5, 0)
			0x07,                               // end group
			0x00,                               // no parameters
		]
	}

	#[test]
	fn absolute_range() {
		let mut session = SessionState::new();
		let payload = absolute_range_payload();

		let msg = Subscribe::decode_msg(&mut &payload[..], &mut session).unwrap();
		assert_eq!(msg.request_id, 2);
		assert_eq!(msg.track_alias, 10);
		assert_eq!(msg.full_track_name.namespace.fields()[0].as_ref(), b"live");
		assert_eq!(msg.full_track_name.name.as_ref(), b"cam");
		assert_eq!(msg.subscriber_priority, 128);
		assert_eq!(msg.group_order, GroupOrder::Ascending);
		assert!(msg.forward);
		assert_eq!(msg.filter_type, FilterType::AbsoluteRange);
		assert_eq!(msg.start, Some(Location { group: 5, object: 0 }));
		assert_eq!(msg.end_group, Some(7));
	}

	#[test]
	fn inverted_range() {
		let mut session = SessionState::new();
		let mut payload = absolute_range_payload();
		payload[18] = 0x04; // end group 4 < start group 5

		let err = Subscribe::decode_msg(&mut &payload[..], &mut session).unwrap_err();
		assert_eq!(err, ValidationError::EndGroupBeforeStart.into());
	}

	#[test]
	fn bad_forward_flag() {
		let mut session = SessionState::new();
		let mut payload = absolute_range_payload();
		payload[14] = 0x02;

		let err = Subscribe::decode_msg(&mut &payload[..], &mut session).unwrap_err();
		assert_eq!(err, ProtocolViolation::InvalidForward(2).into());
	}

	#[test]
	fn latest_object_has_no_range() {
		let mut session = SessionState::new();
		#[rustfmt::skip]
		let payload = [
			0x00,             // request id
			0x01,             // track alias
			0x01, 0x01, b'a', // namespace
			0x01, b'b',       // name
			0x00,             // priority
			0x02,             // descending
			0x00,             // forward off
			0x02,             // latest object
			0x00,             // no parameters
		];

		let msg = Subscribe::decode_msg(&mut &payload[..], &mut session).unwrap();
		assert_eq!(msg.filter_type, FilterType::LatestObject);
		assert!(msg.start.is_none());
		assert!(msg.end_group.is_none());
		assert!(!msg.forward);
	}

	#[test]
	fn subscribe_ok_with_largest() {
		let mut session = SessionState::new();
		#[rustfmt::skip]
		let payload = [
			0x02,       // request id
			0x40, 0xc8, // expires 200ms
			0x02,       // descending
			0x01,       // content exists
			0x09, 0x03, // largest location (9, 3)
			0x00,       // no parameters
		];

		let msg = SubscribeOk::decode_msg(&mut &payload[..], &mut session).unwrap();
		assert_eq!(msg.expires_ms, 200);
		assert_eq!(msg.group_order, GroupOrder::Descending);
		assert!(msg.content_exists);
		assert_eq!(msg.largest, Some(Location { group: 9, object: 3 }));
	}

	#[test]
	fn subscribe_ok_rejects_default_order() {
		let mut session = SessionState::new();
		let payload = [0x02, 0x00, 0x00, 0x00, 0x00];

		let err = SubscribeOk::decode_msg(&mut &payload[..], &mut session).unwrap_err();
		assert_eq!(err, ProtocolViolation::InvalidGroupOrderInSubscribeOk(0).into());
	}
}
