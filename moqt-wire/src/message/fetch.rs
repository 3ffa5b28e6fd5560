//! FETCH messages.

use crate::{
	coding::{read_bytes, read_u8, Decode},
	message::{decode_version_parameters, VersionParameter},
	session::{Direction, SessionState},
	Error, FullTrackName, GroupOrder, Location, ProtocolViolation, TrackNamespace, ValidationError,
};

/// The three fetch flavors: an explicit range, or a fetch joined to an
/// existing subscription by relative or absolute group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchType {
	Standalone {
		full_track_name: FullTrackName,
		start: Location,
		end: Location,
	},
	RelativeJoining {
		joining_subscribe_id: u64,
		joining_start: u64,
	},
	AbsoluteJoining {
		joining_subscribe_id: u64,
		joining_start: u64,
	},
}

impl FetchType {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Standalone { .. } => "STANDALONE",
			Self::RelativeJoining { .. } => "RELATIVE_JOINING",
			Self::AbsoluteJoining { .. } => "ABSOLUTE_JOINING",
		}
	}
}

/// Fetch message (0x16), requesting a bounded range of past objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetch {
	pub request_id: u64,
	pub subscriber_priority: u8,
	pub group_order: GroupOrder,
	pub fetch_type: FetchType,
	pub parameters: Vec<VersionParameter>,
}

impl Fetch {
	pub const ID: u64 = 0x16;

	pub fn decode_msg<B: bytes::Buf>(buf: &mut B, session: &mut SessionState) -> Result<Self, Error> {
		let request_id = u64::decode(buf)?;
		session.check_request_id(request_id, Direction::Client)?;

		let subscriber_priority = read_u8(buf, "subscriber priority")?;
		let group_order = GroupOrder::decode(buf)?;

		let kind = u64::decode(buf)?;
		let fetch_type = match kind {
			0x01 => {
				let namespace = TrackNamespace::decode(buf)?;
				let name_len = u64::decode(buf)?;
				let name = read_bytes(buf, name_len, "track name")?;
				let full_track_name = FullTrackName::new(namespace, name)?;

				let start = Location::decode(buf)?;
				let end = Location::decode(buf)?;
				if end < start {
					return Err(ValidationError::EndBeforeStart.into());
				}

				FetchType::Standalone {
					full_track_name,
					start,
					end,
				}
			}
			0x02 => FetchType::RelativeJoining {
				joining_subscribe_id: u64::decode(buf)?,
				joining_start: u64::decode(buf)?,
			},
			0x03 => FetchType::AbsoluteJoining {
				joining_subscribe_id: u64::decode(buf)?,
				joining_start: u64::decode(buf)?,
			},
			other => return Err(ProtocolViolation::InvalidFetchType(other).into()),
		};

		let parameters = decode_version_parameters(buf, session.token_cache_mut())?;

		Ok(Self {
			request_id,
			subscriber_priority,
			group_order,
			fetch_type,
			parameters,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[rustfmt::skip]
	fn standalone_payload(end: [u8; 2]) -> Vec<u8> {
		vec![
			0x04,             // request id
			0x7f,             // subscriber priority
			0x00,             // group order: default
			0x01,             // fetch type: standalone
			0x01, 0x02, b'n', b's', // namespace: ["ns"]
			0x01, b't',       // track name: "t"
			0x05, 0x05,       // start (5, 5)
			end[0], end[1],   // end
			0x00,             // no parameters
		]
	}

	#[test]
	fn standalone_range() {
		let mut session = SessionState::new();
		let payload = standalone_payload([0x07, 0x00]);

		let msg = Fetch::decode_msg(&mut &payload[..], &mut session).unwrap();
		assert_eq!(msg.request_id, 4);
		match msg.fetch_type {
			FetchType::Standalone { start, end, .. } => {
				assert_eq!(start, Location { group: 5, object: 5 });
				assert_eq!(end, Location { group: 7, object: 0 });
			}
			other => panic!("wrong fetch type: {other:?}"),
		}
	}

	#[test]
	fn standalone_inverted_range() {
		let mut session = SessionState::new();
		// (5, 4) < (5, 5): object breaks the tie.
		let payload = standalone_payload([0x05, 0x04]);

		let err = Fetch::decode_msg(&mut &payload[..], &mut session).unwrap_err();
		assert_eq!(err, ValidationError::EndBeforeStart.into());
	}

	#[test]
	fn standalone_equal_range_is_legal() {
		let mut session = SessionState::new();
		let payload = standalone_payload([0x05, 0x05]);
		assert!(Fetch::decode_msg(&mut &payload[..], &mut session).is_ok());
	}

	#[test]
	fn relative_joining() {
		let mut session = SessionState::new();
		#[rustfmt::skip]
		let payload = [
			0x02, // request id
			0x00, // priority
			0x01, // ascending
			0x02, // fetch type: relative joining
			0x08, // joining subscribe id
			0x03, // joining start
			0x00, // no parameters
		];

		let msg = Fetch::decode_msg(&mut &payload[..], &mut session).unwrap();
		assert_eq!(
			msg.fetch_type,
			FetchType::RelativeJoining {
				joining_subscribe_id: 8,
				joining_start: 3,
			}
		);
	}

	#[test]
	fn rejects_fetch_type_zero() {
		let mut session = SessionState::new();
		let payload = [0x02, 0x00, 0x01, 0x00];

		let err = Fetch::decode_msg(&mut &payload[..], &mut session).unwrap_err();
		assert_eq!(err, ProtocolViolation::InvalidFetchType(0).into());
	}
}
