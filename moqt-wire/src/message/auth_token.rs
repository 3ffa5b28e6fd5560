//! The AUTHORIZATION_TOKEN parameter value and the session's token-alias
//! cache.
//!
//! A token parameter either manipulates the alias cache (DELETE,
//! REGISTER), references it (USE_ALIAS), or carries a one-shot value
//! (USE_VALUE). Cache mutations are applied the moment the token's own
//! grammar completes, before the rest of the enclosing parameter list.

use std::collections::HashMap;

use bytes::Bytes;

use crate::{coding::Decode, Error, ProtocolViolation};

/// A decoded AUTHORIZATION_TOKEN value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthToken {
	Delete { alias: u64 },
	Register { alias: u64, token_type: u64, value: Bytes },
	UseAlias { alias: u64 },
	UseValue { token_type: u64, value: Bytes },
}

impl AuthToken {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Delete { .. } => "DELETE",
			Self::Register { .. } => "REGISTER",
			Self::UseAlias { .. } => "USE_ALIAS",
			Self::UseValue { .. } => "USE_VALUE",
		}
	}

	pub fn alias(&self) -> Option<u64> {
		match self {
			Self::Delete { alias } | Self::Register { alias, .. } | Self::UseAlias { alias } => Some(*alias),
			Self::UseValue { .. } => None,
		}
	}
}

impl Decode for AuthToken {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, Error> {
		let alias_type = u64::decode(buf)?;

		Ok(match alias_type {
			0x00 => Self::Delete {
				alias: u64::decode(buf)?,
			},
			0x01 => {
				let alias = u64::decode(buf)?;
				let token_type = u64::decode(buf)?;
				let value = buf.copy_to_bytes(buf.remaining());
				Self::Register { alias, token_type, value }
			}
			0x02 => Self::UseAlias {
				alias: u64::decode(buf)?,
			},
			0x03 => {
				let token_type = u64::decode(buf)?;
				let value = buf.copy_to_bytes(buf.remaining());
				Self::UseValue { token_type, value }
			}
			other => return Err(ProtocolViolation::InvalidAliasType(other).into()),
		})
	}
}

/// The per-session alias cache with its negotiated size budget.
///
/// Each live entry costs `8 + len(value)` against the budget. That is
/// the currency agreed with the peer, not the wire size of the entry.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
	tokens: HashMap<u64, Bytes>,
	current_size: u64,
	max_size: u64,
}

const TOKEN_ENTRY_OVERHEAD: u64 = 8;

impl TokenCache {
	pub fn new(max_size: u64) -> Self {
		Self {
			max_size,
			..Default::default()
		}
	}

	/// Installed from the MAX_AUTH_TOKEN_CACHE_SIZE setup parameter.
	pub fn set_max_size(&mut self, max_size: u64) {
		self.max_size = max_size;
	}

	pub fn current_size(&self) -> u64 {
		self.current_size
	}

	pub fn max_size(&self) -> u64 {
		self.max_size
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn contains(&self, alias: u64) -> bool {
		self.tokens.contains_key(&alias)
	}

	/// Run one token operation against the cache.
	pub fn apply(&mut self, token: &AuthToken) -> Result<(), Error> {
		match token {
			AuthToken::Delete { alias } => {
				// Deleting an absent alias is a no-op, for idempotence.
				if let Some(old) = self.tokens.remove(alias) {
					self.current_size -= TOKEN_ENTRY_OVERHEAD + old.len() as u64;
				}
			}
			AuthToken::Register { alias, value, .. } => {
				let size = TOKEN_ENTRY_OVERHEAD + value.len() as u64;
				if self.current_size + size > self.max_size {
					return Err(ProtocolViolation::AuthTokenCacheOverflow.into());
				}
				if self.tokens.contains_key(alias) {
					return Err(ProtocolViolation::DuplicateAuthTokenAlias(*alias).into());
				}
				self.tokens.insert(*alias, value.clone());
				self.current_size += size;
			}
			AuthToken::UseAlias { alias } => {
				if !self.tokens.contains_key(alias) {
					return Err(ProtocolViolation::UnknownAuthTokenAlias(*alias).into());
				}
			}
			AuthToken::UseValue { .. } => {}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn register(alias: u64, value: &'static [u8]) -> AuthToken {
		AuthToken::Register {
			alias,
			token_type: 0,
			value: Bytes::from_static(value),
		}
	}

	#[test]
	fn decode_register() {
		#[rustfmt::skip]
		let bytes = [
			0x01,       // REGISTER
			0x03,       // alias
			0x00,       // token type
			0xde, 0xad, // value
		];

		let token = AuthToken::decode(&mut &bytes[..]).unwrap();
		assert_eq!(
			token,
			AuthToken::Register {
				alias: 3,
				token_type: 0,
				value: Bytes::from_static(&[0xde, 0xad]),
			}
		);
	}

	#[test]
	fn decode_rejects_bad_alias_type() {
		let err = AuthToken::decode(&mut &[0x04u8, 0x01][..]).unwrap_err();
		assert_eq!(err, ProtocolViolation::InvalidAliasType(4).into());
	}

	#[test]
	fn budget_accounting() {
		let mut cache = TokenCache::new(64);

		cache.apply(&register(1, b"abcd")).unwrap();
		assert_eq!(cache.current_size(), 12);

		cache.apply(&register(2, b"ef")).unwrap();
		assert_eq!(cache.current_size(), 22);

		cache.apply(&AuthToken::Delete { alias: 1 }).unwrap();
		assert_eq!(cache.current_size(), 10);
		assert!(!cache.contains(1));

		// Absent alias: silently ignored.
		cache.apply(&AuthToken::Delete { alias: 9 }).unwrap();
		assert_eq!(cache.current_size(), 10);
	}

	#[test]
	fn register_overflow_and_duplicate() {
		let mut cache = TokenCache::new(20);

		cache.apply(&register(1, b"abcd")).unwrap();

		// 12 + 8 + 1 > 20.
		let err = cache.apply(&register(2, b"x")).unwrap_err();
		assert_eq!(err, ProtocolViolation::AuthTokenCacheOverflow.into());

		// An empty value still fits (12 + 8 = 20), but the alias is taken.
		let err = cache.apply(&register(1, b"")).unwrap_err();
		assert_eq!(err, ProtocolViolation::DuplicateAuthTokenAlias(1).into());
	}

	#[test]
	fn use_alias_requires_registration() {
		let mut cache = TokenCache::new(64);

		let err = cache.apply(&AuthToken::UseAlias { alias: 4 }).unwrap_err();
		assert_eq!(err, ProtocolViolation::UnknownAuthTokenAlias(4).into());

		cache.apply(&register(4, b"tok")).unwrap();
		cache.apply(&AuthToken::UseAlias { alias: 4 }).unwrap();

		// USE_VALUE never touches the cache.
		let before = cache.current_size();
		cache
			.apply(&AuthToken::UseValue {
				token_type: 1,
				value: Bytes::from_static(b"inline"),
			})
			.unwrap();
		assert_eq!(cache.current_size(), before);
	}
}
