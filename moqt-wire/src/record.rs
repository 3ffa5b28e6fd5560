//! The decoded-record tree handed to renderers.
//!
//! Decoded messages stay typed inside the crate; a [Record] is the
//! flattened key/value view a host renders as text or JSON. Byte fields
//! come in two flavors: [Value::Bytes] is always hex-encoded by
//! renderers, while [Value::Payload] is a hint that the renderer may
//! summarize large payloads instead of dumping them.

use bytes::Bytes;

use crate::{
	data::{DataStream, Datagram, ExtensionHeader, FetchObject, FetchStream, SubgroupObject, SubgroupStream},
	message::{
		AuthToken, ControlMessage, Fetch, FetchType, ParameterValue, SetupParameter, Subscribe, SubscribeOk,
		TrackStatusRequest, VersionParameter,
	},
	FullTrackName, Location, TrackNamespace,
};

/// One node in a record tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	U64(u64),
	Bool(bool),
	Str(String),
	Bytes(Bytes),
	Payload(Bytes),
	List(Vec<Value>),
	Record(Record),
	Null,
}

impl From<u64> for Value {
	fn from(v: u64) -> Self {
		Self::U64(v)
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Self::Bool(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Self::Str(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Self::Str(v)
	}
}

impl From<Bytes> for Value {
	fn from(v: Bytes) -> Self {
		Self::Bytes(v)
	}
}

impl From<Record> for Value {
	fn from(v: Record) -> Self {
		Self::Record(v)
	}
}

/// An ordered list of named values; field order follows the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
	fields: Vec<(&'static str, Value)>,
}

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, key: &'static str, value: impl Into<Value>) {
		self.fields.push((key, value.into()));
	}

	pub fn fields(&self) -> &[(&'static str, Value)] {
		&self.fields
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
	}
}

fn location_record(location: &Location) -> Record {
	let mut rec = Record::new();
	rec.push("group", location.group);
	rec.push("object", location.object);
	rec
}

fn namespace_value(namespace: &TrackNamespace) -> Value {
	Value::List(namespace.fields().iter().map(|f| Value::Bytes(f.clone())).collect())
}

fn push_full_track_name(rec: &mut Record, name: &FullTrackName) {
	rec.push("track_namespace", namespace_value(&name.namespace));
	rec.push("track_name", name.name.clone());
}

fn auth_token_fields(rec: &mut Record, token: &AuthToken) {
	rec.push("alias_type", token.name());
	if let Some(alias) = token.alias() {
		rec.push("token_alias", alias);
	}
	match token {
		AuthToken::Register { token_type, value, .. } | AuthToken::UseValue { token_type, value } => {
			rec.push("token_type", *token_type);
			rec.push("token_value", value.clone());
			rec.push("token_value_length", value.len() as u64);
		}
		_ => {}
	}
}

fn parameter_value_fields(rec: &mut Record, value: &ParameterValue) {
	match value {
		ParameterValue::VarInt(v) => rec.push("value", *v),
		ParameterValue::Bytes(bytes) => {
			rec.push("value", bytes.clone());
			rec.push("length", bytes.len() as u64);
		}
	}
}

fn setup_parameters_value(params: &[SetupParameter]) -> Value {
	Value::List(
		params
			.iter()
			.map(|p| {
				let mut rec = Record::new();
				rec.push("type", u64::from(p.kind));
				if let Some(name) = p.kind.name() {
					rec.push("name", name);
				}
				parameter_value_fields(&mut rec, &p.value);
				Value::Record(rec)
			})
			.collect(),
	)
}

fn version_parameters_value(params: &[VersionParameter]) -> Value {
	Value::List(
		params
			.iter()
			.map(|p| {
				let mut rec = Record::new();
				rec.push("type", u64::from(p.kind));
				if let Some(name) = p.kind.name() {
					rec.push("name", name);
				}
				parameter_value_fields(&mut rec, &p.value);
				if let Some(token) = &p.token {
					auth_token_fields(&mut rec, token);
				}
				Value::Record(rec)
			})
			.collect(),
	)
}

fn push_version_parameters(rec: &mut Record, params: &[VersionParameter]) {
	rec.push("num_parameters", params.len() as u64);
	if !params.is_empty() {
		rec.push("parameters", version_parameters_value(params));
	}
}

fn extension_headers_value(headers: &[ExtensionHeader]) -> Value {
	Value::List(
		headers
			.iter()
			.map(|h| {
				let mut rec = Record::new();
				rec.push("type", u64::from(h.kind));
				if let Some(name) = h.kind.name() {
					rec.push("name", name);
				}
				parameter_value_fields(&mut rec, &h.value);
				Value::Record(rec)
			})
			.collect(),
	)
}

fn version_str(version: u64) -> String {
	format!("{version:#010x}")
}

impl ControlMessage {
	/// Project the message into the renderer-facing record tree.
	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.push("type", self.kind().name());
		rec.push("type_value", u64::from(self.kind()));

		match self {
			Self::ClientSetup(msg) => {
				rec.push("num_versions", msg.versions.len() as u64);
				rec.push(
					"supported_versions",
					Value::List(msg.versions.iter().map(|v| Value::Str(version_str(*v))).collect()),
				);
				rec.push("num_parameters", msg.parameters.len() as u64);
				rec.push("parameters", setup_parameters_value(&msg.parameters));
			}
			Self::ServerSetup(msg) => {
				rec.push("selected_version", version_str(msg.version));
				rec.push("num_parameters", msg.parameters.len() as u64);
				rec.push("parameters", setup_parameters_value(&msg.parameters));
			}
			Self::Subscribe(msg) => msg.project(&mut rec),
			Self::SubscribeOk(msg) => msg.project(&mut rec),
			Self::Fetch(msg) => msg.project(&mut rec),
			Self::Announce(msg) => {
				rec.push("request_id", msg.request_id);
				rec.push("track_namespace", namespace_value(&msg.namespace));
				push_version_parameters(&mut rec, &msg.parameters);
			}
			Self::Goaway(msg) => match &msg.new_session_uri {
				Some(uri) => rec.push("new_session_uri", uri.clone()),
				None => rec.push("new_session_uri", Value::Null),
			},
			Self::MaxRequestId(msg) => {
				rec.push("max_request_id", msg.request_id);
			}
			Self::TrackStatusRequest(msg) => msg.project(&mut rec),
			Self::Opaque { payload, .. } => {
				rec.push("raw_payload", payload.clone());
			}
		}

		rec
	}
}

impl Subscribe {
	fn project(&self, rec: &mut Record) {
		rec.push("request_id", self.request_id);
		rec.push("track_alias", self.track_alias);
		push_full_track_name(rec, &self.full_track_name);
		rec.push("subscriber_priority", self.subscriber_priority as u64);
		rec.push("group_order", self.group_order.name());
		rec.push("forward", self.forward);
		rec.push("filter_type", self.filter_type.name());
		if let Some(start) = &self.start {
			rec.push("start_location", location_record(start));
		}
		if let Some(end_group) = self.end_group {
			rec.push("end_group", end_group);
		}
		push_version_parameters(rec, &self.parameters);
	}
}

impl SubscribeOk {
	fn project(&self, rec: &mut Record) {
		rec.push("request_id", self.request_id);
		rec.push("expires_ms", self.expires_ms);
		rec.push("group_order", self.group_order.name());
		rec.push("content_exists", self.content_exists);
		if let Some(largest) = &self.largest {
			rec.push("largest_location", location_record(largest));
		}
		push_version_parameters(rec, &self.parameters);
	}
}

impl Fetch {
	fn project(&self, rec: &mut Record) {
		rec.push("request_id", self.request_id);
		rec.push("subscriber_priority", self.subscriber_priority as u64);
		rec.push("group_order", self.group_order.name());
		rec.push("fetch_type", self.fetch_type.name());
		match &self.fetch_type {
			FetchType::Standalone {
				full_track_name,
				start,
				end,
			} => {
				push_full_track_name(rec, full_track_name);
				rec.push("start", location_record(start));
				rec.push("end", location_record(end));
			}
			FetchType::RelativeJoining {
				joining_subscribe_id,
				joining_start,
			}
			| FetchType::AbsoluteJoining {
				joining_subscribe_id,
				joining_start,
			} => {
				rec.push("joining_subscribe_id", *joining_subscribe_id);
				rec.push("joining_start", *joining_start);
			}
		}
		push_version_parameters(rec, &self.parameters);
	}
}

impl TrackStatusRequest {
	fn project(&self, rec: &mut Record) {
		rec.push("request_id", self.request_id);
		push_full_track_name(rec, &self.full_track_name);
		push_version_parameters(rec, &self.parameters);
	}
}

fn push_object_body(rec: &mut Record, extensions: &[ExtensionHeader], status: &str, payload: &Option<Bytes>) {
	if !extensions.is_empty() {
		rec.push("extension_headers", extension_headers_value(extensions));
	}
	rec.push("payload_length", payload.as_ref().map(|p| p.len() as u64).unwrap_or(0));
	rec.push("status", status);
	if let Some(payload) = payload {
		rec.push("payload", Value::Payload(payload.clone()));
	}
}

impl SubgroupObject {
	fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.push("object_id", self.object_id);
		push_object_body(&mut rec, &self.extensions, self.status.name(), &self.payload);
		rec
	}
}

impl SubgroupStream {
	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.push("stream_type", u64::from(self.header_type));
		rec.push("header_type", "SUBGROUP_HEADER");
		rec.push("subgroup_id_present", self.header_type.has_explicit_subgroup_id());
		rec.push("extensions_present", self.header_type.has_extensions());
		rec.push("track_alias", self.track_alias);
		rec.push("group_id", self.group_id);
		if let Some(subgroup_id) = self.subgroup_id() {
			rec.push("subgroup_id", subgroup_id);
		}
		rec.push("publisher_priority", self.publisher_priority as u64);
		rec.push("object_count", self.objects.len() as u64);
		rec.push(
			"objects",
			Value::List(self.objects.iter().map(|o| Value::Record(o.record())).collect()),
		);
		rec
	}
}

impl FetchObject {
	fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.push("group_id", self.group_id);
		rec.push("subgroup_id", self.subgroup_id);
		rec.push("object_id", self.object_id);
		rec.push("publisher_priority", self.publisher_priority as u64);
		push_object_body(&mut rec, &self.extensions, self.status.name(), &self.payload);
		rec
	}
}

impl FetchStream {
	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.push("stream_type", Self::TYPE);
		rec.push("header_type", "FETCH_HEADER");
		rec.push("request_id", self.request_id);
		rec.push("object_count", self.objects.len() as u64);
		rec.push(
			"objects",
			Value::List(self.objects.iter().map(|o| Value::Record(o.record())).collect()),
		);
		rec
	}
}

impl DataStream {
	pub fn record(&self) -> Record {
		match self {
			Self::Subgroup(stream) => stream.record(),
			Self::Fetch(stream) => stream.record(),
		}
	}
}

impl Datagram {
	pub fn record(&self) -> Record {
		let mut rec = Record::new();
		rec.push("type", self.kind.name());
		rec.push("type_value", u64::from(self.kind));
		rec.push("track_alias", self.track_alias);
		rec.push("group_id", self.group_id);
		rec.push("object_id", self.object_id);
		rec.push("publisher_priority", self.publisher_priority as u64);
		if !self.extensions.is_empty() {
			rec.push("extension_headers", extension_headers_value(&self.extensions));
		}
		match &self.payload {
			Some(payload) => {
				rec.push("payload_length", payload.len() as u64);
				rec.push("payload", Value::Payload(payload.clone()));
			}
			None => rec.push("status", self.status.name()),
		}
		rec
	}
}
