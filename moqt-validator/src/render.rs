//! Render a decoded [Record] as indented text or JSON.
//!
//! Byte fields render as lowercase hex. Payload fields are summarized
//! as `<N bytes>` once they reach [PAYLOAD_SUMMARY_THRESHOLD]; the
//! decoder hands us the raw bytes and the hint, the cutoff lives here.

use std::fmt::Write;

use moqt_wire::{Record, Value};

pub const PAYLOAD_SUMMARY_THRESHOLD: usize = 100;

fn payload_str(bytes: &[u8]) -> String {
	match bytes.len() >= PAYLOAD_SUMMARY_THRESHOLD {
		true => format!("<{} bytes>", bytes.len()),
		false => hex::encode(bytes),
	}
}

pub fn to_text(record: &Record) -> String {
	let mut out = String::new();
	write_record(&mut out, record, 0);
	out
}

fn write_record(out: &mut String, record: &Record, indent: usize) {
	let prefix = "  ".repeat(indent);

	for (key, value) in record.fields() {
		match value {
			Value::Record(nested) => {
				let _ = writeln!(out, "{prefix}{key}:");
				write_record(out, nested, indent + 1);
			}
			Value::List(items) => {
				let _ = writeln!(out, "{prefix}{key}:");
				for item in items {
					match item {
						Value::Record(nested) => write_record(out, nested, indent + 1),
						scalar => {
							let _ = writeln!(out, "{prefix}  - {}", scalar_str(scalar));
						}
					}
				}
			}
			scalar => {
				let _ = writeln!(out, "{prefix}{key}: {}", scalar_str(scalar));
			}
		}
	}
}

fn scalar_str(value: &Value) -> String {
	match value {
		Value::U64(v) => v.to_string(),
		Value::Bool(v) => v.to_string(),
		Value::Str(v) => v.clone(),
		Value::Bytes(bytes) => hex::encode(bytes),
		Value::Payload(bytes) => payload_str(bytes),
		Value::Null => "null".to_string(),
		Value::List(_) | Value::Record(_) => unreachable!("handled by write_record"),
	}
}

pub fn to_json(record: &Record) -> serde_json::Value {
	let mut map = serde_json::Map::new();
	for (key, value) in record.fields() {
		map.insert(key.to_string(), value_to_json(value));
	}
	serde_json::Value::Object(map)
}

fn value_to_json(value: &Value) -> serde_json::Value {
	match value {
		Value::U64(v) => serde_json::Value::from(*v),
		Value::Bool(v) => serde_json::Value::from(*v),
		Value::Str(v) => serde_json::Value::from(v.as_str()),
		Value::Bytes(bytes) => serde_json::Value::from(hex::encode(bytes)),
		Value::Payload(bytes) => serde_json::Value::from(payload_str(bytes)),
		Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
		Value::Record(nested) => to_json(nested),
		Value::Null => serde_json::Value::Null,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bytes::Bytes;

	#[test]
	fn payload_cutoff() {
		let mut record = Record::new();
		record.push("small", Value::Payload(Bytes::from(vec![0xab; 3])));
		record.push("large", Value::Payload(Bytes::from(vec![0xab; 150])));

		let json = to_json(&record);
		assert_eq!(json["small"], "ababab");
		assert_eq!(json["large"], "<150 bytes>");
	}

	#[test]
	fn bytes_always_hex() {
		let mut record = Record::new();
		record.push("name", Value::Bytes(Bytes::from(vec![0xcd; 150])));

		let json = to_json(&record);
		assert_eq!(json["name"], "cd".repeat(150));
	}

	#[test]
	fn text_layout() {
		let mut inner = Record::new();
		inner.push("group", 5u64);

		let mut record = Record::new();
		record.push("type", "SUBSCRIBE");
		record.push("start_location", inner);
		record.push("versions", Value::List(vec![Value::Str("0x01".into())]));

		let text = to_text(&record);
		assert_eq!(
			text,
			"type: SUBSCRIBE\nstart_location:\n  group: 5\nversions:\n  - 0x01\n"
		);
	}
}
