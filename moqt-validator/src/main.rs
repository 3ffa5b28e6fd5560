//! Command-line front end for the MoQT wire validator.
//!
//! Bytes come in as hex or a file, get decoded against a fresh session,
//! and the resulting record renders as indented text or JSON. On
//! failure the process exits with the error's session-termination code.

mod log;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use moqt_wire::{Record, SessionState};

#[derive(Parser)]
#[command(name = "moqt-validator", about = "Decode and validate MoQT wire-format messages")]
struct Cli {
	#[command(flatten)]
	log: log::Log,

	/// Hex-encoded message bytes; whitespace is ignored.
	#[arg(long, conflicts_with = "file")]
	hex: Option<String>,

	/// Read the message bytes from a file.
	#[arg(long)]
	file: Option<PathBuf>,

	/// Which channel the bytes were captured from.
	#[arg(long, value_enum, default_value_t = Channel::Control)]
	channel: Channel,

	/// Output the decoded record as JSON.
	#[arg(long)]
	json: bool,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq)]
enum Channel {
	Control,
	Stream,
	Datagram,
}

impl Channel {
	fn name(&self) -> &'static str {
		match self {
			Self::Control => "CONTROL",
			Self::Stream => "STREAM",
			Self::Datagram => "DATAGRAM",
		}
	}
}

fn read_input(cli: &Cli) -> anyhow::Result<Vec<u8>> {
	if let Some(hex_str) = &cli.hex {
		let clean: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();
		return hex::decode(clean).context("invalid hex input");
	}

	if let Some(path) = &cli.file {
		return std::fs::read(path).with_context(|| format!("reading {}", path.display()));
	}

	anyhow::bail!("provide either --hex or --file")
}

fn main() {
	let cli = Cli::parse();
	cli.log.init();

	let data = match read_input(&cli) {
		Ok(data) => data,
		Err(err) => {
			eprintln!("{err:#}");
			std::process::exit(1);
		}
	};

	let mut session = SessionState::new();
	let result: Result<Record, _> = match cli.channel {
		Channel::Control => session.validate_control(&data).map(|msg| msg.record()),
		Channel::Stream => session.validate_stream(&data).map(|stream| stream.record()),
		Channel::Datagram => session.validate_datagram(&data).map(|datagram| datagram.record()),
	};

	let record = match result {
		Ok(record) => record,
		Err(err) => {
			eprintln!("validation failed: {err}");
			std::process::exit(u64::from(err.code()) as i32);
		}
	};

	if cli.json {
		println!("{}", serde_json::to_string_pretty(&render::to_json(&record)).expect("json render"));
	} else {
		println!("=== MoQT {} Message Validation ===", cli.channel.name());
		print!("{}", render::to_text(&record));
		println!();
		println!("validation successful");
	}
}
