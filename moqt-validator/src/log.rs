use clap::Args;
use tracing_subscriber::EnvFilter;

/// Logging flags, shared by any binary that embeds the decoder.
#[derive(Args, Clone)]
pub struct Log {
	/// Log level (error, warn, info, debug, trace).
	#[arg(long, default_value = "warn")]
	pub log_level: tracing::Level,
}

impl Log {
	pub fn init(&self) {
		let filter = EnvFilter::builder()
			.with_default_directive(self.log_level.into())
			.from_env_lossy();

		tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_writer(std::io::stderr)
			.init();
	}
}
