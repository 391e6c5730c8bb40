//! # config - Tunables for a `Client`

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::time::Duration;

// ****************************************************************************
//
// Public Types
//
// ****************************************************************************

/// How a `Client` behaves. Start from `ClientConfig::default()` and change
/// what you need.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	pub(crate) synchronous: bool,
	pub(crate) poll_interval: Duration,
	pub(crate) close_timeout: Duration,
	pub(crate) write_timeout: Duration,
	pub(crate) chunk_size: usize,
	pub(crate) not_allowed_marker: String,
}

// ****************************************************************************
//
// Public Data
//
// ****************************************************************************

/// `AT+USOWR` won't take more than this many octets at once
pub const MAX_CHUNK_SIZE: usize = 256;

// ****************************************************************************
//
// Private Data
//
// ****************************************************************************

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(120);

const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(120);

/// What u-blox firmware says when the socket can no longer be written to
const DEFAULT_NOT_ALLOWED_MARKER: &str = "Operation not allowed";

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl Default for ClientConfig {
	fn default() -> ClientConfig {
		ClientConfig {
			synchronous: true,
			poll_interval: DEFAULT_POLL_INTERVAL,
			close_timeout: DEFAULT_CLOSE_TIMEOUT,
			write_timeout: DEFAULT_WRITE_TIMEOUT,
			chunk_size: MAX_CHUNK_SIZE,
			not_allowed_marker: DEFAULT_NOT_ALLOWED_MARKER.to_owned(),
		}
	}
}

impl ClientConfig {
	/// If false, `connect`, `available` and friends return straight away
	/// while the modem is busy, and the caller must keep calling `advance`.
	pub fn synchronous(mut self, synchronous: bool) -> ClientConfig {
		self.synchronous = synchronous;
		self
	}

	/// How long to sleep between polls when waiting synchronously.
	pub fn poll_interval(mut self, interval: Duration) -> ClientConfig {
		self.poll_interval = interval;
		self
	}

	/// How long to wait for `AT+USOCL`.
	pub fn close_timeout(mut self, timeout: Duration) -> ClientConfig {
		self.close_timeout = timeout;
		self
	}

	/// How long to wait for each `AT+USOWR`.
	pub fn write_timeout(mut self, timeout: Duration) -> ClientConfig {
		self.write_timeout = timeout;
		self
	}

	/// Octets per `AT+USOWR`, clamped to `1..=MAX_CHUNK_SIZE`.
	pub fn chunk_size(mut self, size: usize) -> ClientConfig {
		self.chunk_size = size.max(1).min(MAX_CHUNK_SIZE);
		self
	}

	/// Error text which means the socket can't be written to any more. A
	/// write failure mentioning it closes the socket.
	pub fn not_allowed_marker<S: Into<String>>(mut self, marker: S) -> ClientConfig {
		self.not_allowed_marker = marker.into();
		self
	}

	pub fn is_synchronous(&self) -> bool {
		self.synchronous
	}

	pub fn get_chunk_size(&self) -> usize {
		self.chunk_size
	}
}


// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
