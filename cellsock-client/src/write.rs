//! # write - Sending data
//!
//! `AT+USOWR` takes the data as hex, at most `MAX_CHUNK_SIZE` octets per
//! command, so a write turns into one command per chunk. In synchronous
//! write mode we wait for every chunk to be accepted and stop at the first
//! one that isn't.

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::io;

use cellsock::{Command, Modem, SocketBuffer};

use crate::error::Error;
use crate::fsm::Readiness;
use crate::Client;

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl<M: Modem, B: SocketBuffer> Client<M, B> {
	/// Start a batch of writes. With `sync` false, chunks are sent without
	/// waiting for the modem to accept them.
	pub fn begin_write(&mut self, sync: bool) {
		self.write_sync = sync;
	}

	/// End a batch of writes. Always goes back to synchronous writes.
	pub fn end_write(&mut self) {
		self.write_sync = true;
	}

	/// Send some data. Returns how many octets went out, which is less than
	/// `data.len()` if the modem rejected a chunk (and zero if there's no
	/// socket, or the modem is busy and we're not waiting).
	pub fn write(&mut self, data: &[u8]) -> usize {
		if self.write_sync {
			self.wait_idle();
		} else if self.advance() == Readiness::Busy {
			return 0;
		}

		let socket = match self.link.socket() {
			Some(s) => s,
			None => {
				debug!("Write of {} with no socket", data.len());
				return 0;
			}
		};

		let mut written = 0;
		for chunk in data.chunks(self.config.chunk_size) {
			self.send(&Command::write_hex(socket, chunk));
			if self.write_sync {
				let reply = self
					.modem
					.borrow_mut()
					.wait_for_response(self.config.write_timeout);
				if !reply.status.is_ok() {
					if reply.mentions(&self.config.not_allowed_marker) {
						warn!("Socket {} no longer writable", socket);
						self.stop();
					} else {
						warn!(
							"Write on socket {} gave {:?} after {} octets",
							socket, reply.status, written
						);
					}
					break;
				}
			}
			written += chunk.len();
		}
		trace!("Wrote {} of {} on socket {}", written, data.len(), socket);
		written
	}

	pub fn write_byte(&mut self, b: u8) -> usize {
		self.write(&[b])
	}
}

impl<M: Modem, B: SocketBuffer> io::Write for Client<M, B> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		if buf.is_empty() {
			return Ok(0);
		}
		match Client::write(self, buf) {
			0 if self.is_open() => Err(Error::Busy.into()),
			0 => Err(Error::NotConnected.into()),
			n => Ok(n),
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
