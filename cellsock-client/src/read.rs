//! # read - Receiving data, and checking the connection is still there

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::io;

use cellsock::{Modem, SocketBuffer};

use crate::error::Error;
use crate::fsm::{Readiness, State};
use crate::Client;

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl<M: Modem, B: SocketBuffer> Client<M, B> {
	/// Octets ready to read. If the peer has closed the socket and there's
	/// nothing left, the socket is closed and this returns zero.
	pub fn available(&mut self) -> usize {
		if self.config.synchronous {
			self.wait_idle();
		} else if self.advance() == Readiness::Busy {
			return 0;
		}

		let socket = match self.link.socket() {
			Some(s) => s,
			None => return 0,
		};

		let avail = self.buffers.borrow_mut().available(socket);
		if avail < 0 {
			debug!("Socket {} drained and closed by peer", socket);
			self.stop();
			return 0;
		}
		avail as usize
	}

	/// Read what's buffered, up to `buf.len()` octets.
	pub fn read(&mut self, buf: &mut [u8]) -> usize {
		if buf.is_empty() || !self.is_open() {
			return 0;
		}
		if self.available() == 0 {
			return 0;
		}
		match self.link.socket() {
			Some(socket) => self.buffers.borrow_mut().read(socket, buf),
			None => 0,
		}
	}

	pub fn read_byte(&mut self) -> Option<u8> {
		let mut b = [0u8; 1];
		if self.read(&mut b) == 1 {
			Some(b[0])
		} else {
			None
		}
	}

	/// The next octet, left in the buffer.
	pub fn peek(&mut self) -> Option<u8> {
		if self.available() == 0 {
			return None;
		}
		let socket = self.link.socket()?;
		self.buffers.borrow_mut().peek(socket)
	}

	/// Is the socket still usable? If we find out it isn't - the peer has
	/// closed it, or it never came up - it's closed.
	///
	/// A connection still being opened isn't usable yet, but it is left
	/// alone.
	pub fn connected(&mut self) -> bool {
		self.modem.borrow_mut().poll();

		let socket = match self.link.socket() {
			Some(s) => s,
			None => return false,
		};

		if self.buffers.borrow_mut().available(socket) < 0 {
			self.stop();
			return false;
		}

		if !self.link.connected() {
			if self.state == State::Idle {
				debug!("Socket {} isn't connected", socket);
				self.stop();
			}
			return false;
		}

		true
	}

	/// Nothing to do - writes go straight to the modem.
	pub fn flush(&mut self) {}
}

impl<M: Modem, B: SocketBuffer> io::Read for Client<M, B> {
	/// `Ok(0)` means the connection has gone. No data yet is `WouldBlock`.
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if buf.is_empty() {
			return Ok(0);
		}
		match Client::read(self, buf) {
			0 if self.is_open() => Err(Error::Busy.into()),
			0 => Ok(0),
			n => Ok(n),
		}
	}
}

// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
