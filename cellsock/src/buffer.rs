//! # buffer - Inbound data, per socket
//!
//! The modem driver reads data off the modem (`AT+USORD`) when it hears a
//! `+UUSORD` and stashes it here. Clients take it out again.

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::collections::{HashMap, VecDeque};

use crate::command::SocketId;

// ****************************************************************************
//
// Public Types
//
// ****************************************************************************

/// Per-socket inbound byte queues.
pub trait SocketBuffer {
	/// Number of bytes ready to read. Negative means the peer has closed the
	/// socket and there's nothing left.
	fn available(&mut self, socket: SocketId) -> isize;
	/// Read up to `buf.len()` bytes. Returns how many were read.
	fn read(&mut self, socket: SocketId, buf: &mut [u8]) -> usize;
	/// The next byte, without taking it.
	fn peek(&mut self, socket: SocketId) -> Option<u8>;
	/// Throw away everything for this socket. The socket number may be
	/// handed out again afterwards.
	fn close(&mut self, socket: SocketId);
}

/// A simple in-memory `SocketBuffer`.
#[derive(Debug, Default)]
pub struct SocketBuffers {
	queues: HashMap<SocketId, Queue>,
}

// ****************************************************************************
//
// Private Types
//
// ****************************************************************************

#[derive(Debug, Default)]
struct Queue {
	data: VecDeque<u8>,
	/// The peer has gone - once `data` is empty, that's it
	shut: bool,
}

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl SocketBuffers {
	pub fn new() -> SocketBuffers {
		SocketBuffers::default()
	}

	/// Data has arrived for a socket.
	pub fn push(&mut self, socket: SocketId, data: &[u8]) {
		trace!("Buffering {} octets on socket {}", data.len(), socket);
		self.queues
			.entry(socket)
			.or_insert_with(Queue::default)
			.data
			.extend(data);
	}

	/// The peer has closed the socket. Anything already buffered can still
	/// be read.
	pub fn shutdown(&mut self, socket: SocketId) {
		debug!("Peer closed socket {}", socket);
		self.queues
			.entry(socket)
			.or_insert_with(Queue::default)
			.shut = true;
	}

	/// Is anything held for this socket?
	pub fn contains(&self, socket: SocketId) -> bool {
		self.queues.contains_key(&socket)
	}
}

impl SocketBuffer for SocketBuffers {
	fn available(&mut self, socket: SocketId) -> isize {
		match self.queues.get(&socket) {
			Some(q) if q.data.is_empty() && q.shut => -1,
			Some(q) => q.data.len() as isize,
			None => 0,
		}
	}

	fn read(&mut self, socket: SocketId, buf: &mut [u8]) -> usize {
		match self.queues.get_mut(&socket) {
			Some(q) => {
				let len = buf.len().min(q.data.len());
				for (dst, src) in buf.iter_mut().zip(q.data.drain(..len)) {
					*dst = src;
				}
				len
			}
			None => 0,
		}
	}

	fn peek(&mut self, socket: SocketId) -> Option<u8> {
		self.queues
			.get(&socket)
			.and_then(|q| q.data.front().cloned())
	}

	fn close(&mut self, socket: SocketId) {
		if let Some(q) = self.queues.remove(&socket) {
			if !q.data.is_empty() {
				debug!(
					"Dropping {} unread octets on socket {}",
					q.data.len(),
					socket
				);
			}
		}
	}
}

// ****************************************************************************
//
// Private Functions
//
// ****************************************************************************

// None

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn read_and_peek() {
		let s = SocketId::new(2);
		let mut b = SocketBuffers::new();
		assert_eq!(b.available(s), 0);
		assert_eq!(b.peek(s), None);
		b.push(s, b"hello");
		b.push(s, b" world");
		assert_eq!(b.available(s), 11);
		assert_eq!(b.peek(s), Some(b'h'));
		let mut buf = [0u8; 5];
		assert_eq!(b.read(s, &mut buf), 5);
		assert_eq!(&buf, b"hello");
		let mut rest = [0u8; 32];
		assert_eq!(b.read(s, &mut rest), 6);
		assert_eq!(&rest[..6], b" world");
		assert_eq!(b.available(s), 0);
	}

	#[test]
	fn shutdown_goes_negative_once_drained() {
		let s = SocketId::new(0);
		let mut b = SocketBuffers::new();
		b.push(s, b"ab");
		b.shutdown(s);
		assert_eq!(b.available(s), 2);
		let mut buf = [0u8; 2];
		assert_eq!(b.read(s, &mut buf), 2);
		assert_eq!(b.available(s), -1);
	}

	#[test]
	fn close_forgets_everything() {
		let s = SocketId::new(4);
		let mut b = SocketBuffers::new();
		b.push(s, b"junk");
		b.shutdown(s);
		b.close(s);
		assert!(!b.contains(s));
		assert_eq!(b.available(s), 0);
		// Closing twice is harmless
		b.close(s);
	}

	#[test]
	fn sockets_are_independent() {
		let mut b = SocketBuffers::new();
		b.push(SocketId::new(1), b"one");
		b.shutdown(SocketId::new(2));
		assert_eq!(b.available(SocketId::new(1)), 3);
		assert_eq!(b.available(SocketId::new(2)), -1);
	}
}

// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
