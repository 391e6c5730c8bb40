//! # link - The state a client shares with its URC handler
//!
//! URCs arrive from inside the modem driver whenever it likes, so the
//! handler can't borrow the `Client`. It gets the socket number and the
//! connected flag instead, and nothing else.

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::cell::Cell;

use cellsock::{SocketId, Urc, UrcHandler};

// ****************************************************************************
//
// Public Types
//
// ****************************************************************************

pub(crate) struct Link {
	socket: Cell<Option<SocketId>>,
	connected: Cell<bool>,
}

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl Link {
	pub fn new(socket: Option<SocketId>, connected: bool) -> Link {
		Link {
			socket: Cell::new(socket),
			connected: Cell::new(connected && socket.is_some()),
		}
	}

	pub fn socket(&self) -> Option<SocketId> {
		self.socket.get()
	}

	pub fn connected(&self) -> bool {
		self.connected.get()
	}

	/// Now connected - only valid while we have a socket.
	pub fn set_connected(&self) {
		if self.socket.get().is_some() {
			self.connected.set(true);
		}
	}

	pub fn set_socket(&self, socket: SocketId) {
		self.socket.set(Some(socket));
	}

	/// Forget the socket. Not connected without one.
	pub fn clear(&self) {
		self.socket.set(None);
		self.connected.set(false);
	}
}

impl UrcHandler for Link {
	/// Only a peer-close on our own socket matters here. Data arriving is
	/// the socket buffer's business.
	fn handle_urc(&self, urc: &str) {
		match Urc::parse(urc) {
			Some(ref urc) if Some(urc.socket()) == self.socket.get() => {
				if urc.is_peer_closed() {
					info!("Socket {} closed by peer", urc.socket());
					self.connected.set(false);
				}
			}
			_ => {}
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn peer_close_on_our_socket() {
		let link = Link::new(Some(SocketId::new(3)), true);
		link.handle_urc("+UUSORD: 3,20");
		assert!(link.connected());
		link.handle_urc("+UUSORD: 2,4294967295");
		assert!(link.connected());
		link.handle_urc("+UUSORD: 3,4294967295");
		assert!(!link.connected());
		assert_eq!(link.socket(), Some(SocketId::new(3)));
	}

	#[test]
	fn no_socket_ignores_everything() {
		let link = Link::new(None, true);
		assert!(!link.connected());
		link.handle_urc("+UUSORD: 0,4294967295");
		link.set_connected();
		assert!(!link.connected());
	}
}

// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
