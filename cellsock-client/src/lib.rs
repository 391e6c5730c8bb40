//! # cellsock-client - A TCP/TLS client on the far side of a modem
//!
//! Copyright (c) Cambridge Consultants 2018.
//!
//! Dual MIT/Apache 2.0 licensed. See the top-level COPYRIGHT file for further
//! information and licensing.
//!
//! A `Client` looks like a stream socket - `connect`, `write`, `read`,
//! `available`, `connected`, `stop` - but the socket really lives inside a
//! cellular modem and everything is done with AT commands. Opening a
//! connection takes several command round trips (create the socket, maybe
//! turn on TLS and pick a security profile, then connect), each of which can
//! fail or time out.
//!
//! The sequence is run by a small state machine. `advance` moves it on by
//! at most one step and never blocks, so a `Client` can be driven from a
//! polling loop. In synchronous mode (the default) the API calls pump
//! `advance` themselves, sleeping `poll_interval` between goes, so they
//! return only when the work is done.
//!
//! The modem tells us the far end has gone via a `+UUSORD` URC with a
//! length of 4294967295. Each client registers for URCs when it is made and
//! unregisters when it is dropped; the URC only clears a flag, and the
//! teardown happens the next time the caller asks `connected`.
//!
//! Outgoing data is hex encoded and sent in chunks of at most 256 octets,
//! waiting for each to be accepted unless a `begin_write(false)` /
//! `end_write()` bracket says otherwise.
//!
//! ```no_run
//! extern crate cellsock;
//! extern crate cellsock_client;
//!
//! use cellsock_client::{Client, ClientConfig, Destination};
//! # use cellsock::{Command, HandlerId, Modem, Reply, SocketBuffers, Status, UrcHandler};
//! # use std::rc::Rc;
//! # use std::time::Duration;
//! # struct Serial;
//! # impl Modem for Serial {
//! # 	fn ready(&mut self) -> Status { Status::Ok }
//! # 	fn send(&mut self, _c: &Command) {}
//! # 	fn take_response(&mut self) -> Vec<String> { Vec::new() }
//! # 	fn wait_for_response(&mut self, _t: Duration) -> Reply { Reply::new(Status::Ok, Vec::new()) }
//! # 	fn poll(&mut self) {}
//! # 	fn add_urc_handler(&mut self, _h: Rc<dyn UrcHandler>) -> HandlerId { HandlerId::default() }
//! # 	fn remove_urc_handler(&mut self, _id: HandlerId) {}
//! # }
//!
//! # fn main() {
//! let modem = cellsock::share(Serial);
//! let buffers = cellsock::share(SocketBuffers::new());
//! let mut client = Client::new(modem, buffers, ClientConfig::default());
//! if client.connect(Destination::tls("example.com", 443)).is_ok() {
//! 	client.write(b"GET / HTTP/1.0\r\n\r\n");
//! 	let mut buf = [0u8; 128];
//! 	while client.connected() {
//! 		let len = client.read(&mut buf);
//! 		println!("{}", String::from_utf8_lossy(&buf[..len]));
//! 	}
//! }
//! # }
//! ```

// ****************************************************************************
//
// Crates
//
// ****************************************************************************

extern crate cellsock;
#[macro_use]
extern crate log;

// ****************************************************************************
//
// Sub-modules
//
// ****************************************************************************

mod config;
mod error;
mod fsm;
mod link;
mod read;
mod write;

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::rc::Rc;

use cellsock::{HandlerId, Modem, Shared, SocketBuffer, SocketId};

use crate::link::Link;

pub use crate::config::{ClientConfig, MAX_CHUNK_SIZE};
pub use crate::error::Error;
pub use crate::fsm::{ConnectStatus, Destination, Readiness, State};

// ****************************************************************************
//
// Public Types
//
// ****************************************************************************

/// A stream socket on the far side of a modem.
pub struct Client<M: Modem, B: SocketBuffer> {
	/// The command transport, shared with other clients
	modem: Shared<M>,
	/// Inbound data for every socket, shared with other clients
	buffers: Shared<B>,
	/// The socket number and connected flag. The URC handler sees this too.
	link: Rc<Link>,
	/// What the modem knows our URC handler as
	urc_handler: HandlerId,
	/// Where we are in the open/close sequence
	state: State,
	/// Where we're connecting to
	destination: Option<Destination>,
	/// `AT+USOER` has gone out and we haven't seen the reply yet
	awaiting_error_code: bool,
	/// Wait for each chunk to be accepted
	write_sync: bool,
	config: ClientConfig,
}

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl<M: Modem, B: SocketBuffer> Client<M, B> {
	/// Make a client with no socket.
	pub fn new(modem: Shared<M>, buffers: Shared<B>, config: ClientConfig) -> Client<M, B> {
		Client::with_link(modem, buffers, Link::new(None, false), config)
	}

	/// Wrap a socket the modem has already connected (one accepted by a
	/// listening socket, say).
	pub fn from_socket(
		modem: Shared<M>,
		buffers: Shared<B>,
		socket: SocketId,
		config: ClientConfig,
	) -> Client<M, B> {
		Client::with_link(modem, buffers, Link::new(Some(socket), true), config)
	}

	/// The modem's number for our socket, if we have one.
	pub fn socket(&self) -> Option<SocketId> {
		self.link.socket()
	}

	/// Do we have a socket? It may not be connected (yet, or any more).
	pub fn is_open(&self) -> bool {
		self.link.socket().is_some()
	}

	/// The cached connected flag, as it stands. Unlike `connected` this
	/// doesn't talk to the modem or tear anything down.
	pub fn is_established(&self) -> bool {
		self.link.connected()
	}

	pub fn state(&self) -> State {
		self.state
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}
}

impl<M: Modem, B: SocketBuffer> Drop for Client<M, B> {
	fn drop(&mut self) {
		match self.modem.try_borrow_mut() {
			Ok(mut modem) => modem.remove_urc_handler(self.urc_handler),
			Err(_) => warn!("Modem busy; URC handler {} left behind", self.urc_handler),
		}
	}
}

// ****************************************************************************
//
// Private Functions
//
// ****************************************************************************

impl<M: Modem, B: SocketBuffer> Client<M, B> {
	fn with_link(
		modem: Shared<M>,
		buffers: Shared<B>,
		link: Link,
		config: ClientConfig,
	) -> Client<M, B> {
		let link = Rc::new(link);
		let urc_handler = modem.borrow_mut().add_urc_handler(link.clone());
		debug!("New client, URC handler {}", urc_handler);
		Client {
			modem,
			buffers,
			link,
			urc_handler,
			state: State::Idle,
			destination: None,
			awaiting_error_code: false,
			write_sync: true,
			config,
		}
	}
}

// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
