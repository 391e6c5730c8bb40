//! # cellsock - Talking to a cellular modem's socket service.
//!
//! Copyright (c) Cambridge Consultants 2018.
//!
//! Dual MIT/Apache 2.0 licensed. See the top-level COPYRIGHT file for further
//! information and licensing.
//!
//! ## Overview
//!
//! A cellular modem with an embedded IP stack owns the real TCP (or TLS)
//! socket. We drive it with AT commands over a serial line - `AT+USOCR=6`
//! creates a socket, `AT+USOCO` connects it, `AT+USOWR` writes hex-encoded
//! data to it - and it tells us about things we didn't ask for with
//! Unsolicited Result Codes (URCs), such as `+UUSORD: 3,12` when twelve
//! bytes arrive on socket 3.
//!
//! This crate holds the vocabulary shared between a modem driver and the
//! things that use it:
//!
//! * `Modem` - the trait a command transport implements. It sends one
//!   `Command` at a time and reports a `Status` for it.
//! * `UrcHandler` / `UrcHandlers` - how interested parties register for the
//!   URCs a modem delivers.
//! * `Command` - pure formatting of every socket command we send.
//! * `Urc` - parsing of the socket URCs we care about.
//! * `SocketBuffer` / `SocketBuffers` - per-socket storage of inbound data.
//!
//! The `cellsock-client` crate builds a stream-socket client on top.
//!
//! ```
//! extern crate cellsock;
//! use cellsock::{Command, SocketBuffer, SocketBuffers, SocketId, Urc};
//!
//! # fn main() {
//! let socket = SocketId::new(3);
//! assert_eq!(Command::close(socket).as_str(), "AT+USOCL=3");
//! assert_eq!(
//! 	Command::write_hex(socket, b"\x00\xAB").as_str(),
//! 	"AT+USOWR=3,2,\"00AB\""
//! );
//!
//! match Urc::parse("+UUSORD: 3,4294967295") {
//! 	Some(urc) => assert!(urc.is_peer_closed()),
//! 	None => panic!("should parse"),
//! }
//!
//! let mut buffers = SocketBuffers::new();
//! buffers.push(socket, b"hi");
//! assert_eq!(buffers.available(socket), 2);
//! # }
//! ```

// ****************************************************************************
//
// Crates
//
// ****************************************************************************

#[macro_use]
extern crate log;

// ****************************************************************************
//
// Sub-modules
//
// ****************************************************************************

mod buffer;
mod command;
mod modem;
mod urc;

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::cell::RefCell;
use std::rc::Rc;

pub use buffer::{SocketBuffer, SocketBuffers};
pub use command::{parse_created_socket, parse_last_error, push_hex, Command, Host, SocketId};
pub use modem::{HandlerId, Modem, Reply, Status, UrcHandler, UrcHandlers};
pub use urc::{Urc, PEER_CLOSED};

// ****************************************************************************
//
// Public Types
//
// ****************************************************************************

/// The modem and the socket buffers are shared between every client that
/// uses them. Everything runs on one thread, so a `RefCell` is enough.
pub type Shared<T> = Rc<RefCell<T>>;

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

/// Wrap something up so it can be handed to several clients.
pub fn share<T>(value: T) -> Shared<T> {
	Rc::new(RefCell::new(value))
}

// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
