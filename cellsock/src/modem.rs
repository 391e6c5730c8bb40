//! # modem - What we need from a modem driver
//!
//! The driver owns the serial line. It sends one command at a time, works
//! out which response lines belong to that command, and hands everything
//! else (the URCs) to whoever has registered an interest.

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::command::Command;

// ****************************************************************************
//
// Public Types
//
// ****************************************************************************

/// How the last command got on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Status {
	/// Still waiting for the final result code
	Pending,
	/// `OK`
	Ok,
	/// `ERROR`
	Error,
	/// `+CME ERROR: <text>` - the text is in the captured response
	CmeError,
	/// The modem said nothing in time
	Timeout,
}

/// A completed command: the final status plus any information lines (and
/// error text) captured on the way.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Reply {
	pub status: Status,
	pub lines: Vec<String>,
}

/// A command transport.
///
/// Only one command is outstanding at a time. While it is, `ready` returns
/// `Status::Pending`. Once the final result code arrives, `ready` keeps
/// returning that status until the next `send`.
pub trait Modem {
	/// Service the serial line and report on the last command.
	fn ready(&mut self) -> Status;
	/// Start sending a command. Doesn't wait for the result.
	fn send(&mut self, command: &Command);
	/// Take the lines captured for the last completed command.
	fn take_response(&mut self) -> Vec<String>;
	/// Block until the outstanding command completes, or `timeout` passes
	/// (giving `Status::Timeout`).
	fn wait_for_response(&mut self, timeout: Duration) -> Reply;
	/// General housekeeping; delivers any URCs that have arrived.
	fn poll(&mut self);
	/// Start delivering URCs to `handler`.
	fn add_urc_handler(&mut self, handler: Rc<dyn UrcHandler>) -> HandlerId;
	/// Stop delivering URCs to a handler added earlier.
	fn remove_urc_handler(&mut self, id: HandlerId);
}

/// Something that wants to see URCs. Handlers are called from inside the
/// modem driver, so they must not call back in to it.
pub trait UrcHandler {
	fn handle_urc(&self, urc: &str);
}

/// Identifies a registered `UrcHandler`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HandlerId(usize);

/// The list of URC handlers a modem driver keeps. Handlers see URCs in the
/// order they registered.
#[derive(Default)]
pub struct UrcHandlers {
	next_id: HandlerId,
	handlers: Vec<(HandlerId, Rc<dyn UrcHandler>)>,
}

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl Status {
	pub fn is_pending(&self) -> bool {
		*self == Status::Pending
	}

	pub fn is_ok(&self) -> bool {
		*self == Status::Ok
	}
}

impl Reply {
	pub fn new(status: Status, lines: Vec<String>) -> Reply {
		Reply { status, lines }
	}

	/// Does any captured line mention `marker`?
	pub fn mentions(&self, marker: &str) -> bool {
		self.lines.iter().any(|l| l.contains(marker))
	}
}

impl HandlerId {
	/// Grab a copy of the current value, while incrementing it ready for the
	/// next use.
	pub fn take(&mut self) -> HandlerId {
		let result = HandlerId(self.0);
		self.0 = self.0.wrapping_add(1);
		result
	}
}

impl Default for HandlerId {
	fn default() -> HandlerId {
		HandlerId(0)
	}
}

impl fmt::Display for HandlerId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "HandlerId({})", self.0)
	}
}

impl UrcHandlers {
	pub fn new() -> UrcHandlers {
		UrcHandlers::default()
	}

	pub fn add(&mut self, handler: Rc<dyn UrcHandler>) -> HandlerId {
		let id = self.next_id.take();
		debug!("Adding URC handler {}", id);
		self.handlers.push((id, handler));
		id
	}

	/// Returns false if the handler wasn't registered.
	pub fn remove(&mut self, id: HandlerId) -> bool {
		let before = self.handlers.len();
		self.handlers.retain(|&(h, _)| h != id);
		let removed = self.handlers.len() != before;
		if removed {
			debug!("Removed URC handler {}", id);
		} else {
			warn!("Remove of unknown URC handler {}", id);
		}
		removed
	}

	/// Pass a URC to every handler.
	pub fn dispatch(&self, urc: &str) {
		if self.is_empty() {
			debug!("URC {:?} with nobody listening", urc);
			return;
		}
		trace!("URC: {:?} to {} handlers", urc, self.handlers.len());
		for &(_, ref handler) in self.handlers.iter() {
			handler.handle_urc(urc);
		}
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}
}

// ****************************************************************************
//
// Private Functions
//
// ****************************************************************************

// None


// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
