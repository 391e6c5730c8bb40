//! # urc - The socket URCs we understand

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use crate::command::SocketId;

// ****************************************************************************
//
// Public Types
//
// ****************************************************************************

/// A socket related Unsolicited Result Code.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Urc {
	/// `+UUSORD: <socket>,<length>` - data waiting to be read on a socket.
	/// A length of `PEER_CLOSED` means the far end has gone.
	DataAvailable { socket: SocketId, length: u32 },
}

// ****************************************************************************
//
// Public Data
//
// ****************************************************************************

/// The `+UUSORD` length that means "closed by peer"
pub const PEER_CLOSED: u32 = u32::MAX;

// ****************************************************************************
//
// Private Data
//
// ****************************************************************************

const DATA_AVAILABLE_PREFIX: &str = "+UUSORD: ";

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl Urc {
	/// Returns `None` for anything that isn't a socket URC we know about.
	pub fn parse(line: &str) -> Option<Urc> {
		if !line.starts_with(DATA_AVAILABLE_PREFIX) {
			return None;
		}
		let mut fields = line[DATA_AVAILABLE_PREFIX.len()..].trim_end().splitn(2, ',');
		let socket = fields.next().and_then(SocketId::parse)?;
		let length = fields.next().and_then(|f| f.trim().parse::<u32>().ok())?;
		Some(Urc::DataAvailable { socket, length })
	}

	pub fn socket(&self) -> SocketId {
		match *self {
			Urc::DataAvailable { socket, .. } => socket,
		}
	}

	pub fn is_peer_closed(&self) -> bool {
		match *self {
			Urc::DataAvailable { length, .. } => length == PEER_CLOSED,
		}
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
