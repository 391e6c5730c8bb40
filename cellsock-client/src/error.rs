//! # error - What can go wrong, as far as the caller is concerned
//!
//! Most failures never get this far: a command that fails part way through
//! opening a socket sends us down the close path, and the caller just sees
//! no socket.

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::error;
use std::fmt;
use std::io;

// ****************************************************************************
//
// Public Types
//
// ****************************************************************************

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
	/// The modem is in the middle of something - try again later
	Busy,
	/// The socket couldn't be created or connected
	ConnectFailed,
	/// There's no socket to use
	NotConnected,
	/// The host name can't be sent to the modem
	InvalidHost,
}

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Error::Busy => write!(f, "modem busy"),
			Error::ConnectFailed => write!(f, "connect failed"),
			Error::NotConnected => write!(f, "not connected"),
			Error::InvalidHost => write!(f, "invalid host name"),
		}
	}
}

impl error::Error for Error {}

/// So the `std::io` impls can hand our errors back
impl From<Error> for io::Error {
	fn from(e: Error) -> io::Error {
		let kind = match e {
			Error::Busy => io::ErrorKind::WouldBlock,
			Error::ConnectFailed => io::ErrorKind::ConnectionRefused,
			Error::NotConnected => io::ErrorKind::NotConnected,
			Error::InvalidHost => io::ErrorKind::InvalidInput,
		};
		io::Error::new(kind, e)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn io_kinds() {
		assert_eq!(io::Error::from(Error::Busy).kind(), io::ErrorKind::WouldBlock);
		assert_eq!(
			io::Error::from(Error::NotConnected).kind(),
			io::ErrorKind::NotConnected
		);
		assert_eq!(
			io::Error::from(Error::InvalidHost).kind(),
			io::ErrorKind::InvalidInput
		);
		assert_eq!(format!("{}", Error::ConnectFailed), "connect failed");
	}
}

// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
