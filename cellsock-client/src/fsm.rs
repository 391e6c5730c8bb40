//! # fsm - Opening and closing the modem's socket
//!
//! Each step either sends one command or looks at the result of the one
//! before. Nothing moves while the modem has a command outstanding.
//!
//! ```text
//!  CreatingSocket -> AwaitingSocketCreated --(fail)--> Idle
//!                      |            |
//!                      | (TLS)      +--------------------------+
//!                      v                                       |
//!  EnablingTls -> AwaitingTlsEnabled                           |
//!                      |                                       |
//!                      v                                       v
//!  ConfiguringTlsProfile -> AwaitingTlsProfileConfigured -> Connecting
//!                                                              |
//!                                                              v
//!                                          Idle <- AwaitingConnected
//!
//!  Any later failure: Closing -> AwaitingClosed -> RetrievingError -> Idle
//! ```

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::fmt;
use std::thread;

use cellsock::{parse_created_socket, parse_last_error};
use cellsock::{Command, Host, Modem, SocketBuffer, SocketId, Status};

use crate::error::Error;
use crate::Client;

// ****************************************************************************
//
// Public Types
//
// ****************************************************************************

/// Where a client is in the open/close sequence.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum State {
	Idle,
	CreatingSocket,
	AwaitingSocketCreated,
	EnablingTls,
	AwaitingTlsEnabled,
	ConfiguringTlsProfile,
	AwaitingTlsProfileConfigured,
	Connecting,
	AwaitingConnected,
	Closing,
	AwaitingClosed,
	RetrievingError,
}

/// What `advance` has to say.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Readiness {
	/// A command is outstanding, or there are more steps to go
	Busy,
	/// Idle, and the modem is free
	Ready,
}

/// How a successful `connect` went.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConnectStatus {
	/// Synchronous mode: we have a connected socket
	Connected,
	/// Asynchronous mode: keep calling `advance`
	InProgress,
}

/// Who to connect to, and whether to use TLS.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Destination {
	pub host: Host,
	pub port: u16,
	pub tls: bool,
}

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl Destination {
	/// A plain TCP connection.
	pub fn tcp<H: Into<Host>>(host: H, port: u16) -> Destination {
		Destination {
			host: host.into(),
			port,
			tls: false,
		}
	}

	/// A TCP connection with TLS on top.
	pub fn tls<H: Into<Host>>(host: H, port: u16) -> Destination {
		Destination {
			host: host.into(),
			port,
			tls: true,
		}
	}
}

impl fmt::Display for Destination {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)?;
		if self.tls {
			write!(f, " (TLS)")?;
		}
		Ok(())
	}
}

impl<M: Modem, B: SocketBuffer> Client<M, B> {
	/// Move on by at most one step. Never blocks.
	pub fn advance(&mut self) -> Readiness {
		let status = self.modem.borrow_mut().ready();
		if status.is_pending() {
			return Readiness::Busy;
		}
		let before = self.state;
		let readiness = self.step(status);
		if self.state != before {
			trace!("{:?} -> {:?} ({:?})", before, self.state, status);
		}
		readiness
	}

	/// Open a connection. Any socket we already have is closed first,
	/// unless the host name is unusable, in which case nothing changes and
	/// this gives `Error::InvalidHost`.
	///
	/// Synchronously, this returns once the connection is up (or has
	/// failed). Otherwise it returns `ConnectStatus::InProgress` straight
	/// away, or `Error::Busy` if the modem couldn't take the first command.
	pub fn connect(&mut self, destination: Destination) -> Result<ConnectStatus, Error> {
		if !destination.host.is_valid() {
			warn!("Refusing to connect to {:?}", destination.host);
			return Err(Error::InvalidHost);
		}
		info!("Connecting to {}", destination);
		self.stop();
		self.destination = Some(destination);

		if self.config.synchronous {
			self.wait_idle();
		} else if self.advance() == Readiness::Busy {
			debug!("Modem busy, not connecting");
			return Err(Error::Busy);
		}

		self.state = State::CreatingSocket;

		if !self.config.synchronous {
			return Ok(ConnectStatus::InProgress);
		}

		self.wait_idle();
		match self.link.socket() {
			Some(_) => Ok(ConnectStatus::Connected),
			None => Err(Error::ConnectFailed),
		}
	}

	/// Close the socket, if we have one, and go back to Idle. Waits for the
	/// modem to answer the close.
	pub fn stop(&mut self) {
		self.state = State::Idle;
		let socket = match self.link.socket() {
			Some(s) => s,
			None => return,
		};

		info!("Closing socket {}", socket);
		self.awaiting_error_code = false;
		self.send(&Command::close(socket));
		let reply = self
			.modem
			.borrow_mut()
			.wait_for_response(self.config.close_timeout);
		if !reply.status.is_ok() {
			warn!("Close of socket {} gave {:?}", socket, reply.status);
		}

		self.buffers.borrow_mut().close(socket);
		self.link.clear();
	}
}

// ****************************************************************************
//
// Private Functions
//
// ****************************************************************************

impl<M: Modem, B: SocketBuffer> Client<M, B> {
	/// Pump `advance` until it says Ready.
	pub(crate) fn wait_idle(&mut self) {
		while self.advance() == Readiness::Busy {
			thread::sleep(self.config.poll_interval);
		}
	}

	pub(crate) fn send(&self, command: &Command) {
		debug!("Tx: {:?}", command);
		self.modem.borrow_mut().send(command);
	}

	/// `status` is for the last command; the modem is free.
	fn step(&mut self, status: Status) -> Readiness {
		match self.state {
			State::Idle => {
				if self.awaiting_error_code {
					self.awaiting_error_code = false;
					self.log_error_code();
				}
				return Readiness::Ready;
			}
			State::CreatingSocket => {
				self.send(&Command::create_tcp_socket());
				self.state = State::AwaitingSocketCreated;
			}
			State::AwaitingSocketCreated => {
				let response = self.modem.borrow_mut().take_response();
				let created = if status.is_ok() {
					parse_created_socket(&response)
				} else {
					None
				};
				match created {
					Some(socket) => {
						debug!("Created socket {}", socket);
						self.link.set_socket(socket);
						self.state = if self.wants_tls() {
							State::EnablingTls
						} else {
							State::Connecting
						};
					}
					None => {
						warn!("Socket create failed: {:?} {:?}", status, response);
						self.state = State::Idle;
						return Readiness::Ready;
					}
				}
			}
			State::RetrievingError => {
				self.send(&Command::last_error());
				self.awaiting_error_code = true;
				self.state = State::Idle;
			}
			_ => match self.link.socket() {
				Some(socket) => self.step_with_socket(status, socket),
				None => {
					warn!("Lost our socket in {:?}", self.state);
					self.state = State::Idle;
					return Readiness::Ready;
				}
			},
		}
		if self.state == State::Idle && !self.awaiting_error_code {
			Readiness::Ready
		} else {
			Readiness::Busy
		}
	}

	/// The steps that happen once the socket exists.
	fn step_with_socket(&mut self, status: Status, socket: SocketId) {
		self.state = match self.state {
			State::EnablingTls => {
				self.send(&Command::enable_tls(socket));
				State::AwaitingTlsEnabled
			}
			State::AwaitingTlsEnabled => self.next_or_close(status, State::ConfiguringTlsProfile),
			State::ConfiguringTlsProfile => {
				self.send(&Command::tls_profile());
				State::AwaitingTlsProfileConfigured
			}
			State::AwaitingTlsProfileConfigured => self.next_or_close(status, State::Connecting),
			State::Connecting => {
				let command = self
					.destination
					.as_ref()
					.map(|d| Command::connect(socket, &d.host, d.port));
				match command {
					Some(command) => {
						self.send(&command);
						State::AwaitingConnected
					}
					None => {
						warn!("Nowhere to connect socket {} to", socket);
						State::Closing
					}
				}
			}
			State::AwaitingConnected => {
				if status.is_ok() {
					info!("Socket {} connected", socket);
					self.link.set_connected();
					State::Idle
				} else {
					warn!("Connect on socket {} gave {:?}", socket, status);
					State::Closing
				}
			}
			State::Closing => {
				self.send(&Command::close(socket));
				State::AwaitingClosed
			}
			State::AwaitingClosed => {
				// Whatever the modem said, the socket is gone
				self.buffers.borrow_mut().close(socket);
				self.link.clear();
				State::RetrievingError
			}
			other => other,
		};
	}

	fn next_or_close(&self, status: Status, next: State) -> State {
		if status.is_ok() {
			next
		} else {
			warn!("{:?} failed with {:?}", self.state, status);
			State::Closing
		}
	}

	fn wants_tls(&self) -> bool {
		self.destination.as_ref().map_or(false, |d| d.tls)
	}

	/// The `AT+USOER` reply. Only for the logs.
	fn log_error_code(&mut self) {
		let response = self.modem.borrow_mut().take_response();
		match parse_last_error(&response) {
			Some(code) => warn!("Last socket error: {}", code),
			None => debug!("No socket error code in {:?}", response),
		}
	}
}

// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
