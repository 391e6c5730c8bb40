//! # loopback - a cellsock example against a pretend modem
//!
//! The pretend modem connects to anything, and whatever is written to a
//! socket comes straight back as received data. Run with
//! `RUST_LOG=debug` to see the AT commands go by.

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

extern crate cellsock;
extern crate cellsock_client;
extern crate env_logger;
#[macro_use]
extern crate log;

use std::mem;
use std::rc::Rc;
use std::time::Duration;

use cellsock::{Command, HandlerId, Modem, Reply, Shared, SocketBuffers, SocketId, Status};
use cellsock::{UrcHandler, UrcHandlers};
use cellsock_client::{Client, ClientConfig, Destination};

// ****************************************************************************
//
// Private Types
//
// ****************************************************************************

struct LoopbackModem {
	buffers: Shared<SocketBuffers>,
	handlers: UrcHandlers,
	last: Status,
	lines: Vec<String>,
	urcs: Vec<String>,
}

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

fn main() {
	env_logger::init();

	let buffers = cellsock::share(SocketBuffers::new());
	let modem = cellsock::share(LoopbackModem::new(buffers.clone()));
	let config = ClientConfig::default().poll_interval(Duration::from_millis(1));
	let mut client = Client::new(modem, buffers, config);

	client
		.connect(Destination::tcp("echo.example.com", 7))
		.unwrap();
	info!("Connected on socket {:?}", client.socket());

	let message = b"Hello from the far side of a modem";
	let sent = client.write(message);
	info!("Sent {} of {} octets", sent, message.len());

	let mut buf = [0u8; 16];
	let mut echoed = Vec::new();
	while client.connected() && echoed.len() < sent {
		let len = client.read(&mut buf);
		echoed.extend_from_slice(&buf[..len]);
	}
	println!("{}", String::from_utf8_lossy(&echoed));

	client.stop();
}

// ****************************************************************************
//
// Private Functions
//
// ****************************************************************************

impl LoopbackModem {
	fn new(buffers: Shared<SocketBuffers>) -> LoopbackModem {
		LoopbackModem {
			buffers,
			handlers: UrcHandlers::new(),
			last: Status::Ok,
			lines: Vec::new(),
			urcs: Vec::new(),
		}
	}

	/// `AT+USOWR=<socket>,<len>,"<hex>"` - loop the data back round.
	fn echo(&mut self, args: &str) -> Status {
		let mut fields = args.splitn(3, ',');
		let socket = fields.next().and_then(|f| f.parse::<u8>().ok());
		let _len = fields.next();
		let data = fields.next().and_then(|f| decode_hex(f.trim_matches('"')));
		match (socket, data) {
			(Some(socket), Some(data)) => {
				self.buffers
					.borrow_mut()
					.push(SocketId::new(socket), &data);
				self.urcs
					.push(format!("+UUSORD: {},{}", socket, data.len()));
				Status::Ok
			}
			_ => Status::Error,
		}
	}

	fn deliver_urcs(&mut self) {
		for urc in mem::replace(&mut self.urcs, Vec::new()) {
			self.handlers.dispatch(&urc);
		}
	}
}

impl Modem for LoopbackModem {
	fn ready(&mut self) -> Status {
		self.deliver_urcs();
		self.last
	}

	fn send(&mut self, command: &Command) {
		let text = command.as_str();
		self.lines.clear();
		self.last = if text.starts_with("AT+USOCR=") {
			self.lines.push(String::from("+USOCR: 0"));
			Status::Ok
		} else if text.starts_with("AT+USOWR=") {
			self.echo(&text["AT+USOWR=".len()..])
		} else {
			Status::Ok
		};
	}

	fn take_response(&mut self) -> Vec<String> {
		mem::replace(&mut self.lines, Vec::new())
	}

	fn wait_for_response(&mut self, _timeout: Duration) -> Reply {
		self.deliver_urcs();
		Reply::new(self.last, self.take_response())
	}

	fn poll(&mut self) {
		self.deliver_urcs();
	}

	fn add_urc_handler(&mut self, handler: Rc<dyn UrcHandler>) -> HandlerId {
		self.handlers.add(handler)
	}

	fn remove_urc_handler(&mut self, id: HandlerId) {
		self.handlers.remove(id);
	}
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
	if hex.len() % 2 != 0 {
		return None;
	}
	(0..hex.len())
		.step_by(2)
		.map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
		.collect()
}

// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
