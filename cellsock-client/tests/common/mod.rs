//! A scripted modem for driving a `Client` in tests.
//!
//! Each `expect` queues the reply the next command gets, and that command
//! must start with the given prefix. A reply stays pending for one call to
//! `ready` before it completes, like a real modem.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::mem;
use std::rc::Rc;
use std::time::Duration;

use cellsock::{Command, HandlerId, Modem, Reply, Shared, SocketBuffers, SocketId, Status};
use cellsock::{UrcHandler, UrcHandlers};
use cellsock_client::{Client, ClientConfig, Destination};

pub type TestClient = Client<ScriptedModem, SocketBuffers>;

struct Step {
	prefix: String,
	reply: Reply,
}

struct Outstanding {
	reply: Reply,
	polls: usize,
}

pub struct ScriptedModem {
	/// Every command sent, in order
	pub sent: Vec<String>,
	script: VecDeque<Step>,
	outstanding: Option<Outstanding>,
	last: Status,
	lines: Vec<String>,
	urcs: VecDeque<String>,
	handlers: UrcHandlers,
	pending_polls: usize,
}

impl ScriptedModem {
	pub fn new() -> ScriptedModem {
		ScriptedModem {
			sent: Vec::new(),
			script: VecDeque::new(),
			outstanding: None,
			last: Status::Ok,
			lines: Vec::new(),
			urcs: VecDeque::new(),
			handlers: UrcHandlers::new(),
			pending_polls: 1,
		}
	}

	/// The next command must start with `prefix`, and gets this reply.
	pub fn expect(&mut self, prefix: &str, status: Status, lines: &[&str]) -> &mut ScriptedModem {
		self.script.push_back(Step {
			prefix: prefix.to_owned(),
			reply: Reply::new(status, lines.iter().map(|l| l.to_string()).collect()),
		});
		self
	}

	pub fn expect_ok(&mut self, prefix: &str) -> &mut ScriptedModem {
		self.expect(prefix, Status::Ok, &[])
	}

	/// How many calls to `ready` a reply stays pending for.
	pub fn set_pending_polls(&mut self, polls: usize) {
		self.pending_polls = polls;
	}

	/// Queue a URC. It's delivered on the next `ready`, `poll` or wait.
	pub fn push_urc(&mut self, urc: &str) {
		self.urcs.push_back(urc.to_owned());
	}

	pub fn handler_count(&self) -> usize {
		self.handlers.len()
	}

	pub fn script_finished(&self) -> bool {
		self.script.is_empty()
	}

	pub fn is_busy(&self) -> bool {
		self.outstanding.is_some()
	}

	pub fn sent_starting(&self, prefix: &str) -> Vec<String> {
		self.sent
			.iter()
			.filter(|c| c.starts_with(prefix))
			.cloned()
			.collect()
	}

	fn deliver_urcs(&mut self) {
		while let Some(urc) = self.urcs.pop_front() {
			self.handlers.dispatch(&urc);
		}
	}
}

impl Modem for ScriptedModem {
	fn ready(&mut self) -> Status {
		self.deliver_urcs();
		if let Some(mut o) = self.outstanding.take() {
			if o.polls > 0 {
				o.polls -= 1;
				self.outstanding = Some(o);
				return Status::Pending;
			}
			self.last = o.reply.status;
			self.lines = o.reply.lines;
		}
		self.last
	}

	fn send(&mut self, command: &Command) {
		let text = command.as_str().to_owned();
		let step = match self.script.pop_front() {
			Some(step) => step,
			None => panic!("Unscripted command {:?}", text),
		};
		assert!(
			text.starts_with(&step.prefix),
			"Expected {:?}, got {:?}",
			step.prefix,
			text
		);
		self.sent.push(text);
		self.lines.clear();
		self.outstanding = Some(Outstanding {
			reply: step.reply,
			polls: self.pending_polls,
		});
	}

	fn take_response(&mut self) -> Vec<String> {
		mem::replace(&mut self.lines, Vec::new())
	}

	fn wait_for_response(&mut self, _timeout: Duration) -> Reply {
		self.deliver_urcs();
		match self.outstanding.take() {
			Some(o) => {
				self.last = o.reply.status;
				self.lines.clear();
				o.reply
			}
			None => Reply::new(Status::Timeout, Vec::new()),
		}
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

pub fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// Default config, but without the sleeps.
pub fn fast_config() -> ClientConfig {
	ClientConfig::default().poll_interval(Duration::from_millis(0))
}

pub fn setup(config: ClientConfig) -> (Shared<ScriptedModem>, Shared<SocketBuffers>, TestClient) {
	init_logging();
	let modem = cellsock::share(ScriptedModem::new());
	let buffers = cellsock::share(SocketBuffers::new());
	let client = Client::new(modem.clone(), buffers.clone(), config);
	(modem, buffers, client)
}

/// A synchronous client, connected to 10.0.0.1:80 on socket `n`.
pub fn connected_client(n: u8) -> (Shared<ScriptedModem>, Shared<SocketBuffers>, TestClient) {
	let (modem, buffers, mut client) = setup(fast_config());
	let created = format!("+USOCR: {}", n);
	modem
		.borrow_mut()
		.expect("AT+USOCR=6", Status::Ok, &[created.as_str()])
		.expect_ok(&format!("AT+USOCO={},", n));
	client
		.connect(Destination::tcp(::std::net::Ipv4Addr::new(10, 0, 0, 1), 80))
		.expect("connect");
	assert_eq!(client.socket(), Some(SocketId::new(n)));
	(modem, buffers, client)
}

/// Undo `Command::write_hex`: the payload of an `AT+USOWR`.
pub fn decode_write(command: &str) -> Vec<u8> {
	let start = command.find('"').expect("opening quote") + 1;
	let end = command.rfind('"').expect("closing quote");
	let hex = &command[start..end];
	assert_eq!(hex.len() % 2, 0);
	assert!(hex.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
	(0..hex.len())
		.step_by(2)
		.map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("hex pair"))
		.collect()
}

/// The length field of an `AT+USOWR`.
pub fn write_length(command: &str) -> usize {
	command
		.split(',')
		.nth(1)
		.and_then(|f| f.parse().ok())
		.expect("length field")
}
