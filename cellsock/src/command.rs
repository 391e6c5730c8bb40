//! # command - The AT socket commands we send
//!
//! Every command is built in one go from its parameters, so a `Command` is
//! just an immutable string. Only the u-blox style socket commands are
//! covered.

// ****************************************************************************
//
// Imports
//
// ****************************************************************************

use std::fmt;
use std::net::Ipv4Addr;

// ****************************************************************************
//
// Public Types
//
// ****************************************************************************

/// A socket number, as handed out by the modem in reply to `AT+USOCR`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SocketId(u8);

/// Where to connect to. The modem resolves names itself.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Host {
	/// A dotted-quad address
	Ip(Ipv4Addr),
	/// A host name, passed to the modem as-is
	Name(String),
}

/// A formatted AT command, ready to go down the wire (without the trailing
/// carriage return - the transport adds that).
#[derive(Clone, Eq, PartialEq)]
pub struct Command(String);

// ****************************************************************************
//
// Private Data
//
// ****************************************************************************

/// IP protocol number for TCP, as used by `AT+USOCR`
const PROTOCOL_TCP: u8 = 6;

/// `AT+USOSEC` arguments: enable SSL/TLS, using security profile 0
const TLS_ENABLE_PROFILE_0: &str = "1,0";

/// `AT+USECPRF` arguments: profile 0, certificate validation level, "none"
const TLS_PROFILE_NO_VALIDATION: &str = "0,0,1";

/// Prefix on the information line in reply to `AT+USOCR`
const CREATED_PREFIX: &str = "+USOCR: ";

/// Prefix on the information line in reply to `AT+USOER`
const LAST_ERROR_PREFIX: &str = "+USOER: ";

/// Anything longer than this is abbreviated by the `Debug` impl
const DEBUG_MAX_LEN: usize = 48;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

// ****************************************************************************
//
// Public Functions
//
// ****************************************************************************

impl SocketId {
	pub fn new(value: u8) -> SocketId {
		SocketId(value)
	}

	/// A socket number as written by the modem: exactly one decimal digit.
	pub fn parse(field: &str) -> Option<SocketId> {
		let mut chars = field.chars();
		match (chars.next().and_then(|c| c.to_digit(10)), chars.next()) {
			(Some(d), None) => Some(SocketId(d as u8)),
			_ => None,
		}
	}

	pub fn as_u8(&self) -> u8 {
		self.0
	}
}

impl fmt::Display for SocketId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<Ipv4Addr> for Host {
	fn from(addr: Ipv4Addr) -> Host {
		Host::Ip(addr)
	}
}

impl<'a> From<&'a str> for Host {
	fn from(name: &'a str) -> Host {
		Host::Name(name.to_owned())
	}
}

impl From<String> for Host {
	fn from(name: String) -> Host {
		Host::Name(name)
	}
}

impl Host {
	/// Can this go in the quoted host field of `AT+USOCO`? Names must be
	/// non-empty, with no double quotes or control characters.
	pub fn is_valid(&self) -> bool {
		match *self {
			Host::Ip(_) => true,
			Host::Name(ref name) => {
				!name.is_empty() && !name.chars().any(|c| c == '"' || c.is_control())
			}
		}
	}
}

impl fmt::Display for Host {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Host::Ip(ref addr) => write!(f, "{}", addr),
			Host::Name(ref name) => write!(f, "{}", name),
		}
	}
}

impl Command {
	/// `AT+USOCR=6` - create a TCP socket
	pub fn create_tcp_socket() -> Command {
		Command(format!("AT+USOCR={}", PROTOCOL_TCP))
	}

	/// `AT+USOSEC=<socket>,1,0` - turn on TLS for a socket
	pub fn enable_tls(socket: SocketId) -> Command {
		Command(format!("AT+USOSEC={},{}", socket, TLS_ENABLE_PROFILE_0))
	}

	/// `AT+USECPRF=0,0,1` - configure the TLS security profile
	pub fn tls_profile() -> Command {
		Command(format!("AT+USECPRF={}", TLS_PROFILE_NO_VALIDATION))
	}

	/// `AT+USOCO=<socket>,"<host>",<port>`. The host should pass
	/// `Host::is_valid`, or the command is malformed.
	pub fn connect(socket: SocketId, host: &Host, port: u16) -> Command {
		Command(format!("AT+USOCO={},\"{}\",{}", socket, host, port))
	}

	/// `AT+USOWR=<socket>,<len>,"<hex>"` - the data goes as upper case hex
	/// digit pairs, so any byte value is safe.
	pub fn write_hex(socket: SocketId, data: &[u8]) -> Command {
		let mut s = format!("AT+USOWR={},{},\"", socket, data.len());
		s.reserve(data.len() * 2 + 1);
		push_hex(&mut s, data);
		s.push('"');
		Command(s)
	}

	/// `AT+USOCL=<socket>`
	pub fn close(socket: SocketId) -> Command {
		Command(format!("AT+USOCL={}", socket))
	}

	/// `AT+USOER` - fetch the last socket error code
	pub fn last_error() -> Command {
		Command(String::from("AT+USOER"))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Don't log the whole of a long hex payload
impl fmt::Debug for Command {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if self.0.len() > DEBUG_MAX_LEN {
			let mut end = DEBUG_MAX_LEN;
			while !self.0.is_char_boundary(end) {
				end -= 1;
			}
			write!(
				f,
				"Command({:?}.., len: {})",
				&self.0[..end],
				self.0.len()
			)
		} else {
			write!(f, "Command({:?})", self.0)
		}
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Append `data` to `s` as upper case hex digit pairs.
pub fn push_hex(s: &mut String, data: &[u8]) {
	for b in data {
		s.push(HEX_DIGITS[(b >> 4) as usize] as char);
		s.push(HEX_DIGITS[(b & 0x0F) as usize] as char);
	}
}

/// Pick the socket number out of the reply to `AT+USOCR`. The reply must be
/// exactly one `+USOCR: <digit>` line.
pub fn parse_created_socket(lines: &[String]) -> Option<SocketId> {
	if lines.len() != 1 {
		return None;
	}
	let line = lines[0].trim_end();
	if !line.starts_with(CREATED_PREFIX) {
		return None;
	}
	SocketId::parse(&line[CREATED_PREFIX.len()..])
}

/// Pick the error code out of the reply to `AT+USOER`.
pub fn parse_last_error(lines: &[String]) -> Option<u16> {
	lines
		.iter()
		.filter_map(|l| {
			if l.starts_with(LAST_ERROR_PREFIX) {
				l[LAST_ERROR_PREFIX.len()..].trim().parse().ok()
			} else {
				None
			}
		})
		.next()
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

	fn lines(l: &[&str]) -> Vec<String> {
		l.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn socket_commands() {
		let s = SocketId::new(1);
		assert_eq!(Command::create_tcp_socket().as_str(), "AT+USOCR=6");
		assert_eq!(Command::enable_tls(s).as_str(), "AT+USOSEC=1,1,0");
		assert_eq!(Command::tls_profile().as_str(), "AT+USECPRF=0,0,1");
		assert_eq!(Command::close(s).as_str(), "AT+USOCL=1");
		assert_eq!(Command::last_error().as_str(), "AT+USOER");
	}

	#[test]
	fn connect_by_name_and_address() {
		let s = SocketId::new(2);
		let by_name = Command::connect(s, &Host::from("example.com"), 443);
		assert_eq!(by_name.as_str(), "AT+USOCO=2,\"example.com\",443");
		let by_ip = Command::connect(s, &Host::from(Ipv4Addr::new(10, 0, 0, 1)), 80);
		assert_eq!(by_ip.as_str(), "AT+USOCO=2,\"10.0.0.1\",80");
	}

	#[test]
	fn host_names_must_fit_in_quotes() {
		assert!(Host::from("example.com").is_valid());
		assert!(Host::from(Ipv4Addr::new(192, 168, 0, 1)).is_valid());
		assert!(!Host::from("").is_valid());
		assert!(!Host::from("evil\",1\r\nAT+CFUN=0").is_valid());
		assert!(!Host::from("tab\there").is_valid());
	}

	#[test]
	fn write_is_upper_case_hex() {
		let cmd = Command::write_hex(SocketId::new(0), &[0x00, 0x7f, 0xab, 0xff, b'\r']);
		assert_eq!(cmd.as_str(), "AT+USOWR=0,5,\"007FABFF0D\"");
	}

	#[test]
	fn long_commands_are_abbreviated_in_debug() {
		let cmd = Command::write_hex(SocketId::new(0), &[0x55; 200]);
		let dbg = format!("{:?}", cmd);
		assert!(dbg.len() < 100);
		assert_eq!(cmd.as_str().len(), 417);
		assert!(dbg.contains("len: 417"));
		assert_eq!(format!("{}", cmd), cmd.as_str());
	}

	#[test]
	fn created_socket() {
		assert_eq!(
			parse_created_socket(&lines(&["+USOCR: 3"])),
			Some(SocketId::new(3))
		);
		assert_eq!(parse_created_socket(&lines(&[])), None);
		assert_eq!(parse_created_socket(&lines(&["+USOCR: 3", "+USOCR: 4"])), None);
		assert_eq!(parse_created_socket(&lines(&["+USOCL: 3"])), None);
		assert_eq!(parse_created_socket(&lines(&["+USOCR: x"])), None);
		assert_eq!(parse_created_socket(&lines(&["+USOCR: 12"])), None);
		assert_eq!(parse_created_socket(&lines(&["+USOCR: "])), None);
		assert_eq!(
			parse_created_socket(&lines(&["+USOCR: 7\r"])).map(|s| s.as_u8()),
			Some(7)
		);
	}

	#[test]
	fn last_error() {
		assert_eq!(parse_last_error(&lines(&["+USOER: 110"])), Some(110));
		assert_eq!(parse_last_error(&lines(&["OK"])), None);
	}
}

// ****************************************************************************
//
// End Of File
//
// ****************************************************************************
