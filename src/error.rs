#![allow(missing_docs)]

use std::{error, fmt, io};

#[derive(Debug)]
pub struct Error {
	kind: ErrorKind,
	message: Option<String>,
	code: Option<i32>,
	cause: Option<Box<dyn error::Error + Send + Sync>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
	/// An unknown error
	Unknown,

	/// The counter source could not be opened or initialised.
	///
	/// This is fatal for the plugin: it is reported from
	/// `allinea_plugin_initialize` and every metric reads as zero afterwards.
	SourceUnavailable,

	/// Reading the counter source failed for one sample.
	///
	/// Tracker state is left untouched, so the next sample (or a retry of
	/// the same one) starts from the last good values.
	ReadFailed,

	/// A raw counter moved backwards relative to the baseline or the previous
	/// sample, which usually means the source was reset underneath us (e.g. a
	/// filesystem remount).
	CounterRegressed,

	/// A vendor library returned an error code.
	///
	/// The message carries the library's own description of the code.
	Library,

	/// A metric was requested before the plugin was initialised, or after it
	/// was cleaned up.
	NotInitialized,

	/// The plugin instance is in use by another caller.
	///
	/// Accessors never block the sampler, they give up on the sample instead.
	Busy,

	/// The host passed a null or otherwise unusable argument.
	InvalidArgument,
}

impl ErrorKind {
	fn description(&self) -> &'static str {
		match self {
			ErrorKind::SourceUnavailable => "counter source unavailable",
			ErrorKind::ReadFailed => "failed to read counters",
			ErrorKind::CounterRegressed => "counter went backwards",
			ErrorKind::Library => "library call failed",
			ErrorKind::NotInitialized => "plugin not initialised",
			ErrorKind::Busy => "plugin busy",
			ErrorKind::InvalidArgument => "invalid argument",
			ErrorKind::Unknown => "unknown error",
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self.cause {
			None => None,
			Some(ref b) => Some(&**b),
		}
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (&self.message, &self.cause) {
			(Some(m), _) => write!(f, "{}: {}", self.kind.description(), m),
			(None, Some(c)) => write!(f, "{}: {}", self.kind.description(), c),
			(None, None) => f.write_str(self.kind.description()),
		}
	}
}

#[doc(hidden)]
impl PartialEq for Error {
	fn eq(&self, other: &Error) -> bool {
		self.kind == other.kind
	}
}

impl Error {
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// The library return code or OS error code behind this error, if any.
	pub fn code(&self) -> Option<i32> {
		self.code.or_else(|| self.raw_os_error())
	}

	/// The raw OS error code of the underlying cause, if there is one.
	pub fn raw_os_error(&self) -> Option<i32> {
		self.cause
			.as_ref()
			.and_then(|c| c.downcast_ref::<io::Error>())
			.and_then(io::Error::raw_os_error)
	}
}

/// Build an error whose cause is the calling thread's last OS error.
pub fn new_os_error(kind: ErrorKind) -> Error {
	Error {
		kind,
		message: None,
		code: None,
		cause: Some(Box::new(io::Error::last_os_error())),
	}
}

pub fn new_error(kind: ErrorKind) -> Error {
	Error {
		kind,
		message: None,
		code: None,
		cause: None,
	}
}

pub fn new_error_with_message(kind: ErrorKind, message: impl Into<String>) -> Error {
	Error {
		kind,
		message: Some(message.into()),
		code: None,
		cause: None,
	}
}

/// Build an error for a vendor library call that returned `code`.
pub fn new_library_error(code: i32, message: impl Into<String>) -> Error {
	Error {
		kind: ErrorKind::Library,
		message: Some(message.into()),
		code: Some(code),
		cause: None,
	}
}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Self {
		Error {
			kind: ErrorKind::ReadFailed,
			message: None,
			code: None,
			cause: Some(Box::new(err)),
		}
	}
}
