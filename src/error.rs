// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::sync::Arc;
use core::error::Error as CoreError;
use core::fmt::{Debug, Display, Formatter, Result as FmtResult};
#[cfg(feature = "utf8")]
pub use simdutf8::compat::Utf8Error;

/// A stream error.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
	/// [`open`] was called on a source which was already opened.
	///
	/// [`open`]: crate::StreamSource::open
	AlreadyOpen,
	/// A read was attempted before the source was opened.
	NotOpen,
	/// An operation was attempted on a closed source.
	Closed,
	/// The backing resource couldn't be acquired while opening.
	Unavailable(Fault),
	/// The backing resource reported a fault while reading.
	Io(Fault),
	/// Premature end-of-stream.
	End {
		/// The total required byte count.
		required_count: usize
	},
	/// Invalid UTF-8 bytes were encountered.
	#[cfg(feature = "utf8")]
	Utf8(Utf8Error),
}

impl Error {
	/// Creates an end-of-stream error.
	#[inline]
	pub const fn end(required_count: usize) -> Self {
		Self::End { required_count }
	}

	/// Returns the fault carried by this error, if any.
	pub fn fault(&self) -> Option<&Fault> {
		match self {
			Self::Unavailable(fault) | Self::Io(fault) => Some(fault),
			_ => None
		}
	}

	/// Returns `true` if the error signals caller misuse rather than a failure of
	/// the backing resource. Misuse leaves the source's state untouched.
	pub const fn is_misuse(&self) -> bool {
		matches!(self, Self::AlreadyOpen | Self::NotOpen | Self::Closed)
	}
}

impl CoreError for Error {
	fn source(&self) -> Option<&(dyn CoreError + 'static)> {
		match self {
			Self::Unavailable(fault) |
			Self::Io(fault) => Some(fault),
			#[cfg(all(feature = "utf8", feature = "std"))]
			Self::Utf8(error) => Some(error),
			#[cfg(all(feature = "utf8", not(feature = "std")))]
			Self::Utf8(_) => None,
			Self::AlreadyOpen |
			Self::NotOpen |
			Self::Closed |
			Self::End { .. } => None,
		}
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		match self {
			Self::AlreadyOpen => write!(f, "source is already open"),
			Self::NotOpen => write!(f, "source has not been opened"),
			Self::Closed => write!(f, "source is closed"),
			Self::Unavailable(fault) => write!(f, "backing resource unavailable: {fault}"),
			Self::Io(fault) => write!(f, "read failed: {fault}"),
			Self::End { required_count } => write!(f, "premature end-of-stream when reading {required_count} bytes"),
			#[cfg(feature = "utf8")]
			Self::Utf8(error) => Display::fmt(error, f),
		}
	}
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
	#[inline]
	fn from(value: std::io::Error) -> Self {
		Self::Io(value.into())
	}
}

#[cfg(feature = "utf8")]
impl From<Utf8Error> for Error {
	#[inline]
	fn from(value: Utf8Error) -> Self {
		Self::Utf8(value)
	}
}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
	fn from(value: Error) -> Self {
		use std::io::ErrorKind;

		let kind = match &value {
			Error::NotOpen | Error::Closed => ErrorKind::NotConnected,
			Error::AlreadyOpen => ErrorKind::AlreadyExists,
			Error::Unavailable(_) => ErrorKind::NotFound,
			Error::Io(fault) if fault.kind() == FaultKind::Timeout => ErrorKind::TimedOut,
			Error::Io(fault) if fault.kind() == FaultKind::Decode => ErrorKind::InvalidData,
			Error::End { .. } => ErrorKind::UnexpectedEof,
			#[cfg(feature = "utf8")]
			Error::Utf8(_) => ErrorKind::InvalidData,
			_ => ErrorKind::Other,
		};
		Self::new(kind, value)
	}
}

/// The category of a [`Fault`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum FaultKind {
	/// The backing resource failed an I/O operation.
	Io,
	/// Produced data couldn't be decoded.
	Decode,
	/// A read waited longer than the source's timeout policy allows.
	Timeout,
	/// Any other source-specific failure.
	Other,
}

impl Display for FaultKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(match self {
			Self::Io => "I/O fault",
			Self::Decode => "decode fault",
			Self::Timeout => "timed out",
			Self::Other => "fault",
		})
	}
}

/// A fault reported by a source's backing resource. Faults are cheap to clone;
/// clones share the underlying cause, and only clones of the same fault compare
/// equal.
#[derive(Clone)]
pub struct Fault {
	kind: FaultKind,
	cause: Arc<dyn CoreError + Send + Sync>,
}

impl Fault {
	/// Creates a fault from a cause.
	pub fn new(kind: FaultKind, cause: impl CoreError + Send + Sync + 'static) -> Self {
		Self { kind, cause: Arc::new(cause) }
	}

	/// Creates a fault with a plain message as its cause.
	pub fn msg(kind: FaultKind, message: impl Into<String>) -> Self {
		Self::new(kind, Message(message.into()))
	}

	/// Creates a timeout fault.
	pub fn timeout() -> Self {
		Self::msg(FaultKind::Timeout, "no data became ready before the deadline")
	}

	#[inline]
	pub const fn kind(&self) -> FaultKind { self.kind }

	/// Returns the underlying cause.
	pub fn cause(&self) -> &(dyn CoreError + Send + Sync + 'static) {
		&*self.cause
	}
}

impl PartialEq for Fault {
	fn eq(&self, other: &Self) -> bool {
		self.kind == other.kind && Arc::ptr_eq(&self.cause, &other.cause)
	}
}

impl Debug for Fault {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.debug_struct("Fault")
			.field("kind", &self.kind)
			.field("cause", &self.cause)
			.finish()
	}
}

impl Display for Fault {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		write!(f, "{}: {}", self.kind, self.cause)
	}
}

impl CoreError for Fault {
	fn source(&self) -> Option<&(dyn CoreError + 'static)> {
		Some(&*self.cause)
	}
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Fault {
	fn from(value: std::io::Error) -> Self {
		let kind = match value.kind() {
			std::io::ErrorKind::TimedOut |
			std::io::ErrorKind::WouldBlock => FaultKind::Timeout,
			std::io::ErrorKind::InvalidData => FaultKind::Decode,
			_ => FaultKind::Io,
		};
		Self::new(kind, value)
	}
}

#[derive(Debug)]
struct Message(String);

impl Display for Message {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(&self.0)
	}
}

impl CoreError for Message { }
