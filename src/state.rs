// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use core::fmt::{Display, Formatter, Result as FmtResult};
use crate::{Error, Fault, Result};

/// The lifecycle state of a [`StreamSource`](crate::StreamSource).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum SourceState {
	/// Created, but not yet opened.
	#[default]
	NotOpened,
	/// Opened, no data pulled yet.
	Open,
	/// At least one read was made.
	Reading,
	/// The backing resource is exhausted. Reads return zero.
	AtEnd,
	/// The backing resource faulted. The fault is retained.
	Error,
	/// Closed, the backing resource has been released.
	Closed,
}

impl SourceState {
	/// Returns `true` for states which no read can leave.
	#[inline]
	pub const fn is_terminal(self) -> bool {
		matches!(self, Self::AtEnd | Self::Error | Self::Closed)
	}

	/// Returns `true` if reads may produce data in this state.
	#[inline]
	pub const fn is_readable(self) -> bool {
		matches!(self, Self::Open | Self::Reading)
	}
}

impl Display for SourceState {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(match self {
			Self::NotOpened => "not opened",
			Self::Open => "open",
			Self::Reading => "reading",
			Self::AtEnd => "at end",
			Self::Error => "error",
			Self::Closed => "closed",
		})
	}
}

/// How a source's `read` behaves when no data is ready.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ReadMode {
	/// `read` waits for data, bounded by the source's own timeout policy. A zero
	/// count from a non-empty buffer always means the end of the data.
	#[default]
	Blocking,
	/// `read` never waits. A zero count while not [`AtEnd`] means no data is ready
	/// yet; wait with [`wait_ready`] and retry.
	///
	/// [`AtEnd`]: SourceState::AtEnd
	/// [`wait_ready`]: crate::StreamSource::wait_ready
	NonBlocking,
}

/// What a read should do, decided from the lifecycle state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReadGate {
	/// Pull from the backing resource.
	Proceed,
	/// The source is at its end; return zero without touching the resource.
	End,
}

/// The state machine shared by every source. Concrete sources embed one and
/// route every transition through it, so construction always starts at
/// [`NotOpened`](SourceState::NotOpened) and the last error is never lost.
#[derive(Clone, Debug, Default)]
pub struct Lifecycle {
	state: SourceState,
	error: Option<Error>,
}

impl Lifecycle {
	/// Creates a lifecycle in the [`NotOpened`](SourceState::NotOpened) state.
	#[inline]
	pub const fn new() -> Self {
		Self { state: SourceState::NotOpened, error: None }
	}

	#[inline]
	pub const fn state(&self) -> SourceState { self.state }

	/// Returns the retained fault. It is set on entering the [`Error`] state and
	/// stays retrievable after the source is closed.
	///
	/// [`Error`]: SourceState::Error
	pub fn fault(&self) -> Option<&Fault> {
		self.error.as_ref().and_then(Error::fault)
	}

	/// Checks that the source may be opened.
	///
	/// # Errors
	///
	/// Returns [`Error::Closed`] if closed, or [`Error::AlreadyOpen`] if opened
	/// before, including a failed open.
	pub fn begin_open(&self) -> Result {
		match self.state {
			SourceState::NotOpened => Ok(()),
			SourceState::Closed => Err(Error::Closed),
			_ => Err(Error::AlreadyOpen)
		}
	}

	/// Records a successful open.
	pub fn opened(&mut self) {
		self.transition(SourceState::Open);
	}

	/// Records a failure to acquire the backing resource, returning the error to
	/// hand back to the caller.
	pub fn open_failed(&mut self, fault: Fault) -> Error {
		self.fail_with(Error::Unavailable(fault))
	}

	/// Checks whether a read may proceed.
	///
	/// # Errors
	///
	/// Returns [`Error::NotOpen`] or [`Error::Closed`] on misuse, or the retained
	/// error if the source faulted.
	pub fn begin_read(&self) -> Result<ReadGate> {
		match self.state {
			SourceState::Open | SourceState::Reading => Ok(ReadGate::Proceed),
			SourceState::AtEnd => Ok(ReadGate::End),
			SourceState::NotOpened => Err(Error::NotOpen),
			SourceState::Closed => Err(Error::Closed),
			SourceState::Error => Err(self.error.clone().unwrap_or(Error::Closed))
		}
	}

	/// Records that data was pulled.
	pub fn reading(&mut self) {
		if self.state == SourceState::Open {
			self.transition(SourceState::Reading);
		}
	}

	/// Records that the backing resource is exhausted.
	pub fn finish(&mut self) {
		if self.state.is_readable() {
			self.transition(SourceState::AtEnd);
		}
	}

	/// Records a read-time fault, returning the error to hand back to the caller.
	pub fn fail(&mut self, fault: Fault) -> Error {
		self.fail_with(Error::Io(fault))
	}

	/// Moves to [`Closed`](SourceState::Closed), returning `true` if this call
	/// made the transition. The backing resource must be released only then.
	pub fn close(&mut self) -> bool {
		if self.state == SourceState::Closed {
			return false
		}

		self.transition(SourceState::Closed);
		true
	}

	fn fail_with(&mut self, error: Error) -> Error {
		log::warn!("source faulted: {error}");
		self.transition(SourceState::Error);
		self.error = Some(error.clone());
		error
	}

	fn transition(&mut self, state: SourceState) {
		log::trace!("source state: {} -> {state}", self.state);
		self.state = state;
	}
}
