// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::format;
use core::fmt::{Debug, Formatter, Result as FmtResult};
use core::time::Duration;
use crate::{Error, Fault, FaultKind, Lifecycle, ReadGate, ReadMode, Result, SourceState, StreamSource};

type Child = Box<dyn StreamSource + Send>;

/// A source concatenating several sources, read one after another. Each child
/// is opened when the chain reaches it and closed as soon as it's exhausted, so
/// at most one child holds its backing resource at a time.
///
/// A child failing to open faults the chain with [`Error::Io`] at the read that
/// reached it. Bytes read from earlier children in the same read are returned
/// first, the fault is raised by the next read.
pub struct ChainSource {
	lifecycle: Lifecycle,
	children: VecDeque<Child>,
	len: Option<u64>,
	deferred: Option<Fault>,
}

impl ChainSource {
	pub fn new() -> Self {
		Self {
			lifecycle: Lifecycle::new(),
			children: VecDeque::new(),
			len: Some(0),
			deferred: None,
		}
	}

	/// Appends a source to the chain. Must be called before opening.
	///
	/// # Errors
	///
	/// Returns [`Error::AlreadyOpen`] if the chain was opened, or
	/// [`Error::Closed`] if it was closed.
	pub fn push(&mut self, source: impl StreamSource + Send + 'static) -> Result {
		self.lifecycle.begin_open()?;
		self.append(source);
		Ok(())
	}

	/// Appends a source to the chain, returning the chain.
	///
	/// # Panics
	///
	/// Panics if the chain was opened or closed.
	#[must_use]
	pub fn with(mut self, source: impl StreamSource + Send + 'static) -> Self {
		assert_eq!(self.lifecycle.state(), SourceState::NotOpened, "cannot append to an opened chain");
		self.append(source);
		self
	}

	fn append(&mut self, source: impl StreamSource + Send + 'static) {
		self.len = self.len.zip(source.len_hint()).map(|(a, b)| a + b);
		self.children.push_back(Box::new(source));
	}

	/// Returns the number of children not yet exhausted.
	pub fn remaining_sources(&self) -> usize {
		self.children.len()
	}

	/// Opens the current child if needed, returning it. Exhausted children are
	/// closed and dropped along the way.
	fn current(&mut self) -> Result<Option<&mut Child>, Fault> {
		loop {
			let Some(child) = self.children.front_mut() else {
				return Ok(None)
			};

			match child.state() {
				SourceState::NotOpened => child.open().map_err(into_fault)?,
				SourceState::AtEnd | SourceState::Closed => {
					child.close();
					self.children.pop_front();
					log::trace!("chained source exhausted, {} remaining", self.children.len());
					continue
				}
				_ => { }
			}

			return Ok(self.children.front_mut())
		}
	}

	fn release(&mut self) {
		for mut child in self.children.drain(..) {
			child.close();
		}
	}
}

impl StreamSource for ChainSource {
	fn state(&self) -> SourceState { self.lifecycle.state() }

	fn open(&mut self) -> Result {
		self.lifecycle.begin_open()?;
		self.lifecycle.opened();
		if self.children.is_empty() {
			self.lifecycle.finish();
		}
		Ok(())
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		if self.lifecycle.begin_read()? == ReadGate::End || buf.is_empty() {
			return Ok(0)
		}

		if let Some(fault) = self.deferred.take() {
			return Err(self.lifecycle.fail(fault))
		}

		let mut count = 0;
		let mut fault = None;
		while count < buf.len() {
			let child = match self.current() {
				Ok(Some(child)) => child,
				Ok(None) => break,
				Err(error) => {
					fault = Some(error);
					break
				}
			};

			match child.read(&mut buf[count..]) {
				Ok(0) if !child.state().is_terminal() => {
					if child.read_mode() == ReadMode::NonBlocking {
						// Not ready, return what we have.
						break
					}

					// A blocking source reading zero is at its end.
					child.close();
				}
				// Exhausted children are dropped on the next iteration.
				Ok(read) => count += read,
				Err(error) => {
					fault = Some(into_fault(error));
					break
				}
			}
		}

		if let Some(fault) = fault {
			self.release();
			if count == 0 {
				return Err(self.lifecycle.fail(fault))
			}

			self.deferred = Some(fault);
		}

		self.lifecycle.reading();
		if self.children.is_empty() && self.deferred.is_none() {
			self.lifecycle.finish();
		}
		Ok(count)
	}

	fn has_bytes_available(&mut self) -> bool {
		// An unopened child can't tell whether its first read would block.
		self.lifecycle.state().is_readable() &&
		self.children
			.front_mut()
			.is_some_and(|child|
				child.state() != SourceState::NotOpened && child.has_bytes_available()
			)
	}

	fn close(&mut self) {
		if self.lifecycle.close() {
			self.release();
		}
	}

	fn current_error(&self) -> Option<&Fault> { self.lifecycle.fault() }

	fn len_hint(&self) -> Option<u64> { self.len }

	fn read_mode(&self) -> ReadMode {
		if self.children.iter().any(|child| child.read_mode() == ReadMode::NonBlocking) {
			ReadMode::NonBlocking
		} else {
			ReadMode::Blocking
		}
	}

	fn wait_ready(&mut self, timeout: Duration) -> Result<bool> {
		self.lifecycle.begin_read()?;
		if self.deferred.is_some() {
			return Ok(true)
		}

		match self.children.front_mut() {
			Some(child) if child.state().is_readable() => child.wait_ready(timeout),
			_ => Ok(true)
		}
	}
}

impl Default for ChainSource {
	fn default() -> Self {
		Self::new()
	}
}

impl Debug for ChainSource {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.debug_struct("ChainSource")
			.field("lifecycle", &self.lifecycle)
			.field("remaining_sources", &self.children.len())
			.field("len", &self.len)
			.field("deferred", &self.deferred)
			.finish()
	}
}

/// Converts a child's error into a fault of the chain.
fn into_fault(error: Error) -> Fault {
	match error {
		Error::Unavailable(fault) | Error::Io(fault) => fault,
		error => Fault::msg(FaultKind::Other, format!("chained source failed: {error}"))
	}
}
