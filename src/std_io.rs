// SPDX-License-Identifier: Apache-2.0

#![cfg(feature = "std")]

use std::io::{self, ErrorKind, Read};
use crate::{ReadMode, SourceState, StreamSource};

/// Adapts a [`StreamSource`] to [`Read`], for consumers which expect a reader.
/// The source is opened on the first read, and released when the reader is
/// dropped. Non-blocking sources which aren't ready produce
/// [`ErrorKind::WouldBlock`].
#[derive(Debug)]
pub struct SourceReader<S: StreamSource> {
	source: S,
}

impl<S: StreamSource> SourceReader<S> {
	pub fn new(source: S) -> Self {
		Self { source }
	}

	pub fn get_ref(&self) -> &S { &self.source }

	pub fn get_mut(&mut self) -> &mut S { &mut self.source }

	/// Returns the source, without closing it.
	pub fn into_inner(self) -> S { self.source }
}

impl<S: StreamSource> Read for SourceReader<S> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if self.source.state() == SourceState::NotOpened {
			self.source.open()?;
		}

		match self.source.read(buf)? {
			0 if !buf.is_empty() &&
				 self.source.read_mode() == ReadMode::NonBlocking &&
				 !self.source.state().is_terminal() =>
				Err(ErrorKind::WouldBlock.into()),
			count => Ok(count)
		}
	}
}
