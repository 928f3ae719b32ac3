// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

//! Drivers moving a source's bytes somewhere else: open, read until the end,
//! close.

use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;
use crate::{Error, Fault, ReadMode, Result, SourceState, StreamSource};

/// Waits without a deadline.
pub(crate) const FOREVER: Duration = Duration::MAX;

const DEFAULT_CHUNK_SIZE: usize = u16::MAX as usize;

/// Options for draining a source.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DrainOptions {
	chunk_size: usize,
	capacity: usize,
	ready_timeout: Option<Duration>,
}

impl Default for DrainOptions {
	fn default() -> Self {
		Self {
			chunk_size: DEFAULT_CHUNK_SIZE,
			capacity: 0,
			ready_timeout: None,
		}
	}
}

impl DrainOptions {
	pub fn new() -> Self { Self::default() }

	/// Sets the largest count passed to a single read, `65535` by default. Zero is
	/// treated as one.
	#[must_use]
	pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
		self.chunk_size = chunk_size.max(1);
		self
	}

	/// Sets the capacity reserved up front when the source has no length hint.
	#[must_use]
	pub fn with_capacity(mut self, capacity: usize) -> Self {
		self.capacity = capacity;
		self
	}

	/// Sets how long to wait for a non-blocking source to become ready before
	/// failing with a [`Timeout`](crate::FaultKind::Timeout) fault. Waits
	/// indefinitely by default.
	#[must_use]
	pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
		self.ready_timeout = Some(timeout);
		self
	}

	#[inline]
	pub const fn chunk_size(&self) -> usize { self.chunk_size }
	#[inline]
	pub const fn capacity(&self) -> usize { self.capacity }
	#[inline]
	pub const fn ready_timeout(&self) -> Option<Duration> { self.ready_timeout }
}

/// Opens `source` if it hasn't been, reads it to the end, and closes it. The
/// source is closed whether or not draining succeeds.
///
/// # Errors
///
/// Returns any error from opening or reading the source, or a timeout error if a
/// non-blocking source isn't ready within the configured timeout.
pub fn read_to_end(source: &mut (impl StreamSource + ?Sized), options: &DrainOptions) -> Result<Vec<u8>> {
	let result = open_if_needed(source).and_then(|()| {
		let reserve = source.len_hint()
							.and_then(|len| usize::try_from(len).ok())
							.unwrap_or(options.capacity);
		let mut buf = Vec::with_capacity(reserve);
		pump(source, &mut buf, options)?;
		Ok(buf)
	});
	source.close();
	result
}

/// Opens `source` if it hasn't been, writes its bytes to `sink`, and closes it,
/// returning the number of bytes copied. The source is closed whether or not
/// copying succeeds; the sink is flushed only on success.
///
/// # Errors
///
/// Returns any error from the source, or [`Error::Io`] if writing fails.
#[cfg(feature = "std")]
pub fn copy_to<W: std::io::Write + ?Sized>(
	source: &mut (impl StreamSource + ?Sized),
	sink: &mut W,
	options: &DrainOptions
) -> Result<u64> {
	let result = open_if_needed(source).and_then(|()| {
		let count = drain_with(source, options, |bytes| Ok(sink.write_all(bytes)?))?;
		sink.flush()?;
		Ok(count)
	});
	source.close();
	result
}

/// Reads an open source to the end, appending to `buf`. Returns the number of
/// bytes read.
pub(crate) fn pump(
	source: &mut (impl StreamSource + ?Sized),
	buf: &mut Vec<u8>,
	options: &DrainOptions
) -> Result<u64> {
	drain_with(source, options, |bytes| {
		buf.extend_from_slice(bytes);
		Ok(())
	})
}

fn open_if_needed(source: &mut (impl StreamSource + ?Sized)) -> Result {
	if source.state() == SourceState::NotOpened {
		source.open()
	} else {
		Ok(())
	}
}

fn drain_with(
	source: &mut (impl StreamSource + ?Sized),
	options: &DrainOptions,
	mut sink: impl FnMut(&[u8]) -> Result
) -> Result<u64> {
	let chunk_size = source.len_hint()
						   .and_then(|len| usize::try_from(len).ok())
						   .map_or(options.chunk_size, |len| len.clamp(1, options.chunk_size));
	let mut chunk = vec![0; chunk_size];
	let mut total = 0;
	loop {
		match source.read(&mut chunk)? {
			0 if source.read_mode() == ReadMode::NonBlocking && !source.state().is_terminal() => {
				let timeout = options.ready_timeout.unwrap_or(FOREVER);
				if !source.wait_ready(timeout)? {
					log::debug!("source not ready after {timeout:?}, {total} bytes drained");
					return Err(Error::Io(Fault::timeout()))
				}
			}
			0 => break,
			count => {
				sink(&chunk[..count])?;
				total += count as u64;
			}
		}
	}

	log::trace!("drained {total} bytes");
	Ok(total)
}
