// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter, Result as FmtResult};
use crate::{Fault, Lifecycle, ReadGate, Result, SourceState, StreamSource};

/// An iterator of produced chunks. An `Err` item faults the source.
pub type Chunks = Box<dyn Iterator<Item = Result<Vec<u8>, Fault>> + Send>;

type Opener = Box<dyn FnOnce() -> Result<Chunks, Fault> + Send>;

/// A source producing its bytes from a generator of chunks. The generator is
/// created by an opener closure when the source is opened, so nothing is
/// produced before [`open`](StreamSource::open). Chunks are split across reads
/// as needed; a chunk is never produced twice.
///
/// ```
/// # use stream_sources::{GeneratorSource, StreamSource};
/// let mut source = GeneratorSource::from_iter(
///     (0..3u8).map(|i| Ok(vec![i; 2]))
/// );
/// source.open()?;
/// let mut buf = [0; 8];
/// assert_eq!(source.read(&mut buf)?, 6);
/// assert_eq!(buf, [0, 0, 1, 1, 2, 2, 0, 0]);
/// # Ok::<(), stream_sources::Error>(())
/// ```
pub struct GeneratorSource {
	lifecycle: Lifecycle,
	opener: Option<Opener>,
	chunks: Option<Chunks>,
	pending: Vec<u8>,
	offset: usize,
	deferred: Option<Fault>,
	len: Option<u64>,
}

impl GeneratorSource {
	/// Creates a source whose chunks are produced by the iterator `opener` returns.
	/// If `opener` fails, opening fails with [`Error::Unavailable`].
	///
	/// [`Error::Unavailable`]: crate::Error::Unavailable
	pub fn new<I, F>(opener: F) -> Self
	where
		F: FnOnce() -> Result<I, Fault> + Send + 'static,
		I: Iterator<Item = Result<Vec<u8>, Fault>> + Send + 'static {
		Self {
			lifecycle: Lifecycle::new(),
			opener: Some(Box::new(move || opener().map(|iter| Box::new(iter) as Chunks))),
			chunks: None,
			pending: Vec::new(),
			offset: 0,
			deferred: None,
			len: None,
		}
	}

	/// Creates a source over an existing chunk iterator.
	#[allow(clippy::should_implement_trait)]
	pub fn from_iter<I>(chunks: I) -> Self
	where I: IntoIterator<Item = Result<Vec<u8>, Fault>>,
		  I::IntoIter: Send + 'static {
		let chunks = chunks.into_iter();
		Self::new(move || Ok(chunks))
	}

	/// Sets the total length hint reported by [`len_hint`](StreamSource::len_hint).
	#[must_use]
	pub fn with_len_hint(mut self, len: u64) -> Self {
		self.len = Some(len);
		self
	}

	fn pending(&self) -> &[u8] {
		&self.pending[self.offset..]
	}

	/// Pulls chunks until one has data, returning `false` once the generator is
	/// exhausted.
	fn refill(&mut self) -> Result<bool, Fault> {
		let Some(chunks) = self.chunks.as_mut() else {
			return Ok(false)
		};

		for chunk in chunks {
			let chunk = chunk?;
			if !chunk.is_empty() {
				self.pending = chunk;
				self.offset = 0;
				return Ok(true)
			}
		}

		// Release the generator as soon as it's exhausted.
		self.chunks = None;
		Ok(false)
	}
}

impl StreamSource for GeneratorSource {
	fn state(&self) -> SourceState { self.lifecycle.state() }

	fn open(&mut self) -> Result {
		self.lifecycle.begin_open()?;
		let Some(opener) = self.opener.take() else {
			return Err(self.lifecycle.open_failed(
				Fault::msg(crate::FaultKind::Other, "generator was already consumed")
			))
		};

		match opener() {
			Ok(chunks) => {
				self.chunks = Some(chunks);
				self.lifecycle.opened();
				Ok(())
			}
			Err(fault) => Err(self.lifecycle.open_failed(fault))
		}
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		if self.lifecycle.begin_read()? == ReadGate::End || buf.is_empty() {
			return Ok(0)
		}

		if let Some(fault) = self.deferred.take() {
			return Err(self.lifecycle.fail(fault))
		}

		let mut count = 0;
		while count < buf.len() {
			if self.pending().is_empty() {
				match self.refill() {
					Ok(true) => { }
					Ok(false) => break,
					Err(fault) => {
						self.chunks = None;
						if count == 0 {
							return Err(self.lifecycle.fail(fault))
						}

						// Deliver what was produced before the fault first.
						self.deferred = Some(fault);
						break
					}
				}
			}

			let pending = self.pending();
			let len = pending.len().min(buf.len() - count);
			buf[count..count + len].copy_from_slice(&pending[..len]);
			self.offset += len;
			count += len;
		}

		self.lifecycle.reading();
		if count == 0 && self.deferred.is_none() {
			self.lifecycle.finish();
		}
		Ok(count)
	}

	fn has_bytes_available(&mut self) -> bool {
		self.lifecycle.state().is_readable() && !self.pending().is_empty()
	}

	fn close(&mut self) {
		if self.lifecycle.close() {
			self.opener = None;
			self.chunks = None;
			self.pending = Vec::new();
			self.offset = 0;
			self.deferred = None;
		}
	}

	fn current_error(&self) -> Option<&Fault> { self.lifecycle.fault() }

	fn len_hint(&self) -> Option<u64> { self.len }
}

impl Debug for GeneratorSource {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.debug_struct("GeneratorSource")
			.field("lifecycle", &self.lifecycle)
			.field("pending", &self.pending().len())
			.field("len", &self.len)
			.finish_non_exhaustive()
	}
}
