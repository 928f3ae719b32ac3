// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

mod any;
mod chain;
#[cfg(feature = "std")]
mod file;
mod generator;
mod memory;
#[cfg(feature = "std")]
mod pipe;

use core::time::Duration;
use crate::{Fault, ReadMode, Result, SourceState};

pub use any::AnySource;
pub use chain::ChainSource;
#[cfg(feature = "std")]
pub use file::FileSource;
pub use generator::{Chunks, GeneratorSource};
pub use memory::MemorySource;
#[cfg(feature = "std")]
pub use pipe::{pipe, PipeSource, PipeWriter};

/// A pull-based source of bytes with an explicit lifecycle.
///
/// A source starts out [`NotOpened`]. [`open`] acquires the backing resource,
/// then [`read`] is called repeatedly until the source reaches [`AtEnd`] or
/// [`Error`], and finally [`close`] releases the resource. Closing is allowed
/// from any state and is idempotent; dropping a source releases its resource as
/// well.
///
/// All lifecycle operations take `&mut self`: a source has exactly one owner at
/// a time, and may be moved to another thread between operations if it is
/// [`Send`].
///
/// ```
/// # use stream_sources::{MemorySource, SourceState, StreamSource};
/// let mut source = MemorySource::new(*b"0123456789");
/// source.open()?;
///
/// let mut buf = [0; 4];
/// assert_eq!(source.read(&mut buf)?, 4);
/// assert_eq!(source.read(&mut buf)?, 4);
/// assert_eq!(source.read(&mut buf)?, 2);
/// assert_eq!(source.read(&mut buf)?, 0);
/// assert_eq!(source.state(), SourceState::AtEnd);
///
/// source.close();
/// # Ok::<(), stream_sources::Error>(())
/// ```
///
/// [`NotOpened`]: SourceState::NotOpened
/// [`AtEnd`]: SourceState::AtEnd
/// [`Error`]: SourceState::Error
/// [`open`]: Self::open
/// [`read`]: Self::read
/// [`close`]: Self::close
pub trait StreamSource {
	/// Returns the current lifecycle state.
	fn state(&self) -> SourceState;

	/// Acquires the backing resource, moving the source to [`Open`].
	///
	/// # Errors
	///
	/// Returns [`Error::AlreadyOpen`] if called more than once, [`Error::Closed`]
	/// if the source was closed, or [`Error::Unavailable`] if the backing resource
	/// can't be acquired. In the last case the source moves to [`Error`] and keeps
	/// the fault.
	///
	/// [`Open`]: SourceState::Open
	/// [`Error`]: SourceState::Error
	/// [`Error::AlreadyOpen`]: crate::Error::AlreadyOpen
	/// [`Error::Closed`]: crate::Error::Closed
	/// [`Error::Unavailable`]: crate::Error::Unavailable
	fn open(&mut self) -> Result;

	/// Reads at most `buf.len()` bytes into `buf`, returning the count written.
	/// Bytes are delivered exactly once, in order.
	///
	/// A zero count from a non-empty buffer means the source is at its end, unless
	/// the source is [non-blocking] and not yet [`AtEnd`], in which case no data
	/// is ready. Once at the end, every read returns zero.
	///
	/// # Errors
	///
	/// Returns [`Error::NotOpen`] before opening, [`Error::Closed`] after closing,
	/// or [`Error::Io`] if the backing resource faults. A faulted source returns
	/// the same fault from every later read.
	///
	/// [non-blocking]: ReadMode::NonBlocking
	/// [`AtEnd`]: SourceState::AtEnd
	/// [`Error::NotOpen`]: crate::Error::NotOpen
	/// [`Error::Closed`]: crate::Error::Closed
	/// [`Error::Io`]: crate::Error::Io
	fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

	/// Returns whether a read may produce data without waiting. This is a best
	/// effort probe: `false` doesn't guarantee the next read returns zero, but
	/// `true` guarantees the next read won't wait for data.
	fn has_bytes_available(&mut self) -> bool;

	/// Releases the backing resource, moving the source to [`Closed`]. Closing
	/// twice is a no-op.
	///
	/// [`Closed`]: SourceState::Closed
	fn close(&mut self);

	/// Returns the fault which moved the source into the [`Error`] state, if any.
	///
	/// [`Error`]: SourceState::Error
	fn current_error(&self) -> Option<&Fault>;

	/// Returns the total length of the source in bytes, if known in advance.
	fn len_hint(&self) -> Option<u64> { None }

	/// Returns how [`read`](Self::read) behaves when no data is ready.
	fn read_mode(&self) -> ReadMode { ReadMode::Blocking }

	/// Waits up to `timeout` for the source to become ready, returning `true` if
	/// a read may now produce data or observe the end of the stream. Blocking
	/// sources are always ready.
	///
	/// # Errors
	///
	/// Returns an error under the same conditions as [`read`](Self::read).
	fn wait_ready(&mut self, timeout: Duration) -> Result<bool> {
		let _ = timeout;
		Ok(true)
	}
}
