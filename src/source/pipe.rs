// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::time::Duration;
use crate::{Error, Fault, Lifecycle, ReadGate, ReadMode, Result, SourceState, StreamSource};

/// Creates a pipe: a [`PipeWriter`] producing chunks from one thread and a
/// [`PipeSource`] reading them in order. At most `capacity` chunks are queued;
/// further writes wait until the source catches up. Dropping or [finishing]
/// the writer ends the stream once queued chunks are read.
///
/// ```
/// # use stream_sources::{pipe, StreamSource};
/// let (writer, mut source) = pipe(4);
/// source.open()?;
///
/// let mut buf = [0; 8];
/// assert_eq!(source.read(&mut buf)?, 0); // Nothing written yet
///
/// writer.write(b"hello")?;
/// writer.finish();
/// assert_eq!(source.read(&mut buf)?, 5);
/// assert_eq!(source.read(&mut buf)?, 0);
/// assert!(source.state().is_terminal());
/// # Ok::<(), stream_sources::Error>(())
/// ```
///
/// [finishing]: PipeWriter::finish
pub fn pipe(capacity: usize) -> (PipeWriter, PipeSource) {
	let (sender, receiver) = sync_channel(capacity);
	(
		PipeWriter { sender },
		PipeSource {
			lifecycle: Lifecycle::new(),
			receiver: Some(receiver),
			pending: Vec::new(),
			offset: 0,
			deferred: None,
			timeout: None,
		}
	)
}

enum Message {
	Data(Vec<u8>),
	Fault(Fault),
}

/// The producing end of a [`pipe`].
#[derive(Clone, Debug)]
pub struct PipeWriter {
	sender: SyncSender<Message>,
}

impl PipeWriter {
	/// Queues a chunk, waiting while the pipe is full. Empty chunks are ignored.
	///
	/// # Errors
	///
	/// Returns [`Error::Closed`] if the source was closed or dropped.
	pub fn write(&self, data: impl Into<Vec<u8>>) -> Result {
		let data = data.into();
		if data.is_empty() {
			return Ok(())
		}

		self.send(Message::Data(data))
	}

	/// Faults the source after the queued chunks are read.
	///
	/// # Errors
	///
	/// Returns [`Error::Closed`] if the source was closed or dropped.
	pub fn fail(self, fault: Fault) -> Result {
		self.send(Message::Fault(fault))
	}

	/// Ends the stream. Equivalent to dropping the writer.
	pub fn finish(self) { }

	fn send(&self, message: Message) -> Result {
		self.sender.send(message).map_err(|_| Error::Closed)
	}
}

enum Received {
	Data,
	NotReady,
	End,
}

/// The reading end of a [`pipe`]. Non-blocking unless a timeout is set with
/// [`with_timeout`](Self::with_timeout).
#[derive(Debug)]
pub struct PipeSource {
	lifecycle: Lifecycle,
	receiver: Option<Receiver<Message>>,
	pending: Vec<u8>,
	offset: usize,
	deferred: Option<Fault>,
	timeout: Option<Duration>,
}

impl PipeSource {
	/// Makes reads wait up to `timeout` for data, faulting with a
	/// [`Timeout`](crate::FaultKind::Timeout) fault if none arrives.
	#[must_use]
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}

	fn pending(&self) -> &[u8] {
		&self.pending[self.offset..]
	}

	/// Receives the next chunk into the pending buffer, waiting up to `wait` if
	/// given.
	fn receive(&mut self, wait: Option<Duration>) -> Result<Received, Fault> {
		if let Some(fault) = self.deferred.take() {
			return Err(fault)
		}

		let Some(receiver) = self.receiver.as_ref() else {
			return Ok(Received::End)
		};

		let message = match wait {
			None => match receiver.try_recv() {
				Ok(message) => message,
				Err(TryRecvError::Empty) => return Ok(Received::NotReady),
				Err(TryRecvError::Disconnected) => {
					self.receiver = None;
					return Ok(Received::End)
				}
			},
			Some(timeout) => match receiver.recv_timeout(timeout) {
				Ok(message) => message,
				Err(RecvTimeoutError::Timeout) => return Ok(Received::NotReady),
				Err(RecvTimeoutError::Disconnected) => {
					self.receiver = None;
					return Ok(Received::End)
				}
			}
		};

		match message {
			Message::Data(data) => {
				self.pending = data;
				self.offset = 0;
				Ok(Received::Data)
			}
			Message::Fault(fault) => {
				self.receiver = None;
				Err(fault)
			}
		}
	}
}

impl StreamSource for PipeSource {
	fn state(&self) -> SourceState { self.lifecycle.state() }

	fn open(&mut self) -> Result {
		self.lifecycle.begin_open()?;
		self.lifecycle.opened();
		Ok(())
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		if self.lifecycle.begin_read()? == ReadGate::End || buf.is_empty() {
			return Ok(0)
		}

		if self.pending().is_empty() {
			match self.receive(self.timeout) {
				Ok(Received::Data) => { }
				Ok(Received::NotReady) if self.timeout.is_some() =>
					return Err(self.lifecycle.fail(Fault::timeout())),
				Ok(Received::NotReady) => return Ok(0),
				Ok(Received::End) => {
					self.lifecycle.finish();
					return Ok(0)
				}
				Err(fault) => return Err(self.lifecycle.fail(fault))
			}
		}

		let pending = self.pending();
		let len = pending.len().min(buf.len());
		buf[..len].copy_from_slice(&pending[..len]);
		self.offset += len;
		self.lifecycle.reading();
		Ok(len)
	}

	fn has_bytes_available(&mut self) -> bool {
		if !self.lifecycle.state().is_readable() {
			return false
		}

		if !self.pending().is_empty() {
			return true
		}

		match self.receive(None) {
			Ok(Received::Data) => true,
			Ok(_) => false,
			Err(fault) => {
				self.deferred = Some(fault);
				false
			}
		}
	}

	fn close(&mut self) {
		if self.lifecycle.close() {
			log::debug!("closing pipe with {} unread bytes", self.pending().len());
			self.receiver = None;
			self.pending = Vec::new();
			self.offset = 0;
			self.deferred = None;
		}
	}

	fn current_error(&self) -> Option<&Fault> { self.lifecycle.fault() }

	fn read_mode(&self) -> ReadMode {
		if self.timeout.is_some() {
			ReadMode::Blocking
		} else {
			ReadMode::NonBlocking
		}
	}

	fn wait_ready(&mut self, timeout: Duration) -> Result<bool> {
		if self.lifecycle.begin_read()? == ReadGate::End || !self.pending().is_empty() {
			return Ok(true)
		}

		match self.receive(Some(timeout)) {
			Ok(Received::NotReady) => Ok(false),
			Ok(_) => Ok(true),
			Err(fault) => {
				// Surface the fault from the next read.
				self.deferred = Some(fault);
				Ok(true)
			}
		}
	}
}
