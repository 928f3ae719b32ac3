// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;
use crate::{Fault, Lifecycle, ReadGate, Result, SourceState, StreamSource};

/// A source reading from an owned byte buffer. The buffer is dropped on close.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
	lifecycle: Lifecycle,
	data: Vec<u8>,
	pos: usize,
}

impl MemorySource {
	/// Creates a source over `data`.
	pub fn new(data: impl Into<Vec<u8>>) -> Self {
		Self {
			lifecycle: Lifecycle::new(),
			data: data.into(),
			pos: 0,
		}
	}

	/// Returns the bytes not yet read.
	pub fn remaining(&self) -> &[u8] {
		&self.data[self.pos..]
	}
}

impl StreamSource for MemorySource {
	fn state(&self) -> SourceState { self.lifecycle.state() }

	fn open(&mut self) -> Result {
		self.lifecycle.begin_open()?;
		self.lifecycle.opened();
		if self.remaining().is_empty() {
			self.lifecycle.finish();
		}
		Ok(())
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		if self.lifecycle.begin_read()? == ReadGate::End || buf.is_empty() {
			return Ok(0)
		}

		let remaining = self.remaining();
		let len = remaining.len().min(buf.len());
		buf[..len].copy_from_slice(&remaining[..len]);
		self.pos += len;
		self.lifecycle.reading();
		if self.pos == self.data.len() {
			self.lifecycle.finish();
		}
		Ok(len)
	}

	fn has_bytes_available(&mut self) -> bool {
		self.lifecycle.state().is_readable() && !self.remaining().is_empty()
	}

	fn close(&mut self) {
		if self.lifecycle.close() {
			self.data = Vec::new();
			self.pos = 0;
		}
	}

	fn current_error(&self) -> Option<&Fault> { self.lifecycle.fault() }

	fn len_hint(&self) -> Option<u64> {
		Some(self.data.len() as u64)
	}
}

impl From<Vec<u8>> for MemorySource {
	fn from(value: Vec<u8>) -> Self {
		Self::new(value)
	}
}

impl From<&[u8]> for MemorySource {
	fn from(value: &[u8]) -> Self {
		Self::new(value)
	}
}

impl From<String> for MemorySource {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for MemorySource {
	fn from(value: &str) -> Self {
		Self::new(value.as_bytes())
	}
}
