// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use core::time::Duration;
use crate::{Fault, ReadMode, Result, SourceState, StreamSource};
use super::{ChainSource, GeneratorSource, MemorySource};
#[cfg(feature = "std")]
use super::{FileSource, PipeSource};

/// Any of the sources provided by this crate, dispatched without boxing.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnySource {
	Memory(MemorySource),
	#[cfg(feature = "std")]
	File(FileSource),
	Generator(GeneratorSource),
	Chain(ChainSource),
	#[cfg(feature = "std")]
	Pipe(PipeSource),
}

macro_rules! dispatch {
    ($self:expr, $source:ident => $body:expr) => {
		match $self {
			AnySource::Memory($source) => $body,
			#[cfg(feature = "std")]
			AnySource::File($source) => $body,
			AnySource::Generator($source) => $body,
			AnySource::Chain($source) => $body,
			#[cfg(feature = "std")]
			AnySource::Pipe($source) => $body,
		}
	};
}

impl StreamSource for AnySource {
	fn state(&self) -> SourceState {
		dispatch!(self, source => source.state())
	}

	fn open(&mut self) -> Result {
		dispatch!(self, source => source.open())
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		dispatch!(self, source => source.read(buf))
	}

	fn has_bytes_available(&mut self) -> bool {
		dispatch!(self, source => source.has_bytes_available())
	}

	fn close(&mut self) {
		dispatch!(self, source => source.close())
	}

	fn current_error(&self) -> Option<&Fault> {
		dispatch!(self, source => source.current_error())
	}

	fn len_hint(&self) -> Option<u64> {
		dispatch!(self, source => source.len_hint())
	}

	fn read_mode(&self) -> ReadMode {
		dispatch!(self, source => source.read_mode())
	}

	fn wait_ready(&mut self, timeout: Duration) -> Result<bool> {
		dispatch!(self, source => source.wait_ready(timeout))
	}
}

macro_rules! impl_from {
    ($($(#[$attr:meta])? $variant:ident($ty:ty);)+) => {
		$(
		$(#[$attr])?
		impl From<$ty> for AnySource {
			fn from(value: $ty) -> Self {
				Self::$variant(value)
			}
		})+
	};
}

impl_from! {
	Memory(MemorySource);
	#[cfg(feature = "std")]
	File(FileSource);
	Generator(GeneratorSource);
	Chain(ChainSource);
	#[cfg(feature = "std")]
	Pipe(PipeSource);
}
