// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

//! This crate provides [`StreamSource`], a pull-based source of bytes with an
//! explicit lifecycle: a source is opened, read in bounded chunks until its end,
//! and closed. It fits consumers which move a payload somewhere without holding
//! all of it in memory, such as an uploader streaming a request body.
//!
//! Sources over memory, files, chunk generators, chains of other sources, and
//! thread-fed pipes are provided, but it's easy to write your own by embedding a
//! [`Lifecycle`]:
//!
//! ```no_run
//! # use stream_sources::{Fault, Lifecycle, ReadGate, Result, SourceState, StreamSource};
//!
//! struct Counter {
//!     lifecycle: Lifecycle,
//!     next: u8,
//! }
//!
//! impl StreamSource for Counter {
//!     fn state(&self) -> SourceState { self.lifecycle.state() }
//!
//!     fn open(&mut self) -> Result {
//!         self.lifecycle.begin_open()?;
//!         self.lifecycle.opened();
//!         Ok(())
//!     }
//!
//!     fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
//!         if self.lifecycle.begin_read()? == ReadGate::End || buf.is_empty() {
//!             return Ok(0)
//!         }
//!
//!         let mut count = 0;
//!         for byte in buf.iter_mut() {
//!             if self.next == u8::MAX {
//!                 break
//!             }
//!             *byte = self.next;
//!             self.next += 1;
//!             count += 1;
//!         }
//!
//!         self.lifecycle.reading();
//!         if count == 0 {
//!             self.lifecycle.finish();
//!         }
//!         Ok(count)
//!     }
//!
//!     fn has_bytes_available(&mut self) -> bool {
//!         self.lifecycle.state().is_readable() && self.next < u8::MAX
//!     }
//!
//!     fn close(&mut self) {
//!         self.lifecycle.close();
//!     }
//!
//!     fn current_error(&self) -> Option<&Fault> { self.lifecycle.fault() }
//! }
//! ```
//!
//! To move a source's bytes elsewhere, see the [`drive`] module and
//! [`ReadExt`].

#![cfg_attr(not(feature = "std"), no_std)]

#![deny(clippy::pedantic)]
#![allow(
	clippy::cast_possible_truncation, // Yes, and?
	clippy::module_name_repetitions,
	clippy::must_use_candidate,
	clippy::missing_errors_doc,
)]

extern crate alloc;

mod error;
mod ext;
mod source;
mod state;
mod std_io;
mod wrappers;
pub mod drive;

pub use error::{Error, Fault, FaultKind};
#[cfg(feature = "utf8")]
pub use error::Utf8Error;
pub use ext::ReadExt;
pub use source::{AnySource, ChainSource, Chunks, GeneratorSource, MemorySource, StreamSource};
#[cfg(feature = "std")]
pub use source::{pipe, FileSource, PipeSource, PipeWriter};
pub use state::{Lifecycle, ReadGate, ReadMode, SourceState};
#[cfg(feature = "std")]
pub use std_io::SourceReader;

pub type Result<T = (), E = Error> = core::result::Result<T, E>;
