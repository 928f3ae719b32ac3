// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use crate::{Fault, Lifecycle, ReadGate, Result, SourceState, StreamSource};

/// A source reading a file from disk. The file is opened on [`open`] and its
/// handle dropped on [`close`].
///
/// [`open`]: StreamSource::open
/// [`close`]: StreamSource::close
#[derive(Debug)]
pub struct FileSource {
	lifecycle: Lifecycle,
	path: PathBuf,
	file: Option<File>,
	len: Option<u64>,
}

impl FileSource {
	pub fn new(path: impl AsRef<Path>) -> Self {
		Self {
			lifecycle: Lifecycle::new(),
			path: path.as_ref().to_path_buf(),
			file: None,
			len: None,
		}
	}

	pub fn path(&self) -> &Path { &self.path }
}

impl StreamSource for FileSource {
	fn state(&self) -> SourceState { self.lifecycle.state() }

	fn open(&mut self) -> Result {
		self.lifecycle.begin_open()?;
		let file = match File::open(&self.path) {
			Ok(file) => file,
			Err(error) => return Err(self.lifecycle.open_failed(error.into()))
		};

		self.len = file.metadata().ok().map(|meta| meta.len());
		log::debug!(
			"opened {} ({} bytes)",
			self.path.display(),
			self.len.map_or_else(|| "unknown".into(), |len| len.to_string())
		);
		self.file = Some(file);
		self.lifecycle.opened();
		Ok(())
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		if self.lifecycle.begin_read()? == ReadGate::End || buf.is_empty() {
			return Ok(0)
		}

		let Some(file) = self.file.as_mut() else {
			return Err(crate::Error::Closed)
		};

		let count = loop {
			match file.read(buf) {
				Ok(count) => break count,
				Err(err) if err.kind() == ErrorKind::Interrupted => { }
				Err(err) => return Err(self.lifecycle.fail(err.into()))
			}
		};

		self.lifecycle.reading();
		if count == 0 {
			self.lifecycle.finish();
		}
		Ok(count)
	}

	fn has_bytes_available(&mut self) -> bool {
		// Files never block, so a readable file is always ready. The read may still
		// observe the end.
		self.lifecycle.state().is_readable()
	}

	fn close(&mut self) {
		if self.lifecycle.close() && self.file.take().is_some() {
			log::debug!("closed {}", self.path.display());
		}
	}

	fn current_error(&self) -> Option<&Fault> { self.lifecycle.fault() }

	fn len_hint(&self) -> Option<u64> { self.len }
}
