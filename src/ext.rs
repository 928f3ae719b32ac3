// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

#[cfg(feature = "utf8")]
use alloc::string::String;
use alloc::vec::Vec;
use bytemuck::{bytes_of_mut, Pod};
use num_traits::PrimInt;
use crate::drive::{self, DrainOptions};
use crate::{Error, ReadMode, Result, StreamSource};

/// Convenience reads for any [`StreamSource`]. The source must already be open;
/// none of these methods open or close it.
pub trait ReadExt: StreamSource {
	/// Reads until `buf` is full, returning an end-of-stream error if the source
	/// ends first. Non-blocking sources are waited on between reads, without a
	/// deadline. Bytes read before an end-of-stream error are consumed.
	fn read_exact(&mut self, buf: &mut [u8]) -> Result {
		let mut filled = 0;
		while filled < buf.len() {
			match self.read(&mut buf[filled..])? {
				0 if self.read_mode() == ReadMode::NonBlocking && !self.state().is_terminal() => {
					self.wait_ready(drive::FOREVER)?;
				}
				0 => return Err(Error::end(buf.len())),
				count => filled += count
			}
		}
		Ok(())
	}

	/// Reads an array with a size of `N` bytes.
	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> where Self: Sized {
		let mut array = [0; N];
		self.read_exact(&mut array)?;
		Ok(array)
	}

	/// Reads a [`u8`].
	fn read_u8(&mut self) -> Result<u8> { self.read_int_be_spec() }
	/// Reads a big-endian [`u16`].
	fn read_u16(&mut self) -> Result<u16> { self.read_int_be_spec() }
	/// Reads a little-endian [`u16`].
	fn read_u16_le(&mut self) -> Result<u16> { self.read_int_le_spec() }
	/// Reads a big-endian [`u32`].
	fn read_u32(&mut self) -> Result<u32> { self.read_int_be_spec() }
	/// Reads a little-endian [`u32`].
	fn read_u32_le(&mut self) -> Result<u32> { self.read_int_le_spec() }
	/// Reads a big-endian [`u64`].
	fn read_u64(&mut self) -> Result<u64> { self.read_int_be_spec() }
	/// Reads a little-endian [`u64`].
	fn read_u64_le(&mut self) -> Result<u64> { self.read_int_le_spec() }

	/// Reads a big-endian integer.
	fn read_int<T: PrimInt + Pod>(&mut self) -> Result<T> where Self: Sized {
		self.read_int_be_spec()
	}
	/// Reads a little-endian integer.
	fn read_int_le<T: PrimInt + Pod>(&mut self) -> Result<T> where Self: Sized {
		self.read_int_le_spec()
	}

	/// Reads a value of generic type `T` supporting an arbitrary bit pattern. See
	/// [`Pod`].
	fn read_data<T: Pod>(&mut self) -> Result<T> where Self: Sized {
		self.read_data_spec()
	}

	/// Reads all remaining bytes into `buf`, returning the bytes appended.
	fn read_to_end<'a>(&mut self, buf: &'a mut Vec<u8>) -> Result<&'a [u8]> {
		let start = buf.len();
		drive::pump(self, buf, &DrainOptions::default())?;
		Ok(&buf[start..])
	}

	/// Reads all remaining bytes as UTF-8 into `buf`, returning the string
	/// appended. If invalid bytes are encountered, an error is returned and `buf`
	/// is unchanged; the source is left at its end.
	#[cfg(feature = "utf8")]
	fn read_utf8_to_end<'a>(&mut self, buf: &'a mut String) -> Result<&'a str> {
		let mut bytes = Vec::new();
		self.read_to_end(&mut bytes)?;
		let str = simdutf8::compat::from_utf8(&bytes)?;
		let start = buf.len();
		buf.push_str(str);
		Ok(&buf[start..])
	}
}

impl<S: StreamSource + ?Sized> ReadExt for S { }

/// Helper extension trait for reading generic data from an unsized source.
trait ReadSpec<T: Pod>: StreamSource {
	fn read_int_be_spec(&mut self) -> Result<T> where T: PrimInt {
		self.read_data_spec().map(T::from_be)
	}
	fn read_int_le_spec(&mut self) -> Result<T> where T: PrimInt {
		self.read_data_spec().map(T::from_le)
	}
	fn read_data_spec(&mut self) -> Result<T> {
		let mut value = T::zeroed();
		ReadExt::read_exact(self, bytes_of_mut(&mut value))?;
		Ok(value)
	}
}

impl<S: StreamSource + ?Sized, T: Pod> ReadSpec<T> for S { }
