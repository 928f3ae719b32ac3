// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use stream_sources::{
	ChainSource, Error, GeneratorSource, MemorySource, SourceState, StreamSource
};

/// Reads `source` with the given read sizes, cycling through them, until it
/// reaches its end.
fn read_all(source: &mut impl StreamSource, sizes: &[usize]) -> stream_sources::Result<Vec<u8>> {
	source.open()?;
	let mut read = Vec::new();
	let mut buf = vec![0; sizes.iter().copied().max().unwrap_or(1)];
	for &size in sizes.iter().cycle() {
		let count = source.read(&mut buf[..size])?;
		assert!(count <= size);
		read.extend_from_slice(&buf[..count]);
		if source.state() == SourceState::AtEnd && count == 0 {
			break
		}
	}
	Ok(read)
}

fn chunked(data: &[u8], split: usize) -> GeneratorSource {
	let chunks: Vec<_> = data.chunks(split.max(1)).map(|chunk| Ok(chunk.to_vec())).collect();
	GeneratorSource::from_iter(chunks)
}

fn read_sizes() -> impl Strategy<Value = Vec<usize>> {
	prop::collection::vec(1..64usize, 1..8)
}

proptest! {
	#[test]
	fn memory_reconstructs(data in prop::collection::vec(any::<u8>(), 0..512), sizes in read_sizes()) {
		let mut source = MemorySource::new(data.clone());
		prop_assert_eq!(read_all(&mut source, &sizes)?, data);
	}

	#[test]
	fn generator_reconstructs(
		data in prop::collection::vec(any::<u8>(), 0..512),
		split in 1..100usize,
		sizes in read_sizes()
	) {
		let mut source = chunked(&data, split);
		prop_assert_eq!(read_all(&mut source, &sizes)?, data);
	}

	#[test]
	fn chain_reconstructs(
		parts in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..8),
		sizes in read_sizes()
	) {
		let mut source = ChainSource::new();
		for (i, part) in parts.iter().enumerate() {
			if i % 2 == 0 {
				source.push(MemorySource::new(part.clone()))?;
			} else {
				source.push(chunked(part, 7))?;
			}
		}
		prop_assert_eq!(read_all(&mut source, &sizes)?, parts.concat());
	}

	#[test]
	fn at_end_stays_at_end(data in prop::collection::vec(any::<u8>(), 0..64), extra in 1..16usize) {
		let mut source = MemorySource::new(data);
		read_all(&mut source, &[16])?;
		for _ in 0..extra {
			prop_assert_eq!(source.read(&mut [0; 8])?, 0);
			prop_assert_eq!(source.state(), SourceState::AtEnd);
		}
	}

	#[test]
	fn close_is_final(data in prop::collection::vec(any::<u8>(), 1..64), reads in 0..4usize, closes in 1..4usize) {
		let mut source = MemorySource::new(data);
		source.open()?;
		for _ in 0..reads {
			source.read(&mut [0; 8])?;
		}
		for _ in 0..closes {
			source.close();
			prop_assert_eq!(source.state(), SourceState::Closed);
		}
		prop_assert!(matches!(source.read(&mut [0; 8]), Err(Error::Closed)));
	}
}
