// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

#![cfg(feature = "std")]

use std::io::{BufWriter, ErrorKind, Read};
use stream_sources::drive::{self, DrainOptions};
use stream_sources::{
	pipe, Error, Fault, FaultKind, GeneratorSource, MemorySource, ReadExt, SourceReader, SourceState,
	StreamSource
};

fn init_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn read_to_end_closes_on_success() -> stream_sources::Result {
	init_logger();
	let mut source = MemorySource::new(vec![7; 100_000]);
	let bytes = drive::read_to_end(&mut source, &DrainOptions::new().with_chunk_size(1000))?;
	assert_eq!(bytes, vec![7; 100_000]);
	assert_eq!(source.state(), SourceState::Closed);
	Ok(())
}

#[test]
fn read_to_end_closes_on_fault() {
	init_logger();
	let mut source = GeneratorSource::from_iter([
		Ok(b"partial".to_vec()),
		Err(Fault::msg(FaultKind::Io, "connection reset")),
	]);
	let result = drive::read_to_end(&mut source, &DrainOptions::default());
	assert!(matches!(result, Err(Error::Io(_))));
	assert_eq!(source.state(), SourceState::Closed);
	assert!(source.current_error().is_some());
}

#[test]
fn read_to_end_closes_on_unavailable() {
	init_logger();
	let mut source = GeneratorSource::new(|| Err::<std::iter::Empty<_>, _>(
		Fault::msg(FaultKind::Io, "missing")
	));
	let result = drive::read_to_end(&mut source, &DrainOptions::default());
	assert!(matches!(result, Err(Error::Unavailable(_))));
	assert_eq!(source.state(), SourceState::Closed);
}

#[test]
fn read_to_end_continues_opened_source() -> stream_sources::Result {
	let mut source = MemorySource::from("0123456789");
	source.open()?;
	source.read(&mut [0; 4])?;
	let bytes = drive::read_to_end(&mut source, &DrainOptions::new().with_capacity(16))?;
	assert_eq!(bytes, b"456789");
	Ok(())
}

#[test]
fn copy_to_writer() -> stream_sources::Result {
	let mut source = GeneratorSource::from_iter((0..10u8).map(|i| Ok(vec![i; 10])));
	let mut sink = BufWriter::new(Vec::new());
	let count = drive::copy_to(&mut source, &mut sink, &DrainOptions::new().with_chunk_size(3))?;
	assert_eq!(count, 100);
	assert_eq!(source.state(), SourceState::Closed);

	let expected: Vec<u8> = (0..10u8).flat_map(|i| [i; 10]).collect();
	assert_eq!(sink.into_inner().unwrap(), expected);
	Ok(())
}

#[test]
fn options() {
	let options = DrainOptions::default();
	assert_eq!(options.chunk_size(), 65535);
	assert_eq!(options.capacity(), 0);
	assert_eq!(options.ready_timeout(), None);
	assert_eq!(DrainOptions::new().with_chunk_size(0).chunk_size(), 1);
}

#[test]
fn typed_reads() -> stream_sources::Result {
	let mut source = MemorySource::new(vec![
		0x12,
		0x12, 0x34,
		0x12, 0x34,
		0x00, 0x00, 0x01, 0x00,
		0xFF, 0xFF, 0xFF, 0xFE,
		1, 2, 3,
	]);
	source.open()?;
	assert_eq!(source.read_u8()?, 0x12);
	assert_eq!(source.read_u16()?, 0x1234);
	assert_eq!(source.read_u16_le()?, 0x3412);
	assert_eq!(source.read_u32()?, 0x100);
	assert_eq!(source.read_int::<i32>()?, -2);
	assert_eq!(source.read_array::<2>()?, [1, 2]);
	assert_eq!(source.read_u16(), Err(Error::end(2)));
	Ok(())
}

#[test]
fn read_exact_across_chunks() -> stream_sources::Result {
	let mut source = GeneratorSource::from_iter([
		Ok(vec![0xAB]),
		Ok(vec![0xCD, 0xEF]),
		Ok(vec![0x01]),
	]);
	source.open()?;
	assert_eq!(source.read_u32_le()?, 0x01EF_CDAB);
	Ok(())
}

#[test]
fn read_exact_waits_for_pipe() -> stream_sources::Result {
	let (writer, mut source) = pipe(4);
	source.open()?;
	let producer = std::thread::spawn(move || {
		for byte in [0, 0, 0, 0, 0, 0, 1, 0] {
			writer.write(vec![byte])?;
		}
		Ok::<(), stream_sources::Error>(())
	});
	assert_eq!(source.read_u64()?, 0x100);
	producer.join().unwrap()?;
	Ok(())
}

#[test]
fn reader_bridge() -> std::io::Result<()> {
	let mut reader = SourceReader::new(MemorySource::from("hello world"));
	let mut string = String::new();
	reader.read_to_string(&mut string)?;
	assert_eq!(string, "hello world");
	assert_eq!(reader.get_ref().state(), SourceState::AtEnd);
	Ok(())
}

#[test]
fn reader_bridge_would_block() -> stream_sources::Result {
	let (writer, source) = pipe(1);
	let mut reader = SourceReader::new(source);
	let error = reader.read(&mut [0; 4]).unwrap_err();
	assert_eq!(error.kind(), ErrorKind::WouldBlock);

	writer.write(&b"ab"[..])?;
	drop(writer);
	let mut buf = Vec::new();
	reader.read_to_end(&mut buf).unwrap();
	assert_eq!(buf, b"ab");
	Ok(())
}

#[test]
fn reader_bridge_fault() {
	let mut reader = SourceReader::new(GeneratorSource::from_iter([
		Err(Fault::msg(FaultKind::Decode, "bad"))
	]));
	let error = reader.read(&mut [0; 4]).unwrap_err();
	assert_eq!(error.kind(), ErrorKind::InvalidData);
	let mut source = reader.into_inner();
	assert_eq!(source.state(), SourceState::Error);
	source.close();
}
