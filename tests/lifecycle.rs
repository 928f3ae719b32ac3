// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use stream_sources::{
	ChainSource, Error, Fault, FaultKind, GeneratorSource, MemorySource, SourceState, StreamSource
};

fn ten_bytes() -> MemorySource {
	MemorySource::new(*b"0123456789")
}

fn faulting(fault: Fault) -> GeneratorSource {
	GeneratorSource::from_iter([
		Ok(b"abc".to_vec()),
		Err(fault),
		Ok(b"never".to_vec()),
	])
}

fn unavailable() -> GeneratorSource {
	GeneratorSource::new(|| Err::<std::iter::Empty<_>, _>(
		Fault::msg(FaultKind::Io, "backing resource is missing")
	))
}

#[test]
fn new_sources_are_not_opened() {
	assert_eq!(ten_bytes().state(), SourceState::NotOpened);
	assert_eq!(MemorySource::default().state(), SourceState::NotOpened);
	assert_eq!(ChainSource::new().state(), SourceState::NotOpened);
	assert_eq!(unavailable().state(), SourceState::NotOpened);
	assert!(ten_bytes().current_error().is_none());
}

#[test]
fn bounded_reads() -> stream_sources::Result {
	let mut source = ten_bytes();
	source.open()?;
	assert_eq!(source.state(), SourceState::Open);

	let mut buf = [0; 4];
	assert_eq!(source.read(&mut buf)?, 4);
	assert_eq!(&buf, b"0123");
	assert_eq!(source.read(&mut buf)?, 4);
	assert_eq!(&buf, b"4567");
	assert_eq!(source.read(&mut buf)?, 2);
	assert_eq!(&buf[..2], b"89");
	assert_eq!(source.read(&mut buf)?, 0);
	assert_eq!(source.state(), SourceState::AtEnd);
	Ok(())
}

#[test]
fn reads_at_end_return_zero() -> stream_sources::Result {
	let mut source = ten_bytes();
	source.open()?;
	source.read(&mut [0; 16])?;
	for _ in 0..8 {
		assert_eq!(source.read(&mut [0; 16])?, 0);
		assert_eq!(source.state(), SourceState::AtEnd);
	}
	assert!(!source.has_bytes_available());
	Ok(())
}

#[test]
fn empty_buffer_reads_nothing() -> stream_sources::Result {
	let mut source = ten_bytes();
	source.open()?;
	assert_eq!(source.read(&mut [])?, 0);
	assert_eq!(source.state(), SourceState::Open);
	assert_eq!(source.read(&mut [0; 10])?, 10);
	Ok(())
}

#[test]
fn open_twice() -> stream_sources::Result {
	let mut source = ten_bytes();
	source.open()?;
	assert!(matches!(source.open(), Err(Error::AlreadyOpen)));
	// Misuse doesn't disturb the source.
	assert_eq!(source.state(), SourceState::Open);
	assert_eq!(source.read(&mut [0; 4])?, 4);
	assert!(matches!(source.open(), Err(Error::AlreadyOpen)));
	assert_eq!(source.state(), SourceState::Reading);
	Ok(())
}

#[test]
fn read_before_open() {
	let mut source = ten_bytes();
	assert!(matches!(source.read(&mut [0; 4]), Err(Error::NotOpen)));
	assert_eq!(source.state(), SourceState::NotOpened);
}

#[test]
fn open_unavailable() {
	let mut source = unavailable();
	let Err(Error::Unavailable(fault)) = source.open() else {
		panic!("expected an unavailable error")
	};
	assert_eq!(fault.kind(), FaultKind::Io);
	assert_eq!(source.state(), SourceState::Error);
	assert_eq!(source.current_error(), Some(&fault));
	assert!(matches!(source.read(&mut [0; 4]), Err(Error::Unavailable(_))));
	assert!(matches!(source.open(), Err(Error::AlreadyOpen)));
	assert_ne!(source.state(), SourceState::Open);
	assert_ne!(source.state(), SourceState::Reading);
}

#[test]
fn fault_mid_read() -> stream_sources::Result {
	let mut source = faulting(Fault::msg(FaultKind::Decode, "corrupt chunk"));
	source.open()?;

	let mut buf = [0; 3];
	assert_eq!(source.read(&mut buf)?, 3);
	assert_eq!(&buf, b"abc");

	let Err(Error::Io(fault)) = source.read(&mut buf) else {
		panic!("expected an I/O fault")
	};
	assert_eq!(fault.kind(), FaultKind::Decode);
	assert_eq!(source.state(), SourceState::Error);

	for _ in 0..3 {
		assert_eq!(source.current_error(), Some(&fault));
		assert_eq!(source.read(&mut buf), Err(Error::Io(fault.clone())));
	}

	source.close();
	source.close();
	assert_eq!(source.state(), SourceState::Closed);
	assert_eq!(source.current_error(), Some(&fault));
	Ok(())
}

#[test]
fn bytes_before_fault_are_delivered() -> stream_sources::Result {
	let mut source = faulting(Fault::msg(FaultKind::Io, "disk on fire"));
	source.open()?;

	let mut buf = [0; 16];
	assert_eq!(source.read(&mut buf)?, 3);
	assert_eq!(&buf[..3], b"abc");
	assert!(matches!(source.read(&mut buf), Err(Error::Io(_))));
	Ok(())
}

#[test]
fn faults_compare_by_identity() {
	let a = Fault::msg(FaultKind::Other, "same message");
	let b = Fault::msg(FaultKind::Other, "same message");
	assert_eq!(a, a.clone());
	assert_ne!(a, b);
}

#[test]
fn fault_displays_message() {
	let fault = Fault::msg(FaultKind::Decode, "corrupt chunk");
	assert_eq!(fault.cause().to_string(), "corrupt chunk");
	assert!(fault.to_string().ends_with(": corrupt chunk"));
}

#[test]
fn close_is_idempotent() -> stream_sources::Result {
	let mut source = ten_bytes();
	source.open()?;
	for _ in 0..4 {
		source.close();
		assert_eq!(source.state(), SourceState::Closed);
		assert!(source.current_error().is_none());
		assert!(!source.has_bytes_available());
	}
	Ok(())
}

#[test]
fn read_after_close_from_every_state() -> stream_sources::Result {
	let mut sources: Vec<Box<dyn StreamSource>> = Vec::new();

	// Not opened
	sources.push(Box::new(ten_bytes()));

	// Open
	let mut open = ten_bytes();
	open.open()?;
	sources.push(Box::new(open));

	// Reading
	let mut reading = ten_bytes();
	reading.open()?;
	reading.read(&mut [0; 4])?;
	sources.push(Box::new(reading));

	// At end
	let mut at_end = ten_bytes();
	at_end.open()?;
	at_end.read(&mut [0; 16])?;
	sources.push(Box::new(at_end));

	// Error
	let mut error = unavailable();
	let _ = error.open();
	sources.push(Box::new(error));

	for mut source in sources {
		source.close();
		for _ in 0..3 {
			assert!(matches!(source.read(&mut [0; 4]), Err(Error::Closed)));
		}
		assert!(matches!(source.open(), Err(Error::Closed)));
		assert_eq!(source.state(), SourceState::Closed);
	}
	Ok(())
}

#[test]
fn misuse_errors() {
	assert!(Error::AlreadyOpen.is_misuse());
	assert!(Error::Closed.is_misuse());
	assert!(Error::NotOpen.is_misuse());
	assert!(!Error::Io(Fault::timeout()).is_misuse());
	assert!(Error::Io(Fault::timeout()).fault().is_some());
	assert!(Error::end(4).fault().is_none());
}
