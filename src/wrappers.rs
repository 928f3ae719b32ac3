// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::boxed::Box;
use core::time::Duration;
use crate::{Fault, ReadMode, Result, SourceState, StreamSource};

macro_rules! delegate_impl {
    (with $reduced:expr;
	$(
	fn $name:ident($($params:tt)+)$( -> $ret:ty)?;
	)+) => {
		$(fn $name($($params)+)$( -> $ret)? {
			delegate_impl!(@$reduced;$name($($params)+))
		})+
	};
	(@$reduced:expr;$name:ident(&$(mut)? self$(, $param:ident: $param_ty:ty)*)) => {
		$reduced.$name($($param),*)
	};
}

macro_rules! impl_source {
    ($($(#[$attr:meta])? impl<$gen:ident> for $ty:ty;)+) => {
		$(
		$(#[$attr])?
		impl<$gen: StreamSource + ?Sized> StreamSource for $ty {
			delegate_impl! {
				with **self;
				fn state(&self) -> SourceState;
				fn open(&mut self) -> Result;
				fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
				fn has_bytes_available(&mut self) -> bool;
				fn close(&mut self);
				fn len_hint(&self) -> Option<u64>;
				fn read_mode(&self) -> ReadMode;
				fn wait_ready(&mut self, timeout: Duration) -> Result<bool>;
			}

			fn current_error(&self) -> Option<&Fault> {
				(**self).current_error()
			}
		})+
	};
}

impl_source! {
	impl<S> for &mut S;
	impl<S> for Box<S>;
}
