// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Death notices delivered to monitors.
//!
//! When an actor terminates, its mailbox sends each monitor exactly one
//! of these as a final message: [`Exited`] for a normal return, [`Failed`]
//! when the body escaped with a failure.

use std::{any::Any, fmt, sync::Arc};

use crate::handle::Handle;

/// Delivered to monitors when an actor's body returned normally.
#[derive(Clone, Debug)]
pub struct Exited(pub Handle);

/// Delivered to monitors when an actor's body failed.
///
/// The payload is opaque; it exists so a supervisor can log or forward
/// the cause, not so it can be inspected structurally.
#[derive(Clone, Debug)]
pub struct Failed(pub Handle, pub Fault);

/// The captured cause of an actor failure.
///
/// Cloneable so a mailbox with several monitors can hand each one a copy.
#[derive(Clone)]
pub struct Fault {
	message: Arc<str>,
}

impl Fault {
	/// Flatten a panic payload into its conventional string forms.
	pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
		let message: Arc<str> = if let Some(text) = payload.downcast_ref::<&str>() {
			(*text).into()
		} else if let Some(text) = payload.downcast_ref::<String>() {
			text.as_str().into()
		} else {
			"actor body failed with a non-string payload".into()
		};
		Self {
			message,
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

impl fmt::Display for Fault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)
	}
}

impl fmt::Debug for Fault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Fault").field(&self.message).finish()
	}
}
