// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The per-thread current-actor slot.
//!
//! Every execution unit created by [`spawn`](crate::spawn::spawn) (or
//! entered with [`run`](crate::spawn::run)) carries its mailbox and a
//! cached self handle in thread-local storage. `self_handle`, `receive`
//! and `monitor` read this slot; touching it from a thread that is not an
//! actor is a programming error and fails fast.

use std::{
	cell::{Cell, RefCell},
	sync::Arc,
};

use crate::{error::ActorError, handle::Handle, mailbox::Mailbox};

struct ActorContext {
	mailbox: Arc<Mailbox>,
	handle: Handle,
}

thread_local! {
	static CURRENT: RefCell<Option<ActorContext>> = const { RefCell::new(None) };
	static LEAVE: Cell<bool> = const { Cell::new(false) };
}

/// Install `mailbox` as this thread's current actor.
///
/// Returns a guard that uninstalls it again, on return or unwind alike.
///
/// # Panics
///
/// If the thread already hosts an actor context.
pub(crate) fn install(mailbox: Arc<Mailbox>) -> ContextGuard {
	CURRENT.with(|slot| {
		let mut slot = slot.borrow_mut();
		if slot.is_some() {
			panic!("{}", ActorError::NestedContext);
		}
		let handle = Handle::new(mailbox.clone());
		*slot = Some(ActorContext {
			mailbox,
			handle,
		});
	});
	ContextGuard {
		_private: (),
	}
}

pub(crate) struct ContextGuard {
	_private: (),
}

impl Drop for ContextGuard {
	fn drop(&mut self) {
		CURRENT.with(|slot| slot.borrow_mut().take());
		LEAVE.with(|flag| flag.set(false));
	}
}

pub(crate) fn current_mailbox() -> Arc<Mailbox> {
	CURRENT.with(|slot| slot.borrow().as_ref().map(|context| context.mailbox.clone()))
		.unwrap_or_else(|| panic!("{}", ActorError::OutsideActor))
}

pub(crate) fn current_handle() -> Handle {
	CURRENT.with(|slot| slot.borrow().as_ref().map(|context| context.handle.clone()))
		.unwrap_or_else(|| panic!("{}", ActorError::OutsideActor))
}

/// Request that the innermost receive loop on this thread exits after the
/// current dispatch.
pub(crate) fn set_leave_flag() {
	let inside = CURRENT.with(|slot| slot.borrow().is_some());
	if !inside {
		panic!("{}", ActorError::OutsideActor);
	}
	LEAVE.with(|flag| flag.set(true));
}

/// Consume the leave flag; true exactly once per `leave_loop` call.
pub(crate) fn take_leave_flag() -> bool {
	LEAVE.with(|flag| flag.replace(false))
}
