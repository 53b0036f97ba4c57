// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Binding execution units to mailboxes.

use std::{
	any::Any,
	panic::{self, AssertUnwindSafe},
	sync::Arc,
	thread,
};

use crossbeam_channel::bounded;
use tracing::{debug, error};

use crate::{
	context,
	handle::Handle,
	mailbox::Mailbox,
	notice::{Exited, Failed, Fault},
};

/// Spawn a new actor on a dedicated OS thread.
///
/// Arguments travel in the closure. The call returns only after the child
/// thread has installed its mailbox as its current-actor context, so the
/// returned [`Handle`] is immediately addressable and `self_handle()`
/// inside the body is already valid when the caller proceeds.
///
/// Termination, normal or failed, marks the mailbox dead and notifies its
/// monitors with [`Exited`] or [`Failed`]; the body's return value is
/// discarded. A failure never propagates beyond the actor.
pub fn spawn<F, T>(body: F) -> Handle
where
	F: FnOnce() -> T + Send + 'static,
{
	let mailbox = Arc::new(Mailbox::new());
	let handle = Handle::new(mailbox.clone());
	let name = format!("actor-{}", mailbox.id());

	let (ready_tx, ready_rx) = bounded::<()>(0);

	thread::Builder::new()
		.name(name)
		.spawn(move || {
			let guard = context::install(mailbox);
			let _ = ready_tx.send(());
			let _ = run_body(body);
			drop(guard);
		})
		.expect("failed to spawn actor thread");

	ready_rx.recv().expect("actor thread ended before installing its context");
	handle
}

/// Run `body` as an actor on the current thread.
///
/// Installs a fresh mailbox as this thread's actor context, so the body
/// may publish `self_handle()`, receive, and monitor like any spawned
/// actor; the original rendezvous broker runs this way on the main
/// thread. On exit the mailbox is marked dead and monitors are notified
/// exactly as for [`spawn`]; unlike `spawn`, the body's value is returned
/// to the caller and a failure resumes unwinding after the notification.
///
/// # Panics
///
/// If the current thread already hosts an actor context.
pub fn run<F, T>(body: F) -> T
where
	F: FnOnce() -> T,
{
	let mailbox = Arc::new(Mailbox::new());
	let guard = context::install(mailbox);
	let outcome = run_body(body);
	drop(guard);
	match outcome {
		Ok(value) => value,
		Err(payload) => panic::resume_unwind(payload),
	}
}

/// Shared lifecycle wrapper: run the body, then mark the mailbox dead
/// with the matching death notice.
fn run_body<F, T>(body: F) -> Result<T, Box<dyn Any + Send>>
where
	F: FnOnce() -> T,
{
	let mailbox = context::current_mailbox();
	let me = context::current_handle();
	debug!(actor = mailbox.id(), "actor starting");

	let outcome = panic::catch_unwind(AssertUnwindSafe(body));
	// A leave flag that escaped every loop counts as an ordinary return.
	context::take_leave_flag();

	match outcome {
		Ok(value) => {
			debug!(actor = mailbox.id(), "actor stopped");
			mailbox.mark_dead(Exited(me));
			Ok(value)
		}
		Err(payload) => {
			let fault = Fault::from_panic(payload.as_ref());
			error!(actor = mailbox.id(), fault = %fault, "actor failed");
			mailbox.mark_dead(Failed(me, fault));
			Err(payload)
		}
	}
}
