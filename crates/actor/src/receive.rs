// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The receive family: every way an actor consumes its mailbox.
//!
//! All functions here operate on the calling thread's current-actor
//! context and panic outside one. Blocking happens only on the mailbox
//! condvar; a matched handler always runs with the mailbox unlocked and
//! may itself send, spawn, monitor, or receive again.

use std::time::{Duration, Instant};

use crate::{context, error::ActorError, handle::Handle, matcher::Matcher};

/// Handle for the current actor.
///
/// # Panics
///
/// Outside an actor context.
pub fn self_handle() -> Handle {
	context::current_handle()
}

/// Selective receive: block until a queued or future message matches one
/// of the matcher's arms, then run that arm.
///
/// Messages examined but not matched are deferred in arrival order and
/// offered first to later receives. A failure escaping the arm propagates
/// to the caller; the message counts as consumed either way.
pub fn receive(mut matcher: Matcher<'_>) {
	receive_with(&mut matcher);
}

/// Like [`receive`], but gives up `window` after the call.
///
/// Returns true if an arm ran, false on timeout. The deferred buffer is
/// scanned once before any wait and survives a timeout untouched.
pub fn receive_for(window: Duration, matcher: Matcher<'_>) -> bool {
	receive_until(Instant::now() + window, matcher)
}

/// Like [`receive`], but gives up at `deadline`.
///
/// Returns true if an arm ran, false once the deadline passes.
pub fn receive_until(deadline: Instant, mut matcher: Matcher<'_>) -> bool {
	let mailbox = context::current_mailbox();
	if matcher.is_empty() {
		panic!("{}", ActorError::EmptyMatcher);
	}
	mailbox.receive(&mut matcher, Some(deadline))
}

/// Repeat [`receive`] with the same matcher until an arm in the current
/// iteration calls [`leave_loop`].
///
/// The message that triggered the exit is consumed like any other;
/// everything still queued stays for future receives.
pub fn receive_loop(mut matcher: Matcher<'_>) {
	loop {
		receive_with(&mut matcher);
		if context::take_leave_flag() {
			return;
		}
	}
}

/// Exit the innermost [`receive_loop`] after the current dispatch.
///
/// Not a failure: the loop returns normally. Calling it with no loop
/// running is harmless apart from ending the next loop's first iteration.
///
/// # Panics
///
/// Outside an actor context.
pub fn leave_loop() {
	context::set_leave_flag();
}

/// Receive a single message of type `M` and return its payload.
///
/// Equivalent to a one-armed [`receive`] that hands the value out; plain
/// request/reply protocols read better with the payload in hand.
pub fn receive_one<M: Send + 'static>() -> M {
	let mut slot = None;
	receive(Matcher::new().on(|value: M| slot = Some(value)));
	slot.expect("matched arm stored the payload")
}

fn receive_with(matcher: &mut Matcher<'_>) {
	let mailbox = context::current_mailbox();
	if matcher.is_empty() {
		panic!("{}", ActorError::EmptyMatcher);
	}
	if !mailbox.receive(matcher, None) {
		// Only reachable when something marked this mailbox dead while we
		// waited; the lifecycle wrapper never does that before the body
		// returns, so treat it as a fatal usage failure.
		panic!("{}", ActorError::MailboxClosed);
	}
}
