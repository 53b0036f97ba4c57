// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The per-actor message store.
//!
//! A [`Mailbox`] is an unbounded FIFO of type-erased messages plus a side
//! `pending` buffer holding messages an earlier selective receive examined
//! but did not match. One mutex guards both queues, the liveness flag and
//! the monitor list; one condvar is signalled on enqueue and on death.
//!
//! Selective receive is Erlang-shaped: `pending` is offered first in
//! arrival order, then heads of `incoming` are either dispatched or moved
//! to the tail of `pending`. Handlers always run with the lock released,
//! so a handler may send, spawn, monitor, or receive again.

use std::{
	any::{Any, TypeId},
	collections::VecDeque,
	sync::{
		Weak,
		atomic::{AtomicBool, AtomicU64, Ordering},
	},
	time::Instant,
};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::matcher::Matcher;

/// Counter for generating unique mailbox ids.
static MAILBOX_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A type-erased message.
///
/// The payload's [`TypeId`] is the message's identity for dispatch; the
/// type name is retained for tracing only.
pub(crate) struct Message {
	payload: Box<dyn Any + Send>,
	signature: TypeId,
	shape: &'static str,
}

impl Message {
	pub(crate) fn new<M: Send + 'static>(value: M) -> Self {
		Self {
			payload: Box::new(value),
			signature: TypeId::of::<M>(),
			shape: std::any::type_name::<M>(),
		}
	}

	pub(crate) fn signature(&self) -> TypeId {
		self.signature
	}

	pub(crate) fn shape(&self) -> &'static str {
		self.shape
	}

	pub(crate) fn into_payload(self) -> Box<dyn Any + Send> {
		self.payload
	}
}

struct State {
	incoming: VecDeque<Message>,
	pending: VecDeque<Message>,
	living: bool,
	monitors: Vec<Weak<Mailbox>>,
}

/// The message store owned by one actor.
///
/// Shared between the owning actor (the only reader) and every
/// [`Handle`](crate::handle::Handle) holder (writers). Monitor
/// subscriptions hold weak references only, so a cyclic monitor relation
/// cannot leak mailboxes.
pub(crate) struct Mailbox {
	id: u64,
	/// Mirror of `State::living` for the lock-free `alive()` snapshot.
	living: AtomicBool,
	state: Mutex<State>,
	arrival: Condvar,
}

impl Mailbox {
	pub(crate) fn new() -> Self {
		Self {
			id: MAILBOX_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
			living: AtomicBool::new(true),
			state: Mutex::new(State {
				incoming: VecDeque::new(),
				pending: VecDeque::new(),
				living: true,
				monitors: Vec::new(),
			}),
			arrival: Condvar::new(),
		}
	}

	pub(crate) fn id(&self) -> u64 {
		self.id
	}

	/// Non-authoritative liveness snapshot. The owner may terminate right
	/// after this returns true.
	pub(crate) fn alive(&self) -> bool {
		self.living.load(Ordering::SeqCst)
	}

	/// Append a message to `incoming` and wake one waiter.
	///
	/// A message enqueued after death is dropped, never delivered.
	pub(crate) fn enqueue(&self, message: Message) {
		let mut state = self.state.lock();
		if !state.living {
			trace!(mailbox = self.id, shape = message.shape(), "dropped send to dead mailbox");
			return;
		}
		state.incoming.push_back(message);
		self.arrival.notify_one();
	}

	/// Subscribe `watcher` to this mailbox's death notification.
	///
	/// Returns false if this mailbox is already dead; no notification will
	/// ever arrive in that case. Repeated subscription produces repeated
	/// notifications.
	pub(crate) fn monitor(&self, watcher: Weak<Mailbox>) -> bool {
		let mut state = self.state.lock();
		if !state.living {
			return false;
		}
		state.monitors.push(watcher);
		true
	}

	/// Transition to dead, exactly once.
	///
	/// Drains both queues, wakes every waiter, and delivers a copy of
	/// `notice` to each monitor whose mailbox still exists. Notices are
	/// enqueued with no lock held, so monitor graphs cannot deadlock.
	pub(crate) fn mark_dead<M: Clone + Send + 'static>(&self, notice: M) {
		let monitors;
		let undelivered;
		{
			let mut state = self.state.lock();
			if !state.living {
				return;
			}
			state.living = false;
			self.living.store(false, Ordering::SeqCst);
			undelivered = state.incoming.len() + state.pending.len();
			state.incoming.clear();
			state.pending.clear();
			monitors = std::mem::take(&mut state.monitors);
			self.arrival.notify_all();
		}
		if undelivered > 0 {
			debug!(mailbox = self.id, undelivered, "discarded undelivered messages at death");
		}
		for watcher in monitors {
			if let Some(watcher) = watcher.upgrade() {
				watcher.enqueue(Message::new(notice.clone()));
			}
		}
	}

	/// Selective receive.
	///
	/// Offers `pending` first in insertion order, then consumes heads of
	/// `incoming`, deferring non-matching heads to the tail of `pending`.
	/// The matched arm runs with the lock released. Returns false when the
	/// wait predicate fails before a match: the deadline passed, or the
	/// mailbox died while waiting.
	pub(crate) fn receive(&self, matcher: &mut Matcher<'_>, deadline: Option<Instant>) -> bool {
		let mut state = self.state.lock();

		for index in 0..state.pending.len() {
			if let Some(arm) = matcher.arm_for(state.pending[index].signature()) {
				if let Some(message) = state.pending.remove(index) {
					drop(state);
					trace!(mailbox = self.id, shape = matcher.shape(arm), "matched deferred message");
					matcher.run(arm, message);
					return true;
				}
			}
		}

		loop {
			while state.incoming.is_empty() {
				if !state.living {
					return false;
				}
				match deadline {
					Some(deadline) => {
						if self.arrival.wait_until(&mut state, deadline).timed_out() {
							return false;
						}
					}
					None => self.arrival.wait(&mut state),
				}
			}
			let Some(message) = state.incoming.pop_front() else {
				continue;
			};
			match matcher.arm_for(message.signature()) {
				Some(arm) => {
					drop(state);
					matcher.run(arm, message);
					return true;
				}
				None => {
					trace!(mailbox = self.id, shape = message.shape(), "deferred non-matching message");
					state.pending.push_back(message);
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::{
		sync::Arc,
		time::{Duration, Instant},
	};

	use super::*;

	fn collect<M: Send + 'static>(slot: &mut Vec<M>) -> Matcher<'_> {
		Matcher::new().on(move |value: M| slot.push(value))
	}

	#[test]
	fn test_enqueue_then_receive() {
		let mailbox = Mailbox::new();
		mailbox.enqueue(Message::new(7u64));

		let mut seen = Vec::new();
		assert!(mailbox.receive(&mut collect::<u64>(&mut seen), None));
		assert_eq!(seen, vec![7]);
	}

	#[test]
	fn test_fifo_within_matching_type() {
		let mailbox = Mailbox::new();
		for value in [1u64, 2, 3] {
			mailbox.enqueue(Message::new(value));
		}

		let mut seen = Vec::new();
		for _ in 0..3 {
			assert!(mailbox.receive(&mut collect::<u64>(&mut seen), None));
		}
		assert_eq!(seen, vec![1, 2, 3]);
	}

	#[test]
	fn test_non_matching_head_is_deferred_in_order() {
		let mailbox = Mailbox::new();
		mailbox.enqueue(Message::new(1u64));
		mailbox.enqueue(Message::new(2u64));
		mailbox.enqueue(Message::new("target"));

		let mut strings = Vec::new();
		assert!(mailbox.receive(&mut collect::<&str>(&mut strings), None));
		assert_eq!(strings, vec!["target"]);

		// Both skipped heads survived into pending, original order.
		let mut numbers = Vec::new();
		let deadline = Some(Instant::now());
		assert!(mailbox.receive(&mut collect::<u64>(&mut numbers), deadline));
		assert!(mailbox.receive(&mut collect::<u64>(&mut numbers), deadline));
		assert_eq!(numbers, vec![1, 2]);
	}

	#[test]
	fn test_pending_scanned_before_incoming() {
		let mailbox = Mailbox::new();
		mailbox.enqueue(Message::new(1u64));
		mailbox.enqueue(Message::new("skip me into pending"));

		let mut strings = Vec::new();
		assert!(mailbox.receive(&mut collect::<&str>(&mut strings), None));

		// The u64 now sits in pending; a fresh enqueue must not overtake it.
		mailbox.enqueue(Message::new(2u64));
		let mut numbers = Vec::new();
		assert!(mailbox.receive(&mut collect::<u64>(&mut numbers), None));
		assert!(mailbox.receive(&mut collect::<u64>(&mut numbers), None));
		assert_eq!(numbers, vec![1, 2]);
	}

	#[test]
	fn test_first_arm_wins_on_tie() {
		use std::cell::Cell;

		let mailbox = Mailbox::new();
		mailbox.enqueue(Message::new(5u32));

		let winner = Cell::new("");
		let mut matcher = Matcher::new()
			.on(|_: u32| winner.set("first"))
			.on(|_: u32| winner.set("second"));
		assert!(mailbox.receive(&mut matcher, None));
		drop(matcher);
		assert_eq!(winner.get(), "first");
	}

	#[test]
	fn test_expired_deadline_on_empty_mailbox() {
		let mailbox = Mailbox::new();
		let mut seen = Vec::new();
		assert!(!mailbox.receive(&mut collect::<u64>(&mut seen), Some(Instant::now())));
		assert!(seen.is_empty());
	}

	#[test]
	fn test_timeout_keeps_pending_intact() {
		let mailbox = Mailbox::new();
		mailbox.enqueue(Message::new("parked"));

		let mut numbers = Vec::new();
		let deadline = Some(Instant::now() + Duration::from_millis(10));
		assert!(!mailbox.receive(&mut collect::<u64>(&mut numbers), deadline));

		let mut strings = Vec::new();
		assert!(mailbox.receive(&mut collect::<&str>(&mut strings), None));
		assert_eq!(strings, vec!["parked"]);
	}

	#[test]
	fn test_enqueue_after_death_is_dropped() {
		let mailbox = Mailbox::new();
		mailbox.enqueue(Message::new(1u64));
		mailbox.mark_dead(());
		mailbox.enqueue(Message::new(2u64));

		assert!(!mailbox.alive());
		let mut seen = Vec::new();
		assert!(!mailbox.receive(&mut collect::<u64>(&mut seen), Some(Instant::now())));
		assert!(seen.is_empty());
	}

	#[test]
	fn test_death_transitions_once() {
		let target = Arc::new(Mailbox::new());
		let watcher = Arc::new(Mailbox::new());
		assert!(target.monitor(Arc::downgrade(&watcher)));

		target.mark_dead("gone");
		target.mark_dead("gone again");

		let mut notices = Vec::new();
		assert!(watcher.receive(&mut collect::<&str>(&mut notices), None));
		assert!(!watcher.receive(&mut collect::<&str>(&mut notices), Some(Instant::now())));
		assert_eq!(notices, vec!["gone"]);
	}

	#[test]
	fn test_monitor_after_death_refused() {
		let target = Arc::new(Mailbox::new());
		let watcher = Arc::new(Mailbox::new());
		target.mark_dead(());
		assert!(!target.monitor(Arc::downgrade(&watcher)));
	}

	#[test]
	fn test_repeated_monitor_repeats_notification() {
		let target = Arc::new(Mailbox::new());
		let watcher = Arc::new(Mailbox::new());
		assert!(target.monitor(Arc::downgrade(&watcher)));
		assert!(target.monitor(Arc::downgrade(&watcher)));

		target.mark_dead(9u8);
		let mut notices = Vec::new();
		assert!(watcher.receive(&mut collect::<u8>(&mut notices), None));
		assert!(watcher.receive(&mut collect::<u8>(&mut notices), None));
		assert_eq!(notices, vec![9, 9]);
	}

	#[test]
	fn test_dropped_watcher_is_skipped() {
		let target = Arc::new(Mailbox::new());
		let watcher = Arc::new(Mailbox::new());
		assert!(target.monitor(Arc::downgrade(&watcher)));
		drop(watcher);
		// Must not panic or deliver anywhere.
		target.mark_dead(());
	}
}
