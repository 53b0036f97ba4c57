// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shareable actor addresses.

use std::{
	cmp::Ordering,
	fmt,
	hash::{Hash, Hasher},
	sync::Arc,
};

use crate::{
	context,
	mailbox::{Mailbox, Message},
};

/// A shareable, comparable reference to an actor's mailbox.
///
/// The sole means by which one actor addresses another. Handles are cheap
/// to clone and hold the mailbox alive; two handles compare equal exactly
/// when they refer to the same mailbox, and a total order over handles
/// exists so they can serve as map keys.
#[derive(Clone)]
pub struct Handle {
	mailbox: Arc<Mailbox>,
}

impl Handle {
	pub(crate) fn new(mailbox: Arc<Mailbox>) -> Self {
		Self {
			mailbox,
		}
	}

	/// Send `value` to the target actor.
	///
	/// Never blocks beyond the mailbox mutex. A send to a dead actor is
	/// dropped silently; monitoring is the only way to observe that.
	pub fn send<M: Send + 'static>(&self, value: M) {
		self.mailbox.enqueue(Message::new(value));
	}

	/// Subscribe the calling actor's mailbox to this actor's death
	/// notification.
	///
	/// Returns false if the target is already dead, in which case no
	/// notification will ever arrive. Not idempotent: every call registers
	/// another subscription and produces another notification.
	///
	/// # Panics
	///
	/// Outside an actor context (there is no mailbox to notify).
	pub fn monitor(&self) -> bool {
		let watcher = context::current_mailbox();
		self.mailbox.monitor(Arc::downgrade(&watcher))
	}

	/// Best-effort liveness snapshot.
	///
	/// Race-prone by design: the target may terminate immediately after
	/// this returns true.
	pub fn alive(&self) -> bool {
		self.mailbox.alive()
	}

	fn identity(&self) -> usize {
		Arc::as_ptr(&self.mailbox) as usize
	}
}

impl PartialEq for Handle {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.mailbox, &other.mailbox)
	}
}

impl Eq for Handle {}

impl PartialOrd for Handle {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Handle {
	fn cmp(&self, other: &Self) -> Ordering {
		self.identity().cmp(&other.identity())
	}
}

impl Hash for Handle {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.identity().hash(state)
	}
}

impl fmt::Debug for Handle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Handle(actor-{})", self.mailbox.id())
	}
}
