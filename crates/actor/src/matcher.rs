// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Ordered dispatch table for one receive call.
//!
//! A [`Matcher`] is built at the call site from handler closures; each
//! [`Matcher::on`] arm declares the message type it accepts. Dispatch
//! compares a message's type signature against the arms in order and the
//! first hit wins, so an arm for an already-covered type is simply
//! shadowed. Arms may borrow the caller's locals: the matcher lives only
//! for the receive call (or receive loop) it was built for.

use std::any::{Any, TypeId};

use crate::mailbox::Message;

struct Arm<'scope> {
	signature: TypeId,
	shape: &'static str,
	run: Box<dyn FnMut(Box<dyn Any + Send>) + 'scope>,
}

/// An ordered list of handler arms constituting one receive's dispatch
/// table.
///
/// ```ignore
/// let mut hits = 0;
/// receive(
/// 	Matcher::new()
/// 		.on(|count: u64| hits += count)
/// 		.on(|text: String| println!("{text}")),
/// );
/// ```
pub struct Matcher<'scope> {
	arms: Vec<Arm<'scope>>,
}

impl<'scope> Matcher<'scope> {
	pub fn new() -> Self {
		Self {
			arms: Vec::new(),
		}
	}

	/// Append an arm accepting messages of type `M`.
	///
	/// The handler receives the message by value. Arms are tried in the
	/// order they were appended.
	pub fn on<M, F>(mut self, mut handler: F) -> Self
	where
		M: Send + 'static,
		F: FnMut(M) + 'scope,
	{
		self.arms.push(Arm {
			signature: TypeId::of::<M>(),
			shape: std::any::type_name::<M>(),
			run: Box::new(move |payload| {
				let value = payload.downcast::<M>().expect("dispatch checked the signature");
				handler(*value);
			}),
		});
		self
	}

	pub fn is_empty(&self) -> bool {
		self.arms.is_empty()
	}

	pub fn len(&self) -> usize {
		self.arms.len()
	}

	/// Index of the first arm accepting `signature`, if any.
	pub(crate) fn arm_for(&self, signature: TypeId) -> Option<usize> {
		self.arms.iter().position(|arm| arm.signature == signature)
	}

	/// Run the given arm on a message whose signature already matched it.
	pub(crate) fn run(&mut self, arm: usize, message: Message) {
		(self.arms[arm].run)(message.into_payload())
	}

	/// Type name accepted by the given arm, for diagnostics.
	pub(crate) fn shape(&self, arm: usize) -> &'static str {
		self.arms[arm].shape
	}
}

impl Default for Matcher<'_> {
	fn default() -> Self {
		Self::new()
	}
}
