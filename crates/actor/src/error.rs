// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Usage errors of the actor surface.
//!
//! These are programming errors, not runtime conditions: the offending
//! call panics with the corresponding message. Inside an actor the panic
//! terminates that actor and surfaces to its monitors as a
//! [`Failed`](crate::notice::Failed) notice; no failure crosses an actor
//! boundary any other way.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActorError {
	#[error("actor operation used outside an actor context; enter one with `spawn` or `run`")]
	OutsideActor,

	#[error("receive called with an empty matcher")]
	EmptyMatcher,

	#[error("an actor context is already installed on this thread")]
	NestedContext,

	#[error("mailbox died while a receive without a deadline was waiting")]
	MailboxClosed,
}
