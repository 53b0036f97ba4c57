// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Thread-based actor runtime with typed mailboxes and selective receive.
//!
//! Actors are independent units of execution that share nothing and
//! communicate only by asynchronous message passing. Each actor owns one
//! mailbox; any number of [`Handle`]s address it from outside.
//!
//! # Execution Model
//!
//! - Each actor runs on its own OS thread via `std::thread::spawn`;
//!   scheduling is preemptive, inherited from the host.
//! - A mailbox is an unbounded FIFO plus a `pending` buffer of messages a
//!   selective receive examined but did not match; `pending` is offered
//!   first to later receives, in arrival order.
//! - Messages are plain values; a message's type is its identity for
//!   dispatch. A [`Matcher`] binds handler closures to the types they
//!   accept, first arm wins.
//! - Termination (normal return or failure) marks the mailbox dead and
//!   delivers [`Exited`] or [`Failed`] to every monitor. Failures never
//!   cross an actor boundary any other way.
//!
//! # Example
//!
//! ```ignore
//! use mailroom_actor::{receive_one, run, self_handle, spawn, Handle};
//!
//! struct Greet(Handle);
//! struct Greeting(String);
//!
//! let greeting = run(|| {
//! 	let greeter = spawn(|| {
//! 		let Greet(reply_to) = receive_one();
//! 		reply_to.send(Greeting("hello".into()));
//! 	});
//! 	greeter.send(Greet(self_handle()));
//! 	receive_one::<Greeting>()
//! });
//! ```

mod context;
mod mailbox;

pub mod error;
pub mod handle;
pub mod matcher;
pub mod notice;
pub mod receive;
pub mod spawn;

pub use error::ActorError;
pub use handle::Handle;
pub use matcher::Matcher;
pub use notice::{Exited, Failed, Fault};
pub use receive::{leave_loop, receive, receive_for, receive_loop, receive_one, receive_until, self_handle};
pub use spawn::{run, spawn};
