// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Chameneos-Redux rendezvous benchmark.
//!
//! A broker actor pairs chameneos actors at a meeting place; each pair
//! exchanges colours and both mutate to the complement. After the granted
//! number of rendezvous the broker tells every chameneos to stop, collects
//! their meeting tallies, and prints the sum spelled in English digits.
//!
//! Runs two configurations, three and ten chameneos, over the same
//! meeting count. Diagnostics go to stderr via `RUST_LOG`; stdout carries
//! only the benchmark output.

use std::{fmt, ops::Add};

use clap::Parser;
use mailroom_actor::{Handle, Matcher, leave_loop, receive_loop, receive_one, run, self_handle, spawn};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chameneos", about = "Chameneos-Redux rendezvous benchmark")]
struct Args {
	/// Number of rendezvous the broker grants per configuration
	#[arg(default_value_t = 10_000)]
	meetings: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Colour {
	Blue,
	Red,
	Yellow,
}

const COLOURS: [Colour; 3] = [Colour::Blue, Colour::Red, Colour::Yellow];

impl Add for Colour {
	type Output = Colour;

	/// Two equal colours keep their colour; two distinct colours yield
	/// the third.
	fn add(self, other: Colour) -> Colour {
		use Colour::{Blue, Red, Yellow};

		match (self, other) {
			(Blue, Blue) => Blue,
			(Blue, Red) => Yellow,
			(Blue, Yellow) => Red,
			(Red, Blue) => Yellow,
			(Red, Red) => Red,
			(Red, Yellow) => Blue,
			(Yellow, Blue) => Red,
			(Yellow, Red) => Blue,
			(Yellow, Yellow) => Yellow,
		}
	}
}

impl fmt::Display for Colour {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Colour::Blue => "blue",
			Colour::Red => "red",
			Colour::Yellow => "yellow",
		};
		f.write_str(name)
	}
}

/// Spell a number digit by digit, each word carrying its leading space.
fn spell(mut value: usize) -> String {
	const DIGITS: [&str; 10] =
		[" zero", " one", " two", " three", " four", " five", " six", " seven", " eight", " nine"];

	let mut words = Vec::new();
	loop {
		words.push(DIGITS[value % 10]);
		value /= 10;
		if value == 0 {
			break;
		}
	}
	words.into_iter().rev().collect()
}

/// A chameneos announcing itself at the meeting place, or the broker
/// relaying the peer a chameneos was paired with.
struct Meet {
	peer: Handle,
	colour: Colour,
}

/// Broker's signal that the meeting place is closed.
struct Stop;

/// A chameneos reporting how many meetings it attended.
struct Tally(usize);

fn chameneos(start: Colour, broker: Handle) {
	let me = self_handle();
	let mut colour = start;
	let mut meetings = 0usize;
	let mut met_self = 0usize;

	broker.send(Meet {
		peer: me.clone(),
		colour,
	});
	receive_loop(
		Matcher::new()
			.on(|other: Meet| {
				meetings += 1;
				if other.peer == me {
					met_self += 1;
				}
				colour = colour + other.colour;
				broker.send(Meet {
					peer: me.clone(),
					colour,
				});
			})
			.on(|_: Stop| leave_loop()),
	);

	println!("{}{}", meetings, spell(met_self));
	broker.send(Tally(meetings));
}

/// Grant `meetings` rendezvous, then close the meeting place and sum the
/// tallies. Runs on the calling actor; every chameneos addresses it via
/// the handle it was spawned with.
fn broker(meetings: usize, population: usize) -> usize {
	for _ in 0..meetings {
		let left: Meet = receive_one();
		let right: Meet = receive_one();
		left.peer.send(Meet {
			peer: right.peer.clone(),
			colour: right.colour,
		});
		right.peer.send(Meet {
			peer: left.peer,
			colour: left.colour,
		});
	}
	for _ in 0..population {
		let waiting: Meet = receive_one();
		waiting.peer.send(Stop);
	}
	(0..population).map(|_| receive_one::<Tally>().0).sum()
}

/// Spawn one chameneos per colour and broker their meetings; returns the
/// total meeting count across the population.
fn host(colours: &[Colour], meetings: usize) -> usize {
	debug!(meetings, population = colours.len(), "rendezvous block starting");
	let here = self_handle();
	for &colour in colours {
		let place = here.clone();
		spawn(move || chameneos(colour, place));
	}
	broker(meetings, colours.len())
}

fn rendezvous(colours: &[Colour], meetings: usize) {
	println!();
	let header: String = colours.iter().map(|colour| format!(" {colour}")).collect();
	println!("{header}");

	let total = host(colours, meetings);
	println!("{}", spell(total));
}

fn show_complements() {
	for lhs in COLOURS {
		for rhs in COLOURS {
			println!("{lhs} + {rhs} -> {}", lhs + rhs);
		}
	}
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	let args = Args::parse();
	show_complements();
	run(|| {
		use Colour::{Blue, Red, Yellow};

		rendezvous(&COLOURS, args.meetings);
		rendezvous(&[Blue, Red, Yellow, Red, Yellow, Blue, Red, Yellow, Red, Blue], args.meetings);
	});
	println!();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_equal_colours_keep_their_colour() {
		for colour in COLOURS {
			assert_eq!(colour + colour, colour);
		}
	}

	#[test]
	fn test_distinct_colours_yield_the_third() {
		for lhs in COLOURS {
			for rhs in COLOURS {
				if lhs != rhs {
					let third = lhs + rhs;
					assert_ne!(third, lhs);
					assert_ne!(third, rhs);
				}
			}
		}
		assert_eq!(Colour::Blue + Colour::Red, Colour::Yellow);
	}

	#[test]
	fn test_spell_digits() {
		assert_eq!(spell(0), " zero");
		assert_eq!(spell(2), " two");
		assert_eq!(spell(200), " two zero zero");
	}

	#[test]
	fn test_self_meet_line_spelling() {
		assert_eq!(format!("{}{}", 8, spell(2)), "8 two");
	}

	#[test]
	fn test_three_chameneos_meet_twice_the_count() {
		let total = run(|| host(&COLOURS, 10));
		assert_eq!(total, 20);
	}

	#[test]
	fn test_ten_chameneos_meet_twice_the_count() {
		use Colour::{Blue, Red, Yellow};

		let colours = [Blue, Red, Yellow, Red, Yellow, Blue, Red, Yellow, Red, Blue];
		let total = run(|| host(&colours, 10));
		assert_eq!(total, 20);
	}
}
