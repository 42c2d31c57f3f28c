//! Core logic of a single-voice keyboard synthesizer.
//!
//! The keyboard scans a 3 × 4 key matrix, picks the highest pressed key,
//! and publishes that note's step size. A 22 kHz sample clock adds the step
//! size to a 32-bit phase accumulator and turns the accumulator's top byte
//! into a sawtooth sample.
//!
//! - [`keyboard`] — key matrix register, note table, note resolution.
//! - [`synth`] — shared step size, oscillator, diagnostics hand-off.
//! - [`config`] — timing and output configuration.
//!
//! # `no_std` Compatibility
//!
//! No heap allocation. The optional `defmt` feature derives
//! [`defmt::Format`] on the public types for embedded logging.

#![no_std]

pub mod config;
pub mod keyboard;
pub mod synth;

pub use config::SynthConfig;
pub use keyboard::{publish_scan, KeyMatrix, KeyboardStatus, Semitone};
pub use synth::{Oscillator, SharedStep, Tick, TraceRing};
