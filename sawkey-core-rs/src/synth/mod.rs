//! Phase-accumulator synthesis and the state shared with the sample clock.
//!
//! # Execution contexts
//!
//! ```text
//!  foreground loop (thread mode)            sample clock (22 kHz, high priority)
//!  ─────────────────────────────            ────────────────────────────────────
//!  scan matrix                              step  = SharedStep::load()
//!  SharedStep::store(step)   ──────────▶    phase = phase + step   (wrapping)
//!                                           level = (phase >> 24) quantised
//!  TraceRing::drain() → log  ◀──────────    TraceRing::record(tick)  (never waits)
//! ```
//!
//! [`SharedStep`] is the only value written in one context and read in the
//! other. The [`Oscillator`] and its phase belong to the sample clock alone.

mod oscillator;
mod schedule;
mod shared;
mod trace;

pub use oscillator::{
    sawtooth_sample, unsigned_level, Oscillator, OutputResolution, PhaseAccumulator, Tick,
};
pub use schedule::SampleSchedule;
pub use shared::SharedStep;
pub use trace::{TraceDecimator, TraceRing, TRACE_CAPACITY};
