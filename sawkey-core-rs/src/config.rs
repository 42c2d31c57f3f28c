//! Timing and output configuration.

use crate::keyboard::TABLE_SAMPLE_RATE_HZ;
use crate::synth::{OutputResolution, SampleSchedule};

/// Configuration for the sample clock and the foreground loop.
///
/// [`SynthConfig::default()`] reproduces the shipped timing: 22 kHz
/// samples, a 100 ms foreground refresh, 8-bit output, and one oscillator
/// trace per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SynthConfig {
    /// Sample clock rate in Hz. Default: 22 000 (the rate the note table
    /// was computed for).
    pub sample_rate_hz: u32,
    /// Foreground scan and display refresh interval. Default: 100 ms.
    pub refresh_interval_ms: u64,
    /// Audio output resolution in bits (1–8). Default: 8.
    pub output_bits: u8,
    /// Trace one tick out of this many; 0 disables tracing. Default: 22 000.
    pub trace_interval_ticks: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: TABLE_SAMPLE_RATE_HZ,
            refresh_interval_ms: 100,
            output_bits: 8,
            trace_interval_ticks: TABLE_SAMPLE_RATE_HZ,
        }
    }
}

impl SynthConfig {
    /// Deadlines for the sample clock on a timer running at `timer_hz`.
    ///
    /// Returns `None` if `sample_rate_hz` is 0.
    pub fn sample_schedule(&self, timer_hz: u64) -> Option<SampleSchedule> {
        SampleSchedule::new(timer_hz, self.sample_rate_hz)
    }

    /// Output resolution built from `output_bits`.
    pub fn output_resolution(&self) -> OutputResolution {
        OutputResolution::new(self.output_bits)
    }

    /// PWM counter wrap value that makes a counter running at
    /// `counter_hz` wrap once per sample. Saturates at `u16::MAX`, which
    /// is also what a sample rate of 0 gives.
    pub fn pwm_top(&self, counter_hz: u32) -> u16 {
        let top = counter_hz
            .checked_div(self.sample_rate_hz)
            .map_or(u32::MAX, |counts| counts.saturating_sub(1));
        top.min(u16::MAX as u32) as u16
    }
}
