use super::shared::SharedStep;

/// 32-bit fixed-point phase. Wraps modulo 2^32; overflow is the wrap
/// mechanism, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseAccumulator(u32);

impl PhaseAccumulator {
    /// Phase 0.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Start from an arbitrary phase.
    pub const fn from_value(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Advance by one sample and return the new phase.
    #[inline]
    pub fn advance(&mut self, step_size: u32) -> u32 {
        self.0 = self.0.wrapping_add(step_size);
        self.0
    }
}

/// Top byte of the phase re-centred around zero: `(phase >> 24) - 128`.
///
/// Phase `0x8000_0000` is the zero crossing; `0x0000_0000` is -128 and
/// `0xFF00_0000` is 127.
#[inline]
pub const fn sawtooth_sample(phase: u32) -> i8 {
    ((phase >> 24) as i32 - 128) as i8
}

/// Shift a signed sample back into the unsigned 0–255 range.
#[inline]
pub const fn unsigned_level(sample: i8) -> u8 {
    (sample as i16 + 128) as u8
}

/// Bit width of the audio output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputResolution {
    bits: u8,
}

impl Default for OutputResolution {
    fn default() -> Self {
        Self { bits: 8 }
    }
}

impl OutputResolution {
    /// Resolution of `bits` bits, clamped to 1–8.
    pub const fn new(bits: u8) -> Self {
        let bits = if bits == 0 {
            1
        } else if bits > 8 {
            8
        } else {
            bits
        };
        Self { bits }
    }

    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Drop the low bits of an 8-bit level the device cannot represent.
    #[inline]
    pub const fn quantize(&self, level: u8) -> u8 {
        level >> (8 - self.bits)
    }

    /// Map a quantised level onto a PWM counter that wraps at `top`:
    /// `level * (top + 1) >> bits`.
    #[inline]
    pub const fn pwm_compare(&self, level: u8, top: u16) -> u16 {
        ((level as u32 * (top as u32 + 1)) >> self.bits) as u16
    }
}

/// Everything one sample tick produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    /// Step size read from the shared cell.
    pub step_size: u32,
    /// Phase after advancing.
    pub phase: u32,
    /// Signed sawtooth sample.
    pub sample: i8,
    /// Quantised unsigned level written to the output.
    pub level: u8,
}

/// Phase-accumulator sawtooth oscillator.
///
/// Owned by the sample clock and advanced only by it. With a step size of
/// 0 the phase stops, so the output holds its last level instead of
/// returning to mid-scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oscillator {
    phase: PhaseAccumulator,
    resolution: OutputResolution,
}

impl Oscillator {
    pub const fn new(resolution: OutputResolution) -> Self {
        Self {
            phase: PhaseAccumulator::new(),
            resolution,
        }
    }

    pub fn phase(&self) -> PhaseAccumulator {
        self.phase
    }

    pub fn resolution(&self) -> OutputResolution {
        self.resolution
    }

    /// Run one sample: advance by `step_size`, derive the sample and
    /// quantise it for the output device.
    #[inline]
    pub fn tick(&mut self, step_size: u32) -> Tick {
        let phase = self.phase.advance(step_size);
        let sample = sawtooth_sample(phase);
        Tick {
            step_size,
            phase,
            sample,
            level: self.resolution.quantize(unsigned_level(sample)),
        }
    }

    /// Run one sample using the step size currently published by the
    /// foreground.
    #[inline]
    pub fn tick_shared(&mut self, step: &SharedStep) -> Tick {
        self.tick(step.load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Sample derivation ────────────────────────────────────────────

    #[test]
    fn zero_crossing_at_mid_scale() {
        assert_eq!(sawtooth_sample(0x8000_0000), 0);
        assert_eq!(sawtooth_sample(0x80FF_FFFF), 0);
    }

    #[test]
    fn sample_just_below_mid_scale_is_minus_one() {
        assert_eq!(sawtooth_sample(0x7F00_0000), -1);
    }

    #[test]
    fn sample_extremes() {
        assert_eq!(sawtooth_sample(0), -128);
        assert_eq!(sawtooth_sample(0xFFFF_FFFF), 127);
    }

    #[test]
    fn unsigned_level_undoes_centring() {
        assert_eq!(unsigned_level(-128), 0);
        assert_eq!(unsigned_level(0), 128);
        assert_eq!(unsigned_level(127), 255);
        for top_byte in 0..=255u32 {
            let phase = top_byte << 24;
            assert_eq!(unsigned_level(sawtooth_sample(phase)) as u32, top_byte);
        }
    }

    // ── Accumulator ──────────────────────────────────────────────────

    #[test]
    fn advance_wraps_modulo_2_pow_32() {
        let mut acc = PhaseAccumulator::from_value(0xFFFF_FFF0);
        assert_eq!(acc.advance(0x20), 0x10);
    }

    #[test]
    fn repeated_advance_matches_closed_form() {
        let cases: [(u32, u32, u32); 4] = [
            (0, 85_899_346, 1000),
            (0xDEAD_BEEF, 96_418_697, 22_000),
            (123, u32::MAX, 77),
            (0x8000_0000, 0, 500),
        ];
        for (start, step, ticks) in cases {
            let mut acc = PhaseAccumulator::from_value(start);
            for _ in 0..ticks {
                acc.advance(step);
            }
            let expected = (start as u64 + ticks as u64 * step as u64) % (1u64 << 32);
            assert_eq!(acc.value() as u64, expected);
        }
    }

    // ── Output resolution ────────────────────────────────────────────

    #[test]
    fn eight_bit_output_is_lossless() {
        let res = OutputResolution::default();
        assert_eq!(res.bits(), 8);
        assert_eq!(res.quantize(0xAB), 0xAB);
    }

    #[test]
    fn four_bit_output_keeps_high_nibble() {
        let res = OutputResolution::new(4);
        assert_eq!(res.quantize(0xAB), 0x0A);
        assert_eq!(res.quantize(255), 15);
    }

    #[test]
    fn resolution_is_clamped() {
        assert_eq!(OutputResolution::new(0).bits(), 1);
        assert_eq!(OutputResolution::new(12).bits(), 8);
    }

    #[test]
    fn pwm_compare_spans_counter() {
        let res = OutputResolution::default();
        // 150 MHz / 22 kHz wraps at 6817.
        assert_eq!(res.pwm_compare(0, 6817), 0);
        assert_eq!(res.pwm_compare(128, 6817), 3409);
        assert_eq!(res.pwm_compare(255, 6817), 6791);
        assert_eq!(res.pwm_compare(255, 255), 255);
    }

    // ── Oscillator ───────────────────────────────────────────────────

    #[test]
    fn tick_reports_phase_sample_and_level() {
        let mut osc = Oscillator::new(OutputResolution::default());
        let tick = osc.tick(0x8000_0000);
        assert_eq!(tick.step_size, 0x8000_0000);
        assert_eq!(tick.phase, 0x8000_0000);
        assert_eq!(tick.sample, 0);
        assert_eq!(tick.level, 128);
    }

    #[test]
    fn silence_holds_last_output() {
        let mut osc = Oscillator::new(OutputResolution::default());
        for _ in 0..37 {
            osc.tick(64_351_885);
        }
        let held = osc.tick(0);
        for _ in 0..100 {
            assert_eq!(osc.tick(0), held);
        }
    }

    #[test]
    fn release_keeps_phase() {
        let step = SharedStep::new();
        let mut osc = Oscillator::new(OutputResolution::default());

        step.store(72_232_370);
        for _ in 0..10 {
            osc.tick_shared(&step);
        }
        let before = osc.phase();

        step.store(0);
        assert_eq!(osc.phase(), before);
        osc.tick_shared(&step);
        assert_eq!(osc.phase(), before);
    }

    #[test]
    fn sawtooth_period_follows_step() {
        // A step of 2^24 walks the top byte by one per tick: 256-tick period.
        let mut osc = Oscillator::new(OutputResolution::default());
        let first = osc.tick(1 << 24);
        for _ in 0..255 {
            osc.tick(1 << 24);
        }
        assert_eq!(osc.tick(1 << 24), first);
    }
}
