/// Sample deadlines on a timer whose tick rate is not a multiple of the
/// sample rate.
///
/// Deadline `n` lands on `floor(n * timer_hz / sample_rate_hz)` timer ticks
/// after the start. Individual periods alternate between the two nearest
/// whole tick counts (45 and 46 µs for 22 kHz on a 1 MHz timer) so the
/// average rate is exactly `sample_rate_hz` and never drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSchedule {
    whole: u64,
    fraction: u64,
    sample_rate: u64,
    remainder: u64,
    elapsed: u64,
}

impl SampleSchedule {
    /// Returns `None` if `sample_rate_hz` is 0.
    pub const fn new(timer_hz: u64, sample_rate_hz: u32) -> Option<Self> {
        if sample_rate_hz == 0 {
            return None;
        }
        let sample_rate = sample_rate_hz as u64;
        Some(Self {
            whole: timer_hz / sample_rate,
            fraction: timer_hz % sample_rate,
            sample_rate,
            remainder: 0,
            elapsed: 0,
        })
    }

    /// Advance to the next sample and return its deadline, in timer ticks
    /// since the schedule started.
    #[inline]
    pub fn next_deadline(&mut self) -> u64 {
        self.elapsed += self.whole;
        self.remainder += self.fraction;
        if self.remainder >= self.sample_rate {
            self.remainder -= self.sample_rate;
            self.elapsed += 1;
        }
        self.elapsed
    }
}
