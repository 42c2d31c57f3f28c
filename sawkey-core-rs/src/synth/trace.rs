use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use super::oscillator::Tick;

/// Capacity of the [`TraceRing`].
pub const TRACE_CAPACITY: usize = 8;

/// Bounded hand-off of oscillator diagnostics from the sample clock to the
/// foreground loop.
///
/// The sample clock only ever calls [`record()`](Self::record), which never
/// waits: when the ring is full the trace is dropped and counted. The
/// foreground drains it with [`drain()`](Self::drain) and does the logging.
pub struct TraceRing {
    channel: Channel<CriticalSectionRawMutex, Tick, TRACE_CAPACITY>,
    dropped: AtomicU32,
}

impl Default for TraceRing {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceRing {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue a trace. Returns `false` (and counts a drop) if the ring is full.
    pub fn record(&self, tick: Tick) -> bool {
        match self.channel.try_send(tick) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Hand every queued trace to `sink`, oldest first. Returns how many
    /// were drained.
    pub fn drain(&self, mut sink: impl FnMut(Tick)) -> usize {
        let mut count = 0;
        while let Ok(tick) = self.channel.try_receive() {
            sink(tick);
            count += 1;
        }
        count
    }

    /// Read and reset the number of traces dropped since the last call.
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }
}

/// Lets one tick in every `interval` through to the [`TraceRing`].
#[derive(Debug, Clone, Copy)]
pub struct TraceDecimator {
    interval: u32,
    countdown: u32,
}

impl TraceDecimator {
    /// An `interval` of 0 disables tracing.
    pub const fn new(interval: u32) -> Self {
        Self {
            interval,
            countdown: interval,
        }
    }

    /// Call once per tick; returns `true` on the ticks that should be traced.
    #[inline]
    pub fn poll(&mut self) -> bool {
        if self.interval == 0 {
            return false;
        }
        self.countdown -= 1;
        if self.countdown == 0 {
            self.countdown = self.interval;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use heapless::Vec;

    use super::*;

    fn tick(phase: u32) -> Tick {
        Tick {
            phase,
            ..Tick::default()
        }
    }

    // ── TraceRing ────────────────────────────────────────────────────

    #[test]
    fn drain_returns_traces_in_order() {
        let ring = TraceRing::new();
        assert!(ring.record(tick(1)));
        assert!(ring.record(tick(2)));

        let mut seen: Vec<u32, TRACE_CAPACITY> = Vec::new();
        let count = ring.drain(|t| seen.push(t.phase).unwrap());
        assert_eq!(count, 2);
        assert_eq!(seen.as_slice(), &[1, 2]);

        assert_eq!(ring.drain(|_| {}), 0);
    }

    #[test]
    fn full_ring_drops_and_counts() {
        let ring = TraceRing::new();
        for i in 0..TRACE_CAPACITY as u32 {
            assert!(ring.record(tick(i)));
        }
        assert!(!ring.record(tick(99)));
        assert!(!ring.record(tick(100)));

        assert_eq!(ring.take_dropped(), 2);
        assert_eq!(ring.take_dropped(), 0);

        let mut last = None;
        ring.drain(|t| last = Some(t.phase));
        assert_eq!(last, Some(TRACE_CAPACITY as u32 - 1));
    }

    // ── TraceDecimator ───────────────────────────────────────────────

    #[test]
    fn decimator_fires_every_interval() {
        let mut decimator = TraceDecimator::new(3);
        let fired = [(); 9].map(|_| decimator.poll());
        assert_eq!(
            fired,
            [false, false, true, false, false, true, false, false, true]
        );
    }

    #[test]
    fn zero_interval_never_fires() {
        let mut decimator = TraceDecimator::new(0);
        for _ in 0..10 {
            assert!(!decimator.poll());
        }
    }
}
