use core::sync::atomic::{AtomicU32, Ordering};

/// The current step size, shared between the foreground scanner (the only
/// writer) and the sample clock (the only reader).
///
/// A single 32-bit word accessed with relaxed atomic loads and stores. The
/// reader always sees a whole value written at some point by the writer,
/// possibly one scan interval old. Never wrap this in a lock: the sample
/// clock must not wait on the foreground.
#[derive(Debug, Default)]
pub struct SharedStep(AtomicU32);

impl SharedStep {
    /// A silent cell (step size 0).
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Read the step size. Called once per sample tick.
    #[inline]
    pub fn load(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    /// Publish a new step size. Called once per scan.
    #[inline]
    pub fn store(&self, step_size: u32) {
        self.0.store(step_size, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent() {
        let step = SharedStep::new();
        assert_eq!(step.load(), 0);
    }

    #[test]
    fn last_store_wins() {
        let step = SharedStep::new();
        step.store(51_076_142);
        step.store(96_418_697);
        assert_eq!(step.load(), 96_418_697);
    }
}
