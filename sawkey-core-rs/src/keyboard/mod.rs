//! Key matrix state and the note it selects.
//!
//! The keyboard is a 3 × 4 matrix: the mux bus selects one row at a time
//! and four column lines report the keys on that row. Cells map one-to-one
//! onto the twelve semitones of a single octave:
//!
//! ```text
//!          col 0   col 1   col 2   col 3
//! row 0:   C       C#      D       D#
//! row 1:   E       F       F#      G
//! row 2:   G#      A       A#      B
//! ```
//!
//! [`publish_scan()`] turns one scan into the shared step size read by the
//! sample clock and a [`KeyboardStatus`] for the display.

mod matrix;
mod notes;

pub use matrix::{KeyMatrix, MATRIX_CELLS};
pub use notes::{
    first_descent, frequency_millihertz, step_for_millihertz, NoteEntry, Semitone,
    NOTE_FREQUENCIES_MHZ, NOTE_TABLE, SEMITONE_COUNT, TABLE_SAMPLE_RATE_HZ,
};

use crate::synth::SharedStep;

/// Number of matrix rows driven through the mux bus.
pub const ROW_COUNT: usize = 3;

/// Number of column inputs sampled per row.
pub const COLUMN_COUNT: usize = 4;

/// What the foreground loop hands to the display after a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardStatus {
    /// Register exactly as scanned.
    pub matrix: KeyMatrix,
    /// Note currently sounding, `None` when silent.
    pub note: Option<Semitone>,
}

impl KeyboardStatus {
    /// Step size this status selects (0 when silent).
    pub fn step_size(&self) -> u32 {
        self.note.map_or(0, Semitone::step_size)
    }
}

/// Resolve the sounding note from a completed scan and publish its step
/// size for the sample clock.
///
/// Silence stores 0; the phase accumulator itself is left alone.
pub fn publish_scan(matrix: KeyMatrix, step: &SharedStep) -> KeyboardStatus {
    let status = KeyboardStatus {
        matrix,
        note: matrix.sounding_note(),
    };
    step.store(status.step_size());
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_key_publishes_its_step_size() {
        let step = SharedStep::new();
        for entry in NOTE_TABLE.iter() {
            let mut matrix = KeyMatrix::released();
            matrix.press(entry.semitone);

            let status = publish_scan(matrix, &step);
            assert_eq!(status.note, Some(entry.semitone));
            assert_eq!(step.load(), entry.step_size);
        }
    }

    #[test]
    fn no_key_publishes_silence() {
        let step = SharedStep::new();
        step.store(Semitone::E.step_size());

        let status = publish_scan(KeyMatrix::released(), &step);
        assert_eq!(status.note, None);
        assert_eq!(step.load(), 0);
    }

    #[test]
    fn two_keys_publish_the_higher() {
        let step = SharedStep::new();
        let mut matrix = KeyMatrix::released();
        matrix.press(Semitone::from_index(2).unwrap());
        matrix.press(Semitone::from_index(5).unwrap());

        publish_scan(matrix, &step);
        assert_eq!(step.load(), NOTE_TABLE[5].step_size);
    }

    #[test]
    fn status_keeps_raw_register() {
        let step = SharedStep::new();
        let matrix = KeyMatrix::from_bits(0x0FFE);
        let status = publish_scan(matrix, &step);
        assert_eq!(status.matrix.bits(), 0x0FFE);
        assert_eq!(status.note, Some(Semitone::C));
    }
}
