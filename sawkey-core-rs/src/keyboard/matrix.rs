use super::notes::{Semitone, SEMITONE_COUNT};
use super::{COLUMN_COUNT, ROW_COUNT};

/// Flat key state register filled by one scan of the matrix.
///
/// Bit `row * 4 + column` holds the level read on that column while the row
/// was selected. The wiring is active low: a clear bit is a pressed key.
/// The register is 32 bits wide but only the first
/// [`MATRIX_CELLS`] bits carry meaning; the rest stay clear and are never
/// consulted when resolving notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyMatrix {
    bits: u32,
}

/// Number of wired cells (`ROW_COUNT * COLUMN_COUNT`).
pub const MATRIX_CELLS: usize = ROW_COUNT * COLUMN_COUNT;

impl KeyMatrix {
    /// An empty register (every bit clear).
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Build a register from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// A register with every wired cell released and all others clear.
    pub const fn released() -> Self {
        Self {
            bits: (1 << MATRIX_CELLS) - 1,
        }
    }

    /// Raw register contents, as shown on the status display.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Store the level read for one cell. Indices of 32 and above are ignored.
    pub fn set_level(&mut self, index: usize, high: bool) {
        if index >= u32::BITS as usize {
            return;
        }
        if high {
            self.bits |= 1 << index;
        } else {
            self.bits &= !(1 << index);
        }
    }

    /// Store the four column levels read while `row` was selected.
    pub fn set_row(&mut self, row: usize, columns: [bool; COLUMN_COUNT]) {
        for (column, &high) in columns.iter().enumerate() {
            self.set_level(row * COLUMN_COUNT + column, high);
        }
    }

    /// Level stored for one cell. Out-of-range indices read low.
    pub fn level(&self, index: usize) -> bool {
        index < u32::BITS as usize && self.bits & (1 << index) != 0
    }

    /// `true` if the cell reads low (active-low pressed key).
    pub fn is_pressed(&self, index: usize) -> bool {
        !self.level(index)
    }

    /// Mark the key for `semitone` pressed (clear its bit).
    pub fn press(&mut self, semitone: Semitone) {
        self.set_level(semitone.index(), false);
    }

    /// Resolve the sounding note: walk semitones upward and keep the last
    /// one that reads pressed, so the highest pressed key wins.
    pub fn sounding_note(&self) -> Option<Semitone> {
        let mut selected = None;
        for index in 0..SEMITONE_COUNT {
            if self.is_pressed(index) {
                selected = Semitone::from_index(index);
            }
        }
        selected
    }
}
