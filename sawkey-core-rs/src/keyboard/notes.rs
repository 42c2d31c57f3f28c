/// Sample rate the [`NOTE_TABLE`] step sizes were computed for, in Hz.
pub const TABLE_SAMPLE_RATE_HZ: u32 = 22_000;

/// One chromatic semitone of a single octave, starting at C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Semitone {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Semitone {
    /// All semitones in ascending pitch order (the scan order).
    pub const ALL: [Semitone; SEMITONE_COUNT] = [
        Semitone::C,
        Semitone::CSharp,
        Semitone::D,
        Semitone::DSharp,
        Semitone::E,
        Semitone::F,
        Semitone::FSharp,
        Semitone::G,
        Semitone::GSharp,
        Semitone::A,
        Semitone::ASharp,
        Semitone::B,
    ];

    /// Position within the octave (0 = C … 11 = B). Also the key matrix
    /// cell wired to this note.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `None` if `index >= 12`.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < SEMITONE_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// The table entry for this semitone.
    pub fn entry(self) -> &'static NoteEntry {
        &NOTE_TABLE[self as usize]
    }

    /// Phase accumulator increment that produces this pitch.
    pub fn step_size(self) -> u32 {
        self.entry().step_size
    }

    /// Display label, e.g. `"C#"`.
    pub fn label(self) -> &'static str {
        self.entry().label
    }
}

/// Number of semitones in the table.
pub const SEMITONE_COUNT: usize = 12;

/// A note table row: which semitone, how far the accumulator moves per
/// sample, and what the display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoteEntry {
    pub semitone: Semitone,
    /// `frequency * 2^32 / TABLE_SAMPLE_RATE_HZ`.
    pub step_size: u32,
    pub label: &'static str,
}

/// Step sizes for 261.626, 277.183, 293.665, 311.127, 329.628, 349.228,
/// 369.994, 391.995, 415.305, 440, 466.164 and 493.883 Hz at 22 kHz.
///
/// The A# value does not follow its neighbours (466.164 Hz would be
/// 91007233). It is kept as shipped; see [`first_descent`].
pub static NOTE_TABLE: [NoteEntry; SEMITONE_COUNT] = [
    NoteEntry { semitone: Semitone::C, step_size: 51_076_142, label: "C" },
    NoteEntry { semitone: Semitone::CSharp, step_size: 54_113_269, label: "C#" },
    NoteEntry { semitone: Semitone::D, step_size: 57_330_981, label: "D" },
    NoteEntry { semitone: Semitone::DSharp, step_size: 60_740_013, label: "D#" },
    NoteEntry { semitone: Semitone::E, step_size: 64_351_885, label: "E" },
    NoteEntry { semitone: Semitone::F, step_size: 68_178_311, label: "F" },
    NoteEntry { semitone: Semitone::FSharp, step_size: 72_232_370, label: "F#" },
    NoteEntry { semitone: Semitone::G, step_size: 76_527_532, label: "G" },
    NoteEntry { semitone: Semitone::GSharp, step_size: 81_078_245, label: "G#" },
    NoteEntry { semitone: Semitone::A, step_size: 85_899_346, label: "A" },
    NoteEntry { semitone: Semitone::ASharp, step_size: 9_007_233, label: "A#" },
    NoteEntry { semitone: Semitone::B, step_size: 96_418_697, label: "B" },
];

/// Source frequencies of [`NOTE_TABLE`], in millihertz.
pub const NOTE_FREQUENCIES_MHZ: [u64; SEMITONE_COUNT] = [
    261_626, 277_183, 293_665, 311_127, 329_628, 349_228, 369_994, 391_995, 415_305, 440_000,
    466_164, 493_883,
];

/// Step size for a frequency given in millihertz, rounded to nearest.
///
/// `step = f * 2^32 / sample_rate`. Returns `None` if `sample_rate_hz` is 0
/// or the frequency is at or above the sample rate (the step would not fit
/// in 32 bits).
pub const fn step_for_millihertz(freq_mhz: u64, sample_rate_hz: u32) -> Option<u32> {
    if sample_rate_hz == 0 {
        return None;
    }
    let denominator = sample_rate_hz as u128 * 1000;
    let numerator = (freq_mhz as u128) << 32;
    let step = (numerator + denominator / 2) / denominator;
    if step > u32::MAX as u128 {
        None
    } else {
        Some(step as u32)
    }
}

/// Frequency (millihertz, rounded to nearest) that a step size produces.
///
/// `f = step * sample_rate / 2^32`. Defined for every input: the result is
/// below `2^42`.
pub const fn frequency_millihertz(step_size: u32, sample_rate_hz: u32) -> u64 {
    let numerator = step_size as u128 * sample_rate_hz as u128 * 1000;
    ((numerator + (1 << 31)) >> 32) as u64
}

/// Index of the first table entry whose step size is lower than its
/// predecessor's, or `None` if the table rises monotonically.
pub fn first_descent() -> Option<Semitone> {
    NOTE_TABLE
        .windows(2)
        .find(|pair| pair[1].step_size < pair[0].step_size)
        .map(|pair| pair[1].semitone)
}
