//! Mapping of the raw note mask register into the canonical technique set.

use crate::chart::records::NoteMask;
use serde::{Deserialize, Serialize};

/// Canonical playing techniques of the output model.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Technique {
    HammerOn,
    PullOff,
    Accent,
    PalmMute,
    FretHandMute,
    Slide,
    Tremolo,
    Vibrato,
    Harmonic,
    PinchHarmonic,
    Tap,
    Slap,
    Pop,
    Chord,
    ChordNote,
    Arpeggio,
    Bend,
    Continued,
}

impl Technique {
    pub const ALL: [Technique; 18] = [
        Technique::HammerOn,
        Technique::PullOff,
        Technique::Accent,
        Technique::PalmMute,
        Technique::FretHandMute,
        Technique::Slide,
        Technique::Tremolo,
        Technique::Vibrato,
        Technique::Harmonic,
        Technique::PinchHarmonic,
        Technique::Tap,
        Technique::Slap,
        Technique::Pop,
        Technique::Chord,
        Technique::ChordNote,
        Technique::Arpeggio,
        Technique::Bend,
        Technique::Continued,
    ];

    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Closed set of [`Technique`] flags.
///
/// Serialized as a list of technique names so the JSON contract stays readable
/// and round-trips without loss.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Technique>", from = "Vec<Technique>")]
pub struct TechniqueSet(u32);

impl TechniqueSet {
    pub const EMPTY: Self = Self(0);

    pub fn insert(&mut self, technique: Technique) {
        self.0 |= technique.bit();
    }

    pub fn remove(&mut self, technique: Technique) {
        self.0 &= !technique.bit();
    }

    #[must_use]
    pub const fn with(self, technique: Technique) -> Self {
        Self(self.0 | technique.bit())
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(&self, technique: Technique) -> bool {
        self.0 & technique.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Technique> + '_ {
        Technique::ALL.into_iter().filter(|t| self.contains(*t))
    }

    /// Map the raw note mask into canonical techniques.
    ///
    /// Mostly one-to-one, with three quirks inherited from the source data:
    /// - `MUTE` is a palm mute unless `FRETHANDMUTE` is also set, in which
    ///   case the fret hand mute wins and no palm mute is emitted for it.
    /// - Pitched and unpitched slides collapse into a single `Slide` flag;
    ///   the distinction lives in the note's slide fret.
    /// - `CHILD` marks the continuation of a linked note.
    ///
    /// Unknown bits are ignored.
    pub fn from_mask(mask: NoteMask) -> Self {
        let mut set = Self::EMPTY;
        if mask.has(NoteMask::HAMMER_ON) {
            set.insert(Technique::HammerOn);
        }
        if mask.has(NoteMask::PULL_OFF) {
            set.insert(Technique::PullOff);
        }
        if mask.has(NoteMask::ACCENT) {
            set.insert(Technique::Accent);
        }
        if mask.has(NoteMask::PALM_MUTE) {
            set.insert(Technique::PalmMute);
        }
        if mask.has(NoteMask::MUTE) && !mask.has(NoteMask::FRET_HAND_MUTE) {
            set.insert(Technique::PalmMute);
        }
        if mask.has(NoteMask::FRET_HAND_MUTE) {
            set.insert(Technique::FretHandMute);
        }
        if mask.has(NoteMask::SLIDE) || mask.has(NoteMask::SLIDE_UNPITCHED_TO) {
            set.insert(Technique::Slide);
        }
        if mask.has(NoteMask::TREMOLO) {
            set.insert(Technique::Tremolo);
        }
        if mask.has(NoteMask::VIBRATO) {
            set.insert(Technique::Vibrato);
        }
        if mask.has(NoteMask::HARMONIC) {
            set.insert(Technique::Harmonic);
        }
        if mask.has(NoteMask::PINCH_HARMONIC) {
            set.insert(Technique::PinchHarmonic);
        }
        if mask.has(NoteMask::TAP) {
            set.insert(Technique::Tap);
        }
        if mask.has(NoteMask::SLAP) {
            set.insert(Technique::Slap);
        }
        if mask.has(NoteMask::POP) {
            set.insert(Technique::Pop);
        }
        if mask.has(NoteMask::CHORD) {
            set.insert(Technique::Chord);
        }
        if mask.has(NoteMask::ARPEGGIO) {
            set.insert(Technique::Arpeggio);
        }
        if mask.has(NoteMask::BEND) {
            set.insert(Technique::Bend);
        }
        if mask.has(NoteMask::CHILD) {
            set.insert(Technique::Continued);
        }
        set
    }
}

impl From<TechniqueSet> for Vec<Technique> {
    fn from(set: TechniqueSet) -> Self {
        set.iter().collect()
    }
}

impl From<Vec<Technique>> for TechniqueSet {
    fn from(techniques: Vec<Technique>) -> Self {
        techniques.into_iter().collect()
    }
}

impl FromIterator<Technique> for TechniqueSet {
    fn from_iter<I: IntoIterator<Item = Technique>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for technique in iter {
            set.insert(technique);
        }
        set
    }
}
