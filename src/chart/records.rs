//! Decoded chart records, as produced by the external archive decoder.
//!
//! The decoder's JSON shapes still carry `-1` sentinels for "absent" values;
//! the serde helpers in [`sentinel`] turn those into `Option` at this boundary
//! so the engine never compares against `-1` itself.

use serde::{Deserialize, Serialize};

/// Raw technique bit register carried by every decoded note.
///
/// Bit values follow the archive's note mask layout. Only the bits the engine
/// maps to output techniques are named here; unknown bits are ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteMask(pub u32);

impl NoteMask {
    pub const CHORD: u32 = 0x02;
    pub const FRET_HAND_MUTE: u32 = 0x08;
    pub const TREMOLO: u32 = 0x10;
    pub const HARMONIC: u32 = 0x20;
    pub const PALM_MUTE: u32 = 0x40;
    pub const SLAP: u32 = 0x80;
    pub const POP: u32 = 0x0100;
    pub const HAMMER_ON: u32 = 0x0200;
    pub const PULL_OFF: u32 = 0x0400;
    pub const SLIDE: u32 = 0x0800;
    pub const BEND: u32 = 0x1000;
    pub const TAP: u32 = 0x4000;
    pub const PINCH_HARMONIC: u32 = 0x8000;
    pub const VIBRATO: u32 = 0x1_0000;
    pub const MUTE: u32 = 0x2_0000;
    pub const SLIDE_UNPITCHED_TO: u32 = 0x40_0000;
    pub const ACCENT: u32 = 0x400_0000;
    pub const CHILD: u32 = 0x1000_0000;
    pub const ARPEGGIO: u32 = 0x2000_0000;

    pub const fn has(self, bit: u32) -> bool {
        self.0 & bit != 0
    }
}

/// One tick of the song's beat grid, ordered by time.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatMarker {
    pub time: f32,
    pub measure_start: bool,
}

/// A named musical phrase referenced by phrase iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phrase {
    pub name: String,
}

/// A timestamped occurrence of a phrase.
///
/// Its 0-based index in the time-ordered iteration list is the identity
/// referenced by [`RawNote::phrase_iteration_id`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseIteration {
    pub phrase_id: usize,
    pub start_time: f32,
    pub next_phrase_time: f32,
}

/// A detected finger-shape occurrence attaching a chord identity to notes.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub chord_id: usize,
    pub start_time: f32,
    pub end_time: f32,
}

/// A single pitch-bend step during a note's sustain.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BendStep {
    pub time: f32,
    pub step: f32,
}

/// One note of a difficulty tier, still in decoded-record shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNote {
    pub time: f32,
    pub sustain: f32,
    pub fret: i32,
    pub string: i32,
    #[serde(default)]
    pub mask: NoteMask,
    pub anchor_fret: i32,
    #[serde(default, with = "sentinel::fret")]
    pub slide_to: Option<i8>,
    #[serde(default, with = "sentinel::fret")]
    pub slide_unpitch_to: Option<i8>,
    #[serde(default, with = "sentinel::index")]
    pub chord_id: Option<usize>,
    #[serde(default, with = "sentinel::index")]
    pub chord_notes_id: Option<usize>,
    #[serde(default, with = "sentinel::index")]
    pub fingerprint_single: Option<usize>,
    #[serde(default, with = "sentinel::index")]
    pub fingerprint_chord: Option<usize>,
    pub phrase_iteration_id: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bends: Vec<BendStep>,
}

/// One of the parallel note arrangements of an instrument, per skill level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyTier {
    pub difficulty: i32,
    #[serde(default)]
    pub notes: Vec<RawNote>,
    #[serde(default)]
    pub fingerprints_single: Vec<Fingerprint>,
    #[serde(default)]
    pub fingerprints_chord: Vec<Fingerprint>,
}

/// Per-string fret layout and finger assignment for a named chord.
///
/// `None` means the string is not part of the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordShape {
    pub name: String,
    #[serde(with = "sentinel::fret_array")]
    pub frets: [Option<i8>; 6],
    #[serde(with = "sentinel::fret_array")]
    pub fingers: [Option<i8>; 6],
}

/// Per-string override data for one chord occurrence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordNoteInfo {
    #[serde(default)]
    pub mask: NoteMask,
    #[serde(default, with = "sentinel::fret")]
    pub slide_to: Option<i8>,
    #[serde(default, with = "sentinel::fret")]
    pub slide_unpitch_to: Option<i8>,
    #[serde(default)]
    pub vibrato: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bends: Vec<BendStep>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordNotes {
    pub strings: [ChordNoteInfo; 6],
}

/// Semitone offsets per string from standard reference tuning.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tuning {
    pub offsets: [i32; 6],
}

/// One lyric event of a vocal arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocal {
    pub time: f32,
    #[serde(default)]
    pub length: f32,
    pub lyric: String,
}

/// Full decoded chart record for one arrangement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrangementRecord {
    #[serde(default)]
    pub beats: Vec<BeatMarker>,
    #[serde(default)]
    pub phrases: Vec<Phrase>,
    #[serde(default)]
    pub phrase_iterations: Vec<PhraseIteration>,
    #[serde(default)]
    pub tiers: Vec<DifficultyTier>,
    #[serde(default)]
    pub chords: Vec<ChordShape>,
    #[serde(default)]
    pub chord_notes: Vec<ChordNotes>,
    #[serde(default)]
    pub vocals: Vec<Vocal>,
}

/// Instrument role of an arrangement, from the archive's attribute paths.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentKind {
    LeadGuitar,
    RhythmGuitar,
    BassGuitar,
    Vocals,
}

/// Arrangement attributes decoded from the archive's manifest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrangementHeader {
    pub name: String,
    pub kind: InstrumentKind,
    #[serde(default)]
    pub tuning: Option<Tuning>,
    #[serde(default)]
    pub capo_fret: i32,
    #[serde(default)]
    pub cent_offset: f32,
}

/// One song of the archive with its arrangement manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongEntry {
    pub song_key: String,
    pub song_name: String,
    pub artist_name: String,
    pub album_name: String,
    #[serde(default)]
    pub arrangements: Vec<ArrangementHeader>,
}

/// Serde helpers converting the decoder's `-1` sentinels into `Option`.
pub(crate) mod sentinel {
    pub mod index {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(v: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
            match v {
                Some(i) => s.serialize_i64(*i as i64),
                None => s.serialize_i64(-1),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
            let v = i64::deserialize(d)?;
            if v < 0 {
                Ok(None)
            } else {
                Ok(Some(v as usize))
            }
        }
    }

    pub mod fret {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(v: &Option<i8>, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_i8(v.unwrap_or(-1))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i8>, D::Error> {
            let v = i8::deserialize(d)?;
            if v < 0 {
                Ok(None)
            } else {
                Ok(Some(v))
            }
        }
    }

    pub mod fret_array {
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S: Serializer>(v: &[Option<i8>; 6], s: S) -> Result<S::Ok, S::Error> {
            let raw: [i8; 6] = v.map(|f| f.unwrap_or(-1));
            raw.serialize(s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[Option<i8>; 6], D::Error> {
            let raw = <[i8; 6]>::deserialize(d)?;
            Ok(raw.map(|f| if f < 0 { None } else { Some(f) }))
        }
    }
}
