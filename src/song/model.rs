//! Normalized song model, the stable output contract of the engine.
//!
//! Field names and nesting are what the downstream serializer writes; `-1`
//! valued i8 fields mean "not set" and are omitted on write, matching the
//! behavior of the historical converter output.

use crate::chart::records::InstrumentKind;
use crate::convert::techniques::TechniqueSet;
use serde::{Deserialize, Serialize};

const fn unset() -> i8 {
    -1
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_unset(v: &i8) -> bool {
    *v == -1
}

/// One integer-cents point of a bend envelope.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BendPoint {
    pub time_offset: f32,
    pub cents: i32,
}

/// A single normalized note event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongNote {
    pub time_offset: f32,
    pub time_length: f32,
    #[serde(default = "unset", skip_serializing_if = "is_unset")]
    pub fret: i8,
    #[serde(default = "unset", skip_serializing_if = "is_unset")]
    pub string_index: i8,
    #[serde(default, skip_serializing_if = "TechniqueSet::is_empty")]
    pub techniques: TechniqueSet,
    #[serde(default = "unset", skip_serializing_if = "is_unset")]
    pub hand_fret: i8,
    #[serde(default = "unset", skip_serializing_if = "is_unset")]
    pub slide_fret: i8,
    #[serde(default = "unset", skip_serializing_if = "is_unset")]
    pub chord_id: i8,
    /// Fingerprint-resolved chord id, present only when it disagrees with
    /// [`SongNote::chord_id`]. Both are kept for downstream disambiguation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord_shape_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bends: Vec<BendPoint>,
}

impl Default for SongNote {
    fn default() -> Self {
        Self {
            time_offset: 0.0,
            time_length: 0.0,
            fret: -1,
            string_index: -1,
            techniques: TechniqueSet::EMPTY,
            hand_fret: -1,
            slide_fret: -1,
            chord_id: -1,
            chord_shape_id: None,
            bends: Vec::new(),
        }
    }
}

/// A named chord shape of the output part. Unused strings carry `-1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongChord {
    pub name: String,
    pub fingers: Vec<i32>,
    pub frets: Vec<i32>,
}

/// A named span of the song timeline, one per phrase iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub name: String,
    pub start_time: f32,
    pub end_time: f32,
}

/// One tick of the shared beat grid.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beat {
    pub time_offset: f32,
    pub is_measure: bool,
}

/// One lyric line of a vocal part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocalLine {
    pub text: String,
    pub time_offset: f32,
}

/// The normalized output of one arrangement.
///
/// Instrument parts carry notes, chords and sections; vocal parts carry a
/// parallel vocal line list instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentPart {
    pub name: String,
    pub kind: InstrumentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuning_name: Option<String>,
    #[serde(default)]
    pub capo_fret: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chords: Vec<SongChord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<SongNote>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vocals: Vec<VocalLine>,
}

/// Song-level metadata shared by all parts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongMetadata {
    pub song_name: String,
    pub artist_name: String,
    pub album_name: String,
    #[serde(default)]
    pub a440_cents_offset: f32,
}

/// Beat grid and section skeleton shared across a song's parts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureDocument {
    #[serde(default)]
    pub beats: Vec<Beat>,
    #[serde(default)]
    pub sections: Vec<Section>,
}
