//! Assembly of one normalized instrument part from an arrangement's records.

use crate::chart::records::{
    ArrangementHeader, ArrangementRecord, DifficultyTier, InstrumentKind, RawNote,
};
use crate::convert::chords::{bend_envelope, expand_chord, resolve_fingerprint, slide_fret};
use crate::convert::structure::build_sections;
use crate::convert::techniques::TechniqueSet;
use crate::convert::tiers::DifficultyTiers;
use crate::convert::tuning::classify_tuning;
use crate::error::ChartError;
use crate::song::model::{InstrumentPart, SongChord, SongNote, VocalLine};

/// Narrow a decoded integer to the signed-byte output range.
///
/// Overflow is a data-integrity error, never a silent wrap: a truncated fret
/// or chord id would corrupt playback downstream.
fn narrow(value: i32, what: &str) -> Result<i8, ChartError> {
    i8::try_from(value).map_err(|_| {
        ChartError::ValueOutOfRange(format!("{what} {value} does not fit in a signed byte"))
    })
}

fn narrow_chord_id(chord_id: Option<usize>) -> Result<i8, ChartError> {
    match chord_id {
        None => Ok(-1),
        Some(id) => i8::try_from(id).map_err(|_| {
            ChartError::ValueOutOfRange(format!("chord id {id} does not fit in a signed byte"))
        }),
    }
}

/// Builds one [`InstrumentPart`] from an arrangement header and its decoded
/// chart record.
pub struct PartAssembler<'a> {
    header: &'a ArrangementHeader,
    record: &'a ArrangementRecord,
}

impl<'a> PartAssembler<'a> {
    pub const fn new(header: &'a ArrangementHeader, record: &'a ArrangementRecord) -> Self {
        Self { header, record }
    }

    pub fn assemble(&self) -> Result<InstrumentPart, ChartError> {
        match self.header.kind {
            InstrumentKind::Vocals => Ok(self.assemble_vocals()),
            InstrumentKind::LeadGuitar
            | InstrumentKind::RhythmGuitar
            | InstrumentKind::BassGuitar => self.assemble_instrument(),
        }
    }

    fn assemble_vocals(&self) -> InstrumentPart {
        let vocals: Vec<VocalLine> = self
            .record
            .vocals
            .iter()
            .map(|v| VocalLine {
                // '+' marks a line break in decoded lyrics
                text: v.lyric.replace('+', "\n"),
                time_offset: v.time,
            })
            .collect();
        log::debug!(
            "assembled vocal part {:?} with {} lines",
            self.header.name,
            vocals.len()
        );
        InstrumentPart {
            name: self.header.name.clone(),
            kind: InstrumentKind::Vocals,
            tuning_name: None,
            capo_fret: 0,
            sections: Vec::new(),
            chords: Vec::new(),
            notes: Vec::new(),
            vocals,
        }
    }

    fn assemble_instrument(&self) -> Result<InstrumentPart, ChartError> {
        let record = self.record;
        let sections = build_sections(record)?;
        let chords: Vec<SongChord> = record
            .chords
            .iter()
            .map(|c| SongChord {
                name: c.name.clone(),
                fingers: c.fingers.iter().map(|f| f.map_or(-1, i32::from)).collect(),
                frets: c.frets.iter().map(|f| f.map_or(-1, i32::from)).collect(),
            })
            .collect();

        // tiers sorted descending once, selection relies on the order
        let tiers = DifficultyTiers::new(&record.tiers);
        let mut notes: Vec<SongNote> = Vec::new();
        for phrase_iteration in 0..record.phrase_iterations.len() {
            let Some(phrase_notes) = tiers.select(phrase_iteration) else {
                // rest phrase
                continue;
            };
            for note in &phrase_notes.notes {
                let song_note = self.convert_note(note, phrase_notes.tier)?;
                if let Some(chord_notes_id) = note.chord_notes_id {
                    let chord_notes = record.chord_notes.get(chord_notes_id).ok_or_else(|| {
                        ChartError::MalformedArrangement(format!(
                            "chord notes id {chord_notes_id} out of range"
                        ))
                    })?;
                    let chord_id = note.chord_id.ok_or_else(|| {
                        ChartError::MalformedArrangement(
                            "note has chord notes but no chord id".to_string(),
                        )
                    })?;
                    let shape = record.chords.get(chord_id).ok_or_else(|| {
                        ChartError::MalformedArrangement(format!(
                            "chord id {chord_id} out of range"
                        ))
                    })?;
                    let expansion = expand_chord(song_note, shape, chord_notes);
                    notes.extend(expansion.expanded);
                    notes.push(expansion.parent);
                } else {
                    notes.push(song_note);
                }
            }
        }

        log::debug!(
            "assembled part {:?} with {} notes over {} phrases",
            self.header.name,
            notes.len(),
            record.phrase_iterations.len()
        );
        Ok(InstrumentPart {
            name: self.header.name.clone(),
            kind: self.header.kind,
            tuning_name: self.header.tuning.as_ref().map(classify_tuning),
            capo_fret: self.header.capo_fret,
            sections,
            chords,
            notes,
            vocals: Vec::new(),
        })
    }

    #[allow(clippy::unused_self)]
    fn convert_note(&self, note: &RawNote, tier: &DifficultyTier) -> Result<SongNote, ChartError> {
        let resolved = resolve_fingerprint(note, tier)?;
        // the fingerprint-resolved chord can disagree with the note's own
        // chord slot; both are preserved
        let chord_shape_id = match resolved.chord_id {
            Some(resolved_id) if note.chord_id != Some(resolved_id) => Some(resolved_id as i32),
            _ => None,
        };
        Ok(SongNote {
            time_offset: note.time,
            time_length: note.sustain,
            fret: narrow(note.fret, "fret")?,
            string_index: narrow(note.string, "string index")?,
            techniques: TechniqueSet::from_mask(note.mask),
            hand_fret: narrow(note.anchor_fret, "anchor fret")?,
            slide_fret: slide_fret(note.slide_to, note.slide_unpitch_to),
            chord_id: narrow_chord_id(note.chord_id)?,
            chord_shape_id,
            bends: bend_envelope(&note.bends),
        })
    }
}
