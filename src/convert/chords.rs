//! Chord fingerprint resolution and chord expansion.

use crate::chart::records::{BendStep, ChordNotes, ChordShape, DifficultyTier, RawNote};
use crate::convert::techniques::{Technique, TechniqueSet};
use crate::error::ChartError;
use crate::song::model::{BendPoint, SongNote};

/// Chord identity and duration attached to a note through its fingerprint
/// slots.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResolvedFingerprint {
    pub chord_id: Option<usize>,
    pub duration: f32,
}

/// Resolve a note's fingerprint slots against the tier's fingerprint tables.
///
/// A chord fingerprint takes precedence over a single-note fingerprint; a
/// note with neither resolves to no chord and zero duration. An out-of-range
/// slot index means the arrangement data is inconsistent.
pub fn resolve_fingerprint(
    note: &RawNote,
    tier: &DifficultyTier,
) -> Result<ResolvedFingerprint, ChartError> {
    if let Some(slot) = note.fingerprint_chord {
        let fp = tier.fingerprints_chord.get(slot).ok_or_else(|| {
            ChartError::MalformedArrangement(format!("chord fingerprint slot {slot} out of range"))
        })?;
        return Ok(ResolvedFingerprint {
            chord_id: Some(fp.chord_id),
            duration: fp.end_time - fp.start_time,
        });
    }
    if let Some(slot) = note.fingerprint_single {
        let fp = tier.fingerprints_single.get(slot).ok_or_else(|| {
            ChartError::MalformedArrangement(format!("single fingerprint slot {slot} out of range"))
        })?;
        return Ok(ResolvedFingerprint {
            chord_id: Some(fp.chord_id),
            duration: fp.end_time - fp.start_time,
        });
    }
    Ok(ResolvedFingerprint {
        chord_id: None,
        duration: 0.0,
    })
}

/// Pick the output slide fret from the pitched and unpitched targets.
///
/// The pitched target wins only when strictly positive, otherwise the
/// unpitched target is used as-is. This conflates "no slide" with "slide to
/// fret 0" exactly like the source data does.
pub fn slide_fret(slide_to: Option<i8>, slide_unpitch_to: Option<i8>) -> i8 {
    match slide_to {
        Some(fret) if fret > 0 => fret,
        _ => slide_unpitch_to.unwrap_or(-1),
    }
}

/// Convert decoded bend steps to an integer-cents envelope.
pub fn bend_envelope(steps: &[BendStep]) -> Vec<BendPoint> {
    steps
        .iter()
        .map(|b| BendPoint {
            time_offset: b.time,
            cents: (b.step * 100.0).round() as i32,
        })
        .collect()
}

/// Result of expanding a chorded note.
///
/// `expanded` is empty when the per-string candidates carried no distinct
/// information and were folded back into the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordExpansion {
    pub parent: SongNote,
    pub expanded: Vec<SongNote>,
}

/// Expand a chorded note into per-string note events.
///
/// One candidate is synthesized per string the chord shape uses, overriding
/// string, fret, techniques, slide fret and bend envelope from the per-string
/// chord note record. If any candidate differs from the first in techniques,
/// has a slide fret, or has a bend envelope, all candidates are emitted and
/// the parent becomes a zero-duration chord marker. Otherwise the candidates
/// are discarded and their shared techniques are folded into the parent,
/// which then stands alone. A pure function of its inputs.
pub fn expand_chord(
    mut parent: SongNote,
    shape: &ChordShape,
    chord_notes: &ChordNotes,
) -> ChordExpansion {
    let mut candidates: Vec<SongNote> = Vec::new();
    for (string, fret) in shape.frets.iter().enumerate() {
        let Some(fret) = fret else {
            // string not part of the shape
            continue;
        };
        let info = &chord_notes.strings[string];
        let mut candidate = parent.clone();
        candidate.string_index = string as i8;
        candidate.fret = *fret;
        candidate.techniques = TechniqueSet::from_mask(info.mask).with(Technique::ChordNote);
        candidate.slide_fret = slide_fret(info.slide_to, info.slide_unpitch_to);
        candidate.bends = bend_envelope(&info.bends);
        candidates.push(candidate);
    }

    if candidates.is_empty() {
        return ChordExpansion {
            parent,
            expanded: candidates,
        };
    }

    let distinct = candidates.iter().any(|c| {
        c.techniques != candidates[0].techniques || c.slide_fret != -1 || !c.bends.is_empty()
    });

    if distinct {
        // per-string detail not representable on the aggregate note:
        // keep all candidates, demote the parent to a chord marker
        parent.techniques.insert(Technique::ChordNote);
        parent.time_length = 0.0;
        ChordExpansion {
            parent,
            expanded: candidates,
        }
    } else {
        // uniform strum: fold the shared techniques into the parent
        parent.techniques = parent.techniques.union(candidates[0].techniques);
        parent.techniques.remove(Technique::ChordNote);
        ChordExpansion {
            parent,
            expanded: Vec::new(),
        }
    }
}
