//! Song-level conversion: orchestrates part assembly across arrangements.

use crate::chart::records::{ArrangementHeader, ArrangementRecord, SongEntry};
use crate::convert::assembler::PartAssembler;
use crate::convert::structure::{build_beats, build_sections};
use crate::error::ChartError;
use crate::song::model::{InstrumentPart, SongMetadata, StructureDocument};
use std::io::Read;

/// Access to decoded chart assets, provided by the archive-decoding
/// collaborator. The engine itself performs no I/O.
pub trait ChartAssetReader {
    /// All songs available from the backing archive or dump.
    fn song_entries(&self) -> Result<Vec<SongEntry>, ChartError>;

    /// The decoded chart record for one arrangement of a song, `None` when
    /// the archive has no chart data for that key (a normal condition).
    fn read_arrangement(
        &self,
        song_key: &str,
        arrangement: &str,
    ) -> Result<Option<ArrangementRecord>, ChartError>;

    /// Opaque audio byte stream for a song; the engine never parses it.
    fn read_audio_stream(&self, song_key: &str) -> Result<Option<Box<dyn Read + '_>>, ChartError>;
}

/// An arrangement that failed conversion and was skipped.
///
/// Failures are isolated per arrangement so one bad arrangement never takes
/// down its siblings; callers decide whether to surface these as warnings.
#[derive(Debug)]
pub struct SkippedArrangement {
    pub arrangement: String,
    pub error: ChartError,
}

/// Everything produced for one song.
#[derive(Debug)]
pub struct SongOutput {
    pub song_key: String,
    pub metadata: SongMetadata,
    pub structure: StructureDocument,
    pub parts: Vec<InstrumentPart>,
    pub skipped: Vec<SkippedArrangement>,
}

/// Drives conversion of the songs exposed by a [`ChartAssetReader`].
///
/// Stateless across songs; batch processing across readers is embarrassingly
/// parallel and left to the caller.
pub struct SongConverter<'a, R: ChartAssetReader> {
    reader: &'a R,
}

impl<'a, R: ChartAssetReader> SongConverter<'a, R> {
    pub const fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Convert all songs, reporting each one through `progress` before its
    /// arrangements are processed. A `false` from the callback stops the
    /// batch cleanly; songs already converted are returned untouched.
    pub fn convert_all(
        &self,
        mut progress: impl FnMut(&str) -> bool,
    ) -> Result<Vec<SongOutput>, ChartError> {
        let entries = self.reader.song_entries()?;
        let mut outputs = Vec::with_capacity(entries.len());
        for entry in entries {
            let label = format!("{} - {}", entry.artist_name, entry.song_name);
            if !progress(&label) {
                log::info!("conversion cancelled after {} songs", outputs.len());
                break;
            }
            outputs.push(self.convert_song(&entry));
        }
        Ok(outputs)
    }

    /// Convert one song. Never fails as a whole: arrangements that cannot be
    /// converted are collected in [`SongOutput::skipped`].
    pub fn convert_song(&self, entry: &SongEntry) -> SongOutput {
        let mut metadata = SongMetadata {
            song_name: entry.song_name.clone(),
            artist_name: entry.artist_name.clone(),
            album_name: entry.album_name.clone(),
            a440_cents_offset: 0.0,
        };
        let mut structure = StructureDocument::default();
        let mut parts = Vec::new();
        let mut skipped = Vec::new();
        for header in &entry.arrangements {
            match self.convert_arrangement(entry, header, &mut structure, &mut metadata) {
                Ok(Some(part)) => parts.push(part),
                Ok(None) => {
                    log::warn!(
                        "no chart record for {:?} of {:?}",
                        header.name,
                        entry.song_key
                    );
                }
                Err(error) => {
                    log::warn!(
                        "skipping arrangement {:?} of {:?}: {error}",
                        header.name,
                        entry.song_key
                    );
                    skipped.push(SkippedArrangement {
                        arrangement: header.name.clone(),
                        error,
                    });
                }
            }
        }
        SongOutput {
            song_key: entry.song_key.clone(),
            metadata,
            structure,
            parts,
            skipped,
        }
    }

    fn convert_arrangement(
        &self,
        entry: &SongEntry,
        header: &ArrangementHeader,
        structure: &mut StructureDocument,
        metadata: &mut SongMetadata,
    ) -> Result<Option<InstrumentPart>, ChartError> {
        let Some(record) = self.reader.read_arrangement(&entry.song_key, &header.name)? else {
            return Ok(None);
        };
        let part = PartAssembler::new(header, &record).assemble()?;

        // the song keeps whichever arrangement yields the longest beat grid;
        // a later arrangement with fewer beats never overwrites it
        let beats = build_beats(&record);
        if beats.len() > structure.beats.len() {
            structure.beats = beats;
        }
        let sections = build_sections(&record)?;
        if sections.len() > structure.sections.len() {
            structure.sections = sections;
        }
        if metadata.a440_cents_offset == 0.0 {
            metadata.a440_cents_offset = header.cent_offset;
        }
        Ok(Some(part))
    }
}
