//! Writes one song's normalized documents to a per-song output directory.

use crate::AppError;
use notechart::{ChartAssetReader, SongOutput};
use std::fs::{create_dir_all, File};
use std::io::BufWriter;
use std::path::PathBuf;

pub struct OutputWriter {
    dest: PathBuf,
    convert_audio: bool,
}

/// Keep only alphanumeric characters for filesystem safety.
fn safe_filename(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).collect()
}

impl OutputWriter {
    pub const fn new(dest: PathBuf, convert_audio: bool) -> Self {
        Self {
            dest,
            convert_audio,
        }
    }

    /// Write `<artist>/<song>/` with `song.json` (metadata), `structure.json`
    /// (beats and sections), one `<part>.json` per arrangement and the opaque
    /// audio stream copied verbatim to `song.ogg`.
    pub fn write_song(
        &self,
        output: &SongOutput,
        reader: &impl ChartAssetReader,
    ) -> Result<(), AppError> {
        let artist_dir = self.dest.join(safe_filename(&output.metadata.artist_name));
        let song_dir = artist_dir.join(safe_filename(&output.metadata.song_name));
        create_dir_all(&song_dir)?;

        let metadata_file = File::create(song_dir.join("song.json"))?;
        serde_json::to_writer_pretty(BufWriter::new(metadata_file), &output.metadata)?;

        let structure_file = File::create(song_dir.join("structure.json"))?;
        serde_json::to_writer_pretty(BufWriter::new(structure_file), &output.structure)?;

        for part in &output.parts {
            let part_file = File::create(song_dir.join(format!("{}.json", part.name)))?;
            // parts can be large, keep them condensed
            serde_json::to_writer(BufWriter::new(part_file), part)?;
        }

        let audio_path = song_dir.join("song.ogg");
        if self.convert_audio || !audio_path.exists() {
            if let Some(mut stream) = reader.read_audio_stream(&output.song_key)? {
                let mut audio_file = BufWriter::new(File::create(&audio_path)?);
                std::io::copy(&mut stream, &mut audio_file)?;
            }
        }
        Ok(())
    }
}
