//! [`ChartAssetReader`] backed by a directory of decoded record dumps.
//!
//! Layout: one sub-directory per song key, each holding an `entry.json`
//! (the song manifest), one `<arrangement>.json` per arrangement and an
//! optional opaque `audio.ogg`.

use notechart::{ArrangementRecord, ChartAssetReader, ChartError, SongEntry};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

pub struct DumpReader {
    root: PathBuf,
}

impl DumpReader {
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl ChartAssetReader for DumpReader {
    fn song_entries(&self) -> Result<Vec<SongEntry>, ChartError> {
        let mut entries = Vec::new();
        for dir_entry in std::fs::read_dir(&self.root)? {
            let path = dir_entry?.path();
            if !path.is_dir() {
                continue;
            }
            let manifest = path.join("entry.json");
            if !manifest.exists() {
                log::warn!("no entry.json in {path:?}, skipping");
                continue;
            }
            let file = File::open(&manifest)?;
            match serde_json::from_reader::<_, SongEntry>(BufReader::new(file)) {
                Ok(entry) => entries.push(entry),
                // an unreadable manifest must not abort the whole dump
                Err(err) => log::warn!("unreadable manifest {manifest:?}: {err}"),
            }
        }
        entries.sort_by(|a, b| a.song_key.cmp(&b.song_key));
        Ok(entries)
    }

    fn read_arrangement(
        &self,
        song_key: &str,
        arrangement: &str,
    ) -> Result<Option<ArrangementRecord>, ChartError> {
        let path = self.root.join(song_key).join(format!("{arrangement}.json"));
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(&path)?;
        let record = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| ChartError::ReaderError(format!("bad record {path:?}: {err}")))?;
        Ok(Some(record))
    }

    fn read_audio_stream(&self, song_key: &str) -> Result<Option<Box<dyn Read + '_>>, ChartError> {
        let path = self.root.join(song_key).join("audio.ogg");
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(path)?;
        Ok(Some(Box::new(BufReader::new(file))))
    }
}
