//! Notechart - note chart normalizer for rhythm-game chart archives
//!
//! This library provides:
//! - A normalized, difficulty-flattened song model (notes, chords, sections,
//!   beats, vocals)
//! - The normalization engine turning decoded per-difficulty chart records
//!   into that model (tier selection, chord resolution and expansion,
//!   technique mapping, tuning classification)
//! - A reader trait to plug in any archive-decoding backend
//!
//! # Example
//!
//! ```no_run
//! use notechart::{ChartAssetReader, SongConverter};
//!
//! fn convert(reader: &impl ChartAssetReader) {
//!     let converter = SongConverter::new(reader);
//!     let outputs = converter.convert_all(|label| {
//!         println!("converting {label}");
//!         true
//!     });
//!     println!("{} songs converted", outputs.unwrap().len());
//! }
//! ```

pub mod chart;
pub mod convert;
pub mod error;
pub mod song;

// Re-export main types for convenience
pub use chart::records::{
    ArrangementHeader, ArrangementRecord, InstrumentKind, NoteMask, SongEntry, Tuning,
};
pub use convert::converter::{ChartAssetReader, SkippedArrangement, SongConverter, SongOutput};
pub use convert::techniques::{Technique, TechniqueSet};
pub use convert::tuning::classify_tuning;
pub use error::ChartError;
pub use song::model::{
    Beat, BendPoint, InstrumentPart, Section, SongChord, SongMetadata, SongNote,
    StructureDocument, VocalLine,
};
