//! Section and beat skeleton derived from an arrangement's records.

use crate::chart::records::ArrangementRecord;
use crate::error::ChartError;
use crate::song::model::{Beat, Section};

/// One section per phrase iteration, named after its phrase and spanning
/// `[start_time, next_phrase_time)`. A phrase id outside the phrase table
/// means the arrangement data is inconsistent.
pub fn build_sections(record: &ArrangementRecord) -> Result<Vec<Section>, ChartError> {
    record
        .phrase_iterations
        .iter()
        .map(|it| {
            let phrase = record.phrases.get(it.phrase_id).ok_or_else(|| {
                ChartError::MalformedArrangement(format!("phrase id {} out of range", it.phrase_id))
            })?;
            Ok(Section {
                name: phrase.name.clone(),
                start_time: it.start_time,
                end_time: it.next_phrase_time,
            })
        })
        .collect()
}

/// The arrangement's full beat grid in output shape.
pub fn build_beats(record: &ArrangementRecord) -> Vec<Beat> {
    record
        .beats
        .iter()
        .map(|b| Beat {
            time_offset: b.time,
            is_measure: b.measure_start,
        })
        .collect()
}
