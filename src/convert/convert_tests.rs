#[cfg(test)]
mod tests {
    use crate::chart::records::{
        ArrangementHeader, ArrangementRecord, BeatMarker, BendStep, ChordNoteInfo, ChordNotes,
        ChordShape, DifficultyTier, Fingerprint, InstrumentKind, NoteMask, Phrase,
        PhraseIteration, RawNote, SongEntry, Tuning, Vocal,
    };
    use crate::convert::chords::{expand_chord, resolve_fingerprint};
    use crate::convert::converter::{ChartAssetReader, SongConverter};
    use crate::convert::techniques::{Technique, TechniqueSet};
    use crate::convert::tiers::DifficultyTiers;
    use crate::convert::tuning::classify_tuning;
    use crate::error::ChartError;
    use crate::song::model::SongNote;
    use std::collections::HashMap;
    use std::io::Read;

    fn init_logger() {
        env_logger::builder()
            .is_test(true)
            .try_init()
            .unwrap_or_default();
    }

    fn tuning(offsets: [i32; 6]) -> Tuning {
        Tuning { offsets }
    }

    fn raw_note(phrase_iteration_id: usize, fret: i32, string: i32) -> RawNote {
        RawNote {
            time: 10.0,
            sustain: 1.5,
            fret,
            string,
            anchor_fret: fret,
            phrase_iteration_id,
            ..RawNote::default()
        }
    }

    fn tier(difficulty: i32, notes: Vec<RawNote>) -> DifficultyTier {
        DifficultyTier {
            difficulty,
            notes,
            fingerprints_single: vec![],
            fingerprints_chord: vec![],
        }
    }

    fn phrase_grid(count: usize) -> (Vec<Phrase>, Vec<PhraseIteration>) {
        let phrases = (0..count)
            .map(|i| Phrase {
                name: format!("phrase{i}"),
            })
            .collect();
        let iterations = (0..count)
            .map(|i| PhraseIteration {
                phrase_id: i,
                start_time: i as f32 * 10.0,
                next_phrase_time: (i + 1) as f32 * 10.0,
            })
            .collect();
        (phrases, iterations)
    }

    #[test]
    fn classify_uniform_tunings() {
        let cases = [
            (0, "E"),
            (1, "F"),
            (2, "F#"),
            (-1, "Eb"),
            (-2, "D"),
            (-3, "C#"),
            (-4, "C"),
            (-5, "B"),
        ];
        for (offset, expected) in cases {
            let name = classify_tuning(&tuning([offset; 6]));
            assert_eq!(name, expected, "offset {offset}");
        }
    }

    #[test]
    fn classify_drop_d() {
        assert_eq!(classify_tuning(&tuning([-2, 0, 0, 0, 0, 0])), "Drop D");
    }

    #[test]
    fn classify_keyed_drop_tuning() {
        assert_eq!(classify_tuning(&tuning([-1, 2, 2, 2, 2, 2])), "F# Drop Eb");
    }

    #[test]
    fn classify_custom_tunings() {
        // non-uniform upper strings are always custom
        assert_eq!(classify_tuning(&tuning([0, 0, 1, 0, 0, 0])), "Custom");
        // uniform offset outside the key table
        assert_eq!(classify_tuning(&tuning([3, 3, 3, 3, 3, 3])), "Custom");
        // dropped low string outside the drop table
        assert_eq!(classify_tuning(&tuning([1, 0, 0, 0, 0, 0])), "Custom");
    }

    #[test]
    fn mute_bits_are_exclusive_in_output() {
        let both = TechniqueSet::from_mask(NoteMask(NoteMask::MUTE | NoteMask::FRET_HAND_MUTE));
        assert!(both.contains(Technique::FretHandMute));
        assert!(!both.contains(Technique::PalmMute));

        let mute_only = TechniqueSet::from_mask(NoteMask(NoteMask::MUTE));
        assert!(mute_only.contains(Technique::PalmMute));
        assert!(!mute_only.contains(Technique::FretHandMute));
    }

    #[test]
    fn slide_bits_collapse_to_one_flag() {
        let pitched = TechniqueSet::from_mask(NoteMask(NoteMask::SLIDE));
        let unpitched = TechniqueSet::from_mask(NoteMask(NoteMask::SLIDE_UNPITCHED_TO));
        assert!(pitched.contains(Technique::Slide));
        assert!(unpitched.contains(Technique::Slide));
    }

    #[test]
    fn child_bit_maps_to_continued() {
        let set = TechniqueSet::from_mask(NoteMask(NoteMask::CHILD));
        assert!(set.contains(Technique::Continued));
    }

    #[test]
    fn unknown_bits_are_ignored() {
        let set = TechniqueSet::from_mask(NoteMask(0x4000_0000));
        assert!(set.is_empty());
    }

    #[test]
    fn highest_tier_with_notes_wins_per_phrase() {
        let tiers = vec![
            tier(1, vec![raw_note(2, 5, 0), raw_note(5, 7, 1)]),
            tier(3, vec![raw_note(2, 9, 2)]),
        ];
        let ordered = DifficultyTiers::new(&tiers);

        let phrase2 = ordered.select(2).unwrap();
        assert_eq!(phrase2.tier.difficulty, 3);
        assert_eq!(phrase2.notes.len(), 1);
        assert_eq!(phrase2.notes[0].fret, 9);

        let phrase5 = ordered.select(5).unwrap();
        assert_eq!(phrase5.tier.difficulty, 1);
        assert_eq!(phrase5.notes[0].fret, 7);

        // rest phrase yields nothing, silently
        assert!(ordered.select(0).is_none());
    }

    #[test]
    fn chord_fingerprint_takes_precedence() {
        let mut t = tier(0, vec![]);
        t.fingerprints_single = vec![Fingerprint {
            chord_id: 1,
            start_time: 0.0,
            end_time: 2.0,
        }];
        t.fingerprints_chord = vec![Fingerprint {
            chord_id: 4,
            start_time: 1.0,
            end_time: 4.0,
        }];
        let mut note = raw_note(0, 5, 0);
        note.fingerprint_single = Some(0);
        note.fingerprint_chord = Some(0);

        let resolved = resolve_fingerprint(&note, &t).unwrap();
        assert_eq!(resolved.chord_id, Some(4));
        assert!((resolved.duration - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fingerprint_slot_out_of_range_is_malformed() {
        let t = tier(0, vec![]);
        let mut note = raw_note(0, 5, 0);
        note.fingerprint_chord = Some(7);
        let err = resolve_fingerprint(&note, &t).unwrap_err();
        assert!(matches!(err, ChartError::MalformedArrangement(_)));
    }

    fn three_string_shape() -> ChordShape {
        ChordShape {
            name: "A5".to_string(),
            frets: [Some(2), Some(4), Some(4), None, None, None],
            fingers: [Some(1), Some(3), Some(4), None, None, None],
        }
    }

    fn parent_note() -> SongNote {
        SongNote {
            time_offset: 12.0,
            time_length: 2.0,
            fret: 2,
            string_index: 0,
            hand_fret: 2,
            chord_id: 0,
            ..SongNote::default()
        }
    }

    #[test]
    fn uniform_chord_folds_into_parent() {
        let vibrato = ChordNoteInfo {
            mask: NoteMask(NoteMask::VIBRATO),
            ..ChordNoteInfo::default()
        };
        let chord_notes = ChordNotes {
            strings: [
                vibrato.clone(),
                vibrato.clone(),
                vibrato,
                ChordNoteInfo::default(),
                ChordNoteInfo::default(),
                ChordNoteInfo::default(),
            ],
        };
        let expansion = expand_chord(parent_note(), &three_string_shape(), &chord_notes);
        assert!(expansion.expanded.is_empty());
        // shared articulation decorates the parent, chord marker bit cleared
        assert!(expansion.parent.techniques.contains(Technique::Vibrato));
        assert!(!expansion.parent.techniques.contains(Technique::ChordNote));
        assert!((expansion.parent.time_length - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn distinct_per_string_info_expands_chord() {
        let mut chord_notes = ChordNotes::default();
        chord_notes.strings[1].bends = vec![BendStep {
            time: 12.5,
            step: 1.5,
        }];
        let expansion = expand_chord(parent_note(), &three_string_shape(), &chord_notes);

        assert_eq!(expansion.expanded.len(), 3);
        // parent becomes a zero-duration chord marker
        assert_eq!(expansion.parent.time_length, 0.0);
        assert!(expansion.parent.techniques.contains(Technique::ChordNote));

        let bent = &expansion.expanded[1];
        assert_eq!(bent.string_index, 1);
        assert_eq!(bent.fret, 4);
        assert_eq!(bent.bends.len(), 1);
        assert_eq!(bent.bends[0].cents, 150);
        for (string, note) in expansion.expanded.iter().enumerate() {
            assert_eq!(note.string_index, string as i8);
            assert!(note.techniques.contains(Technique::ChordNote));
            assert_eq!(note.chord_id, 0);
        }
    }

    #[test]
    fn chord_expansion_is_idempotent() {
        let mut chord_notes = ChordNotes::default();
        chord_notes.strings[0].slide_to = Some(5);
        let shape = three_string_shape();
        let first = expand_chord(parent_note(), &shape, &chord_notes);
        let second = expand_chord(parent_note(), &shape, &chord_notes);
        assert_eq!(first, second);
    }

    // in-memory reader for converter-level tests
    #[derive(Default)]
    struct FakeReader {
        entries: Vec<SongEntry>,
        records: HashMap<(String, String), ArrangementRecord>,
    }

    impl FakeReader {
        fn add_song(&mut self, key: &str, arrangements: Vec<(ArrangementHeader, ArrangementRecord)>) {
            let mut headers = Vec::new();
            for (header, record) in arrangements {
                self.records
                    .insert((key.to_string(), header.name.clone()), record);
                headers.push(header);
            }
            self.entries.push(SongEntry {
                song_key: key.to_string(),
                song_name: format!("song {key}"),
                artist_name: "artist".to_string(),
                album_name: "album".to_string(),
                arrangements: headers,
            });
        }
    }

    impl ChartAssetReader for FakeReader {
        fn song_entries(&self) -> Result<Vec<SongEntry>, ChartError> {
            Ok(self.entries.clone())
        }

        fn read_arrangement(
            &self,
            song_key: &str,
            arrangement: &str,
        ) -> Result<Option<ArrangementRecord>, ChartError> {
            Ok(self
                .records
                .get(&(song_key.to_string(), arrangement.to_string()))
                .cloned())
        }

        fn read_audio_stream(
            &self,
            _song_key: &str,
        ) -> Result<Option<Box<dyn Read + '_>>, ChartError> {
            Ok(None)
        }
    }

    fn guitar_header(name: &str, kind: InstrumentKind) -> ArrangementHeader {
        ArrangementHeader {
            name: name.to_string(),
            kind,
            tuning: Some(tuning([0; 6])),
            capo_fret: 0,
            cent_offset: 0.0,
        }
    }

    fn record_with_beats(count: usize) -> ArrangementRecord {
        let beats = (0..count)
            .map(|i| BeatMarker {
                time: i as f32 * 0.5,
                measure_start: i % 4 == 0,
            })
            .collect();
        ArrangementRecord {
            beats,
            ..ArrangementRecord::default()
        }
    }

    #[test]
    fn longest_beat_grid_wins() {
        init_logger();
        let mut reader = FakeReader::default();
        reader.add_song(
            "key1",
            vec![
                (
                    guitar_header("lead", InstrumentKind::LeadGuitar),
                    record_with_beats(40),
                ),
                (
                    guitar_header("rhythm", InstrumentKind::RhythmGuitar),
                    record_with_beats(55),
                ),
                (
                    guitar_header("bass", InstrumentKind::BassGuitar),
                    record_with_beats(30),
                ),
            ],
        );
        let converter = SongConverter::new(&reader);
        let outputs = converter.convert_all(|_| true).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].structure.beats.len(), 55);
        assert_eq!(outputs[0].parts.len(), 3);
    }

    #[test]
    fn malformed_arrangement_is_isolated() {
        init_logger();
        let (phrases, iterations) = phrase_grid(1);
        let mut bad_note = raw_note(0, 5, 0);
        bad_note.fingerprint_chord = Some(9); // out of range
        let bad = ArrangementRecord {
            phrases: phrases.clone(),
            phrase_iterations: iterations.clone(),
            tiers: vec![tier(0, vec![bad_note])],
            ..ArrangementRecord::default()
        };
        let good = ArrangementRecord {
            phrases,
            phrase_iterations: iterations,
            tiers: vec![tier(0, vec![raw_note(0, 5, 0)])],
            ..ArrangementRecord::default()
        };
        let mut reader = FakeReader::default();
        reader.add_song(
            "key1",
            vec![
                (guitar_header("lead", InstrumentKind::LeadGuitar), bad),
                (guitar_header("rhythm", InstrumentKind::RhythmGuitar), good),
            ],
        );
        let converter = SongConverter::new(&reader);
        let outputs = converter.convert_all(|_| true).unwrap();
        let song = &outputs[0];
        assert_eq!(song.parts.len(), 1);
        assert_eq!(song.parts[0].name, "rhythm");
        assert_eq!(song.skipped.len(), 1);
        assert_eq!(song.skipped[0].arrangement, "lead");
        assert!(matches!(
            song.skipped[0].error,
            ChartError::MalformedArrangement(_)
        ));
    }

    #[test]
    fn narrowing_overflow_is_an_error() {
        init_logger();
        let (phrases, iterations) = phrase_grid(1);
        let record = ArrangementRecord {
            phrases,
            phrase_iterations: iterations,
            tiers: vec![tier(0, vec![raw_note(0, 300, 0)])],
            ..ArrangementRecord::default()
        };
        let mut reader = FakeReader::default();
        reader.add_song(
            "key1",
            vec![(guitar_header("lead", InstrumentKind::LeadGuitar), record)],
        );
        let converter = SongConverter::new(&reader);
        let outputs = converter.convert_all(|_| true).unwrap();
        assert!(outputs[0].parts.is_empty());
        assert!(matches!(
            outputs[0].skipped[0].error,
            ChartError::ValueOutOfRange(_)
        ));
    }

    #[test]
    fn vocal_lyrics_expand_line_breaks() {
        init_logger();
        let record = ArrangementRecord {
            vocals: vec![Vocal {
                time: 4.2,
                length: 1.0,
                lyric: "hello+".to_string(),
            }],
            ..ArrangementRecord::default()
        };
        let header = ArrangementHeader {
            name: "vocals".to_string(),
            kind: InstrumentKind::Vocals,
            tuning: None,
            capo_fret: 0,
            cent_offset: 0.0,
        };
        let mut reader = FakeReader::default();
        reader.add_song("key1", vec![(header, record)]);
        let converter = SongConverter::new(&reader);
        let outputs = converter.convert_all(|_| true).unwrap();
        let part = &outputs[0].parts[0];
        assert_eq!(part.kind, InstrumentKind::Vocals);
        assert_eq!(part.vocals.len(), 1);
        assert_eq!(part.vocals[0].text, "hello\n");
        assert!(part.notes.is_empty());
    }

    #[test]
    fn cancellation_stops_the_batch() {
        init_logger();
        let mut reader = FakeReader::default();
        reader.add_song(
            "key1",
            vec![(
                guitar_header("lead", InstrumentKind::LeadGuitar),
                record_with_beats(4),
            )],
        );
        reader.add_song(
            "key2",
            vec![(
                guitar_header("lead", InstrumentKind::LeadGuitar),
                record_with_beats(4),
            )],
        );
        let converter = SongConverter::new(&reader);
        let mut seen = 0;
        let outputs = converter
            .convert_all(|_| {
                seen += 1;
                seen == 1
            })
            .unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(seen, 2);
    }

    #[test]
    fn fingerprint_disagreement_keeps_both_ids() {
        init_logger();
        let (phrases, iterations) = phrase_grid(1);
        let mut note = raw_note(0, 2, 0);
        note.chord_id = Some(0);
        note.fingerprint_chord = Some(0);
        let mut t = tier(0, vec![note]);
        t.fingerprints_chord = vec![Fingerprint {
            chord_id: 3,
            start_time: 0.0,
            end_time: 1.0,
        }];
        let record = ArrangementRecord {
            phrases,
            phrase_iterations: iterations,
            tiers: vec![t],
            chords: vec![three_string_shape()],
            ..ArrangementRecord::default()
        };
        let mut reader = FakeReader::default();
        reader.add_song(
            "key1",
            vec![(guitar_header("lead", InstrumentKind::LeadGuitar), record)],
        );
        let converter = SongConverter::new(&reader);
        let outputs = converter.convert_all(|_| true).unwrap();
        let note = &outputs[0].parts[0].notes[0];
        assert_eq!(note.chord_id, 0);
        assert_eq!(note.chord_shape_id, Some(3));
    }

    #[test]
    fn sentinel_fields_become_options_at_the_boundary() {
        let json = r#"{
            "time": 1.0,
            "sustain": 0.5,
            "fret": 3,
            "string": 2,
            "mask": 0,
            "anchorFret": 3,
            "slideTo": 5,
            "slideUnpitchTo": -1,
            "chordId": -1,
            "chordNotesId": -1,
            "fingerprintSingle": 0,
            "fingerprintChord": -1,
            "phraseIterationId": 0
        }"#;
        let note: RawNote = serde_json::from_str(json).unwrap();
        assert_eq!(note.slide_to, Some(5));
        assert_eq!(note.slide_unpitch_to, None);
        assert_eq!(note.chord_id, None);
        assert_eq!(note.fingerprint_single, Some(0));
        assert_eq!(note.fingerprint_chord, None);
    }
}
