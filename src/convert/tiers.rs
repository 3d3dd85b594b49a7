//! Per-phrase selection of the active difficulty tier.

use crate::chart::records::{DifficultyTier, RawNote};

/// An arrangement's difficulty tiers, ordered descending by difficulty.
///
/// Sorting happens once at construction so selection can rely on the order
/// instead of re-sorting at every phrase.
pub struct DifficultyTiers<'a> {
    tiers: Vec<&'a DifficultyTier>,
}

/// The notes contributed by one tier for one phrase iteration.
///
/// The tier is kept alongside the notes because fingerprint resolution needs
/// its fingerprint tables.
pub struct PhraseNotes<'a> {
    pub tier: &'a DifficultyTier,
    pub notes: Vec<&'a RawNote>,
}

impl<'a> DifficultyTiers<'a> {
    pub fn new(tiers: &'a [DifficultyTier]) -> Self {
        let mut tiers: Vec<&DifficultyTier> = tiers.iter().collect();
        tiers.sort_by(|a, b| b.difficulty.cmp(&a.difficulty));
        Self { tiers }
    }

    /// Select the note source for a phrase iteration.
    ///
    /// The highest tier with notes for the phrase wins; notes of lower tiers
    /// for that phrase are discarded entirely. `None` when no tier has notes
    /// (a rest phrase) — this is a normal case, not a failure.
    pub fn select(&self, phrase_iteration: usize) -> Option<PhraseNotes<'a>> {
        for tier in &self.tiers {
            let notes: Vec<&RawNote> = tier
                .notes
                .iter()
                .filter(|n| n.phrase_iteration_id == phrase_iteration)
                .collect();
            if !notes.is_empty() {
                return Some(PhraseNotes { tier, notes });
            }
        }
        None
    }
}
