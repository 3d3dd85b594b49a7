pub mod assembler;
pub mod chords;
mod convert_tests;
pub mod converter;
pub mod structure;
pub mod techniques;
pub mod tiers;
pub mod tuning;
