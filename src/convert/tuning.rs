//! Human-readable classification of 6-string tuning vectors.

use crate::chart::records::Tuning;

/// Key name for a uniform semitone offset of strings 1 to 5.
const fn offset_note(offset: i32) -> Option<&'static str> {
    match offset {
        0 => Some("E"),
        1 => Some("F"),
        2 => Some("F#"),
        -1 => Some("Eb"),
        -2 => Some("D"),
        -3 => Some("C#"),
        -4 => Some("C"),
        -5 => Some("B"),
        _ => None,
    }
}

/// Note name of a dropped low string.
const fn drop_note(offset: i32) -> Option<&'static str> {
    match offset {
        -1 => Some("Eb"),
        -2 => Some("D"),
        -3 => Some("Db"),
        -4 => Some("C"),
        -5 => Some("B"),
        _ => None,
    }
}

/// Classify a tuning vector into a canonical name.
///
/// Strings 1 to 5 sharing the same offset yield the key name from a fixed
/// table; a differing low string makes it a drop tuning (`"Drop D"`,
/// `"F# Drop Eb"`). Anything outside the tables is `"Custom"`.
/// This classification never fails.
pub fn classify_tuning(tuning: &Tuning) -> String {
    let offsets = &tuning.offsets;
    if offsets[1..].iter().any(|&o| o != offsets[1]) {
        return "Custom".to_string();
    }
    let Some(key) = offset_note(offsets[1]) else {
        return "Custom".to_string();
    };
    if offsets[0] == offsets[1] {
        return key.to_string();
    }
    // low string differs: drop tuning
    let Some(drop) = drop_note(offsets[0]) else {
        return "Custom".to_string();
    };
    if key == "E" {
        format!("Drop {drop}")
    } else {
        format!("{key} Drop {drop}")
    }
}
