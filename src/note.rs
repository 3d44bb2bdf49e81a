//! Pitch classification for the diatonic lyre keyboard.
//!
//! The instrument plays the C major scale only, across three octaves. Each
//! playable pitch maps to one keyboard letter; everything else is rendered
//! as a rest.

use std::ops::Range;

/// The C major scale key positions relative to C.
const C_MAJOR: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Keyboard rows, one per octave, lowest octave first.
const LETTERS: [&str; 3] = ["zxcvbnm", "asdfghj", "qwertyu"];

/// Marker emitted for a pitch the instrument cannot play.
pub const REST: char = '-';

/// The playable pitch range, C3 up to (but not including) B5.
pub const KEY_RANGE: Range<i32> = 48..83;

/// Whether the pitch class belongs to the C major scale.
///
/// Octave-invariant: sharps and flats are rejected regardless of range.
pub fn is_major(pitch: i32) -> bool {
    C_MAJOR.contains(&pitch.rem_euclid(12))
}

/// Whether the pitch falls inside the instrument's playable range.
pub fn in_range(pitch: i32) -> bool {
    KEY_RANGE.contains(&pitch)
}

/// Map an in-range, in-scale pitch to its keyboard letter.
///
/// Callers must filter with [`is_major`] and [`in_range`] first; anything
/// else is a contract violation.
pub fn to_letter(pitch: i32) -> char {
    debug_assert!(
        in_range(pitch) && is_major(pitch),
        "to_letter called on unplayable pitch {pitch}"
    );
    let offset = (pitch - KEY_RANGE.start) as usize;
    let degree = C_MAJOR
        .iter()
        .position(|&d| d == (offset % 12) as i32)
        .expect("off-scale pitch must be filtered by the caller");
    LETTERS[offset / 12].as_bytes()[degree] as char
}

/// Octave-shift an out-of-range pitch by the minimal multiple of 12 that
/// brings it into range. In-range pitches are returned unchanged, so the
/// operation is idempotent. The pitch class never changes, so a sharp or
/// flat stays unplayable even after adjustment.
pub fn adjust(pitch: i32) -> i32 {
    if pitch < KEY_RANGE.start {
        pitch + 12 * ((KEY_RANGE.start - pitch + 11) / 12)
    } else if pitch >= KEY_RANGE.end {
        pitch - 12 * ((pitch - KEY_RANGE.end + 12) / 12)
    } else {
        pitch
    }
}

/// Total order over the chord alphabet: the rest marker sorts before every
/// letter, letters sort by keyboard position from the lowest row up.
/// Characters outside the alphabet sort last.
pub fn key_order(key: char) -> usize {
    if key == REST {
        return 0;
    }
    LETTERS
        .iter()
        .flat_map(|row| row.chars())
        .position(|c| c == key)
        .map_or(usize::MAX, |i| i + 1)
}
