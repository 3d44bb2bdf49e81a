//! MIDI to lyre tablature converter library
//!
//! Turns a decoded MIDI performance into lines of keyboard letters playable
//! on a diatonic, three-octave virtual lyre. Simultaneous note starts become
//! chords, chords are grouped into bars by the time signature, and anything
//! the instrument cannot play is rendered as a rest marker.

pub mod chord;
pub mod midi;
pub mod note;
pub mod output;
pub mod track;

// Re-export main types for convenience
pub use midi::{merge_tracks, Event, EventKind, MidiData, Track};
pub use output::Exporter;
pub use track::{Bar, Part};
