use serde::Serialize;
use tracing::{debug, info};

use crate::chord::build_chord;
use crate::midi::{Event, EventKind, Track};
use crate::note;

/// One measure: an ordered sequence of canonical chord strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bar {
    pub chords: Vec<String>,
}

impl Bar {
    pub fn text(&self) -> String {
        self.chords.join(" ")
    }
}

/// Per-track processing state: the decoded events plus the timing context
/// needed to segment them into bars.
#[derive(Debug, Clone)]
pub struct Part {
    pub events: Vec<Event>,
    pub name: Option<String>,
    pub ticks_per_beat: u32,
    /// Beats per bar; 0 until a time signature event is seen or a value is
    /// inherited from the previous part.
    pub numerator: u32,
    /// Semitone shift applied to every pitch before classification.
    pub transpose: i32,
}

impl Part {
    pub fn new(track: Track, ticks_per_beat: u32, transpose: i32) -> Self {
        Self {
            events: track.events,
            name: track.name,
            ticks_per_beat,
            numerator: 0,
            transpose,
        }
    }

    /// Walk the event stream once, grouping simultaneous note starts into
    /// chords and chords into bars.
    ///
    /// Notes sharing a timestamp join one chord; the chord is complete when
    /// the clock first moves past it. A bar boundary falls every
    /// `ticks_per_beat * numerator` ticks; degenerate timing (either value
    /// zero) keeps everything in bar 0 rather than failing.
    pub fn segment(&mut self, adjust: bool) -> Vec<Bar> {
        let mut clock: u64 = 0;
        let mut clock_prev: u64 = 0;
        let mut bar: u64 = 0;
        let mut bars = vec![Bar::default()];
        let mut pending: Vec<char> = Vec::new();

        for event in &self.events {
            clock += event.delta as u64;

            if let EventKind::TimeSignature { numerator } = event.kind {
                self.numerator = numerator as u32;
            }

            let pitch = match event.kind {
                EventKind::NoteOn { pitch, velocity } if velocity != 0 => pitch as i32,
                kind => {
                    debug!(?kind, "not a note start, skipping");
                    continue;
                }
            };

            // Same timestamp as the previous note: it joins the pending
            // chord. A later timestamp completes the chord.
            if clock != clock_prev {
                let chord = build_chord(&pending);
                bars.last_mut().expect("bars is never empty").chords.push(chord);
                pending.clear();
                clock_prev = clock;
            }

            let pitch = pitch + self.transpose;

            if !note::is_major(pitch) || (!note::in_range(pitch) && !adjust) {
                info!(pitch, "unplayable note, emitting a rest");
                pending.push(note::REST);
            } else {
                let pitch = if adjust { note::adjust(pitch) } else { pitch };
                pending.push(note::to_letter(pitch));
            }

            let target_bar = if self.ticks_per_beat == 0 || self.numerator == 0 {
                0
            } else {
                (clock / self.ticks_per_beat as u64) / self.numerator as u64
            };
            if target_bar > bar {
                bars.push(Bar::default());
                bar = target_bar;
            }
        }

        // The last chord never sees a later timestamp; flush it explicitly.
        if !pending.is_empty() {
            let chord = build_chord(&pending);
            bars.last_mut().expect("bars is never empty").chords.push(chord);
        }

        bars
    }
}
