use anyhow::{Context, Result};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::path::Path;

/// A decoded track event. Deltas are cumulative ticks since the previous
/// event on the same track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub delta: u32,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn { pitch: u8, velocity: u8 },
    NoteOff { pitch: u8 },
    TimeSignature { numerator: u8 },
    Other,
}

impl Event {
    /// Only note-on events with nonzero velocity start a note; a note-on
    /// with velocity 0 is a disguised note-off.
    pub fn is_start(&self) -> bool {
        matches!(self.kind, EventKind::NoteOn { velocity, .. } if velocity != 0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Track {
    pub events: Vec<Event>,
    pub name: Option<String>,
}

/// A decoded MIDI file: the core never touches raw bytes past this point.
#[derive(Debug, Clone)]
pub struct MidiData {
    pub ticks_per_beat: u32,
    pub tracks: Vec<Track>,
}

impl MidiData {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read MIDI file: {}", path.display()))?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let smf = Smf::parse(data).context("Failed to parse MIDI file")?;

        let ticks_per_beat = match smf.header.timing {
            Timing::Metrical(tpb) => tpb.as_int() as u32,
            Timing::Timecode(fps, subframe) => {
                // Convert timecode to ticks per beat approximation
                (fps.as_f32() * subframe as f32 * 4.0) as u32
            }
        };

        let tracks = smf.tracks.iter().map(|track| decode_track(track)).collect();

        Ok(MidiData {
            ticks_per_beat,
            tracks,
        })
    }
}

fn decode_track(track: &[midly::TrackEvent]) -> Track {
    let mut events = Vec::with_capacity(track.len());
    let mut name: Option<String> = None;

    for event in track {
        let kind = match event.kind {
            TrackEventKind::Midi { message, .. } => match message {
                MidiMessage::NoteOn { key, vel } => EventKind::NoteOn {
                    pitch: key.as_int(),
                    velocity: vel.as_int(),
                },
                MidiMessage::NoteOff { key, .. } => EventKind::NoteOff {
                    pitch: key.as_int(),
                },
                _ => EventKind::Other,
            },
            TrackEventKind::Meta(MetaMessage::TimeSignature(numerator, ..)) => {
                EventKind::TimeSignature { numerator }
            }
            TrackEventKind::Meta(MetaMessage::TrackName(raw)) => {
                if name.is_none() {
                    if let Ok(text) = std::str::from_utf8(raw) {
                        // Trim null bytes and surrounding whitespace
                        let cleaned = text.trim_end_matches('\0').trim();
                        if !cleaned.is_empty() {
                            name = Some(cleaned.to_string());
                        }
                    }
                }
                EventKind::Other
            }
            _ => EventKind::Other,
        };

        events.push(Event {
            delta: event.delta.as_int(),
            kind,
        });
    }

    Track { events, name }
}

/// Flatten all tracks into one chronologically interleaved stream.
///
/// The stable sort keeps simultaneous cross-track events in track order,
/// then in-track order. Deltas are recomputed against the merged timeline.
/// The merged track takes the first track name seen in file order.
pub fn merge_tracks(tracks: &[Track]) -> Track {
    let mut timed: Vec<(u64, Event)> = Vec::new();
    for track in tracks {
        let mut clock = 0u64;
        for event in &track.events {
            clock += event.delta as u64;
            timed.push((clock, *event));
        }
    }
    timed.sort_by_key(|&(at, _)| at);

    let mut events = Vec::with_capacity(timed.len());
    let mut prev = 0u64;
    for (at, mut event) in timed {
        event.delta = (at - prev) as u32;
        prev = at;
        events.push(event);
    }

    Track {
        events,
        name: tracks.iter().find_map(|t| t.name.clone()),
    }
}
