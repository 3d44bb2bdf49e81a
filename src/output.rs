use serde::Serialize;

use crate::track::{Bar, Part};

/// Drives segmentation across parts and serializes the result.
///
/// Parts are processed strictly in file order: a part that never observes a
/// time signature inherits the numerator the previous part ended with.
pub struct Exporter {
    adjust: bool,
}

impl Exporter {
    pub fn new(adjust: bool) -> Self {
        Self { adjust }
    }

    /// Segment every part, threading the time signature across them.
    fn render_parts(&self, parts: &mut [Part]) -> Vec<(Option<String>, Vec<Bar>)> {
        let mut rendered = Vec::with_capacity(parts.len());
        let mut prev_numerator = 0;

        for (index, part) in parts.iter_mut().enumerate() {
            if index != 0 && part.numerator == 0 {
                part.numerator = prev_numerator;
            }
            let bars = part.segment(self.adjust);
            prev_numerator = part.numerator;
            rendered.push((part.name.clone(), bars));
        }

        rendered
    }

    /// Plain-text tablature: a header line per part, one line per bar,
    /// blank line between parts, no trailing blank lines.
    pub fn export(&self, parts: &mut [Part]) -> String {
        let mut buf = Vec::new();

        for (index, (name, bars)) in self.render_parts(parts).into_iter().enumerate() {
            let header = name.unwrap_or_else(|| format!("({index})"));
            buf.push(format!("{header}:"));

            for bar in bars {
                buf.push(bar.text());
            }

            buf.push(String::new());
        }

        buf.join("\n").trim_matches('\n').to_string()
    }

    /// The same structure rendered as pretty JSON.
    pub fn export_json(&self, parts: &mut [Part]) -> String {
        #[derive(Serialize)]
        struct JsonPart {
            name: Option<String>,
            bars: Vec<Bar>,
        }

        #[derive(Serialize)]
        struct JsonOutput {
            parts: Vec<JsonPart>,
        }

        let output = JsonOutput {
            parts: self
                .render_parts(parts)
                .into_iter()
                .map(|(name, bars)| JsonPart { name, bars })
                .collect(),
        };

        serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
            eprintln!("Error serializing to JSON: {}", e);
            "{}".to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::{merge_tracks, Event, EventKind, MidiData, Track};

    fn note_on(delta: u32, pitch: u8) -> Event {
        Event {
            delta,
            kind: EventKind::NoteOn {
                pitch,
                velocity: 100,
            },
        }
    }

    fn time_signature(delta: u32, numerator: u8) -> Event {
        Event {
            delta,
            kind: EventKind::TimeSignature { numerator },
        }
    }

    fn track(name: Option<&str>, events: Vec<Event>) -> Track {
        Track {
            events,
            name: name.map(str::to_string),
        }
    }

    fn parts_of(midi: &MidiData, merge: bool) -> Vec<Part> {
        let tracks: Vec<Track> = if merge {
            vec![merge_tracks(&midi.tracks)]
        } else {
            midi.tracks.clone()
        };
        tracks
            .into_iter()
            .map(|t| Part::new(t, midi.ticks_per_beat, 0))
            .collect()
    }

    #[test]
    fn text_format_headers_bars_and_separators() {
        let mut parts = vec![
            Part::new(
                track(
                    Some("melody"),
                    vec![time_signature(0, 4), note_on(0, 48), note_on(0, 52)],
                ),
                480,
                0,
            ),
            Part::new(track(None, vec![]), 480, 0),
        ];

        let text = Exporter::new(false).export(&mut parts);
        assert_eq!(text, "melody:\nzc\n\n(1):");
    }

    #[test]
    fn unnamed_parts_fall_back_to_their_index() {
        let mut parts = vec![Part::new(track(None, vec![note_on(0, 60)]), 480, 0)];
        let text = Exporter::new(false).export(&mut parts);
        assert_eq!(text, "(0):\na");
    }

    #[test]
    fn time_signature_carries_over_to_the_next_part() {
        // Only the first part declares 1 beat per bar; the second must
        // inherit it and split at tick 480 as well.
        let mut parts = vec![
            Part::new(
                track(Some("a"), vec![time_signature(0, 1), note_on(0, 48), note_on(480, 50)]),
                480,
                0,
            ),
            Part::new(
                track(Some("b"), vec![note_on(0, 52), note_on(480, 53)]),
                480,
                0,
            ),
        ];

        let text = Exporter::new(false).export(&mut parts);
        assert_eq!(text, "a:\nz\nx\n\nb:\nc\nv");
    }

    #[test]
    fn merge_yields_one_block_no_merge_one_per_track() {
        let midi = MidiData {
            ticks_per_beat: 480,
            tracks: vec![
                track(Some("left"), vec![note_on(0, 48)]),
                track(Some("right"), vec![note_on(0, 60)]),
            ],
        };

        let mut merged = parts_of(&midi, true);
        let text = Exporter::new(false).export(&mut merged);
        assert_eq!(text.matches(':').count(), 1);
        assert_eq!(text, "left:\nza");

        let mut split = parts_of(&midi, false);
        let text = Exporter::new(false).export(&mut split);
        assert_eq!(text, "left:\nz\n\nright:\na");
    }

    #[test]
    fn adjust_flag_reaches_the_segmenter() {
        let mut parts = vec![Part::new(track(None, vec![note_on(0, 36)]), 480, 0)];
        assert_eq!(Exporter::new(false).export(&mut parts), "(0):\n-");

        let mut parts = vec![Part::new(track(None, vec![note_on(0, 36)]), 480, 0)];
        assert_eq!(Exporter::new(true).export(&mut parts), "(0):\nz");
    }

    #[test]
    fn json_export_carries_the_same_bars() {
        let mut parts = vec![Part::new(
            track(Some("melody"), vec![note_on(0, 48), note_on(0, 52)]),
            480,
            0,
        )];

        let json = Exporter::new(false).export_json(&mut parts);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["parts"][0]["name"], "melody");
        assert_eq!(value["parts"][0]["bars"][0]["chords"][0], "zc");
    }
}
