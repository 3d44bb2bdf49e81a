use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use midi_to_lyre::{merge_tracks, Exporter, MidiData, Part};

#[derive(Parser, Debug)]
#[command(name = "midi-to-lyre")]
#[command(about = "Convert MIDI files to lyre keyboard sequences", long_about = None)]
struct Args {
    /// The MIDI file to transform
    midi_file: PathBuf,

    /// Where to save the keys to (default: stdout)
    #[arg(short, long)]
    save_to: Option<PathBuf>,

    /// Don't merge all tracks into one (not recommended)
    #[arg(short, long)]
    no_merge: bool,

    /// Adjust the octave of notes outside the range to be playable
    #[arg(short, long)]
    adjust: bool,

    /// Semitone shift applied to every note before classification
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    transpose: i32,

    /// Enable debug logs
    #[arg(short, long)]
    debug: bool,

    /// Emit the parts as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if !args.midi_file.exists() {
        anyhow::bail!("MIDI file not found: {}", args.midi_file.display());
    }

    let midi = MidiData::from_file(&args.midi_file)?;
    let ticks_per_beat = midi.ticks_per_beat;

    let tracks = if args.no_merge {
        midi.tracks
    } else {
        vec![merge_tracks(&midi.tracks)]
    };

    let mut parts: Vec<Part> = tracks
        .into_iter()
        .map(|track| Part::new(track, ticks_per_beat, args.transpose))
        .collect();

    let exporter = Exporter::new(args.adjust);
    let output = if args.json {
        exporter.export_json(&mut parts)
    } else {
        exporter.export(&mut parts)
    };

    match args.save_to {
        Some(path) => {
            fs::write(&path, format!("{}\n", output))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
