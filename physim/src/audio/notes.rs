// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Note names and MIDI conversion

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Convert a note name such as `"C4"`, `"A#3"` or `"Eb-1"` to a MIDI number
///
/// The name is a pitch class `A`..`G`, an optional `#` or `b`, and a
/// signed octave. `C4` is 60.
///
/// # Errors
///
/// [`Error::InvalidNote`] for a malformed name or a result outside
/// `0..=127`.
pub fn note_name_to_midi(note: &str) -> Result<u8> {
    let invalid = || Error::InvalidNote(format!("invalid note format: {note}"));

    let split = match note.as_bytes().get(1) {
        Some(b'#') | Some(b'b') => 2,
        _ => 1,
    };
    if note.len() < split || !note.is_char_boundary(split) {
        return Err(invalid());
    }
    let (name, octave) = note.split_at(split);
    let pitch = pitch_class(name).ok_or_else(invalid)?;

    let digits = octave.strip_prefix('-').unwrap_or(octave);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let octave: i32 = octave.parse().map_err(|_| invalid())?;

    (octave + 1)
        .checked_mul(12)
        .and_then(|m| m.checked_add(pitch))
        .filter(|m| (0..=127).contains(m))
        .map(|m| m as u8)
        .ok_or_else(|| Error::InvalidNote(format!("MIDI note out of range: {note}")))
}

fn pitch_class(name: &str) -> Option<i32> {
    let pitch = match name {
        "C" => 0,
        "C#" | "Db" => 1,
        "D" => 2,
        "D#" | "Eb" => 3,
        "E" => 4,
        "F" => 5,
        "F#" | "Gb" => 6,
        "G" => 7,
        "G#" | "Ab" => 8,
        "A" => 9,
        "A#" | "Bb" => 10,
        "B" => 11,
        _ => return None,
    };
    Some(pitch)
}

/// A note to play, in musical terms
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    /// Start time in seconds
    pub time: f64,
    /// Length in seconds
    pub duration: f64,
    /// Note name, e.g. `"C4"`
    pub note: String,
    /// Loudness between 0 and 1
    pub velocity: f64,
    /// MIDI channel, 0..=15
    pub channel: u8,
}

impl NoteEvent {
    /// `note` at time 0, lasting half a second, velocity 0.9 on channel 0
    pub fn new(note: impl Into<String>) -> Self {
        NoteEvent {
            time: 0.0,
            duration: 0.5,
            note: note.into(),
            velocity: 0.9,
            channel: 0,
        }
    }

    /// The same note in MIDI terms
    pub fn to_midi(&self) -> Result<MidiNote> {
        Ok(MidiNote {
            time: self.time,
            note: note_name_to_midi(&self.note)?,
            velocity: self.velocity * 127.0,
            duration: self.duration,
            channel: self.channel,
        })
    }
}

/// A note in the form the host's synthesizer consumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MidiNote {
    /// Start time in seconds
    pub time: f64,
    /// MIDI note number, 0..=127
    pub note: u8,
    /// MIDI velocity, 0..=127
    pub velocity: f64,
    /// Length in seconds
    pub duration: f64,
    /// MIDI channel, 0..=15
    pub channel: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_note_names() {
        assert_eq!(note_name_to_midi("C4").unwrap(), 60);
        assert_eq!(note_name_to_midi("A4").unwrap(), 69);
        assert_eq!(note_name_to_midi("C#4").unwrap(), 61);
        assert_eq!(note_name_to_midi("Db4").unwrap(), 61);
        assert_eq!(note_name_to_midi("Bb3").unwrap(), 58);
        assert_eq!(note_name_to_midi("C-1").unwrap(), 0);
        assert_eq!(note_name_to_midi("G9").unwrap(), 127);
    }

    #[test]
    fn test_invalid_notes() {
        for bad in ["", "H4", "C", "c4", "C#", "C4.5", "G#9", "C-2", "Cb4", "E#4", "C##4"] {
            let err = note_name_to_midi(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidNote(_)), "{bad} gave {err:?}");
        }
    }

    #[test]
    fn test_event_defaults_and_conversion() {
        let midi = NoteEvent::new("A4").to_midi().unwrap();
        assert_eq!(midi.note, 69);
        assert_eq!(midi.time, 0.0);
        assert_eq!(midi.duration, 0.5);
        assert_eq!(midi.channel, 0);
        assert_relative_eq!(midi.velocity, 0.9 * 127.0);
    }
}
