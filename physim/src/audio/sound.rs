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
//! Sound registration and playback

use super::notes::{MidiNote, NoteEvent};
use crate::assets::{Asset, AssetResolver};
use crate::error::{Error, Result};
use crate::host::{HostServices, SoundId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the host needs to prepare a sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundProps {
    /// Audio file or MIDI source
    pub src: SoundSource,
    /// Post-processing options, passed to the host verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub effects: BTreeMap<String, EffectValue>,
}

/// Where a sound's samples come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SoundSource {
    /// Host-side name of an audio file
    File(String),
    /// MIDI rendered with a soundfont
    Midi(MidiSource),
}

/// MIDI data plus the soundfont used to render it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiSource {
    /// MIDI file or inline notes
    pub midi: MidiData,
    /// Host-side name of the soundfont
    pub soundfont: String,
}

/// MIDI payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MidiData {
    /// Host-side name of a MIDI file
    File(String),
    /// Notes given inline
    Notes(Vec<MidiNote>),
}

/// Value of a post-processing option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectValue {
    /// Free-form text
    Text(String),
    /// Numeric setting
    Number(f64),
    /// Switch
    Flag(bool),
}

impl From<&str> for EffectValue {
    fn from(value: &str) -> Self {
        EffectValue::Text(value.to_string())
    }
}

impl From<String> for EffectValue {
    fn from(value: String) -> Self {
        EffectValue::Text(value)
    }
}

impl From<f64> for EffectValue {
    fn from(value: f64) -> Self {
        EffectValue::Number(value)
    }
}

impl From<bool> for EffectValue {
    fn from(value: bool) -> Self {
        EffectValue::Flag(value)
    }
}

/// MIDI input accepted by [`SoundBuilder::midi`]
#[derive(Debug, Clone, PartialEq)]
pub enum MidiInput {
    /// A MIDI file
    File(Asset),
    /// Inline notes
    Notes(Vec<NoteEvent>),
}

#[derive(Debug, Clone)]
enum PendingSource {
    File(Asset),
    Midi { midi: MidiInput, font: Asset },
}

/// Builder for [`Sound`]
///
/// Assets are only resolved in [`SoundBuilder::build`]. Setting a source
/// twice keeps the last one.
#[derive(Debug, Clone, Default)]
pub struct SoundBuilder {
    source: Option<PendingSource>,
    effects: BTreeMap<String, EffectValue>,
}

impl SoundBuilder {
    /// Builder with no source and no effects
    pub fn new() -> Self {
        Self::default()
    }

    /// Play an audio file
    pub fn file(mut self, src: impl Into<Asset>) -> Self {
        self.source = Some(PendingSource::File(src.into()));
        self
    }

    /// Render MIDI with `font`
    pub fn midi(mut self, midi: MidiInput, font: impl Into<Asset>) -> Self {
        self.source = Some(PendingSource::Midi {
            midi,
            font: font.into(),
        });
        self
    }

    /// Set a post-processing option, replacing any earlier value for `key`
    pub fn effect(mut self, key: impl Into<String>, value: impl Into<EffectValue>) -> Self {
        self.effects.insert(key.into(), value.into());
        self
    }

    /// Resolve assets and register the sound with the host
    ///
    /// # Errors
    ///
    /// - [`Error::MissingSource`] when no source was set
    /// - [`Error::InvalidNote`] for an unparseable inline note
    /// - any host failure while fetching assets or adding the sound
    pub fn build(self, host: &mut dyn HostServices, resolver: &mut AssetResolver) -> Result<Sound> {
        let src = match self.source.ok_or(Error::MissingSource)? {
            PendingSource::File(asset) => SoundSource::File(resolver.resolve(host, &asset)?),
            PendingSource::Midi { midi, font } => {
                let midi = match midi {
                    MidiInput::File(asset) => MidiData::File(resolver.resolve(host, &asset)?),
                    MidiInput::Notes(events) => MidiData::Notes(
                        events
                            .iter()
                            .map(NoteEvent::to_midi)
                            .collect::<Result<Vec<_>>>()?,
                    ),
                };
                let soundfont = resolver.resolve(host, &font)?;
                SoundSource::Midi(MidiSource { midi, soundfont })
            }
        };

        let props = SoundProps {
            src,
            effects: self.effects,
        };
        let id = host.add_sound(&props)?;
        log::debug!("registered sound {}", id.0);
        Ok(Sound { id })
    }
}

/// A sound registered with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sound {
    id: SoundId,
}

impl Sound {
    /// Register an audio file
    pub fn from_file(
        src: impl Into<Asset>,
        host: &mut dyn HostServices,
        resolver: &mut AssetResolver,
    ) -> Result<Sound> {
        SoundBuilder::new().file(src).build(host, resolver)
    }

    /// Register a single note rendered with `font`
    pub fn from_note(
        note: &str,
        font: impl Into<Asset>,
        host: &mut dyn HostServices,
        resolver: &mut AssetResolver,
    ) -> Result<Sound> {
        SoundBuilder::new()
            .midi(MidiInput::Notes(vec![NoteEvent::new(note)]), font)
            .build(host, resolver)
    }

    /// Host-side id
    pub fn id(&self) -> SoundId {
        self.id
    }

    /// Start playback
    pub fn play(&self, host: &mut dyn HostServices) -> Result<()> {
        host.play_sound(self.id)
    }
}

/// Notes played one after another, looping at the end
#[derive(Debug, Clone)]
pub struct NoteSeries {
    sounds: Vec<Sound>,
    index: usize,
}

impl NoteSeries {
    /// Register one sound per note name
    ///
    /// # Errors
    ///
    /// The first failing note aborts construction.
    pub fn new<S: AsRef<str>>(
        notes: &[S],
        font: impl Into<Asset>,
        host: &mut dyn HostServices,
        resolver: &mut AssetResolver,
    ) -> Result<Self> {
        let font = font.into();
        let sounds = notes
            .iter()
            .map(|note| Sound::from_note(note.as_ref(), font.clone(), host, resolver))
            .collect::<Result<Vec<_>>>()?;
        Ok(NoteSeries { sounds, index: 0 })
    }

    /// Number of notes in the series
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// True when the series has no notes
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Play the next note; an empty series does nothing
    pub fn play_next(&mut self, host: &mut dyn HostServices) -> Result<()> {
        if self.sounds.is_empty() {
            return Ok(());
        }
        if self.index >= self.sounds.len() {
            self.index = 0;
        }
        self.sounds[self.index].play(host)?;
        self.index += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fetch_asset;
    use crate::host::RecordingHost;

    #[test]
    fn test_build_requires_source() {
        let mut host = RecordingHost::new();
        let mut resolver = AssetResolver::new();
        let err = SoundBuilder::new()
            .effect("volume", 0.5)
            .build(&mut host, &mut resolver)
            .unwrap_err();
        assert!(matches!(err, Error::MissingSource));
        assert!(host.sounds.is_empty());
    }

    #[test]
    fn test_file_sound_with_effects() {
        let mut host = RecordingHost::new();
        let mut resolver = AssetResolver::new();
        let sound = SoundBuilder::new()
            .file("hit.wav")
            .effect("volume", 0.5)
            .effect("reverse", true)
            .build(&mut host, &mut resolver)
            .unwrap();

        sound.play(&mut host).unwrap();
        assert_eq!(host.played, vec![sound.id()]);

        let props = &host.sounds[0];
        assert_eq!(props.src, SoundSource::File("hit.wav".to_string()));
        assert_eq!(props.effects["volume"], EffectValue::Number(0.5));
        assert_eq!(props.effects["reverse"], EffectValue::Flag(true));
    }

    #[test]
    fn test_last_source_wins() {
        let mut host = RecordingHost::new();
        let mut resolver = AssetResolver::new();
        SoundBuilder::new()
            .midi(MidiInput::File("song.mid".into()), "font.sf2")
            .file("hit.wav")
            .build(&mut host, &mut resolver)
            .unwrap();
        assert_eq!(host.sounds[0].src, SoundSource::File("hit.wav".to_string()));
    }

    #[test]
    fn test_note_sound_fetches_font_once() {
        let mut host = RecordingHost::new();
        let mut resolver = AssetResolver::new();
        let font = fetch_asset("https://example.com/piano.sf2");

        let mut series =
            NoteSeries::new(&["C4", "E4", "G4"], font, &mut host, &mut resolver).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(host.fetched.len(), 1);

        match &host.sounds[1].src {
            SoundSource::Midi(MidiSource { midi: MidiData::Notes(notes), soundfont }) => {
                assert_eq!(notes[0].note, 64);
                assert_eq!(soundfont, "fetchasset_0");
            }
            other => panic!("unexpected source {other:?}"),
        }

        for _ in 0..4 {
            series.play_next(&mut host).unwrap();
        }
        let played: Vec<u32> = host.played.iter().map(|id| id.0).collect();
        assert_eq!(played, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_bad_note_aborts_series() {
        let mut host = RecordingHost::new();
        let mut resolver = AssetResolver::new();
        let err = NoteSeries::new(&["C4", "Q4"], "font.sf2", &mut host, &mut resolver).unwrap_err();
        assert!(matches!(err, Error::InvalidNote(_)));
    }

    #[test]
    fn test_empty_series_is_silent() {
        let mut host = RecordingHost::new();
        let mut resolver = AssetResolver::new();
        let mut series =
            NoteSeries::new::<&str>(&[], "font.sf2", &mut host, &mut resolver).unwrap();
        assert!(series.is_empty());
        series.play_next(&mut host).unwrap();
        assert!(host.played.is_empty());
    }

    #[test]
    fn test_props_serialize_like_host_expects() {
        let props = SoundProps {
            src: SoundSource::Midi(MidiSource {
                midi: MidiData::File("song.mid".to_string()),
                soundfont: "font.sf2".to_string(),
            }),
            effects: BTreeMap::new(),
        };
        let text = toml::to_string(&props).unwrap();
        assert!(text.contains("midi = \"song.mid\""));
        assert!(!text.contains("effects"));
    }
}
