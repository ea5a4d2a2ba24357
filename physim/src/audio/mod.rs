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
//! Sounds and notes
//!
//! Sounds are registered with the host up front and then played by id.
//! Assets (audio files, MIDI files, soundfonts) are resolved through an
//! [`AssetResolver`](crate::assets::AssetResolver), so remote files are
//! fetched once.
//!
//! ```
//! use physim::assets::AssetResolver;
//! use physim::audio::NoteSeries;
//! use physim::host::RecordingHost;
//!
//! let mut host = RecordingHost::new();
//! let mut resolver = AssetResolver::new();
//! let mut chime = NoteSeries::new(&["C4", "E4", "G4"], "piano.sf2", &mut host, &mut resolver)?;
//! chime.play_next(&mut host)?;
//! assert_eq!(host.played.len(), 1);
//! # Ok::<(), physim::Error>(())
//! ```

mod notes;
mod sound;

pub use notes::{note_name_to_midi, MidiNote, NoteEvent};
pub use sound::{
    EffectValue, MidiData, MidiInput, MidiSource, NoteSeries, Sound, SoundBuilder, SoundProps,
    SoundSource,
};
