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
//! Services provided by the program embedding the kernel
//!
//! The kernel never opens windows, plays audio or downloads files itself.
//! Those requests go through a [`HostServices`] implementation supplied by
//! the embedding program. [`RecordingHost`] is an in-memory host for tests
//! and headless runs.

use crate::audio::SoundProps;
use crate::error::{Error, Result};
use std::sync::{Arc, Mutex};

/// Identifier of a sound registered with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// Requests the kernel makes of its host
pub trait HostServices {
    /// Write a line to the host's log
    fn log(&mut self, message: &str);

    /// The simulation is done; the host may stop calling into it
    fn finish(&mut self);

    /// Register a sound for later playback
    fn add_sound(&mut self, props: &SoundProps) -> Result<SoundId>;

    /// Start playing a registered sound
    fn play_sound(&mut self, id: SoundId) -> Result<()>;

    /// Download `url` and make it available under `name`
    fn add_fetch_asset(&mut self, name: &str, url: &str) -> Result<()>;

    /// Change the drawing canvas size
    fn resize_canvas(&mut self, width: f64, height: f64);
}

/// Host that records every request in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    /// Lines passed to [`HostServices::log`]
    pub logs: Vec<String>,
    /// Registered sounds; a sound's id is its index
    pub sounds: Vec<SoundProps>,
    /// Ids passed to [`HostServices::play_sound`], in order
    pub played: Vec<SoundId>,
    /// `(name, url)` pairs passed to [`HostServices::add_fetch_asset`]
    pub fetched: Vec<(String, String)>,
    /// Last size passed to [`HostServices::resize_canvas`]
    pub canvas: Option<(f64, f64)>,
    /// Whether [`HostServices::finish`] was called
    pub finished: bool,
    /// When set, `add_fetch_asset` fails for this url
    pub unreachable_url: Option<String>,
}

impl RecordingHost {
    /// Empty host
    pub fn new() -> Self {
        Self::default()
    }
}

impl HostServices for RecordingHost {
    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    fn finish(&mut self) {
        self.finished = true;
    }

    fn add_sound(&mut self, props: &SoundProps) -> Result<SoundId> {
        self.sounds.push(props.clone());
        Ok(SoundId((self.sounds.len() - 1) as u32))
    }

    fn play_sound(&mut self, id: SoundId) -> Result<()> {
        if id.0 as usize >= self.sounds.len() {
            return Err(Error::Host(format!("unknown sound {}", id.0)));
        }
        self.played.push(id);
        Ok(())
    }

    fn add_fetch_asset(&mut self, name: &str, url: &str) -> Result<()> {
        if self.unreachable_url.as_deref() == Some(url) {
            return Err(Error::Host(format!("failed to fetch {url}")));
        }
        self.fetched.push((name.to_string(), url.to_string()));
        Ok(())
    }

    fn resize_canvas(&mut self, width: f64, height: f64) {
        self.canvas = Some((width, height));
    }
}

/// `log` backend that forwards records to a host
pub struct HostLogger<H> {
    host: Arc<Mutex<H>>,
    level: log::LevelFilter,
}

impl<H: HostServices + Send + 'static> HostLogger<H> {
    /// Logger writing records at or above `level` to `host`
    pub fn new(host: Arc<Mutex<H>>, level: log::LevelFilter) -> Self {
        HostLogger { host, level }
    }

    /// Install as the global logger
    ///
    /// # Errors
    ///
    /// Fails when a global logger is already set.
    pub fn init(host: Arc<Mutex<H>>, level: log::LevelFilter) -> Result<()> {
        log::set_boxed_logger(Box::new(Self::new(host, level)))
            .map_err(|e| Error::Host(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl<H: HostServices + Send + 'static> log::Log for HostLogger<H> {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut host) = self.host.lock() {
            host.log(&format!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            ));
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_logger_filters_and_formats() {
        let host = Arc::new(Mutex::new(RecordingHost::new()));
        let logger = HostLogger::new(Arc::clone(&host), log::LevelFilter::Info);

        logger.log(
            &log::Record::builder()
                .level(log::Level::Warn)
                .target("physim::forces")
                .args(format_args!("non-finite {}", 1))
                .build(),
        );
        logger.log(
            &log::Record::builder()
                .level(log::Level::Debug)
                .args(format_args!("hidden"))
                .build(),
        );

        let guard = host.lock().unwrap();
        let logs = &guard.logs;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0], "[WARN physim::forces] non-finite 1");
    }

    #[test]
    fn test_recording_host_rejects_unknown_sound() {
        let mut host = RecordingHost::new();
        let err = host.play_sound(SoundId(3)).unwrap_err();
        assert!(err.is_system());
    }
}
