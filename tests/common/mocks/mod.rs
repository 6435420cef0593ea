//! Mock implementations for external dependencies
//! This module contains scripted stand-ins used for integration testing

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serenity::model::id::ChannelId;

use cadence::commands::music::audio_sources::track_metadata::TrackMetadata;
use cadence::commands::music::utils::backend::AudioBackend;
use cadence::commands::music::utils::music_manager::MusicError;
use cadence::commands::music::utils::track_picker::TrackPicker;

/// One backend invocation, as recorded by `FakeBackend`.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Connect(ChannelId),
    Disconnect,
    Play(String),
    Stop,
    SetPause(bool),
    Seek(Duration),
    SetVolume(u16),
}

/// Scripted audio backend that records every call for assertions. Clones
/// share the same log, so tests can keep a handle after the player takes
/// ownership.
#[derive(Clone, Default)]
pub struct FakeBackend {
    log: Arc<Mutex<Vec<Call>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    /// Titles handed to `play`, in order.
    pub fn played(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Play(title) => Some(title),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AudioBackend for FakeBackend {
    async fn connect(&mut self, channel: ChannelId) -> Result<(), MusicError> {
        self.record(Call::Connect(channel));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), MusicError> {
        self.record(Call::Disconnect);
        Ok(())
    }

    async fn play(&mut self, track: &TrackMetadata) -> Result<(), MusicError> {
        self.record(Call::Play(track.title.clone()));
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), MusicError> {
        self.record(Call::Stop);
        Ok(())
    }

    async fn set_pause(&mut self, paused: bool) -> Result<(), MusicError> {
        self.record(Call::SetPause(paused));
        Ok(())
    }

    async fn seek(&mut self, position: Duration) -> Result<(), MusicError> {
        self.record(Call::Seek(position));
        Ok(())
    }

    async fn set_volume(&mut self, volume: u16) -> Result<(), MusicError> {
        self.record(Call::SetVolume(volume));
        Ok(())
    }

    async fn position(&self) -> Result<Duration, MusicError> {
        Ok(Duration::from_secs(30))
    }
}

/// Picker that always answers with the same fixed choice.
pub struct StaticPicker(pub Option<usize>);

#[async_trait]
impl TrackPicker for StaticPicker {
    async fn pick(&self, _candidates: &[TrackMetadata]) -> Option<usize> {
        self.0
    }
}
