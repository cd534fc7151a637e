//! Crossfading playback of one looping ambience track plus any number of
//! one-shot effects.
//!
//! Logical state changes instantly. Only the audible tail of a retired track
//! lags behind: its fade-out and teardown run as detached tasks that nothing
//! waits on.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::library::{EffectId, TrackId};

use super::backend::{HandleId, PlaybackBackend, PlaybackError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveTrack {
    id: TrackId,
    handle: HandleId,
}

pub struct AudioEngine {
    backend: Arc<dyn PlaybackBackend>,
    config: EngineConfig,
    active: Option<ActiveTrack>,
    master_volume: f32,
}

impl AudioEngine {
    pub fn new(backend: Arc<dyn PlaybackBackend>, config: EngineConfig) -> Self {
        let master_volume = config.master_volume.clamp(0.0, 1.0);
        Self {
            backend,
            config,
            active: None,
            master_volume,
        }
    }

    pub fn active_track(&self) -> Option<TrackId> {
        self.active.map(|a| a.id)
    }

    pub fn active_handle(&self) -> Option<HandleId> {
        self.active.map(|a| a.handle)
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Crossfades to `id`. Returns `Ok(false)` if `id` is already the active track.
    ///
    /// The new handle is loaded before the old one is retired, so a failed load
    /// leaves the current track playing.
    pub fn switch_track(&mut self, id: TrackId) -> Result<bool, PlaybackError> {
        if self.active_track() == Some(id) {
            return Ok(false);
        }

        let def = id.def();
        let handle = self.backend.load(def.file_ref)?;

        if let Some(old) = self.active.take() {
            self.retire(old.handle, self.config.crossfade());
        }

        let target = def.volume * self.master_volume;
        self.backend.set_volume(handle, 0.0);
        self.backend.play(handle, true);
        self.backend.fade(handle, 0.0, target, self.config.crossfade());

        self.active = Some(ActiveTrack { id, handle });
        info!("Ambience now {} ({})", id, handle);
        Ok(true)
    }

    /// Plays `id` once. The handle releases itself when playback ends.
    pub fn trigger_effect(&self, id: EffectId) -> Result<HandleId, PlaybackError> {
        let def = id.def();
        let handle = self.backend.load(def.file_ref)?;
        let ended = self.backend.on_ended(handle);

        self.backend.set_volume(handle, def.volume * self.master_volume);
        self.backend.play(handle, false);

        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            // Err means the backend dropped the handle on its own; unload anyway.
            let _ = ended.await;
            backend.unload(handle);
            debug!("Effect {} released ({})", id, handle);
        });

        Ok(handle)
    }

    /// Fades out the active track and returns to idle immediately.
    pub fn stop_all(&mut self) {
        if let Some(old) = self.active.take() {
            self.retire(old.handle, self.config.stop_fade());
            info!("Ambience stopped");
        }
    }

    /// Clamps to 0.0 - 1.0 and rescales the live track without fading.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        if let Some(active) = self.active {
            self.backend
                .set_volume(active.handle, active.id.def().volume * self.master_volume);
        }
    }

    /// Fade to silence, then stop and unload once the grace period has passed.
    fn retire(&self, handle: HandleId, fade: Duration) {
        let current = self.backend.volume(handle);
        self.backend.fade(handle, current, 0.0, fade);

        let backend = Arc::clone(&self.backend);
        let teardown_after = fade + self.config.teardown_grace();
        tokio::spawn(async move {
            tokio::time::sleep(teardown_after).await;
            backend.stop(handle);
            backend.unload(handle);
            debug!("Retired track handle {}", handle);
        });
    }
}
