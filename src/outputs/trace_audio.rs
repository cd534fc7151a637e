use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::debug;

use super::backend::{HandleId, PlaybackBackend, PlaybackError};

#[derive(Debug)]
struct LiveHandle {
    file_ref: String,
    volume: f32,
    ended: Option<oneshot::Sender<()>>,
}

#[derive(Debug, Default)]
struct TraceInner {
    next_id: u64,
    live: HashMap<HandleId, LiveHandle>,
}

/// Deviceless backend for the CLI. Every call is traced and only loaded
/// handles are kept, so memory stays flat over a long session.
///
/// One-shots end as soon as they start.
#[derive(Debug, Default)]
pub struct TraceBackend {
    inner: Mutex<TraceInner>,
}

impl TraceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TraceInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn live_handles(&self) -> usize {
        self.lock().live.len()
    }
}

impl PlaybackBackend for TraceBackend {
    fn load(&self, file_ref: &str) -> Result<HandleId, PlaybackError> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let handle = HandleId(inner.next_id);
        inner.live.insert(
            handle,
            LiveHandle {
                file_ref: file_ref.to_string(),
                volume: 1.0,
                ended: None,
            },
        );
        debug!("load {} -> {}", file_ref, handle);
        Ok(handle)
    }

    fn play(&self, handle: HandleId, looping: bool) {
        let mut inner = self.lock();
        let Some(live) = inner.live.get_mut(&handle) else {
            return;
        };
        debug!("play {} {} (loop: {})", handle, live.file_ref, looping);
        if !looping {
            if let Some(tx) = live.ended.take() {
                let _ = tx.send(());
            }
        }
    }

    fn volume(&self, handle: HandleId) -> f32 {
        self.lock().live.get(&handle).map_or(0.0, |h| h.volume)
    }

    fn set_volume(&self, handle: HandleId, volume: f32) {
        if let Some(live) = self.lock().live.get_mut(&handle) {
            live.volume = volume;
        }
    }

    fn fade(&self, handle: HandleId, from: f32, to: f32, duration: Duration) {
        if let Some(live) = self.lock().live.get_mut(&handle) {
            live.volume = to;
            debug!("fade {} {:.2} -> {:.2} over {:?}", handle, from, to, duration);
        }
    }

    fn stop(&self, handle: HandleId) {
        debug!("stop {}", handle);
    }

    fn unload(&self, handle: HandleId) {
        if let Some(live) = self.lock().live.remove(&handle) {
            debug!("unload {} {}", handle, live.file_ref);
        }
    }

    fn on_ended(&self, handle: HandleId) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        // An unknown handle drops the sender, which the waiter treats as ended.
        if let Some(live) = self.lock().live.get_mut(&handle) {
            live.ended = Some(tx);
        }
        rx
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::EngineConfig;
    use crate::library::{EffectId, TrackId};
    use crate::outputs::AudioEngine;

    #[tokio::test(start_paused = true)]
    async fn test_released_handles_are_forgotten() {
        let backend = Arc::new(TraceBackend::new());
        let mut engine = AudioEngine::new(backend.clone(), EngineConfig::default());

        for _ in 0..20 {
            engine.trigger_effect(EffectId::Tonnerre).unwrap();
        }
        engine.switch_track(TrackId::Foret).unwrap();
        engine.switch_track(TrackId::Mer).unwrap();
        tokio::time::sleep(Duration::from_millis(3200)).await;

        assert_eq!(backend.live_handles(), 1);
        engine.stop_all();
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(backend.live_handles(), 0);
    }

    #[test]
    fn test_operations_on_released_handle_are_ignored() {
        let backend = TraceBackend::new();
        let handle = backend.load("sounds/mer.mp3").unwrap();
        backend.unload(handle);
        backend.set_volume(handle, 0.5);
        backend.play(handle, true);
        assert_eq!(backend.volume(handle), 0.0);
        assert_eq!(backend.live_handles(), 0);
    }
}
