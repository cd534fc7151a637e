use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;

use super::backend::{HandleId, PlaybackBackend, PlaybackError};

/// Every primitive call the engine made, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Load { handle: HandleId, file_ref: String },
    Play { handle: HandleId, looping: bool },
    SetVolume { handle: HandleId, volume: f32 },
    Fade { handle: HandleId, from: f32, to: f32, duration: Duration },
    Stop(HandleId),
    Unload(HandleId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockHandle {
    pub file_ref: String,
    pub volume: f32,
    pub looping: bool,
    pub playing: bool,
    pub loaded: bool,
}

#[derive(Debug, Default)]
struct MockInner {
    next_id: u64,
    handles: HashMap<HandleId, MockHandle>,
    calls: Vec<BackendCall>,
    failing: HashSet<String>,
    ended: HashMap<HandleId, oneshot::Sender<()>>,
}

/// In-memory backend: no sound, full call history.
///
/// Fades land on their target volume as soon as they are scheduled.
#[derive(Debug, Default)]
pub struct MockBackend {
    inner: Mutex<MockInner>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    pub fn handle(&self, handle: HandleId) -> Option<MockHandle> {
        self.lock().handles.get(&handle).cloned()
    }

    /// Number of `play` calls on handles loaded from `file_ref`.
    pub fn plays_of(&self, file_ref: &str) -> usize {
        let inner = self.lock();
        inner
            .calls
            .iter()
            .filter(|call| match call {
                BackendCall::Play { handle, .. } => inner
                    .handles
                    .get(handle)
                    .is_some_and(|h| h.file_ref == file_ref),
                _ => false,
            })
            .count()
    }

    /// Fades scheduled on `handle`, as (from, to, duration).
    pub fn fades_of(&self, handle: HandleId) -> Vec<(f32, f32, Duration)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::Fade { handle: h, from, to, duration } if *h == handle => {
                    Some((*from, *to, *duration))
                }
                _ => None,
            })
            .collect()
    }

    /// Looping handles that are still loaded and playing.
    pub fn live_loops(&self) -> Vec<HandleId> {
        let mut live: Vec<HandleId> = self
            .lock()
            .handles
            .iter()
            .filter(|(_, h)| h.loaded && h.playing && h.looping)
            .map(|(id, _)| *id)
            .collect();
        live.sort();
        live
    }

    /// Makes every later `load` of `file_ref` fail.
    pub fn fail_loads(&self, file_ref: &str) {
        self.lock().failing.insert(file_ref.to_string());
    }

    /// Simulates natural end of playback. Returns false if nobody was waiting.
    pub fn finish(&self, handle: HandleId) -> bool {
        let mut inner = self.lock();
        if let Some(h) = inner.handles.get_mut(&handle) {
            h.playing = false;
        }
        match inner.ended.remove(&handle) {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }
}

impl PlaybackBackend for MockBackend {
    fn load(&self, file_ref: &str) -> Result<HandleId, PlaybackError> {
        let mut inner = self.lock();
        if inner.failing.contains(file_ref) {
            return Err(PlaybackError::Load {
                file_ref: file_ref.to_string(),
                reason: "mock load failure".to_string(),
            });
        }

        inner.next_id += 1;
        let handle = HandleId(inner.next_id);
        inner.handles.insert(
            handle,
            MockHandle {
                file_ref: file_ref.to_string(),
                volume: 1.0,
                looping: false,
                playing: false,
                loaded: true,
            },
        );
        inner.calls.push(BackendCall::Load { handle, file_ref: file_ref.to_string() });
        tracing::debug!("mock load {} -> {}", file_ref, handle);
        Ok(handle)
    }

    fn play(&self, handle: HandleId, looping: bool) {
        let mut inner = self.lock();
        if let Some(h) = inner.handles.get_mut(&handle) {
            h.looping = looping;
            h.playing = true;
        }
        inner.calls.push(BackendCall::Play { handle, looping });
    }

    fn volume(&self, handle: HandleId) -> f32 {
        self.lock().handles.get(&handle).map_or(0.0, |h| h.volume)
    }

    fn set_volume(&self, handle: HandleId, volume: f32) {
        let mut inner = self.lock();
        if let Some(h) = inner.handles.get_mut(&handle) {
            h.volume = volume;
        }
        inner.calls.push(BackendCall::SetVolume { handle, volume });
    }

    fn fade(&self, handle: HandleId, from: f32, to: f32, duration: Duration) {
        let mut inner = self.lock();
        if let Some(h) = inner.handles.get_mut(&handle) {
            h.volume = to;
        }
        inner.calls.push(BackendCall::Fade { handle, from, to, duration });
    }

    fn stop(&self, handle: HandleId) {
        let mut inner = self.lock();
        if let Some(h) = inner.handles.get_mut(&handle) {
            h.playing = false;
        }
        inner.calls.push(BackendCall::Stop(handle));
    }

    fn unload(&self, handle: HandleId) {
        let mut inner = self.lock();
        if let Some(h) = inner.handles.get_mut(&handle) {
            h.loaded = false;
            h.playing = false;
        }
        inner.ended.remove(&handle);
        inner.calls.push(BackendCall::Unload(handle));
    }

    fn on_ended(&self, handle: HandleId) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().ended.insert(handle, tx);
        rx
    }
}
