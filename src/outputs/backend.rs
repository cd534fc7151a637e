use std::fmt;
use std::time::Duration;

use tokio::sync::oneshot;

/// Opaque reference to a loaded sound, issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("failed to load '{file_ref}': {reason}")]
    Load { file_ref: String, reason: String },
}

/// Primitive playback operations the engine is built on.
///
/// Implementations must be cheap to call from async code: `fade` schedules
/// the ramp and returns immediately.
pub trait PlaybackBackend: Send + Sync {
    fn load(&self, file_ref: &str) -> Result<HandleId, PlaybackError>;
    fn play(&self, handle: HandleId, looping: bool);
    /// Current live volume of the handle, 0.0 if unknown.
    fn volume(&self, handle: HandleId) -> f32;
    fn set_volume(&self, handle: HandleId, volume: f32);
    fn fade(&self, handle: HandleId, from: f32, to: f32, duration: Duration);
    fn stop(&self, handle: HandleId);
    fn unload(&self, handle: HandleId);
    /// Resolves when the handle finishes playing on its own.
    /// The sender is dropped if the handle is unloaded first.
    fn on_ended(&self, handle: HandleId) -> oneshot::Receiver<()>;
}
