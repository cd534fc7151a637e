pub mod backend;
pub mod engine;
pub mod mock_audio;
pub mod trace_audio;

pub use backend::{HandleId, PlaybackBackend, PlaybackError};
pub use engine::AudioEngine;
pub use mock_audio::MockBackend;
pub use trace_audio::TraceBackend;
