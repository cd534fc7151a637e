use std::time::Duration;

/// Analyzer cadence.
pub const POLL_INTERVAL_MS: u64 = 500;

/// Crossfade between two ambience tracks.
pub const CROSSFADE_MS: u64 = 3000;

/// Fade-out applied by `stop_all`.
pub const STOP_FADE_MS: u64 = 1000;

/// Extra delay between the end of a fade-out and the stop/unload of its handle.
pub const TEARDOWN_GRACE_MS: u64 = 100;

/// Same-effect retrigger window.
pub const EFFECT_COOLDOWN_MS: u64 = 8000;

pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
