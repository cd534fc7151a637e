use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::Instant;

use crate::library::EffectId;

/// Last effect actually fired, for the same-effect retrigger window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectCooldown {
    last: Option<(EffectId, Instant)>,
}

impl EffectCooldown {
    /// True if `id` fired less than `window` ago. Keyed on the effect only.
    pub fn is_cooling(&self, id: EffectId, now: Instant, window: Duration) -> bool {
        match self.last {
            Some((last_id, at)) => last_id == id && now.saturating_duration_since(at) < window,
            None => false,
        }
    }

    pub fn record(&mut self, id: EffectId, at: Instant) {
        self.last = Some((id, at));
    }

    pub fn last_fired(&self) -> Option<EffectId> {
        self.last.map(|(id, _)| id)
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// Everything the analyzer loop owns. Mutated only by the loop and its cycles.
#[derive(Debug, Default)]
pub struct AnalyzerState {
    /// Latest full transcript, replaced wholesale on every update.
    pub transcript: String,
    pub last_sent_ambience: String,
    pub last_sent_effect: String,
    pub cooldown: EffectCooldown,
    /// Single-flight guard: set from dispatch until both branches settle.
    pub in_flight: bool,
    /// Bumped on every stop. Cycles from an older epoch are discarded.
    pub epoch: u64,
    pub(crate) cycle: Option<AbortHandle>,
}

impl AnalyzerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears bookkeeping and invalidates any outstanding cycle.
    /// The transcript is kept; the transcript source stays authoritative for it.
    pub fn reset(&mut self) {
        if let Some(cycle) = self.cycle.take() {
            cycle.abort();
        }
        self.in_flight = false;
        self.last_sent_ambience.clear();
        self.last_sent_effect.clear();
        self.cooldown.clear();
        self.epoch += 1;
    }
}
