//! Turns a classifier label into a playback decision.
//!
//! Pure projection: label + current context -> decision. The reactor applies
//! the decision to the audio engine and the journal.

use std::time::Duration;

use tokio::time::Instant;

use crate::library::{EffectId, TrackId};

use super::state::EffectCooldown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbienceDecision {
    Switch(TrackId),
    /// Valid label, but that track is already playing.
    AlreadyPlaying(TrackId),
    /// No label, or a label outside the track vocabulary.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectDecision {
    Fire(EffectId),
    /// Same effect fired within the cooldown window.
    Cooldown(EffectId),
    Rejected,
}

pub fn decide_ambience(label: Option<&str>, active: Option<TrackId>) -> AmbienceDecision {
    let Some(id) = label.and_then(|l| l.parse::<TrackId>().ok()) else {
        return AmbienceDecision::Rejected;
    };

    if active == Some(id) {
        AmbienceDecision::AlreadyPlaying(id)
    } else {
        AmbienceDecision::Switch(id)
    }
}

pub fn decide_effect(
    label: Option<&str>,
    cooldown: &EffectCooldown,
    now: Instant,
    window: Duration,
) -> EffectDecision {
    let Some(id) = label.and_then(|l| l.parse::<EffectId>().ok()) else {
        return EffectDecision::Rejected;
    };

    if cooldown.is_cooling(id, now, window) {
        EffectDecision::Cooldown(id)
    } else {
        EffectDecision::Fire(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(8000);

    #[test]
    fn test_ambience_decisions() {
        assert_eq!(
            decide_ambience(Some("foret"), Some(TrackId::ConteFees)),
            AmbienceDecision::Switch(TrackId::Foret)
        );
        assert_eq!(decide_ambience(Some("mer"), None), AmbienceDecision::Switch(TrackId::Mer));
        assert_eq!(
            decide_ambience(Some("foret"), Some(TrackId::Foret)),
            AmbienceDecision::AlreadyPlaying(TrackId::Foret)
        );
        assert_eq!(decide_ambience(Some("xyz-unknown"), None), AmbienceDecision::Rejected);
        assert_eq!(decide_ambience(None, Some(TrackId::Nuit)), AmbienceDecision::Rejected);
        // Effect ids are not ambience.
        assert_eq!(decide_ambience(Some("tonnerre"), None), AmbienceDecision::Rejected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_decisions() {
        let now = Instant::now();
        let mut cooldown = EffectCooldown::default();

        assert_eq!(decide_effect(Some("tonnerre"), &cooldown, now, WINDOW), EffectDecision::Fire(EffectId::Tonnerre));
        assert_eq!(decide_effect(Some("rien"), &cooldown, now, WINDOW), EffectDecision::Rejected);
        assert_eq!(decide_effect(None, &cooldown, now, WINDOW), EffectDecision::Rejected);
        assert_eq!(decide_effect(Some("foret"), &cooldown, now, WINDOW), EffectDecision::Rejected);

        cooldown.record(EffectId::Tonnerre, now);
        let later = now + Duration::from_millis(3000);
        assert_eq!(
            decide_effect(Some("tonnerre"), &cooldown, later, WINDOW),
            EffectDecision::Cooldown(EffectId::Tonnerre)
        );
        assert_eq!(
            decide_effect(Some("cloches"), &cooldown, later, WINDOW),
            EffectDecision::Fire(EffectId::Cloches)
        );
        assert_eq!(
            decide_effect(Some("tonnerre"), &cooldown, now + Duration::from_millis(9000), WINDOW),
            EffectDecision::Fire(EffectId::Tonnerre)
        );
    }
}
