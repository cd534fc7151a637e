use crate::config::AnalyzerConfig;

use super::state::AnalyzerState;

/// The two snippets derived from the transcript on each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    /// Long character tail, for the narrative setting.
    pub ambience: String,
    /// Last few words, for immediate events.
    pub effect: String,
    pub token_count: usize,
}

impl ContextWindow {
    pub fn extract(transcript: &str, config: &AnalyzerConfig) -> Self {
        let tokens: Vec<&str> = transcript.split_whitespace().collect();
        let first = tokens.len().saturating_sub(config.effect_window_tokens);

        Self {
            ambience: char_tail(transcript, config.ambience_window_chars).to_string(),
            effect: tokens[first..].join(" "),
            token_count: tokens.len(),
        }
    }
}

/// Last `n` characters of `text`, on a char boundary.
pub fn char_tail(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}

/// Contexts worth sending this tick. `None` means the branch is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchPlan {
    pub ambience: Option<String>,
    pub effect: Option<String>,
}

impl DispatchPlan {
    pub fn is_empty(&self) -> bool {
        self.ambience.is_none() && self.effect.is_none()
    }
}

/// Change detection against the contexts last submitted to the classifier.
pub fn plan_dispatch(
    window: &ContextWindow,
    state: &AnalyzerState,
    config: &AnalyzerConfig,
) -> DispatchPlan {
    let ambience_changed = window.ambience != state.last_sent_ambience
        && window.ambience.trim().chars().count() >= config.min_ambience_chars;
    let effect_changed =
        window.effect != state.last_sent_effect && window.token_count >= config.min_effect_tokens;

    DispatchPlan {
        ambience: ambience_changed.then(|| window.ambience.clone()),
        effect: effect_changed.then(|| window.effect.clone()),
    }
}
