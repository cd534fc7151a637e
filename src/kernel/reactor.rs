use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::AnalyzerConfig;
use crate::library::TrackId;
use crate::outputs::AudioEngine;
use crate::services::classifier::{Classification, Classifier, ClassifyError};

use super::context::{plan_dispatch, ContextWindow, DispatchPlan};
use super::policy::{decide_ambience, decide_effect, AmbienceDecision, EffectDecision};
use super::state::AnalyzerState;
use super::telemetry::event::{LogEntry, LogKind};
use super::telemetry::metrics::LogSummary;
use super::telemetry::recorder::LogRecorder;

const PREVIEW_CHARS: usize = 60;

/// What a single `tick` did.
#[derive(Debug)]
pub enum TickOutcome {
    /// A previous cycle is still unresolved.
    InFlight,
    /// Neither context changed enough to be worth a request.
    Unchanged,
    /// A cycle was spawned. `cycle` completes once both branches settled.
    Dispatched {
        ambience: bool,
        effect: bool,
        cycle: JoinHandle<()>,
    },
}

impl TickOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, TickOutcome::Dispatched { .. })
    }
}

struct Ticker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

struct Shared {
    config: AnalyzerConfig,
    classifier: Arc<dyn Classifier>,
    engine: Arc<Mutex<AudioEngine>>,
    state: Mutex<AnalyzerState>,
    journal: Mutex<LogRecorder>,
    ticker: Mutex<Option<Ticker>>,
    cycles: TaskTracker,
}

/// Polls the transcript, asks the classifier when the context moved, and
/// turns answers into soundscape changes.
///
/// Cycles are single-flight: a tick while one is outstanding does nothing,
/// and the next tick after settlement picks up the latest transcript.
#[derive(Clone)]
pub struct StoryAnalyzer {
    shared: Arc<Shared>,
}

impl StoryAnalyzer {
    pub fn new(
        config: AnalyzerConfig,
        classifier: Arc<dyn Classifier>,
        engine: Arc<Mutex<AudioEngine>>,
    ) -> Self {
        let journal = LogRecorder::new(config.log_capacity);
        Self {
            shared: Arc::new(Shared {
                config,
                classifier,
                engine,
                state: Mutex::new(AnalyzerState::new()),
                journal: Mutex::new(journal),
                ticker: Mutex::new(None),
                cycles: TaskTracker::new(),
            }),
        }
    }

    /// Replaces the transcript wholesale. It may shrink or restart.
    pub async fn update_transcript(&self, text: impl Into<String>) {
        self.shared.state.lock().await.transcript = text.into();
    }

    /// Starts the polling cadence. No-op if already running.
    pub async fn start(&self) {
        let mut ticker = self.shared.ticker.lock().await;
        if ticker.is_some() {
            return;
        }

        let token = CancellationToken::new();
        let analyzer = self.clone();
        let cancelled = token.clone();
        let period = self.shared.config.poll_interval();

        let handle = tokio::spawn(async move {
            let mut cadence = interval(period);
            cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = cadence.tick() => {
                        analyzer.tick().await;
                    }
                }
            }
            debug!("Analyzer cadence stopped");
        });

        *ticker = Some(Ticker { token, handle });
        info!("Story analyzer started. Poll: {:?}", period);
    }

    /// Stops the cadence and clears all bookkeeping so the next `start`
    /// begins from a clean slate. Scheduled fade teardowns are left alone.
    ///
    /// Returns once the ticker and every dispatched cycle have finished, so no
    /// classifier call or soundscape change happens after it.
    pub async fn stop(&self) {
        let ticker = self.shared.ticker.lock().await.take();
        if let Some(Ticker { token, handle }) = ticker {
            token.cancel();
            handle.abort();
            if let Err(e) = handle.await {
                if e.is_panic() {
                    warn!("Analyzer cadence panicked: {}", e);
                }
            }
        }

        self.shared.state.lock().await.reset();

        let cycles = &self.shared.cycles;
        cycles.close();
        cycles.wait().await;
        cycles.reopen();
        info!("Story analyzer stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.shared.ticker.lock().await.is_some()
    }

    pub async fn is_in_flight(&self) -> bool {
        self.shared.state.lock().await.in_flight
    }

    pub async fn logs(&self) -> Vec<LogEntry> {
        self.shared.journal.lock().await.entries()
    }

    pub async fn clear_log(&self) {
        self.shared.journal.lock().await.clear();
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.shared.journal.lock().await.subscribe()
    }

    pub async fn log_summary(&self) -> LogSummary {
        self.shared.journal.lock().await.summary()
    }

    /// One evaluation of the transcript. Spawns a request cycle if a context
    /// changed and no cycle is outstanding.
    pub async fn tick(&self) -> TickOutcome {
        let hint = self.shared.engine.lock().await.active_track();

        let mut state = self.shared.state.lock().await;
        if state.in_flight {
            return TickOutcome::InFlight;
        }

        let window = ContextWindow::extract(&state.transcript, &self.shared.config);
        let plan = plan_dispatch(&window, &state, &self.shared.config);
        if plan.is_empty() {
            return TickOutcome::Unchanged;
        }

        // Marked as sent before the answers return.
        state.in_flight = true;
        if let Some(context) = &plan.ambience {
            state.last_sent_ambience = context.clone();
        }
        if let Some(context) = &plan.effect {
            state.last_sent_effect = context.clone();
        }

        {
            let mut journal = self.shared.journal.lock().await;
            if let Some(context) = &plan.ambience {
                let current = hint.map_or("—", TrackId::as_str);
                journal.record(
                    LogKind::Request,
                    format!("[ambience] \"{}\"  (current: {})", preview(context), current),
                );
            }
            if let Some(context) = &plan.effect {
                journal.record(LogKind::Request, format!("[effect]   \"{}\"", context));
            }
        }

        let ambience = plan.ambience.is_some();
        let effect = plan.effect.is_some();
        let epoch = state.epoch;
        let span = info_span!("cycle", id = %Uuid::new_v4(), epoch);
        // The cycle blocks on this lock before it can touch any state.
        let cycle = self.shared.cycles.spawn(
            Arc::clone(&self.shared)
                .run_cycle(plan, epoch, hint)
                .instrument(span),
        );
        state.cycle = Some(cycle.abort_handle());

        TickOutcome::Dispatched { ambience, effect, cycle }
    }
}

impl Shared {
    async fn run_cycle(self: Arc<Self>, plan: DispatchPlan, epoch: u64, hint: Option<TrackId>) {
        let ambience_branch = async {
            if let Some(context) = plan.ambience.as_deref() {
                let result = self.classifier.classify_ambience(context, hint).await;
                self.settle_ambience(epoch, result).await;
            }
        };
        let effect_branch = async {
            if let Some(context) = plan.effect.as_deref() {
                let result = self.classifier.classify_effect(context).await;
                self.settle_effect(epoch, result).await;
            }
        };
        tokio::join!(ambience_branch, effect_branch);

        let mut state = self.state.lock().await;
        if state.epoch == epoch {
            state.in_flight = false;
            state.cycle = None;
        }
    }

    async fn is_current(&self, epoch: u64) -> bool {
        let current = self.state.lock().await.epoch == epoch;
        if !current {
            debug!("Discarded stale classifier answer from epoch {}", epoch);
        }
        current
    }

    async fn record(&self, kind: LogKind, message: impl Into<String>) {
        self.journal.lock().await.record(kind, message);
    }

    async fn settle_ambience(&self, epoch: u64, result: Result<Classification, ClassifyError>) {
        if !self.is_current(epoch).await {
            return;
        }

        let classification = match result {
            Ok(classification) => classification,
            Err(e) => {
                self.record(LogKind::Error, format!("ambience classifier: {}", e)).await;
                return;
            }
        };
        let label = classification.label.as_deref();
        self.record(LogKind::Response, format!("[ambience] {}", label.unwrap_or("(empty)")))
            .await;

        let mut engine = self.engine.lock().await;
        match decide_ambience(label, engine.active_track()) {
            AmbienceDecision::Switch(id) => {
                self.record(LogKind::Action, format!("ambience → {}", id)).await;
                if let Err(e) = engine.switch_track(id) {
                    self.record(LogKind::Error, format!("ambience {}: {}", id, e)).await;
                }
            }
            AmbienceDecision::AlreadyPlaying(id) => {
                self.record(LogKind::Info, format!("ambience unchanged: {} already playing", id))
                    .await;
            }
            AmbienceDecision::Rejected => {}
        }
    }

    async fn settle_effect(&self, epoch: u64, result: Result<Classification, ClassifyError>) {
        if !self.is_current(epoch).await {
            return;
        }

        let classification = match result {
            Ok(classification) => classification,
            Err(e) => {
                self.record(LogKind::Error, format!("effect classifier: {}", e)).await;
                return;
            }
        };
        let label = classification.label.as_deref();
        self.record(LogKind::Response, format!("[effect]   {}", label.unwrap_or("(empty)")))
            .await;

        let now = Instant::now();
        let decision = {
            let state = self.state.lock().await;
            decide_effect(label, &state.cooldown, now, self.config.effect_cooldown())
        };

        match decision {
            EffectDecision::Fire(id) => {
                self.record(LogKind::Action, format!("effect: {}", id)).await;
                let fired = self.engine.lock().await.trigger_effect(id);
                match fired {
                    Ok(_) => {
                        let mut state = self.state.lock().await;
                        if state.epoch == epoch {
                            state.cooldown.record(id, now);
                        }
                    }
                    Err(e) => self.record(LogKind::Error, format!("effect {}: {}", id, e)).await,
                }
            }
            EffectDecision::Cooldown(id) => {
                self.record(LogKind::Info, format!("effect ignored (cooldown): {}", id)).await;
            }
            EffectDecision::Rejected => {}
        }
    }
}

fn preview(context: &str) -> String {
    if context.chars().count() > PREVIEW_CHARS {
        format!("…{}", super::context::char_tail(context, PREVIEW_CHARS))
    } else {
        context.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_keeps_tail() {
        assert_eq!(preview("court"), "court");
        let long = "a".repeat(40) + &"b".repeat(60);
        assert_eq!(preview(&long), format!("…{}", "b".repeat(60)));
    }
}
