use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::info;

use crate::config::Config;
use crate::kernel::reactor::StoryAnalyzer;
use crate::kernel::telemetry::event::LogEntry;
use crate::kernel::telemetry::metrics::LogSummary;
use crate::library::{EffectId, TrackId};
use crate::outputs::{AudioEngine, HandleId, PlaybackBackend, PlaybackError};
use crate::services::classifier::Classifier;

/// A storytelling session: the analyzer loop plus the engine it drives,
/// exposed the way a UI uses them.
#[derive(Clone)]
pub struct Director {
    analyzer: StoryAnalyzer,
    engine: Arc<Mutex<AudioEngine>>,
    default_track: TrackId,
}

impl Director {
    pub fn new(
        config: Config,
        classifier: Arc<dyn Classifier>,
        backend: Arc<dyn PlaybackBackend>,
    ) -> Self {
        let default_track = config.engine.default_track;
        let engine = Arc::new(Mutex::new(AudioEngine::new(backend, config.engine)));
        let analyzer = StoryAnalyzer::new(config.analyzer, classifier, Arc::clone(&engine));
        Self {
            analyzer,
            engine,
            default_track,
        }
    }

    pub fn analyzer(&self) -> &StoryAnalyzer {
        &self.analyzer
    }

    /// Fresh log, default ambience, analyzer running. No-op on a running session.
    pub async fn start(&self) -> Result<(), PlaybackError> {
        if self.analyzer.is_running().await {
            return Ok(());
        }
        self.analyzer.clear_log().await;
        let switched = self.engine.lock().await.switch_track(self.default_track);
        self.analyzer.start().await;
        info!("Session started with {}", self.default_track);
        switched.map(|_| ())
    }

    pub async fn stop(&self) {
        self.analyzer.stop().await;
        self.engine.lock().await.stop_all();
        info!("Session stopped");
    }

    pub async fn update_transcript(&self, text: impl Into<String>) {
        self.analyzer.update_transcript(text).await;
    }

    pub async fn is_running(&self) -> bool {
        self.analyzer.is_running().await
    }

    pub async fn current_track(&self) -> Option<TrackId> {
        self.engine.lock().await.active_track()
    }

    pub async fn master_volume(&self) -> f32 {
        self.engine.lock().await.master_volume()
    }

    pub async fn set_master_volume(&self, volume: f32) {
        self.engine.lock().await.set_master_volume(volume);
    }

    /// Manual ambience pick. Returns false if it was already playing.
    pub async fn switch_track(&self, id: TrackId) -> Result<bool, PlaybackError> {
        self.engine.lock().await.switch_track(id)
    }

    /// Manual effect. Not subject to the analyzer cooldown.
    pub async fn trigger_effect(&self, id: EffectId) -> Result<HandleId, PlaybackError> {
        self.engine.lock().await.trigger_effect(id)
    }

    pub async fn logs(&self) -> Vec<LogEntry> {
        self.analyzer.logs().await
    }

    pub async fn clear_log(&self) {
        self.analyzer.clear_log().await;
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.analyzer.subscribe().await
    }

    pub async fn log_summary(&self) -> LogSummary {
        self.analyzer.log_summary().await
    }
}
