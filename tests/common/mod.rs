#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use soundscape::config::{AnalyzerConfig, Config, EngineConfig};
use soundscape::kernel::telemetry::event::LogKind;
use soundscape::library::TrackId;
use soundscape::outputs::{AudioEngine, MockBackend};
use soundscape::services::classifier::{Classification, Classifier, ClassifyError};
use soundscape::{Director, StoryAnalyzer, TickOutcome};
use tokio::sync::Semaphore;

type Answer = Result<Classification, ClassifyError>;

/// Classifier double: queued answers, recorded calls, optional gate that
/// holds calls in flight until opened.
pub struct ScriptedClassifier {
    ambience: Mutex<VecDeque<Answer>>,
    effect: Mutex<VecDeque<Answer>>,
    ambience_calls: Mutex<Vec<(String, Option<TrackId>)>>,
    effect_calls: Mutex<Vec<String>>,
    gate: Semaphore,
}

impl ScriptedClassifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::with_permits(Semaphore::MAX_PERMITS))
    }

    /// Every call blocks until `open` releases it.
    pub fn gated() -> Arc<Self> {
        Arc::new(Self::with_permits(0))
    }

    fn with_permits(permits: usize) -> Self {
        Self {
            ambience: Mutex::new(VecDeque::new()),
            effect: Mutex::new(VecDeque::new()),
            ambience_calls: Mutex::new(Vec::new()),
            effect_calls: Mutex::new(Vec::new()),
            gate: Semaphore::new(permits),
        }
    }

    pub fn push_ambience(&self, answer: Answer) {
        self.ambience.lock().unwrap().push_back(answer);
    }

    pub fn push_effect(&self, answer: Answer) {
        self.effect.lock().unwrap().push_back(answer);
    }

    pub fn open(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    pub fn ambience_calls(&self) -> Vec<(String, Option<TrackId>)> {
        self.ambience_calls.lock().unwrap().clone()
    }

    pub fn effect_calls(&self) -> Vec<String> {
        self.effect_calls.lock().unwrap().clone()
    }

    async fn pass_gate(&self) {
        self.gate.acquire().await.unwrap().forget();
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify_ambience(&self, text: &str, current: Option<TrackId>) -> Answer {
        self.ambience_calls.lock().unwrap().push((text.to_string(), current));
        self.pass_gate().await;
        let answer = self.ambience.lock().unwrap().pop_front();
        answer.unwrap_or_else(|| Ok(Classification::none()))
    }

    async fn classify_effect(&self, text: &str) -> Answer {
        self.effect_calls.lock().unwrap().push(text.to_string());
        self.pass_gate().await;
        let answer = self.effect.lock().unwrap().pop_front();
        answer.unwrap_or_else(|| Ok(Classification::none()))
    }
}

pub fn director(classifier: Arc<ScriptedClassifier>) -> (Director, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    let director = Director::new(Config::default(), classifier, backend.clone());
    (director, backend)
}

pub struct AnalyzerRig {
    pub analyzer: StoryAnalyzer,
    pub engine: Arc<tokio::sync::Mutex<AudioEngine>>,
    pub backend: Arc<MockBackend>,
}

pub fn analyzer_with(config: AnalyzerConfig, classifier: Arc<ScriptedClassifier>) -> AnalyzerRig {
    let backend = Arc::new(MockBackend::new());
    let engine = Arc::new(tokio::sync::Mutex::new(AudioEngine::new(
        backend.clone(),
        EngineConfig::default(),
    )));
    let analyzer = StoryAnalyzer::new(config, classifier, engine.clone());
    AnalyzerRig { analyzer, engine, backend }
}

pub fn analyzer(classifier: Arc<ScriptedClassifier>) -> AnalyzerRig {
    analyzer_with(AnalyzerConfig::default(), classifier)
}

/// Ticks once and waits for the spawned cycle to settle.
pub async fn tick_and_settle(analyzer: &StoryAnalyzer) -> (bool, bool) {
    match analyzer.tick().await {
        TickOutcome::Dispatched { ambience, effect, cycle } => {
            cycle.await.unwrap();
            (ambience, effect)
        }
        other => panic!("expected a dispatched cycle, got {other:?}"),
    }
}

pub async fn messages(analyzer: &StoryAnalyzer, kind: LogKind) -> Vec<String> {
    analyzer
        .logs()
        .await
        .into_iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.message)
        .collect()
}
