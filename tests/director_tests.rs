mod common;

use std::time::Duration;

use common::{director, ScriptedClassifier};
use soundscape::kernel::telemetry::event::LogKind;
use soundscape::library::{EffectId, TrackId};
use soundscape::services::classifier::Classification;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_start_plays_default_ambience_and_runs() {
    let classifier = ScriptedClassifier::new();
    let (director, backend) = director(classifier.clone());

    director.start().await.unwrap();
    assert!(director.is_running().await);
    assert_eq!(director.current_track().await, Some(TrackId::ConteFees));
    assert_eq!(backend.plays_of("sounds/conte-fees.mp3"), 1);

    director.update_transcript("il était une fois un petit renard").await;
    sleep(Duration::from_millis(600)).await;
    assert_eq!(
        classifier.ambience_calls(),
        vec![("il était une fois un petit renard".to_string(), Some(TrackId::ConteFees))]
    );

    director.stop().await;
    assert!(!director.is_running().await);
    assert_eq!(director.current_track().await, None);
    sleep(Duration::from_millis(1200)).await;
    assert!(backend.live_loops().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_restart_forgets_log_and_cooldown() {
    let classifier = ScriptedClassifier::new();
    classifier.push_effect(Ok(Classification::label("tonnerre")));
    classifier.push_effect(Ok(Classification::label("tonnerre")));
    let (director, backend) = director(classifier.clone());

    director.start().await.unwrap();
    director.update_transcript("le tonnerre gronda").await;
    sleep(Duration::from_millis(600)).await;
    assert_eq!(backend.plays_of("sounds/tonnerre.mp3"), 1);
    assert!(!director.logs().await.is_empty());

    director.stop().await;
    director.start().await.unwrap();
    assert!(director.logs().await.is_empty(), "pre-stop entries are gone");

    // Well inside the 8 s window, but the cooldown was reset.
    sleep(Duration::from_millis(600)).await;
    assert_eq!(classifier.effect_calls().len(), 2);
    assert_eq!(backend.plays_of("sounds/tonnerre.mp3"), 2);
    let logs = director.logs().await;
    assert!(logs.iter().all(|e| !e.message.contains("cooldown")));
    assert!(logs.iter().any(|e| e.kind == LogKind::Action && e.message == "effect: tonnerre"));
}

#[tokio::test(start_paused = true)]
async fn test_manual_controls() {
    let classifier = ScriptedClassifier::new();
    let (director, backend) = director(classifier);

    assert!(director.switch_track(TrackId::Cheminee).await.unwrap());
    assert!(!director.switch_track(TrackId::Cheminee).await.unwrap());

    director.trigger_effect(EffectId::SonsMagiques).await.unwrap();
    director.trigger_effect(EffectId::SonsMagiques).await.unwrap();
    assert_eq!(backend.plays_of("sounds/sons-magiques.mp3"), 2, "manual effects skip the cooldown");

    director.set_master_volume(0.2).await;
    assert_eq!(director.master_volume().await, 0.2);
}

#[tokio::test(start_paused = true)]
async fn test_log_subscribers_receive_entries() {
    let classifier = ScriptedClassifier::new();
    let (director, _backend) = director(classifier);
    let mut rx = director.subscribe().await;

    director.start().await.unwrap();
    director.update_transcript("la pluie tombait doucement").await;

    let entry = rx.recv().await.unwrap();
    assert_eq!(entry.kind, LogKind::Request);
    assert!(entry.message.starts_with("[ambience]"));

    sleep(Duration::from_millis(100)).await;
    director.stop().await;
    let summary = director.log_summary().await;
    assert_eq!(summary.requests, 2);
    assert_eq!(summary.responses, 2);
    assert_eq!(summary.errors, 0);
}

#[tokio::test(start_paused = true)]
async fn test_start_without_default_track_still_runs() {
    let classifier = ScriptedClassifier::new();
    let (director, backend) = director(classifier);
    backend.fail_loads("sounds/conte-fees.mp3");

    assert!(director.start().await.is_err());
    assert!(director.is_running().await);
    assert_eq!(director.current_track().await, None);
    director.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_start_on_running_session_keeps_it_as_is() {
    let classifier = ScriptedClassifier::new();
    let (director, backend) = director(classifier);

    director.start().await.unwrap();
    director.switch_track(TrackId::Foret).await.unwrap();
    director.update_transcript("le vent souffle fort").await;
    sleep(Duration::from_millis(600)).await;
    let logged = director.logs().await.len();
    assert!(logged > 0);

    director.start().await.unwrap();
    assert_eq!(director.current_track().await, Some(TrackId::Foret));
    assert_eq!(backend.plays_of("sounds/conte-fees.mp3"), 1);
    assert_eq!(director.logs().await.len(), logged);
    director.stop().await;
}
