use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use soundscape::config::Config;
use soundscape::outputs::TraceBackend;
use soundscape::services::classifier::HttpClassifier;
use soundscape::transcript::TranscriptAccumulator;
use soundscape::Director;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Config::load(&path).with_context(|| format!("loading {path:?}"))?,
        None => Config::default(),
    };

    let classifier = HttpClassifier::new(&config.classifier).context("building classifier client")?;
    tracing::info!("Classifier at {}", config.classifier.base_url);

    let poll_interval = config.analyzer.poll_interval();
    let director = Director::new(config, Arc::new(classifier), Arc::new(TraceBackend::new()));

    // Journal printer
    let mut entries = director.subscribe().await;
    let printer = tokio::spawn(async move {
        loop {
            match entries.recv().await {
                Ok(entry) => println!("{entry}"),
                Err(RecvError::Lagged(skipped)) => println!("... {skipped} log entries skipped"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    if let Err(e) = director.start().await {
        tracing::warn!("Default ambience unavailable: {}", e);
    }
    tracing::info!("Listening. One line per spoken segment, Ctrl+D to finish.");

    let mut transcript = TranscriptAccumulator::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let interrupted = loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    transcript.commit(&line);
                    director.update_transcript(transcript.render("")).await;
                }
                None => break false,
            },
            _ = tokio::signal::ctrl_c() => break true,
        }
    };

    if !interrupted {
        // Let the last segment get classified before tearing down.
        tokio::time::sleep(poll_interval * 2).await;
        while director.analyzer().is_in_flight().await {
            tokio::time::sleep(poll_interval).await;
        }
    }

    director.stop().await;
    let summary = director.log_summary().await;
    printer.abort();
    println!(
        "requests: {}  responses: {}  actions: {}  errors: {}",
        summary.requests, summary.responses, summary.actions, summary.errors
    );
    Ok(())
}
