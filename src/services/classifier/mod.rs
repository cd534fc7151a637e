//! Remote label classification of transcript snippets.

use async_trait::async_trait;

use crate::library::TrackId;

pub mod client;

pub use client::HttpClassifier;

/// A classifier answer. `label` is `None` when the service explicitly has
/// nothing to suggest; unknown labels are passed through for the policy to reject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub label: Option<String>,
}

impl Classification {
    pub fn label(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()) }
    }

    pub fn none() -> Self {
        Self { label: None }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("classifier returned status {0}")]
    Status(u16),
    #[error("classifier unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed classifier response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Picks an ambience track for `text`, given what is playing now.
    async fn classify_ambience(
        &self,
        text: &str,
        current: Option<TrackId>,
    ) -> Result<Classification, ClassifyError>;

    /// Picks a one-shot effect for `text`, if any.
    async fn classify_effect(&self, text: &str) -> Result<Classification, ClassifyError>;
}
