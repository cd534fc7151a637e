use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::library::TrackId;

use super::{Classification, Classifier, ClassifyError};

/// Effect answers that mean "nothing to play".
const EFFECT_SENTINELS: [&str; 2] = ["rien", "none"];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AmbienceRequest<'a> {
    transcript: &'a str,
    current_music: Option<TrackId>,
}

#[derive(Serialize)]
struct EffectRequest<'a> {
    transcript: &'a str,
}

#[derive(Deserialize)]
struct AmbienceResponse {
    music: Option<String>,
}

#[derive(Deserialize)]
struct EffectResponse {
    son: Option<String>,
}

/// Talks to the `/api/music` and `/api/sound` classification endpoints.
#[derive(Clone)]
pub struct HttpClassifier {
    client: Client,
    base_url: String,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ClassifyError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassifyError::Status(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify_ambience(
        &self,
        text: &str,
        current: Option<TrackId>,
    ) -> Result<Classification, ClassifyError> {
        let body = self
            .post("/api/music", &AmbienceRequest { transcript: text, current_music: current })
            .await?;
        parse_ambience(&body)
    }

    async fn classify_effect(&self, text: &str) -> Result<Classification, ClassifyError> {
        let body = self.post("/api/sound", &EffectRequest { transcript: text }).await?;
        parse_effect(&body)
    }
}

fn parse_ambience(body: &str) -> Result<Classification, ClassifyError> {
    let parsed: AmbienceResponse =
        serde_json::from_str(body).map_err(|e| ClassifyError::Malformed(e.to_string()))?;
    Ok(Classification { label: parsed.music.as_deref().and_then(normalize_label) })
}

fn parse_effect(body: &str) -> Result<Classification, ClassifyError> {
    let parsed: EffectResponse =
        serde_json::from_str(body).map_err(|e| ClassifyError::Malformed(e.to_string()))?;
    let label = parsed
        .son
        .as_deref()
        .and_then(normalize_label)
        .filter(|l| !EFFECT_SENTINELS.contains(&l.as_str()));
    Ok(Classification { label })
}

/// First word of a free-form model answer, lowercased.
pub fn normalize_label(raw: &str) -> Option<String> {
    raw.trim()
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '"' | '\'' | '→'))
        .find(|token| !token.is_empty())
        .map(str::to_lowercase)
}
