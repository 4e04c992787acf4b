//! Ollama HTTP client and analysis prompt.

use crate::error::{EnrichError, EnrichResult};
use crate::types::{AnalysisPayload, GenerateOptions, GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use chrono::NaiveDate;
use quorum_config::OllamaConfig;
use quorum_core::{DateConfidence, EnrichmentAnalysis, Enricher};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Document text beyond this is not sent to the model.
const MAX_PROMPT_CHARS: usize = 6000;

/// Client for interacting with Ollama's API.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    host: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a new client from configuration.
    pub fn from_config(config: &OllamaConfig) -> EnrichResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EnrichError::Http)?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout,
        })
    }

    /// Check if the Ollama server is available.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.host);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Generate text (non-streaming).
    pub async fn generate(&self, request: GenerateRequest) -> EnrichResult<GenerateResponse> {
        let url = format!("{}/api/generate", self.host);
        debug!("Generating with model {}", request.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    EnrichError::ServerNotRunning {
                        host: self.host.clone(),
                    }
                } else if e.is_timeout() {
                    EnrichError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    EnrichError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            if text.contains("not found") || status.as_u16() == 404 {
                return Err(EnrichError::ModelNotFound {
                    model: request.model,
                });
            }

            return Err(EnrichError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let generate_response: GenerateResponse = response.json().await?;
        Ok(generate_response)
    }

    /// Analyze document text into a structured enrichment result.
    pub async fn analyze_document(
        &self,
        text: &str,
        file_name: &str,
        known_tags: &[String],
    ) -> EnrichResult<EnrichmentAnalysis> {
        let prompt = build_analysis_prompt(text, file_name, known_tags);

        let request = GenerateRequest::new(&self.model, prompt)
            .with_system(
                "You are an assistant that summarizes meeting minutes for parent and \
                 community organizations. Respond with a single JSON object and nothing else.",
            )
            .with_json_format()
            .with_options(GenerateOptions::new().with_temperature(0.2).with_num_predict(800));

        let response = self.generate(request).await?;
        let payload = parse_analysis(&response.response)?;

        Ok(analysis_from_payload(payload))
    }
}

#[async_trait]
impl Enricher for OllamaClient {
    async fn analyze(
        &self,
        text: &str,
        file_name: &str,
        known_tags: &[String],
    ) -> anyhow::Result<EnrichmentAnalysis> {
        Ok(self.analyze_document(text, file_name, known_tags).await?)
    }
}

fn build_analysis_prompt(text: &str, file_name: &str, known_tags: &[String]) -> String {
    let truncated: String = text.chars().take(MAX_PROMPT_CHARS).collect();

    let tag_hint = if known_tags.is_empty() {
        String::new()
    } else {
        format!(
            "Prefer these existing tags where they fit: {}.\n",
            known_tags.join(", ")
        )
    };

    format!(
        r#"Analyze the following meeting document and return a JSON object with these keys:
- "summary": 2-3 sentences covering the main topics and decisions
- "key_items": list of the main items discussed
- "action_items": list of concrete follow-ups with owners where stated
- "improvements": one suggestion for running the next meeting better, or null
- "suggested_tags": 3-5 short lowercase topic tags
- "meeting_date": the meeting date as YYYY-MM-DD if stated, else null
- "date_confidence": "high" if the date is stated explicitly in the document, "medium" if inferred, "low" otherwise

{}File name: {}

Document:
{}"#,
        tag_hint, file_name, truncated
    )
}

/// Parse the model's response into an [`AnalysisPayload`]. Tolerates prose or
/// code fences around the JSON object.
fn parse_analysis(response: &str) -> EnrichResult<AnalysisPayload> {
    let trimmed = response.trim();

    if let Ok(payload) = serde_json::from_str::<AnalysisPayload>(trimmed) {
        return Ok(payload);
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if start < end {
            return serde_json::from_str(&trimmed[start..=end])
                .map_err(|e| EnrichError::ParseError(e.to_string()));
        }
    }

    Err(EnrichError::ParseError(format!(
        "No JSON object in response: {}",
        trimmed.chars().take(200).collect::<String>()
    )))
}

fn analysis_from_payload(payload: AnalysisPayload) -> EnrichmentAnalysis {
    let extracted_date = payload
        .meeting_date
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

    let date_confidence = payload
        .date_confidence
        .as_deref()
        .and_then(DateConfidence::from_str)
        .unwrap_or(DateConfidence::Low);

    EnrichmentAnalysis {
        summary: payload.summary.trim().to_string(),
        key_items: payload.key_items,
        action_items: payload.action_items,
        improvements: payload.improvements.filter(|s| !s.trim().is_empty()),
        suggested_tags: payload
            .suggested_tags
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty() && t.len() < 50)
            .collect(),
        extracted_date,
        date_confidence,
    }
}
