//! Async client for a remote text-generation advisor
//!
//! Talks to any OpenAI-compatible chat completions endpoint. Calls are
//! best-effort: the `*_or_fallback` methods never fail and never retry,
//! they log the problem and return the fixed fallback text.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::advisor::tips::{fallback_tips, FALLBACK_SUMMARY};
use crate::core::error::{QatraError, Result};
use crate::settings::UserSettings;
use crate::simulation::SimulationState;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const SYSTEM_PROMPT: &str = "You are a household water-saving advisor. \
Answer briefly and practically, in plain sentences without markdown.";

pub struct AdvisorClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl AdvisorClient {
    pub fn new(api_key: String, api_url: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| QatraError::Advisor(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            api_url,
            model,
        })
    }

    /// Create a client from environment variables
    ///
    /// Required: QATRA_ADVISOR_KEY
    /// Optional: QATRA_ADVISOR_URL, QATRA_ADVISOR_MODEL
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("QATRA_ADVISOR_KEY")
            .map_err(|_| QatraError::Advisor("QATRA_ADVISOR_KEY not set".into()))?;
        let api_url =
            std::env::var("QATRA_ADVISOR_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let model =
            std::env::var("QATRA_ADVISOR_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        Self::new(api_key, api_url, model)
    }

    /// Short analysis of today's usage
    pub async fn analyze_usage(
        &self,
        state: &SimulationState,
        settings: Option<&UserSettings>,
    ) -> Result<String> {
        let text = self.complete(&usage_prompt(state, settings)).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(QatraError::Advisor("Empty response".into()));
        }
        Ok(text.to_string())
    }

    /// A few efficiency tips, one per line in the response
    pub async fn efficiency_tips(&self, state: &SimulationState) -> Result<Vec<String>> {
        let prompt = format!(
            "{}\nGive three short water-efficiency tips, one per line.",
            describe_state(state)
        );
        let tips = parse_tips(&self.complete(&prompt).await?);
        if tips.is_empty() {
            return Err(QatraError::Advisor("No tips in response".into()));
        }
        Ok(tips)
    }

    pub async fn analyze_or_fallback(
        &self,
        state: &SimulationState,
        settings: Option<&UserSettings>,
    ) -> String {
        match self.analyze_usage(state, settings).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("advisor unavailable, using fallback summary: {}", e);
                FALLBACK_SUMMARY.to_string()
            }
        }
    }

    pub async fn tips_or_fallback(&self, state: &SimulationState) -> Vec<String> {
        match self.efficiency_tips(state).await {
            Ok(tips) => tips,
            Err(e) => {
                tracing::warn!("advisor unavailable, using fallback tips: {}", e);
                fallback_tips()
            }
        }
    }

    async fn complete(&self, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: 512,
            messages: vec![
                Message {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                Message {
                    role: "user".into(),
                    content: user.into(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| QatraError::Advisor(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(QatraError::Advisor(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| QatraError::Advisor(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| QatraError::Advisor("Empty response".into()))
    }
}

impl std::fmt::Debug for AdvisorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

fn describe_state(state: &SimulationState) -> String {
    format!(
        "Current flow: {:.1} L/min. Used today: {:.0} L. Leak suspected: {}.",
        state.current_flow_rate,
        state.total_today,
        if state.is_leaking { "yes" } else { "no" }
    )
}

/// Prompt asking for an analysis of the current state
pub fn usage_prompt(state: &SimulationState, settings: Option<&UserSettings>) -> String {
    let mut prompt = describe_state(state);
    if let Some(s) = settings {
        prompt.push_str(&format!(
            " Household: {} with {} tank(s), refilled on {}.",
            s.name, s.tank_count, s.refill_day
        ));
        if !s.refill_stop_info.trim().is_empty() {
            prompt.push_str(&format!(" Supply notes: {}.", s.refill_stop_info.trim()));
        }
    }
    prompt.push_str("\nIn two sentences, assess this usage.");
    prompt
}

/// Split a response into tips, dropping list markers and blank lines
pub fn parse_tips(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drop a leading `1.` / `2)` number or a `-`, `*`, `•` bullet.
/// A number not followed by `.` or `)` is part of the tip.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    let rest = if rest.len() == line.len() {
        rest
    } else {
        rest.strip_prefix(['.', ')']).unwrap_or(line)
    };
    rest.trim_start_matches(['-', '*', '•']).trim()
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}
