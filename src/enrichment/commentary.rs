use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes song lyrics.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Builds the user prompt for one track.
pub fn build_prompt(lyrics: &str, track_name: &str, artist_name: &str) -> String {
    format!(
        "The song is '{track_name}' by '{artist_name}'. \
         Analyze these lyrics line by line and find the meanings and emotions beneath them. \
         Keep your interpretation between 200 and 300 words.\n\nLyrics:\n{lyrics}"
    )
}

/// Chat-completion client producing lyric interpretations.
pub struct CommentaryClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl CommentaryClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.openai_api_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Requests an interpretation of `lyrics` and returns the trimmed text.
    ///
    /// Every failure, including a missing API key, is reported as
    /// [`AppError::CommentaryUnavailable`].
    pub async fn interpret(
        &self,
        lyrics: &str,
        track_name: &str,
        artist_name: &str,
    ) -> Result<String, AppError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AppError::CommentaryUnavailable(
                "the LLM API key is not configured".to_string(),
            ));
        };
        if lyrics.trim().is_empty() {
            return Err(AppError::CommentaryUnavailable(
                "there are no lyrics to interpret".to_string(),
            ));
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(lyrics, track_name, artist_name),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::CommentaryUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::CommentaryUnavailable(format!(
                "completion request failed: {status} => {body}"
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::CommentaryUnavailable(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::CommentaryUnavailable("empty completion".to_string()))
    }
}
