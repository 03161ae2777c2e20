//! Translation backends.
//!
//! Each backend exposes a blocking [`Translator::translate`] call. Internally
//! they drive `reqwest` on a private tokio runtime, so the controller thread
//! can stay synchronous and process one notification at a time.

use crate::config::{Backend, Config};
use crate::error::TranslateError;
use std::time::Duration;

const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

pub trait Translator: Send {
    fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

/// Build the translator selected in `cfg`.
pub fn from_config(cfg: &Config) -> Result<Box<dyn Translator>, TranslateError> {
    match cfg.backend {
        Backend::Google => Ok(Box::new(GoogleTranslator::new(
            &cfg.source_lang,
            &cfg.target_lang,
            cfg.timeout(),
        )?)),
        Backend::OpenAi => Ok(Box::new(OpenAiTranslator::new(
            &cfg.openai_endpoint,
            &cfg.openai_api_key,
            &cfg.openai_model,
            &cfg.target_lang,
            cfg.timeout(),
        )?)),
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, TranslateError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

fn build_runtime() -> Result<tokio::runtime::Runtime, TranslateError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| TranslateError::Setup(format!("tokio runtime: {}", e)))
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, TranslateError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(TranslateError::Status { status, body })
}

/// Google Translate's public web endpoint (`client=gtx`).
pub struct GoogleTranslator {
    client: reqwest::Client,
    rt: tokio::runtime::Runtime,
    source: String,
    target: String,
}

impl GoogleTranslator {
    pub fn new(source: &str, target: &str, timeout: Duration) -> Result<Self, TranslateError> {
        Ok(Self {
            client: build_client(timeout)?,
            rt: build_runtime()?,
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    async fn request(&self, text: &str) -> Result<String, TranslateError> {
        let resp = self
            .client
            .get(GOOGLE_ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;
        let body: serde_json::Value = ensure_success(resp).await?.json().await?;
        parse_google_response(&body)
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.rt.block_on(self.request(text))
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body looks like `[[["你好","hello",null,null,10], ...], null, "en", ...]`;
/// long inputs are split into several segments, one per sentence.
fn parse_google_response(body: &serde_json::Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::Decode("missing segment list".into()))?;
    let out: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|s| s.as_str()))
        .collect();
    let out = out.trim();
    if out.is_empty() {
        return Err(TranslateError::Empty);
    }
    Ok(out.to_string())
}

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(serde::Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(serde::Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// OpenAI-compatible `/chat/completions` backend.
pub struct OpenAiTranslator {
    client: reqwest::Client,
    rt: tokio::runtime::Runtime,
    url: String,
    api_key: String,
    model: String,
    system_prompt: String,
}

impl OpenAiTranslator {
    pub fn new(
        endpoint: &str,
        api_key: &str,
        model: &str,
        target: &str,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        if api_key.is_empty() {
            return Err(TranslateError::Setup("openai backend needs OPENAI_API_KEY".into()));
        }
        Ok(Self {
            client: build_client(timeout)?,
            rt: build_runtime()?,
            url: format!("{}/chat/completions", endpoint.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_prompt: format!("Translate to {}. Output only translation.", target),
        })
    }

    async fn request(&self, input: &str) -> Result<String, TranslateError> {
        let req = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: &self.system_prompt },
                ChatMessage { role: "user", content: input },
            ],
            temperature: 0.0,
            max_tokens: Some(2048),
            stream: false,
        };

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;
        let parsed: ChatResponse = ensure_success(resp).await?.json().await?;
        parse_chat_response(parsed)
    }
}

impl Translator for OpenAiTranslator {
    fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.rt.block_on(self.request(text))
    }
}

fn parse_chat_response(parsed: ChatResponse) -> Result<String, TranslateError> {
    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(TranslateError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn google_single_segment() {
        let body = json!([[["你好", "hello", null, null, 10]], null, "en"]);
        assert_eq!(parse_google_response(&body).unwrap(), "你好");
    }

    #[test]
    fn google_segments_are_joined_in_order() {
        let body = json!([
            [
                ["第一句。", "First sentence. ", null, null, 3],
                ["第二句。", "Second sentence.", null, null, 3],
                [null, null, "Dì èr jù."]
            ],
            null,
            "en"
        ]);
        assert_eq!(parse_google_response(&body).unwrap(), "第一句。第二句。");
    }

    #[test]
    fn google_malformed_body_is_decode_error() {
        let err = parse_google_response(&json!({"error": "nope"})).unwrap_err();
        assert!(matches!(err, TranslateError::Decode(_)));
    }

    #[test]
    fn google_blank_result_is_empty_error() {
        let err = parse_google_response(&json!([[["  ", "x"]]])).unwrap_err();
        assert!(matches!(err, TranslateError::Empty));
    }

    #[test]
    fn chat_response_takes_first_choice_trimmed() {
        let parsed: ChatResponse = serde_json::from_value(json!({
            "choices": [
                { "message": { "content": "  你好 \n" } },
                { "message": { "content": "other" } }
            ]
        }))
        .unwrap();
        assert_eq!(parse_chat_response(parsed).unwrap(), "你好");
    }

    #[test]
    fn chat_response_without_choices_is_empty_error() {
        let parsed: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(parse_chat_response(parsed), Err(TranslateError::Empty)));
    }

    #[test]
    fn openai_requires_api_key() {
        let cfg = Config { backend: Backend::OpenAi, ..Config::default() };
        assert!(matches!(from_config(&cfg), Err(TranslateError::Setup(_))));
    }
}
