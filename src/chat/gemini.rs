//! Cliente do modelo de linguagem.
//!
//! O assistente depende só de `LanguageModel`; `GeminiClient` é a
//! implementação padrão sobre a API REST `generateContent`.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ChatError;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>>;

/// Gera uma resposta em texto para um prompt. Uma chamada, sem repetição.
pub trait LanguageModel: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a>;
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Texto do primeiro candidato (partes concatenadas).
    pub fn texto(self) -> Result<String, ChatError> {
        let texto: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if texto.trim().is_empty() { Err(ChatError::EmptyResponse) } else { Ok(texto) }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    timeout: Duration,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self, ChatError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ChatError::MissingApiKey);
        }
        Ok(GeminiClient {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn chamar(&self, prompt: &str) -> Result<String, ChatError> {
        let body = GenerateRequest { contents: vec![Content { parts: vec![Part { text: prompt }] }] };
        debug!(model = %self.model, chars = prompt.len(), "enviando prompt");
        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "gemini respondeu com erro");
            return Err(ChatError::Api { status: status.as_u16(), body });
        }
        resp.json::<GenerateResponse>().await?.texto()
    }
}

impl LanguageModel for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
        Box::pin(async move {
            match tokio::time::timeout(self.timeout, self.chamar(prompt)).await {
                Ok(r) => r,
                Err(_) => Err(ChatError::Timeout(self.timeout.as_secs())),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chave_vazia() {
        assert!(matches!(
            GeminiClient::new("  ", "gemini-1.5-pro-latest", Duration::from_secs(5)),
            Err(ChatError::MissingApiKey)
        ));
    }

    #[test]
    fn endpoint_com_modelo() {
        let c = GeminiClient::new("k", "gemini-1.5-pro-latest", Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://localhost:9000/");
        assert_eq!(c.endpoint(), "http://localhost:9000/models/gemini-1.5-pro-latest:generateContent");
    }

    #[test]
    fn corpo_da_requisicao() {
        let body = GenerateRequest { contents: vec![Content { parts: vec![Part { text: "oi" }] }] };
        assert_eq!(serde_json::to_value(&body).unwrap(), serde_json::json!({"contents": [{"parts": [{"text": "oi"}]}]}));
    }

    #[test]
    fn texto_da_resposta() {
        let r: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "O IT é "}, {"text": "**3,72**."}], "role": "model"}}]
        }))
        .unwrap();
        assert_eq!(r.texto().unwrap(), "O IT é **3,72**.");

        let vazia: GenerateResponse = serde_json::from_value(serde_json::json!({"candidates": []})).unwrap();
        assert!(matches!(vazia.texto(), Err(ChatError::EmptyResponse)));
    }
}
