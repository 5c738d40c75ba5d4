//! Configuração via variáveis de ambiente (com `.env` opcional).

use std::env;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_timeout: Duration,
    /// Limite por upload, em bytes.
    pub max_upload_bytes: usize,
    /// Sessões sem acesso por mais que isso são descartadas.
    pub sessao_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: DEFAULT_BIND.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_timeout: Duration::from_secs(60),
            max_upload_bytes: 50 * 1024 * 1024,
            sessao_ttl: Duration::from_secs(2 * 60 * 60),
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Config {
    /// Lê `VIABILIDADE_BIND`, `GEMINI_API_KEY`, `GEMINI_MODEL`,
    /// `GEMINI_TIMEOUT_SECS`, `VIABILIDADE_MAX_UPLOAD_MB` e
    /// `VIABILIDADE_SESSAO_TTL_MIN`. Valores ausentes
    /// ou inválidos ficam no padrão.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        let defaults = Config::default();
        Config {
            bind: non_empty("VIABILIDADE_BIND").unwrap_or(defaults.bind),
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_timeout: non_empty("GEMINI_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.gemini_timeout),
            max_upload_bytes: non_empty("VIABILIDADE_MAX_UPLOAD_MB")
                .and_then(|v| v.parse::<usize>().ok())
                .map(|mb| mb * 1024 * 1024)
                .unwrap_or(defaults.max_upload_bytes),
            sessao_ttl: non_empty("VIABILIDADE_SESSAO_TTL_MIN")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|&min| min > 0)
                .map(|min| Duration::from_secs(min.saturating_mul(60)))
                .unwrap_or(defaults.sessao_ttl),
        }
    }
}
