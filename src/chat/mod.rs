//! Assistente de perguntas sobre a pasta carregada.

pub mod contexto;
pub mod gemini;
pub mod sessao;

pub use contexto::{montar_contexto, montar_prompt};
pub use gemini::{CompletionFuture, GeminiClient, LanguageModel};
pub use sessao::{responder, validar_pergunta, ChatSession, Mensagem, Papel, SAUDACAO};
