// Biblioteca raiz do crate `viabilidade`.
// Lê a pasta Excel de análise territorial, monta as visões do painel e serve
// tudo por HTTP, junto com o assistente de perguntas.
pub mod analise;
pub mod chat;
pub mod config;
pub mod error;
pub mod excel;
pub mod models;
pub mod server;
mod server_handlers;

pub use config::Config;
pub use error::{ChatError, ExcelError};

/// Executa o servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
