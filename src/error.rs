use thiserror::Error;

/// Falhas de leitura da pasta de trabalho.
#[derive(Debug, Error)]
pub enum ExcelError {
    #[error("erro ao ler a estrutura do arquivo Excel: {0}")]
    Open(#[from] calamine::Error),
    #[error("o arquivo Excel não contém abas")]
    NoSheets,
}

/// Falhas da conversa com o modelo de linguagem.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("nenhuma chave de API do Gemini configurada")]
    MissingApiKey,
    #[error("falha HTTP ao contactar a IA: {0}")]
    Http(#[from] reqwest::Error),
    #[error("a IA respondeu com status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("a IA não devolveu texto")]
    EmptyResponse,
    #[error("tempo esgotado após {0} s aguardando a IA")]
    Timeout(u64),
    #[error("pergunta vazia")]
    EmptyQuestion,
}
