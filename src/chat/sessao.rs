use serde::Serialize;
use tracing::{error, info};

use crate::analise::DadosCarregados;
use crate::chat::contexto::{montar_contexto, montar_prompt};
use crate::chat::gemini::LanguageModel;
use crate::error::ChatError;

pub const SAUDACAO: &str = "Olá! Sou o assistente de análise do Studio Cosmos. Pergunte-me sobre os dados carregados.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Papel {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mensagem {
    pub role: Papel,
    pub content: String,
}

/// Transcrição de uma conversa. Começa com a saudação do assistente e vive
/// enquanto a sessão de upload existir.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    mensagens: Vec<Mensagem>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        ChatSession { mensagens: vec![Mensagem { role: Papel::Assistant, content: SAUDACAO.to_string() }] }
    }

    pub fn mensagens(&self) -> &[Mensagem] {
        &self.mensagens
    }

    pub fn registrar_pergunta(&mut self, pergunta: &str) {
        self.mensagens.push(Mensagem { role: Papel::User, content: pergunta.to_string() });
    }

    /// Anexa o desfecho da chamada ao modelo: a resposta, ou a mensagem de
    /// desculpas com o erro.
    pub fn registrar_resultado(&mut self, resultado: &Result<String, ChatError>) {
        let content = match resultado {
            Ok(texto) => texto.clone(),
            Err(e) => format!("Desculpe, não consegui processar sua pergunta. Erro: {}", e),
        };
        self.mensagens.push(Mensagem { role: Papel::Assistant, content });
    }

    /// Fluxo completo de uma pergunta com a sessão em mãos. O servidor faz
    /// os mesmos passos sem segurar o lock durante a chamada.
    pub async fn perguntar(
        &mut self,
        modelo: &dyn LanguageModel,
        dados: &DadosCarregados,
        pergunta: &str,
    ) -> Result<String, ChatError> {
        let pergunta = validar_pergunta(pergunta)?;
        self.registrar_pergunta(pergunta);
        let resultado = responder(modelo, dados, pergunta).await;
        self.registrar_resultado(&resultado);
        resultado
    }
}

pub fn validar_pergunta(pergunta: &str) -> Result<&str, ChatError> {
    let p = pergunta.trim();
    if p.is_empty() { Err(ChatError::EmptyQuestion) } else { Ok(p) }
}

/// Monta contexto e prompt a partir dos dados e chama o modelo uma vez.
pub async fn responder(modelo: &dyn LanguageModel, dados: &DadosCarregados, pergunta: &str) -> Result<String, ChatError> {
    let prompt = montar_prompt(&montar_contexto(dados), pergunta);
    info!(chars = prompt.len(), "consultando o modelo");
    let resultado = modelo.generate(&prompt).await;
    if let Err(e) = &resultado {
        error!("Erro ao contactar a IA: {}", e);
    }
    resultado
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comeca_com_saudacao() {
        let s = ChatSession::new();
        assert_eq!(s.mensagens().len(), 1);
        assert_eq!(s.mensagens()[0].role, Papel::Assistant);
        assert_eq!(s.mensagens()[0].content, SAUDACAO);
    }

    #[test]
    fn erro_vira_desculpas() {
        let mut s = ChatSession::new();
        s.registrar_pergunta("Qual o IT?");
        s.registrar_resultado(&Err(ChatError::Timeout(60)));
        let ultima = s.mensagens().last().unwrap();
        assert!(ultima.content.starts_with("Desculpe, não consegui processar sua pergunta. Erro: "));
        assert!(ultima.content.contains("60 s"));
    }

    #[test]
    fn pergunta_em_branco() {
        assert!(matches!(validar_pergunta("   "), Err(ChatError::EmptyQuestion)));
        assert_eq!(validar_pergunta(" oi ").unwrap(), "oi");
    }
}
