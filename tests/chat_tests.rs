mod common;

use std::sync::Mutex;
use viabilidade::analise::carregar_dados_bytes;
use viabilidade::chat::*;
use viabilidade::ChatError;

/// Modelo de teste: guarda o último prompt e devolve uma resposta fixa ou
/// um erro.
struct ModeloFixo {
    resposta: Option<String>,
    ultimo_prompt: Mutex<Option<String>>,
}

impl ModeloFixo {
    fn respondendo(texto: &str) -> Self {
        ModeloFixo { resposta: Some(texto.to_string()), ultimo_prompt: Mutex::new(None) }
    }

    fn falhando() -> Self {
        ModeloFixo { resposta: None, ultimo_prompt: Mutex::new(None) }
    }
}

impl LanguageModel for ModeloFixo {
    fn generate<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
        Box::pin(async move {
            *self.ultimo_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.resposta {
                Some(r) => Ok(r.clone()),
                None => Err(ChatError::Api { status: 503, body: "indisponível".into() }),
            }
        })
    }
}

#[test]
fn test_contexto_da_pasta() {
    let dados = carregar_dados_bytes(&common::pasta_padrao()).unwrap();
    let ctx = montar_contexto(&dados);
    assert!(ctx.contains("- Média da Dimensão Urbana: 3.50"));
    assert!(ctx.contains("- Índice Territorial (IT) Total: 3.80"));
    assert!(ctx.contains("Boa conectividade"));
    assert!(!ctx.contains("➡️ Mobilidade"));
    assert!(ctx.contains("Ruído de ônibus no pico"));
    assert!(ctx.contains("Universidade"));
    // parceiro sem localização ainda entra no contexto
    assert!(ctx.contains("Cooperativa"));
}

#[tokio::test]
async fn test_pergunta_e_resposta() {
    let dados = carregar_dados_bytes(&common::pasta_padrao()).unwrap();
    let modelo = ModeloFixo::respondendo("O IT é **3,80**.");
    let mut chat = ChatSession::new();

    let r = chat.perguntar(&modelo, &dados, "  Qual o IT? ").await.unwrap();
    assert_eq!(r, "O IT é **3,80**.");

    let msgs = chat.mensagens();
    assert_eq!(msgs.len(), 3);
    assert_eq!(msgs[0].content, SAUDACAO);
    assert_eq!((msgs[1].role, msgs[1].content.as_str()), (Papel::User, "Qual o IT?"));
    assert_eq!(msgs[2].role, Papel::Assistant);

    let prompt = modelo.ultimo_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("Studio Cosmos"));
    assert!(prompt.contains("Índice Territorial (IT) Total: 3.80"));
    assert!(prompt.trim_end().ends_with("Qual o IT?"));
}

#[tokio::test]
async fn test_falha_do_modelo_vai_para_a_conversa() {
    let dados = carregar_dados_bytes(&common::pasta_padrao()).unwrap();
    let modelo = ModeloFixo::falhando();
    let mut chat = ChatSession::new();

    let r = chat.perguntar(&modelo, &dados, "Quais os riscos?").await;
    assert!(matches!(r, Err(ChatError::Api { status: 503, .. })));
    let ultima = chat.mensagens().last().unwrap();
    assert!(ultima.content.starts_with("Desculpe, não consegui processar sua pergunta. Erro:"));
    assert!(ultima.content.contains("503"));
}

#[tokio::test]
async fn test_pergunta_vazia_nao_chama_o_modelo() {
    let dados = carregar_dados_bytes(&common::pasta_padrao()).unwrap();
    let modelo = ModeloFixo::respondendo("x");
    let mut chat = ChatSession::new();

    let r = chat.perguntar(&modelo, &dados, "   ").await;
    assert!(matches!(r, Err(ChatError::EmptyQuestion)));
    assert_eq!(chat.mensagens().len(), 1);
    assert!(modelo.ultimo_prompt.lock().unwrap().is_none());
}
