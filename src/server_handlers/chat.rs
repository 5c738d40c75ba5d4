use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::chat::{responder, validar_pergunta, ChatSession};
use crate::error::ChatError;
use crate::server::AppState;
use crate::server_handlers::paginas::carregar;

#[derive(Debug, Deserialize)]
pub struct PerguntaRequest {
    pub pergunta: String,
    /// Chave do Gemini para esta pergunta; sem ela vale a configurada.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn status_do_erro(e: &ChatError) -> StatusCode {
    match e {
        ChatError::MissingApiKey | ChatError::EmptyQuestion => StatusCode::BAD_REQUEST,
        ChatError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn resposta_de_erro(e: &ChatError) -> HttpResponse {
    HttpResponse::build(status_do_erro(e)).json(json!({"error": format!("{}", e)}))
}

/// GET /sessoes/{id}/chat
pub async fn chat_get_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let mut sessoes = state.sessoes();
    match sessoes.get_mut(path.as_str()) {
        Some(sessao) => {
            sessao.tocar();
            let chat = sessao.chat.get_or_insert_with(ChatSession::new);
            HttpResponse::Ok().json(json!({"mensagens": chat.mensagens()}))
        }
        None => HttpResponse::NotFound().json(json!({"error": "sessão não encontrada"})),
    }
}

/// Libera a sessão para a próxima pergunta, mesmo se o handler for
/// cancelado no meio da chamada ao modelo.
struct PerguntaEmAndamento<'a> {
    state: &'a AppState,
    id: &'a str,
}

impl Drop for PerguntaEmAndamento<'_> {
    fn drop(&mut self) {
        if let Some(sessao) = self.state.sessoes().get_mut(self.id) {
            sessao.pergunta_pendente = false;
        }
    }
}

/// POST /sessoes/{id}/chat
/// Registra a pergunta, consulta o modelo fora do lock e anexa a resposta
/// (ou a mensagem de erro) à conversa. Uma sessão responde uma pergunta por
/// vez; outra enviada enquanto a primeira aguarda o modelo recebe 409.
pub async fn chat_post_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PerguntaRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let req = body.into_inner();

    let pergunta = match validar_pergunta(&req.pergunta) {
        Ok(p) => p.to_string(),
        Err(e) => return resposta_de_erro(&e),
    };
    let modelo = match state.modelo(req.api_key.as_deref()) {
        Ok(m) => m,
        Err(e) => return resposta_de_erro(&e),
    };
    let (dados, _) = match carregar(&state, &id) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    {
        let mut sessoes = state.sessoes();
        let Some(sessao) = sessoes.get_mut(&id) else {
            return HttpResponse::NotFound().json(json!({"error": "sessão não encontrada"}));
        };
        if sessao.pergunta_pendente {
            return HttpResponse::Conflict().json(json!({"error": "já existe uma pergunta em andamento nesta sessão"}));
        }
        sessao.pergunta_pendente = true;
        sessao.chat.get_or_insert_with(ChatSession::new).registrar_pergunta(&pergunta);
    }
    let _pendente = PerguntaEmAndamento { state: &state, id: &id };

    let resultado = responder(modelo.as_ref(), &dados, &pergunta).await;

    let mensagens = {
        let mut sessoes = state.sessoes();
        // A sessão pode ter sido encerrada durante a chamada.
        sessoes.get_mut(&id).map(|sessao| {
            let chat = sessao.chat.get_or_insert_with(ChatSession::new);
            chat.registrar_resultado(&resultado);
            chat.mensagens().to_vec()
        })
    };

    match resultado {
        Ok(resposta) => HttpResponse::Ok().json(json!({"resposta": resposta, "mensagens": mensagens})),
        Err(e) => HttpResponse::build(status_do_erro(&e)).json(json!({"error": format!("{}", e), "mensagens": mensagens})),
    }
}
