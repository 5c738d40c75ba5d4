use actix_web::{HttpResponse, Responder};
use serde_json::json;

use crate::models::Dimensao;

/// GET /help
pub async fn help_handler() -> impl Responder {
    let help = json!({
        "description": "API do painel de viabilidade territorial. Envie a pasta Excel (e as imagens de mapa) para abrir uma sessão; cada visão é recalculada a partir do upload.",
        "endpoints": [
            {"method": "POST", "path": "/sessoes", "body": "multipart: campo 'planilha' + imagens (qualquer outro campo com arquivo)"},
            {"method": "GET", "path": "/sessoes/{id}/resumo"},
            {"method": "GET", "path": "/sessoes/{id}/dimensoes/{dimensao}"},
            {"method": "GET", "path": "/sessoes/{id}/legislacao"},
            {"method": "GET", "path": "/sessoes/{id}/visita"},
            {"method": "GET", "path": "/sessoes/{id}/estrategia"},
            {"method": "GET", "path": "/sessoes/{id}/mapas/{nome}"},
            {"method": "GET", "path": "/sessoes/{id}/chat"},
            {"method": "POST", "path": "/sessoes/{id}/chat", "body": {"pergunta": "Qual a estratégia para a dimensão social?", "api_key": "opcional"}},
            {"method": "DELETE", "path": "/sessoes/{id}"}
        ],
        "dimensoes": Dimensao::ALL.iter().map(|d| d.slug()).collect::<Vec<_>>(),
        "note": "Sem 'api_key' na pergunta, o chat usa GEMINI_API_KEY do ambiente."
    });

    HttpResponse::Ok().json(help)
}
