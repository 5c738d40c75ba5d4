use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::analise::{
    montar_dimensao, montar_estrategia, montar_legislacao, montar_resumo, montar_visita, DadosCarregados,
};
use crate::models::Dimensao;
use crate::server::AppState;

/// Reprocessa o upload da sessão ou devolve a resposta de erro pronta.
pub(crate) fn carregar(state: &AppState, id: &str) -> Result<(DadosCarregados, Vec<String>), HttpResponse> {
    match state.dados(id) {
        None => Err(HttpResponse::NotFound().json(json!({"error": "sessão não encontrada"}))),
        Some((Err(e), _)) => Err(HttpResponse::InternalServerError().json(json!({"error": format!("{}", e)}))),
        Some((Ok(dados), imagens)) => Ok((dados, imagens)),
    }
}

/// GET /sessoes/{id}/resumo
pub async fn resumo_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match carregar(&state, &path) {
        Ok((dados, _)) => HttpResponse::Ok().json(montar_resumo(&dados)),
        Err(resp) => resp,
    }
}

/// GET /sessoes/{id}/dimensoes/{dimensao}
pub async fn dimensao_handler(state: web::Data<AppState>, path: web::Path<(String, String)>) -> impl Responder {
    let (id, nome) = path.into_inner();
    let Some(dim) = Dimensao::parse(&nome) else {
        return HttpResponse::BadRequest().json(json!({
            "error": format!("dimensão desconhecida: '{}'", nome),
            "validas": Dimensao::ALL.iter().map(|d| d.slug()).collect::<Vec<_>>(),
        }));
    };
    match carregar(&state, &id) {
        Ok((dados, imagens)) => HttpResponse::Ok().json(montar_dimensao(&dados, dim, &imagens)),
        Err(resp) => resp,
    }
}

/// GET /sessoes/{id}/legislacao
pub async fn legislacao_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match carregar(&state, &path) {
        Ok((dados, _)) => HttpResponse::Ok().json(montar_legislacao(&dados)),
        Err(resp) => resp,
    }
}

/// GET /sessoes/{id}/visita
pub async fn visita_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match carregar(&state, &path) {
        Ok((dados, _)) => HttpResponse::Ok().json(montar_visita(&dados)),
        Err(resp) => resp,
    }
}

/// GET /sessoes/{id}/estrategia
pub async fn estrategia_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match carregar(&state, &path) {
        Ok((dados, _)) => HttpResponse::Ok().json(montar_estrategia(&dados)),
        Err(resp) => resp,
    }
}
