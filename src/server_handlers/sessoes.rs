use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::stream::StreamExt;
use serde_json::json;
use tracing::{info, warn};

use crate::analise::carregar_dados_bytes;
use crate::excel::match_image_name;
use crate::server::{AppState, Sessao};

/// Campo multipart que carrega a pasta de trabalho.
pub const CAMPO_PLANILHA: &str = "planilha";

fn mime_por_extensao(nome: &str) -> &'static str {
    let ext = nome.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// POST /sessoes
/// Recebe a pasta (campo `planilha`) e as imagens de mapa (qualquer outro
/// campo com nome de arquivo), valida a leitura e abre uma sessão.
pub async fn upload_handler(state: web::Data<AppState>, mut payload: Multipart) -> impl Responder {
    let limite = state.config.max_upload_bytes;
    let mut planilha: Option<Vec<u8>> = None;
    let mut imagens: Vec<(String, Vec<u8>)> = Vec::new();
    let mut total = 0usize;

    while let Some(field_res) = payload.next().await {
        let mut field = match field_res {
            Ok(f) => f,
            Err(e) => {
                warn!("multipart field error: {}", e);
                return HttpResponse::BadRequest().json(json!({"error": format!("upload inválido: {}", e)}));
            }
        };
        let nome_campo = field.content_disposition().get_name().unwrap_or_default().to_string();
        let arquivo = field.content_disposition().get_filename().map(|s| s.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(b) => {
                    total += b.len();
                    if total > limite {
                        return HttpResponse::PayloadTooLarge()
                            .json(json!({"error": format!("upload excede o limite de {} bytes", limite)}));
                    }
                    bytes.extend_from_slice(&b);
                }
                Err(e) => {
                    warn!("upload stream error: {}", e);
                    return HttpResponse::BadRequest().json(json!({"error": format!("upload interrompido: {}", e)}));
                }
            }
        }

        if nome_campo == CAMPO_PLANILHA {
            planilha = Some(bytes);
        } else if let Some(nome) = arquivo.filter(|n| !n.trim().is_empty()) {
            imagens.push((nome, bytes));
        }
    }

    let Some(planilha) = planilha else {
        return HttpResponse::BadRequest()
            .json(json!({"error": format!("campo '{}' com a planilha é obrigatório", CAMPO_PLANILHA)}));
    };

    let dados = match carregar_dados_bytes(&planilha) {
        Ok(d) => d,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("{}", e)})),
    };

    let abas: serde_json::Map<String, serde_json::Value> = dados
        .abas
        .iter()
        .map(|(role, nome)| (role.keyword().to_string(), json!(nome)))
        .collect();
    let nomes_imagens: Vec<String> = imagens.iter().map(|(n, _)| n.clone()).collect();
    let id = state.inserir_sessao(Sessao::new(planilha, imagens));
    info!(sessao = %id, imagens = nomes_imagens.len(), "sessão criada");

    HttpResponse::Created().json(json!({
        "sessao": id,
        "abas": abas,
        "imagens": nomes_imagens,
        "metricas": dados.metricas,
        "avisos": dados.avisos,
    }))
}

/// DELETE /sessoes/{id}
pub async fn encerrar_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match state.remover_sessao(&id) {
        Some(_) => {
            info!(sessao = %id, "sessão encerrada");
            HttpResponse::Ok().json(json!({"status": "ok"}))
        }
        None => HttpResponse::NotFound().json(json!({"error": "sessão não encontrada"})),
    }
}

/// GET /sessoes/{id}/mapas/{nome}
/// Nome exato do arquivo enviado ou referência de mapa como escrita na
/// planilha.
pub async fn mapa_handler(state: web::Data<AppState>, path: web::Path<(String, String)>) -> impl Responder {
    let (id, nome) = path.into_inner();
    let mut sessoes = state.sessoes();
    let Some(sessao) = sessoes.get_mut(&id) else {
        return HttpResponse::NotFound().json(json!({"error": "sessão não encontrada"}));
    };
    sessao.tocar();
    let nomes = sessao.nomes_imagens();
    let alvo = nomes.iter().find(|n| **n == nome).map(String::as_str).or_else(|| match_image_name(&nome, &nomes));
    match alvo.and_then(|a| sessao.imagens.iter().find(|(n, _)| n == a)) {
        Some((n, bytes)) => HttpResponse::Ok().content_type(mime_por_extensao(n)).body(bytes.to_vec()),
        None => HttpResponse::NotFound().json(json!({"error": format!("imagem '{}' não encontrada", nome)})),
    }
}

#[cfg(test)]
mod tests {
    use super::mime_por_extensao;

    #[test]
    fn mime() {
        assert_eq!(mime_por_extensao("Mapa.PNG"), "image/png");
        assert_eq!(mime_por_extensao("a.jpeg"), "image/jpeg");
        assert_eq!(mime_por_extensao("sem_extensao"), "application/octet-stream");
    }
}
