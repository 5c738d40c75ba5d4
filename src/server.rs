use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::analise::{carregar_dados_bytes, DadosCarregados};
use crate::chat::{ChatSession, GeminiClient, LanguageModel};
use crate::config::Config;
use crate::error::{ChatError, ExcelError};
use crate::server_handlers::*;

/// Um upload: a pasta, as imagens de mapa e a conversa (criada na primeira
/// interação com o assistente). Tudo em memória; some com o DELETE ou
/// quando fica sem acesso por mais que `Config::sessao_ttl`.
#[derive(Debug, Clone)]
pub struct Sessao {
    pub planilha: Arc<[u8]>,
    pub imagens: Vec<(String, Arc<[u8]>)>,
    pub chat: Option<ChatSession>,
    /// Há uma pergunta aguardando o modelo.
    pub pergunta_pendente: bool,
    pub criada_em: DateTime<Utc>,
    pub ultimo_acesso: DateTime<Utc>,
}

impl Sessao {
    pub fn new(planilha: Vec<u8>, imagens: Vec<(String, Vec<u8>)>) -> Self {
        let agora = Utc::now();
        Sessao {
            planilha: planilha.into(),
            imagens: imagens.into_iter().map(|(n, b)| (n, b.into())).collect(),
            chat: None,
            pergunta_pendente: false,
            criada_em: agora,
            ultimo_acesso: agora,
        }
    }

    pub fn nomes_imagens(&self) -> Vec<String> {
        self.imagens.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn tocar(&mut self) {
        self.ultimo_acesso = Utc::now();
    }

    pub fn expirada(&self, agora: DateTime<Utc>, ttl: TimeDelta) -> bool {
        agora - self.ultimo_acesso > ttl
    }
}

/// Estado compartilhado entre workers. O lock do mapa de sessões nunca é
/// mantido durante a chamada ao modelo.
pub struct AppState {
    pub config: Config,
    sessoes: Mutex<HashMap<String, Sessao>>,
    modelo: Option<Arc<dyn LanguageModel>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let modelo = config.gemini_api_key.as_deref().and_then(|key| {
            GeminiClient::new(key, &config.gemini_model, config.gemini_timeout)
                .ok()
                .map(|c| Arc::new(c) as Arc<dyn LanguageModel>)
        });
        AppState { config, sessoes: Mutex::new(HashMap::new()), modelo }
    }

    /// Substitui o modelo padrão (útil para testes e outros provedores).
    pub fn with_model(mut self, modelo: Arc<dyn LanguageModel>) -> Self {
        self.modelo = Some(modelo);
        self
    }

    /// Modelo para uma pergunta: a chave enviada na requisição tem
    /// precedência sobre o modelo configurado.
    pub fn modelo(&self, api_key: Option<&str>) -> Result<Arc<dyn LanguageModel>, ChatError> {
        match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                let cliente: Arc<dyn LanguageModel> =
                    Arc::new(GeminiClient::new(key, &self.config.gemini_model, self.config.gemini_timeout)?);
                Ok(cliente)
            }
            None => self.modelo.clone().ok_or(ChatError::MissingApiKey),
        }
    }

    /// Mapa de sessões, já sem as expiradas.
    pub fn sessoes(&self) -> MutexGuard<'_, HashMap<String, Sessao>> {
        // Um handler que entrou em pânico não deixa o mapa inconsistente.
        let mut sessoes = self.sessoes.lock().unwrap_or_else(|e| e.into_inner());
        if let Ok(ttl) = TimeDelta::from_std(self.config.sessao_ttl) {
            let agora = Utc::now();
            sessoes.retain(|id, s| {
                let manter = !s.expirada(agora, ttl);
                if !manter {
                    debug!(sessao = %id, criada_em = %s.criada_em, "sessão expirada");
                }
                manter
            });
        }
        sessoes
    }

    pub fn inserir_sessao(&self, sessao: Sessao) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.sessoes().insert(id.clone(), sessao);
        id
    }

    pub fn remover_sessao(&self, id: &str) -> Option<Sessao> {
        self.sessoes().remove(id)
    }

    /// Bytes da pasta e nomes das imagens, copiados para fora do lock.
    pub fn upload(&self, id: &str) -> Option<(Arc<[u8]>, Vec<String>)> {
        self.sessoes().get_mut(id).map(|s| {
            s.tocar();
            (s.planilha.clone(), s.nomes_imagens())
        })
    }

    /// Reprocessa a pasta da sessão. `None` se a sessão não existe.
    pub fn dados(&self, id: &str) -> Option<(Result<DadosCarregados, ExcelError>, Vec<String>)> {
        let (planilha, imagens) = self.upload(id)?;
        Some((carregar_dados_bytes(&planilha), imagens))
    }
}

/// Rotas da API; usado pelo servidor e pelos testes.
pub fn configurar(cfg: &mut web::ServiceConfig) {
    cfg.route("/help", web::get().to(help_handler))
        .route("/sessoes", web::post().to(upload_handler))
        .route("/sessoes/{id}", web::delete().to(encerrar_handler))
        .route("/sessoes/{id}/resumo", web::get().to(resumo_handler))
        .route("/sessoes/{id}/dimensoes/{dimensao}", web::get().to(dimensao_handler))
        .route("/sessoes/{id}/legislacao", web::get().to(legislacao_handler))
        .route("/sessoes/{id}/visita", web::get().to(visita_handler))
        .route("/sessoes/{id}/estrategia", web::get().to(estrategia_handler))
        .route("/sessoes/{id}/mapas/{nome}", web::get().to(mapa_handler))
        .route("/sessoes/{id}/chat", web::get().to(chat_get_handler))
        .route("/sessoes/{id}/chat", web::post().to(chat_post_handler));
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind = config.bind.clone();
    let state = web::Data::new(AppState::new(config));
    info!(%bind, chat = state.modelo.is_some(), "iniciando servidor");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(configurar)
    })
    .bind(bind)?
    .run()
    .await
}
