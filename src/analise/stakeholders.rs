use serde::Serialize;

use crate::analise::avisos::Avisos;
use crate::analise::colunas;
use crate::analise::title_case;
use crate::excel::{carve_table, locate_header_row_by, Grid, HeaderRule, HeaderTerm, StructuredTable, DEFAULT_SCAN_LIMIT};

#[derive(Debug, Clone, Serialize)]
pub struct Stakeholder {
    pub instituicao: String,
    pub localizacao: String,
    pub potencial: String,
    /// Alto = 3, Médio = 2, Baixo = 1, resto = 0.
    pub nivel: u8,
    /// Texto do potencial quebrado em frases.
    pub topicos: Vec<String>,
}

fn regra_cabecalho() -> HeaderRule {
    HeaderRule::new(vec![HeaderTerm::contains(colunas::INSTITUICAO), HeaderTerm::contains(colunas::POTENCIAL)])
}

/// Recorta a tabela de parceiros da aba Econômica crua.
pub fn tabela_stakeholders(grade: &Grid) -> Option<StructuredTable> {
    let linha = locate_header_row_by(grade, &regra_cabecalho(), DEFAULT_SCAN_LIMIT)?;
    Some(carve_table(grade, linha, None))
}

pub fn nivel_potencial(texto: &str) -> u8 {
    match title_case(texto).as_str() {
        "Alto" => 3,
        "Médio" => 2,
        "Baixo" => 1,
        _ => 0,
    }
}

/// Frases do texto de potencial, cada uma terminada em ponto.
pub fn topicos(texto: &str) -> Vec<String> {
    texto.split('.').map(str::trim).filter(|t| !t.is_empty()).map(|t| format!("{}.", t)).collect()
}

/// Parceiros com instituição, potencial e localização preenchidos, do maior
/// nível de potencial para o menor (empates na ordem da planilha).
pub fn analisar_stakeholders(grade: Option<&Grid>, avisos: &mut Avisos) -> Vec<Stakeholder> {
    let Some(grade) = grade else {
        avisos.aviso("Aba 'Econômica' está vazia ou não pôde ser lida como dados brutos.");
        return Vec::new();
    };
    let Some(tabela) = tabela_stakeholders(grade) else {
        avisos.erro("Não foi possível encontrar a linha de cabeçalho (INSTITUIÇÃO, POTENCIAL) na aba 'Econômica'.");
        return Vec::new();
    };
    let (Some(inst), Some(pot), Some(loc)) = (
        tabela.column(colunas::INSTITUICAO),
        tabela.column(colunas::POTENCIAL),
        tabela.column(colunas::LOCALIZACAO),
    ) else {
        avisos.erro("Encontrei o cabeçalho, mas as colunas 'INSTITUIÇÃO', 'POTENCIAL' ou 'LOCALIZAÇÃO' parecem estar ausentes.");
        return Vec::new();
    };

    let tabela = tabela.without_blank_in(&[inst, pot, loc]);
    if tabela.is_empty() {
        avisos.info("A tabela de stakeholders foi encontrada, mas está vazia.");
        return Vec::new();
    }

    let mut lista: Vec<Stakeholder> = (0..tabela.len())
        .map(|r| {
            let potencial = tabela.text(r, pot).unwrap_or_default();
            Stakeholder {
                instituicao: tabela.text(r, inst).unwrap_or_default(),
                localizacao: tabela.text(r, loc).unwrap_or_default(),
                nivel: nivel_potencial(&potencial),
                topicos: topicos(&potencial),
                potencial,
            }
        })
        .collect();
    lista.sort_by(|a, b| b.nivel.cmp(&a.nivel));
    lista
}
