use serde::Serialize;
use std::cmp::Ordering;

use crate::analise::avisos::Avisos;
use crate::analise::carga::DadosCarregados;
use crate::analise::colunas;
use crate::excel::{Cell, Role, StructuredTable};
use crate::models::Dimensao;

/// Meta de referência da média sensorial.
pub const META_SENSORIAL: f64 = 3.0;
/// Acima disto o IT é "Alto Potencial".
pub const LIMIAR_ALTO_POTENCIAL: f64 = 3.5;

#[derive(Debug, Clone, Serialize)]
pub struct MediaDimensao {
    pub dimensao: &'static str,
    pub media: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginaResumo {
    pub it_total: f64,
    pub it_rotulo: &'static str,
    pub media_sensorial: f64,
    pub delta_sensorial: f64,
    /// Desempenho por dimensão, maior média primeiro.
    pub medias: Vec<MediaDimensao>,
    /// Principais drivers de impacto da matriz de pesos.
    pub drivers: Option<StructuredTable>,
    pub avisos: Avisos,
}

pub fn rotulo_it(it: f64) -> &'static str {
    if it > LIMIAR_ALTO_POTENCIAL { "Alto Potencial" } else { "Potencial Moderado" }
}

pub fn montar_resumo(dados: &DadosCarregados) -> PaginaResumo {
    let mut avisos = Avisos::new();
    let m = &dados.metricas;

    let ordem = [
        Dimensao::Fisica,
        Dimensao::Economica,
        Dimensao::Social,
        Dimensao::Urbana,
        Dimensao::Ambiental,
        Dimensao::Sensorial,
    ];
    let mut medias: Vec<MediaDimensao> = ordem
        .iter()
        .map(|d| MediaDimensao { dimensao: d.nome(), media: m.media(*d) })
        .collect();
    medias.sort_by(|a, b| b.media.partial_cmp(&a.media).unwrap_or(Ordering::Equal));

    let drivers = drivers_de_impacto(dados.tabela(Role::Matriz), &mut avisos);

    PaginaResumo {
        it_total: m.it_total,
        it_rotulo: rotulo_it(m.it_total),
        media_sensorial: m.media_sensorial,
        delta_sensorial: m.media_sensorial - META_SENSORIAL,
        medias,
        drivers,
        avisos,
    }
}

/// Linhas da matriz com indicador e valor ponderado, sem as linhas de índice
/// e interpretação, ordenadas pelo valor ponderado (não numéricos por último).
pub fn drivers_de_impacto(matriz: &StructuredTable, avisos: &mut Avisos) -> Option<StructuredTable> {
    if matriz.is_empty() {
        avisos.erro("Aba '3) Matriz, pesos e índices' não encontrada ou está vazia.");
        return None;
    }
    let (Some(col_ind), Some(col_vp)) = (matriz.column(colunas::INDICADOR), matriz.column(colunas::VALOR_PONDERADO)) else {
        avisos.aviso("Não foi possível encontrar as colunas 'Indicador' e 'Valor Ponderado' na aba 'Matriz'.");
        return None;
    };

    let mut t = matriz.without_blank_in(&[col_ind, col_vp]);
    t.retain_rows(|r| {
        let ind = r[col_ind].to_string().to_lowercase();
        !(ind.contains("índice") || ind.contains("interpretação"))
    });

    let mut cols = vec![col_ind];
    for extra in [matriz.column(&["escala"]), matriz.column(colunas::PESO)].into_iter().flatten() {
        if !cols.contains(&extra) {
            cols.push(extra);
        }
    }
    if !cols.contains(&col_vp) {
        cols.push(col_vp);
    }
    let mut t = t.select(&cols);
    let vp = cols.iter().position(|&c| c == col_vp).unwrap_or(cols.len() - 1);
    for row in t.rows.iter_mut() {
        row[vp] = row[vp].as_number().map_or(Cell::Empty, Cell::Number);
    }

    let mut ordem: Vec<usize> = (0..t.rows.len()).collect();
    ordem.sort_by(|&a, &b| match (t.rows[a][vp].as_number(), t.rows[b][vp].as_number()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    t.rows = ordem.iter().map(|&i| t.rows[i].clone()).collect();
    t.source_rows = ordem.iter().map(|&i| t.source_rows[i]).collect();
    Some(t)
}
