use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::analise::avisos::Avisos;
use crate::analise::carga::DadosCarregados;
use crate::analise::colunas;
use crate::analise::visita::ColunasVisita;
use crate::excel::{cell_to_string, Role, StructuredTable};

/// Marcadores de linhas de detalhe (setas, pinos, tópicos com hífen) que não
/// são uma dimensão.
fn marcador_detalhe() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"➡️|📍|^\s*-").expect("regex válida"))
}

/// Resumo analítico só com as linhas de dimensão: sem marcadores, quatro
/// primeiras colunas, sem linhas vazias nem dimensão em branco.
pub fn resumo_limpo(resumo: &StructuredTable) -> Option<StructuredTable> {
    let col_dim = resumo.column(colunas::DIMENSAO)?;
    let mut t = resumo.clone();
    t.retain_rows(|r| !marcador_detalhe().is_match(&cell_to_string(&r[col_dim])));
    let largura = t.columns.len().min(4);
    let mut t = t.select(&(0..largura).collect::<Vec<_>>());
    t.retain_rows(|r| r.iter().any(|c| !c.is_blank()));
    if col_dim < largura {
        t.retain_rows(|r| !r[col_dim].is_blank());
    }
    Some(t)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntradaEstrategia {
    pub dimensao: String,
    pub situacao: String,
    pub potencial: String,
    pub estrategia: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Risco {
    pub rotulo: &'static str,
    pub descricao: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PaginaEstrategia {
    pub entradas: Vec<EntradaEstrategia>,
    /// Resumo limpo, exposto quando as colunas das entradas não existem.
    pub tabela: Option<StructuredTable>,
    pub riscos: Vec<Risco>,
    pub avisos: Avisos,
}

const RISCOS: [(&str, &str); 3] = [
    ("Risco de Ruído", "Ruídos e odores"),
    ("Risco de Segurança", "Nível de segurança"),
    ("Risco de Topografia", "Topografia e drenagem"),
];

fn entradas(limpo: &StructuredTable, col_dim: usize, avisos: &mut Avisos) -> Option<Vec<EntradaEstrategia>> {
    let (Some(sit), Some(pot), Some(est)) = (
        limpo.column(colunas::SITUACAO),
        limpo.column(colunas::POTENCIAL),
        limpo.column(colunas::ESTRATEGIA),
    ) else {
        avisos.erro("Não foi possível encontrar as colunas 'Situação', 'Potencial' e 'Estratégia' no Resumo.");
        return None;
    };
    let ou = |r: usize, c: usize, padrao: &str| limpo.text(r, c).unwrap_or_else(|| padrao.to_string());
    Some(
        (0..limpo.len())
            .map(|r| EntradaEstrategia {
                dimensao: limpo.text(r, col_dim).unwrap_or_default(),
                situacao: ou(r, sit, "Situação não definida"),
                potencial: ou(r, pot, "Potencial não definido"),
                estrategia: ou(r, est, "Estratégia não definida"),
            })
            .collect(),
    )
}

pub fn montar_estrategia(dados: &DadosCarregados) -> PaginaEstrategia {
    let mut pagina = PaginaEstrategia::default();
    let resumo = dados.tabela(Role::ResumoAnalitico);

    if resumo.is_empty() {
        pagina.avisos.erro("Aba '4) Resumo analítico' não encontrada.");
    } else {
        match resumo_limpo(resumo) {
            None => pagina.avisos.erro("Não foi possível encontrar a coluna 'DIMENSÃO' no Resumo Analítico."),
            Some(limpo) if limpo.is_empty() => {
                pagina.avisos.aviso("Nenhum dado de estratégia encontrado após a limpeza.")
            }
            Some(limpo) => {
                let col_dim = limpo.column(colunas::DIMENSAO).unwrap_or(0);
                match entradas(&limpo, col_dim, &mut pagina.avisos) {
                    Some(e) => pagina.entradas = e,
                    None => pagina.tabela = Some(limpo),
                }
            }
        }
    }

    let visita = dados.tabela(Role::Visita);
    if !visita.is_empty() {
        match ColunasVisita::localizar(visita) {
            Some(cols) => {
                pagina.riscos = RISCOS
                    .iter()
                    .map(|&(rotulo, aspecto)| Risco { rotulo, descricao: cols.dado(visita, aspecto) })
                    .collect();
            }
            None => pagina.avisos.erro("Colunas de 'Aspecto' ou 'Observações' não encontradas na aba Visita."),
        }
    }
    pagina
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::{carve_table, grid_from_rows};

    fn resumo() -> StructuredTable {
        let g = grid_from_rows(&[
            &["DIMENSÃO", "SITUAÇÃO", "POTENCIAL", "ESTRATÉGIA", "NOTAS"],
            &["Urbana", "Boa malha", "Alto", "Conectar", "x"],
            &["➡️ detalhe", "a", "b", "c", ""],
            &["  - tópico", "a", "", "", ""],
            &["📍 ponto", "", "", "", ""],
            &["Social", "", "Médio", "", ""],
            &["", "órfã", "", "", ""],
            &["", "", "", "", "só na quinta"],
        ]);
        carve_table(&g, 0, None)
    }

    #[test]
    fn limpa_marcadores_e_colunas() {
        let t = resumo_limpo(&resumo()).unwrap();
        assert_eq!(t.columns, vec!["dimensão", "situação", "potencial", "estratégia"]);
        let dims: Vec<String> = (0..t.len()).map(|r| t.text(r, 0).unwrap()).collect();
        assert_eq!(dims, vec!["Urbana", "Social"]);
    }

    #[test]
    fn entradas_com_padroes() {
        let t = resumo_limpo(&resumo()).unwrap();
        let mut avisos = Avisos::new();
        let e = entradas(&t, 0, &mut avisos).unwrap();
        assert_eq!(e[1].situacao, "Situação não definida");
        assert_eq!(e[1].potencial, "Médio");
        assert_eq!(e[1].estrategia, "Estratégia não definida");
        assert!(avisos.is_empty());
    }

    #[test]
    fn sem_coluna_dimensao() {
        let g = grid_from_rows(&[&["a", "b"], &["1", "2"]]);
        assert!(resumo_limpo(&carve_table(&g, 0, None)).is_none());
    }
}
