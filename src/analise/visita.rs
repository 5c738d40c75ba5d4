use serde::Serialize;

use crate::analise::avisos::Avisos;
use crate::analise::carga::DadosCarregados;
use crate::analise::colunas;
use crate::excel::{extract_first_number, Role, StructuredTable};

pub const NAO_DISPONIVEL: &str = "N/A";

/// Valor de um cartão: número quando dá para extrair, senão o texto.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValorCartao {
    Numero(f64),
    Texto(String),
}

impl ValorCartao {
    /// Zero conta como "sem número" e mantém o texto.
    pub fn de_texto(texto: String) -> Self {
        match extract_first_number(&texto) {
            Some(n) if n != 0.0 => ValorCartao::Numero(n),
            _ => ValorCartao::Texto(texto),
        }
    }
}

/// Colunas de aspecto e observação do relatório de campo.
#[derive(Debug, Clone, Copy)]
pub struct ColunasVisita {
    pub aspecto: usize,
    pub observacao: usize,
}

impl ColunasVisita {
    pub fn localizar(tabela: &StructuredTable) -> Option<Self> {
        Some(Self { aspecto: tabela.column(colunas::ASPECTO)?, observacao: tabela.column(colunas::OBSERVACOES)? })
    }

    /// Observação da primeira linha cujo aspecto contém `aspecto`; `N/A` se
    /// não há linha ou a observação está em branco.
    pub fn dado(&self, tabela: &StructuredTable, aspecto: &str) -> String {
        tabela
            .lookup(self.aspecto, aspecto, self.observacao)
            .unwrap_or_else(|| NAO_DISPONIVEL.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginaVisita {
    pub fotos: ValorCartao,
    pub largura_calcada: ValorCartao,
    pub fluxo_pedestres: String,
    pub altura_vizinhanca: String,
    pub ruidos: String,
    pub fontes_ruido: Vec<&'static str>,
    pub condicoes_climaticas: String,
    pub topografia: String,
    pub vegetacao: String,
    /// Seção (preenchida para baixo), aspecto e observação.
    pub tabela: Option<StructuredTable>,
    pub avisos: Avisos,
}

impl Default for PaginaVisita {
    fn default() -> Self {
        let na = || NAO_DISPONIVEL.to_string();
        PaginaVisita {
            fotos: ValorCartao::Texto(na()),
            largura_calcada: ValorCartao::Texto(na()),
            fluxo_pedestres: na(),
            altura_vizinhanca: na(),
            ruidos: na(),
            fontes_ruido: Vec::new(),
            condicoes_climaticas: na(),
            topografia: na(),
            vegetacao: na(),
            tabela: None,
            avisos: Avisos::new(),
        }
    }
}

/// Fontes de ruído citadas no texto livre.
pub fn fontes_de_ruido(texto: &str) -> Vec<&'static str> {
    let t = texto.to_lowercase();
    let mut fontes = Vec::new();
    if t.contains("trânsito") || t.contains("veículos") {
        fontes.push("Trânsito");
    }
    if t.contains("natureza") || t.contains("cigarras") {
        fontes.push("Natureza");
    }
    if t.contains("pessoas") {
        fontes.push("Pessoas");
    }
    fontes
}

/// Linhas com aspecto, primeira coluna preenchida para baixo, só as colunas
/// de seção, aspecto e observação.
pub fn tabela_visita(tabela: &StructuredTable, cols: ColunasVisita) -> StructuredTable {
    let mut t = tabela.without_blank_in(&[cols.aspecto]);
    t.forward_fill(0);
    let mut sel = vec![0];
    for c in [cols.aspecto, cols.observacao] {
        if !sel.contains(&c) {
            sel.push(c);
        }
    }
    t.select(&sel)
}

pub fn montar_visita(dados: &DadosCarregados) -> PaginaVisita {
    let mut pagina = PaginaVisita::default();
    let tabela = dados.tabela(Role::Visita);
    if tabela.is_empty() {
        pagina.avisos.erro("Aba '1) Dados de campo (Relatório)' não encontrada.");
        return pagina;
    }
    let Some(cols) = ColunasVisita::localizar(tabela) else {
        pagina.avisos.erro("Colunas 'Aspecto' ou 'Observações' não encontradas no Relatório.");
        pagina.tabela = Some(tabela.clone());
        return pagina;
    };

    let dado = |aspecto: &str| cols.dado(tabela, aspecto);
    pagina.fotos = ValorCartao::de_texto(dado("Fotografias capturadas"));
    pagina.largura_calcada = ValorCartao::de_texto(dado("Largura da calçada principal"));
    pagina.fluxo_pedestres = dado("Fluxo médio de pedestres");
    pagina.altura_vizinhanca = dado("Altura média dos edifícios vizinhos");
    pagina.ruidos = dado("Sons e ruídos predominantes");
    pagina.fontes_ruido = fontes_de_ruido(&pagina.ruidos);
    if pagina.fontes_ruido.is_empty() {
        pagina.avisos.info("Fontes de ruído não detalhadas.");
    }
    pagina.condicoes_climaticas = dado("Condições climáticas");
    pagina.topografia = dado("Topografia e drenagem");
    pagina.vegetacao = dado("Vegetação existente");
    pagina.tabela = Some(tabela_visita(tabela, cols));
    pagina
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::{carve_table, grid_from_rows};

    fn relatorio() -> StructuredTable {
        let g = grid_from_rows(&[
            &["SEÇÃO", "ASPECTO / DADO", "OBSERVAÇÕES / RESPOSTAS"],
            &["Geral", "Fotografias capturadas", "32 fotos"],
            &["", "Largura da calçada principal", "0 m"],
            &["Entorno", "Sons e ruídos predominantes", "Veículos e cigarras"],
            &["", "Vegetação existente", "  "],
            &["", "", "solto"],
        ]);
        carve_table(&g, 0, None)
    }

    #[test]
    fn dados_e_padroes() {
        let t = relatorio();
        let cols = ColunasVisita::localizar(&t).unwrap();
        assert_eq!(ValorCartao::de_texto(cols.dado(&t, "fotografias")), ValorCartao::Numero(32.0));
        assert_eq!(ValorCartao::de_texto(cols.dado(&t, "calçada")), ValorCartao::Texto("0 m".into()));
        assert_eq!(cols.dado(&t, "vegetação"), "N/A");
        assert_eq!(cols.dado(&t, "altura"), "N/A");
    }

    #[test]
    fn ruidos() {
        assert_eq!(fontes_de_ruido("Veículos e cigarras"), vec!["Trânsito", "Natureza"]);
        assert!(fontes_de_ruido("silêncio").is_empty());
    }

    #[test]
    fn tabela_preenchida() {
        let t = relatorio();
        let v = tabela_visita(&t, ColunasVisita::localizar(&t).unwrap());
        assert_eq!(v.len(), 4);
        assert_eq!(v.columns.len(), 3);
        assert_eq!(v.text(1, 0).as_deref(), Some("Geral"));
        assert_eq!(v.text(3, 0).as_deref(), Some("Entorno"));
    }
}
