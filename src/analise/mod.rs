//! Visões do painel de viabilidade montadas sobre o pipeline de `excel`.
//!
//! Cada visão recebe os `DadosCarregados` (e, quando precisa, as grades
//! cruas) e devolve uma estrutura serializável junto com os avisos coletados
//! ao montá-la. Nenhuma visão falha: o que não se encontra vira aviso.

pub mod avisos;
pub mod carga;
pub mod dimensoes;
pub mod estrategia;
pub mod legislacao;
pub mod resumo;
pub mod stakeholders;
pub mod visita;

pub use avisos::{Aviso, Avisos, Nivel};
pub use carga::{carregar_dados, carregar_dados_bytes, indice_territorial, DadosCarregados};
pub use dimensoes::{montar_dimensao, DetalheIndicador, PaginaDimensao, PontoGrafico, RefMapa};
pub use estrategia::{montar_estrategia, resumo_limpo, EntradaEstrategia, PaginaEstrategia};
pub use legislacao::{classify_usages, montar_legislacao, tabela_parametros, tabela_usos, PaginaLegislacao, UsageClassification};
pub use resumo::{montar_resumo, PaginaResumo};
pub use stakeholders::{analisar_stakeholders, tabela_stakeholders, Stakeholder};
pub use visita::{montar_visita, PaginaVisita};

/// Candidatos de coluna usados pelas visões, do mais específico ao mais
/// genérico.
pub mod colunas {
    pub const ESCALA: &[&str] = &["escala (0–5)", "escala"];
    pub const INDICADOR: &[&str] = &["indicador"];
    pub const ANALISE: &[&str] = &["análise", "analise"];
    pub const PROJETO: &[&str] = &["relação com o projeto", "relação"];
    pub const MAPA: &[&str] = &["mapa correspondente", "mapa"];
    pub const DIMENSAO: &[&str] = &["dimensão"];
    pub const VALOR_PONDERADO: &[&str] = &["valor ponderado"];
    pub const PESO: &[&str] = &["peso"];
    pub const ASPECTO: &[&str] = &["aspecto / dado"];
    pub const OBSERVACOES: &[&str] = &["observações / respostas"];
    pub const USOS: &[&str] = &["usos"];
    pub const ADEQUACAO: &[&str] = &["adequação", "adequacao"];
    pub const VALOR_INDICADO: &[&str] = &["valor indicado"];
    pub const INSTITUICAO: &[&str] = &["instituição", "instituicao"];
    pub const POTENCIAL: &[&str] = &["potencial"];
    pub const LOCALIZACAO: &[&str] = &["localização", "localizacao"];
    pub const SITUACAO: &[&str] = &["situação"];
    pub const ESTRATEGIA: &[&str] = &["estratégia"];
}

/// `str.title()` do jeito que as planilhas esperam: maiúscula em toda letra
/// que não segue outra letra, minúscula no resto.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(ch);
            prev_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::title_case;

    #[test]
    fn title_case_com_acentos() {
        assert_eq!(title_case("área mín. lote"), "Área Mín. Lote");
        assert_eq!(title_case("T. ocupação"), "T. Ocupação");
        assert_eq!(title_case("MÉDIO"), "Médio");
    }
}
