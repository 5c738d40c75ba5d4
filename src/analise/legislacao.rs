use serde::Serialize;

use crate::analise::avisos::Avisos;
use crate::analise::carga::DadosCarregados;
use crate::analise::colunas;
use crate::analise::title_case;
use crate::excel::{
    carve_table, extract_first_number, locate_header_row, locate_header_row_by, Grid, HeaderRule, HeaderTerm, Role,
    StructuredTable, DEFAULT_SCAN_LIMIT,
};
use crate::models::CategoriaUso;

/// Parâmetros urbanísticos comparados entre as duas zonas, na ordem do gráfico.
pub const PARAMETROS_COMUNS: [&str; 7] = [
    "taxa de ocupação",
    "coeficiente de aproveitamento",
    "taxa de permeabilidade",
    "área mínima de lote",
    "testada mínima",
    "afast. frontal",
    "afast. lateral",
];

pub const ZONA_ADE: &str = "ADE (Local)";
pub const ZONA_ZR3: &str = "ZR3 (Entorno)";

/// Usos do solo de uma zona separados por adequação.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageClassification {
    pub adequados: Vec<String>,
    pub proibidos: Vec<String>,
    pub inadequados: Vec<String>,
}

impl UsageClassification {
    pub fn count(&self, categoria: CategoriaUso) -> usize {
        match categoria {
            CategoriaUso::Adequado => self.adequados.len(),
            CategoriaUso::Proibido => self.proibidos.len(),
            CategoriaUso::Inadequado => self.inadequados.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.adequados.len() + self.proibidos.len() + self.inadequados.len()
    }
}

/// Texto de adequação -> categoria. Vazio, "não adequado" e qualquer texto
/// desconhecido caem em `Inadequado`.
pub fn categoria_uso(adequacao: &str) -> CategoriaUso {
    match adequacao.trim().to_lowercase().as_str() {
        "adequado" => CategoriaUso::Adequado,
        "proibido" => CategoriaUso::Proibido,
        _ => CategoriaUso::Inadequado,
    }
}

/// Tabela de parâmetros: cabeçalho `{indicador, valor indicado}` até a
/// seção de usos.
pub fn tabela_parametros(grade: &Grid) -> Option<StructuredTable> {
    let linha = locate_header_row(grade, &["indicador", "valor indicado"], DEFAULT_SCAN_LIMIT)?;
    Some(carve_table(grade, linha, Some("usos")))
}

/// Tabela de usos: uma célula exatamente "usos" e outra que contenha
/// "adequação".
pub fn tabela_usos(grade: &Grid) -> Option<StructuredTable> {
    let regra = HeaderRule::new(vec![HeaderTerm::exact("usos"), HeaderTerm::contains(colunas::ADEQUACAO)]);
    let linha = locate_header_row_by(grade, &regra, DEFAULT_SCAN_LIMIT)?;
    Some(carve_table(grade, linha, None))
}

/// Classifica os usos da tabela. `None` se faltar a coluna de usos ou a de
/// adequação. Linhas sem uso e restos de título ("usos", "adequação dos
/// usos") ficam de fora.
pub fn classify_usages(tabela: &StructuredTable) -> Option<UsageClassification> {
    let col_usos = tabela.column(colunas::USOS)?;
    let col_adeq = tabela.column(colunas::ADEQUACAO)?;
    let col_ind = tabela.column(colunas::INDICADOR);

    let mut out = UsageClassification::default();
    for r in 0..tabela.len() {
        let Some(uso) = tabela.text(r, col_usos) else { continue };
        if uso.to_lowercase().contains("usos") {
            continue;
        }
        if let Some(ind) = col_ind.and_then(|c| tabela.text(r, c)) {
            if ind.to_lowercase().contains("adequação dos usos") {
                continue;
            }
        }
        let adequacao = tabela.text(r, col_adeq).unwrap_or_default();
        match categoria_uso(&adequacao) {
            CategoriaUso::Adequado => out.adequados.push(uso),
            CategoriaUso::Proibido => out.proibidos.push(uso),
            CategoriaUso::Inadequado => out.inadequados.push(uso),
        }
    }
    Some(out)
}

/// Rótulo curto do parâmetro no eixo do gráfico.
pub fn rotulo_parametro(nome: &str) -> String {
    let curto = nome
        .replace("taxa de ", "T. ")
        .replace("coeficiente de ", "C. ")
        .replace("afast. ", "A. ")
        .replace("área mínima de ", "Área Mín. ");
    title_case(&curto)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PontoComparativo {
    pub parametro: String,
    pub zoneamento: &'static str,
    pub valor: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZonaLegislativa {
    pub zona: &'static str,
    pub usos: Option<UsageClassification>,
    pub parametros: Option<StructuredTable>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PaginaLegislacao {
    pub zonas: Vec<ZonaLegislativa>,
    /// Série ADE vs ZR3 nos parâmetros comuns; só valores numéricos.
    pub comparativo: Vec<PontoComparativo>,
    pub avisos: Avisos,
}

fn valor_parametro(tabela: &StructuredTable, nome: &str) -> Option<f64> {
    let col_param = tabela.column(colunas::INDICADOR)?;
    let col_valor = tabela.column(colunas::VALOR_INDICADO)?;
    extract_first_number(&tabela.lookup(col_param, nome, col_valor)?)
}

fn tem_colunas_parametro(tabela: Option<&StructuredTable>) -> bool {
    tabela.is_some_and(|t| t.column(colunas::INDICADOR).is_some() && t.column(colunas::VALOR_INDICADO).is_some())
}

pub fn comparar_parametros(ade: &StructuredTable, zr3: &StructuredTable) -> Vec<PontoComparativo> {
    let mut pontos = Vec::new();
    for nome in PARAMETROS_COMUNS {
        let rotulo = rotulo_parametro(nome);
        for (zona, tabela) in [(ZONA_ADE, ade), (ZONA_ZR3, zr3)] {
            if let Some(valor) = valor_parametro(tabela, nome) {
                pontos.push(PontoComparativo { parametro: rotulo.clone(), zoneamento: zona, valor });
            }
        }
    }
    pontos
}

pub fn montar_legislacao(dados: &DadosCarregados) -> PaginaLegislacao {
    let mut pagina = PaginaLegislacao::default();
    let avisos = &mut pagina.avisos;

    if dados.abas.get(Role::LegislativaAde).is_none() || dados.abas.get(Role::LegislativaZr3).is_none() {
        avisos.erro("Não foi possível encontrar as abas 'Legislativa - ADE' ou 'Legislativa - ZR3' no arquivo.");
        return pagina;
    }
    let (Some(ade), Some(zr3)) = (dados.grade(Role::LegislativaAde), dados.grade(Role::LegislativaZr3)) else {
        avisos.aviso("Abas de Legislação estão vazias ou não puderam ser lidas.");
        return pagina;
    };

    let usos_ade = tabela_usos(ade);
    let usos_zr3 = tabela_usos(zr3);
    let (class_ade, class_zr3) = match (&usos_ade, &usos_zr3) {
        (Some(a), Some(z)) => {
            let (ca, cz) = (classify_usages(a), classify_usages(z));
            if ca.is_none() || cz.is_none() {
                avisos.erro("Tabela de Usos encontrada, mas os nomes das colunas 'USOS' ou 'ADEQUAÇÃO' não puderam ser confirmados.");
            }
            (ca, cz)
        }
        _ => {
            avisos.erro("Não foi possível localizar a tabela (cabeçalho 'USOS' e 'ADEQUAÇÃO') nas abas de legislação.");
            (None, None)
        }
    };

    let param_ade = tabela_parametros(ade);
    let param_zr3 = tabela_parametros(zr3);
    match (&param_ade, &param_zr3) {
        (Some(a), Some(z)) if tem_colunas_parametro(Some(a)) && tem_colunas_parametro(Some(z)) => {
            pagina.comparativo = comparar_parametros(a, z);
            if pagina.comparativo.is_empty() {
                avisos.info(
                    "Não foram encontrados parâmetros numéricos comuns (Ex: 'Taxa de Ocupação') nas abas de legislação para gerar o gráfico.",
                );
            }
        }
        _ => avisos.erro(
            "Não foi possível encontrar as colunas de 'Indicador' ou 'Valor Indicado' nas tabelas de parâmetros de legislação.",
        ),
    }

    pagina.zonas = vec![
        ZonaLegislativa { zona: ZONA_ADE, usos: class_ade, parametros: param_ade },
        ZonaLegislativa { zona: ZONA_ZR3, usos: class_zr3, parametros: param_zr3 },
    ];
    pagina
}
