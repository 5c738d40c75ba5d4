use std::collections::HashMap;
use tracing::info;

use crate::analise::avisos::Avisos;
use crate::analise::colunas;
use crate::error::ExcelError;
use crate::excel::{carve_table, read_workbook_bytes, resolve_sheets, Grid, Role, RoleMap, StructuredTable, Workbook};
use crate::models::{Dimensao, Metricas};

/// Resultado de uma carga: abas resolvidas, tabelas lidas com cabeçalho na
/// primeira linha, grades cruas e métricas. Recalculado a cada requisição a
/// partir dos bytes enviados; nada disto é persistido.
#[derive(Debug, Clone, Default)]
pub struct DadosCarregados {
    pub abas: RoleMap,
    tabelas: HashMap<Role, StructuredTable>,
    grades: HashMap<Role, Grid>,
    pub metricas: Metricas,
    pub avisos: Avisos,
}

impl DadosCarregados {
    /// Tabela do papel; vazia se a aba não foi encontrada.
    pub fn tabela(&self, role: Role) -> &StructuredTable {
        static VAZIA: StructuredTable = StructuredTable {
            columns: Vec::new(),
            rows: Vec::new(),
            source_rows: Vec::new(),
            header_row: 0,
            dropped_empty_rows: 0,
        };
        self.tabelas.get(&role).unwrap_or(&VAZIA)
    }

    /// Grade crua (sem cabeçalho) do papel, para os recortes irregulares.
    pub fn grade(&self, role: Role) -> Option<&Grid> {
        self.grades.get(&role).filter(|g| !g.is_empty())
    }
}

/// Lê os bytes e roda `carregar_dados`. Só falha se o arquivo não abre.
pub fn carregar_dados_bytes(bytes: &[u8]) -> Result<DadosCarregados, ExcelError> {
    let workbook = read_workbook_bytes(bytes)?;
    if workbook.is_empty() {
        return Err(ExcelError::NoSheets);
    }
    Ok(carregar_dados(&workbook))
}

/// Resolve os papéis, lê cada aba encontrada e calcula as métricas. Abas
/// ausentes viram tabela vazia + aviso, nunca erro.
pub fn carregar_dados(workbook: &Workbook) -> DadosCarregados {
    let mut avisos = Avisos::new();
    let nomes = workbook.sheet_names();
    let abas = resolve_sheets(&nomes, &Role::ALL);

    let mut tabelas = HashMap::new();
    let mut grades = HashMap::new();
    for (role, nome) in abas.iter() {
        let Some(nome) = nome else {
            avisos.aviso(format!("Aviso: Não foi possível encontrar a aba que contém '{}'", role.keyword()));
            continue;
        };
        let grade = workbook.grid(nome).cloned().unwrap_or_default();
        if grade.is_empty() {
            avisos.erro(format!("Aba '{}' está vazia ou não pôde ser lida.", nome));
        }
        tabelas.insert(role, carve_table(&grade, 0, None));
        grades.insert(role, grade);
    }

    let it_total = tabelas.get(&Role::Matriz).map_or(0.0, |m| indice_territorial(m, &mut avisos));
    let metricas = Metricas { it_total, ..Metricas::default() };
    let mut dados = DadosCarregados { abas, tabelas, grades, metricas, avisos };
    calcular_medias(&mut dados);
    info!(abas = nomes.len(), it_total = dados.metricas.it_total, "pasta carregada");
    dados
}

/// Média da coluna ESCALA por dimensão. A tabela da dimensão fica só com as
/// linhas cuja escala é numérica.
fn calcular_medias(dados: &mut DadosCarregados) {
    for dim in Dimensao::ALL {
        let Some(tabela) = dados.tabelas.get_mut(&dim.role()) else { continue };
        if tabela.is_empty() {
            continue;
        }
        let Some(col) = tabela.column(colunas::ESCALA) else {
            dados.avisos.aviso(format!("Coluna 'ESCALA' não encontrada na aba da dimensão {}.", dim.nome()));
            continue;
        };
        tabela.retain_rows(|r| r[col].as_number().is_some());
        let valores: Vec<f64> = tabela.rows.iter().filter_map(|r| r[col].as_number()).collect();
        if !valores.is_empty() {
            let media = valores.iter().sum::<f64>() / valores.len() as f64;
            dados.metricas.set_media(dim, media);
        }
    }
}

/// Valor da linha "Índice Territorial" na matriz de pesos, ou 0.
pub fn indice_territorial(matriz: &StructuredTable, avisos: &mut Avisos) -> f64 {
    if matriz.columns.is_empty() {
        return 0.0;
    }
    let col_dim = matriz.column(colunas::DIMENSAO).unwrap_or(0);
    let linha = (0..matriz.len()).find(|&r| {
        matriz.text(r, col_dim).is_some_and(|t| t.to_lowercase().contains("índice territorial"))
    });
    let Some(linha) = linha else {
        avisos.aviso("Não foi possível encontrar a linha 'Índice Territorial' na aba Matriz.");
        return 0.0;
    };
    let col_valor = matriz.column(colunas::ESCALA).unwrap_or(2);
    match matriz.cell(linha, col_valor).as_number() {
        Some(v) => v,
        None => {
            avisos.aviso("Valor do 'Índice Territorial' na aba Matriz não é numérico.");
            0.0
        }
    }
}
