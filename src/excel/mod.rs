//! Módulo `excel`: leitura da pasta e localização heurística de abas,
//! colunas e cabeçalhos.
//!
//! Submódulos:
//! - `io`: leitura via calamine e o modelo de célula/grade
//! - `sheets`: papel lógico -> aba (substring sem caixa)
//! - `columns`: coluna por candidatos ordenados
//! - `header`: linha de cabeçalho embutida abaixo de um bloco de título
//! - `table`: recorte da grade em `StructuredTable`
//! - `numbers`: primeiro número em notação pt-BR

/// Leitura de pastas e conversão de células
pub mod io;

/// Resolução de abas: `resolve_sheets`
pub mod sheets;

/// Resolução de colunas: `find_column`
pub mod columns;

/// Localização de cabeçalho: `locate_header_row`
pub mod header;

/// Recorte de tabelas: `carve_table`
pub mod table;

/// Extração numérica: `extract_first_number`
pub mod numbers;

pub use io::{cell_to_string, grid_from_rows, normalize_cell, read_workbook_bytes, Cell, Grid, Workbook};
pub use sheets::{find_sheet, resolve_sheets, Role, RoleMap};
pub use columns::{find_column, find_column_index, score_columns, ColumnHit};
pub use header::{locate_header_row, locate_header_row_by, HeaderRule, HeaderTerm, DEFAULT_SCAN_LIMIT};
pub use table::{carve_table, header_names, StructuredTable};
pub use numbers::extract_first_number;

/// Nome de arquivo de imagem que corresponde a uma referência de mapa
/// escrita na planilha: o primeiro, na ordem de upload, cujo nome em
/// minúsculas contém a referência.
pub fn match_image_name<'a, S: AsRef<str>>(reference: &str, file_names: &'a [S]) -> Option<&'a str> {
    let needle = reference.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    file_names
        .iter()
        .map(|n| n.as_ref())
        .find(|n| n.to_lowercase().contains(&needle))
}
