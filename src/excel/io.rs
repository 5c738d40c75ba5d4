use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use tracing::{debug, warn};

use crate::error::ExcelError;

/// Célula crua, exatamente como sai da planilha (sem cabeçalho assumido).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(s: &str) -> Self {
        Cell::Text(s.to_string())
    }

    /// Vazia ou só espaços.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Coerção numérica estrita: números e texto que parseia direto como f64.
    /// "4,5" não é número aqui; para isso existe `extract_first_number`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", cell_to_string(self))
    }
}

impl From<&Data> for Cell {
    fn from(d: &Data) -> Self {
        match d {
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() { Cell::Empty } else { Cell::text(s) }
    }
}

/// Aba crua: linhas x colunas.
pub type Grid = Vec<Vec<Cell>>;

/// Converte uma célula em String (inteiros sem ".0", vazias viram "").
pub fn cell_to_string(c: &Cell) -> String {
    match c {
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(f) => {
            if f.is_finite() && (f.floor() - f).abs() < f64::EPSILON && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Cell::Bool(b) => if *b { "True".to_string() } else { "False".to_string() },
        Cell::Empty => String::new(),
    }
}

/// Minúsculas + trim: a normalização usada em toda comparação de cabeçalho
/// e palavra-chave.
pub fn normalize_cell(c: &Cell) -> String {
    cell_to_string(c).to_lowercase().trim().to_string()
}

/// Pasta de trabalho em memória, abas na ordem reportada pelo calamine.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<(String, Grid)>,
}

impl Workbook {
    pub fn new(sheets: Vec<(String, Grid)>) -> Self {
        Workbook { sheets }
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn grid(&self, name: &str) -> Option<&Grid> {
        self.sheets.iter().find(|(n, _)| n == name).map(|(_, g)| g)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// `worksheet_range` começa na primeira célula usada; colunas vazias à
/// esquerda são recolocadas para que a coluna 0 da grade seja a coluna A.
/// Linhas vazias no topo continuam de fora.
fn grid_from_range(range: &Range<Data>) -> Grid {
    let offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    range
        .rows()
        .map(|r| {
            let mut row = vec![Cell::Empty; offset];
            row.extend(r.iter().map(Cell::from));
            row
        })
        .collect()
}

fn read_all_sheets<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Vec<(String, Grid)> {
    let names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let grid = grid_from_range(&range);
                debug!(sheet = %name, rows = grid.len(), "aba lida");
                sheets.push((name, grid));
            }
            Err(e) => {
                // aba fica vazia; quem consome decide se avisa
                warn!(sheet = %name, error = %e, "não foi possível ler a aba");
                sheets.push((name, Grid::new()));
            }
        }
    }
    sheets
}

/// Lê a pasta inteira a partir dos bytes enviados (xlsx/xls/xlsb/ods).
pub fn read_workbook_bytes(bytes: &[u8]) -> Result<Workbook, ExcelError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)?;
    Ok(Workbook::new(read_all_sheets(&mut workbook)))
}

/// Monta um `Grid` a partir de literais (string vazia vira `Cell::Empty`).
pub fn grid_from_rows(rows: &[&[&str]]) -> Grid {
    rows.iter().map(|r| r.iter().map(|s| Cell::from(*s)).collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inteiros_sem_decimais() {
        assert_eq!(cell_to_string(&Cell::Number(4.0)), "4");
        assert_eq!(cell_to_string(&Cell::Number(3.5)), "3.5");
        assert_eq!(cell_to_string(&Cell::text("  Usos ")), "Usos");
    }

    #[test]
    fn coercao_numerica_estrita() {
        assert_eq!(Cell::text("4.5").as_number(), Some(4.5));
        assert_eq!(Cell::text("4,5").as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
        assert_eq!(Cell::Bool(true).as_number(), None);
    }

    #[test]
    fn colunas_vazias_a_esquerda_preservadas() {
        let mut range: Range<Data> = Range::new((2, 2), (3, 3));
        range.set_value((2, 2), Data::String("Indicador".into()));
        range.set_value((2, 3), Data::String("Escala".into()));
        range.set_value((3, 3), Data::Float(4.0));
        let g = grid_from_range(&range);
        assert_eq!(g.len(), 2);
        assert_eq!(g[0], vec![Cell::Empty, Cell::Empty, Cell::text("Indicador"), Cell::text("Escala")]);
        assert_eq!(g[1][3], Cell::Number(4.0));
    }

    #[test]
    fn normaliza_minusculas_e_trim() {
        assert_eq!(normalize_cell(&Cell::text(" VALOR Indicado ")), "valor indicado");
        assert!(Cell::text("   ").is_blank());
    }
}
