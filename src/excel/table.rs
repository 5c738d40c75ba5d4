use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::excel::columns::find_column_index;
use crate::excel::io::{cell_to_string, normalize_cell, Cell, Grid};

/// Aba reinterpretada com uma linha de cabeçalho e um intervalo de dados.
///
/// Invariantes: `columns.len()` é a largura da linha de cabeçalho, toda linha
/// de dados tem essa largura, e `source_rows[i] > header_row` para todo `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Índice na grade original de cada linha de dados.
    #[serde(skip)]
    pub source_rows: Vec<usize>,
    #[serde(skip)]
    pub header_row: usize,
    /// Linhas totalmente vazias descartadas dentro do intervalo recortado.
    #[serde(skip)]
    pub dropped_empty_rows: usize,
}

/// Nomes de coluna normalizados: minúsculas + trim, vazio vira
/// `unnamed_{j}`, repetido ganha sufixo `_{k}` (k a partir de 1). O sufixo
/// pula qualquer nome já emitido, inclusive os que vieram literais do
/// cabeçalho, então os nomes resultantes são sempre distintos.
pub fn header_names(row: &[Cell]) -> Vec<String> {
    let mut usados: HashSet<String> = HashSet::new();
    let mut sufixos: HashMap<String, usize> = HashMap::new();
    row.iter()
        .enumerate()
        .map(|(j, c)| {
            let mut name = normalize_cell(c);
            if name.is_empty() {
                name = format!("unnamed_{}", j);
            }
            if usados.insert(name.clone()) {
                return name;
            }
            let k = sufixos.entry(name.clone()).or_insert(0);
            loop {
                *k += 1;
                let candidato = format!("{}_{}", name, k);
                if usados.insert(candidato.clone()) {
                    return candidato;
                }
            }
        })
        .collect()
}

fn row_contains(row: &[Cell], needle_lower: &str) -> bool {
    row.iter().any(|c| cell_to_string(c).to_lowercase().contains(needle_lower))
}

/// Recorta `grid` a partir de `header_row`.
///
/// A linha do cabeçalho vira nomes de coluna e os dados começam na seguinte.
/// Com `stop_keyword`, a primeira linha posterior que contenha a palavra em
/// qualquer célula (sem caixa) encerra os dados, exclusive: é o "ler até a
/// próxima seção titulada". Linhas totalmente vazias são descartadas.
pub fn carve_table(grid: &Grid, header_row: usize, stop_keyword: Option<&str>) -> StructuredTable {
    let Some(header) = grid.get(header_row) else {
        return StructuredTable { header_row, ..Default::default() };
    };
    let columns = header_names(header);
    let width = columns.len();

    let stop = stop_keyword.map(str::to_lowercase);
    let mut end = grid.len();
    if let Some(stop) = stop.as_deref() {
        if let Some(pos) = grid.iter().skip(header_row + 1).position(|r| row_contains(r, stop)) {
            end = header_row + 1 + pos;
        }
    }

    let mut rows = Vec::new();
    let mut source_rows = Vec::new();
    let mut dropped_empty_rows = 0;
    for (idx, raw) in grid.iter().enumerate().take(end).skip(header_row + 1) {
        let mut row: Vec<Cell> = raw.iter().take(width).cloned().collect();
        row.resize(width, Cell::Empty);
        if row.iter().all(Cell::is_blank) {
            dropped_empty_rows += 1;
            continue;
        }
        rows.push(row);
        source_rows.push(idx);
    }

    StructuredTable { columns, rows, source_rows, header_row, dropped_empty_rows }
}

impl StructuredTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `find_column` sobre os nomes desta tabela.
    pub fn column(&self, candidates: &[&str]) -> Option<usize> {
        find_column_index(&self.columns, candidates)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }

    /// Texto da célula (trim), `None` se em branco.
    pub fn text(&self, row: usize, col: usize) -> Option<String> {
        let c = self.cell(row, col);
        if c.is_blank() { None } else { Some(cell_to_string(c)) }
    }

    /// Mantém as linhas que satisfazem `keep`, preservando a origem.
    pub fn retain_rows<F: FnMut(&[Cell]) -> bool>(&mut self, mut keep: F) {
        let mut rows = Vec::with_capacity(self.rows.len());
        let mut source = Vec::with_capacity(self.rows.len());
        for (row, src) in self.rows.drain(..).zip(self.source_rows.drain(..)) {
            if keep(&row) {
                rows.push(row);
                source.push(src);
            }
        }
        self.rows = rows;
        self.source_rows = source;
    }

    /// Cópia sem as linhas em que alguma das colunas está em branco.
    pub fn without_blank_in(&self, cols: &[usize]) -> StructuredTable {
        let mut t = self.clone();
        t.retain_rows(|r| cols.iter().all(|&c| r.get(c).is_some_and(|v| !v.is_blank())));
        t
    }

    /// Projeção em um subconjunto de colunas, na ordem dada.
    pub fn select(&self, cols: &[usize]) -> StructuredTable {
        let columns = cols.iter().filter_map(|&c| self.columns.get(c).cloned()).collect();
        let rows = self
            .rows
            .iter()
            .map(|r| cols.iter().filter(|&&c| c < self.columns.len()).map(|&c| r[c].clone()).collect())
            .collect();
        StructuredTable {
            columns,
            rows,
            source_rows: self.source_rows.clone(),
            header_row: self.header_row,
            dropped_empty_rows: self.dropped_empty_rows,
        }
    }

    /// Preenche brancos da coluna com o último valor não vazio acima.
    pub fn forward_fill(&mut self, col: usize) {
        let mut last: Option<Cell> = None;
        for row in self.rows.iter_mut() {
            let Some(cell) = row.get_mut(col) else { continue };
            if cell.is_blank() {
                if let Some(prev) = &last {
                    *cell = prev.clone();
                }
            } else {
                last = Some(cell.clone());
            }
        }
    }

    /// Primeira linha cuja coluna `key_col` contém `needle` (sem caixa) e o
    /// valor de `value_col` nela; `None` se não há linha ou o valor está vazio.
    pub fn lookup(&self, key_col: usize, needle: &str, value_col: usize) -> Option<String> {
        let needle = needle.to_lowercase();
        let row = (0..self.rows.len())
            .find(|&r| cell_to_string(self.cell(r, key_col)).to_lowercase().contains(&needle))?;
        self.text(row, value_col)
    }

    /// Texto alinhado em colunas, estilo dump de DataFrame, para montar
    /// contexto de prompt.
    pub fn render_text(&self) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(|c| cell_to_string(c).replace('\n', " ")).collect())
            .collect();
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &cells {
            for (j, v) in row.iter().enumerate() {
                widths[j] = widths[j].max(v.chars().count());
            }
        }
        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let pad = |s: &str, w: usize| format!("{}{}", " ".repeat(w.saturating_sub(s.chars().count())), s);

        let mut out = String::new();
        out.push_str(&" ".repeat(index_width));
        for (j, c) in self.columns.iter().enumerate() {
            out.push_str("  ");
            out.push_str(&pad(c, widths[j]));
        }
        for (i, row) in cells.iter().enumerate() {
            out.push('\n');
            out.push_str(&pad(&i.to_string(), index_width));
            for (j, v) in row.iter().enumerate() {
                out.push_str("  ");
                out.push_str(&pad(v, widths[j]));
            }
        }
        out
    }
}
