use crate::excel::io::{normalize_cell, Grid};

/// Linhas examinadas por padrão na busca do cabeçalho. O bloco de título
/// acima do cabeçalho tem altura desconhecida, mas nunca passa disso.
pub const DEFAULT_SCAN_LIMIT: usize = 30;

/// Um termo exigido na linha de cabeçalho.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderTerm {
    /// Alguma célula normalizada é exatamente a palavra.
    Exact(String),
    /// Alguma célula normalizada contém uma das alternativas.
    Contains(Vec<String>),
}

impl HeaderTerm {
    pub fn exact(word: &str) -> Self {
        HeaderTerm::Exact(word.to_lowercase())
    }

    pub fn contains(alternatives: &[&str]) -> Self {
        HeaderTerm::Contains(alternatives.iter().map(|a| a.to_lowercase()).collect())
    }

    fn matches(&self, row: &[String]) -> bool {
        match self {
            HeaderTerm::Exact(w) => row.iter().any(|v| v == w),
            HeaderTerm::Contains(alts) => row.iter().any(|v| alts.iter().any(|a| v.contains(a.as_str()))),
        }
    }
}

/// Conjunto de termos que uma linha precisa satisfazer para ser cabeçalho.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRule {
    pub terms: Vec<HeaderTerm>,
}

impl HeaderRule {
    pub fn new(terms: Vec<HeaderTerm>) -> Self {
        HeaderRule { terms }
    }

    /// Todas as palavras por igualdade exata.
    pub fn exact_all(keywords: &[&str]) -> Self {
        HeaderRule::new(keywords.iter().map(|k| HeaderTerm::exact(k)).collect())
    }

    pub fn matches(&self, row: &[String]) -> bool {
        self.terms.iter().all(|t| t.matches(row))
    }
}

/// Primeira linha em `0..scan_limit` que satisfaz `rule`.
pub fn locate_header_row_by(grid: &Grid, rule: &HeaderRule, scan_limit: usize) -> Option<usize> {
    grid.iter().take(scan_limit).enumerate().find_map(|(i, row)| {
        let values: Vec<String> = row.iter().map(normalize_cell).collect();
        rule.matches(&values).then_some(i)
    })
}

/// Primeira linha em `0..scan_limit` em que cada palavra de `keywords`
/// aparece como valor inteiro de alguma célula (após minúsculas + trim).
pub fn locate_header_row(grid: &Grid, keywords: &[&str], scan_limit: usize) -> Option<usize> {
    locate_header_row_by(grid, &HeaderRule::exact_all(keywords), scan_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::io::grid_from_rows;

    fn grade_com_cabecalho_em(linha: usize, total: usize) -> Grid {
        let mut rows: Vec<Vec<&str>> = (0..total).map(|_| vec!["texto livre", ""]).collect();
        rows[linha] = vec![" Indicador ", "VALOR INDICADO"];
        let refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        grid_from_rows(&refs)
    }

    #[test]
    fn acha_linha_12() {
        let g = grade_com_cabecalho_em(12, 40);
        assert_eq!(locate_header_row(&g, &["indicador", "valor indicado"], DEFAULT_SCAN_LIMIT), Some(12));
    }

    #[test]
    fn respeita_limite() {
        let g = grade_com_cabecalho_em(35, 40);
        assert_eq!(locate_header_row(&g, &["indicador", "valor indicado"], DEFAULT_SCAN_LIMIT), None);
        let g = grade_com_cabecalho_em(12, 40);
        assert_eq!(locate_header_row(&g, &["indicador"], 12), None);
        assert_eq!(locate_header_row(&g, &["indicador"], 13), Some(12));
    }

    #[test]
    fn exato_nao_aceita_substring() {
        let g = grid_from_rows(&[&["Indicadores", "Valor indicado (m)"]]);
        assert_eq!(locate_header_row(&g, &["indicador", "valor indicado"], 30), None);
    }

    #[test]
    fn regra_mista() {
        let g = grid_from_rows(&[&["USOS", "Adequação ao zoneamento"], &["usos", "ADEQUACAO"]]);
        let rule = HeaderRule::new(vec![HeaderTerm::exact("usos"), HeaderTerm::contains(&["adequação", "adequacao"])]);
        assert_eq!(locate_header_row_by(&g, &rule, 30), Some(0));
    }
}
