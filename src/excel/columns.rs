//! Resolução de colunas por lista ordenada de candidatos.
//!
//! Duas fases: `score_columns` enumera todo par (rank do candidato, índice da
//! coluna) em que o nome da coluna contém o candidato; `find_column_index`
//! escolhe o menor par. O rank pesa mais que a posição, então candidatos mais
//! específicos devem vir primeiro.

/// Um acerto candidato x coluna.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColumnHit {
    pub candidate_rank: usize,
    pub column_index: usize,
}

/// Fase 1: todos os acertos, sem desempate.
pub fn score_columns<S: AsRef<str>>(columns: &[S], candidates: &[&str]) -> Vec<ColumnHit> {
    let cols: Vec<String> = columns.iter().map(|c| c.as_ref().to_lowercase()).collect();
    let mut hits = Vec::new();
    for (rank, cand) in candidates.iter().enumerate() {
        let needle = cand.to_lowercase();
        for (idx, col) in cols.iter().enumerate() {
            if col.contains(&needle) {
                hits.push(ColumnHit { candidate_rank: rank, column_index: idx });
            }
        }
    }
    hits
}

/// Fase 2: primeiro candidato, depois primeira coluna.
pub fn find_column_index<S: AsRef<str>>(columns: &[S], candidates: &[&str]) -> Option<usize> {
    score_columns(columns, candidates).into_iter().min().map(|h| h.column_index)
}

/// Nome da coluna escolhida, como aparece em `columns`.
pub fn find_column<'a, S: AsRef<str>>(columns: &'a [S], candidates: &[&str]) -> Option<&'a str> {
    find_column_index(columns, candidates).map(|i| columns[i].as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidato_tem_prioridade_sobre_posicao() {
        let cols = ["ESCALA", "NOTA", "ESCALA (0–5)"];
        assert_eq!(find_column(&cols, &["escala (0–5)", "escala"]), Some("ESCALA (0–5)"));
        assert_eq!(find_column(&cols, &["escala"]), Some("ESCALA"));
    }

    #[test]
    fn sem_acerto() {
        let cols = ["a", "b"];
        assert_eq!(find_column(&cols, &["indicador"]), None);
        assert!(score_columns(&cols, &[]).is_empty());
    }

    #[test]
    fn acertos_enumerados() {
        let cols = vec!["Relação com o projeto".to_string(), "Relação".to_string()];
        let hits = score_columns(&cols, &["relação com o projeto", "relação"]);
        assert_eq!(hits.len(), 3);
        assert_eq!(find_column_index(&cols, &["relação com o projeto", "relação"]), Some(0));
    }
}
