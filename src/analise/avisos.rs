use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Nivel {
    Info,
    Aviso,
    Erro,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aviso {
    pub nivel: Nivel,
    pub mensagem: String,
}

/// Coletor "reporta e segue": toda busca que falha vira uma entrada aqui e o
/// processamento continua com um valor padrão.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Avisos {
    itens: Vec<Aviso>,
}

impl Avisos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, mensagem: impl Into<String>) {
        let mensagem = mensagem.into();
        info!("{}", mensagem);
        self.itens.push(Aviso { nivel: Nivel::Info, mensagem });
    }

    pub fn aviso(&mut self, mensagem: impl Into<String>) {
        let mensagem = mensagem.into();
        warn!("{}", mensagem);
        self.itens.push(Aviso { nivel: Nivel::Aviso, mensagem });
    }

    pub fn erro(&mut self, mensagem: impl Into<String>) {
        let mensagem = mensagem.into();
        error!("{}", mensagem);
        self.itens.push(Aviso { nivel: Nivel::Erro, mensagem });
    }

    /// Resolve uma busca opcional: devolve o valor ou registra `mensagem`.
    pub fn exigir<T>(&mut self, valor: Option<T>, mensagem: impl Into<String>) -> Option<T> {
        if valor.is_none() {
            self.aviso(mensagem);
        }
        valor
    }

    pub fn extend(&mut self, outros: Avisos) {
        self.itens.extend(outros.itens);
    }

    pub fn itens(&self) -> &[Aviso] {
        &self.itens
    }

    pub fn is_empty(&self) -> bool {
        self.itens.is_empty()
    }

    pub fn contem(&self, trecho: &str) -> bool {
        self.itens.iter().any(|a| a.mensagem.contains(trecho))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exigir_registra_so_ausencia() {
        let mut a = Avisos::new();
        assert_eq!(a.exigir(Some(3), "não deveria aparecer"), Some(3));
        assert!(a.is_empty());
        assert_eq!(a.exigir::<usize>(None, "coluna ausente"), None);
        assert_eq!(a.itens()[0].nivel, Nivel::Aviso);
        assert!(a.contem("coluna ausente"));
    }
}
