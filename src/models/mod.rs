// Estruturas de dados principais

use serde::{Deserialize, Serialize};

use crate::excel::Role;

/// As seis dimensões com aba própria de KPIs e média na escala 0–5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimensao {
    Urbana,
    Ambiental,
    Social,
    Economica,
    Fisica,
    Sensorial,
}

impl Dimensao {
    /// Ordem do menu de dimensões.
    pub const ALL: [Dimensao; 6] = [
        Dimensao::Urbana,
        Dimensao::Ambiental,
        Dimensao::Social,
        Dimensao::Economica,
        Dimensao::Fisica,
        Dimensao::Sensorial,
    ];

    pub fn role(self) -> Role {
        match self {
            Dimensao::Urbana => Role::Urbana,
            Dimensao::Ambiental => Role::Ambiental,
            Dimensao::Social => Role::Social,
            Dimensao::Economica => Role::Economica,
            Dimensao::Fisica => Role::Fisica,
            Dimensao::Sensorial => Role::Sensorial,
        }
    }

    pub fn nome(self) -> &'static str {
        match self {
            Dimensao::Urbana => "Urbana",
            Dimensao::Ambiental => "Ambiental",
            Dimensao::Social => "Social",
            Dimensao::Economica => "Econômica",
            Dimensao::Fisica => "Física",
            Dimensao::Sensorial => "Sensorial",
        }
    }

    /// Forma usada nas rotas: sem acento, minúscula.
    pub fn slug(self) -> &'static str {
        match self {
            Dimensao::Urbana => "urbana",
            Dimensao::Ambiental => "ambiental",
            Dimensao::Social => "social",
            Dimensao::Economica => "economica",
            Dimensao::Fisica => "fisica",
            Dimensao::Sensorial => "sensorial",
        }
    }

    /// Aceita o slug (`economica`) ou o nome com acento (`Econômica`).
    pub fn parse(s: &str) -> Option<Dimensao> {
        let s = s.trim().to_lowercase();
        Dimensao::ALL.into_iter().find(|d| s == d.slug() || s == d.nome().to_lowercase())
    }
}

/// Médias por dimensão e o Índice Territorial. Calculadas uma vez por carga,
/// só leitura depois disso; zero quando a coluna não pôde ser resolvida.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metricas {
    pub media_urbana: f64,
    pub media_ambiental: f64,
    pub media_social: f64,
    pub media_economica: f64,
    pub media_fisica: f64,
    pub media_sensorial: f64,
    pub it_total: f64,
}

impl Metricas {
    pub fn media(&self, d: Dimensao) -> f64 {
        match d {
            Dimensao::Urbana => self.media_urbana,
            Dimensao::Ambiental => self.media_ambiental,
            Dimensao::Social => self.media_social,
            Dimensao::Economica => self.media_economica,
            Dimensao::Fisica => self.media_fisica,
            Dimensao::Sensorial => self.media_sensorial,
        }
    }

    pub fn set_media(&mut self, d: Dimensao, valor: f64) {
        match d {
            Dimensao::Urbana => self.media_urbana = valor,
            Dimensao::Ambiental => self.media_ambiental = valor,
            Dimensao::Social => self.media_social = valor,
            Dimensao::Economica => self.media_economica = valor,
            Dimensao::Fisica => self.media_fisica = valor,
            Dimensao::Sensorial => self.media_sensorial = valor,
        }
    }
}

/// Categoria de adequação de um uso do solo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoriaUso {
    Adequado,
    Proibido,
    Inadequado,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_slug_e_nome() {
        assert_eq!(Dimensao::parse("economica"), Some(Dimensao::Economica));
        assert_eq!(Dimensao::parse("Econômica"), Some(Dimensao::Economica));
        assert_eq!(Dimensao::parse(" FÍSICA "), Some(Dimensao::Fisica));
        assert_eq!(Dimensao::parse("legislativa"), None);
    }
}
